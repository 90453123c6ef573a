//! ECC 200 codeword placement: builds the Utah module-placement table for
//! a symbol's interior data region and uses it to de-place (extract)
//! codewords from a sampled, oriented grid — or the inverse, to place
//! codewords back into module form for testing.

mod table;

use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::instrument;

pub use table::{Placement, PlacementTable};

/// Errors raised while building or applying a placement table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("symbol dimensions {dim_x}x{dim_y} are too small to hold an L-finder and timing border")]
    TooSmall { dim_x: u16, dim_y: u16 },
    #[error("symbol dimensions {dim_x}x{dim_y} do not leave an even interior data region")]
    OddInterior { dim_x: u16, dim_y: u16 },
}

/// Build the placement table for a full symbol size `dim_x` x `dim_y`
/// (module counts including the L-finder and timing border).
#[cfg_attr(feature = "tracing", instrument(level = "debug"))]
pub fn placement_table_for(dim_x: u16, dim_y: u16) -> Result<PlacementTable, PlacementError> {
    if dim_x <= 2 || dim_y <= 2 {
        return Err(PlacementError::TooSmall { dim_x, dim_y });
    }
    let (ncol, nrow) = (dim_x - 2, dim_y - 2);
    if ncol % 2 != 0 || nrow % 2 != 0 {
        return Err(PlacementError::OddInterior { dim_x, dim_y });
    }
    Ok(PlacementTable::build(nrow as usize, ncol as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dimensions_without_room_for_finder_and_timing() {
        assert!(matches!(
            placement_table_for(2, 2),
            Err(PlacementError::TooSmall { .. })
        ));
    }

    #[test]
    fn builds_table_for_hello_world_size() {
        let table = placement_table_for(10, 10).unwrap();
        assert_eq!(table.num_codewords(), 8);
    }
}
