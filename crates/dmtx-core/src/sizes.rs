//! IEC 16022 valid symbol sizes for the ECC 200 family: module dimensions
//! and total/parity codeword counts. Shared foundational data — every
//! crate that needs to enumerate or validate a symbol size depends on
//! `dmtx-core` already, so it lives here rather than being duplicated.

/// One entry from the IEC 16022 size table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolSize {
    /// Module columns, including the L-finder and timing border.
    pub dim_x: u16,
    /// Module rows, including the L-finder and timing border.
    pub dim_y: u16,
    /// Total codewords (data + parity).
    pub total_codewords: u16,
    /// Parity (error-correction) codewords.
    pub parity_codewords: u16,
}

impl SymbolSize {
    pub const fn data_codewords(&self) -> u16 {
        self.total_codewords - self.parity_codewords
    }

    /// Block layout for symbols large enough to use 2x2/4x4/6x6 data-block
    /// condensation (spec §4.8): symbols from 32..=52 condense as 2x2,
    /// 64..=104 as 4x4, 120..=144 as 6x6. `None` for symbols decoded
    /// directly with no condensation step.
    pub const fn block_factor(&self) -> Option<u16> {
        if self.dim_x != self.dim_y {
            return None;
        }
        match self.dim_x {
            32..=52 => Some(2),
            64..=104 => Some(4),
            120..=144 => Some(6),
            _ => None,
        }
    }
}

/// Square symbol sizes, `(n, total codewords, parity codewords)`.
pub const SQUARES: &[SymbolSize] = &[
    sq(10, 8, 5),
    sq(12, 12, 7),
    sq(14, 18, 10),
    sq(16, 24, 12),
    sq(18, 32, 14),
    sq(20, 40, 18),
    sq(22, 50, 20),
    sq(24, 60, 24),
    sq(26, 72, 28),
    sq(32, 98, 36),
    sq(36, 128, 42),
    sq(40, 162, 48),
    sq(44, 200, 56),
    sq(48, 242, 68),
    sq(52, 288, 84),
    sq(64, 392, 112),
    sq(72, 512, 144),
    sq(80, 648, 192),
    sq(88, 800, 224),
    sq(96, 968, 272),
    sq(104, 1152, 336),
    sq(120, 1458, 408),
    sq(132, 1800, 496),
    sq(144, 2178, 620),
];

/// Rectangular symbol sizes.
pub const RECTANGLES: &[SymbolSize] = &[
    rect(8, 18, 12, 7),
    rect(8, 32, 21, 11),
    rect(12, 26, 30, 14),
    rect(12, 36, 40, 18),
    rect(16, 36, 56, 24),
    rect(16, 48, 77, 28),
];

const fn sq(dim: u16, total: u16, parity: u16) -> SymbolSize {
    SymbolSize {
        dim_x: dim,
        dim_y: dim,
        total_codewords: total,
        parity_codewords: parity,
    }
}

const fn rect(dim_y: u16, dim_x: u16, total: u16, parity: u16) -> SymbolSize {
    SymbolSize {
        dim_x,
        dim_y,
        total_codewords: total,
        parity_codewords: parity,
    }
}

/// Iterate every valid symbol size, squares first then rectangles, in the
/// canonical IEC 16022 table order.
pub fn all_sizes() -> impl Iterator<Item = SymbolSize> {
    SQUARES.iter().copied().chain(RECTANGLES.iter().copied())
}

/// Look up the size table entry for an exact `(dim_x, dim_y)`, if valid.
pub fn lookup(dim_x: u16, dim_y: u16) -> Option<SymbolSize> {
    all_sizes().find(|s| s.dim_x == dim_x && s.dim_y == dim_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_square_matches_spec_table() {
        let s = lookup(10, 10).unwrap();
        assert_eq!(s.total_codewords, 8);
        assert_eq!(s.parity_codewords, 5);
        assert_eq!(s.data_codewords(), 3);
    }

    #[test]
    fn largest_square_uses_six_by_six_blocks() {
        let s = lookup(144, 144).unwrap();
        assert_eq!(s.block_factor(), Some(6));
    }

    #[test]
    fn rectangle_8x18_is_present() {
        let s = lookup(18, 8).unwrap();
        assert_eq!(s.total_codewords, 12);
        assert_eq!(s.parity_codewords, 7);
    }

    #[test]
    fn unknown_dimensions_are_rejected() {
        assert!(lookup(11, 11).is_none());
    }
}
