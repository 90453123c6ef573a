//! Timing-pattern detection, grid sampling/orientation and block
//! condensation for ECC 200 Data Matrix symbols.

mod condense;
mod grid;
mod sampling;
mod timing;

pub use condense::{condense_data_blocks, expand_block_layout};
pub use grid::Grid;
pub use sampling::sample_grid;
pub use timing::{best_candidate, score_candidate, TimingCandidate};
