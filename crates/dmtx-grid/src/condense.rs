//! Block condensation (spec §4.8): large square symbols are laid out as
//! an `n x n` array of sub-blocks, each carrying its own solid L-finder
//! and alternating timing border around a `(s-2) x (s-2)` data patch
//! (`s = dim / n`). Condensing strips every sub-block's redundant
//! internal border and re-tiles just the data patches into one smaller
//! grid, sized `dim - 2*(n-1)`, wearing a single outer border.

use crate::grid::Grid;

/// Condense `full` (an `n x n` sub-block layout of side `dim`) down to
/// its data-only working grid of side `dim - 2*(n - 1)`.
pub fn condense_data_blocks(full: &Grid, blocks: usize) -> Grid {
    assert_eq!(full.dim_x, full.dim_y, "block condensation applies to square symbols");
    let dim = full.dim_x;
    let s = dim / blocks;
    let patch = s - 2;
    let condensed_dim = patch * blocks + 2;

    let mut out = Grid::new(condensed_dim, condensed_dim);

    for block_row in 0..blocks {
        for block_col in 0..blocks {
            for r in 0..patch {
                for c in 0..patch {
                    let src_row = block_row * s + 1 + r;
                    let src_col = block_col * s + 1 + c;
                    let dst_row = 1 + block_row * patch + r;
                    let dst_col = 1 + block_col * patch + c;
                    out.set(dst_row, dst_col, full.get(src_row, src_col));
                    out.set_damaged(dst_row, dst_col, full.is_damaged(src_row, src_col));
                }
            }
        }
    }

    fill_border(&mut out);
    out
}

/// Inverse of [`condense_data_blocks`]: re-tile a condensed working grid
/// of side `condensed_dim` back into the full `n x n` sub-block layout
/// of side `condensed_dim + 2*(n - 1)`, regenerating each sub-block's
/// own solid/timing border (the original border values are not
/// recoverable from the condensed grid, but condensing the expansion
/// again reproduces the original data exactly).
pub fn expand_block_layout(condensed: &Grid, blocks: usize) -> Grid {
    assert_eq!(
        condensed.dim_x, condensed.dim_y,
        "block condensation applies to square symbols"
    );
    let condensed_dim = condensed.dim_x;
    let patch = (condensed_dim - 2) / blocks;
    let s = patch + 2;
    let dim = s * blocks;

    let mut out = Grid::new(dim, dim);

    for block_row in 0..blocks {
        for block_col in 0..blocks {
            fill_sub_block_border(&mut out, block_row * s, block_col * s, s);
            for r in 0..patch {
                for c in 0..patch {
                    let src_row = 1 + block_row * patch + r;
                    let src_col = 1 + block_col * patch + c;
                    let dst_row = block_row * s + 1 + r;
                    let dst_col = block_col * s + 1 + c;
                    out.set(dst_row, dst_col, condensed.get(src_row, src_col));
                    out.set_damaged(dst_row, dst_col, condensed.is_damaged(src_row, src_col));
                }
            }
        }
    }

    out
}

fn fill_border(grid: &mut Grid) {
    let dim = grid.dim_x;
    for row in 0..dim {
        grid.set(row, 0, true);
    }
    for col in 0..dim {
        grid.set(dim - 1, col, true);
    }
    for col in 0..dim {
        grid.set(0, col, col % 2 == 1);
    }
    for row in 0..dim {
        grid.set(row, dim - 1, row % 2 == 0);
    }
}

fn fill_sub_block_border(grid: &mut Grid, row0: usize, col0: usize, s: usize) {
    for r in 0..s {
        grid.set(row0 + r, col0, true);
    }
    for c in 0..s {
        grid.set(row0 + s - 1, col0 + c, true);
    }
    for c in 0..s {
        grid.set(row0, col0 + c, c % 2 == 1);
    }
    for r in 0..s {
        grid.set(row0 + r, col0 + s - 1, r % 2 == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_condensed(dim: usize) -> Grid {
        let mut g = Grid::new(dim, dim);
        for row in 1..dim - 1 {
            for col in 1..dim - 1 {
                g.set(row, col, (row * 7 + col * 3) % 5 == 0);
            }
        }
        fill_border(&mut g);
        g
    }

    #[test]
    fn forty_four_condenses_to_forty_two() {
        let full = Grid::new(44, 44);
        let condensed = condense_data_blocks(&full, 2);
        assert_eq!(condensed.dim_x, 42);
        assert_eq!(condensed.dim_y, 42);
    }

    #[test]
    fn expand_then_condense_round_trips() {
        let condensed = sample_condensed(42);
        let expanded = expand_block_layout(&condensed, 2);
        assert_eq!(expanded.dim_x, 44);
        let recondensed = condense_data_blocks(&expanded, 2);
        assert_eq!(recondensed, condensed);
    }

    #[test]
    fn six_by_six_block_factor_round_trips() {
        // 144x144 symbol, 6x6 sub-blocks of side 24 -> condensed side 134.
        let condensed = sample_condensed(134);
        let expanded = expand_block_layout(&condensed, 6);
        assert_eq!(expanded.dim_x, 144);
        let recondensed = condense_data_blocks(&expanded, 6);
        assert_eq!(recondensed, condensed);
    }
}
