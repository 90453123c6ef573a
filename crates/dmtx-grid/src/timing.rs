//! Timing-pattern detection (spec §4.6): for each IEC 16022 candidate
//! size, score how well two adjacent inner sides match the expected
//! alternating timing pattern, and keep the best-scoring size.

use dmtx_core::sizes::{all_sizes, SymbolSize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A scored candidate symbol size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingCandidate {
    pub size: SymbolSize,
    pub score: f64,
}

/// Expected module state at `(row, col)` of the alternating timing
/// border (top row, right column) for a `dim_x` x `dim_y` candidate.
/// Returns `None` for cells that are not part of either border.
fn expected_timing(dim_x: u16, dim_y: u16, row: usize, col: usize) -> Option<bool> {
    if row == 0 {
        return Some(col % 2 == 1);
    }
    if col as u16 == dim_x - 1 {
        return Some(row % 2 == 0);
    }
    let _ = dim_y;
    None
}

/// Score a single candidate size against a sampler `sample(row, col) ->
/// Option<bool>` (module grid coordinates, `None` if unsampled/out of
/// the image). Score is the fraction of timing-border cells whose
/// sampled state matches the expected alternating pattern.
pub fn score_candidate(size: SymbolSize, sample: &impl Fn(usize, usize) -> Option<bool>) -> f64 {
    let mut hits = 0usize;
    let mut total = 0usize;
    for row in 0..size.dim_y as usize {
        for col in 0..size.dim_x as usize {
            if let Some(expected) = expected_timing(size.dim_x, size.dim_y, row, col) {
                total += 1;
                if sample(row, col) == Some(expected) {
                    hits += 1;
                }
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Find the best-scoring candidate size, given a per-size sampler
/// factory (the caller resamples the image at each candidate's module
/// resolution via a perimeter-derived homography).
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(sampler_for)))]
pub fn best_candidate(
    mut sampler_for: impl FnMut(SymbolSize) -> Box<dyn Fn(usize, usize) -> Option<bool>>,
    min_score: f64,
) -> Option<TimingCandidate> {
    let best = all_sizes()
        .map(|size| {
            let sample = sampler_for(size);
            TimingCandidate {
                size,
                score: score_candidate(size, &sample),
            }
        })
        .filter(|c| c.score >= min_score)
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap());
    match best {
        Some(c) => log::debug!("timing pattern matched {}x{} at score {:.3}", c.size.dim_x, c.size.dim_y, c.score),
        None => log::debug!("no candidate symbol size matched the timing pattern"),
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_pattern_scores_one() {
        let size = SymbolSize {
            dim_x: 10,
            dim_y: 10,
            total_codewords: 8,
            parity_codewords: 5,
        };
        let sample = |row: usize, col: usize| expected_timing(10, 10, row, col);
        assert_eq!(score_candidate(size, &sample), 1.0);
    }

    #[test]
    fn inverted_pattern_scores_zero() {
        let size = SymbolSize {
            dim_x: 10,
            dim_y: 10,
            total_codewords: 8,
            parity_codewords: 5,
        };
        let sample = |row: usize, col: usize| expected_timing(10, 10, row, col).map(|b| !b);
        assert_eq!(score_candidate(size, &sample), 0.0);
    }

    #[test]
    fn best_candidate_picks_the_matching_size() {
        let target = SymbolSize {
            dim_x: 12,
            dim_y: 12,
            total_codewords: 12,
            parity_codewords: 7,
        };
        let found = best_candidate(
            |size| {
                if size.dim_x == target.dim_x && size.dim_y == target.dim_y {
                    Box::new(move |row, col| expected_timing(size.dim_x, size.dim_y, row, col))
                } else {
                    Box::new(|_, _| None)
                }
            },
            0.5,
        );
        assert_eq!(found.unwrap().size, target);
    }
}
