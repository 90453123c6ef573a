//! ISO/IEC 15415 print-quality grading (spec §4.12): each metric yields
//! a percentage and a grade in `0..=4` per the GS1 2D Barcode
//! Verification Process Implementation Guideline tables. No teacher
//! crate covers this; the formulas and grade thresholds come directly
//! from `spec.md`.

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A single metric's raw percentage and its derived `0..=4` grade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metric {
    pub percentage: f64,
    pub grade: u8,
}

/// Higher percentage is better: grade rises as `value` crosses each
/// threshold in `t` (ascending).
fn grade_higher_is_better(value: f64, t: [f64; 4]) -> u8 {
    if value >= t[3] {
        4
    } else if value >= t[2] {
        3
    } else if value >= t[1] {
        2
    } else if value >= t[0] {
        1
    } else {
        0
    }
}

/// Lower percentage is better: grade rises as `value` falls below each
/// threshold in `t` (ascending).
fn grade_lower_is_better(value: f64, t: [f64; 4]) -> u8 {
    if value <= t[0] {
        4
    } else if value <= t[1] {
        3
    } else if value <= t[2] {
        2
    } else if value <= t[3] {
        1
    } else {
        0
    }
}

fn metric_higher(value: f64, t: [f64; 4]) -> Metric {
    Metric { percentage: value, grade: grade_higher_is_better(value, t) }
}

fn metric_lower(value: f64, t: [f64; 4]) -> Metric {
    Metric { percentage: value, grade: grade_lower_is_better(value, t) }
}

/// Symbol contrast: `(max_refl - min_refl) / max_possible`, as a
/// percentage. Grades at 20/40/55/70%.
pub fn symbol_contrast(max_refl: f64, min_refl: f64, max_possible: f64) -> Metric {
    let pct = 100.0 * (max_refl - min_refl) / max_possible;
    metric_higher(pct, [20.0, 40.0, 55.0, 70.0])
}

/// Minimum reflectance: 0..50% gets grade 4, >=50% gets grade 0.
pub fn minimum_reflectance(min_refl_pct: f64) -> Metric {
    let grade = if min_refl_pct < 50.0 { 4 } else { 0 };
    Metric { percentage: min_refl_pct, grade }
}

/// Modulation: mean over modules of `2*|refl - global_threshold| /
/// symbol_contrast`. Grades at 20/30/40/50%.
pub fn modulation(module_reflectances: &[f64], global_threshold: f64, symbol_contrast_pct: f64) -> Metric {
    if module_reflectances.is_empty() || symbol_contrast_pct <= 0.0 {
        return Metric { percentage: 0.0, grade: 0 };
    }
    let sum: f64 = module_reflectances
        .iter()
        .map(|&r| 2.0 * (r - global_threshold).abs() / symbol_contrast_pct)
        .sum();
    let mean = 100.0 * sum / module_reflectances.len() as f64;
    metric_higher(mean, [20.0, 30.0, 40.0, 50.0])
}

/// Contrast uniformity: the minimum per-module modulation value across
/// the symbol, same grade thresholds as [`modulation`].
pub fn contrast_uniformity(module_reflectances: &[f64], global_threshold: f64, symbol_contrast_pct: f64) -> Metric {
    if module_reflectances.is_empty() || symbol_contrast_pct <= 0.0 {
        return Metric { percentage: 0.0, grade: 0 };
    }
    let min = module_reflectances
        .iter()
        .map(|&r| 100.0 * 2.0 * (r - global_threshold).abs() / symbol_contrast_pct)
        .fold(f64::INFINITY, f64::min);
    metric_higher(min, [20.0, 30.0, 40.0, 50.0])
}

/// Axial non-uniformity: `|1 - short_side/long_side|`. Grades at
/// 12/10/8/6%.
pub fn axial_nonuniformity(short_side: f64, long_side: f64) -> Metric {
    let pct = 100.0 * (1.0 - short_side / long_side).abs();
    metric_lower(pct, [6.0, 8.0, 10.0, 12.0])
}

/// Grid non-uniformity: mean absolute offset of each cell centroid
/// from its ideal position, as a percentage of cell width. Grades at
/// 75/63/50/38%.
pub fn grid_nonuniformity(offsets: &[f64], cell_width: f64) -> Metric {
    if offsets.is_empty() || cell_width <= 0.0 {
        return Metric { percentage: 0.0, grade: 4 };
    }
    let mean = offsets.iter().map(|o| o.abs()).sum::<f64>() / offsets.len() as f64;
    let pct = 100.0 * mean / cell_width;
    metric_lower(pct, [38.0, 50.0, 63.0, 75.0])
}

/// Unused error correction: from §4.10's RS decode, the fraction of
/// error-correction capacity not consumed, as a percentage. Grades at
/// 25/37/50/62%.
pub fn unused_error_correction(errors_corrected: usize, parity_codewords: usize) -> Metric {
    if parity_codewords == 0 {
        return Metric { percentage: 0.0, grade: 0 };
    }
    let capacity = parity_codewords / 2;
    let unused = capacity.saturating_sub(errors_corrected);
    let pct = 100.0 * unused as f64 / capacity.max(1) as f64;
    metric_higher(pct, [25.0, 37.0, 50.0, 62.0])
}

/// Clock-track regularity: supplied by the caller as a percentage.
/// Grades at 25/20/15/10%.
pub fn clock_track_regularity(defect_pct: f64) -> Metric {
    metric_lower(defect_pct, [10.0, 15.0, 20.0, 25.0])
}

/// Fixed-pattern damage: supplied by the caller as a percentage.
/// Grades at 17/13/9/0%.
pub fn fixed_pattern_damage(damage_pct: f64) -> Metric {
    metric_lower(damage_pct, [0.0, 9.0, 13.0, 17.0])
}

/// The full set of ISO/IEC 15415 metrics for one decode attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct QualityReport {
    pub symbol_contrast: Metric,
    pub minimum_reflectance: Metric,
    pub modulation: Metric,
    pub contrast_uniformity: Metric,
    pub axial_nonuniformity: Metric,
    pub grid_nonuniformity: Metric,
    pub unused_error_correction: Metric,
    pub clock_track_regularity: Metric,
    pub fixed_pattern_damage: Metric,
}

impl QualityReport {
    /// Overall grade: the minimum grade across every metric.
    pub fn overall_grade(&self) -> u8 {
        [
            self.symbol_contrast.grade,
            self.minimum_reflectance.grade,
            self.modulation.grade,
            self.contrast_uniformity.grade,
            self.axial_nonuniformity.grade,
            self.grid_nonuniformity.grade,
            self.unused_error_correction.grade,
            self.clock_track_regularity.grade,
            self.fixed_pattern_damage.grade,
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }
}

/// Reflectance statistics gathered while sampling the grid, the raw
/// inputs most of the metrics above are computed from.
#[derive(Clone, Debug, PartialEq)]
pub struct ReflectanceStats {
    pub max_refl: f64,
    pub min_refl: f64,
    pub max_possible: f64,
    pub global_threshold: f64,
    pub module_reflectances: Vec<f64>,
}

/// Build the full quality report from raw reflectance sampling plus
/// the caller-supplied geometry/defect inputs spec §4.12 lists as
/// externally provided (axial sides, grid offsets, RS error count,
/// clock-track/fixed-pattern defect percentages).
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(stats, grid_offsets)))]
pub fn grade_symbol(
    stats: &ReflectanceStats,
    short_side: f64,
    long_side: f64,
    grid_offsets: &[f64],
    cell_width: f64,
    errors_corrected: usize,
    parity_codewords: usize,
    clock_track_defect_pct: f64,
    fixed_pattern_damage_pct: f64,
) -> QualityReport {
    let contrast = symbol_contrast(stats.max_refl, stats.min_refl, stats.max_possible);
    let min_refl_pct = 100.0 * stats.min_refl / stats.max_possible;
    QualityReport {
        symbol_contrast: contrast,
        minimum_reflectance: minimum_reflectance(min_refl_pct),
        modulation: modulation(&stats.module_reflectances, stats.global_threshold, contrast.percentage),
        contrast_uniformity: contrast_uniformity(&stats.module_reflectances, stats.global_threshold, contrast.percentage),
        axial_nonuniformity: axial_nonuniformity(short_side, long_side),
        grid_nonuniformity: grid_nonuniformity(grid_offsets, cell_width),
        unused_error_correction: unused_error_correction(errors_corrected, parity_codewords),
        clock_track_regularity: clock_track_regularity(clock_track_defect_pct),
        fixed_pattern_damage: fixed_pattern_damage(fixed_pattern_damage_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_symbol_contrast_grades_a() {
        let m = symbol_contrast(255.0, 0.0, 255.0);
        assert_eq!(m.grade, 4);
    }

    #[test]
    fn low_minimum_reflectance_grades_top() {
        assert_eq!(minimum_reflectance(10.0).grade, 4);
        assert_eq!(minimum_reflectance(80.0).grade, 0);
    }

    #[test]
    fn uniform_modules_grade_perfect_modulation() {
        let reflectances = vec![255.0, 0.0, 255.0, 0.0];
        let m = modulation(&reflectances, 127.5, 100.0);
        assert_eq!(m.grade, 4);
    }

    #[test]
    fn square_symbol_has_no_axial_nonuniformity() {
        let m = axial_nonuniformity(40.0, 40.0);
        assert_eq!(m.grade, 4);
    }

    #[test]
    fn fully_unused_error_correction_grades_a() {
        let m = unused_error_correction(0, 10);
        assert_eq!(m.grade, 4);
    }

    #[test]
    fn overall_grade_is_the_minimum_metric() {
        let report = QualityReport {
            symbol_contrast: Metric { percentage: 90.0, grade: 4 },
            minimum_reflectance: Metric { percentage: 10.0, grade: 4 },
            modulation: Metric { percentage: 90.0, grade: 4 },
            contrast_uniformity: Metric { percentage: 90.0, grade: 4 },
            axial_nonuniformity: Metric { percentage: 0.0, grade: 4 },
            grid_nonuniformity: Metric { percentage: 0.0, grade: 4 },
            unused_error_correction: Metric { percentage: 90.0, grade: 4 },
            clock_track_regularity: Metric { percentage: 50.0, grade: 0 },
            fixed_pattern_damage: Metric { percentage: 0.0, grade: 4 },
        };
        assert_eq!(report.overall_grade(), 0);
    }
}
