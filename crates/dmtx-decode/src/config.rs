//! Decoding configuration (spec §6.2): every knob the pipeline exposes,
//! with defaults chosen to match the reference thresholds from §4.1-§4.5.

use serde::{Deserialize, Serialize};

/// Tunable parameters for one decode attempt. Deserializable so a
/// caller can load a profile from a config file rather than building
/// one in code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Emit `log`/`tracing` progress at each pipeline stage.
    pub debug: bool,
    /// Run the payload through its most specific human-readable
    /// rendering (HIBC / GS1) rather than returning the raw decoded
    /// text.
    pub human_readable: bool,
    /// Host prefix to render a GS1 Digital Link URL with, when the
    /// payload is GS1-formatted. `None` skips URL rendering.
    pub gs1_url_prefix: Option<String>,
    /// Smallest module grid side worth searching (inclusive).
    pub min_grid_dimension: u16,
    /// Largest module grid side worth searching (inclusive).
    pub max_grid_dimension: u16,
    /// Half-width, in fractional module units, of the averaging window
    /// used when classifying a sampled module as on/off/damaged.
    pub sampling_radius: f64,
    /// Pixel stride used when sampling the image for the dark/light
    /// histogram split (spec §4.1).
    pub darklight_sample_step: usize,
    /// Central region, as a percentage of image width/height, sampled
    /// for the dark/light split.
    pub darklight_radius_percent: f64,
    /// Threshold, as a percentage of the mean-light estimate, used by
    /// the fallback binarisation path.
    pub meanlight_threshold_percent: f64,
    /// Edge chains shorter than this many points are dropped before
    /// perimeter fitting.
    pub min_chain_length: usize,
    /// Orientation histogram bucket width in degrees (spec §4.4).
    pub orientation_bucket_degrees: f64,
    /// Perpendicular distance, in pixels, within which a point counts
    /// as an inlier during RANSAC side-line fitting.
    pub ransac_inlier_distance: f64,
    /// RANSAC iterations per side.
    pub ransac_iterations: usize,
    /// Acceptable interior corner angle range, in degrees.
    pub corner_angle_range: (f64, f64),
    /// Fractional tolerance applied to the aspect-ratio check against
    /// the known square/rectangle ratios.
    pub aspect_ratio_tolerance: f64,
    /// Upper bound, as a percentage of side length, `expand_perimeter_sides`
    /// will walk outward looking for the true edge.
    pub max_extension_percent: f64,
    /// Net morphological shrink applied to a fitted perimeter,
    /// `(dilate_iterations - erode_iterations) / 2` modules.
    pub morphology_shrink: f64,
    /// Compute the ISO/IEC 15415 print-quality report alongside the
    /// decoded text.
    pub include_quality: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            debug: false,
            human_readable: false,
            gs1_url_prefix: None,
            min_grid_dimension: 8,
            max_grid_dimension: 144,
            sampling_radius: 1.0,
            darklight_sample_step: 4,
            darklight_radius_percent: 50.0,
            meanlight_threshold_percent: 85.0,
            min_chain_length: 8,
            orientation_bucket_degrees: 2.0,
            ransac_inlier_distance: 2.0,
            ransac_iterations: 64,
            corner_angle_range: (70.0, 110.0),
            aspect_ratio_tolerance: 0.1,
            max_extension_percent: 10.0,
            morphology_shrink: 0.0,
            include_quality: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom, Write};

    #[test]
    fn default_config_serialises_round_trip() {
        let config = DecodeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DecodeConfig = serde_json::from_str(&json).unwrap();
        approx::assert_relative_eq!(back.sampling_radius, config.sampling_radius);
        assert_eq!(back.min_grid_dimension, config.min_grid_dimension);
    }

    #[test]
    fn config_loads_from_a_profile_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_grid_dimension": 52, "include_quality": true}}"#).unwrap();
        file.flush().unwrap();
        file.as_file_mut().seek(SeekFrom::Start(0)).unwrap();

        let mut contents = String::new();
        file.as_file_mut().read_to_string(&mut contents).unwrap();
        let config: DecodeConfig = serde_json::from_str(&contents).unwrap();
        assert_eq!(config.max_grid_dimension, 52);
        assert!(config.include_quality);
        assert_eq!(config.min_grid_dimension, DecodeConfig::default().min_grid_dimension);
    }
}
