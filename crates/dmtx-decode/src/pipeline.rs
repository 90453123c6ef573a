//! Top-level decode orchestration: wires binarisation, edge detection,
//! segmentation, perimeter fitting/refinement (this crate) into timing
//! detection and grid sampling (`dmtx-grid`), codeword placement
//! (`dmtx-placement`), Reed-Solomon correction (`dmtx-rs`) and payload
//! semantics (`dmtx-semantics`), with an optional print-quality pass
//! (`dmtx-quality`).

use dmtx_core::sizes::{all_sizes, SymbolSize, RECTANGLES};
use dmtx_core::{GrayImage, GrayImageView, Perimeter};
use dmtx_grid::{best_candidate, condense_data_blocks, sample_grid, Grid};
use dmtx_placement::placement_table_for;
use dmtx_quality::{grade_symbol, ReflectanceStats};
use dmtx_rs::ReedSolomonDecoder;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::DecodeConfig;
use crate::edges::detect_edges;
use crate::error::DecodeError;
use crate::perimeter_fit::{fit_perimeter, shrink_perimeter, validate_perimeter};
use crate::preprocess::{darklight, to_grayscale};
use crate::refine::{contract_perimeter_sides, expand_perimeter_sides};
use crate::result::{DecodeOutput, GridRecord};
use crate::segment::{join_chains, trace_chains};

fn known_aspect_ratios() -> Vec<f64> {
    RECTANGLES
        .iter()
        .map(|r| r.dim_x as f64 / r.dim_y as f64)
        .collect()
}

/// Oriented grid for a full symbol interior region, i.e. with block
/// condensation already applied for symbols large enough to need it.
fn grid_for_size(
    image: &GrayImageView<'_>,
    perimeter: &Perimeter,
    size: SymbolSize,
    radius: f64,
) -> Grid {
    let raw = sample_grid(image, perimeter, size.dim_x as usize, size.dim_y as usize, radius);
    let oriented = raw.oriented();
    match size.block_factor() {
        Some(n) => condense_data_blocks(&oriented, n as usize),
        None => oriented,
    }
}

/// Decode the codewords held in an (already condensed if applicable)
/// grid, returning `(data_codewords, errors, erasures)` on a
/// successful Reed-Solomon correction.
fn extract_and_correct(grid: &Grid, size: SymbolSize) -> Option<(Vec<u8>, usize, usize)> {
    let nrow = grid.dim_y - 2;
    let ncol = grid.dim_x - 2;
    let table = placement_table_for(grid.dim_x as u16, grid.dim_y as u16).ok()?;
    if table.nrow() != nrow || table.ncol() != ncol {
        return None;
    }

    let mut word = table.extract_codewords(|row, col| grid.get(row + 1, col + 1));
    if word.len() != size.total_codewords as usize {
        return None;
    }

    let rs = ReedSolomonDecoder::new();
    let outcome = rs
        .decode(&mut word, size.parity_codewords as usize, &[])
        .ok()?;
    let data_len = size.data_codewords() as usize;
    word.truncate(data_len);
    Some((word, outcome.errors, outcome.erasures))
}

fn border_damage_fraction(grid: &Grid) -> f64 {
    let mut damaged = 0usize;
    let mut total = 0usize;
    for col in 0..grid.dim_x {
        total += 2;
        if grid.is_damaged(0, col) {
            damaged += 1;
        }
        if grid.is_damaged(grid.dim_y - 1, col) {
            damaged += 1;
        }
    }
    for row in 0..grid.dim_y {
        total += 2;
        if grid.is_damaged(row, 0) {
            damaged += 1;
        }
        if grid.is_damaged(row, grid.dim_x - 1) {
            damaged += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        100.0 * damaged as f64 / total as f64
    }
}

fn collect_module_reflectances(
    image: &GrayImageView<'_>,
    perimeter: &Perimeter,
    size: SymbolSize,
) -> Vec<f64> {
    let (dim_x, dim_y) = (size.dim_x as usize, size.dim_y as usize);
    let mut out = Vec::with_capacity(dim_x * dim_y);
    for row in 0..dim_y {
        for col in 0..dim_x {
            let u = (col as f64 + 0.5) / dim_x as f64;
            let v = (row as f64 + 0.5) / dim_y as f64;
            let p = perimeter.sample(u, v);
            out.push(dmtx_core::sample_bilinear(image, p.x as f32, p.y as f32) as f64);
        }
    }
    out
}

/// Build the print-quality report for a found symbol (spec §4.12).
fn quality_report(
    image: &GrayImageView<'_>,
    perimeter: &Perimeter,
    size: SymbolSize,
    raw_grid: &Grid,
    errors: usize,
) -> dmtx_quality::QualityReport {
    let module_reflectances = collect_module_reflectances(image, perimeter, size);
    let max_refl = module_reflectances.iter().cloned().fold(0.0, f64::max);
    let min_refl = module_reflectances.iter().cloned().fold(255.0, f64::min);
    let global_threshold = (max_refl + min_refl) / 2.0;

    let stats = ReflectanceStats {
        max_refl,
        min_refl,
        max_possible: 255.0,
        global_threshold,
        module_reflectances,
    };
    let (short, long) = perimeter.side_lengths();
    let cell_width = short / size.dim_x.min(size.dim_y) as f64;

    grade_symbol(
        &stats,
        short,
        long,
        &[],
        cell_width,
        errors,
        size.parity_codewords as usize,
        border_damage_fraction(raw_grid),
        border_damage_fraction(raw_grid),
    )
}

/// Attempt to decode a single candidate perimeter into a full
/// [`DecodeOutput`]. Returns `None` when no supported symbol size's
/// timing pattern matches well enough, or the Reed-Solomon correction
/// fails.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(image, perimeter, config)))]
fn decode_candidate(
    image: &GrayImageView<'_>,
    perimeter: &Perimeter,
    config: &DecodeConfig,
) -> Option<DecodeOutput> {
    let sizes: Vec<SymbolSize> = all_sizes()
        .filter(|s| {
            s.dim_x >= config.min_grid_dimension
                && s.dim_x <= config.max_grid_dimension
                && s.dim_y >= config.min_grid_dimension
                && s.dim_y <= config.max_grid_dimension
        })
        .collect();

    let candidate = best_candidate(
        |size| {
            let grid = sample_grid(
                image,
                perimeter,
                size.dim_x as usize,
                size.dim_y as usize,
                config.sampling_radius,
            )
            .oriented();
            Box::new(move |row: usize, col: usize| {
                if row < grid.dim_y && col < grid.dim_x {
                    Some(grid.get(row, col))
                } else {
                    None
                }
            })
        },
        0.7,
    )
    .filter(|c| sizes.contains(&c.size))?;

    let size = candidate.size;
    let raw_grid = sample_grid(
        image,
        perimeter,
        size.dim_x as usize,
        size.dim_y as usize,
        config.sampling_radius,
    )
    .oriented();
    let working_grid = match size.block_factor() {
        Some(n) => condense_data_blocks(&raw_grid, n as usize),
        None => raw_grid.clone(),
    };

    let (data_codewords, errors, erasures) = extract_and_correct(&working_grid, size)?;
    let message = dmtx_semantics::decode(&data_codewords);

    let text = if config.human_readable {
        message.human_readable()
    } else {
        message.text.clone()
    };
    let gs1_url = config
        .gs1_url_prefix
        .as_ref()
        .and_then(|prefix| dmtx_semantics::gs1_digital_link(&message, prefix));

    let quality = config
        .include_quality
        .then(|| quality_report(image, perimeter, size, &raw_grid, errors));

    log::debug!(
        "decoded {}x{} symbol, {} bytes, {} errors corrected, {} erasures",
        size.dim_x,
        size.dim_y,
        text.len(),
        errors,
        erasures
    );

    Some(DecodeOutput {
        text,
        is_gs1: message.is_gs1,
        gs1_url,
        grid: Some(GridRecord {
            size,
            perimeter: *perimeter,
            errors_corrected: errors,
            erasures,
            quality,
        }),
    })
}

/// Run the full decode pipeline over a raw pixel buffer (spec §6.2).
/// Returns an empty-text [`DecodeOutput`] (`grid: None`) when no
/// symbol is found; this is the ordinary "nothing here" outcome, not
/// an error.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(pixels, config), fields(width, height, bpp)))]
pub fn decode(
    pixels: &[u8],
    width: usize,
    height: usize,
    bpp: u8,
    config: &DecodeConfig,
) -> Result<DecodeOutput, DecodeError> {
    let image = to_grayscale(pixels, width, height, bpp)?;
    let (mean_dark, mean_light) = darklight(
        &image,
        config.darklight_sample_step,
        config.darklight_radius_percent,
    );
    let edges = detect_edges(&image, mean_dark, mean_light);

    let diag = ((width * width + height * height) as f64).sqrt();
    let chains = trace_chains(&edges, config.min_chain_length);
    let chains = join_chains(chains, 2.0, (diag * 0.05).max(8.0));

    let view = GrayImageView {
        width: image.width,
        height: image.height,
        data: &image.data,
    };
    let known_ratios = known_aspect_ratios();
    let threshold = (mean_dark as f64 + mean_light as f64) / 2.0;

    for chain in chains.iter().take(16) {
        let Some(fitted) = fit_perimeter(
            chain,
            config.orientation_bucket_degrees,
            config.ransac_iterations,
            config.ransac_inlier_distance,
        ) else {
            continue;
        };
        if !validate_perimeter(
            &fitted,
            config.corner_angle_range,
            config.aspect_ratio_tolerance,
            &known_ratios,
        ) {
            continue;
        }

        let expanded = expand_perimeter_sides(&fitted, &view, threshold, config.max_extension_percent);
        let contracted = contract_perimeter_sides(&expanded, &view, threshold, config.max_extension_percent);
        let perimeter = shrink_perimeter(&contracted, config.morphology_shrink);

        if let Some(output) = decode_candidate(&view, &perimeter, config) {
            return Ok(output);
        }
    }

    Ok(DecodeOutput::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image_decodes_to_nothing() {
        let config = DecodeConfig::default();
        let pixels = vec![255u8; 40 * 40];
        let result = decode(&pixels, 40, 40, 8, &config).unwrap();
        assert!(result.text.is_empty());
        assert!(result.grid.is_none());
    }

    #[test]
    fn rejects_unsupported_bit_depth() {
        let config = DecodeConfig::default();
        let pixels = vec![0u8; 16];
        let err = decode(&pixels, 4, 4, 16, &config).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedBitsPerPixel { bpp: 16 }));
    }
}
