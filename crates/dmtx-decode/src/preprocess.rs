//! Grayscale conversion and binarisation (spec §4.1).
//!
//! Per the resolved Open Question in `SPEC_FULL.md`, color is reduced
//! to luminance with a single plain BT.601-weighted average: no HSV or
//! CIELAB path, and none of the original implementation's documented
//! `remove_colour` bug is replicated here.

use dmtx_core::GrayImage;

use crate::error::DecodeError;

/// Convert a raw `width` x `height` pixel buffer at `bpp` bits per
/// pixel (8 = grayscale, 24 = RGB, 32 = RGBA) into a [`GrayImage`].
pub fn to_grayscale(
    pixels: &[u8],
    width: usize,
    height: usize,
    bpp: u8,
) -> Result<GrayImage, DecodeError> {
    let channels = match bpp {
        8 => 1,
        24 => 3,
        32 => 4,
        _ => return Err(DecodeError::UnsupportedBitsPerPixel { bpp }),
    };
    let expected_len = width * height * channels;
    if pixels.len() < expected_len {
        return Err(DecodeError::BufferTooShort {
            len: pixels.len(),
            width,
            height,
            bpp,
        });
    }

    let data = if channels == 1 {
        pixels[..expected_len].to_vec()
    } else {
        pixels
            .chunks_exact(channels)
            .take(width * height)
            .map(|px| {
                let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
                (0.299 * r + 0.587 * g + 0.114 * b).round() as u8
            })
            .collect()
    };

    Ok(GrayImage {
        width,
        height,
        data,
    })
}

/// Dark/light class means for `img` (spec §4.1): samples a central ROI
/// (`radius_percent` of width/height, centred) on a `sample_step`
/// stride, then finds the two-class split of the sampled histogram
/// that minimises total within-class variance, ties broken toward the
/// higher threshold. Returns `(dark_mean, light_mean)`.
pub fn darklight(img: &GrayImage, sample_step: usize, radius_percent: f64) -> (u8, u8) {
    let half_w = (img.width as f64 * radius_percent / 200.0) as usize;
    let half_h = (img.height as f64 * radius_percent / 200.0) as usize;
    let cx = img.width / 2;
    let cy = img.height / 2;
    let x0 = cx.saturating_sub(half_w);
    let x1 = (cx + half_w).min(img.width.saturating_sub(1));
    let y0 = cy.saturating_sub(half_h);
    let y1 = (cy + half_h).min(img.height.saturating_sub(1));

    let mut histogram = [0u32; 256];
    let step = sample_step.max(1);
    let mut y = y0;
    while y <= y1 {
        let mut x = x0;
        while x <= x1 {
            histogram[img.data[y * img.width + x] as usize] += 1;
            x += step;
        }
        y += step;
    }

    let total: u64 = histogram.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return (0, 255);
    }

    let mut best_t = 0usize;
    let mut best_variance = f64::INFINITY;
    let mut cumulative_count = 0u64;
    let mut cumulative_sum = 0f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * c as f64)
        .sum();

    for t in 0..255 {
        cumulative_count += histogram[t] as u64;
        cumulative_sum += t as f64 * histogram[t] as f64;
        if cumulative_count == 0 || cumulative_count == total {
            continue;
        }
        let w0 = cumulative_count as f64;
        let w1 = (total - cumulative_count) as f64;
        let mean0 = cumulative_sum / w0;
        let mean1 = (total_sum - cumulative_sum) / w1;

        let mut var0 = 0.0;
        let mut var1 = 0.0;
        for v in 0..256 {
            let c = histogram[v] as f64;
            if v <= t {
                var0 += c * (v as f64 - mean0).powi(2);
            } else {
                var1 += c * (v as f64 - mean1).powi(2);
            }
        }
        let within = var0 + var1;
        if within <= best_variance {
            best_variance = within;
            best_t = t;
        }
    }

    let dark_values: Vec<f64> = (0..=best_t)
        .filter(|&v| histogram[v] > 0)
        .flat_map(|v| std::iter::repeat(v as f64).take(histogram[v] as usize))
        .collect();
    let light_values: Vec<f64> = (best_t + 1..256)
        .filter(|&v| histogram[v] > 0)
        .flat_map(|v| std::iter::repeat(v as f64).take(histogram[v] as usize))
        .collect();

    let mean_of = |vs: &[f64], fallback: u8| -> u8 {
        if vs.is_empty() {
            fallback
        } else {
            (vs.iter().sum::<f64>() / vs.len() as f64).round() as u8
        }
    };

    (mean_of(&dark_values, 0), mean_of(&light_values, 255))
}

/// Binarise `img` against the global mean, scaled by `threshold_pct`
/// (spec §4.1's fallback path, used when no dark/light split is
/// reliable). Returns a `true` = dark occupancy grid, inverted if more
/// than 30% of pixels would otherwise come out dark.
pub fn meanlight_threshold(img: &GrayImage, threshold_pct: f64) -> Vec<bool> {
    let mean: f64 = img.data.iter().map(|&v| v as f64).sum::<f64>() / img.data.len().max(1) as f64;
    let threshold = mean * threshold_pct / 100.0;

    let mut bin: Vec<bool> = img.data.iter().map(|&v| (v as f64) < threshold).collect();
    let active = bin.iter().filter(|&&b| b).count();
    if active as f64 > 0.3 * bin.len() as f64 {
        for b in bin.iter_mut() {
            *b = !*b;
        }
    }
    bin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_rgb_averages_channels() {
        let pixels = vec![255, 255, 255, 0, 0, 0];
        let img = to_grayscale(&pixels, 2, 1, 24).unwrap();
        assert_eq!(img.data, vec![255, 0]);
    }

    #[test]
    fn rejects_unsupported_bit_depth() {
        let pixels = vec![0u8; 4];
        assert!(matches!(
            to_grayscale(&pixels, 2, 2, 16),
            Err(DecodeError::UnsupportedBitsPerPixel { bpp: 16 })
        ));
    }

    #[test]
    fn darklight_splits_a_bimodal_image() {
        let mut data = vec![20u8; 50 * 50];
        for row in 0..50 {
            for col in 25..50 {
                data[row * 50 + col] = 220;
            }
        }
        let img = GrayImage {
            width: 50,
            height: 50,
            data,
        };
        let (dark, light) = darklight(&img, 1, 100.0);
        assert!(dark < 50);
        assert!(light > 200);
    }

    #[test]
    fn meanlight_threshold_keeps_minority_class_dark() {
        let mut data = vec![255u8; 100];
        data[0] = 0;
        data[1] = 0;
        let img = GrayImage {
            width: 10,
            height: 10,
            data,
        };
        let bin = meanlight_threshold(&img, 85.0);
        assert!(bin[0]);
        assert!(!bin[50]);
    }
}
