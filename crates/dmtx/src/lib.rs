//! Public facade for decoding ECC 200 Data Matrix barcodes from raster
//! images (spec §6.2).
//!
//! [`decode`] is the stable entry point: hand it a raw pixel buffer
//! plus its width/height/bits-per-pixel and it runs the full
//! `dmtx-decode` pipeline. With the `image` feature enabled,
//! [`decode_image`] also accepts anything the `image` crate can open.

pub use dmtx_core::logger;
pub use dmtx_decode::{decode as decode_raw, DecodeConfig, DecodeOutput, GridRecord};
pub use dmtx_quality::{Metric, QualityReport};
pub use dmtx_semantics::Message;

use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors surfaced by the facade. Wraps [`dmtx_decode::DecodeError`]
/// and, with the `image` feature, image-loading failures. "No symbol
/// found" is not an error: see [`DecodeOutput`].
#[derive(Error, Debug)]
pub enum DmtxError {
    #[error(transparent)]
    Decode(#[from] dmtx_decode::DecodeError),
    #[cfg(feature = "image")]
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
}

/// Decode a raw `width` x `height` pixel buffer at `bpp` bits per
/// pixel (8 = grayscale, 24 = RGB, 32 = RGBA).
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(pixels, config), fields(width, height, bpp)))]
pub fn decode(
    pixels: &[u8],
    width: usize,
    height: usize,
    bpp: u8,
    config: &DecodeConfig,
) -> Result<DecodeOutput, DmtxError> {
    dmtx_decode::decode(pixels, width, height, bpp, config).map_err(DmtxError::Decode)
}

#[cfg(feature = "image")]
mod image_support {
    use super::{DecodeConfig, DecodeOutput, DmtxError};
    use image::GenericImageView;

    /// Open an image file with the `image` crate and decode it.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(config)))]
    pub fn decode_image(
        path: impl AsRef<std::path::Path>,
        config: &DecodeConfig,
    ) -> Result<DecodeOutput, DmtxError> {
        let img = image::open(path)?;
        let (width, height) = img.dimensions();
        let gray = img.to_luma8();
        super::decode(gray.as_raw(), width as usize, height as usize, 8, config)
    }
}

#[cfg(feature = "image")]
pub use image_support::decode_image;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_a_blank_image_finds_nothing() {
        let config = DecodeConfig::default();
        let pixels = vec![255u8; 30 * 30];
        let output = decode(&pixels, 30, 30, 8, &config).unwrap();
        assert!(output.grid.is_none());
    }
}
