//! Error type for `dmtx-decode`.
//!
//! Only programmer-contract violations (a malformed input buffer) are
//! modeled as `Err`. "No symbol found in this image" is not an error:
//! it is the normal `None`/empty-string outcome of [`crate::decode`]
//! (spec §7).

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("bits per pixel {bpp} is not one of the supported values (8, 24, 32)")]
    UnsupportedBitsPerPixel { bpp: u8 },
    #[error("pixel buffer of {len} bytes is too short for a {width}x{height} image at {bpp} bits per pixel")]
    BufferTooShort {
        len: usize,
        width: usize,
        height: usize,
        bpp: u8,
    },
}
