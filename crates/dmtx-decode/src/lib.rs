//! Image preconditioning, perimeter fitting and top-level
//! orchestration for decoding ECC 200 Data Matrix symbols from raster
//! images.
//!
//! [`decode`] runs the full pipeline: grayscale conversion and
//! dark/light binarisation (§4.1), Canny-style edge detection (§4.2),
//! chain segmentation (§4.3), perimeter fitting and refinement
//! (§4.4-§4.5), timing-pattern/grid detection and sampling (delegated
//! to `dmtx-grid`), codeword placement (`dmtx-placement`),
//! Reed-Solomon correction (`dmtx-rs`) and payload decoding
//! (`dmtx-semantics`), with an optional ISO/IEC 15415 print-quality
//! pass (`dmtx-quality`).

mod config;
mod edges;
mod error;
mod perimeter_fit;
mod pipeline;
mod preprocess;
mod refine;
mod result;
mod segment;

pub use config::DecodeConfig;
pub use error::DecodeError;
pub use pipeline::decode;
pub use result::{DecodeOutput, GridRecord};

pub use preprocess::{darklight, meanlight_threshold, to_grayscale};
pub use segment::{Chain, Join};
