//! Core image and geometry types shared across the dmtx decoding pipeline.
//!
//! This crate is intentionally small and purely geometric/numeric. It does
//! *not* know anything about Data Matrix semantics — that lives in
//! `dmtx-decode`, `dmtx-placement`, `dmtx-rs` and `dmtx-semantics`.

mod geometry;
mod image;
pub mod logger;
pub mod sizes;

pub use geometry::{
    angle_between, line_intersection, normalize_angle, perpendicular_distance, Line, Perimeter,
    Point,
};
pub use image::{sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView};
pub use sizes::{SymbolSize, RECTANGLES, SQUARES};
