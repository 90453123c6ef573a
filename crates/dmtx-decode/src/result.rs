//! Decode output types (spec §6.2).

use dmtx_core::{Perimeter, SymbolSize};
use dmtx_quality::QualityReport;

/// Per-symbol metrics gathered while decoding, returned alongside the
/// text when a caller wants to inspect the grid a decode settled on.
#[derive(Clone, Debug, PartialEq)]
pub struct GridRecord {
    pub size: SymbolSize,
    pub perimeter: Perimeter,
    pub errors_corrected: usize,
    pub erasures: usize,
    pub quality: Option<QualityReport>,
}

/// The full outcome of one decode attempt: a possibly-empty decoded
/// string plus the grid record, when a symbol was found.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DecodeOutput {
    pub text: String,
    pub is_gs1: bool,
    pub gs1_url: Option<String>,
    pub grid: Option<GridRecord>,
}
