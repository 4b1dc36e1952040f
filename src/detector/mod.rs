//! Geometric detection: from a bit matrix to a codeword grid
//!
//! This module contains everything between the binarized image and the
//! linear codeword sequence:
//! - the low-level symbol alphabet and pattern tables
//! - codeword measurement and value decoding
//! - row-indicator columns and barcode metadata
//! - the detection result grid with row-number reconciliation
//! - the scanning decoder driving the whole pipeline

/// Run-length measurement to codeword value decoding
pub mod codeword_decoder;
/// Assembled columns and row-number reconciliation
pub mod detection_result;
/// Per-column codeword storage
pub mod result_column;
/// Row-indicator columns and metadata derivation
pub mod row_indicator;
/// The scanning decoder pipeline
pub mod scanning;
/// Symbol alphabet and pattern tables
pub mod symbols;

pub use detection_result::DetectionResult;
pub use result_column::DetectionResultColumn;
pub use row_indicator::RowIndicatorColumn;
