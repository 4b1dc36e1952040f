//! Failure taxonomy for the decode pipeline
//!
//! [`DecodeError`] is the single public failure type returned by the
//! decoder. Its variants exist for diagnostics and logging; callers are
//! documented to treat any variant as "no symbol decoded". Local detection
//! gaps inside the pipeline are represented as `Option::None`, not errors.

use thiserror::Error;

/// Reasons a decode attempt produced no symbol
///
/// Every variant means the same thing to a caller — no codewords were
/// recovered — but they are kept distinct for diagnostics and logging.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The corner geometry was insufficient or inconsistent to locate a symbol
    #[error("symbol geometry could not be established")]
    Geometry,

    /// No codeword grid could be assembled from the seeded region
    #[error("no barcode detected")]
    Detection,

    /// More erasures than the error-correction capacity allows
    #[error("too many erasures to correct")]
    ErasureOverflow,

    /// The codeword sequence had more errors than could be repaired
    #[error("codewords could not be corrected")]
    Uncorrectable,

    /// The decoded codeword count disagreed with the embedded length
    #[error("codeword count mismatch")]
    CountMismatch,
}

/// Division by zero in GF(929)
///
/// Returned by field inversion when the operand is zero, the only input
/// with no multiplicative inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("division by zero in GF(929)")]
pub struct DivisionByZeroError;
