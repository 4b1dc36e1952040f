//! RustPDF417 - PDF417 stacked barcode detection and decoding
//!
//! Decodes PDF417 symbols out of a binarized [`BitMatrix`]: locates the
//! row-indicator columns from caller-supplied corner seeds, reconstructs the
//! logical codeword grid despite skew and partial damage, and repairs the
//! codeword sequence with Reed-Solomon style error correction over GF(929).
//!
//! Image acquisition and binarization happen before this crate (any
//! thresholding producing a bit matrix works), and the text-level
//! decompaction of the corrected codewords happens after it.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Codeword-level decoding (field arithmetic, error correction)
pub mod decoder;
/// Geometric detection (symbol tables, grid assembly, scanning decoder)
pub mod detector;
/// Failure taxonomy
pub mod error;
/// Core data structures (BitMatrix, BoundingBox, Codeword, ...)
pub mod models;

pub use error::DecodeError;
pub use models::{BitMatrix, DecodedCodewords, Point};

use rayon::prelude::*;

/// Corner seed points produced by an external coarse locator
///
/// At least one full side (the left pair or the right pair) must be present;
/// the missing side is substituted with the image edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CornerSeeds {
    /// Top-left corner of the symbol, if known
    pub top_left: Option<Point>,
    /// Bottom-left corner of the symbol, if known
    pub bottom_left: Option<Point>,
    /// Top-right corner of the symbol, if known
    pub top_right: Option<Point>,
    /// Bottom-right corner of the symbol, if known
    pub bottom_right: Option<Point>,
}

impl CornerSeeds {
    /// Seeds with all four corners known
    pub fn full(top_left: Point, bottom_left: Point, top_right: Point, bottom_right: Point) -> Self {
        Self {
            top_left: Some(top_left),
            bottom_left: Some(bottom_left),
            top_right: Some(top_right),
            bottom_right: Some(bottom_right),
        }
    }

    /// Seeds with only the left side known
    pub fn left(top_left: Point, bottom_left: Point) -> Self {
        Self {
            top_left: Some(top_left),
            bottom_left: Some(bottom_left),
            ..Self::default()
        }
    }

    /// Seeds with only the right side known
    pub fn right(top_right: Point, bottom_right: Point) -> Self {
        Self {
            top_right: Some(top_right),
            bottom_right: Some(bottom_right),
            ..Self::default()
        }
    }
}

/// Decode the symbol at the seeded location
///
/// `min_codeword_width`/`max_codeword_width` are pixel estimates of the
/// codeword width derived from the corner geometry; the sweep tightens them
/// adaptively as codewords are found. On success the corrected codeword
/// sequence is returned together with the erasure and corrected-error
/// counts. The input matrix is only read; the call allocates all of its
/// scratch state, so independent calls can run concurrently.
pub fn decode(
    image: &BitMatrix,
    seeds: &CornerSeeds,
    min_codeword_width: i32,
    max_codeword_width: i32,
) -> Result<DecodedCodewords, DecodeError> {
    detector::scanning::decode(
        image,
        seeds.top_left,
        seeds.bottom_left,
        seeds.top_right,
        seeds.bottom_right,
        min_codeword_width,
        max_codeword_width,
    )
}

/// Try several corner seed hypotheses in parallel; first success wins
///
/// Useful when the coarse locator produced multiple candidate regions or
/// corner orderings. Decode attempts share no mutable state, so they run on
/// the rayon pool.
pub fn decode_any(
    image: &BitMatrix,
    candidates: &[CornerSeeds],
    min_codeword_width: i32,
    max_codeword_width: i32,
) -> Result<DecodedCodewords, DecodeError> {
    candidates
        .par_iter()
        .find_map_any(|seeds| decode(image, seeds, min_codeword_width, max_codeword_width).ok())
        .ok_or(DecodeError::Detection)
}
