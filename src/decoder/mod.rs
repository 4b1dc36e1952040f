//! Codeword-level decoding: field arithmetic and error correction
//!
//! Everything below operates on codeword values after geometric detection:
//! - GF(929) scalar arithmetic over compile-time tables
//! - polynomials over the field
//! - Reed-Solomon style error correction (Euclid, Chien search, Forney)

pub mod config;
/// Syndrome computation, locator/evaluator polynomials, in-place repair
pub mod error_correction;
/// GF(929) scalar operations
pub mod modulus_gf;
/// Normalized polynomials over GF(929)
pub mod modulus_poly;

pub use error_correction::correct_errors;
pub use modulus_gf::ModulusGF;
pub use modulus_poly::ModulusPoly;
