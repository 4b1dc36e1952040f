pub mod barcode_value;
pub mod bounding_box;
pub mod codeword;
pub mod decoded;
pub mod matrix;
pub mod metadata;
pub mod point;

pub use barcode_value::BarcodeValue;
pub use bounding_box::BoundingBox;
pub use codeword::{BARCODE_ROW_UNKNOWN, Codeword};
pub use decoded::DecodedCodewords;
pub use matrix::BitMatrix;
pub use metadata::BarcodeMetadata;
pub use point::Point;
