use crate::decoder::config;
use crate::models::{BoundingBox, Codeword};

/// Per-row codeword storage for one barcode column
///
/// Rows are confined to the bounding box, stored densely and indexed by
/// `image_row - min_y`.
#[derive(Debug, Clone)]
pub struct DetectionResultColumn {
    bounding_box: BoundingBox,
    codewords: Vec<Option<Codeword>>,
}

impl DetectionResultColumn {
    /// Create an empty column covering the bounding box rows
    pub fn new(bounding_box: &BoundingBox) -> Self {
        let rows = (bounding_box.max_y() - bounding_box.min_y() + 1).max(0) as usize;
        Self {
            bounding_box: bounding_box.clone(),
            codewords: vec![None; rows],
        }
    }

    /// The box this column was scanned within
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Index of an image row in the dense storage
    pub fn image_row_to_codeword_index(&self, image_row: i32) -> usize {
        (image_row - self.bounding_box.min_y()).max(0) as usize
    }

    /// Store the codeword detected at `image_row`
    pub fn set_codeword(&mut self, image_row: i32, codeword: Codeword) {
        let index = self.image_row_to_codeword_index(image_row);
        if index < self.codewords.len() {
            self.codewords[index] = Some(codeword);
        }
    }

    /// The codeword at exactly `image_row`
    pub fn codeword(&self, image_row: i32) -> Option<Codeword> {
        self.codewords
            .get(self.image_row_to_codeword_index(image_row))
            .copied()
            .flatten()
    }

    /// The codeword at `image_row` or the nearest one within a few rows
    pub fn codeword_nearby(&self, image_row: i32) -> Option<Codeword> {
        if let Some(codeword) = self.codeword(image_row) {
            return Some(codeword);
        }
        let index = self.image_row_to_codeword_index(image_row);
        for distance in 1..config::max_nearby_rows() {
            if index >= distance {
                if let Some(codeword) = self.codewords[index - distance] {
                    return Some(codeword);
                }
            }
            if index + distance < self.codewords.len() {
                if let Some(codeword) = self.codewords[index + distance] {
                    return Some(codeword);
                }
            }
        }
        None
    }

    /// All rows of the column
    pub fn codewords(&self) -> &[Option<Codeword>] {
        &self.codewords
    }

    /// Mutable access for grid reconciliation
    pub fn codewords_mut(&mut self) -> &mut [Option<Codeword>] {
        &mut self.codewords
    }
}
