//! Assembled detection state and row-number reconciliation
//!
//! Holds one [`DetectionResultColumn`] per barcode column (indicators
//! included) and propagates barcode row numbers across the grid: rows where
//! both indicators agree stamp the whole image row, then each indicator
//! stamps on its own with a bounded miss allowance, and finally unresolved
//! cells adopt the row of a neighbor sharing their checksum bucket. The
//! process iterates until the number of unassigned codewords stops
//! shrinking.

use crate::detector::row_indicator;
use crate::detector::symbols::MAX_CODEWORDS_IN_BARCODE;
use crate::models::{BarcodeMetadata, BoundingBox, Codeword};

use super::result_column::DetectionResultColumn;

/// Consecutive stamping misses tolerated before an indicator row is dropped
const ADJUST_ROW_NUMBER_SKIP: usize = 2;

/// Columns and metadata of one detected symbol
#[derive(Debug)]
pub struct DetectionResult {
    metadata: BarcodeMetadata,
    bounding_box: BoundingBox,
    columns: Vec<Option<DetectionResultColumn>>,
}

impl DetectionResult {
    /// Create a result with all columns empty
    pub fn new(metadata: BarcodeMetadata, bounding_box: BoundingBox) -> Self {
        let columns = vec![None; metadata.column_count() as usize + 2];
        Self {
            metadata,
            bounding_box,
            columns,
        }
    }

    /// Number of data columns
    pub fn barcode_column_count(&self) -> usize {
        self.metadata.column_count() as usize
    }

    /// Number of barcode rows
    pub fn barcode_row_count(&self) -> usize {
        self.metadata.row_count() as usize
    }

    /// Error correction level of the symbol
    pub fn barcode_ec_level(&self) -> u8 {
        self.metadata.error_correction_level()
    }

    /// The current bounding box
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Replace the bounding box after refinement
    pub fn set_bounding_box(&mut self, bounding_box: BoundingBox) {
        self.bounding_box = bounding_box;
    }

    /// Column at `index` (0 = left indicator, last = right indicator)
    pub fn column(&self, index: usize) -> Option<&DetectionResultColumn> {
        self.columns.get(index).and_then(|c| c.as_ref())
    }

    /// Mutable column access
    pub fn column_mut(&mut self, index: usize) -> Option<&mut DetectionResultColumn> {
        self.columns.get_mut(index).and_then(|c| c.as_mut())
    }

    /// Install a column
    pub fn set_column(&mut self, index: usize, column: Option<DetectionResultColumn>) {
        if index < self.columns.len() {
            self.columns[index] = column;
        }
    }

    /// Reconcile row numbers across the grid and return the columns
    pub fn adjusted_columns(&mut self) -> &[Option<DetectionResultColumn>] {
        let metadata = self.metadata;
        let last = self.barcode_column_count() + 1;
        if let Some(column) = self.columns[0].as_mut() {
            row_indicator::adjust_complete_row_numbers(column, true, &metadata);
        }
        if let Some(column) = self.columns[last].as_mut() {
            row_indicator::adjust_complete_row_numbers(column, false, &metadata);
        }
        let mut unadjusted_count = MAX_CODEWORDS_IN_BARCODE;
        loop {
            let previous_count = unadjusted_count;
            unadjusted_count = self.adjust_row_numbers();
            if unadjusted_count == 0 || unadjusted_count >= previous_count {
                break;
            }
        }
        &self.columns
    }

    fn adjust_row_numbers(&mut self) -> usize {
        let unadjusted_count = self.adjust_row_numbers_by_row();
        if unadjusted_count == 0 {
            return 0;
        }
        for barcode_column in 1..=self.barcode_column_count() {
            let row_count = self.columns[barcode_column]
                .as_ref()
                .map(|c| c.codewords().len())
                .unwrap_or(0);
            for row_index in 0..row_count {
                let codeword = self.columns[barcode_column]
                    .as_ref()
                    .and_then(|c| c.codewords()[row_index]);
                let Some(codeword) = codeword else { continue };
                if !codeword.has_valid_row_number() {
                    self.adjust_row_number_from_neighbors(barcode_column, row_index);
                }
            }
        }
        unadjusted_count
    }

    /// Give an unassigned codeword the row of a close neighbor with the same
    /// bucket, preferring vertical neighbors over diagonal ones
    fn adjust_row_number_from_neighbors(&mut self, barcode_column: usize, row_index: usize) {
        let get = |column: usize, row: i32| -> Option<Codeword> {
            if row < 0 {
                return None;
            }
            self.columns
                .get(column)
                .and_then(|c| c.as_ref())
                .and_then(|c| c.codewords().get(row as usize).copied().flatten())
        };

        let Some(mut codeword) = get(barcode_column, row_index as i32) else {
            return;
        };
        let previous_column = barcode_column - 1;
        let next_column = if barcode_column + 1 < self.columns.len()
            && self.columns[barcode_column + 1].is_some()
        {
            barcode_column + 1
        } else {
            previous_column
        };
        let row = row_index as i32;
        let neighbors = [
            get(barcode_column, row - 1),
            get(barcode_column, row + 1),
            get(previous_column, row),
            get(next_column, row),
            get(previous_column, row - 1),
            get(next_column, row - 1),
            get(previous_column, row + 1),
            get(next_column, row + 1),
            get(barcode_column, row - 2),
            get(barcode_column, row + 2),
            get(previous_column, row - 2),
            get(next_column, row - 2),
            get(previous_column, row + 2),
            get(next_column, row + 2),
        ];
        for other in neighbors.into_iter().flatten() {
            if other.has_valid_row_number() && other.bucket() == codeword.bucket() {
                codeword.set_row_number(other.row_number());
                if let Some(column) = self.columns[barcode_column].as_mut() {
                    column.codewords_mut()[row_index] = Some(codeword);
                }
                return;
            }
        }
    }

    fn adjust_row_numbers_by_row(&mut self) -> usize {
        self.adjust_row_numbers_from_both_indicators();
        self.adjust_row_numbers_from_indicator(true) + self.adjust_row_numbers_from_indicator(false)
    }

    /// Stamp image rows where the left and right indicator agree
    fn adjust_row_numbers_from_both_indicators(&mut self) {
        let last = self.barcode_column_count() + 1;
        let (Some(left), Some(right)) = (&self.columns[0], &self.columns[last]) else {
            return;
        };
        let stamped_rows: Vec<Option<i32>> = left
            .codewords()
            .iter()
            .zip(right.codewords())
            .map(|(l, r)| match (l, r) {
                (Some(l), Some(r)) if l.row_number() == r.row_number() => Some(l.row_number()),
                _ => None,
            })
            .collect();
        for barcode_column in 1..=self.barcode_column_count() {
            let Some(column) = self.columns[barcode_column].as_mut() else {
                continue;
            };
            for (row_index, stamped) in stamped_rows.iter().enumerate() {
                let Some(row_number) = *stamped else { continue };
                if row_index >= column.codewords().len() {
                    break;
                }
                let slot = &mut column.codewords_mut()[row_index];
                if let Some(codeword) = slot {
                    codeword.set_row_number(row_number);
                    if !codeword.has_valid_row_number() {
                        *slot = None;
                    }
                }
            }
        }
    }

    /// Stamp rows from one indicator, tolerating a bounded run of misses;
    /// returns how many codewords still have no valid row
    fn adjust_row_numbers_from_indicator(&mut self, is_left: bool) -> usize {
        let indicator_index = if is_left {
            0
        } else {
            self.barcode_column_count() + 1
        };
        let Some(indicator) = &self.columns[indicator_index] else {
            return 0;
        };
        let indicator_rows: Vec<Option<i32>> = indicator
            .codewords()
            .iter()
            .map(|c| c.map(|c| c.row_number()))
            .collect();

        let column_count = self.barcode_column_count();
        let mut unadjusted_count = 0;
        for (row_index, indicator_row) in indicator_rows.iter().enumerate() {
            let Some(indicator_row_number) = *indicator_row else {
                continue;
            };
            let mut invalid_row_counts = 0;
            let columns: Vec<usize> = if is_left {
                (1..=column_count).collect()
            } else {
                (1..=column_count).rev().collect()
            };
            for barcode_column in columns {
                if invalid_row_counts >= ADJUST_ROW_NUMBER_SKIP {
                    break;
                }
                let Some(column) = self.columns[barcode_column].as_mut() else {
                    continue;
                };
                if row_index >= column.codewords().len() {
                    continue;
                }
                if let Some(codeword) = &mut column.codewords_mut()[row_index] {
                    invalid_row_counts =
                        adjust_row_number_if_valid(indicator_row_number, invalid_row_counts, codeword);
                    if !codeword.has_valid_row_number() {
                        unadjusted_count += 1;
                    }
                }
            }
        }
        unadjusted_count
    }
}

fn adjust_row_number_if_valid(
    indicator_row_number: i32,
    invalid_row_counts: usize,
    codeword: &mut Codeword,
) -> usize {
    if codeword.has_valid_row_number() {
        return invalid_row_counts;
    }
    if codeword.is_valid_row_number(indicator_row_number) {
        codeword.set_row_number(indicator_row_number);
        0
    } else {
        invalid_row_counts + 1
    }
}
