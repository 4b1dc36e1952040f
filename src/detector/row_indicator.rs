//! Row-indicator column handling
//!
//! The leftmost and rightmost codeword columns encode per-row metadata: the
//! row number plus, cycling over three rows, the total row count, the error
//! correction level and the column count. This module derives
//! [`BarcodeMetadata`] from an indicator column by majority vote, prunes
//! codewords inconsistent with the vote, and exposes per-row heights used to
//! infer rows missing from the bounding box.

use log::debug;

use crate::detector::result_column::DetectionResultColumn;
use crate::detector::symbols::{MAX_COLUMNS_IN_BARCODE, MAX_ROWS_IN_BARCODE, MIN_ROWS_IN_BARCODE};
use crate::models::{BarcodeMetadata, BarcodeValue, BoundingBox};

/// A detection column on the left or right edge of the symbol
#[derive(Debug, Clone)]
pub struct RowIndicatorColumn {
    column: DetectionResultColumn,
    is_left: bool,
}

impl RowIndicatorColumn {
    /// Create an empty indicator column
    pub fn new(bounding_box: &BoundingBox, is_left: bool) -> Self {
        Self {
            column: DetectionResultColumn::new(bounding_box),
            is_left,
        }
    }

    /// Whether this is the left indicator
    pub fn is_left(&self) -> bool {
        self.is_left
    }

    /// Shared access to the underlying column
    pub fn column(&self) -> &DetectionResultColumn {
        &self.column
    }

    /// Store a codeword detected at `image_row`
    pub fn set_codeword(&mut self, image_row: i32, codeword: crate::models::Codeword) {
        self.column.set_codeword(image_row, codeword);
    }

    /// Extract the underlying column
    pub fn into_column(self) -> DetectionResultColumn {
        self.column
    }

    /// Derive metadata by majority vote; prunes inconsistent codewords
    pub fn barcode_metadata(&mut self) -> Option<BarcodeMetadata> {
        barcode_metadata(&mut self.column, self.is_left)
    }

    /// Codewords per barcode row, after row assignment
    pub fn row_heights(&mut self) -> Option<Vec<u32>> {
        row_heights(&mut self.column, self.is_left)
    }
}

pub(crate) fn barcode_metadata(
    column: &mut DetectionResultColumn,
    is_left: bool,
) -> Option<BarcodeMetadata> {
    let mut column_count = BarcodeValue::new();
    let mut row_count_upper = BarcodeValue::new();
    let mut row_count_lower = BarcodeValue::new();
    let mut ec_level = BarcodeValue::new();

    for slot in column.codewords_mut() {
        let Some(codeword) = slot else { continue };
        codeword.set_row_number_as_row_indicator();
        let value = codeword.value() % 30;
        let mut row_number = codeword.row_number();
        if !is_left {
            row_number += 2;
        }
        match row_number % 3 {
            0 => row_count_upper.set_value(value * 3 + 1),
            1 => {
                ec_level.set_value(value / 3);
                row_count_lower.set_value(value % 3);
            }
            _ => column_count.set_value(value + 1),
        }
    }

    let column_count = column_count.value();
    let row_count_upper = row_count_upper.value();
    let row_count_lower = row_count_lower.value();
    let ec_level = ec_level.value();
    if column_count.is_empty()
        || row_count_upper.is_empty()
        || row_count_lower.is_empty()
        || ec_level.is_empty()
    {
        return None;
    }
    let row_count = (row_count_upper[0] + row_count_lower[0]) as u32;
    if column_count[0] < 1
        || column_count[0] as u32 > MAX_COLUMNS_IN_BARCODE
        || row_count < MIN_ROWS_IN_BARCODE
        || row_count > MAX_ROWS_IN_BARCODE
    {
        return None;
    }
    let metadata = BarcodeMetadata::new(
        column_count[0] as u32,
        row_count_upper[0] as u32,
        row_count_lower[0] as u32,
        ec_level[0] as u8,
    );
    debug!(
        "indicator metadata ({}): {} columns, {} rows, ec level {}",
        if is_left { "left" } else { "right" },
        metadata.column_count(),
        metadata.row_count(),
        metadata.error_correction_level()
    );
    remove_incorrect_codewords(column, is_left, &metadata);
    Some(metadata)
}

pub(crate) fn row_heights(
    column: &mut DetectionResultColumn,
    is_left: bool,
) -> Option<Vec<u32>> {
    let metadata = barcode_metadata(column, is_left)?;
    adjust_incomplete_row_numbers(column, is_left, &metadata);
    let mut heights = vec![0u32; metadata.row_count() as usize];
    for codeword in column.codewords().iter().flatten() {
        let row_number = codeword.row_number();
        if row_number >= 0 && (row_number as usize) < heights.len() {
            heights[row_number as usize] += 1;
        }
    }
    Some(heights)
}

/// Row assignment for a column that spans the whole symbol height: prunes
/// codewords whose row sequence regresses or jumps implausibly
pub(crate) fn adjust_complete_row_numbers(
    column: &mut DetectionResultColumn,
    is_left: bool,
    metadata: &BarcodeMetadata,
) {
    for slot in column.codewords_mut() {
        if let Some(codeword) = slot {
            codeword.set_row_number_as_row_indicator();
        }
    }
    remove_incorrect_codewords(column, is_left, metadata);

    let bounding_box = column.bounding_box().clone();
    let top = if is_left {
        bounding_box.top_left()
    } else {
        bounding_box.top_right()
    };
    let bottom = if is_left {
        bounding_box.bottom_left()
    } else {
        bounding_box.bottom_right()
    };
    let first_row = column.image_row_to_codeword_index(top.row());
    let last_row = column.image_row_to_codeword_index(bottom.row());

    let mut barcode_row: i32 = -1;
    let mut max_row_height: i32 = 1;
    let mut current_row_height: i32 = 0;
    for index in first_row..last_row.min(column.codewords().len()) {
        let Some(codeword) = column.codewords()[index] else {
            continue;
        };
        let row_difference = codeword.row_number() - barcode_row;
        if row_difference == 0 {
            current_row_height += 1;
        } else if row_difference == 1 {
            max_row_height = max_row_height.max(current_row_height);
            current_row_height = 1;
            barcode_row = codeword.row_number();
        } else if row_difference < 0
            || codeword.row_number() >= metadata.row_count() as i32
            || row_difference > index as i32
        {
            column.codewords_mut()[index] = None;
        } else {
            let checked_rows = (if max_row_height > 2 {
                (max_row_height - 2) * row_difference
            } else {
                row_difference
            }) as usize;
            let mut close_previous_codeword_found = checked_rows >= index;
            for i in 1..=checked_rows {
                if close_previous_codeword_found {
                    break;
                }
                close_previous_codeword_found = column.codewords()[index - i].is_some();
            }
            if close_previous_codeword_found {
                column.codewords_mut()[index] = None;
            } else {
                barcode_row = codeword.row_number();
            }
            current_row_height = 1;
        }
    }
}

/// Row assignment for a column that may be missing rows at either end
fn adjust_incomplete_row_numbers(
    column: &mut DetectionResultColumn,
    is_left: bool,
    metadata: &BarcodeMetadata,
) {
    let bounding_box = column.bounding_box().clone();
    let top = if is_left {
        bounding_box.top_left()
    } else {
        bounding_box.top_right()
    };
    let bottom = if is_left {
        bounding_box.bottom_left()
    } else {
        bounding_box.bottom_right()
    };
    let first_row = column.image_row_to_codeword_index(top.row());
    let last_row = column.image_row_to_codeword_index(bottom.row());

    let mut barcode_row: i32 = -1;
    for index in first_row..last_row.min(column.codewords().len()) {
        let Some(codeword) = &mut column.codewords_mut()[index] else {
            continue;
        };
        codeword.set_row_number_as_row_indicator();
        let row_number = codeword.row_number();
        let row_difference = row_number - barcode_row;
        if row_difference == 0 {
            continue;
        }
        if row_number >= metadata.row_count() as i32 {
            column.codewords_mut()[index] = None;
        } else {
            barcode_row = row_number;
        }
    }
}

fn remove_incorrect_codewords(
    column: &mut DetectionResultColumn,
    is_left: bool,
    metadata: &BarcodeMetadata,
) {
    for slot in column.codewords_mut() {
        let Some(codeword) = slot else { continue };
        let value = codeword.value() % 30;
        let mut row_number = codeword.row_number();
        if row_number > metadata.row_count() as i32 {
            *slot = None;
            continue;
        }
        if !is_left {
            row_number += 2;
        }
        match row_number % 3 {
            0 => {
                if value * 3 + 1 != metadata.row_count_upper() as u16 {
                    *slot = None;
                }
            }
            1 => {
                if value / 3 != metadata.error_correction_level() as u16
                    || value % 3 != metadata.row_count_lower() as u16
                {
                    *slot = None;
                }
            }
            _ => {
                if value + 1 != metadata.column_count() as u16 {
                    *slot = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::symbols::tables;
    use crate::models::{Codeword, Point};

    fn indicator_box(rows: i32) -> BoundingBox {
        BoundingBox::new(
            400,
            rows as usize,
            Some(Point::new(10.0, 0.0)),
            Some(Point::new(10.0, (rows - 1) as f32)),
            Some(Point::new(300.0, 0.0)),
            Some(Point::new(300.0, (rows - 1) as f32)),
        )
        .unwrap()
    }

    /// Left indicator value for barcode row `r` of a symbol with the given
    /// geometry
    fn left_indicator_value(r: u16, rows: u16, cols: u16, ec_level: u16) -> u16 {
        30 * (r / 3)
            + match r % 3 {
                0 => (rows - 1) / 3,
                1 => ec_level * 3 + (rows - 1) % 3,
                _ => cols - 1,
            }
    }

    fn filled_left_indicator(rows: u16, cols: u16, ec_level: u16) -> RowIndicatorColumn {
        let mut indicator = RowIndicatorColumn::new(&indicator_box(rows as i32), true);
        for r in 0..rows {
            let value = left_indicator_value(r, rows, cols, ec_level);
            let cluster = ((r % 3) * 3) as u8;
            // make sure the value is renderable in its cluster
            assert!(tables().pattern_for_codeword(cluster, value).is_some());
            indicator.set_codeword(r as i32, Codeword::new(10, 61, cluster, value));
        }
        indicator
    }

    #[test]
    fn test_metadata_vote_from_clean_indicator() {
        let mut indicator = filled_left_indicator(9, 4, 2);
        let metadata = indicator.barcode_metadata().unwrap();
        assert_eq!(metadata.column_count(), 4);
        assert_eq!(metadata.row_count(), 9);
        assert_eq!(metadata.error_correction_level(), 2);
    }

    #[test]
    fn test_metadata_survives_a_minority_of_bad_codewords() {
        let mut indicator = filled_left_indicator(9, 4, 2);
        // overwrite one row with garbage pointing at a different geometry
        indicator.set_codeword(2, Codeword::new(10, 61, 6, 7));
        let metadata = indicator.barcode_metadata().unwrap();
        assert_eq!(metadata.column_count(), 4);
        assert_eq!(metadata.row_count(), 9);
    }

    #[test]
    fn test_row_heights_count_assigned_rows() {
        let mut indicator = filled_left_indicator(6, 2, 1);
        let heights = indicator.row_heights().unwrap();
        assert_eq!(heights, vec![1; 6]);
    }

    #[test]
    fn test_empty_indicator_has_no_metadata() {
        let mut indicator = RowIndicatorColumn::new(&indicator_box(9), true);
        assert!(indicator.barcode_metadata().is_none());
    }
}
