//! Scanning decoder: drives detection from corner seeds to corrected
//! codewords
//!
//! Pipeline: scan the row-indicator columns from the seed points, derive the
//! barcode metadata and reconcile the bounding box (growing it once if the
//! indicators reveal missing rows), sweep every barcode column predicting
//! each row's start from already-decoded neighbors, then resolve the cell
//! matrix into a codeword sequence and repair it with error correction,
//! trying ambiguous-cell combinations odometer-style with a bounded number
//! of attempts.

use log::{debug, trace};
use smallvec::SmallVec;

use crate::decoder::config;
use crate::decoder::error_correction;
use crate::detector::codeword_decoder;
use crate::detector::detection_result::DetectionResult;
use crate::detector::result_column::DetectionResultColumn;
use crate::detector::row_indicator::RowIndicatorColumn;
use crate::detector::symbols::{BARS_IN_MODULE, MAX_CODEWORDS_IN_BARCODE};
use crate::error::DecodeError;
use crate::models::{BarcodeMetadata, BarcodeValue, BitMatrix, BoundingBox, Codeword};
use crate::models::{DecodedCodewords, Point};

/// Pixels of drift tolerated when snapping onto a codeword edge
const CODEWORD_SKEW_SIZE: i32 = 2;

/// Decode the symbol seeded by up to four corner points
pub fn decode(
    image: &BitMatrix,
    image_top_left: Option<Point>,
    image_bottom_left: Option<Point>,
    image_top_right: Option<Point>,
    image_bottom_right: Option<Point>,
    min_codeword_width: i32,
    max_codeword_width: i32,
) -> Result<DecodedCodewords, DecodeError> {
    let mut bounding_box = BoundingBox::new(
        image.width(),
        image.height(),
        image_top_left,
        image_bottom_left,
        image_top_right,
        image_bottom_right,
    )
    .ok_or(DecodeError::Geometry)?;

    let mut left_column: Option<RowIndicatorColumn> = None;
    let mut right_column: Option<RowIndicatorColumn> = None;
    let mut first_pass = true;
    let mut detection_result = loop {
        if let Some(seed) = image_top_left {
            left_column = Some(get_row_indicator_column(
                image,
                &bounding_box,
                seed,
                true,
                min_codeword_width,
                max_codeword_width,
            ));
        }
        if let Some(seed) = image_top_right {
            right_column = Some(get_row_indicator_column(
                image,
                &bounding_box,
                seed,
                false,
                min_codeword_width,
                max_codeword_width,
            ));
        }
        let result = merge(left_column.as_mut(), right_column.as_mut())?;
        // one-shot refinement: rescan when the indicators reveal a taller box
        if first_pass
            && (result.bounding_box().min_y() < bounding_box.min_y()
                || result.bounding_box().max_y() > bounding_box.max_y())
        {
            debug!(
                "bounding box grew to rows {}..={}, rescanning indicators",
                result.bounding_box().min_y(),
                result.bounding_box().max_y()
            );
            bounding_box = result.bounding_box().clone();
            first_pass = false;
            continue;
        }
        break result;
    };
    detection_result.set_bounding_box(bounding_box.clone());

    let max_barcode_column = detection_result.barcode_column_count() + 1;
    let left_to_right = left_column.is_some();
    detection_result.set_column(0, left_column.map(RowIndicatorColumn::into_column));
    detection_result.set_column(
        max_barcode_column,
        right_column.map(RowIndicatorColumn::into_column),
    );

    let mut min_codeword_width = min_codeword_width;
    let mut max_codeword_width = max_codeword_width;
    for i in 1..=max_barcode_column {
        let barcode_column = if left_to_right {
            i
        } else {
            max_barcode_column - i
        };
        if detection_result.column(barcode_column).is_some() {
            continue;
        }
        detection_result.set_column(
            barcode_column,
            Some(DetectionResultColumn::new(&bounding_box)),
        );
        let mut previous_start_column = -1i32;
        for image_row in bounding_box.min_y()..=bounding_box.max_y() {
            let mut start_column =
                get_start_column(&detection_result, barcode_column, image_row, left_to_right);
            if start_column < 0 || start_column > bounding_box.max_x() {
                if previous_start_column == -1 {
                    continue;
                }
                start_column = previous_start_column;
            }
            if let Some(codeword) = detect_codeword(
                image,
                bounding_box.min_x(),
                bounding_box.max_x(),
                left_to_right,
                start_column,
                image_row,
                min_codeword_width,
                max_codeword_width,
            ) {
                min_codeword_width = min_codeword_width.min(codeword.width());
                max_codeword_width = max_codeword_width.max(codeword.width());
                previous_start_column = start_column;
                if let Some(column) = detection_result.column_mut(barcode_column) {
                    column.set_codeword(image_row, codeword);
                }
            }
        }
        trace!(
            "column {}: {} codewords detected",
            barcode_column,
            detection_result
                .column(barcode_column)
                .map(|c| c.codewords().iter().flatten().count())
                .unwrap_or(0)
        );
    }

    create_decoder_result(&mut detection_result)
}

fn get_row_indicator_column(
    image: &BitMatrix,
    bounding_box: &BoundingBox,
    start_point: Point,
    left_to_right: bool,
    min_codeword_width: i32,
    max_codeword_width: i32,
) -> RowIndicatorColumn {
    let mut column = RowIndicatorColumn::new(bounding_box, left_to_right);
    for iteration in 0..2 {
        let increment: i32 = if iteration == 0 { 1 } else { -1 };
        let mut start_column = start_point.column();
        let mut image_row = start_point.row();
        while image_row <= bounding_box.max_y() && image_row >= bounding_box.min_y() {
            if let Some(codeword) = detect_codeword(
                image,
                0,
                image.width() as i32,
                left_to_right,
                start_column,
                image_row,
                min_codeword_width,
                max_codeword_width,
            ) {
                // reseed the next row from this codeword's outer edge
                start_column = if left_to_right {
                    codeword.start_column()
                } else {
                    codeword.end_column()
                };
                column.set_codeword(image_row, codeword);
            }
            image_row += increment;
        }
    }
    column
}

fn merge(
    mut left: Option<&mut RowIndicatorColumn>,
    mut right: Option<&mut RowIndicatorColumn>,
) -> Result<DetectionResult, DecodeError> {
    if left.is_none() && right.is_none() {
        return Err(DecodeError::Geometry);
    }
    let left_metadata = left.as_deref_mut().and_then(|c| c.barcode_metadata());
    let right_metadata = right.as_deref_mut().and_then(|c| c.barcode_metadata());
    let metadata =
        reconcile_metadata(left_metadata, right_metadata).ok_or(DecodeError::Geometry)?;
    let left_box = left.and_then(|c| adjust_bounding_box(c));
    let right_box = right.and_then(|c| adjust_bounding_box(c));
    let bounding_box = BoundingBox::merge(left_box, right_box).ok_or(DecodeError::Geometry)?;
    Ok(DetectionResult::new(metadata, bounding_box))
}

/// Strict agreement: any mismatch between the two sides fails detection
fn reconcile_metadata(
    left: Option<BarcodeMetadata>,
    right: Option<BarcodeMetadata>,
) -> Option<BarcodeMetadata> {
    match (left, right) {
        (None, None) => None,
        (Some(metadata), None) | (None, Some(metadata)) => Some(metadata),
        (Some(left), Some(right)) => {
            if left.column_count() != right.column_count()
                || left.error_correction_level() != right.error_correction_level()
                || left.row_count() != right.row_count()
            {
                debug!("left and right indicator metadata disagree");
                return None;
            }
            Some(left)
        }
    }
}

/// Estimate rows missing above/below the indicator and grow the box
fn adjust_bounding_box(row_indicator_column: &mut RowIndicatorColumn) -> Option<BoundingBox> {
    let is_left = row_indicator_column.is_left();
    let row_heights = row_indicator_column.row_heights()?;
    let max_row_height = row_heights.iter().copied().max().unwrap_or(0) as i32;

    let mut missing_start_rows = 0i32;
    for &row_height in &row_heights {
        missing_start_rows += max_row_height - row_height as i32;
        if row_height > 0 {
            break;
        }
    }
    let codewords = row_indicator_column.column().codewords();
    let mut row = 0usize;
    while missing_start_rows > 0 && row < codewords.len() && codewords[row].is_none() {
        missing_start_rows -= 1;
        row += 1;
    }

    let mut missing_end_rows = 0i32;
    for &row_height in row_heights.iter().rev() {
        missing_end_rows += max_row_height - row_height as i32;
        if row_height > 0 {
            break;
        }
    }
    let mut row = codewords.len();
    while missing_end_rows > 0 && row > 0 && codewords[row - 1].is_none() {
        missing_end_rows -= 1;
        row -= 1;
    }

    Some(
        row_indicator_column
            .column()
            .bounding_box()
            .add_missing_rows(missing_start_rows, missing_end_rows, is_left),
    )
}

/// Predict where the codeword for (`barcode_column`, `image_row`) starts
fn get_start_column(
    detection_result: &DetectionResult,
    barcode_column: usize,
    image_row: i32,
    left_to_right: bool,
) -> i32 {
    let offset: i32 = if left_to_right { 1 } else { -1 };
    let barcode_column = barcode_column as i32;

    // the matching row in the previous logical column
    if let Some(codeword) = valid_column(detection_result, barcode_column - offset)
        .and_then(|column| column.codeword(image_row))
    {
        return if left_to_right {
            codeword.end_column()
        } else {
            codeword.start_column()
        };
    }
    // the nearest codeword already found in this column
    if let Some(codeword) = valid_column(detection_result, barcode_column)
        .and_then(|column| column.codeword_nearby(image_row))
    {
        return if left_to_right {
            codeword.start_column()
        } else {
            codeword.end_column()
        };
    }
    // the nearest codeword in the previous column
    if let Some(codeword) = valid_column(detection_result, barcode_column - offset)
        .and_then(|column| column.codeword_nearby(image_row))
    {
        return if left_to_right {
            codeword.end_column()
        } else {
            codeword.start_column()
        };
    }
    // extrapolate from the nearest filled column, scaled by skipped width
    let mut skipped_columns = 0i32;
    let mut column_index = barcode_column - offset;
    while let Some(column) = valid_column(detection_result, column_index) {
        if let Some(codeword) = column.codewords().iter().flatten().next() {
            let edge = if left_to_right {
                codeword.end_column()
            } else {
                codeword.start_column()
            };
            return edge + offset * skipped_columns * codeword.width();
        }
        column_index -= offset;
        skipped_columns += 1;
    }
    // nothing decoded yet anywhere: fall back to the box edge
    if left_to_right {
        detection_result.bounding_box().min_x()
    } else {
        detection_result.bounding_box().max_x()
    }
}

fn valid_column(
    detection_result: &DetectionResult,
    barcode_column: i32,
) -> Option<&DetectionResultColumn> {
    if barcode_column < 0 || barcode_column as usize > detection_result.barcode_column_count() + 1 {
        return None;
    }
    detection_result.column(barcode_column as usize)
}

/// Measure and decode one codeword starting near `start_column`
fn detect_codeword(
    image: &BitMatrix,
    min_column: i32,
    max_column: i32,
    left_to_right: bool,
    start_column: i32,
    image_row: i32,
    min_codeword_width: i32,
    max_codeword_width: i32,
) -> Option<Codeword> {
    let start_column = adjust_codeword_start_column(
        image,
        min_column,
        max_column,
        left_to_right,
        start_column,
        image_row,
    );
    let mut module_bit_count =
        get_module_bit_count(image, min_column, max_column, left_to_right, start_column, image_row)?;
    let codeword_bit_count = module_bit_count.iter().sum::<usize>() as i32;
    let (start_column, end_column) = if left_to_right {
        (start_column, start_column + codeword_bit_count)
    } else {
        module_bit_count.reverse();
        (start_column - codeword_bit_count, start_column)
    };
    if !check_codeword_skew(codeword_bit_count, min_codeword_width, max_codeword_width) {
        return None;
    }
    let (value, bucket) = codeword_decoder::decode_module_runs(&module_bit_count)?;
    Some(Codeword::new(start_column, end_column, bucket, value))
}

/// Count pixels of the eight alternating runs of one codeword
fn get_module_bit_count(
    image: &BitMatrix,
    min_column: i32,
    max_column: i32,
    left_to_right: bool,
    start_column: i32,
    image_row: i32,
) -> Option<[usize; BARS_IN_MODULE]> {
    let mut image_column = start_column;
    let mut module_bit_count = [0usize; BARS_IN_MODULE];
    let mut module_number = 0;
    let increment: i32 = if left_to_right { 1 } else { -1 };
    let mut previous_pixel_value = left_to_right;
    while (if left_to_right {
        image_column < max_column
    } else {
        image_column >= min_column
    }) && module_number < BARS_IN_MODULE
    {
        if image.get(image_column as usize, image_row as usize) == previous_pixel_value {
            module_bit_count[module_number] += 1;
            image_column += increment;
        } else {
            module_number += 1;
            previous_pixel_value = !previous_pixel_value;
        }
    }
    let at_boundary = image_column
        == if left_to_right {
            max_column
        } else {
            min_column
        };
    if module_number == BARS_IN_MODULE || (at_boundary && module_number == BARS_IN_MODULE - 1) {
        return Some(module_bit_count);
    }
    None
}

/// Snap onto the true codeword boundary, allowing two direction flips
fn adjust_codeword_start_column(
    image: &BitMatrix,
    min_column: i32,
    max_column: i32,
    left_to_right: bool,
    codeword_start_column: i32,
    image_row: i32,
) -> i32 {
    let mut corrected_start_column = codeword_start_column;
    let mut increment: i32 = if left_to_right { -1 } else { 1 };
    let mut inside_direction = left_to_right;
    for _ in 0..2 {
        while (if inside_direction {
            corrected_start_column >= min_column
        } else {
            corrected_start_column < max_column
        }) && inside_direction
            == image.get(corrected_start_column as usize, image_row as usize)
        {
            if (codeword_start_column - corrected_start_column).abs() > CODEWORD_SKEW_SIZE {
                return codeword_start_column;
            }
            corrected_start_column += increment;
        }
        increment = -increment;
        inside_direction = !inside_direction;
    }
    corrected_start_column
}

fn check_codeword_skew(codeword_size: i32, min_codeword_width: i32, max_codeword_width: i32) -> bool {
    codeword_size >= min_codeword_width - CODEWORD_SKEW_SIZE
        && codeword_size <= max_codeword_width + CODEWORD_SKEW_SIZE
}

fn create_decoder_result(
    detection_result: &mut DetectionResult,
) -> Result<DecodedCodewords, DecodeError> {
    let mut barcode_matrix = create_barcode_matrix(detection_result);
    adjust_codeword_count(detection_result, &mut barcode_matrix)?;

    let row_count = detection_result.barcode_row_count();
    let column_count = detection_result.barcode_column_count();
    let mut codewords = vec![0u16; row_count * column_count];
    let mut erasures: Vec<usize> = Vec::new();
    let mut ambiguous_indexes: Vec<usize> = Vec::new();
    let mut ambiguous_values: Vec<SmallVec<[u16; 2]>> = Vec::new();
    for row in 0..row_count {
        for column in 0..column_count {
            let values = barcode_matrix[row][column + 1].value();
            let codeword_index = row * column_count + column;
            match values.len() {
                0 => erasures.push(codeword_index),
                1 => codewords[codeword_index] = values[0],
                _ => {
                    ambiguous_indexes.push(codeword_index);
                    ambiguous_values.push(values);
                }
            }
        }
    }
    debug!(
        "assembled {} codewords with {} erasures and {} ambiguous cells",
        codewords.len(),
        erasures.len(),
        ambiguous_indexes.len()
    );
    create_decoder_result_from_ambiguous_values(
        detection_result.barcode_ec_level(),
        &mut codewords,
        &erasures,
        &ambiguous_indexes,
        &ambiguous_values,
    )
}

/// Enumerate ambiguous-cell candidates odometer-style, attempting error
/// correction for each combination under the configured attempt cap
fn create_decoder_result_from_ambiguous_values(
    ec_level: u8,
    codewords: &mut [u16],
    erasures: &[usize],
    ambiguous_indexes: &[usize],
    ambiguous_values: &[SmallVec<[u16; 2]>],
) -> Result<DecodedCodewords, DecodeError> {
    let mut ambiguous_index_count = vec![0usize; ambiguous_indexes.len()];
    let limits: Vec<usize> = ambiguous_values.iter().map(|values| values.len()).collect();

    for _ in 0..config::max_ambiguous_tries() {
        for (i, &index) in ambiguous_indexes.iter().enumerate() {
            codewords[index] = ambiguous_values[i][ambiguous_index_count[i]];
        }
        let mut attempt = codewords.to_vec();
        match decode_codewords(&mut attempt, ec_level, erasures) {
            Ok(result) => return Ok(result),
            // more erasures than capacity cannot improve with other candidates
            Err(DecodeError::ErasureOverflow) => return Err(DecodeError::ErasureOverflow),
            Err(_) => {}
        }
        if ambiguous_indexes.is_empty() {
            return Err(DecodeError::Uncorrectable);
        }
        if !next_combination(&mut ambiguous_index_count, &limits) {
            return Err(DecodeError::Uncorrectable);
        }
    }
    Err(DecodeError::Uncorrectable)
}

/// Advance the candidate odometer; false once every combination was visited
fn next_combination(counts: &mut [usize], limits: &[usize]) -> bool {
    for (count, &limit) in counts.iter_mut().zip(limits) {
        if *count + 1 < limit {
            *count += 1;
            return true;
        }
        *count = 0;
    }
    false
}

fn create_barcode_matrix(detection_result: &mut DetectionResult) -> Vec<Vec<BarcodeValue>> {
    let row_count = detection_result.barcode_row_count();
    let column_count = detection_result.barcode_column_count() + 2;
    let mut matrix = vec![vec![BarcodeValue::new(); column_count]; row_count];
    for (column_index, column) in detection_result.adjusted_columns().iter().enumerate() {
        let Some(column) = column else { continue };
        for codeword in column.codewords().iter().flatten() {
            let row_number = codeword.row_number();
            // rows outside the symbol are discarded
            if row_number >= 0 && (row_number as usize) < row_count {
                matrix[row_number as usize][column_index].set_value(codeword.value());
            }
        }
    }
    matrix
}

/// Cross-check the codeword-count cell against the metadata-implied count
fn adjust_codeword_count(
    detection_result: &DetectionResult,
    barcode_matrix: &mut [Vec<BarcodeValue>],
) -> Result<(), DecodeError> {
    let values = barcode_matrix[0][1].value();
    let calculated = (detection_result.barcode_column_count() * detection_result.barcode_row_count())
        as i64
        - number_of_ec_codewords(detection_result.barcode_ec_level()) as i64;
    if values.is_empty() {
        if calculated < 1 || calculated > MAX_CODEWORDS_IN_BARCODE as i64 {
            return Err(DecodeError::CountMismatch);
        }
        barcode_matrix[0][1].set_value(calculated as u16);
    } else if values[0] as i64 != calculated
        && (1..=MAX_CODEWORDS_IN_BARCODE as i64).contains(&calculated)
    {
        // the calculated count competes with the decoded one; the ambiguity
        // retry loop picks whichever correction accepts
        barcode_matrix[0][1].set_value(calculated as u16);
    }
    Ok(())
}

fn decode_codewords(
    codewords: &mut Vec<u16>,
    ec_level: u8,
    erasures: &[usize],
) -> Result<DecodedCodewords, DecodeError> {
    if codewords.is_empty() {
        return Err(DecodeError::Detection);
    }
    let num_ec_codewords = number_of_ec_codewords(ec_level);
    let errors_corrected = error_correction::correct_errors(codewords, erasures, num_ec_codewords)?;
    verify_codeword_count(codewords, num_ec_codewords)?;
    Ok(DecodedCodewords {
        codewords: codewords.clone(),
        ec_level,
        erasure_count: erasures.len(),
        errors_corrected,
    })
}

fn verify_codeword_count(codewords: &mut [u16], num_ec_codewords: usize) -> Result<(), DecodeError> {
    if codewords.len() < 4 {
        return Err(DecodeError::CountMismatch);
    }
    // the first codeword is the symbol length descriptor
    let count = codewords[0] as usize;
    if count > codewords.len() {
        return Err(DecodeError::CountMismatch);
    }
    if count == 0 {
        if num_ec_codewords < codewords.len() {
            codewords[0] = (codewords.len() - num_ec_codewords) as u16;
        } else {
            return Err(DecodeError::CountMismatch);
        }
    }
    Ok(())
}

fn number_of_ec_codewords(ec_level: u8) -> usize {
    1 << (ec_level + 1)
}
