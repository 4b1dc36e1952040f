/// Sentinel for a codeword whose barcode row has not been established yet
pub const BARCODE_ROW_UNKNOWN: i32 = -1;

/// A single detected codeword
///
/// `start_column`/`end_column` are image-space pixel columns in ascending
/// order regardless of the scan direction that found the codeword. The
/// bucket is the checksum class 0-8 derived from the module run signature;
/// only buckets 0, 3 and 6 can belong to a readable symbol, and the grid
/// reconciliation uses that to validate row assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword {
    start_column: i32,
    end_column: i32,
    bucket: u8,
    value: u16,
    row_number: i32,
}

impl Codeword {
    /// Create a codeword with an unknown barcode row
    pub fn new(start_column: i32, end_column: i32, bucket: u8, value: u16) -> Self {
        Self {
            start_column,
            end_column,
            bucket,
            value,
            row_number: BARCODE_ROW_UNKNOWN,
        }
    }

    /// First image column of the codeword
    pub fn start_column(&self) -> i32 {
        self.start_column
    }

    /// One past the last image column of the codeword
    pub fn end_column(&self) -> i32 {
        self.end_column
    }

    /// Measured width in pixels
    pub fn width(&self) -> i32 {
        self.end_column - self.start_column
    }

    /// Checksum bucket 0-8
    pub fn bucket(&self) -> u8 {
        self.bucket
    }

    /// Decoded symbol value in `0..929`
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Barcode row this codeword was assigned to, or [`BARCODE_ROW_UNKNOWN`]
    pub fn row_number(&self) -> i32 {
        self.row_number
    }

    /// Assign a barcode row
    pub fn set_row_number(&mut self, row_number: i32) {
        self.row_number = row_number;
    }

    /// Self-assign the row encoded in a row-indicator codeword value
    pub fn set_row_number_as_row_indicator(&mut self) {
        self.row_number = (self.value as i32 / 30) * 3 + self.bucket as i32 / 3;
    }

    /// Whether the assigned row is consistent with the bucket
    pub fn has_valid_row_number(&self) -> bool {
        self.is_valid_row_number(self.row_number)
    }

    /// Whether `row_number` would be consistent with this codeword's bucket
    pub fn is_valid_row_number(&self, row_number: i32) -> bool {
        row_number != BARCODE_ROW_UNKNOWN && self.bucket as i32 == (row_number % 3) * 3
    }
}
