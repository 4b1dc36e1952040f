/// Barcode geometry decoded from a row-indicator column
///
/// The row count is split into the two fields the indicator encodes it with;
/// `row_count()` is their sum. When both indicator columns are readable they
/// must agree exactly on column count, row count and error correction level,
/// otherwise metadata derivation fails upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarcodeMetadata {
    column_count: u32,
    row_count_upper: u32,
    row_count_lower: u32,
    error_correction_level: u8,
}

impl BarcodeMetadata {
    /// Create a metadata record
    pub fn new(
        column_count: u32,
        row_count_upper: u32,
        row_count_lower: u32,
        error_correction_level: u8,
    ) -> Self {
        Self {
            column_count,
            row_count_upper,
            row_count_lower,
            error_correction_level,
        }
    }

    /// Number of data columns (indicator columns excluded)
    pub fn column_count(&self) -> u32 {
        self.column_count
    }

    /// Total number of barcode rows
    pub fn row_count(&self) -> u32 {
        self.row_count_upper + self.row_count_lower
    }

    /// Upper portion of the encoded row count
    pub fn row_count_upper(&self) -> u32 {
        self.row_count_upper
    }

    /// Lower portion of the encoded row count
    pub fn row_count_lower(&self) -> u32 {
        self.row_count_lower
    }

    /// Error correction level 0-8
    pub fn error_correction_level(&self) -> u8 {
        self.error_correction_level
    }
}
