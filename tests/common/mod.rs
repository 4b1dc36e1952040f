//! Shared fixture builder for the integration tests
//!
//! Renders complete symbols (start pattern, row indicators, data columns,
//! stop pattern) into a [`BitMatrix`] and computes the matching corner seeds,
//! so the pipeline can be exercised end to end without image files. Also
//! provides helpers to corrupt or blank individual codeword cells.

use rust_pdf417::decoder::modulus_gf::ModulusGF;
use rust_pdf417::detector::symbols::{self, MODULES_IN_CODEWORD, START_PATTERN, STOP_PATTERN};
use rust_pdf417::{BitMatrix, CornerSeeds, Point};

/// A rendered symbol together with its ground truth
pub struct SymbolFixture {
    pub image: BitMatrix,
    pub seeds: CornerSeeds,
    /// The full codeword grid (data followed by EC), row-major
    pub codewords: Vec<u16>,
    pub rows: u32,
    pub cols: u32,
    pub ec_level: u8,
    pub module_width: usize,
    pub row_height: usize,
    pub margin: usize,
}

impl SymbolFixture {
    /// Nominal codeword width in pixels
    pub fn codeword_width(&self) -> i32 {
        (MODULES_IN_CODEWORD * self.module_width) as i32
    }

    /// Number of error correction codewords
    pub fn num_ec(&self) -> usize {
        1 << (self.ec_level + 1)
    }

    /// Left pixel column of a barcode column (0 = left indicator, 1..=cols =
    /// data, cols + 1 = right indicator)
    pub fn column_x(&self, barcode_column: u32) -> usize {
        self.margin + (1 + barcode_column as usize) * MODULES_IN_CODEWORD * self.module_width
    }

    /// Top pixel row of a barcode row
    pub fn row_y(&self, barcode_row: u32) -> usize {
        self.margin + barcode_row as usize * self.row_height
    }

    /// Overwrite one cell with a different value of the row's cluster
    pub fn repaint_symbol(&mut self, barcode_row: u32, barcode_column: u32, value: u16) {
        let row_height = self.row_height;
        self.repaint_symbol_rows(barcode_row, barcode_column, value, 0, row_height);
    }

    /// Overwrite only image rows `y_from..y_to` of a cell, creating
    /// conflicting votes for it
    pub fn repaint_symbol_rows(
        &mut self,
        barcode_row: u32,
        barcode_column: u32,
        value: u16,
        y_from: usize,
        y_to: usize,
    ) {
        let cluster = ((barcode_row % 3) * 3) as u8;
        let pattern = symbols::tables()
            .pattern_for_codeword(cluster, value)
            .expect("value not renderable in cluster");
        let x0 = self.column_x(barcode_column);
        let y0 = self.row_y(barcode_row);
        for dy in y_from..y_to {
            for bit_index in 0..MODULES_IN_CODEWORD {
                let bit = (pattern >> (MODULES_IN_CODEWORD - 1 - bit_index)) & 1 == 1;
                for dx in 0..self.module_width {
                    self.image
                        .set(x0 + bit_index * self.module_width + dx, y0 + dy, bit);
                }
            }
        }
    }

    /// Blank one cell entirely so nothing can be detected there
    pub fn blank_symbol(&mut self, barcode_row: u32, barcode_column: u32) {
        let x0 = self.column_x(barcode_column);
        let y0 = self.row_y(barcode_row);
        for dy in 0..self.row_height {
            for dx in 0..MODULES_IN_CODEWORD * self.module_width {
                self.image.set(x0 + dx, y0 + dy, false);
            }
        }
    }
}

/// Render a symbol carrying `payload` (padded with 900 to the data length)
pub fn build_symbol(
    rows: u32,
    cols: u32,
    ec_level: u8,
    payload: &[u16],
    module_width: usize,
    row_height: usize,
) -> SymbolFixture {
    let margin = 4usize;
    let total = (rows * cols) as usize;
    let num_ec = 1usize << (ec_level + 1);
    assert!(total > num_ec, "geometry leaves no room for data");
    let data_len = total - num_ec;
    assert!(payload.len() < data_len, "payload too long for the geometry");

    // symbol length descriptor, payload, pad codewords, then EC
    let mut data = Vec::with_capacity(data_len);
    data.push(data_len as u16);
    data.extend_from_slice(payload);
    data.resize(data_len, 900);
    let mut codewords = data.clone();
    codewords.extend_from_slice(&ec_codewords(&data, num_ec));

    let symbol_columns = cols as usize + 2;
    let width_modules = MODULES_IN_CODEWORD * (symbol_columns + 1) + 18;
    let width = 2 * margin + width_modules * module_width;
    let height = 2 * margin + rows as usize * row_height;
    let mut image = BitMatrix::new(width, height);

    let tables = symbols::tables();
    for r in 0..rows {
        let cluster = ((r % 3) * 3) as u8;
        let pattern_of = |value: u16| {
            tables
                .pattern_for_codeword(cluster, value)
                .expect("codeword value out of range")
        };
        let mut row_patterns: Vec<(u32, usize)> =
            vec![(START_PATTERN, MODULES_IN_CODEWORD)];
        row_patterns.push((
            pattern_of(left_indicator_value(r, rows, cols, ec_level as u32)),
            MODULES_IN_CODEWORD,
        ));
        for c in 0..cols {
            row_patterns.push((
                pattern_of(codewords[(r * cols + c) as usize]),
                MODULES_IN_CODEWORD,
            ));
        }
        row_patterns.push((
            pattern_of(right_indicator_value(r, rows, cols, ec_level as u32)),
            MODULES_IN_CODEWORD,
        ));
        row_patterns.push((STOP_PATTERN, 18));

        let y0 = margin + r as usize * row_height;
        let mut x = margin;
        for (pattern, modules) in row_patterns {
            for bit_index in 0..modules {
                if (pattern >> (modules - 1 - bit_index)) & 1 == 1 {
                    for dx in 0..module_width {
                        for dy in 0..row_height {
                            image.set(x + dx, y0 + dy, true);
                        }
                    }
                }
                x += module_width;
            }
        }
    }

    let left_x = (margin + MODULES_IN_CODEWORD * module_width) as f32;
    let right_x = (margin + MODULES_IN_CODEWORD * module_width * (symbol_columns + 1)) as f32;
    let top_y = margin as f32;
    let bottom_y = (margin + rows as usize * row_height - 1) as f32;
    let seeds = CornerSeeds::full(
        Point::new(left_x, top_y),
        Point::new(left_x, bottom_y),
        Point::new(right_x, top_y),
        Point::new(right_x, bottom_y),
    );

    SymbolFixture {
        image,
        seeds,
        codewords,
        rows,
        cols,
        ec_level,
        module_width,
        row_height,
        margin,
    }
}

/// Left row-indicator value for barcode row `r`
pub fn left_indicator_value(r: u32, rows: u32, cols: u32, ec_level: u32) -> u16 {
    (30 * (r / 3)
        + match r % 3 {
            0 => (rows - 1) / 3,
            1 => ec_level * 3 + (rows - 1) % 3,
            _ => cols - 1,
        }) as u16
}

/// Right row-indicator value for barcode row `r`
pub fn right_indicator_value(r: u32, rows: u32, cols: u32, ec_level: u32) -> u16 {
    (30 * (r / 3)
        + match r % 3 {
            0 => cols - 1,
            1 => (rows - 1) / 3,
            _ => ec_level * 3 + (rows - 1) % 3,
        }) as u16
}

/// Error correction codewords for `data`, generator roots `3^1 .. 3^num_ec`
pub fn ec_codewords(data: &[u16], num_ec: usize) -> Vec<u16> {
    // build the monic generator polynomial, descending coefficients
    let mut generator = vec![1u16];
    for i in 1..=num_ec {
        let root = ModulusGF::exp(i);
        let mut next = vec![0u16; generator.len() + 1];
        for (j, &g) in generator.iter().enumerate() {
            next[j] = ModulusGF::add(next[j], g);
            next[j + 1] = ModulusGF::subtract(next[j + 1], ModulusGF::multiply(g, root));
        }
        generator = next;
    }

    // long division of data * x^num_ec
    let mut work: Vec<u16> = data.to_vec();
    work.extend(std::iter::repeat_n(0u16, num_ec));
    for i in 0..data.len() {
        let coeff = work[i];
        if coeff == 0 {
            continue;
        }
        for (j, &g) in generator.iter().enumerate() {
            work[i + j] = ModulusGF::subtract(work[i + j], ModulusGF::multiply(coeff, g));
        }
    }
    work[data.len()..]
        .iter()
        .map(|&r| ModulusGF::subtract(0, r))
        .collect()
}
