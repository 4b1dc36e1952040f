//! Low-level symbol alphabet and pattern tables
//!
//! A codeword is printed as 17 modules forming 4 bars and 4 spaces, each one
//! to six modules wide. A run-length vector `(r0..r7)` is a legal symbol
//! shape when it sums to 17 modules and its cluster
//! `(r0 - r2 + r4 - r6 + 9) mod 9` is 0, 3 or 6. Within each cluster the 929
//! lowest bit patterns are the symbol set and a pattern's rank is its
//! codeword value. The tables are derived once from that enumeration: a
//! sorted pattern array with parallel values for exact decoding, per-cluster
//! pattern-by-value arrays for rendering, and per-symbol module ratios for
//! closest-match decoding of distorted reads.

use std::sync::OnceLock;

/// Modules per codeword
pub const MODULES_IN_CODEWORD: usize = 17;

/// Alternating bar/space runs per codeword
pub const BARS_IN_MODULE: usize = 8;

/// Symbols per cluster; also the size of the codeword alphabet
pub const SYMBOLS_PER_CLUSTER: usize = 929;

/// Largest codeword count a symbol can carry
pub const MAX_CODEWORDS_IN_BARCODE: usize = 928;

/// Minimum number of barcode rows
pub const MIN_ROWS_IN_BARCODE: u32 = 3;

/// Maximum number of barcode rows
pub const MAX_ROWS_IN_BARCODE: u32 = 90;

/// Maximum number of data columns
pub const MAX_COLUMNS_IN_BARCODE: u32 = 30;

/// The 17-module start pattern
pub const START_PATTERN: u32 = 0b1_1111_1110_1010_1000;

/// The 18-module stop pattern
pub const STOP_PATTERN: u32 = 0b11_1111_1010_0010_1001;

/// Decoding tables shared by every decode call
pub struct SymbolTables {
    symbols: Vec<u32>,
    values: Vec<u16>,
    cluster_patterns: [Vec<u32>; 3],
    ratios: Vec<[f32; BARS_IN_MODULE]>,
}

static TABLES: OnceLock<SymbolTables> = OnceLock::new();

/// The shared symbol tables, built on first use
pub fn tables() -> &'static SymbolTables {
    TABLES.get_or_init(SymbolTables::build)
}

impl SymbolTables {
    fn build() -> Self {
        let mut cluster_patterns: [Vec<u32>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        let mut runs = [0usize; BARS_IN_MODULE];
        collect_runs(0, MODULES_IN_CODEWORD, &mut runs, &mut |runs| {
            let cluster = (runs[0] as i32 - runs[2] as i32 + runs[4] as i32 - runs[6] as i32 + 9)
                .rem_euclid(9);
            if cluster % 3 == 0 {
                cluster_patterns[(cluster / 3) as usize].push(pattern_from_runs(runs));
            }
        });
        for patterns in cluster_patterns.iter_mut() {
            patterns.sort_unstable();
            patterns.truncate(SYMBOLS_PER_CLUSTER);
        }

        let mut flat: Vec<(u32, u16)> = cluster_patterns
            .iter()
            .flat_map(|patterns| {
                patterns
                    .iter()
                    .enumerate()
                    .map(|(value, &pattern)| (pattern, value as u16))
            })
            .collect();
        flat.sort_unstable();

        let symbols: Vec<u32> = flat.iter().map(|&(pattern, _)| pattern).collect();
        let values: Vec<u16> = flat.iter().map(|&(_, value)| value).collect();
        let ratios = symbols.iter().map(|&symbol| symbol_ratios(symbol)).collect();
        Self {
            symbols,
            values,
            cluster_patterns,
            ratios,
        }
    }

    /// Codeword value of an exact 17-bit pattern, if it is a symbol
    pub fn codeword_value(&self, pattern: u32) -> Option<u16> {
        self.symbols
            .binary_search(&(pattern & 0x3FFFF))
            .ok()
            .map(|i| self.values[i])
    }

    /// Bit pattern of `value` in the given cluster (0, 3 or 6)
    pub fn pattern_for_codeword(&self, cluster: u8, value: u16) -> Option<u32> {
        if cluster % 3 != 0 || cluster > 6 {
            return None;
        }
        self.cluster_patterns[(cluster / 3) as usize]
            .get(value as usize)
            .copied()
    }

    /// The symbol whose module ratios are closest to the measured runs
    pub fn closest_symbol(&self, module_bit_count: &[usize; BARS_IN_MODULE]) -> Option<u32> {
        let bit_count_sum: usize = module_bit_count.iter().sum();
        let mut bit_count_ratios = [0.0f32; BARS_IN_MODULE];
        if bit_count_sum > 1 {
            for (ratio, &count) in bit_count_ratios.iter_mut().zip(module_bit_count) {
                *ratio = count as f32 / bit_count_sum as f32;
            }
        }
        let mut best_match = None;
        let mut best_error = f32::MAX;
        for (symbol_index, ratio_row) in self.ratios.iter().enumerate() {
            let mut error = 0.0f32;
            for (table_ratio, measured_ratio) in ratio_row.iter().zip(&bit_count_ratios) {
                let diff = table_ratio - measured_ratio;
                error += diff * diff;
                if error >= best_error {
                    break;
                }
            }
            if error < best_error {
                best_error = error;
                best_match = Some(self.symbols[symbol_index]);
            }
        }
        best_match
    }
}

/// Enumerate every run vector of `BARS_IN_MODULE` runs in 1..=6 summing to
/// `remaining`
fn collect_runs(
    depth: usize,
    remaining: usize,
    runs: &mut [usize; BARS_IN_MODULE],
    visit: &mut impl FnMut(&[usize; BARS_IN_MODULE]),
) {
    if depth == BARS_IN_MODULE - 1 {
        if (1..=6).contains(&remaining) {
            runs[depth] = remaining;
            visit(runs);
        }
        return;
    }
    let slots_left = BARS_IN_MODULE - depth - 1;
    for run in 1..=6 {
        if remaining < run + slots_left || remaining > run + slots_left * 6 {
            continue;
        }
        runs[depth] = run;
        collect_runs(depth + 1, remaining - run, runs, visit);
    }
}

fn pattern_from_runs(runs: &[usize; BARS_IN_MODULE]) -> u32 {
    let mut pattern = 0u32;
    for (i, &run) in runs.iter().enumerate() {
        for _ in 0..run {
            pattern = (pattern << 1) | u32::from(i % 2 == 0);
        }
    }
    pattern
}

fn symbol_ratios(symbol: u32) -> [f32; BARS_IN_MODULE] {
    let runs = runs_from_pattern(symbol);
    let mut ratios = [0.0f32; BARS_IN_MODULE];
    for (ratio, &run) in ratios.iter_mut().zip(&runs) {
        *ratio = run as f32 / MODULES_IN_CODEWORD as f32;
    }
    ratios
}

/// Run-length vector of a symbol pattern; valid symbols always have exactly
/// eight alternating runs starting with a bar
fn runs_from_pattern(pattern: u32) -> [usize; BARS_IN_MODULE] {
    let mut runs = [0usize; BARS_IN_MODULE];
    let mut run_index = 0;
    let mut current = true;
    for bit_index in (0..MODULES_IN_CODEWORD).rev() {
        let bit = (pattern >> bit_index) & 1 == 1;
        if bit != current {
            run_index += 1;
            current = bit;
        }
        runs[run_index] += 1;
    }
    runs
}
