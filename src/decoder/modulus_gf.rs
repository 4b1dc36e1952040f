//! Modulus field arithmetic for the PDF417 Reed-Solomon code
//!
//! PDF417 error correction works over GF(929), the prime field of the
//! symbology's codeword alphabet, with 3 as the primitive element. The
//! exp/log tables are built at compile time, so every scalar operation is a
//! table lookup with no allocation.

use crate::error::DivisionByZeroError;

/// Size of the codeword alphabet and of the prime field
pub const MODULUS: u16 = 929;

/// Primitive element generating the multiplicative group of the field
const PRIMITIVE: u32 = 3;

const fn build_exp_table() -> [u16; MODULUS as usize] {
    let mut table = [0u16; MODULUS as usize];
    let mut x: u32 = 1;
    let mut i = 0;
    while i < MODULUS as usize {
        table[i] = x as u16;
        x = (x * PRIMITIVE) % MODULUS as u32;
        i += 1;
    }
    table
}

const fn build_log_table() -> [u16; MODULUS as usize] {
    let exp = build_exp_table();
    let mut table = [0u16; MODULUS as usize];
    let mut i = 0;
    while i < (MODULUS - 1) as usize {
        table[exp[i] as usize] = i as u16;
        i += 1;
    }
    table
}

static EXP_TABLE: [u16; MODULUS as usize] = build_exp_table();
static LOG_TABLE: [u16; MODULUS as usize] = build_log_table();

/// GF(929) scalar operations
pub struct ModulusGF;

impl ModulusGF {
    /// Field addition
    #[inline]
    pub fn add(a: u16, b: u16) -> u16 {
        (a + b) % MODULUS
    }

    /// Field subtraction
    #[inline]
    pub fn subtract(a: u16, b: u16) -> u16 {
        (MODULUS + a - b) % MODULUS
    }

    /// Field multiplication via the log/exp tables
    #[inline]
    pub fn multiply(a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
        EXP_TABLE[log_sum % (MODULUS - 1) as usize]
    }

    /// The primitive element raised to the `i`-th power
    #[inline]
    pub fn exp(i: usize) -> u16 {
        EXP_TABLE[i % (MODULUS - 1) as usize]
    }

    /// Discrete logarithm of a nonzero field element
    #[inline]
    pub fn log(a: u16) -> u16 {
        debug_assert!(a != 0, "log of zero is undefined");
        LOG_TABLE[a as usize]
    }

    /// Multiplicative inverse; fails only for zero
    #[inline]
    pub fn inverse(a: u16) -> Result<u16, DivisionByZeroError> {
        if a == 0 {
            return Err(DivisionByZeroError);
        }
        Ok(EXP_TABLE[(MODULUS - 1 - LOG_TABLE[a as usize]) as usize])
    }
}
