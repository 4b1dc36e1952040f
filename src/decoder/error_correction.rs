//! Reed-Solomon style error correction over the modulus field
//!
//! Repairs a codeword sequence in place: syndrome computation, the extended
//! Euclidean algorithm for the error locator and evaluator polynomials, a
//! Chien search for the error locations, and Forney's formula for the error
//! magnitudes. Erasure positions are zero-filled by the caller and repaired
//! as ordinary errors; the erasure locator polynomial is assembled but not
//! folded into the syndrome.

use log::debug;

use crate::decoder::modulus_gf::ModulusGF;
use crate::decoder::modulus_poly::ModulusPoly;
use crate::error::DecodeError;

/// Erasures tolerated beyond half the error correction codeword count
pub const MAX_ERRORS: usize = 3;

/// Upper bound on the error correction codeword count (EC level 8)
pub const MAX_EC_CODEWORDS: usize = 512;

/// Validate capacity limits, then repair `codewords` in place
///
/// Returns the number of corrected errors. Every failure mode surfaces as a
/// [`DecodeError`], never a panic.
pub fn correct_errors(
    codewords: &mut [u16],
    erasures: &[usize],
    num_ec_codewords: usize,
) -> Result<usize, DecodeError> {
    if erasures.len() > num_ec_codewords / 2 + MAX_ERRORS {
        return Err(DecodeError::ErasureOverflow);
    }
    if num_ec_codewords > MAX_EC_CODEWORDS {
        return Err(DecodeError::Uncorrectable);
    }
    decode(codewords, num_ec_codewords, erasures)
}

/// Repair `received` in place, returning the corrected-error count
pub fn decode(
    received: &mut [u16],
    num_ec_codewords: usize,
    erasures: &[usize],
) -> Result<usize, DecodeError> {
    let poly = ModulusPoly::new(received.to_vec());
    let mut syndromes = vec![0u16; num_ec_codewords];
    let mut has_error = false;
    for i in (1..=num_ec_codewords).rev() {
        let eval = poly.evaluate_at(ModulusGF::exp(i));
        syndromes[num_ec_codewords - i] = eval;
        if eval != 0 {
            has_error = true;
        }
    }
    if !has_error {
        return Ok(0);
    }

    // Assembled for the record; deliberately not multiplied into the
    // syndrome, so erasures participate only through their zero fill.
    let _known_erasures = erasure_locator(received.len(), erasures);

    let syndrome = ModulusPoly::new(syndromes);
    let (sigma, omega) = run_euclidean_algorithm(
        ModulusPoly::monomial(num_ec_codewords, 1),
        syndrome,
        num_ec_codewords,
    )?;
    let error_locations = find_error_locations(&sigma)?;
    let error_magnitudes = find_error_magnitudes(&omega, &sigma, &error_locations)?;

    for (&location, &magnitude) in error_locations.iter().zip(error_magnitudes.iter()) {
        let position = received.len() as i32 - 1 - ModulusGF::log(location) as i32;
        if position < 0 {
            return Err(DecodeError::Uncorrectable);
        }
        let position = position as usize;
        received[position] = ModulusGF::subtract(received[position], magnitude);
    }
    debug!("repaired {} codeword errors", error_locations.len());
    Ok(error_locations.len())
}

/// Product of `(1 - b·x)` terms, one per erasure location
pub(crate) fn erasure_locator(codeword_count: usize, erasures: &[usize]) -> ModulusPoly {
    let mut locator = ModulusPoly::one();
    for &erasure in erasures.iter().filter(|&&e| e < codeword_count) {
        let b = ModulusGF::exp(codeword_count - 1 - erasure);
        let term = ModulusPoly::new(vec![ModulusGF::subtract(0, b), 1]);
        locator = locator.multiply(&term);
    }
    locator
}

fn run_euclidean_algorithm(
    a: ModulusPoly,
    b: ModulusPoly,
    num_ec_codewords: usize,
) -> Result<(ModulusPoly, ModulusPoly), DecodeError> {
    let (mut r_last, mut r) = if a.degree() < b.degree() { (b, a) } else { (a, b) };
    let mut t_last = ModulusPoly::zero();
    let mut t = ModulusPoly::one();

    // Run until the remainder degree drops below half the EC codeword count
    while r.degree() >= num_ec_codewords / 2 {
        let r_last_last = std::mem::replace(&mut r_last, r);
        let t_last_last = std::mem::replace(&mut t_last, t);
        if r_last.is_zero() {
            // Euclidean algorithm already terminated
            return Err(DecodeError::Uncorrectable);
        }
        r = r_last_last;
        let mut q = ModulusPoly::zero();
        let denominator_leading_term = r_last.coefficient(r_last.degree());
        let dlt_inverse = ModulusGF::inverse(denominator_leading_term)
            .map_err(|_| DecodeError::Uncorrectable)?;
        while r.degree() >= r_last.degree() && !r.is_zero() {
            let degree_diff = r.degree() - r_last.degree();
            let scale = ModulusGF::multiply(r.coefficient(r.degree()), dlt_inverse);
            q = q.add(&ModulusPoly::monomial(degree_diff, scale));
            r = r.subtract(&r_last.multiply_by_monomial(degree_diff, scale));
        }
        t = q.multiply(&t_last).subtract(&t_last_last).negative();
    }

    let sigma_tilde_at_zero = t.coefficient(0);
    if sigma_tilde_at_zero == 0 {
        return Err(DecodeError::Uncorrectable);
    }
    let inverse =
        ModulusGF::inverse(sigma_tilde_at_zero).map_err(|_| DecodeError::Uncorrectable)?;
    let sigma = t.multiply_scalar(inverse);
    let omega = r.multiply_scalar(inverse);
    Ok((sigma, omega))
}

fn find_error_locations(error_locator: &ModulusPoly) -> Result<Vec<u16>, DecodeError> {
    let num_errors = error_locator.degree();
    let mut result = Vec::with_capacity(num_errors);
    for i in 1..crate::decoder::modulus_gf::MODULUS {
        if error_locator.evaluate_at(i) == 0 {
            let location = ModulusGF::inverse(i).map_err(|_| DecodeError::Uncorrectable)?;
            result.push(location);
            if result.len() == num_errors {
                break;
            }
        }
    }
    if result.len() != num_errors {
        return Err(DecodeError::Uncorrectable);
    }
    Ok(result)
}

fn find_error_magnitudes(
    error_evaluator: &ModulusPoly,
    error_locator: &ModulusPoly,
    error_locations: &[u16],
) -> Result<Vec<u16>, DecodeError> {
    let error_locator_degree = error_locator.degree();
    let mut derivative_coefficients = vec![0u16; error_locator_degree];
    for i in 1..=error_locator_degree {
        derivative_coefficients[error_locator_degree - i] =
            ModulusGF::multiply(i as u16, error_locator.coefficient(i));
    }
    let formal_derivative = ModulusPoly::new(derivative_coefficients);

    error_locations
        .iter()
        .map(|&location| {
            let xi_inverse = ModulusGF::inverse(location).map_err(|_| DecodeError::Uncorrectable)?;
            let numerator = ModulusGF::subtract(0, error_evaluator.evaluate_at(xi_inverse));
            let denominator = ModulusGF::inverse(formal_derivative.evaluate_at(xi_inverse))
                .map_err(|_| DecodeError::Uncorrectable)?;
            Ok(ModulusGF::multiply(numerator, denominator))
        })
        .collect()
}
