//! Polynomials over the PDF417 modulus field
//!
//! Coefficients are stored in descending degree order (`coefficients[0]` is
//! the highest-degree term). Construction normalizes away redundant leading
//! zeros, so a nonzero polynomial never carries them and the zero polynomial
//! is exactly `[0]`.

use crate::decoder::modulus_gf::ModulusGF;

/// A normalized polynomial over GF(929)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulusPoly {
    coefficients: Vec<u16>,
}

impl ModulusPoly {
    /// Build a polynomial from descending-order coefficients, trimming
    /// leading zeros
    pub fn new(coefficients: Vec<u16>) -> Self {
        let first_nonzero = coefficients.iter().position(|&c| c != 0);
        match first_nonzero {
            None => Self::zero(),
            Some(0) => Self { coefficients },
            Some(i) => Self {
                coefficients: coefficients[i..].to_vec(),
            },
        }
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        Self {
            coefficients: vec![0],
        }
    }

    /// The constant polynomial 1
    pub fn one() -> Self {
        Self {
            coefficients: vec![1],
        }
    }

    /// `coefficient * x^degree`
    pub fn monomial(degree: usize, coefficient: u16) -> Self {
        if coefficient == 0 {
            return Self::zero();
        }
        let mut coefficients = vec![0; degree + 1];
        coefficients[0] = coefficient;
        Self { coefficients }
    }

    /// Degree of the polynomial (0 for the zero polynomial)
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Whether this is the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of the `x^degree` term (0 beyond the polynomial's degree)
    pub fn coefficient(&self, degree: usize) -> u16 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    /// Evaluate at `a` via Horner's scheme
    pub fn evaluate_at(&self, a: u16) -> u16 {
        if a == 0 {
            return self.coefficient(0);
        }
        if a == 1 {
            return self
                .coefficients
                .iter()
                .fold(0, |sum, &c| ModulusGF::add(sum, c));
        }
        self.coefficients
            .iter()
            .fold(0, |result, &c| ModulusGF::add(ModulusGF::multiply(a, result), c))
    }

    /// Polynomial addition
    pub fn add(&self, other: &ModulusPoly) -> ModulusPoly {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let (smaller, larger) = if self.coefficients.len() <= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };
        let length_diff = larger.len() - smaller.len();
        let mut sum = larger[..length_diff].to_vec();
        for (i, &c) in smaller.iter().enumerate() {
            sum.push(ModulusGF::add(c, larger[length_diff + i]));
        }
        ModulusPoly::new(sum)
    }

    /// Polynomial subtraction
    pub fn subtract(&self, other: &ModulusPoly) -> ModulusPoly {
        if other.is_zero() {
            return self.clone();
        }
        self.add(&other.negative())
    }

    /// Polynomial multiplication
    pub fn multiply(&self, other: &ModulusPoly) -> ModulusPoly {
        if self.is_zero() || other.is_zero() {
            return ModulusPoly::zero();
        }
        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0u16; a.len() + b.len() - 1];
        for (i, &a_coeff) in a.iter().enumerate() {
            for (j, &b_coeff) in b.iter().enumerate() {
                product[i + j] =
                    ModulusGF::add(product[i + j], ModulusGF::multiply(a_coeff, b_coeff));
            }
        }
        ModulusPoly::new(product)
    }

    /// Additive inverse of every coefficient
    pub fn negative(&self) -> ModulusPoly {
        ModulusPoly {
            coefficients: self
                .coefficients
                .iter()
                .map(|&c| ModulusGF::subtract(0, c))
                .collect(),
        }
    }

    /// Multiply every coefficient by a scalar
    pub fn multiply_scalar(&self, scalar: u16) -> ModulusPoly {
        if scalar == 0 {
            return ModulusPoly::zero();
        }
        if scalar == 1 {
            return self.clone();
        }
        ModulusPoly::new(
            self.coefficients
                .iter()
                .map(|&c| ModulusGF::multiply(c, scalar))
                .collect(),
        )
    }

    /// Multiply by `coefficient * x^degree`
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u16) -> ModulusPoly {
        if coefficient == 0 {
            return ModulusPoly::zero();
        }
        let mut product = Vec::with_capacity(self.coefficients.len() + degree);
        product.extend(
            self.coefficients
                .iter()
                .map(|&c| ModulusGF::multiply(c, coefficient)),
        );
        product.extend(std::iter::repeat_n(0, degree));
        ModulusPoly::new(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::modulus_gf::MODULUS;
    use proptest::prelude::*;

    #[test]
    fn test_leading_zeros_are_trimmed() {
        let padded = ModulusPoly::new(vec![0, 0, 5, 7]);
        let trimmed = ModulusPoly::new(vec![5, 7]);
        assert_eq!(padded, trimmed);
        assert_eq!(padded.degree(), 1);
    }

    #[test]
    fn test_zero_polynomial() {
        let zero = ModulusPoly::new(vec![0, 0, 0]);
        assert!(zero.is_zero());
        assert_eq!(zero.degree(), 0);
        assert_eq!(zero.evaluate_at(17), 0);
    }

    #[test]
    fn test_evaluate_matches_horner_expansion() {
        // 3x^2 + 5x + 7 at x = 2
        let poly = ModulusPoly::new(vec![3, 5, 7]);
        assert_eq!(poly.evaluate_at(2), (3 * 4 + 5 * 2 + 7) % MODULUS);
        assert_eq!(poly.evaluate_at(0), 7);
    }

    #[test]
    fn test_multiply_by_monomial_shifts_degree() {
        let poly = ModulusPoly::new(vec![2, 1]);
        let shifted = poly.multiply_by_monomial(3, 4);
        assert_eq!(shifted.degree(), 4);
        assert_eq!(shifted.coefficient(4), 8);
        assert_eq!(shifted.coefficient(3), 4);
        assert_eq!(shifted.coefficient(0), 0);
    }

    #[test]
    fn test_add_then_subtract_is_identity() {
        let a = ModulusPoly::new(vec![1, 2, 3]);
        let b = ModulusPoly::new(vec![900, 5]);
        assert_eq!(a.add(&b).subtract(&b), a);
    }

    proptest! {
        #[test]
        fn prop_padded_construction_evaluates_identically(
            coefficients in proptest::collection::vec(0u16..MODULUS, 1..6),
            padding in 1usize..4,
        ) {
            let mut padded = vec![0u16; padding];
            padded.extend_from_slice(&coefficients);
            let a = ModulusPoly::new(coefficients);
            let b = ModulusPoly::new(padded);
            prop_assert_eq!(&a, &b);
            for x in 0..MODULUS {
                prop_assert_eq!(a.evaluate_at(x), b.evaluate_at(x));
            }
        }

        #[test]
        fn prop_multiply_evaluates_pointwise(
            a in proptest::collection::vec(0u16..MODULUS, 1..5),
            b in proptest::collection::vec(0u16..MODULUS, 1..5),
            x in 0u16..MODULUS,
        ) {
            let pa = ModulusPoly::new(a);
            let pb = ModulusPoly::new(b);
            let product = pa.multiply(&pb);
            prop_assert_eq!(
                product.evaluate_at(x),
                ModulusGF::multiply(pa.evaluate_at(x), pb.evaluate_at(x))
            );
        }
    }
}
