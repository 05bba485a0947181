//! Dense univariate polynomials over GF(q^m).
//!
//! Coefficients are field elements of an [`ExtensionField`], lowest degree first.
//! The field is passed to every arithmetic operation instead of being stored,
//! so polynomials stay plain values that can be cloned and compared freely.

use crate::error::{Error, Result};
use crate::math::finite_field::{ExtensionField, PrimeField, MAX_FIELD_SIZE};

/// Polynomial with coefficients in GF(q^m); the zero polynomial has no coefficients
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polynomial {
    coeffs: Vec<usize>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients, lowest degree first
    pub fn new(mut coeffs: Vec<usize>) -> Self {
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        Polynomial { coeffs }
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        Polynomial { coeffs: Vec::new() }
    }

    /// The constant 1
    pub fn one() -> Self {
        Polynomial { coeffs: vec![1] }
    }

    /// c * x^degree
    pub fn monomial(coeff: usize, degree: usize) -> Self {
        let mut coeffs = vec![0; degree + 1];
        coeffs[degree] = coeff;
        Polynomial::new(coeffs)
    }

    /// Reads a word over GF(q) whose first symbol is the highest-degree coefficient
    pub fn from_word(word: &[u8]) -> Self {
        Polynomial::new(word.iter().rev().map(|&s| s as usize).collect())
    }

    /// Writes the polynomial as a word of `len` symbols, highest degree first.
    ///
    /// Returns `None` if a coefficient lies outside GF(q) or the degree does not fit.
    pub fn to_word(&self, field: &ExtensionField, len: usize) -> Option<Vec<u8>> {
        if self.coeffs.len() > len {
            return None;
        }
        let mut word = vec![0u8; len];
        for (i, &c) in self.coeffs.iter().enumerate() {
            word[len - 1 - i] = field.to_symbol(c)?;
        }
        Some(word)
    }

    /// Coefficients, lowest degree first, without trailing zeros
    pub fn coeffs(&self) -> &[usize] {
        &self.coeffs
    }

    /// Coefficient of x^i, zero beyond the degree
    pub fn coeff(&self, i: usize) -> usize {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// Degree, `None` for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// True for the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Horner evaluation at `x`
    pub fn eval(&self, field: &ExtensionField, x: usize) -> usize {
        self.coeffs
            .iter()
            .rev()
            .fold(0, |acc, &c| field.add(field.mul(acc, x), c))
    }

    /// Coefficientwise sum
    pub fn add(&self, field: &ExtensionField, other: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        Polynomial::new(
            (0..len)
                .map(|i| field.add(self.coeff(i), other.coeff(i)))
                .collect(),
        )
    }

    /// Coefficientwise difference
    pub fn sub(&self, field: &ExtensionField, other: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        Polynomial::new(
            (0..len)
                .map(|i| field.sub(self.coeff(i), other.coeff(i)))
                .collect(),
        )
    }

    /// Schoolbook product
    pub fn mul(&self, field: &ExtensionField, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        let mut result = vec![0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                result[i + j] = field.add(result[i + j], field.mul(a, b));
            }
        }
        Polynomial::new(result)
    }

    /// Multiplies every coefficient by `c`
    pub fn scale(&self, field: &ExtensionField, c: usize) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|&a| field.mul(a, c)).collect())
    }

    /// Multiplies by x^k
    pub fn shift(&self, k: usize) -> Polynomial {
        if self.is_zero() {
            return Polynomial::zero();
        }
        let mut coeffs = vec![0; k];
        coeffs.extend_from_slice(&self.coeffs);
        Polynomial { coeffs }
    }

    /// Remainder of division by `divisor`
    pub fn rem(&self, field: &ExtensionField, divisor: &Polynomial) -> Result<Polynomial> {
        let div_deg = divisor
            .degree()
            .ok_or_else(|| Error::invalid("Polynomial division by zero"))?;
        let lead_inv = field.inverse(divisor.coeffs[div_deg])?;

        let mut rem = self.coeffs.clone();
        while rem.len() > div_deg {
            let top = rem.len() - 1;
            let factor = field.mul(rem[top], lead_inv);
            if factor != 0 {
                let offset = top - div_deg;
                for (j, &d) in divisor.coeffs.iter().enumerate() {
                    rem[offset + j] = field.sub(rem[offset + j], field.mul(factor, d));
                }
            }
            rem.pop();
        }
        Ok(Polynomial::new(rem))
    }

    /// Formal derivative; the integer factor i is reduced modulo the characteristic
    pub fn derivative(&self, field: &ExtensionField) -> Polynomial {
        let q = field.characteristic() as usize;
        Polynomial::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, &c)| field.mul(field.from_symbol((i % q) as u8), c))
                .collect(),
        )
    }

    /// Reduction modulo x^len
    pub fn truncate(&self, len: usize) -> Polynomial {
        Polynomial::new(self.coeffs.iter().take(len).copied().collect())
    }
}

/// Parses a polynomial over GF(q) written in `var`, e.g. `"alpha^4+alpha+1"` or
/// `"alpha^3 + 2*alpha + 1"`. Returns the coefficients, lowest degree first.
///
/// Exponents e with q^e above [`MAX_FIELD_SIZE`] are rejected.
pub fn parse_polynomial(expr: &str, var: &str, field: PrimeField) -> Result<Vec<u8>> {
    if var.is_empty() || !var.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::invalid(format!("Invalid indeterminate name '{}'", var)));
    }

    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(Error::invalid("Empty polynomial expression"));
    }

    let mut terms = Vec::new();
    let mut current = String::new();
    let mut negative = false;
    for ch in compact.chars() {
        if ch == '+' || ch == '-' {
            if !current.is_empty() {
                terms.push((negative, std::mem::take(&mut current)));
            } else if !terms.is_empty() {
                return Err(Error::invalid(format!("Malformed polynomial '{}'", expr)));
            }
            negative = ch == '-';
        } else {
            current.push(ch);
        }
    }
    if current.is_empty() {
        return Err(Error::invalid(format!("Malformed polynomial '{}'", expr)));
    }
    terms.push((negative, current));

    let mut coeffs: Vec<u8> = Vec::new();
    for (negative, term) in terms {
        let (coeff, exp) = parse_term(&term, var, field)?;
        if coeffs.len() <= exp {
            coeffs.resize(exp + 1, 0);
        }
        let coeff = if negative { field.neg(coeff) } else { coeff };
        coeffs[exp] = field.add(coeffs[exp], coeff);
    }
    Ok(coeffs)
}

/// Parses `c`, `var`, `c*var`, `var^e` or `c*var^e`
fn parse_term(term: &str, var: &str, field: PrimeField) -> Result<(u8, usize)> {
    let parse_num = |s: &str| -> Result<u64> {
        s.parse::<u64>()
            .map_err(|_| Error::invalid(format!("Invalid number '{}' in polynomial", s)))
    };

    match term.find(var) {
        None => {
            let c = parse_num(term)?;
            Ok(((c % field.order() as u64) as u8, 0))
        }
        Some(pos) => {
            let coeff_part = term[..pos].trim_end_matches('*');
            let power_part = &term[pos + var.len()..];

            let coeff = if coeff_part.is_empty() {
                1
            } else {
                (parse_num(coeff_part)? % field.order() as u64) as u8
            };
            let exp = if power_part.is_empty() {
                1
            } else if let Some(e) = power_part.strip_prefix('^') {
                parse_num(e)?
            } else {
                return Err(Error::invalid(format!("Malformed term '{}'", term)));
            };
            // A modulus of degree e defines a field of q^e elements
            let size = u32::try_from(exp)
                .ok()
                .and_then(|e| (field.order() as usize).checked_pow(e))
                .filter(|&size| size <= MAX_FIELD_SIZE);
            if size.is_none() {
                return Err(Error::Construction(format!(
                    "Exponent {} exceeds the largest supported field of {} elements",
                    exp, MAX_FIELD_SIZE
                )));
            }
            Ok((coeff, exp as usize))
        }
    }
}
