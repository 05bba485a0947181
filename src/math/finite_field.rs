//! Finite field arithmetic for the block codes.
//!
//! Two fields are provided:
//!
//! - [`PrimeField`]: GF(q) for a prime q, the symbol alphabet of every code word.
//! - [`ExtensionField`]: GF(q^m), built from a primitive polynomial over GF(q).
//!   Elements are stored as integers whose base-q digits are the coefficients of
//!   the primitive element `a` (digit i is the coefficient of a^i), so the
//!   elements `0..q` coincide with the embedded base field.
//!
//! Multiplication in GF(q^m) uses logarithm and exponential tables, as is
//! customary for BCH and Reed-Solomon decoders.

use crate::error::{Error, Result};
use num_prime::nt_funcs::is_prime64;

/// Largest supported extension field size q^m
pub const MAX_FIELD_SIZE: usize = 1 << 20;

/// The prime field GF(q), symbols are `u8` values in `0..q`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeField {
    order: u8,
}

impl PrimeField {
    /// Creates GF(q), failing if `q` is not prime
    pub fn new(order: u8) -> Result<Self> {
        if !is_prime64(order as u64) {
            return Err(Error::Construction(format!(
                "Field order must be prime, got {}",
                order
            )));
        }
        Ok(PrimeField { order })
    }

    /// The binary field GF(2)
    pub fn binary() -> Self {
        PrimeField { order: 2 }
    }

    /// Number of elements q
    pub fn order(&self) -> u8 {
        self.order
    }

    /// Returns true if `symbol` is an element of this field
    pub fn contains(&self, symbol: u8) -> bool {
        symbol < self.order
    }

    /// Sum mod q
    pub fn add(&self, a: u8, b: u8) -> u8 {
        ((a as u16 + b as u16) % self.order as u16) as u8
    }

    /// Additive inverse, q - a
    pub fn neg(&self, a: u8) -> u8 {
        let a = a % self.order;
        if a == 0 {
            0
        } else {
            self.order - a
        }
    }

    /// Difference mod q
    pub fn sub(&self, a: u8, b: u8) -> u8 {
        self.add(a, self.neg(b))
    }

    /// Product mod q
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        ((a as u16 * b as u16) % self.order as u16) as u8
    }

    /// Multiplicative inverse via Fermat's little theorem, a^(q-2)
    pub fn inverse(&self, a: u8) -> Result<u8> {
        if a % self.order == 0 {
            return Err(Error::invalid(format!(
                "Cannot invert zero in GF({})",
                self.order
            )));
        }
        Ok(self.pow(a, self.order as u32 - 2))
    }

    /// a^exp by square and multiply
    pub fn pow(&self, a: u8, mut exp: u32) -> u8 {
        let mut result = 1 % self.order;
        let mut base = a % self.order;
        while exp > 0 {
            if exp & 1 != 0 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }
        result
    }

    /// Symbol-wise sum of two words of equal length
    pub fn add_words(&self, a: &[u8], b: &[u8]) -> Vec<u8> {
        a.iter().zip(b).map(|(&x, &y)| self.add(x, y)).collect()
    }

    /// Symbol-wise difference of two words of equal length
    pub fn sub_words(&self, a: &[u8], b: &[u8]) -> Vec<u8> {
        a.iter().zip(b).map(|(&x, &y)| self.sub(x, y)).collect()
    }

    /// Checks that every symbol of `word` lies in `0..q`
    pub fn check_word(&self, word: &[u8]) -> Result<()> {
        match word.iter().position(|&s| !self.contains(s)) {
            Some(i) => Err(Error::invalid(format!(
                "Symbol {} at position {} is not an element of GF({})",
                word[i], i, self.order
            ))),
            None => Ok(()),
        }
    }
}

/// The extension field GF(q^m) defined by a primitive polynomial over GF(q)
#[derive(Debug, Clone)]
pub struct ExtensionField {
    /// Base field GF(q)
    base: PrimeField,
    /// Extension degree m
    degree: usize,
    /// Number of elements q^m
    size: usize,
    /// Monic primitive polynomial, lowest degree first
    modulus: Vec<u8>,
    /// exp_table[i] = a^i for 0 <= i < q^m - 1
    exp_table: Vec<usize>,
    /// log_table[a^i] = i, entry 0 unused
    log_table: Vec<usize>,
}

impl ExtensionField {
    /// Builds GF(q^m) from the coefficients of a primitive polynomial, lowest degree first.
    ///
    /// The polynomial is normalised to be monic. Construction fails if it is not primitive,
    /// i.e. if its root does not generate the whole multiplicative group.
    pub fn new(base: PrimeField, modulus: &[u8]) -> Result<Self> {
        let q = base.order() as usize;
        base.check_word(modulus)?;

        let mut modulus = modulus.to_vec();
        while modulus.len() > 1 && modulus.last() == Some(&0) {
            modulus.pop();
        }
        if modulus.len() < 2 {
            return Err(Error::Construction(
                "Primitive polynomial must have degree at least 1".to_string(),
            ));
        }
        if modulus[0] == 0 {
            return Err(Error::Construction(
                "Primitive polynomial must have a nonzero constant term".to_string(),
            ));
        }

        let lead_inv = base.inverse(modulus[modulus.len() - 1])?;
        for c in modulus.iter_mut() {
            *c = base.mul(*c, lead_inv);
        }

        let degree = modulus.len() - 1;
        let size = q
            .checked_pow(degree as u32)
            .filter(|&s| s <= MAX_FIELD_SIZE)
            .ok_or_else(|| {
                Error::Construction(format!(
                    "Field GF({}^{}) exceeds the supported size {}",
                    q, degree, MAX_FIELD_SIZE
                ))
            })?;

        let mut field = ExtensionField {
            base,
            degree,
            size,
            modulus,
            exp_table: vec![0; size - 1],
            log_table: vec![0; size],
        };
        field.generate_tables()?;
        Ok(field)
    }

    /// Fills the exp/log tables by repeated multiplication with the primitive element
    fn generate_tables(&mut self) -> Result<()> {
        let order = self.size - 1;
        let mut x = 1;

        for i in 0..order {
            if i > 0 && x == 1 {
                return Err(Error::Construction(format!(
                    "Polynomial is not primitive: its root has order {} < {}",
                    i, order
                )));
            }
            self.exp_table[i] = x;
            self.log_table[x] = i;
            x = self.mul_by_alpha(x);
        }

        if x != 1 {
            return Err(Error::Construction(
                "Polynomial is not primitive over the base field".to_string(),
            ));
        }
        Ok(())
    }

    /// Multiplies an element by the primitive element, reducing by the modulus
    fn mul_by_alpha(&self, x: usize) -> usize {
        let q = self.base.order() as usize;
        let high = q.pow(self.degree as u32 - 1);
        let top = (x / high) as u8;
        let shifted = (x % high) * q;

        let mut result = 0;
        let mut place = 1;
        let mut rest = shifted;
        for i in 0..self.degree {
            let digit = (rest % q) as u8;
            rest /= q;
            let reduced = self.base.sub(digit, self.base.mul(top, self.modulus[i]));
            result += reduced as usize * place;
            place *= q;
        }
        result
    }

    /// Applies `op` digit by digit to the base-q representations of `a` and `b`
    fn digitwise(&self, a: usize, b: usize, op: impl Fn(u8, u8) -> u8) -> usize {
        let q = self.base.order() as usize;
        let (mut a, mut b) = (a, b);
        let mut result = 0;
        let mut place = 1;
        for _ in 0..self.degree {
            let digit = op((a % q) as u8, (b % q) as u8);
            result += digit as usize * place;
            place *= q;
            a /= q;
            b /= q;
        }
        result
    }

    /// The prime subfield GF(q)
    pub fn base(&self) -> PrimeField {
        self.base
    }

    /// Characteristic q of the field
    pub fn characteristic(&self) -> u8 {
        self.base.order()
    }

    /// Extension degree m
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of elements q^m
    pub fn size(&self) -> usize {
        self.size
    }

    /// Order of the multiplicative group, q^m - 1
    pub fn order(&self) -> usize {
        self.size - 1
    }

    /// The monic primitive polynomial, lowest degree first
    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    /// Digitwise sum of the GF(q) coordinates; XOR when q = 2
    pub fn add(&self, a: usize, b: usize) -> usize {
        if self.base.order() == 2 {
            return a ^ b;
        }
        self.digitwise(a, b, |x, y| self.base.add(x, y))
    }

    /// Digitwise difference of the GF(q) coordinates
    pub fn sub(&self, a: usize, b: usize) -> usize {
        if self.base.order() == 2 {
            return a ^ b;
        }
        self.digitwise(a, b, |x, y| self.base.sub(x, y))
    }

    /// Additive inverse
    pub fn neg(&self, a: usize) -> usize {
        self.sub(0, a)
    }

    /// Product through the log and exp tables
    pub fn mul(&self, a: usize, b: usize) -> usize {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = (self.log_table[a] + self.log_table[b]) % self.order();
        self.exp_table[sum]
    }

    /// Multiplicative inverse, alpha^(-log a). Zero has none.
    pub fn inverse(&self, a: usize) -> Result<usize> {
        if a == 0 {
            return Err(Error::invalid("Cannot invert zero in the finite field"));
        }
        let inv_log = (self.order() - self.log_table[a]) % self.order();
        Ok(self.exp_table[inv_log])
    }

    /// a / b, failing when b is zero
    pub fn div(&self, a: usize, b: usize) -> Result<usize> {
        Ok(self.mul(a, self.inverse(b)?))
    }

    /// a^e for the primitive element a; negative exponents are allowed
    pub fn alpha_pow(&self, exp: i64) -> usize {
        let order = self.order() as i64;
        self.exp_table[exp.rem_euclid(order) as usize]
    }

    /// x^e; negative exponents are allowed for nonzero x
    pub fn pow(&self, x: usize, exp: i64) -> usize {
        if x == 0 {
            return if exp == 0 { 1 } else { 0 };
        }
        self.alpha_pow(self.log_table[x] as i64 * exp)
    }

    /// Discrete logarithm to base a, `None` for zero
    pub fn log(&self, x: usize) -> Option<usize> {
        if x == 0 || x >= self.size {
            None
        } else {
            Some(self.log_table[x])
        }
    }

    /// Embeds a base field symbol
    pub fn from_symbol(&self, symbol: u8) -> usize {
        (symbol % self.base.order()) as usize
    }

    /// Projects an element back onto GF(q), `None` if it lies outside the base field
    pub fn to_symbol(&self, x: usize) -> Option<u8> {
        if x < self.base.order() as usize {
            Some(x as u8)
        } else {
            None
        }
    }

    /// Solves the square system `matrix * x = rhs` by Gauss-Jordan elimination.
    ///
    /// Returns `None` when the matrix is singular.
    pub fn solve(&self, mut matrix: Vec<Vec<usize>>, mut rhs: Vec<usize>) -> Option<Vec<usize>> {
        let n = rhs.len();
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return None;
        }

        for col in 0..n {
            let pivot = (col..n).find(|&r| matrix[r][col] != 0)?;
            matrix.swap(col, pivot);
            rhs.swap(col, pivot);

            let inv = self.inverse(matrix[col][col]).ok()?;
            for entry in matrix[col].iter_mut() {
                *entry = self.mul(*entry, inv);
            }
            rhs[col] = self.mul(rhs[col], inv);

            for row in 0..n {
                if row == col || matrix[row][col] == 0 {
                    continue;
                }
                let factor = matrix[row][col];
                for j in 0..n {
                    let term = self.mul(factor, matrix[col][j]);
                    matrix[row][j] = self.sub(matrix[row][j], term);
                }
                rhs[row] = self.sub(rhs[row], self.mul(factor, rhs[col]));
            }
        }

        Some(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf16() -> ExtensionField {
        // x^4 + x + 1
        ExtensionField::new(PrimeField::binary(), &[1, 1, 0, 0, 1]).unwrap()
    }

    #[test]
    fn test_prime_field_rejects_composite_order() {
        assert!(PrimeField::new(4).is_err());
        assert!(PrimeField::new(1).is_err());
        assert!(PrimeField::new(5).is_ok());
    }

    #[test]
    fn test_prime_field_arithmetic() {
        let f = PrimeField::new(5).unwrap();
        assert_eq!(f.add(3, 4), 2);
        assert_eq!(f.sub(1, 3), 3);
        assert_eq!(f.neg(2), 3);
        assert_eq!(f.mul(3, 4), 2);
        for a in 1..5 {
            let inv = f.inverse(a).unwrap();
            assert_eq!(f.mul(a, inv), 1);
        }
        assert!(f.inverse(0).is_err());
        assert_eq!(f.add_words(&[1, 2, 3], &[4, 4, 4]), vec![0, 1, 2]);
        assert_eq!(f.sub_words(&[0, 1], &[1, 1]), vec![4, 0]);
        assert!(f.check_word(&[0, 4, 5]).is_err());
    }

    #[test]
    fn test_extension_field_tables() {
        let f = gf16();
        assert_eq!(f.size(), 16);
        assert_eq!(f.order(), 15);
        // a^4 = a + 1
        assert_eq!(f.alpha_pow(4), 0b0011);
        assert_eq!(f.alpha_pow(15), 1);
        assert_eq!(f.alpha_pow(-1), f.alpha_pow(14));
        for x in 1..16 {
            let inv = f.inverse(x).unwrap();
            assert_eq!(f.mul(x, inv), 1);
            assert_eq!(f.alpha_pow(f.log(x).unwrap() as i64), x);
        }
    }

    #[test]
    fn test_ternary_extension_field() {
        // alpha^2 + alpha + 2 over GF(3): alpha^2 = 2*alpha + 1
        let f = ExtensionField::new(PrimeField::new(3).unwrap(), &[2, 1, 1]).unwrap();
        assert_eq!(f.size(), 9);
        assert_eq!(f.alpha_pow(2), 1 + 2 * 3);
        assert_eq!(f.add(5, 7), f.sub(5, f.neg(7)));
        assert_eq!(f.add(f.alpha_pow(1), f.neg(f.alpha_pow(1))), 0);
        assert_eq!(f.to_symbol(2), Some(2));
        assert_eq!(f.to_symbol(3), None);
    }

    #[test]
    fn test_non_primitive_polynomial_rejected() {
        // x^4 + x^3 + x^2 + x + 1 is irreducible but its root has order 5
        let result = ExtensionField::new(PrimeField::binary(), &[1, 1, 1, 1, 1]);
        assert!(matches!(result, Err(Error::Construction(_))));
        // x^2 + x has a zero constant term
        assert!(ExtensionField::new(PrimeField::binary(), &[0, 1, 1]).is_err());
    }

    #[test]
    fn test_solve_linear_system() {
        let f = gf16();
        let a = f.alpha_pow(3);
        let b = f.alpha_pow(7);
        // [1 a; b 1] * [x; y] = rhs, built from a known solution
        let (x, y) = (f.alpha_pow(2), f.alpha_pow(11));
        let rhs = vec![f.add(x, f.mul(a, y)), f.add(f.mul(b, x), y)];
        let solution = f.solve(vec![vec![1, a], vec![b, 1]], rhs).unwrap();
        assert_eq!(solution, vec![x, y]);

        // Singular system
        assert!(f.solve(vec![vec![a, a], vec![a, a]], vec![1, 1]).is_none());
    }
}
