//! BCH (Bose-Chaudhuri-Hocquenghem) error correction code implementation.
//!
//! BCH codes are a class of cyclic error-correcting codes constructed using polynomials over finite fields.
//! Named after their inventors Raj Bose, Dwijendra Kumar Chaudhuri, and Alexis Hocquenghem, they are powerful
//! codes that can detect and correct multiple random errors.
//!
//! A primitive BCH code over GF(q) with designed distance d and offset c has length
//! n = q^m - 1. Its generator polynomial is the least common multiple of the minimal
//! polynomials of a^c, ..., a^(c+d-2), where a is a primitive element of GF(q^m).
//! Any pattern of at most t = (d - 1) / 2 symbol errors is corrected.
//!
//! BCH codes are valuable in applications such as:
//!
//! - Digital storage systems (hard drives, SSDs)
//! - Memory systems (RAM, NAND Flash)
//! - Digital television (DVB, ATSC)
//! - Key reconstruction from noisy sources
//!
//! This implementation provides:
//! - Codes over any prime alphabet, defined by a primitive polynomial in text form
//! - Systematic encoding, with the message in the first k symbols of a codeword
//! - The Peterson-Gorenstein-Zierler decoder and a Berlekamp-Massey decoder,
//!   both finished by Chien search and, for q > 2, Forney's algorithm
//!
//! Words are written highest degree first: symbol 0 is the coefficient of x^(n-1).

use crate::cs::ecc::{check_length, CodeParameters, Error, ErrorCorrection, Result, Word};
use crate::math::finite_field::{ExtensionField, PrimeField};
use crate::math::polynomial::{parse_polynomial, Polynomial};
use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// BCH code over GF(q) with roots a^c, ..., a^(c+d-2)
#[derive(Debug, Clone)]
pub struct BchCode {
    /// Designed distance
    d: usize,
    /// Offset of the first consecutive root
    c: usize,
    /// Code length (n = q^m - 1)
    n: usize,
    /// Number of message symbols
    k: usize,
    /// Symbol alphabet GF(q)
    base: PrimeField,
    /// Splitting field GF(q^m)
    field: ExtensionField,
    /// Generator polynomial, degree n - k
    generator: Polynomial,
}

impl BchCode {
    /// Create a new BCH code from a primitive polynomial written in text.
    ///
    /// # Arguments
    ///
    /// * `q` - Alphabet size, must be prime
    /// * `d` - Designed distance, at least 2
    /// * `c` - Exponent of the first consecutive root a^c
    /// * `primitive_poly` - Primitive polynomial over GF(q), e.g. `"alpha^4+alpha+1"`
    /// * `primitive_element` - Name of the indeterminate used in `primitive_poly`
    ///
    /// # Returns
    ///
    /// A new `BchCode` instance or an error if the parameters are invalid
    pub fn new(
        q: u8,
        d: usize,
        c: usize,
        primitive_poly: &str,
        primitive_element: &str,
    ) -> Result<Self> {
        let base = PrimeField::new(q)?;
        let modulus = parse_polynomial(primitive_poly, primitive_element, base)?;
        Self::from_modulus(q, d, c, &modulus)
    }

    /// Create a new BCH code from the coefficients of a primitive polynomial, lowest degree first
    pub fn from_modulus(q: u8, d: usize, c: usize, modulus: &[u8]) -> Result<Self> {
        let base = PrimeField::new(q)?;
        let field = ExtensionField::new(base, modulus)?;
        let n = field.order();

        if d < 2 || d > n {
            return Err(Error::Construction(format!(
                "Designed distance must be between 2 and {}, got {}",
                n, d
            )));
        }

        let roots = Self::consecutive_root_closure(n, q as usize, c, d);
        let generator = roots.iter().fold(Polynomial::one(), |g, &j| {
            let factor = Polynomial::new(vec![field.neg(field.alpha_pow(j as i64)), 1]);
            g.mul(&field, &factor)
        });

        // The product of full cyclotomic cosets always lies in GF(q)[x]
        if generator
            .coeffs()
            .iter()
            .any(|&g| field.to_symbol(g).is_none())
        {
            return Err(Error::Construction(
                "Generator polynomial has coefficients outside the base field".to_string(),
            ));
        }

        let redundancy = generator.degree().unwrap_or(0);
        if redundancy >= n {
            return Err(Error::Construction(format!(
                "Designed distance {} leaves no message symbols for n = {}",
                d, n
            )));
        }

        debug!(
            "built BCH({},{},{}) over GF({}^{}), generator degree {}",
            n,
            n - redundancy,
            d,
            q,
            field.degree(),
            redundancy
        );

        Ok(BchCode {
            d,
            c,
            n,
            k: n - redundancy,
            base,
            field,
            generator,
        })
    }

    /// Exponents j of all roots a^j: the union of the cyclotomic cosets of c, ..., c + d - 2
    fn consecutive_root_closure(n: usize, q: usize, c: usize, d: usize) -> BTreeSet<usize> {
        let mut roots = BTreeSet::new();
        for i in c..c + d - 1 {
            let mut j = i % n;
            while roots.insert(j) {
                j = (j * q) % n;
            }
        }
        roots
    }

    /// Get the code length (n)
    pub fn code_length(&self) -> usize {
        self.n
    }

    /// Get the number of message symbols (k)
    pub fn data_length(&self) -> usize {
        self.k
    }

    /// Get the number of errors that are always corrected (t)
    pub fn error_correction_capability(&self) -> usize {
        (self.d - 1) / 2
    }

    /// Designed distance d
    pub fn designed_distance(&self) -> usize {
        self.d
    }

    /// First consecutive root exponent c
    pub fn offset(&self) -> usize {
        self.c
    }

    /// The field GF(q^m) holding the roots
    pub fn field(&self) -> &ExtensionField {
        &self.field
    }

    /// Generator polynomial as a word of n - k + 1 symbols, highest degree first
    pub fn generator_polynomial(&self) -> Word {
        self.generator.coeffs().iter().rev().map(|&g| g as u8).collect()
    }

    /// Encode a message of k symbols.
    ///
    /// The message polynomial m(x) is shifted to m(x) x^(n-k) and its remainder
    /// modulo g(x) is subtracted, giving a multiple of g(x) whose top k
    /// coefficients are the message.
    pub fn encode(&self, message: &[u8]) -> Result<Word> {
        check_length(message, self.k)?;
        self.base.check_word(message)?;

        let shifted = Polynomial::from_word(message).shift(self.n - self.k);
        let remainder = shifted.rem(&self.field, &self.generator)?;
        shifted
            .sub(&self.field, &remainder)
            .to_word(&self.field, self.n)
            .ok_or_else(|| Error::Construction("Codeword left the base field".to_string()))
    }

    /// Decode with the Peterson-Gorenstein-Zierler decoder
    pub fn decode(&self, received: &[u8]) -> Result<Word> {
        self.decode_with(received, |syndromes| self.peterson_gorenstein_zierler(syndromes))
    }

    /// Decode with the Berlekamp-Massey decoder.
    ///
    /// Corrects exactly the same error patterns as [`BchCode::decode`].
    pub fn decode_berlekamp_massey(&self, received: &[u8]) -> Result<Word> {
        self.decode_with(received, |syndromes| self.berlekamp_massey_locator(syndromes))
    }

    /// View of this code that decodes with Berlekamp-Massey
    pub fn berlekamp_massey(&self) -> BerlekampMassey<'_> {
        BerlekampMassey { code: self }
    }

    fn decode_with<F>(&self, received: &[u8], locator: F) -> Result<Word>
    where
        F: Fn(&[usize]) -> Result<Polynomial>,
    {
        check_length(received, self.n)?;
        self.base.check_word(received)?;

        let syndromes = self.syndromes(received);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(received.to_vec());
        }
        trace!("BCH syndromes {:?}", syndromes);

        let locator = locator(syndromes.as_slice())?;
        self.correct(received, &syndromes, &locator).map_err(|e| {
            debug!("BCH decode failed: {}", e);
            e
        })
    }

    /// s_j = r(a^(c+j)) for j = 0..d-2
    fn syndromes(&self, word: &[u8]) -> Vec<usize> {
        let poly = Polynomial::from_word(word);
        (0..self.d - 1)
            .map(|j| poly.eval(&self.field, self.field.alpha_pow((self.c + j) as i64)))
            .collect()
    }

    /// Solves the Hankel syndrome system for the largest nonsingular error count v <= t
    fn peterson_gorenstein_zierler(&self, syndromes: &[usize]) -> Result<Polynomial> {
        let t = self.error_correction_capability();

        for v in (1..=t).rev() {
            let matrix = (0..v)
                .map(|i| (0..v).map(|j| syndromes[i + j]).collect())
                .collect();
            let rhs = (0..v).map(|i| self.field.neg(syndromes[v + i])).collect();

            match self.field.solve(matrix, rhs) {
                Some(sigma) => {
                    let coeffs = std::iter::once(1)
                        .chain((0..v).map(|i| sigma[v - 1 - i]))
                        .collect();
                    return Ok(Polynomial::new(coeffs));
                }
                None => trace!("PGZ: {}x{} syndrome matrix is singular", v, v),
            }
        }

        Err(Error::uncorrectable(
            "Syndrome matrix is singular for every error count",
        ))
    }

    /// Shortest linear feedback shift register generating the syndrome sequence
    fn berlekamp_massey_locator(&self, syndromes: &[usize]) -> Result<Polynomial> {
        let field = &self.field;
        let mut c = vec![1usize];
        let mut b = vec![1usize];
        let mut l = 0;
        let mut m = 1;
        let mut prev_discrepancy = 1;

        for i in 0..syndromes.len() {
            let discrepancy = (1..=l)
                .filter(|&j| j < c.len())
                .fold(syndromes[i], |acc, j| {
                    field.add(acc, field.mul(c[j], syndromes[i - j]))
                });
            if discrepancy == 0 {
                m += 1;
                continue;
            }

            let coef = field.div(discrepancy, prev_discrepancy)?;
            let previous = c.clone();
            if c.len() < b.len() + m {
                c.resize(b.len() + m, 0);
            }
            for (j, &bj) in b.iter().enumerate() {
                c[j + m] = field.sub(c[j + m], field.mul(coef, bj));
            }

            if 2 * l <= i {
                l = i + 1 - l;
                b = previous;
                prev_discrepancy = discrepancy;
                m = 1;
            } else {
                m += 1;
            }
        }

        let locator = Polynomial::new(c);
        if locator.degree() != Some(l) {
            return Err(Error::uncorrectable(format!(
                "Locator degree {:?} differs from register length {}",
                locator.degree(),
                l
            )));
        }
        Ok(locator)
    }

    /// Finds the error positions of `locator` and subtracts the error values
    fn correct(&self, received: &[u8], syndromes: &[usize], locator: &Polynomial) -> Result<Word> {
        let n = self.n;
        let t = self.error_correction_capability();
        let errors = locator.degree().unwrap_or(0);
        if errors == 0 || errors > t {
            return Err(Error::uncorrectable(format!(
                "Error locator of degree {} exceeds the correction capability {}",
                errors, t
            )));
        }

        let roots = self.chien_search(locator);
        trace!("Chien search roots {:?}", roots);
        if roots.len() != errors {
            return Err(Error::uncorrectable(format!(
                "Error locator of degree {} has {} roots",
                errors,
                roots.len()
            )));
        }

        let mut corrected = received.to_vec();
        if self.base.order() == 2 {
            for &k in &roots {
                let index = n - 1 - (n - k) % n;
                corrected[index] = self.base.sub(corrected[index], 1);
            }
        } else {
            let field = &self.field;
            let omega = Polynomial::new(syndromes.to_vec())
                .mul(field, locator)
                .truncate(self.d - 1);
            let derivative = locator.derivative(field);

            for &k in &roots {
                let x_inv = field.alpha_pow(k as i64);
                let position = (n - k) % n;

                let denominator = derivative.eval(field, x_inv);
                if denominator == 0 {
                    return Err(Error::uncorrectable("Forney denominator vanishes"));
                }
                let scale = field.alpha_pow((1 - self.c as i64) * position as i64);
                let numerator = field.mul(scale, omega.eval(field, x_inv));
                let value = field.neg(field.div(numerator, denominator)?);
                let symbol = field.to_symbol(value).ok_or_else(|| {
                    Error::uncorrectable("Error magnitude lies outside the base field")
                })?;

                trace!("error of value {} at x^{}", symbol, position);
                let index = n - 1 - position;
                corrected[index] = self.base.sub(corrected[index], symbol);
            }
        }

        if self.syndromes(&corrected).iter().any(|&s| s != 0) {
            return Err(Error::uncorrectable(
                "Corrected word is not a codeword",
            ));
        }
        Ok(corrected)
    }

    /// Exponents k in 0..n with locator(a^k) = 0, in ascending order.
    ///
    /// Each term lambda_j a^(jk) is updated incrementally by a^j.
    #[cfg(not(feature = "parallel"))]
    fn chien_search(&self, locator: &Polynomial) -> Vec<usize> {
        let field = &self.field;
        let mut terms = locator.coeffs().to_vec();
        let steps: Vec<usize> = (0..terms.len())
            .map(|j| field.alpha_pow(j as i64))
            .collect();

        let mut roots = Vec::new();
        for k in 0..self.n {
            if terms.iter().fold(0, |acc, &x| field.add(acc, x)) == 0 {
                roots.push(k);
            }
            for (term, &step) in terms.iter_mut().zip(&steps) {
                *term = field.mul(*term, step);
            }
        }
        roots
    }

    /// Exponents k in 0..n with locator(a^k) = 0, in ascending order
    #[cfg(feature = "parallel")]
    fn chien_search(&self, locator: &Polynomial) -> Vec<usize> {
        let field = &self.field;
        (0..self.n)
            .into_par_iter()
            .filter(|&k| locator.eval(field, field.alpha_pow(k as i64)) == 0)
            .collect()
    }
}

impl ErrorCorrection for BchCode {
    fn parameters(&self) -> CodeParameters {
        CodeParameters {
            q: self.base.order(),
            n: self.n,
            k: self.k,
            d: self.d,
        }
    }

    fn encode(&self, message: &[u8]) -> Result<Word> {
        BchCode::encode(self, message)
    }

    fn decode(&self, received: &[u8]) -> Result<Word> {
        BchCode::decode(self, received)
    }
}

/// A BCH code that decodes with Berlekamp-Massey instead of PGZ
#[derive(Debug, Clone, Copy)]
pub struct BerlekampMassey<'a> {
    code: &'a BchCode,
}

impl ErrorCorrection for BerlekampMassey<'_> {
    fn parameters(&self) -> CodeParameters {
        self.code.parameters()
    }

    fn encode(&self, message: &[u8]) -> Result<Word> {
        self.code.encode(message)
    }

    fn decode(&self, received: &[u8]) -> Result<Word> {
        self.code.decode_berlekamp_massey(received)
    }
}

impl Display for BchCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BCH({},{},{}) over GF({}^{})",
            self.n,
            self.k,
            self.d,
            self.base.order(),
            self.field.degree()
        )
    }
}

/// Create a BCH code from a primitive polynomial in `alpha`
pub fn create_bch(q: u8, d: usize, c: usize, primitive_poly: &str) -> Result<BchCode> {
    BchCode::new(q, d, c, primitive_poly, "alpha")
}

/// Create the binary BCH(15,5,7) code over GF(2^4)
pub fn create_bch_15_5_7() -> Result<BchCode> {
    BchCode::new(2, 7, 1, "alpha^4+alpha+1", "alpha")
}
