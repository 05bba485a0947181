//! Hamming error correction code implementation.
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming in 1950.
//! Over GF(q) with redundancy r, the parity-check matrix H has one column for every
//! one-dimensional subspace of GF(q)^r, which gives
//!
//! - length n = (q^r - 1) / (q - 1)
//! - dimension k = n - r
//! - minimum distance d = 3
//!
//! Every nonzero syndrome is a scalar multiple of exactly one column of H, so any
//! single symbol error is located and corrected. The binary (7,4) code is `r = 3, q = 2`.
//!
//! # Applications
//!
//! - Computer memory (ECC RAM)
//! - Satellite communications
//! - Data storage systems

use crate::cs::ecc::linear::{self, generator_from_parity_check};
use crate::cs::ecc::{check_length, weight, CodeParameters, Error, ErrorCorrection, Result, Word};
use crate::math::finite_field::PrimeField;
use log::{debug, trace};
use ndarray::Array2;
use std::fmt::{Display, Formatter};

/// Largest supported code length; the generator is k x n bytes
const MAX_CODE_LENGTH: usize = 1 << 12;

/// A Hamming code over GF(q) with `r` parity symbols.
#[derive(Debug, Clone)]
pub struct HammingCode {
    /// Number of parity symbols
    r: usize,
    /// Symbol alphabet GF(q)
    field: PrimeField,
    /// Code length
    n: usize,
    /// Number of message symbols
    k: usize,
    /// Parity-check matrix, r x n, identity block last
    parity_check: Array2<u8>,
    /// Generator matrix, k x n, identity block first
    generator: Array2<u8>,
}

impl HammingCode {
    /// Creates a Hamming code with `r` parity symbols over GF(q).
    ///
    /// # Arguments
    ///
    /// * `r` - Number of parity symbols, at least 2
    /// * `q` - Alphabet size, must be prime
    pub fn new(r: usize, q: u8) -> Result<Self> {
        let field = PrimeField::new(q)?;
        if r < 2 {
            return Err(Error::Construction(format!(
                "Hamming codes need at least 2 parity symbols, got {}",
                r
            )));
        }

        let n = (q as usize)
            .checked_pow(r as u32)
            .map(|size| (size - 1) / (q as usize - 1))
            .filter(|&n| n <= MAX_CODE_LENGTH)
            .ok_or_else(|| {
                Error::Construction(format!(
                    "Hamming code with r = {} over GF({}) is longer than {}",
                    r, q, MAX_CODE_LENGTH
                ))
            })?;

        let parity_check = Self::parity_check_matrix(field, r);
        debug_assert_eq!(parity_check.ncols(), n);
        let generator = generator_from_parity_check(field, &parity_check)?;

        debug!("built Hamming({},{},3) over GF({})", n, n - r, q);

        Ok(HammingCode {
            r,
            field,
            n,
            k: n - r,
            parity_check,
            generator,
        })
    }

    /// Creates the standard binary (7,4) Hamming code
    pub fn standard_7_4() -> Result<Self> {
        Self::new(3, 2)
    }

    /// Builds H from one representative per nonzero direction of GF(q)^r.
    ///
    /// All r-tuples are sorted by weight and then lexicographically; a tuple is kept
    /// unless it is a multiple of an already kept one. Multiples share a weight, so
    /// the kept tuple is the lexicographically smallest of its multiples. Reversing
    /// the kept list puts the weight-one tuples, in identity order, at the end.
    fn parity_check_matrix(field: PrimeField, r: usize) -> Array2<u8> {
        let q = field.order();
        let mut columns: Vec<Word> = all_tuples(q, r)
            .into_iter()
            .filter(|tuple| weight(tuple) > 0)
            .filter(|tuple| {
                (2..q).all(|c| {
                    let multiple: Word = tuple.iter().map(|&x| field.mul(c, x)).collect();
                    *tuple <= multiple
                })
            })
            .collect();
        columns.sort_by(|a, b| weight(a).cmp(&weight(b)).then_with(|| a.cmp(b)));
        columns.reverse();

        Array2::from_shape_fn((r, columns.len()), |(i, j)| columns[j][i])
    }

    /// Number of parity symbols r
    pub fn parity_symbols(&self) -> usize {
        self.r
    }

    /// Parity-check matrix H, r x n
    pub fn parity_check(&self) -> &Array2<u8> {
        &self.parity_check
    }

    /// Generator matrix G, k x n
    pub fn generator(&self) -> &Array2<u8> {
        &self.generator
    }

    /// Encodes a message of k symbols
    pub fn encode(&self, message: &[u8]) -> Result<Word> {
        linear::encode(self.field, &self.generator, message)
    }

    /// Decodes a received word, correcting up to one symbol error.
    ///
    /// The syndrome S = H w^T is matched against the columns of H; if S = b * H_i the
    /// error is b at position i.
    pub fn decode(&self, received: &[u8]) -> Result<Word> {
        check_length(received, self.n)?;
        self.field.check_word(received)?;

        let syndrome = linear::syndrome(self.field, &self.parity_check, received);
        if weight(&syndrome) == 0 {
            return Ok(received.to_vec());
        }
        trace!("Hamming syndrome {:?}", syndrome);

        for (i, column) in self.parity_check.columns().into_iter().enumerate() {
            let column = column.to_vec();
            if let Some(b) = scalar_multiple(self.field, &syndrome, &column) {
                trace!("Hamming error of value {} at position {}", b, i);
                let mut corrected = received.to_vec();
                corrected[i] = self.field.sub(corrected[i], b);
                return Ok(corrected);
            }
        }

        debug!("Hamming decode failed for syndrome {:?}", syndrome);
        Err(Error::uncorrectable(
            "Syndrome matches no column of the parity-check matrix",
        ))
    }
}

impl ErrorCorrection for HammingCode {
    fn parameters(&self) -> CodeParameters {
        CodeParameters {
            q: self.field.order(),
            n: self.n,
            k: self.k,
            d: 3,
        }
    }

    fn encode(&self, message: &[u8]) -> Result<Word> {
        HammingCode::encode(self, message)
    }

    fn decode(&self, received: &[u8]) -> Result<Word> {
        HammingCode::decode(self, received)
    }
}

impl Display for HammingCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Hamming({},{},3) over GF({})",
            self.n,
            self.k,
            self.field.order()
        )
    }
}

/// All tuples of length `len` over `0..q`
fn all_tuples(q: u8, len: usize) -> Vec<Word> {
    let mut tuples = vec![Vec::with_capacity(len)];
    for _ in 0..len {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                (0..q).map(move |s| {
                    let mut t = prefix.clone();
                    t.push(s);
                    t
                })
            })
            .collect();
    }
    tuples
}

/// Returns `c` in `1..q` with `a = c * b`, if there is one
fn scalar_multiple(field: PrimeField, a: &[u8], b: &[u8]) -> Option<u8> {
    (1..field.order()).find(|&c| a.iter().zip(b).all(|(&x, &y)| x == field.mul(c, y)))
}

/// Creates the standard (7,4) Hamming code
pub fn create_hamming_7_4() -> Result<HammingCode> {
    HammingCode::standard_7_4()
}

/// Creates a Hamming code with `r` parity symbols over GF(q)
pub fn create_hamming(r: usize, q: u8) -> Result<HammingCode> {
    HammingCode::new(r, q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::ecc::{format_word, parse_word};
    use ndarray::array;

    #[test]
    fn test_hamming_creation() {
        let hamming = create_hamming_7_4().unwrap();
        let params = hamming.parameters();
        assert_eq!((params.n, params.k, params.d), (7, 4, 3));
        assert_eq!(hamming.parity_symbols(), 3);
        assert_eq!(
            hamming.parity_check(),
            &array![
                [1u8, 1, 1, 0, 1, 0, 0],
                [1, 1, 0, 1, 0, 1, 0],
                [1, 0, 1, 1, 0, 0, 1]
            ]
        );

        let hamming = HammingCode::new(3, 3).unwrap();
        assert_eq!((hamming.parameters().n, hamming.parameters().k), (13, 10));

        let hamming = HammingCode::new(2, 5).unwrap();
        assert_eq!((hamming.parameters().n, hamming.parameters().k), (6, 4));

        assert!(HammingCode::new(1, 2).is_err());
        assert!(HammingCode::new(3, 4).is_err());
    }

    #[test]
    fn test_length_limit() {
        let hamming = HammingCode::new(12, 2).unwrap();
        assert_eq!((hamming.parameters().n, hamming.parameters().k), (4095, 4083));
        assert!(matches!(
            HammingCode::new(13, 2),
            Err(Error::Construction(_))
        ));

        assert_eq!(HammingCode::new(8, 3).unwrap().parameters().n, 3280);
        assert!(matches!(
            HammingCode::new(9, 3),
            Err(Error::Construction(_))
        ));
        assert!(matches!(
            HammingCode::new(64, 2),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn test_parity_check_has_one_column_per_direction() {
        let hamming = HammingCode::new(3, 3).unwrap();
        let h = hamming.parity_check();
        // Identity block last
        assert_eq!(h.slice(ndarray::s![.., 10..]), Array2::<u8>::eye(3));
        // No column is a multiple of another
        let cols: Vec<Word> = h.columns().into_iter().map(|c| c.to_vec()).collect();
        for i in 0..cols.len() {
            for j in 0..cols.len() {
                if i != j {
                    assert!(scalar_multiple(hamming.field, &cols[i], &cols[j]).is_none());
                }
            }
        }
    }

    #[test]
    fn test_hamming_encode_decode_no_errors() {
        let hamming = create_hamming_7_4().unwrap();
        let codeword = hamming.encode(&parse_word("0001").unwrap()).unwrap();
        assert_eq!(format_word(&codeword), "0001011");
        assert_eq!(hamming.decode(&codeword).unwrap(), codeword);
        assert_eq!(
            hamming.decode_message(&codeword).unwrap(),
            parse_word("0001").unwrap()
        );
    }

    #[test]
    fn test_hamming_corrects_every_single_error() {
        let hamming = create_hamming_7_4().unwrap();
        let codeword = hamming.encode(&parse_word("0001").unwrap()).unwrap();
        for i in 0..7 {
            let mut received = codeword.clone();
            received[i] ^= 1;
            assert_eq!(hamming.decode(&received).unwrap(), codeword);
        }
    }

    #[test]
    fn test_q_ary_hamming_error_correction() {
        let hamming = HammingCode::new(3, 3).unwrap();
        let codeword = hamming.encode(&parse_word("0210210000").unwrap()).unwrap();
        assert_eq!(format_word(&codeword), "0210210000022");
        for i in 0..13 {
            for b in 1..3 {
                let mut received = codeword.clone();
                received[i] = (received[i] + b) % 3;
                assert_eq!(hamming.decode(&received).unwrap(), codeword);
            }
        }

        let hamming = HammingCode::new(2, 5).unwrap();
        let codeword = hamming.encode(&parse_word("3410").unwrap()).unwrap();
        assert_eq!(format_word(&codeword), "341024");
        let received = PrimeField::new(5)
            .unwrap()
            .add_words(&codeword, &parse_word("004000").unwrap());
        assert_eq!(hamming.decode(&received).unwrap(), codeword);
    }

    #[test]
    fn test_invalid_input() {
        let hamming = create_hamming_7_4().unwrap();
        assert!(matches!(
            hamming.decode(&[0, 1, 0]),
            Err(Error::InvalidLength { .. })
        ));
        assert!(matches!(
            hamming.decode(&[0, 1, 0, 2, 0, 0, 0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(hamming.encode(&[1, 0, 1]).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            create_hamming_7_4().unwrap().to_string(),
            "Hamming(7,4,3) over GF(2)"
        );
    }
}
