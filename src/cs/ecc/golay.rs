//! Golay codes.
//!
//! Four perfect and quasi-perfect codes from hand-specified generator halves:
//!
//! | order | alphabet | [n, k, d]  |
//! |-------|----------|------------|
//! | 11    | GF(3)    | [11, 6, 5] |
//! | 12    | GF(3)    | [12, 6, 6] |
//! | 23    | GF(2)    | [23, 12, 7]|
//! | 24    | GF(2)    | [24, 12, 8]|
//!
//! The binary codes are decoded with the coset-leader method of the extended
//! code; order 23 appends a parity bit, decodes as order 24 and truncates.
//! The ternary codes encode but have no decoder.
//!
//! # Applications
//!
//! - Voyager deep-space imaging
//! - Radio links with short frames

use crate::cs::ecc::linear::{self, matrix_from_rows, parity_check_from_generator, unit_vector};
use crate::cs::ecc::{check_length, weight, CodeParameters, Error, ErrorCorrection, Result, Word};
use crate::math::finite_field::PrimeField;
use log::{debug, trace};
use ndarray::{concatenate, Array2, Axis};
use std::fmt::{Display, Formatter};

/// First row of the reverse-circulant block of the binary codes
const BINARY_ROW: [u8; 11] = [1, 1, 0, 1, 1, 1, 0, 0, 0, 1, 0];

/// Generator half of the order-11 ternary code
const TERNARY_BLOCK: [[u8; 5]; 6] = [
    [0, 1, 1, 1, 1],
    [1, 0, 1, 2, 2],
    [1, 1, 0, 1, 2],
    [1, 2, 1, 0, 1],
    [1, 2, 2, 1, 0],
    [1, 1, 2, 2, 1],
];

/// Column appended to the ternary block for order 12
const TERNARY_EXTENSION: [u8; 6] = [1, 1, 2, 2, 1, 0];

/// A Golay code of order 11, 12, 23 or 24
#[derive(Debug, Clone)]
pub struct GolayCode {
    n: usize,
    k: usize,
    d: usize,
    field: PrimeField,
    /// Non-identity half of the generator
    a: Array2<u8>,
    generator: Array2<u8>,
    /// Generator half of the extended code, used for decoding odd orders
    a_ext: Array2<u8>,
    g_ext: Array2<u8>,
}

impl GolayCode {
    /// Creates the Golay code of the given order.
    ///
    /// # Arguments
    ///
    /// * `n` - Code length, one of 11, 12, 23 or 24
    ///
    /// # Returns
    ///
    /// The code, or a construction error for any other order.
    pub fn new(n: usize) -> Result<Self> {
        let (q, k, d) = match n {
            11 => (3, 6, 5),
            12 => (3, 6, 6),
            23 => (2, 12, 7),
            24 => (2, 12, 8),
            _ => {
                return Err(Error::Construction(format!(
                    "Golay codes exist for orders 11, 12, 23 and 24, not {}",
                    n
                )))
            }
        };
        let (a, a_ext) = if q == 3 {
            (Self::ternary_block(n)?, Self::ternary_block(12)?)
        } else {
            (Self::binary_block(n)?, Self::binary_block(24)?)
        };

        let field = PrimeField::new(q)?;
        let generator = systematic(&a)?;
        let g_ext = systematic(&a_ext)?;

        debug!("built Golay({},{},{}) over GF({})", n, k, d, q);

        Ok(GolayCode {
            n,
            k,
            d,
            field,
            a,
            generator,
            a_ext,
            g_ext,
        })
    }

    fn ternary_block(n: usize) -> Result<Array2<u8>> {
        let rows: Vec<Word> = TERNARY_BLOCK
            .iter()
            .zip(TERNARY_EXTENSION)
            .map(|(row, ext)| {
                let mut row = row.to_vec();
                if n == 12 {
                    row.push(ext);
                }
                row
            })
            .collect();
        matrix_from_rows(&rows)
    }

    /// 11x11 reverse circulant on top of an all-ones row; order 24 adds the column (1,...,1,0)
    fn binary_block(n: usize) -> Result<Array2<u8>> {
        let mut rows: Vec<Word> = (0..11)
            .map(|i| (0..11).map(|j| BINARY_ROW[(i + j) % 11]).collect())
            .collect();
        rows.push(vec![1; 11]);
        if n == 24 {
            for (i, row) in rows.iter_mut().enumerate() {
                row.push(u8::from(i < 11));
            }
        }
        matrix_from_rows(&rows)
    }

    /// Non-identity half A of the generator G = [I | A]
    pub fn generator_half(&self) -> &Array2<u8> {
        &self.a
    }

    /// Generator matrix G = [I | A]
    pub fn generator(&self) -> &Array2<u8> {
        &self.generator
    }

    /// Parity-check matrix H = [-A^T | I]
    pub fn parity_check(&self) -> Result<Array2<u8>> {
        parity_check_from_generator(self.field, &self.generator)
    }

    /// Encodes k message symbols as m G
    pub fn encode(&self, message: &[u8]) -> Result<Word> {
        linear::encode(self.field, &self.generator, message)
    }

    /// Decodes a received word.
    ///
    /// Orders 23 and 24 correct up to three errors. Orders 11 and 12 return
    /// [`Error::NotImplemented`].
    pub fn decode(&self, received: &[u8]) -> Result<Word> {
        check_length(received, self.n)?;
        self.field.check_word(received)?;

        match self.n {
            24 => self.decode_extended(received),
            23 => {
                let mut extended = received.to_vec();
                extended.push(u8::from(weight(received) % 2 == 0));
                let mut decoded = self.decode_extended(&extended)?;
                decoded.truncate(23);
                Ok(decoded)
            }
            _ => Err(Error::NotImplemented(
                "decoding of the ternary Golay codes",
            )),
        }
    }

    /// Coset-leader decoding of the extended binary code
    fn decode_extended(&self, received: &[u8]) -> Result<Word> {
        let field = self.field;
        let half = self.a_ext.nrows();

        let syndrome = linear::syndrome(field, &self.g_ext, received);
        trace!("Golay syndrome {:?}", syndrome);
        if weight(&syndrome) <= 3 {
            let error = [syndrome, vec![0; half]].concat();
            return Ok(field.add_words(received, &error));
        }
        if let Some((j, pattern)) = self.nearby_row(&syndrome) {
            let error = [pattern, unit_vector(half, j, 1)].concat();
            return Ok(field.add_words(received, &error));
        }

        let second = linear::syndrome(field, &self.a_ext, &syndrome);
        trace!("Golay second syndrome {:?}", second);
        if weight(&second) <= 3 {
            let error = [vec![0; half], second].concat();
            return Ok(field.add_words(received, &error));
        }
        if let Some((j, pattern)) = self.nearby_row(&second) {
            let error = [unit_vector(half, j, 1), pattern].concat();
            return Ok(field.add_words(received, &error));
        }

        debug!("Golay decode failed, no coset leader of weight <= 3");
        Err(Error::uncorrectable(
            "Error pattern lies outside the Golay correction radius",
        ))
    }

    /// First row a_j of A_ext with wt(s + a_j) <= 2, with the pattern s + a_j
    fn nearby_row(&self, syndrome: &[u8]) -> Option<(usize, Word)> {
        self.a_ext.rows().into_iter().enumerate().find_map(|(j, row)| {
            let pattern: Word = syndrome
                .iter()
                .zip(row.iter())
                .map(|(&s, &a)| self.field.add(s, a))
                .collect();
            (weight(&pattern) <= 2).then_some((j, pattern))
        })
    }
}

/// G = [I | A]
fn systematic(a: &Array2<u8>) -> Result<Array2<u8>> {
    let identity = Array2::<u8>::eye(a.nrows());
    concatenate(Axis(1), &[identity.view(), a.view()])
        .map_err(|e| Error::Construction(e.to_string()))
}

impl ErrorCorrection for GolayCode {
    fn parameters(&self) -> CodeParameters {
        CodeParameters {
            q: self.field.order(),
            n: self.n,
            k: self.k,
            d: self.d,
        }
    }

    fn encode(&self, message: &[u8]) -> Result<Word> {
        GolayCode::encode(self, message)
    }

    fn decode(&self, received: &[u8]) -> Result<Word> {
        GolayCode::decode(self, received)
    }
}

impl Display for GolayCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Golay({},{},{}) over GF({})",
            self.n,
            self.k,
            self.d,
            self.field.order()
        )
    }
}

/// Creates the Golay code of order `n`
pub fn create_golay(n: usize) -> Result<GolayCode> {
    GolayCode::new(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::ecc::{format_word, parse_word};

    fn flip(word: &[u8], positions: &[usize]) -> Word {
        let mut word = word.to_vec();
        for &p in positions {
            word[p] ^= 1;
        }
        word
    }

    #[test]
    fn test_golay_parameters() {
        let expected = [(11, 3, 6, 5), (12, 3, 6, 6), (23, 2, 12, 7), (24, 2, 12, 8)];
        for (n, q, k, d) in expected {
            let code = GolayCode::new(n).unwrap();
            assert_eq!(code.parameters(), CodeParameters { q, n, k, d });
            assert_eq!(code.generator().dim(), (k, n));
        }
        for n in [0, 10, 13, 22, 25] {
            assert!(matches!(GolayCode::new(n), Err(Error::Construction(_))));
        }
        assert_eq!(
            create_golay(24).unwrap().to_string(),
            "Golay(24,12,8) over GF(2)"
        );
    }

    #[test]
    fn test_parity_check_annihilates_generator() {
        for n in [11, 12, 23, 24] {
            let code = GolayCode::new(n).unwrap();
            let h = code.parity_check().unwrap();
            assert_eq!(h.dim(), (n - code.parameters().k, n));
            for row in code.generator().rows() {
                let syndrome = linear::syndrome(code.field, &h, &row.to_vec());
                assert_eq!(weight(&syndrome), 0);
            }
        }
    }

    #[test]
    fn test_encode() {
        let msg = parse_word("101100101101").unwrap();
        let c24 = GolayCode::new(24).unwrap().encode(&msg).unwrap();
        assert_eq!(format_word(&c24), "101100101101010010100110");
        let c23 = GolayCode::new(23).unwrap().encode(&msg).unwrap();
        assert_eq!(format_word(&c23), "10110010110101001010011");

        let msg = parse_word("101201").unwrap();
        let c11 = GolayCode::new(11).unwrap().encode(&msg).unwrap();
        assert_eq!(format_word(&c11), "10120111210");
        let c12 = GolayCode::new(12).unwrap().encode(&msg).unwrap();
        assert_eq!(format_word(&c12), "101201112101");
    }

    #[test]
    fn test_golay_24_corrects_three_errors() {
        let code = GolayCode::new(24).unwrap();
        let codeword = code.encode(&parse_word("101100101101").unwrap()).unwrap();
        assert_eq!(code.decode(&codeword).unwrap(), codeword);
        for a in 0..24 {
            assert_eq!(code.decode(&flip(&codeword, &[a])).unwrap(), codeword);
            for b in (a + 1)..24 {
                assert_eq!(code.decode(&flip(&codeword, &[a, b])).unwrap(), codeword);
                for c in (b + 1)..24 {
                    let received = flip(&codeword, &[a, b, c]);
                    assert_eq!(code.decode(&received).unwrap(), codeword);
                }
            }
        }
    }

    #[test]
    fn test_golay_23_corrects_three_errors() {
        let code = GolayCode::new(23).unwrap();
        let msg = parse_word("101100101101").unwrap();
        let codeword = code.encode(&msg).unwrap();
        for a in 0..23 {
            for b in (a + 1)..23 {
                for c in (b + 1)..23 {
                    let received = flip(&codeword, &[a, b, c]);
                    assert_eq!(code.decode(&received).unwrap(), codeword);
                    assert_eq!(code.decode_message(&received).unwrap(), msg);
                }
            }
        }
    }

    #[test]
    fn test_four_errors_fail_cleanly() {
        let code = GolayCode::new(24).unwrap();
        let codeword = code.encode(&parse_word("101100101101").unwrap()).unwrap();
        for positions in [[0, 1, 2, 3], [0, 5, 13, 22], [12, 13, 14, 15], [3, 9, 17, 23]] {
            let result = code.decode(&flip(&codeword, &positions));
            assert!(matches!(result, Err(Error::Uncorrectable(_))));
        }
    }

    #[test]
    fn test_ternary_decode_not_implemented() {
        for n in [11, 12] {
            let code = GolayCode::new(n).unwrap();
            let codeword = code.encode(&parse_word("101201").unwrap()).unwrap();
            assert!(matches!(
                code.decode(&codeword),
                Err(Error::NotImplemented(_))
            ));
        }
    }
}
