//! Error correction code implementations.
//!
//! This module provides block codes over small prime fields:
//! - Hamming codes over GF(q) with syndrome decoding
//! - Golay codes of order 11, 12, 23 and 24 with coset-leader decoding
//! - BCH codes with Peterson-Gorenstein-Zierler and Berlekamp-Massey decoders
//! - Reed-Muller codes with majority-logic decoding
//!
//! # Words
//!
//! A [`Word`] is a vector of symbols of GF(q), one `u8` per symbol. All codes
//! keep their message in the first `k` positions of a codeword when they are
//! systematic (Hamming, Golay, BCH).
//!
//! # Examples
//!
//! ```rust
//! use fuzzy_ecc::cs::ecc::{hamming::HammingCode, parse_word, ErrorCorrection};
//!
//! let code = HammingCode::new(3, 2).unwrap();
//! let sent = code.encode(&parse_word("0001").unwrap()).unwrap();
//! let mut received = sent.clone();
//! received[4] ^= 1;
//! assert_eq!(code.decode(&received).unwrap(), sent);
//! ```

pub use crate::error::{Error, Result};
use std::fmt::{Display, Formatter};

/// A word over GF(q), one symbol per entry
pub type Word = Vec<u8>;

/// Immutable parameters of a block code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeParameters {
    /// Alphabet size (a prime)
    pub q: u8,
    /// Code length
    pub n: usize,
    /// Code dimension
    pub k: usize,
    /// (Designed) minimum distance
    pub d: usize,
}

impl CodeParameters {
    /// Number of symbol errors that are always corrected, floor((d - 1) / 2)
    pub fn correction_radius(&self) -> usize {
        self.d.saturating_sub(1) / 2
    }

    /// Number of redundant symbols, n - k
    pub fn redundancy(&self) -> usize {
        self.n - self.k
    }
}

impl Display for CodeParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{},{}]_{}", self.n, self.k, self.d, self.q)
    }
}

/// Trait for error correction code implementations
///
/// This is the capability the fuzzy extractor is built on: any code that can
/// encode a k-symbol message and decode a noisy n-symbol word.
pub trait ErrorCorrection {
    /// The code's parameters
    fn parameters(&self) -> CodeParameters;

    /// Encode a message of `k` symbols into a codeword of `n` symbols
    fn encode(&self, message: &[u8]) -> Result<Word>;

    /// Decode a received word into the nearest codeword within the correction radius
    fn decode(&self, received: &[u8]) -> Result<Word>;

    /// Decode a received word and return the `k` message symbols
    fn decode_message(&self, received: &[u8]) -> Result<Word> {
        let k = self.parameters().k;
        let mut codeword = self.decode(received)?;
        codeword.truncate(k);
        Ok(codeword)
    }
}

impl<T: ErrorCorrection + ?Sized> ErrorCorrection for &T {
    fn parameters(&self) -> CodeParameters {
        (**self).parameters()
    }

    fn encode(&self, message: &[u8]) -> Result<Word> {
        (**self).encode(message)
    }

    fn decode(&self, received: &[u8]) -> Result<Word> {
        (**self).decode(received)
    }

    fn decode_message(&self, received: &[u8]) -> Result<Word> {
        (**self).decode_message(received)
    }
}

/// Number of nonzero symbols
pub fn weight(word: &[u8]) -> usize {
    word.iter().filter(|&&s| s != 0).count()
}

/// Parses a word written as digits, `0-9` then `A-Z` for symbols 10 to 35
pub fn parse_word(text: &str) -> Result<Word> {
    text.chars()
        .map(|c| {
            c.to_digit(36)
                .map(|d| d as u8)
                .ok_or_else(|| Error::invalid(format!("Invalid symbol character '{}'", c)))
        })
        .collect()
}

/// Formats a word as digits, inverse of [`parse_word`]
pub fn format_word(word: &[u8]) -> String {
    word.iter()
        .map(|&s| std::char::from_digit(s as u32, 36).map_or('?', |c| c.to_ascii_uppercase()))
        .collect()
}

/// Checks that a word has exactly `expected` symbols
pub(crate) fn check_length(word: &[u8], expected: usize) -> Result<()> {
    if word.len() != expected {
        return Err(Error::InvalidLength {
            expected,
            actual: word.len(),
        });
    }
    Ok(())
}

pub mod bch;
pub mod golay;
pub mod hamming;
pub mod linear;
pub mod reed_muller;

pub use bch::{create_bch, create_bch_15_5_7, BchCode};
pub use golay::{create_golay, GolayCode};
pub use hamming::{create_hamming, create_hamming_7_4, HammingCode};
pub use reed_muller::{create_reed_muller, ReedMullerCode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_parsing() {
        assert_eq!(parse_word("0120").unwrap(), vec![0, 1, 2, 0]);
        assert_eq!(parse_word("A").unwrap(), vec![10]);
        assert!(parse_word("01!").is_err());
        assert_eq!(format_word(&[3, 4, 1, 0, 10]), "3410A");
        assert_eq!(format_word(&parse_word("101201").unwrap()), "101201");
    }

    #[test]
    fn test_weight_and_parameters() {
        assert_eq!(weight(&[0, 2, 0, 1]), 2);
        let params = CodeParameters {
            q: 2,
            n: 24,
            k: 12,
            d: 8,
        };
        assert_eq!(params.correction_radius(), 3);
        assert_eq!(params.redundancy(), 12);
        assert_eq!(params.to_string(), "[24,12,8]_2");
    }

    #[test]
    fn test_check_length() {
        assert!(check_length(&[0, 1], 2).is_ok());
        assert_eq!(
            check_length(&[0, 1], 3),
            Err(Error::InvalidLength {
                expected: 3,
                actual: 2
            })
        );
    }
}
