//! Fuzzy extractor built on a block code.
//!
//! A fuzzy extractor turns a noisy secret, such as a biometric reading, into a
//! stable key. Enrollment (`Gen`) masks a random codeword with the reading and
//! publishes the result as helper data; reproduction (`Rep`) unmasks it with a
//! fresh reading, lets the code remove the differences and recovers the
//! original reading exactly when the two readings are close enough.
//!
//! With a code C over GF(q), a reading w and a random pad x:
//!
//! - `Gen(w)`: pick a random message, r = encode(message), s = r + w;
//!   store (s, x) and return `StrongExtract(w + x)`.
//! - `Rep(w')`: r' = decode(s - w'), w'' = s - encode(message(r'));
//!   return `StrongExtract(w'' + x)`.
//!
//! `StrongExtract` is SHA-256 expanded to 256 binary symbols.
//!
//! # Examples
//!
//! ```rust
//! use fuzzy_ecc::cs::ecc::create_bch_15_5_7;
//! use fuzzy_ecc::cs::security::FuzzyExtractor;
//!
//! let code = create_bch_15_5_7().unwrap();
//! let extractor = FuzzyExtractor::new(&code, 5, 10).unwrap();
//!
//! let reading = vec![1, 0, 1, 1, 0, 0, 1, 0, 1, 1, 1, 0, 0, 1, 0];
//! let key = extractor.generate_helper_data(&reading).unwrap();
//!
//! let mut noisy = reading.clone();
//! noisy[2] ^= 1;
//! noisy[9] ^= 1;
//! assert_eq!(extractor.extract(&noisy).unwrap(), key);
//! ```

use crate::cs::ecc::{check_length, ErrorCorrection, Word};
use crate::error::{Error, Result};
use crate::math::finite_field::PrimeField;
use bitvec::prelude::*;
use log::debug;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Number of symbols produced by the strong extractor
pub const KEY_SYMBOLS: usize = 256;

/// Public output of enrollment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperData {
    /// Codeword masked by the reading, s = r + w
    sketch: Word,
    /// Random pad mixed into the extractor input
    pad: Word,
}

impl HelperData {
    /// Wraps previously published helper data
    pub fn new(sketch: Word, pad: Word) -> Self {
        HelperData { sketch, pad }
    }

    /// The masked codeword s
    pub fn sketch(&self) -> &[u8] {
        &self.sketch
    }

    /// The random pad x
    pub fn pad(&self) -> &[u8] {
        &self.pad
    }
}

/// Fuzzy extractor over any [`ErrorCorrection`] code.
///
/// The helper data is written at most once, either at construction or by the
/// first call to [`FuzzyExtractor::generate_helper_data`].
#[derive(Debug)]
pub struct FuzzyExtractor<C> {
    code: C,
    message_bits: usize,
    parity_bits: usize,
    field: PrimeField,
    helper: OnceLock<HelperData>,
}

impl<C: ErrorCorrection> FuzzyExtractor<C> {
    /// Creates an extractor without helper data.
    ///
    /// # Arguments
    ///
    /// * `code` - The code that absorbs reading noise
    /// * `message_bits` - Message length, must equal the code dimension k
    /// * `parity_bits` - Redundancy, `message_bits + parity_bits` must equal n
    pub fn new(code: C, message_bits: usize, parity_bits: usize) -> Result<Self> {
        let params = code.parameters();
        if message_bits != params.k || message_bits + parity_bits != params.n {
            return Err(Error::Construction(format!(
                "Extractor with {} message and {} parity symbols does not fit a {} code",
                message_bits, parity_bits, params
            )));
        }

        Ok(FuzzyExtractor {
            field: PrimeField::new(params.q)?,
            code,
            message_bits,
            parity_bits,
            helper: OnceLock::new(),
        })
    }

    /// Creates an extractor that reproduces keys from existing helper data
    pub fn with_helper_data(
        code: C,
        message_bits: usize,
        parity_bits: usize,
        helper: HelperData,
    ) -> Result<Self> {
        let extractor = Self::new(code, message_bits, parity_bits)?;
        let n = message_bits + parity_bits;
        check_length(&helper.sketch, n)?;
        check_length(&helper.pad, n)?;
        extractor.field.check_word(&helper.sketch)?;
        extractor.field.check_word(&helper.pad)?;

        extractor
            .helper
            .set(helper)
            .map_err(|_| Error::Construction("Helper data already set".to_string()))?;
        Ok(extractor)
    }

    /// The underlying code
    pub fn code(&self) -> &C {
        &self.code
    }

    /// Code dimension k
    pub fn message_bits(&self) -> usize {
        self.message_bits
    }

    /// Redundancy n - k
    pub fn parity_bits(&self) -> usize {
        self.parity_bits
    }

    /// Helper data, once enrolled
    pub fn helper_data(&self) -> Option<&HelperData> {
        self.helper.get()
    }

    /// Enrolls `reading` using the operating system's random source and returns the key
    pub fn generate_helper_data(&self, reading: &[u8]) -> Result<Word> {
        self.generate_helper_data_with_rng(reading, &mut OsRng)
    }

    /// Enrolls `reading` and returns the key.
    ///
    /// Fails with [`Error::Construction`] if helper data has already been generated.
    pub fn generate_helper_data_with_rng<R: RngCore + CryptoRng>(
        &self,
        reading: &[u8],
        rng: &mut R,
    ) -> Result<Word> {
        if self.helper.get().is_some() {
            return Err(Error::Construction(
                "Helper data has already been generated".to_string(),
            ));
        }
        let n = self.message_bits + self.parity_bits;
        check_length(reading, n)?;
        self.field.check_word(reading)?;

        let q = self.field.order();
        let pad: Word = (0..n).map(|_| rng.gen_range(0..q)).collect();
        let message: Word = (0..self.message_bits)
            .map(|_| rng.gen_range(0..q))
            .collect();

        let codeword = self.code.encode(&message)?;
        let sketch = self.field.add_words(&codeword, reading);
        debug!("enrolled reading, sketch {}", hex::encode(&sketch));

        let key = strong_extract(&self.field.add_words(reading, &pad));
        self.helper
            .set(HelperData { sketch, pad })
            .map_err(|_| Error::Construction("Helper data has already been generated".to_string()))?;
        Ok(key)
    }

    /// Reproduces the key from a fresh reading.
    ///
    /// The key matches enrollment when the reading lies within the code's
    /// correction radius of the enrolled one. Otherwise decoding fails or a
    /// different key comes out.
    pub fn extract(&self, reading: &[u8]) -> Result<Word> {
        let helper = self
            .helper
            .get()
            .ok_or_else(|| Error::invalid("No helper data: enroll a reading first"))?;
        check_length(reading, helper.sketch.len())?;
        self.field.check_word(reading)?;

        let noisy_codeword = self.field.sub_words(&helper.sketch, reading);
        let message = self.code.decode_message(&noisy_codeword)?;

        let codeword = self.code.encode(&message)?;
        let recovered = self.field.sub_words(&helper.sketch, &codeword);
        Ok(strong_extract(&self.field.add_words(&helper.pad, &recovered)))
    }
}

/// SHA-256 of the symbols, expanded least significant bit first into 256 binary symbols
pub fn strong_extract(word: &[u8]) -> Word {
    let digest = Sha256::digest(word);
    digest
        .view_bits::<Lsb0>()
        .iter()
        .map(|bit| u8::from(*bit))
        .collect()
}
