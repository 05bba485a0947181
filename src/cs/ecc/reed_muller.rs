//! Reed-Muller codes.
//!
//! RM(r, m) is the binary code of length n = 2^m whose codewords are the evaluation
//! tables of boolean polynomials in m variables of degree at most r. It has
//! k = sum_{i<=r} C(m, i) message bits and minimum distance d = 2^(m-r).
//!
//! Decoding is Reed's majority-logic algorithm: the coefficient of each monomial
//! of degree r is decided by a vote over 2^(m-r) disjoint check sums, the decided
//! terms are removed, and the process repeats down to degree 0.
//!
//! # Applications
//!
//! - Mariner 9 telemetry (RM(1,5))
//! - Building block of polar and quantum codes

use crate::cs::ecc::linear::{self, matrix_from_rows};
use crate::cs::ecc::{check_length, weight, CodeParameters, Error, ErrorCorrection, Result, Word};
use crate::math::finite_field::PrimeField;
use log::{debug, trace};
use ndarray::Array2;
use std::fmt::{Display, Formatter};

/// Largest supported number of variables m
const MAX_VARIABLES: usize = 10;

/// Reed-Muller code RM(r, m)
#[derive(Debug, Clone)]
pub struct ReedMullerCode {
    r: usize,
    m: usize,
    n: usize,
    k: usize,
    /// Variable set of the monomial behind each generator row
    monomials: Vec<Vec<usize>>,
    /// k x n generator, rows grouped by degree
    generator: Array2<u8>,
    /// Rows of degree i are `bounds[i]..bounds[i + 1]`
    bounds: Vec<usize>,
    /// For every row, the position sets whose parities vote on its coefficient
    voting_sets: Vec<Vec<Vec<usize>>>,
}

impl ReedMullerCode {
    /// Creates RM(r, m).
    ///
    /// # Arguments
    ///
    /// * `r` - Maximum monomial degree, at most `m`
    /// * `m` - Number of variables, between 1 and 10
    pub fn new(r: usize, m: usize) -> Result<Self> {
        if m == 0 || m > MAX_VARIABLES {
            return Err(Error::Construction(format!(
                "Reed-Muller codes need between 1 and {} variables, got {}",
                MAX_VARIABLES, m
            )));
        }
        if r > m {
            return Err(Error::Construction(format!(
                "Degree {} exceeds the number of variables {}",
                r, m
            )));
        }

        let n = 1 << m;
        let indicators = Self::indicators(m);

        // Degree-by-degree table: every monomial of degree i + 1 extends one of
        // degree i by a variable above its last one
        let mut monomials: Vec<Vec<usize>> = vec![vec![]];
        let mut rows: Vec<Word> = vec![vec![1; n]];
        let mut bounds = vec![0, 1];
        let mut frontier = 0..1;
        for _ in 0..r {
            let start = rows.len();
            for idx in frontier.clone() {
                let first = monomials[idx].last().map_or(0, |&v| v + 1);
                for var in first..m {
                    let mut monomial = monomials[idx].clone();
                    monomial.push(var);
                    let row = rows[idx]
                        .iter()
                        .zip(&indicators[var])
                        .map(|(&a, &b)| a & b)
                        .collect();
                    monomials.push(monomial);
                    rows.push(row);
                }
            }
            bounds.push(rows.len());
            frontier = start..rows.len();
        }

        let voting_sets = monomials
            .iter()
            .map(|monomial| Self::voting_sets(&indicators, monomial, m))
            .collect();
        let generator = matrix_from_rows(&rows)?;
        let k = monomials.len();

        debug!("built RM({},{}) [{},{},{}]", r, m, n, k, 1 << (m - r));

        Ok(ReedMullerCode {
            r,
            m,
            n,
            k,
            monomials,
            generator,
            bounds,
            voting_sets,
        })
    }

    /// Indicator vectors by nested doubling; indicator i is 1 where bit i of the column index is 0
    fn indicators(m: usize) -> Vec<Word> {
        let mut indicators: Vec<Word> = Vec::with_capacity(m);
        let mut half = 1;
        for _ in 0..m {
            for v in indicators.iter_mut() {
                v.extend_from_within(..);
            }
            let mut fresh = vec![1; half];
            fresh.resize(2 * half, 0);
            indicators.push(fresh);
            half *= 2;
        }
        indicators
    }

    /// One position set per assignment of the variables outside `monomial`
    fn voting_sets(indicators: &[Word], monomial: &[usize], m: usize) -> Vec<Vec<usize>> {
        let complement: Vec<usize> = (0..m).filter(|v| !monomial.contains(v)).collect();
        let n = 1 << m;

        (0..1usize << complement.len())
            .map(|assignment| {
                (0..n)
                    .filter(|&pos| {
                        complement.iter().enumerate().all(|(bit, &var)| {
                            indicators[var][pos] == ((assignment >> bit) & 1) as u8
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// Maximum monomial degree r
    pub fn degree(&self) -> usize {
        self.r
    }

    /// Number of variables m
    pub fn variables(&self) -> usize {
        self.m
    }

    /// Variable sets of the monomials, in generator-row order
    pub fn monomials(&self) -> &[Vec<usize>] {
        &self.monomials
    }

    /// Generator matrix, one row per monomial
    pub fn generator(&self) -> &Array2<u8> {
        &self.generator
    }

    /// Encodes k message bits as the evaluation table of their polynomial
    pub fn encode(&self, message: &[u8]) -> Result<Word> {
        linear::encode(PrimeField::binary(), &self.generator, message)
    }

    /// Majority-logic decoding, returns the k message bits.
    ///
    /// Fails on a tied vote, and when the decided codeword lies farther than
    /// the correction radius from `received`.
    pub fn decode_message(&self, received: &[u8]) -> Result<Word> {
        check_length(received, self.n)?;
        PrimeField::binary().check_word(received)?;

        let mut word = received.to_vec();
        let mut message = vec![0u8; self.k];

        for degree in (0..=self.r).rev() {
            let rows = self.bounds[degree]..self.bounds[degree + 1];
            for idx in rows.clone() {
                let sets = &self.voting_sets[idx];
                let ones = sets
                    .iter()
                    .filter(|set| set.iter().fold(0, |acc, &p| acc ^ word[p]) == 1)
                    .count();
                let zeros = sets.len() - ones;
                trace!(
                    "RM vote for {:?}: {} ones, {} zeros",
                    self.monomials[idx],
                    ones,
                    zeros
                );
                if ones == zeros {
                    debug!("RM decode failed, tied vote at degree {}", degree);
                    return Err(Error::uncorrectable(format!(
                        "Tied majority vote for monomial {:?}",
                        self.monomials[idx]
                    )));
                }
                message[idx] = u8::from(ones > zeros);
            }

            for idx in rows.filter(|&idx| message[idx] == 1) {
                for (w, &g) in word.iter_mut().zip(self.generator.row(idx)) {
                    *w ^= g;
                }
            }
        }

        // Every decided row has been removed, so `word` is the error pattern
        let distance = weight(&word);
        let radius = self.parameters().correction_radius();
        if distance > radius {
            debug!("RM decode failed, {} errors exceed radius {}", distance, radius);
            return Err(Error::uncorrectable(format!(
                "Decided codeword is {} positions away, radius is {}",
                distance, radius
            )));
        }

        Ok(message)
    }

    /// Decodes to the nearest codeword by re-encoding the decided message
    pub fn decode(&self, received: &[u8]) -> Result<Word> {
        let message = self.decode_message(received)?;
        self.encode(&message)
    }
}

impl ErrorCorrection for ReedMullerCode {
    fn parameters(&self) -> CodeParameters {
        CodeParameters {
            q: 2,
            n: self.n,
            k: self.k,
            d: 1 << (self.m - self.r),
        }
    }

    fn encode(&self, message: &[u8]) -> Result<Word> {
        ReedMullerCode::encode(self, message)
    }

    fn decode(&self, received: &[u8]) -> Result<Word> {
        ReedMullerCode::decode(self, received)
    }

    fn decode_message(&self, received: &[u8]) -> Result<Word> {
        ReedMullerCode::decode_message(self, received)
    }
}

impl Display for ReedMullerCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let p = self.parameters();
        write!(f, "RM({},{}) [{},{},{}]", self.r, self.m, p.n, p.k, p.d)
    }
}

/// Creates the Reed-Muller code RM(r, m)
pub fn create_reed_muller(r: usize, m: usize) -> Result<ReedMullerCode> {
    ReedMullerCode::new(r, m)
}
