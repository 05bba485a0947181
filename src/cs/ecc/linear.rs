//! Shared machinery of linear block codes.
//!
//! A linear [n, k] code over GF(q) is described by a k x n generator matrix G
//! or an (n - k) x n parity-check matrix H. The codes in this crate keep the
//! identity block of G first, G = [I_k | A], so encoding is systematic and
//! correction vectors line up with codeword positions.

use crate::cs::ecc::{check_length, Error, Result, Word};
use crate::math::finite_field::PrimeField;
use ndarray::{concatenate, s, Array2, ArrayView2, Axis};

/// Derives G = [I_k | -P^T] from a parity-check matrix H = [P | I_(n-k)]
pub fn generator_from_parity_check(field: PrimeField, h: &Array2<u8>) -> Result<Array2<u8>> {
    let (rows, n) = h.dim();
    if rows == 0 || rows >= n {
        return Err(Error::Construction(format!(
            "Parity-check matrix must have between 1 and {} rows, got {}",
            n.saturating_sub(1),
            rows
        )));
    }
    let k = n - rows;

    let p = h.slice(s![.., ..k]);
    let neg_pt = p.t().mapv(|x| field.neg(x));
    let identity = Array2::<u8>::eye(k);

    concatenate(Axis(1), &[identity.view(), neg_pt.view()])
        .map_err(|e| Error::Construction(e.to_string()))
}

/// Derives H = [-A^T | I_(n-k)] from a generator matrix G = [I_k | A]
pub fn parity_check_from_generator(field: PrimeField, g: &Array2<u8>) -> Result<Array2<u8>> {
    let (k, n) = g.dim();
    if k == 0 || k >= n {
        return Err(Error::Construction(format!(
            "Generator matrix must have between 1 and {} rows, got {}",
            n.saturating_sub(1),
            k
        )));
    }

    let a = g.slice(s![.., k..]);
    let neg_at = a.t().mapv(|x| field.neg(x));
    let identity = Array2::<u8>::eye(n - k);

    concatenate(Axis(1), &[neg_at.view(), identity.view()])
        .map_err(|e| Error::Construction(e.to_string()))
}

/// Row vector times matrix over GF(q)
pub fn vec_mat_mul(field: PrimeField, word: &[u8], matrix: ArrayView2<u8>) -> Word {
    let q = field.order() as u32;
    matrix
        .columns()
        .into_iter()
        .map(|col| {
            let sum = word
                .iter()
                .zip(col.iter())
                .fold(0u32, |acc, (&w, &m)| (acc + w as u32 * m as u32) % q);
            sum as u8
        })
        .collect()
}

/// Systematic encoding w -> w * G
pub fn encode(field: PrimeField, g: &Array2<u8>, message: &[u8]) -> Result<Word> {
    check_length(message, g.nrows())?;
    field.check_word(message)?;
    Ok(vec_mat_mul(field, message, g.view()))
}

/// Syndrome H * w^T, returned as a row vector
pub fn syndrome(field: PrimeField, h: &Array2<u8>, word: &[u8]) -> Word {
    vec_mat_mul(field, word, h.t())
}

/// Unit vector of length `n` carrying `value` at position `index`
pub fn unit_vector(n: usize, index: usize, value: u8) -> Word {
    let mut e = vec![0; n];
    e[index] = value;
    e
}

/// Builds a dense matrix from rows of equal length
pub fn matrix_from_rows(rows: &[Vec<u8>]) -> Result<Array2<u8>> {
    let ncols = rows.first().map_or(0, Vec::len);
    let flat: Vec<u8> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), ncols), flat)
        .map_err(|e| Error::Construction(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn hamming_h() -> Array2<u8> {
        array![
            [1u8, 1, 1, 0, 1, 0, 0],
            [1, 1, 0, 1, 0, 1, 0],
            [1, 0, 1, 1, 0, 0, 1]
        ]
    }

    #[test]
    fn test_generator_from_parity_check() {
        let field = PrimeField::binary();
        let g = generator_from_parity_check(field, &hamming_h()).unwrap();
        assert_eq!(
            g,
            array![
                [1u8, 0, 0, 0, 1, 1, 1],
                [0, 1, 0, 0, 1, 1, 0],
                [0, 0, 1, 0, 1, 0, 1],
                [0, 0, 0, 1, 0, 1, 1]
            ]
        );

        // Every row of G is orthogonal to H
        for row in g.rows() {
            let row: Vec<u8> = row.to_vec();
            assert!(syndrome(field, &hamming_h(), &row).iter().all(|&s| s == 0));
        }
    }

    #[test]
    fn test_parity_check_round_trip() {
        let field = PrimeField::new(3).unwrap();
        let g = array![[1u8, 0, 2, 1], [0, 1, 1, 1]];
        let h = parity_check_from_generator(field, &g).unwrap();
        assert_eq!(h, array![[1u8, 2, 1, 0], [2, 2, 0, 1]]);
        assert_eq!(generator_from_parity_check(field, &h).unwrap(), g);
    }

    #[test]
    fn test_encode_is_systematic() {
        let field = PrimeField::binary();
        let g = generator_from_parity_check(field, &hamming_h()).unwrap();
        let codeword = encode(field, &g, &[0, 0, 0, 1]).unwrap();
        assert_eq!(codeword, vec![0, 0, 0, 1, 0, 1, 1]);
        assert_eq!(&codeword[..4], &[0, 0, 0, 1]);
        assert!(encode(field, &g, &[0, 1]).is_err());
        assert!(encode(field, &g, &[0, 0, 0, 2]).is_err());
    }

    #[test]
    fn test_degenerate_matrices_rejected() {
        let field = PrimeField::binary();
        assert!(generator_from_parity_check(field, &Array2::<u8>::eye(3)).is_err());
        assert!(parity_check_from_generator(field, &Array2::<u8>::eye(2)).is_err());
    }

    #[test]
    fn test_matrix_helpers() {
        let m = matrix_from_rows(&[vec![1, 0], vec![0, 1], vec![1, 1]]).unwrap();
        assert_eq!(m.dim(), (3, 2));
        assert!(matrix_from_rows(&[vec![1, 0], vec![1]]).is_err());
        assert_eq!(unit_vector(4, 2, 3), vec![0, 0, 3, 0]);
    }
}
