pub mod finite_field;
pub mod polynomial;

pub use finite_field::{ExtensionField, PrimeField};
pub use polynomial::{parse_polynomial, Polynomial};
