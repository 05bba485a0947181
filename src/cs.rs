pub mod ecc;
pub mod security;

// Re-export the code families
pub use ecc::{BchCode, ErrorCorrection, GolayCode, HammingCode, ReedMullerCode};
