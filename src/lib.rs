pub mod cs;
pub mod error;
pub mod math;

pub use cs::{ecc, security};
pub use error::{Error, Result};
