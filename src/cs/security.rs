pub mod fuzzy_extractor;

// Re-export fuzzy extractor functionality
pub use fuzzy_extractor::{strong_extract, FuzzyExtractor, HelperData, KEY_SYMBOLS};
