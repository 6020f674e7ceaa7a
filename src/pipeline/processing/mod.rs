// Pipeline processing: line normalization and field extraction

pub mod extract;
pub mod normalize;

pub use extract::Extractor;
pub use normalize::normalize_line_breaks;
