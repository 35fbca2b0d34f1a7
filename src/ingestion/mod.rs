//! Document ingestion: PDF text extraction

pub mod extract;

pub use extract::extract_text;
