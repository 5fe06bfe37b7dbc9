//! corpusmill-common — Shared types and errors used across all corpusmill crates.

pub mod error;
pub mod records;

pub use error::{CorpusmillError, Result};
pub use records::ConvertedRow;
