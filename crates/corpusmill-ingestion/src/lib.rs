//! Brat-style annotation ingestion.
//!
//! Converts a directory of paired `.ann`/`.txt` files into per-sentence
//! records (label, macro label, scope, sentence text) and exports them as
//! CSV and JSON. The flow for one run:
//!
//!   1. Scan the dataset directory for basenames with both companions
//!   2. Parse each `.ann` file into start-offset-keyed annotation spans
//!   3. Align spans onto sentences with a running character cursor
//!   4. Export the assembled corpus (CSV rows + nested JSON)
//!
//! Files missing a companion are skipped and counted; a malformed `.ann`
//! file degrades to an empty annotation set for that file only.

pub mod aligner;
pub mod brat;
pub mod export;
pub mod models;
pub mod pipeline;

pub use models::{AnnotationSpan, Corpus, DocumentEntry, LabelMap, Scope, SentenceRecord};
pub use pipeline::{load_corpus, IngestStats};
