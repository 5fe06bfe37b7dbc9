//! The converted-corpus CSV row, produced by the ingestion pipeline and
//! consumed by the anonymization pipeline.

use serde::{Deserialize, Serialize};

/// One row of the converted corpus CSV: one sentence of one source file.
///
/// `label` and `macro` hold the literal `Negative` when the sentence carried
/// no span or macro annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedRow {
    pub file_id: String,
    pub scope: String,
    pub label: String,
    #[serde(rename = "macro")]
    pub macro_label: String,
    pub text: String,
}
