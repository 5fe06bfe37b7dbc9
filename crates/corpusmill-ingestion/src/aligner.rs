//! Sentence/annotation alignment.
//!
//! Walks each sentence one character at a time with a running absolute
//! cursor; an annotation whose start offset matches the cursor is applied to
//! the current sentence. The cursor advances by sentence length + 1 between
//! sentences to account for the removed line separator.

use std::collections::BTreeMap;

use corpusmill_common::{CorpusmillError, Result};
use tracing::debug;

use crate::models::{AnnotationSpan, LabelMap, Scope, SentenceRecord};

/// Sentence marker stripped before storage.
const PILCROW_MARKER: &str = "¶ ";

/// Whether (and how strictly) to verify that an annotation's text actually
/// occurs in the sentence it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCheck {
    /// No verification.
    #[default]
    Off,
    /// Verify, but only log mismatches.
    Catch,
    /// A mismatch halts the run.
    Strict,
}

impl ErrorCheck {
    fn verify(self, text: Option<&str>, sentence: &str) -> Result<()> {
        let Some(text) = text else { return Ok(()) };
        match self {
            ErrorCheck::Off => Ok(()),
            ErrorCheck::Catch => {
                if !sentence.contains(text) {
                    debug!(text, sentence, "annotation text not found in sentence");
                }
                Ok(())
            }
            ErrorCheck::Strict => {
                if sentence.contains(text) {
                    Ok(())
                } else {
                    Err(CorpusmillError::Dataset(format!(
                        "annotation text {text:?} not found in sentence {sentence:?}"
                    )))
                }
            }
        }
    }
}

/// Fold annotation spans into one [`SentenceRecord`] per sentence.
///
/// `file_name` drives scope derivation; see [`Scope::derive`].
pub fn align_sentences(
    file_name: &str,
    text: &BTreeMap<usize, String>,
    annotations: &BTreeMap<usize, AnnotationSpan>,
    error_check: ErrorCheck,
) -> Result<BTreeMap<usize, SentenceRecord>> {
    let mut records = BTreeMap::new();
    let mut position = 0usize;

    for (&index, sentence) in text {
        let mut labels = LabelMap::default();
        let mut macro_label = None;

        for _ in sentence.chars() {
            if let Some(ann) = annotations.get(&position) {
                if ann.is_macro() {
                    macro_label = Some(ann.label.clone());
                } else {
                    labels.push(&ann.label, ann.text.clone());
                    error_check.verify(ann.text.as_deref(), sentence)?;
                }
            }
            position += 1;
        }
        // account for the stripped line separator
        position += 1;

        records.insert(
            index,
            SentenceRecord {
                labels,
                macro_label,
                scope: Scope::derive(file_name, index),
                sentence: sentence.replace(PILCROW_MARKER, ""),
            },
        );
    }

    Ok(records)
}
