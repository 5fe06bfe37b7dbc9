//! Chunked anonymization orchestration.
//!
//! Sentences go to the service ~150 per request. A failed chunk is split
//! into 25 sub-batches and retried one by one; if a sub-batch also fails the
//! run stops there and returns what has been collected — later sub-batches
//! and chunks are never attempted.

use tracing::{debug, info, warn};

use crate::client::{NerError, NerService};
use crate::extract::extract_entities;
use crate::placeholder::{merge_response, PlaceholderMap};

/// Token joining the sentences of one request body.
pub const SENTENCE_DELIMITER: &str = " <--> ";

/// Target sentences per API call.
pub const CHUNK_TARGET: usize = 150;

/// Sub-batches a failed chunk is divided into.
pub const FALLBACK_SPLIT: usize = 25;

/// Everything one anonymization run produced.
#[derive(Debug, Clone, Default)]
pub struct AnonymizeOutcome {
    /// One anonymized sentence per input sentence, in input order. Shorter
    /// than the input when the run was truncated.
    pub sentences: Vec<String>,
    /// Cumulative raw-substring → placeholder map.
    pub placeholders: PlaceholderMap,
    /// True when a sub-batch failure cut the run short.
    pub truncated: bool,
}

/// Split `items` into exactly `parts` contiguous runs; the first
/// `len % parts` runs get one extra element. Trailing runs may be empty.
pub fn split_even<T: Clone>(items: &[T], parts: usize) -> Vec<Vec<T>> {
    let base = items.len() / parts;
    let extra = items.len() % parts;
    let mut out = Vec::with_capacity(parts);
    let mut offset = 0;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        out.push(items[offset..offset + size].to_vec());
        offset += size;
    }
    out
}

/// Run the full chunked anonymization over cleaned sentences.
///
/// Errors never escape: they drive the subdivision/truncation policy and are
/// logged with their kind (transport vs HTTP status vs response shape).
pub async fn run_anonymization(service: &dyn NerService, sentences: &[String]) -> AnonymizeOutcome {
    let mut outcome = AnonymizeOutcome::default();
    if sentences.is_empty() {
        return outcome;
    }

    let chunks = split_even(sentences, (sentences.len() / CHUNK_TARGET).max(1));
    info!(
        sentences = sentences.len(),
        chunks = chunks.len(),
        "starting anonymization run"
    );

    for (i, chunk) in chunks.iter().enumerate() {
        debug!(chunk = i, sentences = chunk.len(), "processing chunk");
        match annotate_and_merge(service, &chunk.join(SENTENCE_DELIMITER), &mut outcome).await {
            Ok(()) => {}
            Err(e) => {
                warn!(chunk = i, error = %e, "chunk failed, subdividing");
                for (j, sub) in split_even(chunk, FALLBACK_SPLIT).iter().enumerate() {
                    debug!(chunk = i, sub_batch = j, "processing sub-batch");
                    if let Err(e) =
                        annotate_and_merge(service, &sub.join(SENTENCE_DELIMITER), &mut outcome)
                            .await
                    {
                        warn!(
                            chunk = i,
                            sub_batch = j,
                            error = %e,
                            "sub-batch failed, returning partial result"
                        );
                        outcome.truncated = true;
                        return outcome;
                    }
                }
            }
        }
    }

    info!(
        sentences = outcome.sentences.len(),
        placeholders = outcome.placeholders.len(),
        "anonymization run complete"
    );
    outcome
}

async fn annotate_and_merge(
    service: &dyn NerService,
    batch: &str,
    outcome: &mut AnonymizeOutcome,
) -> Result<(), NerError> {
    let response = service.annotate(batch).await?;
    let spans = extract_entities(&response.entities)?;
    let merged = merge_response(&response.text, &spans, &mut outcome.placeholders);
    outcome.sentences.extend(merged);
    Ok(())
}
