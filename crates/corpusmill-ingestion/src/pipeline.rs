//! Dataset directory ingestion.
//!
//! Pairs `.ann`/`.txt` files by extensionless stem, converts each pair into a
//! [`DocumentEntry`], and reports aggregate counts at the end of the run.
//! No error short of a strict annotation-check mismatch escapes a single
//! file's processing.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use corpusmill_common::Result;
use tracing::{info, warn};

use crate::aligner::{align_sentences, ErrorCheck};
use crate::brat::{parse_annotations, parse_text_lines};
use crate::models::{Corpus, DocumentEntry};

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Pairs read successfully (malformed annotation sets still count as loaded).
    pub loaded: usize,
    /// Stems missing either companion file.
    pub errors: usize,
}

/// Collect the unique extensionless stems in `dir`, sorted.
///
/// The stem is the path up to the last `.`, matching how the dataset pairs
/// `basename.ann` with `basename.txt`.
pub fn scan_stems(dir: &Path) -> Result<Vec<String>> {
    let mut stems = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path.to_string_lossy();
        let stem = match name.rfind('.') {
            Some(i) => name[..i].to_string(),
            None => name.to_string(),
        };
        stems.insert(stem);
    }
    Ok(stems.into_iter().collect())
}

/// Read every matched pair under `dir` into a [`Corpus`].
///
/// Missing companions are counted and skipped; a malformed `.ann` file
/// degrades that file's annotations to empty.
pub fn load_corpus(dir: &Path, error_check: ErrorCheck) -> Result<(Corpus, IngestStats)> {
    let mut corpus = Corpus::new();
    let mut stats = IngestStats::default();

    for stem in scan_stems(dir)? {
        let ann_raw = fs::read_to_string(format!("{stem}.ann"));
        let txt_raw = fs::read_to_string(format!("{stem}.txt"));
        let (ann_raw, txt_raw) = match (ann_raw, txt_raw) {
            (Ok(ann), Ok(txt)) => (ann, txt),
            _ => {
                stats.errors += 1;
                continue;
            }
        };

        let annotations = match parse_annotations(&ann_raw) {
            Ok(spans) => spans,
            Err(e) => {
                warn!(file = %stem, error = %e, "malformed annotation file, dropping its annotations");
                Default::default()
            }
        };
        let text = parse_text_lines(&txt_raw);
        let data = align_sentences(&stem, &text, &annotations, error_check)?;

        let file_id = Path::new(&stem)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.clone());
        corpus.insert(file_id, DocumentEntry { annotations, data, text });
        stats.loaded += 1;
    }

    info!(
        errors = stats.errors,
        loaded = stats.loaded,
        "ingestion run complete"
    );
    Ok((corpus, stats))
}
