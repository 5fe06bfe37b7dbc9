//! Brat annotation file parsing.
//!
//! `.ann` lines are tab-separated:
//!   col0  annotation id with a marker prefix (`T12`)
//!   col1  `label start end` (space-separated)
//!   col2  annotation surface text, absent when it holds the pilcrow sentinel
//!
//! Parsing a whole file is all-or-nothing: one malformed line invalidates the
//! file's annotation set (the caller degrades it to empty and keeps going).

use std::collections::BTreeMap;

use corpusmill_common::{CorpusmillError, Result};

use crate::models::AnnotationSpan;

/// Sentinel marking an absent annotation text column.
pub const PILCROW: char = '¶';

/// Parse a `.txt` file into an index → sentence map.
///
/// Blank lines are dropped before indexing, so sentence indices are
/// consecutive over the remaining lines.
pub fn parse_text_lines(raw: &str) -> BTreeMap<usize, String> {
    raw.lines()
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| (i, line.to_string()))
        .collect()
}

/// Parse a `.ann` file into a start-offset → span map.
///
/// Duplicate start offsets are resolved last-writer-wins, in file order.
pub fn parse_annotations(raw: &str) -> Result<BTreeMap<usize, AnnotationSpan>> {
    let mut spans = BTreeMap::new();
    for (line_no, line) in raw.lines().enumerate() {
        let span = parse_line(line)
            .ok_or_else(|| CorpusmillError::Dataset(format!("bad annotation line {line_no}: {line:?}")))?;
        spans.insert(span.range.0, span);
    }
    Ok(spans)
}

fn parse_line(line: &str) -> Option<AnnotationSpan> {
    let mut cols = line.split('\t');
    let id_col = cols.next()?;
    let triple = cols.next()?;
    let text_col = cols.next()?;

    // "T12" → 12
    let source_id: u32 = id_col.get(1..)?.parse().ok()?;

    let mut parts = triple.split_whitespace();
    let label = parts.next()?;
    let start: usize = parts.next()?.parse().ok()?;
    let end: usize = parts.next()?.parse().ok()?;

    let text = if text_col.contains(PILCROW) {
        None
    } else {
        Some(text_col.to_string())
    };

    Some(AnnotationSpan {
        range: (start, end),
        label: label.to_string(),
        source_id,
        text,
    })
}
