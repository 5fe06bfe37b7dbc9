//! CSV/JSON IO for the anonymization pipeline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use corpusmill_common::{ConvertedRow, Result};
use serde::Serialize;
use tracing::info;

use crate::pipeline::AnonymizeOutcome;

/// One output row: the converted-corpus columns plus the cleaned text and
/// its anonymized counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedRow {
    pub file_id: String,
    pub scope: String,
    pub label: String,
    #[serde(rename = "macro")]
    pub macro_label: String,
    pub text: String,
    pub clean_text: String,
    pub gate_text: String,
}

/// Read the converted CSV; blank fields become a single space so every row
/// has submittable text.
pub fn read_rows(path: &Path) -> Result<Vec<ConvertedRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize::<ConvertedRow>() {
        let mut row = row?;
        fill_blank(&mut row.file_id);
        fill_blank(&mut row.scope);
        fill_blank(&mut row.label);
        fill_blank(&mut row.macro_label);
        fill_blank(&mut row.text);
        rows.push(row);
    }
    Ok(rows)
}

fn fill_blank(field: &mut String) {
    if field.is_empty() {
        field.push(' ');
    }
}

/// Write `gate_processed.csv` and `hashed.json` under `storage_dir`.
///
/// Output rows align with input rows by index; rows past the end of a
/// truncated run get an empty `gate_text`.
pub fn write_outputs(
    rows: &[ConvertedRow],
    cleaned: &[String],
    outcome: &AnonymizeOutcome,
    storage_dir: &Path,
) -> Result<()> {
    let csv_path = storage_dir.join("gate_processed.csv");
    let mut writer = csv::Writer::from_path(&csv_path)?;
    for (i, row) in rows.iter().enumerate() {
        writer.serialize(ProcessedRow {
            file_id: row.file_id.clone(),
            scope: row.scope.clone(),
            label: row.label.clone(),
            macro_label: row.macro_label.clone(),
            text: row.text.clone(),
            clean_text: cleaned.get(i).cloned().unwrap_or_default(),
            gate_text: outcome.sentences.get(i).cloned().unwrap_or_default(),
        })?;
    }
    writer.flush()?;

    let json_path = storage_dir.join("hashed.json");
    let mut json_writer = BufWriter::new(File::create(&json_path)?);
    serde_json::to_writer(&mut json_writer, &outcome.placeholders)?;
    json_writer.flush()?;

    info!(
        csv = %csv_path.display(),
        json = %json_path.display(),
        rows = rows.len(),
        "anonymization outputs written"
    );
    Ok(())
}
