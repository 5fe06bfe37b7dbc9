//! Record export: CSV rows and the full nested JSON structure.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use corpusmill_common::{ConvertedRow, Result};
use csv::QuoteStyle;
use tracing::info;

use crate::models::Corpus;

/// Rendered in the label/macro CSV cells when a sentence carries none.
const NEGATIVE: &str = "Negative";

/// Write the full nested per-file structure, pretty-printed with sorted keys.
pub fn write_json(corpus: &Corpus, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, corpus)?;
    writer.flush()?;
    info!(path = %path.display(), "JSON export complete");
    Ok(())
}

/// Re-import a JSON export. Lossless for the documented per-sentence fields.
pub fn read_json(path: &Path) -> Result<Corpus> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write one CSV row per sentence.
///
/// With `flatten` the label cell holds only the first matched label name,
/// otherwise all names joined with `", "` (encounter order).
pub fn write_csv(corpus: &Corpus, path: &Path, flatten: bool) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_path(path)?;

    for (file_id, entry) in corpus {
        for record in entry.data.values() {
            let label = if flatten {
                record.labels.keys().next().unwrap_or_default().to_string()
            } else {
                record.labels.keys().collect::<Vec<_>>().join(", ")
            };
            let label = if label.is_empty() {
                NEGATIVE.to_string()
            } else {
                label
            };
            let macro_label = match &record.macro_label {
                Some(m) if !m.is_empty() => m.clone(),
                _ => NEGATIVE.to_string(),
            };

            writer.serialize(ConvertedRow {
                file_id: file_id.clone(),
                scope: record.scope.as_str().to_string(),
                label,
                macro_label,
                text: record.sentence.clone(),
            })?;
        }
    }

    writer.flush()?;
    info!(path = %path.display(), "CSV export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentEntry, LabelMap, Scope, SentenceRecord};

    fn record(labels: LabelMap, macro_label: Option<&str>) -> SentenceRecord {
        SentenceRecord {
            labels,
            macro_label: macro_label.map(str::to_string),
            scope: Scope::Unknown,
            sentence: "some sentence".into(),
        }
    }

    fn corpus_with(record: SentenceRecord) -> Corpus {
        let mut entry = DocumentEntry::default();
        entry.text.insert(0, record.sentence.clone());
        entry.data.insert(0, record);
        Corpus::from([("file_1".to_string(), entry)])
    }

    fn csv_lines(corpus: &Corpus, flatten: bool) -> Vec<String> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(corpus, &path, flatten).unwrap();
        std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_csv_flatten_takes_first_label() {
        let mut labels = LabelMap::default();
        labels.push("X", Some("x".into()));
        labels.push("Y", Some("y".into()));
        let corpus = corpus_with(record(labels, None));

        let flat = csv_lines(&corpus, true);
        assert!(flat[1].contains("\"X\""));
        assert!(!flat[1].contains("Y"));

        let full = csv_lines(&corpus, false);
        assert!(full[1].contains("\"X, Y\""));
    }

    #[test]
    fn test_csv_empty_cells_render_negative() {
        let corpus = corpus_with(record(LabelMap::default(), None));
        let lines = csv_lines(&corpus, true);
        assert_eq!(lines[0], "\"file_id\",\"scope\",\"label\",\"macro\",\"text\"");
        assert!(lines[1].contains("\"Negative\",\"Negative\""));
    }

    #[test]
    fn test_csv_macro_cell() {
        let corpus = corpus_with(record(LabelMap::default(), Some("Harmless")));
        let lines = csv_lines(&corpus, true);
        assert!(lines[1].contains("\"Negative\",\"Harmless\""));
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let mut labels = LabelMap::default();
        labels.push("Threat", Some("stab".into()));
        labels.push("Insult", None);
        let mut entry = DocumentEntry::default();
        entry.data.insert(
            0,
            SentenceRecord {
                labels,
                macro_label: Some("Severe".into()),
                scope: Scope::Question,
                sentence: "a threat".into(),
            },
        );
        entry.text.insert(0, "a threat".into());
        let corpus = Corpus::from([("askfm_1".to_string(), entry)]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&corpus, &path).unwrap();
        let reloaded = read_json(&path).unwrap();

        let before = &corpus["askfm_1"].data[&0];
        let after = &reloaded["askfm_1"].data[&0];
        assert_eq!(after.macro_label, before.macro_label);
        assert_eq!(after.scope, before.scope);
        assert_eq!(after.sentence, before.sentence);
        assert_eq!(
            after.labels.get("Threat"),
            Some(&[Some("stab".to_string())][..])
        );
        assert_eq!(after.labels.get("Insult"), Some(&[None][..]));
    }

    #[test]
    fn test_json_keys_are_sorted() {
        let corpus = corpus_with(record(LabelMap::default(), None));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&corpus, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        let annotations = raw.find("\"annotations\"").unwrap();
        let data = raw.find("\"data\"").unwrap();
        let text = raw.find("\"text\"").unwrap();
        assert!(annotations < data && data < text);
    }
}
