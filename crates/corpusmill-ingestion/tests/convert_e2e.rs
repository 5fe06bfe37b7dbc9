//! End-to-end conversion: dataset directory → corpus → CSV + JSON.

use std::fs;
use std::path::Path;

use corpusmill_ingestion::aligner::ErrorCheck;
use corpusmill_ingestion::export::{read_json, write_csv, write_json};
use corpusmill_ingestion::pipeline::load_corpus;

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// A two-sentence ask-style conversation with one macro label and one span
/// label. Character offsets:
///   "¶ who is there?" → 15 chars, separator at 15
///   "nobody here"     → starts at offset 16
fn seed_dataset(dir: &Path) {
    write_file(dir, "askr_1.txt", "¶ who is there?\nnobody here\n");
    write_file(
        dir,
        "askr_1.ann",
        "T1\tInsulting 0 1\t¶\nT2\tCurse 16 22\tnobody\n",
    );
}

#[test]
fn test_convert_produces_expected_csv_rows() {
    let dataset = tempfile::tempdir().unwrap();
    seed_dataset(dataset.path());

    let (corpus, stats) = load_corpus(dataset.path(), ErrorCheck::Off).unwrap();
    assert_eq!(stats.loaded, 1);
    assert_eq!(stats.errors, 0);

    let out = tempfile::tempdir().unwrap();
    let csv_path = out.path().join("corpus.csv");
    write_csv(&corpus, &csv_path, true).unwrap();

    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "\"file_id\",\"scope\",\"label\",\"macro\",\"text\"");
    // macro label sentence: pilcrow marker stripped, no span labels
    assert_eq!(
        lines[1],
        "\"askr_1\",\"q\",\"Negative\",\"Insulting\",\"who is there?\""
    );
    // span label sentence on the answer side of the conversation
    assert_eq!(
        lines[2],
        "\"askr_1\",\"a\",\"Curse\",\"Negative\",\"nobody here\""
    );
}

#[test]
fn test_json_export_reimports_identically() {
    let dataset = tempfile::tempdir().unwrap();
    seed_dataset(dataset.path());

    let (corpus, _) = load_corpus(dataset.path(), ErrorCheck::Off).unwrap();

    let out = tempfile::tempdir().unwrap();
    let json_path = out.path().join("corpus.json");
    write_json(&corpus, &json_path).unwrap();
    let reloaded = read_json(&json_path).unwrap();

    let before = &corpus["askr_1"];
    let after = &reloaded["askr_1"];
    assert_eq!(after.text, before.text);
    assert_eq!(after.annotations, before.annotations);
    for (index, record) in &before.data {
        let reloaded_record = &after.data[index];
        assert_eq!(reloaded_record.macro_label, record.macro_label);
        assert_eq!(reloaded_record.scope, record.scope);
        assert_eq!(reloaded_record.sentence, record.sentence);
        for (label, texts) in record.labels.iter() {
            assert_eq!(reloaded_record.labels.get(label), Some(texts));
        }
    }
}

#[test]
fn test_orphan_files_counted_not_fatal() {
    let dataset = tempfile::tempdir().unwrap();
    seed_dataset(dataset.path());
    write_file(dataset.path(), "orphan.txt", "no companion\n");

    let (corpus, stats) = load_corpus(dataset.path(), ErrorCheck::Off).unwrap();
    assert_eq!(stats.loaded, 1);
    assert_eq!(stats.errors, 1);
    assert!(!corpus.contains_key("orphan"));
}
