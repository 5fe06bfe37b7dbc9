//! Data model for the converted corpus.
//!
//! Struct fields and map keys are laid out so that plain serde serialization
//! yields the canonical export shape: object keys in sorted order, numeric
//! sentence/offset keys ordered numerically.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

/// Conversational scope of a sentence within a Q&A transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "q")]
    Question,
    #[serde(rename = "a")]
    Answer,
    #[serde(rename = "?")]
    Unknown,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Question => "q",
            Scope::Answer => "a",
            Scope::Unknown => "?",
        }
    }

    /// Files whose name carries the `ask` token alternate question/answer by
    /// sentence parity (even → question). Everything else is unknown.
    pub fn derive(file_name: &str, index: usize) -> Self {
        if file_name.contains("ask") {
            if index % 2 == 0 {
                Scope::Question
            } else {
                Scope::Answer
            }
        } else {
            Scope::Unknown
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parsed line of a `.ann` file, keyed in [`DocumentEntry::annotations`]
/// by its start offset.
///
/// Serde renames reproduce the export field names (`t` for the source id,
/// `index` for the character range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSpan {
    #[serde(rename = "index")]
    pub range: (usize, usize),
    pub label: String,
    #[serde(rename = "t")]
    pub source_id: u32,
    /// Annotation surface text; `None` when the pilcrow sentinel marked it absent.
    pub text: Option<String>,
}

impl AnnotationSpan {
    pub fn width(&self) -> usize {
        self.range.1.saturating_sub(self.range.0)
    }

    /// Width-1 spans are macro (document-level) labels rather than span labels.
    pub fn is_macro(&self) -> bool {
        self.width() == 1
    }
}

/// Insertion-ordered mapping of label name → annotation texts.
///
/// Encounter order is preserved because CSV flattening takes the *first*
/// label; JSON export sorts keys, which the custom `Serialize` handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap(Vec<(String, Vec<Option<String>>)>);

impl LabelMap {
    pub fn push(&mut self, label: &str, text: Option<String>) {
        if let Some((_, texts)) = self.0.iter_mut().find(|(l, _)| l == label) {
            texts.push(text);
        } else {
            self.0.push((label.to_string(), vec![text]));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Label names in encounter order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(l, _)| l.as_str())
    }

    pub fn get(&self, label: &str) -> Option<&[Option<String>]> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, texts)| texts.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.0.iter().map(|(l, t)| (l.as_str(), t.as_slice()))
    }
}

impl Serialize for LabelMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut sorted: Vec<&(String, Vec<Option<String>>)> = self.0.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (label, texts) in sorted {
            map.serialize_entry(label, texts)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabelMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelMapVisitor;

        impl<'de> serde::de::Visitor<'de> for LabelMapVisitor {
            type Value = LabelMap;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of label name to annotation texts")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<LabelMap, A::Error> {
                let mut entries = Vec::new();
                while let Some((label, texts)) =
                    access.next_entry::<String, Vec<Option<String>>>()?
                {
                    entries.push((label, texts));
                }
                Ok(LabelMap(entries))
            }
        }

        deserializer.deserialize_map(LabelMapVisitor)
    }
}

/// One non-blank line of a `.txt` file with its folded annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub labels: LabelMap,
    #[serde(rename = "macro")]
    pub macro_label: Option<String>,
    pub scope: Scope,
    pub sentence: String,
}

/// Everything extracted from one matched `.ann`/`.txt` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Raw annotation spans keyed by start offset (last writer wins on collision).
    pub annotations: BTreeMap<usize, AnnotationSpan>,
    /// Aligned per-sentence records keyed by sentence index.
    pub data: BTreeMap<usize, SentenceRecord>,
    /// Raw sentence text keyed by sentence index (blank lines removed).
    pub text: BTreeMap<usize, String>,
}

/// The whole converted dataset, keyed by extensionless file basename.
pub type Corpus = BTreeMap<String, DocumentEntry>;
