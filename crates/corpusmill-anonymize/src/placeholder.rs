//! Placeholder substitution and the cumulative raw-string → placeholder map.
//!
//! Substitution is deliberately a literal whole-string replacement across the
//! entire response text, not an offset-indexed splice: if the same raw
//! substring occurs elsewhere with a different meaning, every occurrence is
//! replaced identically. Known imprecision, kept for output compatibility.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::EntitySpans;

/// The service HTML-escapes the join token, so the anonymized block splits on
/// the escaped form.
pub const ESCAPED_DELIMITER: &str = " &lt;--&gt; ";

/// Raw matched substring → placeholder token, accumulated over a whole run.
/// Last writer wins on collision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderMap(BTreeMap<String, String>);

impl PlaceholderMap {
    pub fn insert(&mut self, raw: String, placeholder: String) {
        self.0.insert(raw, placeholder);
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.0.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn location_placeholder(loc_type: &str) -> String {
    match loc_type {
        "na" | "pre" | "post" | "unknown" | "" => "<LOCATION_unknown>".to_string(),
        other => format!("<LOCATION_{other}>"),
    }
}

fn person_placeholder(gender: &str) -> String {
    match gender {
        "na" | "None" | "" => "<PERSON_gender_unknown>".to_string(),
        other => format!("<PERSON_{other}>"),
    }
}

/// Character-indexed slice, forgiving about out-of-range bounds.
fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// Anonymize one response: accumulate replacements in the fixed order
/// Location → Person → URL → UserID, apply them over the whole text, then
/// split back into per-sentence outputs on the escaped delimiter.
///
/// Single-character UserID matches `i` and `t` are left untouched; they are
/// overwhelmingly false positives on common short tokens.
pub fn merge_response(
    text: &str,
    spans: &EntitySpans,
    map: &mut PlaceholderMap,
) -> Vec<String> {
    let mut replacements: Vec<(String, String)> = Vec::new();

    for (start, end, loc_type) in &spans.locations {
        let raw = char_slice(text, *start, *end);
        let placeholder = location_placeholder(loc_type);
        map.insert(raw.clone(), placeholder.clone());
        replacements.push((raw, placeholder));
    }

    for (start, end, gender) in &spans.persons {
        let raw = char_slice(text, *start, *end);
        let placeholder = person_placeholder(gender);
        map.insert(raw.clone(), placeholder.clone());
        replacements.push((raw, placeholder));
    }

    for (start, end) in &spans.urls {
        let raw = char_slice(text, *start, *end);
        let placeholder = "<URL>".to_string();
        map.insert(raw.clone(), placeholder.clone());
        replacements.push((raw, placeholder));
    }

    for (start, end) in &spans.user_ids {
        let raw = char_slice(text, *start, *end);
        if raw != "i" && raw != "t" {
            let placeholder = "<USER_ID>".to_string();
            map.insert(raw.clone(), placeholder.clone());
            replacements.push((raw, placeholder));
        }
    }

    let mut anonymized = text.to_string();
    for (raw, placeholder) in &replacements {
        anonymized = anonymized.replace(raw.as_str(), placeholder);
    }

    anonymized
        .split(ESCAPED_DELIMITER)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(text: &str, spans: &EntitySpans) -> (Vec<String>, PlaceholderMap) {
        let mut map = PlaceholderMap::default();
        let sentences = merge_response(text, spans, &mut map);
        (sentences, map)
    }

    #[test]
    fn test_location_type_rules() {
        let text = "Danube and Paris";
        let spans = EntitySpans {
            locations: vec![(0, 6, "river".into()), (11, 16, "pre".into())],
            ..Default::default()
        };
        let (sentences, map) = merge(text, &spans);
        assert_eq!(sentences, vec!["<LOCATION_river> and <LOCATION_unknown>"]);
        assert_eq!(map.get("Danube"), Some("<LOCATION_river>"));
        assert_eq!(map.get("Paris"), Some("<LOCATION_unknown>"));
    }

    #[test]
    fn test_person_gender_rules() {
        let text = "alice met casey";
        let spans = EntitySpans {
            persons: vec![(0, 5, "f".into()), (10, 15, "None".into())],
            ..Default::default()
        };
        let (sentences, map) = merge(text, &spans);
        assert_eq!(sentences, vec!["<PERSON_f> met <PERSON_gender_unknown>"]);
        assert_eq!(map.get("casey"), Some("<PERSON_gender_unknown>"));
    }

    #[test]
    fn test_url_placeholder() {
        let text = "see http://a.io now";
        let spans = EntitySpans {
            urls: vec![(4, 15)],
            ..Default::default()
        };
        let (sentences, _) = merge(text, &spans);
        assert_eq!(sentences, vec!["see <URL> now"]);
    }

    #[test]
    fn test_user_id_short_token_guard() {
        let text = "i told @bob";
        let spans = EntitySpans {
            user_ids: vec![(0, 1), (7, 11)],
            ..Default::default()
        };
        let (sentences, map) = merge(text, &spans);
        assert_eq!(sentences, vec!["i told <USER_ID>"]);
        assert_eq!(map.get("i"), None);
        assert_eq!(map.get("@bob"), Some("<USER_ID>"));
    }

    #[test]
    fn test_whole_string_replacement_hits_every_occurrence() {
        // Documented imprecision: the second "London" is not an entity span
        // but gets replaced anyway.
        let text = "London is London";
        let spans = EntitySpans {
            locations: vec![(0, 6, "city".into())],
            ..Default::default()
        };
        let (sentences, _) = merge(text, &spans);
        assert_eq!(sentences, vec!["<LOCATION_city> is <LOCATION_city>"]);
    }

    #[test]
    fn test_split_on_escaped_delimiter() {
        let text = "one &lt;--&gt; two &lt;--&gt; three";
        let (sentences, _) = merge(text, &EntitySpans::default());
        assert_eq!(sentences, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_map_accumulates_last_write_wins() {
        let mut map = PlaceholderMap::default();
        let spans = EntitySpans {
            locations: vec![(0, 6, "city".into())],
            ..Default::default()
        };
        merge_response("London", &spans, &mut map);

        let spans = EntitySpans {
            locations: vec![(0, 6, "pre".into())],
            ..Default::default()
        };
        merge_response("London", &spans, &mut map);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("London"), Some("<LOCATION_unknown>"));
    }

    #[test]
    fn test_spans_index_by_characters_not_bytes() {
        // Service responses can carry escaped unicode; indices are characters.
        let text = "héllo Paris";
        let spans = EntitySpans {
            locations: vec![(6, 11, "city".into())],
            ..Default::default()
        };
        let (sentences, _) = merge(text, &spans);
        assert_eq!(sentences, vec!["héllo <LOCATION_city>"]);
    }
}
