//! Raw text normalisation ahead of NER submission.

use std::sync::OnceLock;

use regex::Regex;

// Punctuation stripped before submission. Keeps . , @ ! ? # ' " — they carry
// signal for tweet NER (mentions, hashtags, sentence boundaries).
fn strip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[$%&()*+\-/:;<=>\[\\\]^_`{|}~]").unwrap())
}

/// Clean one sentence: stripped punctuation becomes a space, non-ASCII
/// characters are dropped, whitespace runs collapse to a single space.
pub fn clean_text(text: &str) -> String {
    let stripped = strip_pattern().replace_all(text, " ");
    let ascii: String = stripped.chars().filter(|c| c.is_ascii()).collect();
    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}
