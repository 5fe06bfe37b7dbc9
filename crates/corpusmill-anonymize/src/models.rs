//! NER service response shapes and extracted entity spans.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::client::NerError;

/// Parsed body of one NER service response.
#[derive(Debug, Clone, Deserialize)]
pub struct NerResponse {
    /// The (possibly escaped) text the entity indices refer to.
    pub text: String,
    /// Entity-type name → detected mentions.
    #[serde(default)]
    pub entities: BTreeMap<String, Vec<EntityRecord>>,
}

/// One detected mention. Unknown attributes are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    /// Character index pair into [`NerResponse::text`]; first is the start,
    /// last is the end.
    pub indices: Vec<usize>,
    /// Person attribute.
    pub gender: Option<String>,
    /// Location attribute.
    #[serde(rename = "locType")]
    pub loc_type: Option<String>,
}

impl EntityRecord {
    pub fn span(&self) -> Result<(usize, usize), NerError> {
        match (self.indices.first(), self.indices.last()) {
            (Some(&start), Some(&end)) => Ok((start, end)),
            _ => Err(NerError::Shape("entity record with empty indices".into())),
        }
    }
}

/// Entity spans grouped the way the merge step consumes them.
///
/// Organization mentions are folded into `urls`; both get the `<URL>`
/// placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySpans {
    pub urls: Vec<(usize, usize)>,
    pub user_ids: Vec<(usize, usize)>,
    /// `(start, end, gender)`, gender defaulting to `"na"`.
    pub persons: Vec<(usize, usize, String)>,
    /// `(start, end, loc_type)`, type defaulting to `"na"`.
    pub locations: Vec<(usize, usize, String)>,
}
