//! Entity span extraction from a parsed NER response.

use std::collections::BTreeMap;

use crate::client::NerError;
use crate::models::{EntityRecord, EntitySpans};

/// Attribute value standing in for an absent gender/locType.
pub const NA: &str = "na";

/// Group a response's entity lists by placeholder kind.
///
/// Entity-type keys are matched by substring, first match in the order
/// Location, Person, UserID, URL, Organization; anything else is ignored.
/// Organization mentions land in the URL list.
pub fn extract_entities(
    entities: &BTreeMap<String, Vec<EntityRecord>>,
) -> Result<EntitySpans, NerError> {
    let mut spans = EntitySpans::default();

    for (key, records) in entities {
        if key.contains("Location") {
            for record in records {
                let (start, end) = record.span()?;
                let loc_type = record.loc_type.clone().unwrap_or_else(|| NA.to_string());
                spans.locations.push((start, end, loc_type));
            }
        } else if key.contains("Person") {
            for record in records {
                let (start, end) = record.span()?;
                let gender = record.gender.clone().unwrap_or_else(|| NA.to_string());
                spans.persons.push((start, end, gender));
            }
        } else if key.contains("UserID") {
            for record in records {
                spans.user_ids.push(record.span()?);
            }
        } else if key.contains("URL") {
            for record in records {
                spans.urls.push(record.span()?);
            }
        } else if key.contains("Organization") {
            for record in records {
                spans.urls.push(record.span()?);
            }
        }
    }

    Ok(spans)
}
