//! Entity anonymization against an external NER web service.
//!
//! Cleans raw sentences, batches them to the service (~150 per request,
//! joined with a delimiter token), maps the returned entity spans back onto
//! the response text, and substitutes canonical placeholder tokens
//! (`<LOCATION_x>`, `<PERSON_gender>`, `<URL>`, `<USER_ID>`).
//!
//! On a failed request the chunk is subdivided into 25 sub-batches and
//! retried; a sub-batch failure ends the whole run with whatever was
//! collected so far.

pub mod clean;
pub mod client;
pub mod export;
pub mod extract;
pub mod models;
pub mod placeholder;
pub mod pipeline;

pub use client::{GateClient, NerError, NerService, DEFAULT_ENDPOINT};
pub use pipeline::{run_anonymization, AnonymizeOutcome};
pub use placeholder::PlaceholderMap;
