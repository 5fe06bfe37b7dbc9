//! NER web service client (GATE Cloud TwitIE style).

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::NerResponse;

/// GATE Cloud TwitIE named-entity recognizer for tweets.
pub const DEFAULT_ENDPOINT: &str =
    "https://cloud-api.gate.ac.uk/process-document/twitie-named-entity-recognizer-for-tweets";

/// Failure calling the NER service, split so callers can tell transport
/// problems from a service that answered with garbage.
#[derive(Debug, Error)]
pub enum NerError {
    #[error("transport error calling NER service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("NER service returned HTTP {0}")]
    Status(StatusCode),

    #[error("malformed NER response: {0}")]
    Shape(String),
}

/// Common interface for NER annotation backends.
#[async_trait]
pub trait NerService: Send + Sync {
    /// Submit one plain-text batch and return the parsed annotation response.
    async fn annotate(&self, batch: &str) -> Result<NerResponse, NerError>;
}

/// Authenticated client for the GATE Cloud process-document endpoint.
pub struct GateClient {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
}

impl GateClient {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, NerError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
        })
    }
}

#[async_trait]
impl NerService for GateClient {
    #[instrument(skip(self, batch), fields(chars = batch.len()))]
    async fn annotate(&self, batch: &str) -> Result<NerResponse, NerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .header(header::CONTENT_TYPE, "text/plain")
            .body(batch.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NerError::Status(status));
        }

        let body = response.text().await?;
        let parsed: NerResponse =
            serde_json::from_str(&body).map_err(|e| NerError::Shape(e.to_string()))?;
        debug!(entity_kinds = parsed.entities.len(), "NER response parsed");
        Ok(parsed)
    }
}
