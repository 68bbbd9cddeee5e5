//! HTTP implementation of the collaborator interfaces

use super::types::{ErrorResponse, GenerateRequest, GenerateResponse, HistoryEntry};
use super::{ClientError, GenerationService, HistoryStore};
use crate::config::ClientConfig;
use crate::conversation::{Reply, Turn};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Talks to the tattoo backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    history_url: String,
    generate_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::network(format!("Failed to create HTTP client: {e}")))?;

        let base = config.api_base.trim_end_matches('/');
        Ok(Self {
            client,
            history_url: format!("{base}/api/history"),
            generate_url: format!("{base}/api/generate"),
        })
    }

    /// Read a response body, mapping non-2xx statuses and undecodable bodies
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map_or(body, |err| err.error);
            return Err(ClientError::from_status(status, &detail));
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::malformed(format!("Failed to parse response: {e} - body: {body}")))
    }
}

#[async_trait]
impl HistoryStore for HttpBackend {
    async fn fetch_history(&self) -> Result<Vec<Turn>, ClientError> {
        let response = self
            .client
            .get(&self.history_url)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(&e))?;

        let entries: Vec<HistoryEntry> = Self::read_json(response).await?;
        if let Some(blank) = entries.iter().find(|e| e.text.trim().is_empty()) {
            return Err(ClientError::malformed(format!(
                "History entry {} has no text",
                blank.id
            )));
        }

        Ok(entries.into_iter().map(HistoryEntry::into_turn).collect())
    }
}

#[async_trait]
impl GenerationService for HttpBackend {
    async fn generate(&self, prompt: &str) -> Result<Reply, ClientError> {
        let request = GenerateRequest {
            prompt: prompt.to_string(),
        };
        let response = self
            .client
            .post(&self.generate_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(&e))?;

        let body: GenerateResponse = Self::read_json(response).await?;
        if body.text.trim().is_empty() {
            return Err(ClientError::malformed("Reply has no text"));
        }

        Ok(body.into_reply())
    }
}
