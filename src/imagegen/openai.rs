//! `OpenAI` images API implementation

use super::{GeneratedImage, ImageError, ImageGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Generates designs through `{base}/v1/images/generations`
pub struct OpenAiImageService {
    client: Client,
    api_key: String,
    model: String,
    size: String,
    endpoint: String,
}

impl OpenAiImageService {
    pub fn new(
        api_key: String,
        model: impl Into<String>,
        size: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ImageError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            size: size.into(),
            endpoint: format!("{}/v1/images/generations", base_url.trim_end_matches('/')),
        })
    }

    fn classify_status(status: reqwest::StatusCode, message: &str) -> ImageError {
        match status.as_u16() {
            401 | 403 => ImageError::auth(format!("Authentication failed: {message}")),
            429 => ImageError::rate_limit(format!("Rate limit exceeded: {message}")),
            400 => ImageError::invalid_request(format!("Invalid request: {message}")),
            500..=599 => ImageError::server_error(format!("Server error: {message}")),
            _ => ImageError::unknown(format!("HTTP {status}: {message}")),
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageService {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let request = ImagesRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: &self.size,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImageError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ImageError::network(format!("Connection failed: {e}"))
                } else {
                    ImageError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImageError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map_or(body, |err| err.error.message);
            return Err(Self::classify_status(status, &message));
        }

        let parsed: ImagesResponse = serde_json::from_str(&body).map_err(|e| {
            ImageError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        parsed
            .data
            .into_iter()
            .find_map(|image| {
                image.url.filter(|url| !url.trim().is_empty()).map(|url| GeneratedImage {
                    url,
                    revised_prompt: image.revised_prompt,
                })
            })
            .ok_or_else(|| ImageError::unknown("Response contained no image URL"))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================================
// Wire types
// ============================================================

#[derive(Debug, Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
