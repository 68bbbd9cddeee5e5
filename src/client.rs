//! Collaborators of the conversation core
//!
//! The history store and the generation service are the only I/O boundary of
//! the controller. Both are async traits so tests can swap in mocks.

mod error;
mod http;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use error::{ClientError, ClientErrorKind};
pub use http::HttpBackend;

use crate::config::ClientConfig;
use crate::conversation::{ConversationController, Reply, Turn};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Source of prior conversation turns
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Fetch all prior turns, oldest first. Empty means a new session.
    async fn fetch_history(&self) -> Result<Vec<Turn>, ClientError>;
}

/// Turns a prompt into an assistant reply
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate a reply for an already trimmed, non-empty prompt
    async fn generate(&self, prompt: &str) -> Result<Reply, ClientError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: HistoryStore + ?Sized> HistoryStore for Arc<T> {
    async fn fetch_history(&self) -> Result<Vec<Turn>, ClientError> {
        (**self).fetch_history().await
    }
}

#[async_trait]
impl<T: GenerationService + ?Sized> GenerationService for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<Reply, ClientError> {
        (**self).generate(prompt).await
    }
}

/// Controller wired to the HTTP backend, with call logging
pub type HttpConversation =
    ConversationController<LoggingClient<Arc<HttpBackend>>, LoggingClient<Arc<HttpBackend>>>;

/// Build a controller that talks to the backend described by `config`
pub fn connect(config: &ClientConfig) -> Result<HttpConversation, ClientError> {
    let backend = Arc::new(HttpBackend::new(config)?);
    tracing::debug!(api_base = %config.api_base, "Connecting to tattoo backend");
    Ok(ConversationController::new(
        LoggingClient::new(Arc::clone(&backend)),
        LoggingClient::new(backend),
    ))
}

// ============================================================================
// Logging wrapper
// ============================================================================

/// Logs duration and outcome of every collaborator call
#[derive(Debug, Clone)]
pub struct LoggingClient<T> {
    inner: T,
}

impl<T> LoggingClient<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: HistoryStore> HistoryStore for LoggingClient<T> {
    async fn fetch_history(&self) -> Result<Vec<Turn>, ClientError> {
        let start = Instant::now();
        let result = self.inner.fetch_history().await;
        let duration = start.elapsed();

        match &result {
            Ok(turns) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    turns = turns.len(),
                    "History fetched"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "History fetch failed"
                );
            }
        }

        result
    }
}

#[async_trait]
impl<T: GenerationService> GenerationService for LoggingClient<T> {
    async fn generate(&self, prompt: &str) -> Result<Reply, ClientError> {
        let start = Instant::now();
        let result = self.inner.generate(prompt).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    prompt_chars = prompt.chars().count(),
                    has_image = reply.image_url.is_some(),
                    "Generation completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Generation failed"
                );
            }
        }

        result
    }
}
