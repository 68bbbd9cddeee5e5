//! Mock collaborators for testing
//!
//! These mocks let the controller be exercised without a backend.

use super::{ClientError, GenerationService, HistoryStore};
use crate::conversation::{Reply, Role, Turn};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Mock History Store
// ============================================================================

/// History store returning a fixed answer
pub struct MockHistoryStore {
    result: Mutex<Option<Result<Vec<Turn>, ClientError>>>,
    /// Number of fetches made
    pub fetches: Mutex<usize>,
}

#[allow(dead_code)]
impl MockHistoryStore {
    pub fn with_turns(turns: Vec<Turn>) -> Self {
        Self {
            result: Mutex::new(Some(Ok(turns))),
            fetches: Mutex::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_turns(Vec::new())
    }

    pub fn failing(error: ClientError) -> Self {
        Self {
            result: Mutex::new(Some(Err(error))),
            fetches: Mutex::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl HistoryStore for MockHistoryStore {
    async fn fetch_history(&self) -> Result<Vec<Turn>, ClientError> {
        *self.fetches.lock().unwrap() += 1;
        // The first fetch consumes the configured answer; later ones see an empty store
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Build a stored turn
pub fn turn(role: Role, text: &str, image_url: Option<&str>) -> Turn {
    Turn {
        role,
        text: text.to_string(),
        image_url: image_url.map(String::from),
    }
}

// ============================================================================
// Mock Generation Service
// ============================================================================

/// Generation service that returns queued replies
pub struct MockGenerationService {
    replies: Mutex<VecDeque<Result<Reply, ClientError>>>,
    /// Record of all prompts received
    pub prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockGenerationService {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: &str, image_url: Option<&str>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(Reply::new(text, image_url.map(String::from))));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: ClientError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded prompts
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_reply(&self, prompt: &str) -> Result<Reply, ClientError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::network("No mock reply queued")))
    }
}

impl Default for MockGenerationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn generate(&self, prompt: &str) -> Result<Reply, ClientError> {
        self.next_reply(prompt)
    }
}

// ============================================================================
// Gated Mock Generation Service (for observing the pending window)
// ============================================================================

/// Generation service that holds each request until the test releases it
pub struct GatedMockGenerationService {
    inner: MockGenerationService,
    /// Notified when a request arrives
    pub request_started: Arc<Notify>,
    /// Notify to let the held request finish
    pub release: Arc<Notify>,
}

#[allow(dead_code)]
impl GatedMockGenerationService {
    pub fn new() -> Self {
        Self {
            inner: MockGenerationService::new(),
            request_started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, text: &str, image_url: Option<&str>) {
        self.inner.queue_reply(text, image_url);
    }

    pub fn queue_error(&self, error: ClientError) {
        self.inner.queue_error(error);
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.inner.recorded_prompts()
    }
}

impl Default for GatedMockGenerationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for GatedMockGenerationService {
    async fn generate(&self, prompt: &str) -> Result<Reply, ClientError> {
        self.request_started.notify_one();
        self.release.notified().await;
        self.inner.next_reply(prompt)
    }
}

// ============================================================================
// Panicking Mock Generation Service
// ============================================================================

/// Generation service whose every call panics
pub struct PanickingGenerationService;

#[async_trait]
impl GenerationService for PanickingGenerationService {
    async fn generate(&self, _prompt: &str) -> Result<Reply, ClientError> {
        panic!("generation backend exploded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generation_service() {
        let mock = MockGenerationService::new();
        mock.queue_reply("Hello", None);

        let reply = mock.generate("rose").await.unwrap();
        assert_eq!(reply.text, "Hello");

        // Second call should fail (no more replies)
        assert!(mock.generate("rose").await.is_err());
        assert_eq!(mock.recorded_prompts(), vec!["rose", "rose"]);
    }

    #[tokio::test]
    async fn test_mock_history_store_answers_once() {
        let store = MockHistoryStore::with_turns(vec![turn(Role::User, "hi", None)]);
        assert_eq!(store.fetch_history().await.unwrap().len(), 1);
        assert!(store.fetch_history().await.unwrap().is_empty());
        assert_eq!(store.fetch_count(), 2);
    }
}
