//! Mock image generator for testing

use super::{GeneratedImage, ImageError, ImageGenerator};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Image generator that returns queued results
pub struct MockImageGenerator {
    results: Mutex<VecDeque<Result<GeneratedImage, ImageError>>>,
    /// Record of all prompts received
    pub prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockImageGenerator {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_image(&self, url: &str) {
        self.results.lock().unwrap().push_back(Ok(GeneratedImage {
            url: url.to_string(),
            revised_prompt: None,
        }));
    }

    pub fn queue_error(&self, error: ImageError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ImageError::unknown("No mock image queued")))
    }

    fn model_id(&self) -> &str {
        "mock-image-model"
    }
}
