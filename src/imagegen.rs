//! Tattoo design generation
//!
//! The backend turns a user's description into an engineered prompt and asks
//! an image model for a design.

mod error;
mod openai;
mod prompt;

#[cfg(test)]
pub mod testing;

pub use error::{ImageError, ImageErrorKind};
pub use openai::OpenAiImageService;
pub use prompt::{engineer_prompt, reply_text};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// A generated design
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
    /// Prompt as rewritten by the model, when it reports one
    pub revised_prompt: Option<String>,
}

/// Image model
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for an engineered prompt
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError>;

    /// Model identifier
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: ImageGenerator + ?Sized> ImageGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        (**self).generate(prompt).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Logs duration and outcome of every generation
pub struct LoggingImageGenerator<T> {
    inner: T,
}

impl<T> LoggingImageGenerator<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: ImageGenerator> ImageGenerator for LoggingImageGenerator<T> {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let start = Instant::now();
        let result = self.inner.generate(prompt).await;
        let duration = start.elapsed();

        match &result {
            Ok(image) => {
                tracing::info!(
                    model = %self.inner.model_id(),
                    duration_ms = %duration.as_millis(),
                    revised = image.revised_prompt.is_some(),
                    "Image generated"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.inner.model_id(),
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    retryable = e.is_retryable(),
                    error = %e.message,
                    "Image generation failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
