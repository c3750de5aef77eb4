//! Image analysis through a remote vision model.
//!
//! The DeepSeek call is switched off: `analyze` returns the fallback document
//! without touching the network or the image bytes.

use std::sync::Arc;

use async_trait::async_trait;
use poseidon_core::{DynamicFallback, FallbackData, FallbackSource};
use tracing::info;

/// Asynchronous analysis of raw image bytes.
#[async_trait]
pub trait ImageAnalysis: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> FallbackData;
}

pub struct DeepSeekAnalyzer {
    provider: String,
    model: String,
    fallback: Arc<dyn FallbackSource>,
}

impl DeepSeekAnalyzer {
    pub fn new(fallback: Arc<dyn FallbackSource>) -> Self {
        Self {
            provider: "deepseek".to_string(),
            model: "deepseek-chat".to_string(),
            fallback,
        }
    }

    pub fn with_model(mut self, provider: impl Into<String>, model: impl Into<String>) -> Self {
        self.provider = provider.into();
        self.model = model.into();
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for DeepSeekAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(DynamicFallback))
    }
}

#[async_trait]
impl ImageAnalysis for DeepSeekAnalyzer {
    async fn analyze(&self, image: &[u8]) -> FallbackData {
        info!(
            provider = %self.provider,
            model = %self.model,
            bytes = image.len(),
            "Remote analysis disabled; serving fallback data"
        );
        self.fallback.generate()
    }
}
