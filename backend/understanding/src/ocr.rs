//! Optical Character Recognition (OCR)
//!
//! The recognition engine is not wired in. Extraction always answers with the
//! configured fallback document and never looks at the image bytes.

use std::sync::Arc;

use poseidon_core::{DynamicFallback, FallbackData, FallbackSource};
use tracing::info;

/// Synchronous text extraction from raw image bytes.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, image: &[u8]) -> FallbackData;
}

pub struct OcrService {
    fallback: Arc<dyn FallbackSource>,
}

impl OcrService {
    pub fn new(fallback: Arc<dyn FallbackSource>) -> Self {
        Self { fallback }
    }
}

impl Default for OcrService {
    fn default() -> Self {
        Self::new(Arc::new(DynamicFallback))
    }
}

impl TextExtractor for OcrService {
    fn extract_text(&self, image: &[u8]) -> FallbackData {
        info!(bytes = image.len(), "OCR disabled; serving fallback data");
        self.fallback.generate()
    }
}
