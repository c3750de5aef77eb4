pub mod analysis;
pub mod ocr;

pub use analysis::{DeepSeekAnalyzer, ImageAnalysis};
pub use ocr::{OcrService, TextExtractor};
