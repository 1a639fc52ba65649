use async_trait::async_trait;

use crate::error::Result;

/// Turns an uploaded image into plain text (OCR). Opaque to the pipeline.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &[u8]) -> Result<String>;
}
