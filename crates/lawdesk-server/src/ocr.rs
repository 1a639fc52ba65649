use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use lawdesk_core::error::{LawDeskError, Result};
use lawdesk_core::extraction::TextExtractor;

/// OCR through the `tesseract` command-line tool, fed on stdin.
pub struct TesseractExtractor {
    command: String,
}

impl TesseractExtractor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl TextExtractor for TesseractExtractor {
    #[instrument(skip(self, image), fields(image_len = image.len()))]
    async fn extract_text(&self, image: &[u8]) -> Result<String> {
        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                LawDeskError::Extraction(format!("failed to start '{}': {e}", self.command))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LawDeskError::Extraction("tesseract stdin unavailable".into()))?;

        // Feed stdin from its own task so a full stdout pipe cannot stall us.
        let data = image.to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&data).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;
        let written = writer
            .await
            .map_err(|e| LawDeskError::Internal(format!("stdin writer task failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LawDeskError::Extraction(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        written?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(text_len = text.len(), "extracted document text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_an_extraction_error() {
        let extractor = TesseractExtractor::new("lawdesk-no-such-ocr-binary");
        let err = extractor.extract_text(b"\x89PNG").await.unwrap_err();
        assert!(matches!(err, LawDeskError::Extraction(_)));
    }
}
