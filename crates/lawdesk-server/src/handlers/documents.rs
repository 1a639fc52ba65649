use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, instrument, warn};

use lawdesk_core::api_types::SummaryPayload;
use lawdesk_core::LawDeskError;

use crate::error::ApiError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const SUPPORTED_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

struct Upload {
    content_type: String,
    bytes: Vec<u8>,
}

/// POST /upload-doc: OCR an uploaded image and summarize the text.
#[instrument(skip(state, multipart))]
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummaryPayload>, ApiError> {
    let upload = read_upload(multipart).await?;

    if !is_supported(&upload.content_type) {
        warn!(content_type = %upload.content_type, "unsupported upload type");
        return Err(LawDeskError::validation(
            "Unsupported file type. Please upload a PNG or JPEG image.",
        )
        .into());
    }

    info!(
        content_type = %upload.content_type,
        bytes = upload.bytes.len(),
        "extracting text from uploaded document"
    );

    let text = state.extractor.extract_text(&upload.bytes).await?;
    let summary = state.summarizer.summarize(&text).await;

    Ok(Json(summary))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, LawDeskError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LawDeskError::validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| LawDeskError::validation(format!("Failed to read upload: {e}")))?;

        return Ok(Upload {
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(LawDeskError::validation("No file uploaded."))
}

/// Compares the media type only, ignoring parameters and case.
fn is_supported(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    SUPPORTED_TYPES.contains(&essence.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_png_and_jpeg_only() {
        assert!(is_supported("image/png"));
        assert!(is_supported("IMAGE/JPEG; charset=binary"));
        assert!(!is_supported("text/plain"));
        assert!(!is_supported("image/gif"));
        assert!(!is_supported(""));
    }
}
