use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use lawdesk_core::api_types::ErrorBody;
use lawdesk_core::LawDeskError;

const INTERNAL_MESSAGE: &str = "Internal server error.";

/// HTTP face of `LawDeskError`. Client errors carry their message; anything
/// else is logged here and answered with a generic 500.
#[derive(Debug)]
pub struct ApiError(pub LawDeskError);

impl From<LawDeskError> for ApiError {
    fn from(err: LawDeskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LawDeskError::InputValidation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            LawDeskError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required.".to_string())
            }
            other => {
                error!(error = %other, "request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let resp = ApiError(LawDeskError::validation("No question provided.")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn extraction_failure_maps_to_500() {
        let resp = ApiError(LawDeskError::Extraction("tesseract crashed".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let resp = ApiError(LawDeskError::Unauthorized).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
