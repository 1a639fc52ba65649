use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use lawdesk_core::LawDeskError;

use crate::error::ApiError;
use crate::sessions::session_token;
use crate::state::AppState;

/// Lets the request through only when it carries a live session cookie.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authenticated = match session_token(request.headers()) {
        Some(token) => state.sessions.validate(&token).await.is_some(),
        None => false,
    };

    if !authenticated {
        debug!(path = %request.uri().path(), "rejecting unauthenticated request");
        return ApiError(LawDeskError::Unauthorized).into_response();
    }

    next.run(request).await
}
