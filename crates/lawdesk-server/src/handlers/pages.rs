use std::path::Path;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::sessions::session_token;
use crate::state::AppState;

/// GET /: the login/registration page.
pub async fn serve_login(State(state): State<AppState>) -> Response {
    serve_page(&state.config.static_dir, "login.html", "Login page not found.").await
}

/// GET /law: the question and upload page; sends anonymous callers to login.
pub async fn serve_law(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let authenticated = match session_token(&headers) {
        Some(token) => state.sessions.validate(&token).await.is_some(),
        None => false,
    };
    if !authenticated {
        return (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response();
    }

    serve_page(&state.config.static_dir, "law.html", "Law page not found.").await
}

async fn serve_page(static_dir: &str, file: &str, missing: &'static str) -> Response {
    let path = Path::new(static_dir).join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Frontend file not found in the static directory");
            (StatusCode::NOT_FOUND, missing).into_response()
        }
    }
}
