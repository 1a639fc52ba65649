use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::{info, instrument};

use lawdesk_core::api_types::CredentialsForm;
use lawdesk_core::Registration;

use crate::error::ApiError;
use crate::sessions::{expired_cookie, session_token};
use crate::state::AppState;

/// POST /register: create an account from the login page form.
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Html("<h2>Username and password are required.</h2>"),
        )
            .into_response());
    }

    match state.credentials.register(username, &form.password).await? {
        Registration::Created => Ok((
            StatusCode::CREATED,
            Html("<h2>Registration successful. Please <a href='/'>login</a>.</h2>"),
        )
            .into_response()),
        Registration::Conflict => Ok((
            StatusCode::BAD_REQUEST,
            Html("<h2>Username already exists. Please try again.</h2>"),
        )
            .into_response()),
    }
}

/// POST /login: check credentials, start a session, go to the law page.
#[instrument(skip_all)]
pub async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let username = form.username.trim();
    if !state.credentials.verify(username, &form.password).await? {
        info!(username, "Login failed");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Html("<h2>Invalid credentials. Please try again.</h2>"),
        )
            .into_response());
    }

    let token = state.sessions.issue(username).await;
    info!(username, "Login successful");

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/law".to_string()),
            (header::SET_COOKIE, state.sessions.cookie(&token)),
        ],
    )
        .into_response())
}

/// POST /logout: end the caller's session, if any.
pub async fn handle_logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(&token).await;
    }

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, expired_cookie()),
        ],
    )
        .into_response()
}
