use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::auth::require_session;
use crate::handlers;
use crate::state::AppState;

/// Uploaded scans can be larger than axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    // Question pipeline, session required
    let pipeline = Router::new()
        .route("/ask", post(handlers::ask::ask_question))
        .route("/upload-doc", post(handlers::documents::upload_document))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        // Pages
        .route("/", get(handlers::pages::serve_login))
        .route("/law", get(handlers::pages::serve_law))
        // Accounts
        .route("/register", post(handlers::accounts::register_user))
        .route("/login", post(handlers::accounts::handle_login))
        .route("/logout", post(handlers::accounts::handle_logout))
        // Health
        .route("/health", get(handlers::health::health_check))
        .merge(pipeline)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
