use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod ocr;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod sweeper;

pub use state::AppState;

/// The full HTTP application: routes plus CORS and request tracing.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    routes::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
