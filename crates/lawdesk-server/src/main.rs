use tracing_subscriber::EnvFilter;

use lawdesk_core::AppConfig;
use lawdesk_server::{build_app, sweeper, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("lawdesk=info".parse()?))
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;
    let addr = format!("{}:{}", config.server_host, config.server_port);

    tracing::info!(
        upstream = %config.upstream_endpoint,
        model = %config.model_name,
        mode = %config.response_mode,
        timeout_secs = config.request_timeout_seconds,
        "Model gateway configured"
    );

    let state = AppState::from_config(config)?;
    tokio::spawn(sweeper::run_session_sweeper(state.sessions.clone()));

    let app = build_app(state);

    tracing::info!("LawDesk server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
