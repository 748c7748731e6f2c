pub mod error;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use fms_client::FmsClient;
use fms_core::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with the action endpoint and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Single action endpoint; axum answers other methods with 405.
        .route("/api/fms", post(routes::action::dispatch))
        .route("/api/health", get(routes::health::health))
        .layer(DefaultBodyLimit::max(routes::action::MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the proxy on `0.0.0.0:{port}`.
pub async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(config, listener).await
}

/// Start the proxy on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(config: Config, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let upstream = config.base_url.clone();
    let app = build_router(state::AppState::new(FmsClient::new(config)?));

    tracing::info!(%upstream, "FMS check-in proxy listening on http://localhost:{actual_port}/api/fms");

    axum::serve(listener, app).await?;
    Ok(())
}
