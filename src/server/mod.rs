pub mod handlers;
pub mod types;
pub mod view;

pub use handlers::AppState;

use crate::{
    Result,
    config::{Config, ServerConfig},
    gemini::GeminiClient,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let app = Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route(
            "/api/slots/:slot",
            get(handlers::slot_preview).put(handlers::upload_slot),
        )
        .route("/api/generate", post(handlers::generate))
        .route("/api/result", get(handlers::result_image))
        .route("/api/result/download", get(handlers::download_result))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

pub async fn run(config: Config) -> Result<()> {
    // One authenticated client, shared by every generation request
    let client = GeminiClient::new(&config.gemini)?;
    info!("Using generation model {}", client.model());

    let app_state = AppState::new(Arc::new(client));
    let app = router(app_state, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
