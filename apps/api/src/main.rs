mod analysis;
mod config;
mod errors;
mod report;
mod routes;
mod similarity;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume similarity API v{}", env!("CARGO_PKG_VERSION"));

    // Stop words are loaded once here and shared read-only across requests
    let state = AppState::new(config.clone());
    info!(
        "Loaded {} stop words (case-insensitive: {})",
        state.stop_words.len(),
        config.stopwords_case_insensitive
    );
    info!(
        "IDF strategy: {}, folder scan enabled: {}, report dir: {}",
        config.idf_strategy,
        config.enable_folder_scan,
        config.report_dir.display()
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
