mod config;
mod dom;
mod errors;
mod export;
mod form;
mod models;
mod preview;
mod routes;
mod session;
mod state;
mod templates;

use anyhow::Result;
use std::net::SocketAddr;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::export::{CommandRasterizer, DirStylesheetSource, ExportPipeline, ExportSettings};
use crate::routes::build_router;
use crate::session::Session;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder v{}", env!("CARGO_PKG_VERSION"));

    // Build the preview document and bind every template once
    let mut session = Session::new()?;
    if config.seed_sample_data {
        session::sample::seed(&mut session)?;
    }

    // Initialize export pipeline
    let styles = Arc::new(DirStylesheetSource::new(
        config.stylesheet_dir.clone(),
        config.remote_stylesheets.clone(),
    ));
    let rasterizer = Arc::new(CommandRasterizer::new(config.rasterizer_command.clone()));
    let exporter = ExportPipeline::new(rasterizer, styles, ExportSettings::from_config(&config));
    info!(
        "Export pipeline ready (rasterizer: {}, output: {})",
        config.rasterizer_command,
        config.output_dir.display()
    );

    // Build app state
    let state = AppState {
        session: Arc::new(Mutex::new(session)),
        exporter: Arc::new(exporter),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
