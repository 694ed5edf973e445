mod analysis;
mod config;
mod errors;
mod extraction;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::scoring::KeywordMatchScorer;
use crate::analysis::skills::{SkillCatalog, SkillCategory};
use crate::config::Config;
use crate::extraction::DocxExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;
    info!("Upload dir: {}", config.upload_dir.display());

    // Skill catalog is compiled once and shared read-only by every request
    let catalog = SkillCatalog::builtin().context("Failed to compile skill catalog")?;
    anyhow::ensure!(!catalog.is_empty(), "Skill catalog is empty");
    info!("Skill catalog loaded ({} patterns)", catalog.len());
    for category in SkillCategory::ALL {
        debug!("  {category:?}: {}", catalog.patterns_in(category).count());
    }

    let state = AppState {
        config: config.clone(),
        scorer: Arc::new(KeywordMatchScorer::new(catalog)),
        extractor: Arc::new(DocxExtractor),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");
    info!("Health check: http://localhost:{}/api/health", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
