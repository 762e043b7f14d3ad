mod applications;
mod chat;
mod config;
mod db;
mod dse;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod users;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::chat::assistant::{CannedAssistant, ChatAssistant, LlmAssistant};
use crate::config::Config;
use crate::db::create_pool;
use crate::dse::catalog::Catalog;
use crate::jobs::JobBoard;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pathway API v{}", env!("CARGO_PKG_VERSION"));

    // Storage: PostgreSQL when configured, in-memory demo mode otherwise
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => {
            info!("DATABASE_URL not set, keeping state in memory");
            Arc::new(MemoryStore::default())
        }
    };

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("Failed to load program catalog from {path}"))?,
        None => Catalog::bundled().context("Bundled program catalog is invalid")?,
    };
    info!(
        "Program catalog loaded: {} universities, {} programs",
        catalog.universities.len(),
        catalog.program_count()
    );

    let jobs = JobBoard::bundled().context("Bundled job board is invalid")?;
    info!("Job board loaded: {} postings", jobs.jobs.len());

    let assistant: Arc<dyn ChatAssistant> = match &config.llm_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), &config.llm_base_url, config.llm_model.clone())?;
            info!("LLM client initialized (model: {})", llm.model());
            Arc::new(LlmAssistant::new(llm))
        }
        None => {
            info!("LLM_API_KEY not set, chat uses canned responses");
            Arc::new(CannedAssistant)
        }
    };

    let state = AppState {
        store,
        catalog: Arc::new(catalog),
        jobs: Arc::new(jobs),
        assistant,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
