mod config;
mod db;
mod errors;
mod extract;
mod llm;
mod models;
mod pipelines;
mod routes;
mod state;
mod vector;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm::factory::LlmFactory;
use crate::llm::DEFAULT_BASE_URL;
use crate::pipelines::Orchestrator;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector::{EmbeddingClient, VectorStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sift API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and apply the get-or-create schema
    let pool = create_pool(&config.database_url).await?;
    ensure_schema(&pool).await?;

    // One HTTP client shared by the chat and embedding endpoints
    let http = llm::build_http_client()?;

    // LLM client factory — request override → stored key → env default
    let llm_factory = Arc::new(LlmFactory::new(
        http.clone(),
        config.openrouter_api_key.clone(),
        config.llm_model.clone(),
    ));
    info!("LLM client factory initialized");

    // Vector store: chunking, embedding (with process-lifetime cache),
    // tenant-scoped similarity search
    let embedder = EmbeddingClient::new(
        http,
        DEFAULT_BASE_URL.to_string(),
        config.openrouter_api_key.clone(),
        config.embedding_model.clone(),
    );
    info!("Embedding client initialized (model: {})", embedder.model());
    let vectors = Arc::new(VectorStore::new(pool.clone(), embedder));

    // Pipeline graphs are compiled once and shared across requests
    let orchestrator = Arc::new(Orchestrator::new(llm_factory.clone()));
    info!("Pipeline orchestrator initialized");

    // Build app state
    let state = AppState {
        db: pool,
        orchestrator,
        vectors,
        llm_factory,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
