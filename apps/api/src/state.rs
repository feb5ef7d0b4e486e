use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm::factory::LlmFactory;
use crate::pipelines::Orchestrator;
use crate::vector::VectorStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Graph dispatch table, compiled once and shared across requests.
    pub orchestrator: Arc<Orchestrator>,
    /// Chunking + embedding + tenant-scoped similarity search.
    pub vectors: Arc<VectorStore>,
    /// Credential resolution for the one route that talks to the LLM
    /// outside a pipeline (semantic search justification).
    pub llm_factory: Arc<LlmFactory>,
    pub config: Config,
}
