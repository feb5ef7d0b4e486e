pub mod analyze;
pub mod dashboard;
pub mod generate;
pub mod health;
pub mod resumes;
pub mod search;
pub mod user;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{delete, get, post, put},
    Router,
};
use axum::Json;
use tracing::warn;

use crate::errors::AppError;
use crate::llm::credentials;
use crate::llm::factory::RequestConfig;
use crate::pipelines::TaskResult;
use crate::state::AppState;

/// Tenant identity, taken from the `X-User-Id` header the (out-of-scope)
/// auth layer sets. Falls back to a demo tenant for local development.
pub struct TenantId(pub String);

const DEFAULT_TENANT: &str = "demo_user";

#[async_trait]
impl<S> FromRequestParts<S> for TenantId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_TENANT)
            .to_string();
        Ok(TenantId(owner))
    }
}

/// Per-request credential override headers.
pub struct LlmHeaders {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for LlmHeaders
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Ok(LlmHeaders {
            api_key: header("x-openrouter-key"),
            model: header("x-llm-model"),
        })
    }
}

/// Builds the factory input for one request: header overrides plus the
/// tenant's stored credential. A failed credential lookup degrades to "no
/// stored credential" rather than failing the request.
pub async fn request_config(state: &AppState, owner: &str, headers: LlmHeaders) -> RequestConfig {
    let mut config = RequestConfig::from_override(headers.api_key, headers.model);
    config.stored = match credentials::stored_credential(&state.db, owner).await {
        Ok(stored) => stored,
        Err(e) => {
            warn!("stored credential lookup failed for {owner}: {e}");
            None
        }
    };
    config
}

/// Converts a pipeline outcome into a response: gate rejections become 422s
/// carrying the structured rejection, contained errors surface as LLM
/// errors, and everything else is returned as-is.
pub fn pipeline_response(result: TaskResult) -> Result<Json<TaskResult>, AppError> {
    match result {
        TaskResult::Rejected(rejection) => Err(AppError::Gate(rejection)),
        TaskResult::Error(body) => Err(AppError::Llm(body.error)),
        other => Ok(Json(other)),
    }
}

/// The embedding key for a request: header override, then stored key.
/// (The embedding client itself falls back to the process default.)
pub fn embedding_key(config: &RequestConfig) -> Option<String> {
    config
        .overrides
        .as_ref()
        .and_then(|o| o.api_key.clone())
        .or_else(|| config.stored.as_ref().map(|s| s.api_key.clone()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis pipelines
        .route("/api/v1/analyze/quality", post(analyze::handle_quality))
        .route("/api/v1/analyze/gap", post(analyze::handle_gap))
        .route("/api/v1/analyze/screen", post(analyze::handle_screen))
        // Resume generation pipelines
        .route("/api/v1/generate", post(generate::handle_generate))
        .route(
            "/api/v1/linkedin/convert",
            post(generate::handle_linkedin_convert),
        )
        // Resume storage
        .route("/api/v1/resumes", post(resumes::handle_upload))
        .route("/api/v1/resumes", get(resumes::handle_list))
        .route("/api/v1/resumes/:id", delete(resumes::handle_delete))
        // Semantic search & matching
        .route("/api/v1/search", post(search::handle_search))
        .route("/api/v1/search/jobs", get(search::handle_search_jobs))
        .route("/api/v1/match/resume/:id", get(search::handle_match_resume))
        .route("/api/v1/jobs", post(search::handle_create_job))
        .route("/api/v1/jobs", get(search::handle_list_jobs))
        // Dashboard & settings
        .route("/api/v1/dashboard/stats", get(dashboard::handle_stats))
        .route("/api/v1/user/settings", get(user::handle_get_settings))
        .route("/api/v1/user/settings", put(user::handle_put_settings))
        .route("/api/v1/user/settings", delete(user::handle_delete_settings))
        .with_state(state)
}
