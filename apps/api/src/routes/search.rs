//! Semantic search and matching routes: resume search with an LLM ranking
//! pass over the retrieved excerpts, job search, resume-to-jobs matching,
//! and job creation.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm::{complete_json, factory::ClientFactory};
use crate::models::job::{JobDefinition, JobFilters, JobMatch, NewJob};
use crate::routes::{embedding_key, request_config, LlmHeaders, TenantId};
use crate::state::AppState;

const SEARCH_LIMIT: usize = 10;

const SEARCH_RANK_SYSTEM: &str = "You identify which resumes match a search \
    query based on excerpts. You MUST respond with valid JSON only, no \
    markdown fences, no commentary.";

const SEARCH_RANK_PROMPT_TEMPLATE: &str = r#"Identify resumes relevant to the query based on the excerpts provided.

Excerpts:
{excerpts}

Query: {query}

Return ONLY valid JSON:
{"results": [
  {"filename": "...", "score": 0, "justification": "...", "missing_skills": [], "auto_screen": "..."}
]}"#;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// POST /api/v1/search — retrieve the tenant's best-matching chunks, then
/// let the model rank and justify the matching documents.
pub async fn handle_search(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Value>, AppError> {
    if req.query.trim().is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }

    let config = request_config(&state, &owner.0, headers).await;
    let api_key = embedding_key(&config);

    let matches = state
        .vectors
        .search_resumes(&owner.0, &req.query, SEARCH_LIMIT, api_key.as_deref())
        .await?;
    if matches.is_empty() {
        return Ok(Json(json!({ "results": [] })));
    }

    let excerpts: String = matches
        .iter()
        .map(|m| format!("Filename: {}\nExcerpt:\n{}\n--------------------\n", m.filename, m.excerpt))
        .collect();
    let prompt = SEARCH_RANK_PROMPT_TEMPLATE
        .replace("{excerpts}", &excerpts)
        .replace("{query}", &req.query);

    let llm = state
        .llm_factory
        .resolve(&config)
        .map_err(|e| AppError::Llm(e.to_string()))?;
    match complete_json::<Value>(llm.as_ref(), &prompt, SEARCH_RANK_SYSTEM, 0.0).await {
        Ok(ranked) => Ok(Json(ranked)),
        Err(e) => {
            warn!("search ranking failed: {e}");
            Ok(Json(json!({ "results": [], "error": e.to_string() })))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JobSearchParams {
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub job_level: Option<String>,
    #[serde(default)]
    pub job_category: Option<String>,
}

/// GET /api/v1/search/jobs
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<Vec<JobMatch>>, AppError> {
    let config = request_config(&state, &owner.0, headers).await;
    let filters = JobFilters {
        job_level: params.job_level,
        job_category: params.job_category,
    };
    let matches = state
        .vectors
        .search_jobs(
            &owner.0,
            &params.q,
            params.limit.unwrap_or(50),
            &filters,
            embedding_key(&config).as_deref(),
        )
        .await?;
    Ok(Json(matches))
}

#[derive(Debug, Deserialize)]
pub struct MatchParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /api/v1/match/resume/:id
pub async fn handle_match_resume(
    State(state): State<AppState>,
    owner: TenantId,
    Path(id): Path<Uuid>,
    Query(params): Query<MatchParams>,
) -> Result<Json<Vec<JobMatch>>, AppError> {
    let matches = state
        .vectors
        .match_resume_to_jobs(&owner.0, id, params.limit.unwrap_or(50))
        .await
        .map_err(|e| match e {
            crate::vector::RetrievalError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Retrieval(other),
        })?;
    Ok(Json(matches))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    Json(job): Json<NewJob>,
) -> Result<Json<JobDefinition>, AppError> {
    if job.title.trim().is_empty() || job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "title and description are required".to_string(),
        ));
    }
    let config = request_config(&state, &owner.0, headers).await;
    let stored = state
        .vectors
        .store_job(&owner.0, job, embedding_key(&config).as_deref())
        .await?;
    Ok(Json(stored))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    owner: TenantId,
) -> Result<Json<Vec<JobDefinition>>, AppError> {
    Ok(Json(state.vectors.list_jobs(&owner.0).await?))
}
