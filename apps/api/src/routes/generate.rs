//! Resume generation routes: free-text profile → resume, and pasted
//! profile text → resume.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::pipelines::{PipelineInputs, TaskResult};
use crate::routes::{pipeline_response, request_config, LlmHeaders, TenantId};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub profile: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkedinConvertRequest {
    pub profile_text: String,
}

/// POST /api/v1/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<TaskResult>, AppError> {
    let config = request_config(&state, &owner.0, headers).await;
    let inputs = PipelineInputs {
        profile_text: Some(req.profile),
        ..Default::default()
    };
    pipeline_response(state.orchestrator.run_pipeline("generate", inputs, &config).await)
}

/// POST /api/v1/linkedin/convert
pub async fn handle_linkedin_convert(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    Json(req): Json<LinkedinConvertRequest>,
) -> Result<Json<TaskResult>, AppError> {
    let config = request_config(&state, &owner.0, headers).await;
    let inputs = PipelineInputs {
        profile_text: Some(req.profile_text),
        ..Default::default()
    };
    pipeline_response(
        state
            .orchestrator
            .run_pipeline("linkedin_convert", inputs, &config)
            .await,
    )
}
