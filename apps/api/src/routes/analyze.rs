//! Analysis routes: quality scoring, skill-gap analysis, auto-screening.
//! Thin wrappers over `run_pipeline` that map gate rejections to 422 and
//! append to the activity log.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::models::activity::ActivityKind;
use crate::pipelines::{PipelineInputs, TaskResult};
use crate::routes::{pipeline_response, request_config, LlmHeaders, TenantId};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: Option<String>,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub threshold: Option<i32>,
}

impl AnalyzeRequest {
    fn into_inputs(self) -> PipelineInputs {
        PipelineInputs {
            resume_text: Some(self.resume_text),
            jd_text: self.jd_text,
            target_role: self.target_role,
            threshold: self.threshold,
            ..Default::default()
        }
    }
}

/// Fire-and-forget audit append: a log failure never fails the request.
async fn log_activity(
    state: &AppState,
    owner: &str,
    kind: ActivityKind,
    score: i32,
    decision: Option<&str>,
) {
    if let Err(e) = state
        .vectors
        .log_activity(owner, kind, "Manual Input", score, decision)
        .await
    {
        warn!("failed to log {} activity: {e}", kind.as_str());
    }
}

/// POST /api/v1/analyze/quality
pub async fn handle_quality(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<TaskResult>, AppError> {
    let config = request_config(&state, &owner.0, headers).await;
    let result = state
        .orchestrator
        .run_pipeline("quality", req.into_inputs(), &config)
        .await;

    if let TaskResult::Quality(report) = &result {
        log_activity(&state, &owner.0, ActivityKind::Quality, report.score.overall, None).await;
    }
    pipeline_response(result)
}

/// POST /api/v1/analyze/gap
pub async fn handle_gap(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<TaskResult>, AppError> {
    let config = request_config(&state, &owner.0, headers).await;
    let result = state
        .orchestrator
        .run_pipeline("skill_gap", req.into_inputs(), &config)
        .await;

    if let TaskResult::SkillGap(report) = &result {
        log_activity(&state, &owner.0, ActivityKind::SkillGap, report.match_score, None).await;
    }
    pipeline_response(result)
}

/// POST /api/v1/analyze/screen
pub async fn handle_screen(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<TaskResult>, AppError> {
    let config = request_config(&state, &owner.0, headers).await;
    let result = state
        .orchestrator
        .run_pipeline("screen", req.into_inputs(), &config)
        .await;

    if let TaskResult::Screen(report) = &result {
        let decision = match report.decision {
            crate::pipelines::screening::Decision::Pass => "SELECTED",
            crate::pipelines::screening::Decision::Fail => "REJECTED",
            crate::pipelines::screening::Decision::Review => "REVIEW",
        };
        log_activity(
            &state,
            &owner.0,
            ActivityKind::Screen,
            report.fit_score,
            Some(decision),
        )
        .await;
    }
    pipeline_response(result)
}
