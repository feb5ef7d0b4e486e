//! Quality Scoring graph: validate → score → end.
//!
//! The validation node is a hard gate — a document classified as not a
//! resume ends the graph with the validation report alone, and no scoring
//! call is made. Weak or incomplete classifications pass through as a
//! non-fatal warning on the final report.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{complete_json, ChatApi, LlmError};
use crate::models::validation::{Classification, ValidationResult};
use crate::pipelines::prompts::{QUALITY_PROMPT_TEMPLATE, QUALITY_SYSTEM};
use crate::pipelines::validation::validate_document;
use crate::pipelines::{Rejection, TaskResult};

const MAX_OVERALL: i32 = 100;
const MAX_SECTION: i32 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct OverallScore {
    pub overall: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionScore {
    pub section: String,
    pub score: i32,
    pub feedback: String,
}

/// Final report of the quality graph.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub score: OverallScore,
    pub section_scores: Vec<SectionScore>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub summary: String,
    /// Present when validation classified the resume as weak or incomplete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_warning: Option<ValidationResult>,
}

/// Where the graph stands after the validation gate.
enum GateOutcome {
    Rejected(ValidationResult),
    Passed { warning: Option<ValidationResult> },
}

#[derive(Debug, Deserialize)]
struct RawQuality {
    #[serde(default)]
    overall_score: f64,
    #[serde(default)]
    section_scores: Vec<RawSection>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    section: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    feedback: String,
}

async fn validate_node(
    llm: &dyn ChatApi,
    resume_text: &str,
    target_role: Option<&str>,
    file_name: &str,
) -> Result<GateOutcome, LlmError> {
    let validation = validate_document(llm, file_name, "txt", resume_text, target_role).await?;
    if validation.classification == Classification::NotResume {
        return Ok(GateOutcome::Rejected(validation));
    }
    let warning = validation.classification.is_warning().then_some(validation);
    Ok(GateOutcome::Passed { warning })
}

async fn score_node(
    llm: &dyn ChatApi,
    resume_text: &str,
    warning: Option<ValidationResult>,
) -> Result<QualityReport, LlmError> {
    let prompt = QUALITY_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    let raw: RawQuality = complete_json(llm, &prompt, QUALITY_SYSTEM, 0.0).await?;

    Ok(QualityReport {
        score: OverallScore {
            overall: (raw.overall_score as i32).clamp(0, MAX_OVERALL),
        },
        section_scores: raw
            .section_scores
            .into_iter()
            .map(|s| SectionScore {
                section: s.section,
                score: (s.score as i32).clamp(0, MAX_SECTION),
                feedback: s.feedback,
            })
            .collect(),
        strengths: raw.strengths,
        improvements: raw.improvements,
        summary: raw.summary,
        validation_warning: warning,
    })
}

pub async fn run(
    llm: &dyn ChatApi,
    resume_text: &str,
    target_role: Option<&str>,
    file_name: &str,
) -> Result<TaskResult, LlmError> {
    match validate_node(llm, resume_text, target_role, file_name).await? {
        GateOutcome::Rejected(validation) => {
            debug!("quality graph: gate rejected {file_name}");
            Ok(TaskResult::Rejected(Rejection::not_a_resume(
                "The provided text does not appear to be a resume.",
                Some(validation),
            )))
        }
        GateOutcome::Passed { warning } => {
            let report = score_node(llm, resume_text, warning).await?;
            Ok(TaskResult::Quality(report))
        }
    }
}
