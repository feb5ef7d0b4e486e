//! Auto-Screening graph: validate → compare_to_threshold → decide → end.
//!
//! The model supplies the fit score and rationale; the decision itself is
//! computed in code so the threshold can never be misapplied by the model.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{complete_json, ChatApi, LlmError};
use crate::models::validation::{Classification, ValidationResult};
use crate::pipelines::prompts::{SCREENING_PROMPT_TEMPLATE, SCREENING_SYSTEM};
use crate::pipelines::validation::validate_document;
use crate::pipelines::{Rejection, TaskResult};

/// Pass/fail boundary used when the caller does not supply one.
pub const DEFAULT_THRESHOLD: i32 = 75;
/// Scores this close below the threshold go to human review instead of an
/// outright fail.
const REVIEW_MARGIN: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Pass,
    Fail,
    Review,
}

/// Final report of the screening graph.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    pub decision: Decision,
    pub fit_score: i32,
    pub rationale: String,
    pub threshold: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_warning: Option<ValidationResult>,
}

#[derive(Debug, Deserialize)]
struct RawFit {
    #[serde(default)]
    fit_score: f64,
    #[serde(default)]
    rationale: String,
}

/// The threshold boundary is inclusive: a score exactly at the threshold
/// passes.
fn decide(fit_score: i32, threshold: i32) -> Decision {
    if fit_score >= threshold {
        Decision::Pass
    } else if fit_score >= threshold - REVIEW_MARGIN {
        Decision::Review
    } else {
        Decision::Fail
    }
}

async fn compare_node(
    llm: &dyn ChatApi,
    resume_text: &str,
    jd_text: &str,
) -> Result<(i32, String), LlmError> {
    let prompt = SCREENING_PROMPT_TEMPLATE
        .replace("{jd_text}", jd_text)
        .replace("{resume_text}", resume_text);
    let raw: RawFit = complete_json(llm, &prompt, SCREENING_SYSTEM, 0.0).await?;
    Ok(((raw.fit_score as i32).clamp(0, 100), raw.rationale))
}

pub async fn run(
    llm: &dyn ChatApi,
    resume_text: &str,
    jd_text: &str,
    threshold: i32,
    file_name: &str,
) -> Result<TaskResult, LlmError> {
    let validation = validate_document(llm, file_name, "txt", resume_text, None).await?;
    if validation.classification == Classification::NotResume {
        return Ok(TaskResult::Rejected(Rejection::not_a_resume(
            "The provided text does not appear to be a resume.",
            Some(validation),
        )));
    }
    let validation_warning = validation.classification.is_warning().then_some(validation);

    let (fit_score, rationale) = compare_node(llm, resume_text, jd_text).await?;
    let decision = decide(fit_score, threshold);
    debug!("screening: score={fit_score} threshold={threshold} -> {decision:?}");

    Ok(TaskResult::Screen(ScreenReport {
        decision,
        fit_score,
        rationale,
        threshold,
        validation_warning,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::testing::{ScriptedChat, NOT_RESUME_VALIDATION, VALID_RESUME_VALIDATION};
    use crate::pipelines::RejectionReason;

    #[test]
    fn test_decide_at_threshold_is_pass() {
        assert_eq!(decide(75, 75), Decision::Pass);
    }

    #[test]
    fn test_decide_above_threshold_is_pass() {
        assert_eq!(decide(99, 75), Decision::Pass);
    }

    #[test]
    fn test_decide_just_below_threshold_is_review() {
        assert_eq!(decide(74, 75), Decision::Review);
        assert_eq!(decide(70, 75), Decision::Review);
    }

    #[test]
    fn test_decide_well_below_threshold_is_fail() {
        assert_eq!(decide(69, 75), Decision::Fail);
        assert_eq!(decide(0, 75), Decision::Fail);
    }

    #[tokio::test]
    async fn test_gate_rejects_non_resume_before_fit_scoring() {
        let chat = ScriptedChat::new([NOT_RESUME_VALIDATION]);
        let result = run(chat.as_ref(), "lorem ipsum", "jd", 75, "cv.txt")
            .await
            .unwrap();
        match result {
            TaskResult::Rejected(rejection) => {
                assert_eq!(rejection.error, RejectionReason::NotAResume)
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(chat.remaining(), 0);
    }

    #[tokio::test]
    async fn test_fit_score_is_clamped_and_decision_computed_in_code() {
        // The model claims an impossible score; the decision must come from
        // the clamped value, not the model's own verdict.
        let chat = ScriptedChat::new([
            VALID_RESUME_VALIDATION,
            r#"{"fit_score": 130, "rationale": "Perfect candidate."}"#,
        ]);
        let result = run(chat.as_ref(), "resume", "jd", 75, "cv.txt")
            .await
            .unwrap();
        match result {
            TaskResult::Screen(report) => {
                assert_eq!(report.fit_score, 100);
                assert_eq!(report.decision, Decision::Pass);
            }
            other => panic!("expected screen report, got {other:?}"),
        }
    }
}
