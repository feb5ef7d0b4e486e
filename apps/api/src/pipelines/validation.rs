//! Shared resume-validation agent.
//!
//! Used as the gate node of the quality and screening graphs and re-run over
//! generated resumes as a non-fatal output check. The model's numeric claims
//! are never trusted: sub-scores are clamped, the total is recomputed, and
//! the classification band is derived in code.

use serde::Deserialize;
use tracing::warn;

use crate::llm::{complete_json, ChatApi, LlmError};
use crate::models::validation::{SubScores, ValidationResult};
use crate::pipelines::prompts::{VALIDATION_PROMPT_TEMPLATE, VALIDATION_SYSTEM};

/// Raw model output, before any field is trusted. Scores arrive as floats
/// because models occasionally emit `4.0` for an integer criterion.
#[derive(Debug, Deserialize)]
struct RawValidation {
    #[serde(default = "default_true")]
    is_resume: bool,
    #[serde(default)]
    scores: RawScores,
    #[serde(default)]
    missing_fields: Vec<String>,
    #[serde(default)]
    top_issues: Vec<String>,
    #[serde(default)]
    suggested_improvements: Vec<String>,
    #[serde(default)]
    summary: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct RawScores {
    #[serde(default)]
    document_type_validity: f64,
    #[serde(default)]
    completeness: f64,
    #[serde(default)]
    structure_readability: f64,
    #[serde(default)]
    achievement_quality: f64,
    #[serde(default)]
    credibility_consistency: f64,
    #[serde(default)]
    ats_friendliness: f64,
}

impl RawScores {
    fn into_subscores(self) -> SubScores {
        SubScores {
            document_type_validity: self.document_type_validity as i32,
            completeness: self.completeness as i32,
            structure_readability: self.structure_readability as i32,
            achievement_quality: self.achievement_quality as i32,
            credibility_consistency: self.credibility_consistency as i32,
            ats_friendliness: self.ats_friendliness as i32,
        }
    }
}

/// Runs the validation classifier over extracted document text.
///
/// Errors (transport or unparseable output) are returned to the caller —
/// a gating node ends its pipeline on them, a non-fatal check downgrades
/// them to a warning via [`validate_or_failed`].
pub async fn validate_document(
    llm: &dyn ChatApi,
    file_name: &str,
    file_type: &str,
    extracted_text: &str,
    target_role: Option<&str>,
) -> Result<ValidationResult, LlmError> {
    let prompt = VALIDATION_PROMPT_TEMPLATE
        .replace("{file_name}", file_name)
        .replace("{file_type}", file_type)
        .replace("{target_role}", target_role.unwrap_or("Not specified"))
        .replace("{extracted_text}", extracted_text);

    let raw: RawValidation = complete_json(llm, &prompt, VALIDATION_SYSTEM, 0.0).await?;

    Ok(ValidationResult::from_scores(
        raw.is_resume,
        raw.scores.into_subscores(),
        raw.missing_fields,
        raw.top_issues,
        raw.suggested_improvements,
        raw.summary,
    ))
}

/// Non-fatal variant: an agent failure becomes an errored report instead of
/// propagating, so callers attaching validation as a warning never abort.
pub async fn validate_or_failed(
    llm: &dyn ChatApi,
    file_name: &str,
    file_type: &str,
    extracted_text: &str,
    target_role: Option<&str>,
) -> ValidationResult {
    match validate_document(llm, file_name, file_type, extracted_text, target_role).await {
        Ok(result) => result,
        Err(e) => {
            warn!("validation agent failed (non-fatal): {e}");
            ValidationResult::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation::Classification;
    use crate::pipelines::testing::ScriptedChat;

    #[tokio::test]
    async fn test_scores_are_clamped_and_total_recomputed() {
        // Model claims out-of-range sub-scores; clamping must correct them
        // and the band must follow the recomputed total (5+5+0+2+3+1 = 16).
        let chat = ScriptedChat::new([r#"{
            "is_resume": true,
            "scores": {
                "document_type_validity": 9,
                "completeness": 5,
                "structure_readability": -2,
                "achievement_quality": 2,
                "credibility_consistency": 3,
                "ats_friendliness": 1
            },
            "missing_fields": [],
            "top_issues": [],
            "suggested_improvements": [],
            "summary": "ok"
        }"#]);
        let result = validate_document(chat.as_ref(), "cv.pdf", "pdf", "text", None)
            .await
            .unwrap();
        assert_eq!(result.scores.document_type_validity, 5);
        assert_eq!(result.scores.structure_readability, 0);
        assert_eq!(result.total_score, 16);
        assert_eq!(result.classification, Classification::ResumeValidButWeak);
    }

    #[tokio::test]
    async fn test_not_resume_wins_regardless_of_scores() {
        let chat = ScriptedChat::new([
            r#"{"is_resume": false, "scores": {"document_type_validity": 5, "completeness": 5,
                "structure_readability": 5, "achievement_quality": 5,
                "credibility_consistency": 5, "ats_friendliness": 5}}"#,
        ]);
        let result = validate_document(chat.as_ref(), "note.txt", "txt", "buy milk", None)
            .await
            .unwrap();
        assert_eq!(result.classification, Classification::NotResume);
    }

    #[tokio::test]
    async fn test_fenced_output_is_sanitized() {
        let chat = ScriptedChat::new([
            "```json\n{\"is_resume\": true, \"scores\": {\"document_type_validity\": 5, \"completeness\": 5, \"structure_readability\": 4, \"achievement_quality\": 4, \"credibility_consistency\": 4, \"ats_friendliness\": 4}}\n```",
        ]);
        let result = validate_document(chat.as_ref(), "cv.pdf", "pdf", "text", Some("SRE"))
            .await
            .unwrap();
        assert_eq!(result.total_score, 26);
        assert_eq!(result.classification, Classification::ResumeValidStrong);
    }

    #[tokio::test]
    async fn test_gating_caller_sees_error() {
        // Empty script: the call itself fails.
        let chat = ScriptedChat::new([]);
        let err = validate_document(chat.as_ref(), "cv.pdf", "pdf", "text", None).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_non_fatal_variant_returns_errored_report() {
        let chat = ScriptedChat::new([]);
        let result = validate_or_failed(chat.as_ref(), "cv.pdf", "pdf", "text", None).await;
        assert!(result.error.is_some());
        assert_eq!(result.total_score, 0);
    }
}
