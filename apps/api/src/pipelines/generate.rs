//! Resume Generation graph: validate_input_profile → draft_sections → end.
//!
//! The input gate rejects near-empty or off-topic profile text before any
//! drafting happens. The drafted resume is re-run through the validation
//! classifier as a non-fatal output check — the success path always returns
//! a resume, even when that check flags weakness.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::{complete_json, ChatApi, LlmError};
use crate::models::resume::GeneratedResume;
use crate::models::validation::ValidationResult;
use crate::pipelines::prompts::{
    GENERATE_PROMPT_TEMPLATE, GENERATE_SYSTEM, PROFILE_GATE_PROMPT_TEMPLATE, PROFILE_GATE_SYSTEM,
};
use crate::pipelines::validation::validate_or_failed;
use crate::pipelines::{Rejection, TaskResult};

/// Profiles shorter than this cannot carry enough substance to draft from.
pub const MIN_PROFILE_CHARS: usize = 40;

/// Final output of both generation graphs.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeDraft {
    pub resume: GeneratedResume,
    /// Validation classifier re-run over the drafted resume. Absent when the
    /// classifier itself failed — never a reason to withhold the draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_validation: Option<ValidationResult>,
}

#[derive(Debug, Deserialize)]
struct RawGate {
    #[serde(default)]
    is_profile: bool,
    #[serde(default)]
    reason: String,
}

enum ProfileGate {
    Substantive,
    Rejected(Rejection),
}

async fn validate_input_profile(
    llm: &dyn ChatApi,
    profile_text: &str,
) -> Result<ProfileGate, LlmError> {
    if profile_text.trim().chars().count() < MIN_PROFILE_CHARS {
        return Ok(ProfileGate::Rejected(Rejection::insufficient_input()));
    }

    let prompt = PROFILE_GATE_PROMPT_TEMPLATE.replace("{profile_text}", profile_text);
    let gate: RawGate = complete_json(llm, &prompt, PROFILE_GATE_SYSTEM, 0.0).await?;
    if !gate.is_profile {
        let message = if gate.reason.is_empty() {
            "The provided text does not describe a professional background.".to_string()
        } else {
            gate.reason
        };
        return Ok(ProfileGate::Rejected(Rejection::not_a_resume(message, None)));
    }
    Ok(ProfileGate::Substantive)
}

/// Drafts the structured resume and attaches the output validation check.
pub async fn draft_sections(
    llm: &dyn ChatApi,
    prompt: &str,
    system: &str,
) -> Result<ResumeDraft, LlmError> {
    let resume: GeneratedResume = complete_json(llm, prompt, system, 0.7).await?;
    let resume = resume.pruned();

    let validation =
        validate_or_failed(llm, "generated_resume", "json", &resume.to_plain_text(), None).await;
    let output_validation = if validation.error.is_some() {
        warn!("output validation errored; draft returned without it");
        None
    } else {
        Some(validation)
    };

    Ok(ResumeDraft {
        resume,
        output_validation,
    })
}

pub async fn run(llm: &dyn ChatApi, profile_text: &str) -> Result<TaskResult, LlmError> {
    match validate_input_profile(llm, profile_text).await? {
        ProfileGate::Rejected(rejection) => Ok(TaskResult::Rejected(rejection)),
        ProfileGate::Substantive => {
            let prompt = GENERATE_PROMPT_TEMPLATE.replace("{profile_text}", profile_text);
            let draft = draft_sections(llm, &prompt, GENERATE_SYSTEM).await?;
            Ok(TaskResult::Resume(draft))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::testing::{ScriptedChat, VALID_RESUME_VALIDATION};
    use crate::pipelines::RejectionReason;

    const PROFILE: &str = "Staff engineer with nine years building payment \
        infrastructure in Rust and Go, leading a team of five.";

    const DRAFT: &str = r#"{
        "contact": {"name": "Sam Chen", "email": ""},
        "summary": "Staff engineer focused on payments infrastructure.",
        "skills": ["Rust", "Go", "Payments"],
        "experience": [
            {"title": "Staff Engineer", "company": "Payco", "period": "2017 - 2026",
             "bullets": ["Led a team of 5 building settlement systems."]}
        ],
        "education": []
    }"#;

    #[tokio::test]
    async fn test_near_empty_profile_is_rejected_without_llm_call() {
        let chat = ScriptedChat::new([]);
        let result = run(chat.as_ref(), "a short bio").await.unwrap();
        match result {
            TaskResult::Rejected(rejection) => {
                assert_eq!(rejection.error, RejectionReason::InsufficientInput)
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_off_topic_text_is_rejected_as_not_a_resume() {
        let chat = ScriptedChat::new([
            r#"{"is_profile": false, "reason": "The text is a cookie recipe."}"#,
        ]);
        let result = run(
            chat.as_ref(),
            "Cream the butter and sugar, then fold in the flour and chocolate chips.",
        )
        .await
        .unwrap();
        match result {
            TaskResult::Rejected(rejection) => {
                assert_eq!(rejection.error, RejectionReason::NotAResume);
                assert!(rejection.message.contains("recipe"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_draft_is_pruned_and_output_validated() {
        let chat = ScriptedChat::new([
            r#"{"is_profile": true, "reason": "Professional background."}"#,
            DRAFT,
            VALID_RESUME_VALIDATION,
        ]);
        let result = run(chat.as_ref(), PROFILE).await.unwrap();
        match result {
            TaskResult::Resume(draft) => {
                let contact = draft.resume.contact.expect("contact present");
                assert_eq!(contact.name.as_deref(), Some("Sam Chen"));
                assert!(contact.email.is_none(), "empty placeholder pruned");
                let validation = draft.output_validation.expect("output check attached");
                assert!(validation.is_resume);
            }
            other => panic!("expected resume draft, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_output_validation_does_not_block_the_draft() {
        // Script ends after the draft: the output-validation call errors.
        let chat = ScriptedChat::new([r#"{"is_profile": true, "reason": ""}"#, DRAFT]);
        let result = run(chat.as_ref(), PROFILE).await.unwrap();
        match result {
            TaskResult::Resume(draft) => {
                assert!(draft.output_validation.is_none());
                assert!(draft.resume.summary.is_some());
            }
            other => panic!("expected resume draft, got {other:?}"),
        }
    }
}
