//! Pipeline orchestrator — the single entry point the route layer calls.
//!
//! Five task-specific graphs run over their own state; the orchestrator only
//! parses the task, applies the shared empty-input short-circuit, resolves
//! the chat client, and contains failures. `run_pipeline` never panics and
//! never returns an Err: malformed input and node failures all come back as
//! a structured `TaskResult`.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::llm::factory::{ClientFactory, RequestConfig};
use crate::llm::LlmError;
use crate::models::validation::ValidationResult;

pub mod generate;
pub mod linkedin;
pub mod prompts;
pub mod quality;
pub mod screening;
pub mod skill_gap;
pub mod validation;

/// The closed set of pipeline tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineTask {
    Quality,
    SkillGap,
    Screen,
    Generate,
    LinkedinConvert,
}

impl FromStr for PipelineTask {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quality" => Ok(PipelineTask::Quality),
            "skill_gap" => Ok(PipelineTask::SkillGap),
            "screen" => Ok(PipelineTask::Screen),
            "generate" => Ok(PipelineTask::Generate),
            "linkedin_convert" => Ok(PipelineTask::LinkedinConvert),
            _ => Err(()),
        }
    }
}

/// Task-specific inputs. Each graph reads the fields it needs; the
/// orchestrator checks the ones that are required.
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub resume_text: Option<String>,
    pub jd_text: Option<String>,
    pub profile_text: Option<String>,
    pub target_role: Option<String>,
    pub file_name: Option<String>,
    pub threshold: Option<i32>,
}

/// Why a gate ended the pipeline early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NotAResume,
    InsufficientInput,
}

/// Structured early-exit result, distinguishable from both success and a
/// generic error. The route layer maps this to a 422-style response.
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    pub error: RejectionReason,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

impl Rejection {
    pub fn insufficient_input() -> Self {
        Rejection {
            error: RejectionReason::InsufficientInput,
            message: "The provided text is empty or too short to analyze.".to_string(),
            validation: None,
        }
    }

    pub fn not_a_resume(message: impl Into<String>, validation: Option<ValidationResult>) -> Self {
        Rejection {
            error: RejectionReason::NotAResume,
            message: message.into(),
            validation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Everything `run_pipeline` can return. Serialized as the inner value.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TaskResult {
    Quality(quality::QualityReport),
    SkillGap(skill_gap::SkillGapReport),
    Screen(screening::ScreenReport),
    Resume(generate::ResumeDraft),
    Rejected(Rejection),
    Error(ErrorBody),
}

impl TaskResult {
    pub fn error(message: impl Into<String>) -> Self {
        TaskResult::Error(ErrorBody {
            error: message.into(),
        })
    }
}

/// Dispatch table over the compiled graphs. Built once at startup and shared
/// across concurrent invocations; each invocation owns its own state.
pub struct Orchestrator {
    factory: Arc<dyn ClientFactory>,
}

impl Orchestrator {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self { factory }
    }

    /// Runs one pipeline invocation to completion.
    pub async fn run_pipeline(
        &self,
        task: &str,
        inputs: PipelineInputs,
        config: &RequestConfig,
    ) -> TaskResult {
        let parsed = match PipelineTask::from_str(task) {
            Ok(parsed) => parsed,
            Err(()) => return TaskResult::error(format!("unknown task: {task}")),
        };

        match self.dispatch(parsed, inputs, config).await {
            Ok(result) => result,
            Err(e) => {
                error!("pipeline {task} failed: {e}");
                TaskResult::error(e.to_string())
            }
        }
    }

    async fn dispatch(
        &self,
        task: PipelineTask,
        inputs: PipelineInputs,
        config: &RequestConfig,
    ) -> Result<TaskResult, LlmError> {
        // Shared edge-case policy: a missing or whitespace-only primary
        // input never reaches the LLM.
        let primary = match task {
            PipelineTask::Quality | PipelineTask::SkillGap | PipelineTask::Screen => {
                inputs.resume_text.as_deref()
            }
            PipelineTask::Generate | PipelineTask::LinkedinConvert => {
                inputs.profile_text.as_deref()
            }
        };
        if primary.map_or(true, |t| t.trim().is_empty()) {
            return Ok(TaskResult::Rejected(Rejection::insufficient_input()));
        }

        let llm = self.factory.resolve(config)?;
        let file_name = inputs.file_name.as_deref().unwrap_or("pasted_text");

        match task {
            PipelineTask::Quality => {
                quality::run(
                    llm.as_ref(),
                    inputs.resume_text.as_deref().unwrap_or_default(),
                    inputs.target_role.as_deref(),
                    file_name,
                )
                .await
            }
            PipelineTask::SkillGap => {
                let Some(jd_text) = inputs.jd_text.as_deref().filter(|t| !t.trim().is_empty())
                else {
                    return Ok(TaskResult::error("jd_text is required for skill_gap"));
                };
                skill_gap::run(
                    llm.as_ref(),
                    inputs.resume_text.as_deref().unwrap_or_default(),
                    jd_text,
                )
                .await
            }
            PipelineTask::Screen => {
                let Some(jd_text) = inputs.jd_text.as_deref().filter(|t| !t.trim().is_empty())
                else {
                    return Ok(TaskResult::error("jd_text is required for screen"));
                };
                screening::run(
                    llm.as_ref(),
                    inputs.resume_text.as_deref().unwrap_or_default(),
                    jd_text,
                    inputs.threshold.unwrap_or(screening::DEFAULT_THRESHOLD),
                    file_name,
                )
                .await
            }
            PipelineTask::Generate => {
                generate::run(
                    llm.as_ref(),
                    inputs.profile_text.as_deref().unwrap_or_default(),
                )
                .await
            }
            PipelineTask::LinkedinConvert => {
                linkedin::run(
                    llm.as_ref(),
                    inputs.profile_text.as_deref().unwrap_or_default(),
                )
                .await
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted chat clients shared by the graph and orchestrator tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::llm::factory::{ClientFactory, RequestConfig};
    use crate::llm::{ChatApi, LlmError};

    /// Replays a fixed sequence of responses; errors if a node asks for more
    /// than the script contains.
    pub struct ScriptedChat {
        responses: Mutex<VecDeque<String>>,
    }

    impl ScriptedChat {
        pub fn new<const N: usize>(responses: [&str; N]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            })
        }

        pub fn remaining(&self) -> usize {
            self.responses.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatApi for ScriptedChat {
        async fn complete(
            &self,
            _prompt: &str,
            _system: &str,
            _temperature: f32,
        ) -> Result<String, LlmError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(LlmError::EmptyContent)
        }
    }

    /// Factory that hands out one scripted client and records whether it was
    /// ever asked to.
    pub struct ScriptedFactory {
        chat: Arc<ScriptedChat>,
        pub resolved: AtomicBool,
    }

    impl ScriptedFactory {
        pub fn new(chat: Arc<ScriptedChat>) -> Arc<Self> {
            Arc::new(Self {
                chat,
                resolved: AtomicBool::new(false),
            })
        }

        pub fn was_resolved(&self) -> bool {
            self.resolved.load(Ordering::SeqCst)
        }
    }

    impl ClientFactory for ScriptedFactory {
        fn resolve(&self, _config: &RequestConfig) -> Result<Arc<dyn ChatApi>, LlmError> {
            self.resolved.store(true, Ordering::SeqCst);
            Ok(self.chat.clone())
        }
    }

    pub const VALID_RESUME_VALIDATION: &str = r#"{
        "is_resume": true,
        "scores": {
            "document_type_validity": 5, "completeness": 4,
            "structure_readability": 4, "achievement_quality": 4,
            "credibility_consistency": 4, "ats_friendliness": 4
        },
        "missing_fields": [], "top_issues": [],
        "suggested_improvements": [], "summary": "Solid resume."
    }"#;

    pub const NOT_RESUME_VALIDATION: &str = r#"{
        "is_resume": false,
        "scores": {
            "document_type_validity": 0, "completeness": 0,
            "structure_readability": 0, "achievement_quality": 0,
            "credibility_consistency": 0, "ats_friendliness": 0
        },
        "missing_fields": ["name", "email", "experience"],
        "top_issues": ["The text is not a resume."],
        "suggested_improvements": [], "summary": "Not a resume."
    }"#;
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::pipelines::screening::Decision;

    fn orchestrator(chat: std::sync::Arc<ScriptedChat>) -> (Orchestrator, Arc<ScriptedFactory>) {
        let factory = ScriptedFactory::new(chat);
        (Orchestrator::new(factory.clone()), factory)
    }

    fn resume_inputs(resume: &str) -> PipelineInputs {
        PipelineInputs {
            resume_text: Some(resume.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unknown_task_returns_error_without_panicking() {
        let (orch, factory) = orchestrator(ScriptedChat::new([]));
        let result = orch
            .run_pipeline("bogus", PipelineInputs::default(), &RequestConfig::default())
            .await;
        match result {
            TaskResult::Error(body) => assert!(body.error.contains("bogus")),
            other => panic!("expected error result, got {other:?}"),
        }
        assert!(!factory.was_resolved(), "no client for an unknown task");
    }

    #[tokio::test]
    async fn test_empty_primary_input_short_circuits_before_any_llm_call() {
        let (orch, factory) = orchestrator(ScriptedChat::new([]));
        let result = orch
            .run_pipeline("quality", resume_inputs("   \n\t "), &RequestConfig::default())
            .await;
        match result {
            TaskResult::Rejected(rejection) => {
                assert_eq!(rejection.error, RejectionReason::InsufficientInput)
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(!factory.was_resolved(), "short-circuit must precede resolve");
    }

    #[tokio::test]
    async fn test_quality_gate_rejects_non_resume_without_scoring() {
        // Script holds only the validation reply: a scoring call would fail.
        let chat = ScriptedChat::new([NOT_RESUME_VALIDATION]);
        let (orch, _) = orchestrator(chat.clone());
        let result = orch
            .run_pipeline(
                "quality",
                resume_inputs("grocery list: milk, eggs, bread"),
                &RequestConfig::default(),
            )
            .await;
        match result {
            TaskResult::Rejected(rejection) => {
                assert_eq!(rejection.error, RejectionReason::NotAResume);
                let validation = rejection.validation.expect("gate attaches its report");
                assert!(!validation.is_resume);
                assert_eq!(validation.total_score, 0);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(chat.remaining(), 0, "exactly one LLM call (the gate)");
    }

    #[tokio::test]
    async fn test_quality_scores_valid_resume() {
        let chat = ScriptedChat::new([
            VALID_RESUME_VALIDATION,
            r#"{"overall_score": 81, "section_scores": [
                {"section": "experience", "score": 8, "feedback": "Strong roles."}],
                "strengths": ["Clear impact"], "improvements": ["Add metrics"],
                "summary": "Good resume."}"#,
        ]);
        let (orch, _) = orchestrator(chat);
        let result = orch
            .run_pipeline(
                "quality",
                resume_inputs("Jane Doe\njane@example.com\nExperience: ..."),
                &RequestConfig::default(),
            )
            .await;
        match result {
            TaskResult::Quality(report) => {
                assert_eq!(report.score.overall, 81);
                assert!(report.validation_warning.is_none());
            }
            other => panic!("expected quality report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_skill_gap_returns_missing_skills_set() {
        // Resume covers rust, sql, docker; JD wants five, two overlap.
        let chat = ScriptedChat::new([
            r#"{"skills": ["Rust", "SQL", "Docker"]}"#,
            r#"{"skills": ["Rust", "SQL", "Kubernetes", "Terraform", "Go"]}"#,
            r#"{"missing_skills": ["Kubernetes", "Terraform", "Go"],
                "recommended": [
                    {"skill": "Kubernetes", "reason": "Core to the role's deployment work."},
                    {"skill": "Go", "reason": "Primary service language."},
                    {"skill": "Terraform", "reason": "Used for all infrastructure."}],
                "match_score": 40}"#,
        ]);
        let (orch, _) = orchestrator(chat);
        let result = orch
            .run_pipeline(
                "skill_gap",
                PipelineInputs {
                    resume_text: Some("resume with skills".to_string()),
                    jd_text: Some("jd with requirements".to_string()),
                    ..Default::default()
                },
                &RequestConfig::default(),
            )
            .await;
        match result {
            TaskResult::SkillGap(report) => {
                let mut missing = report.missing_skills.clone();
                missing.sort();
                assert_eq!(missing, vec!["Go", "Kubernetes", "Terraform"]);
                assert!(!report.recommended.is_empty());
                assert_eq!(report.match_score, 40);
            }
            other => panic!("expected skill gap report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_skill_gap_without_jd_is_an_error_result() {
        let (orch, _) = orchestrator(ScriptedChat::new([]));
        let result = orch
            .run_pipeline(
                "skill_gap",
                resume_inputs("a perfectly fine resume"),
                &RequestConfig::default(),
            )
            .await;
        assert!(matches!(result, TaskResult::Error(_)));
    }

    #[tokio::test]
    async fn test_screen_at_exact_threshold_passes() {
        let chat = ScriptedChat::new([
            VALID_RESUME_VALIDATION,
            r#"{"fit_score": 75, "rationale": "Meets the bar."}"#,
        ]);
        let (orch, _) = orchestrator(chat);
        let result = orch
            .run_pipeline(
                "screen",
                PipelineInputs {
                    resume_text: Some("resume".to_string()),
                    jd_text: Some("jd".to_string()),
                    threshold: Some(75),
                    ..Default::default()
                },
                &RequestConfig::default(),
            )
            .await;
        match result {
            TaskResult::Screen(report) => {
                assert_eq!(report.decision, Decision::Pass);
                assert_eq!(report.fit_score, 75);
            }
            other => panic!("expected screen report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_node_failure_becomes_error_result() {
        // Empty script: the first node's call fails, and the orchestrator
        // must contain it.
        let (orch, _) = orchestrator(ScriptedChat::new([]));
        let result = orch
            .run_pipeline("quality", resume_inputs("some resume"), &RequestConfig::default())
            .await;
        assert!(matches!(result, TaskResult::Error(_)));
    }
}
