//! Profile-to-Resume conversion graph: normalize_profile_text →
//! draft_sections → end.
//!
//! Consumes pasted or scraped profile text. Scraped input is often partial
//! or garbled — a section the normalizer cannot recover is silently omitted
//! from the resume, never turned into a failure.

use tracing::{debug, warn};

use crate::llm::{complete_json, ChatApi, LlmError};
use crate::pipelines::generate::draft_sections;
use crate::pipelines::prompts::{
    PROFILE_PARSE_PROMPT_TEMPLATE, PROFILE_PARSE_SYSTEM, PROFILE_WRITE_PROMPT_TEMPLATE,
    PROFILE_WRITE_SYSTEM,
};
use crate::pipelines::TaskResult;

/// Extracts whatever structure the profile text supports. Unparseable model
/// output is recoverable: drafting falls back to the raw text.
async fn normalize_profile_text(
    llm: &dyn ChatApi,
    profile_text: &str,
) -> Result<serde_json::Value, LlmError> {
    let prompt = PROFILE_PARSE_PROMPT_TEMPLATE.replace("{profile_text}", profile_text);
    match complete_json::<serde_json::Value>(llm, &prompt, PROFILE_PARSE_SYSTEM, 0.0).await {
        Ok(parsed) => {
            let experience = parsed["experience"].as_array().map_or(0, Vec::len);
            let education = parsed["education"].as_array().map_or(0, Vec::len);
            let skills = parsed["skills"].as_array().map_or(0, Vec::len);
            debug!(
                "normalized profile: {experience} experience, {education} education, {skills} skills"
            );
            if experience == 0 && education == 0 && skills == 0 {
                warn!("normalizer extracted no sections; drafting from what remains");
            }
            Ok(parsed)
        }
        Err(LlmError::Parse(e)) => {
            warn!("profile normalization unparseable, drafting from raw text: {e}");
            Ok(serde_json::json!({ "raw_profile": profile_text }))
        }
        Err(e) => Err(e),
    }
}

pub async fn run(llm: &dyn ChatApi, profile_text: &str) -> Result<TaskResult, LlmError> {
    let normalized = normalize_profile_text(llm, profile_text).await?;
    let profile_json =
        serde_json::to_string_pretty(&normalized).unwrap_or_else(|_| profile_text.to_string());
    let prompt = PROFILE_WRITE_PROMPT_TEMPLATE.replace("{profile_json}", &profile_json);
    let draft = draft_sections(llm, &prompt, PROFILE_WRITE_SYSTEM).await?;
    Ok(TaskResult::Resume(draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::testing::{ScriptedChat, VALID_RESUME_VALIDATION};

    const PARSED_PROFILE: &str = r#"{
        "name": "Priya Nair",
        "headline": "Data engineer",
        "experience": [
            {"title": "Data Engineer", "company": "Gridly", "period": "2021 - Present",
             "description": "Built streaming ETL on Kafka and Spark."}
        ],
        "skills": ["Kafka", "Spark", "Python"],
        "education": []
    }"#;

    const WRITTEN_RESUME: &str = r#"{
        "contact": {"name": "Priya Nair"},
        "summary": "Data engineer specialising in streaming pipelines.",
        "skills": ["Kafka", "Spark", "Python"],
        "experience": [
            {"title": "Data Engineer", "company": "Gridly", "period": "2021 - Present",
             "bullets": ["Built streaming ETL handling Kafka and Spark workloads."]}
        ],
        "education": []
    }"#;

    #[tokio::test]
    async fn test_converts_profile_to_structured_resume() {
        let chat = ScriptedChat::new([PARSED_PROFILE, WRITTEN_RESUME, VALID_RESUME_VALIDATION]);
        let result = run(chat.as_ref(), "scraped profile text with sections")
            .await
            .unwrap();
        match result {
            TaskResult::Resume(draft) => {
                assert_eq!(
                    draft.resume.contact.unwrap().name.as_deref(),
                    Some("Priya Nair")
                );
                assert_eq!(draft.resume.skills.len(), 3);
                assert!(draft.resume.education.is_empty(), "missing section omitted");
            }
            other => panic!("expected resume draft, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbled_parse_falls_back_to_raw_text() {
        // Normalizer output is prose; the graph must still draft.
        let chat = ScriptedChat::new([
            "I cannot make sense of this profile.",
            WRITTEN_RESUME,
            VALID_RESUME_VALIDATION,
        ]);
        let result = run(chat.as_ref(), "half-scraped garbage ::: section???")
            .await
            .unwrap();
        assert!(matches!(result, TaskResult::Resume(_)));
    }

    #[tokio::test]
    async fn test_partial_profile_with_no_sections_still_drafts() {
        let chat = ScriptedChat::new([
            r#"{"name": "A", "experience": [], "education": [], "skills": []}"#,
            WRITTEN_RESUME,
            VALID_RESUME_VALIDATION,
        ]);
        let result = run(chat.as_ref(), "name only").await.unwrap();
        assert!(matches!(result, TaskResult::Resume(_)));
    }
}
