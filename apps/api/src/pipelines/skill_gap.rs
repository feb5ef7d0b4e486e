//! Skill-Gap Analysis graph: extract_resume_skills → extract_jd_skills →
//! compare → end.
//!
//! No gate: a malformed resume or JD degrades extraction quality but never
//! aborts the graph. The comparison is synonym-aware through the model, with
//! code-side guards that keep its output inside the JD's skill set.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::{complete_json, ChatApi, LlmError};
use crate::pipelines::prompts::{
    JD_SKILLS_PROMPT_TEMPLATE, RESUME_SKILLS_PROMPT_TEMPLATE, SKILL_COMPARE_PROMPT_TEMPLATE,
    SKILL_COMPARE_SYSTEM, SKILL_EXTRACT_SYSTEM,
};
use crate::pipelines::TaskResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub skill: String,
    pub reason: String,
}

/// Final report of the skill-gap graph. `recommended` is ordered most
/// important first.
#[derive(Debug, Clone, Serialize)]
pub struct SkillGapReport {
    pub resume_skills: Vec<String>,
    pub jd_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommended: Vec<Recommendation>,
    pub match_score: i32,
}

#[derive(Debug, Default, Deserialize)]
struct RawSkills {
    #[serde(default)]
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawComparison {
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    recommended: Vec<Recommendation>,
    #[serde(default)]
    match_score: f64,
}

/// Extracts a skill list. Unparseable output is recoverable here — the
/// graph continues with an empty list rather than aborting.
async fn extract_skills_node(
    llm: &dyn ChatApi,
    template: &str,
    placeholder: &str,
    text: &str,
) -> Result<Vec<String>, LlmError> {
    let prompt = template.replace(placeholder, text);
    match complete_json::<RawSkills>(llm, &prompt, SKILL_EXTRACT_SYSTEM, 0.0).await {
        Ok(raw) => Ok(dedupe_case_insensitive(raw.skills)),
        Err(LlmError::Parse(e)) => {
            warn!("skill extraction produced unparseable output, continuing empty: {e}");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

async fn compare_node(
    llm: &dyn ChatApi,
    resume_skills: &[String],
    jd_skills: &[String],
) -> Result<(Vec<String>, Vec<Recommendation>, i32), LlmError> {
    let prompt = SKILL_COMPARE_PROMPT_TEMPLATE
        .replace(
            "{resume_skills}",
            &serde_json::to_string(resume_skills).unwrap_or_default(),
        )
        .replace(
            "{jd_skills}",
            &serde_json::to_string(jd_skills).unwrap_or_default(),
        );
    let raw: RawComparison = complete_json(llm, &prompt, SKILL_COMPARE_SYSTEM, 0.0).await?;

    // Guards against model drift: a "missing" skill must come from the JD
    // list and must not literally appear among the candidate's skills.
    // Synonym equivalence stays the model's call.
    let resume_lower: Vec<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();
    let jd_lower: Vec<String> = jd_skills.iter().map(|s| s.to_lowercase()).collect();
    let missing: Vec<String> = dedupe_case_insensitive(raw.missing_skills)
        .into_iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            (jd_skills.is_empty() || jd_lower.contains(&lower)) && !resume_lower.contains(&lower)
        })
        .collect();

    Ok((
        missing,
        raw.recommended,
        (raw.match_score as i32).clamp(0, 100),
    ))
}

pub async fn run(
    llm: &dyn ChatApi,
    resume_text: &str,
    jd_text: &str,
) -> Result<TaskResult, LlmError> {
    let resume_skills =
        extract_skills_node(llm, RESUME_SKILLS_PROMPT_TEMPLATE, "{resume_text}", resume_text)
            .await?;
    let jd_skills =
        extract_skills_node(llm, JD_SKILLS_PROMPT_TEMPLATE, "{jd_text}", jd_text).await?;

    let (missing_skills, recommended, match_score) =
        compare_node(llm, &resume_skills, &jd_skills).await?;

    Ok(TaskResult::SkillGap(SkillGapReport {
        resume_skills,
        jd_skills,
        missing_skills,
        recommended,
        match_score,
    }))
}

fn dedupe_case_insensitive(skills: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for skill in skills {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if !seen.contains(&lower) {
            seen.push(lower);
            out.push(trimmed.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::testing::ScriptedChat;

    #[test]
    fn test_dedupe_keeps_first_casing() {
        let skills = vec![
            "PostgreSQL".to_string(),
            "postgresql".to_string(),
            " Rust ".to_string(),
            "rust".to_string(),
            "".to_string(),
        ];
        assert_eq!(dedupe_case_insensitive(skills), vec!["PostgreSQL", "Rust"]);
    }

    #[tokio::test]
    async fn test_missing_skill_claimed_outside_jd_is_dropped() {
        let chat = ScriptedChat::new([
            r#"{"skills": ["Rust"]}"#,
            r#"{"skills": ["Rust", "Go"]}"#,
            // "Haskell" is not in the JD, "Rust" is already covered — only
            // "Go" may survive.
            r#"{"missing_skills": ["Go", "Haskell", "Rust"],
                "recommended": [{"skill": "Go", "reason": "Needed daily."}],
                "match_score": 50}"#,
        ]);
        let result = run(chat.as_ref(), "resume", "jd").await.unwrap();
        match result {
            TaskResult::SkillGap(report) => {
                assert_eq!(report.missing_skills, vec!["Go"]);
            }
            other => panic!("expected skill gap report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_extraction_degrades_but_does_not_abort() {
        let chat = ScriptedChat::new([
            "sorry, I can't list skills for this text",
            r#"{"skills": ["Rust", "Go"]}"#,
            r#"{"missing_skills": ["Rust", "Go"],
                "recommended": [{"skill": "Rust", "reason": "Core language."}],
                "match_score": 0}"#,
        ]);
        let result = run(chat.as_ref(), "garbled ocr text", "jd").await.unwrap();
        match result {
            TaskResult::SkillGap(report) => {
                assert!(report.resume_skills.is_empty());
                assert_eq!(report.missing_skills, vec!["Rust", "Go"]);
            }
            other => panic!("expected skill gap report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_match_score_is_clamped() {
        let chat = ScriptedChat::new([
            r#"{"skills": ["Rust"]}"#,
            r#"{"skills": ["Rust"]}"#,
            r#"{"missing_skills": [], "recommended": [], "match_score": 250}"#,
        ]);
        let result = run(chat.as_ref(), "resume", "jd").await.unwrap();
        match result {
            TaskResult::SkillGap(report) => assert_eq!(report.match_score, 100),
            other => panic!("expected skill gap report, got {other:?}"),
        }
    }
}
