//! Resume validation report types and the score → classification rules.

use serde::{Deserialize, Serialize};

/// Lower bound for a single validation sub-score.
pub const SUBSCORE_MIN: i32 = 0;
/// Upper bound for a single validation sub-score.
pub const SUBSCORE_MAX: i32 = 5;

/// The five ordered quality bands a validated document can land in.
/// Ordering matters: a higher total score never maps to a lower band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    NotResume,
    ResumeInvalidOrIncomplete,
    ResumeValidButWeak,
    ResumeValidGood,
    ResumeValidStrong,
}

impl Classification {
    /// Derives the band from the recomputed total score.
    /// The LLM's own classification claim is never trusted.
    pub fn from_total(total: i32, is_resume: bool) -> Self {
        if !is_resume {
            return Classification::NotResume;
        }
        match total {
            t if t <= 10 => Classification::ResumeInvalidOrIncomplete,
            t if t <= 17 => Classification::ResumeValidButWeak,
            t if t <= 24 => Classification::ResumeValidGood,
            _ => Classification::ResumeValidStrong,
        }
    }

    /// Bands that allow processing to continue but should be surfaced
    /// to the caller as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Classification::ResumeInvalidOrIncomplete | Classification::ResumeValidButWeak
        )
    }
}

/// The six named validation criteria, each clamped to 0..=5.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub document_type_validity: i32,
    pub completeness: i32,
    pub structure_readability: i32,
    pub achievement_quality: i32,
    pub credibility_consistency: i32,
    pub ats_friendliness: i32,
}

impl SubScores {
    /// Returns a copy with every sub-score clamped into bounds.
    /// Out-of-range model output is corrected silently, never rejected.
    pub fn clamped(self) -> Self {
        SubScores {
            document_type_validity: clamp_subscore(self.document_type_validity),
            completeness: clamp_subscore(self.completeness),
            structure_readability: clamp_subscore(self.structure_readability),
            achievement_quality: clamp_subscore(self.achievement_quality),
            credibility_consistency: clamp_subscore(self.credibility_consistency),
            ats_friendliness: clamp_subscore(self.ats_friendliness),
        }
    }

    /// Sum of the six sub-scores. `total_score` is always recomputed from
    /// this, never taken from model output.
    pub fn total(&self) -> i32 {
        self.document_type_validity
            + self.completeness
            + self.structure_readability
            + self.achievement_quality
            + self.credibility_consistency
            + self.ats_friendliness
    }
}

fn clamp_subscore(value: i32) -> i32 {
    value.clamp(SUBSCORE_MIN, SUBSCORE_MAX)
}

/// Structured validation report returned by the validation agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_resume: bool,
    pub classification: Classification,
    pub scores: SubScores,
    pub total_score: i32,
    pub missing_fields: Vec<String>,
    pub top_issues: Vec<String>,
    pub suggested_improvements: Vec<String>,
    pub summary: String,
    /// Set when the validation agent itself failed (LLM or parse error).
    /// Callers must not treat an errored report as a verdict on the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    /// Builds a consistent report from raw sub-scores: clamps, recomputes
    /// the total, and derives the classification band.
    pub fn from_scores(
        is_resume: bool,
        scores: SubScores,
        missing_fields: Vec<String>,
        top_issues: Vec<String>,
        suggested_improvements: Vec<String>,
        summary: String,
    ) -> Self {
        let scores = scores.clamped();
        let total = scores.total();
        ValidationResult {
            is_resume,
            classification: Classification::from_total(total, is_resume),
            scores,
            total_score: total,
            missing_fields,
            top_issues,
            suggested_improvements,
            summary,
            error: None,
        }
    }

    /// Zero-score report used when the validation agent fails outright.
    pub fn failed(reason: String) -> Self {
        ValidationResult {
            is_resume: false,
            classification: Classification::NotResume,
            scores: SubScores::default(),
            total_score: 0,
            missing_fields: Vec::new(),
            top_issues: vec![format!("Validation error: {reason}")],
            suggested_improvements: Vec::new(),
            summary: format!("Validation failed due to an error: {reason}"),
            error: Some(reason),
        }
    }
}
