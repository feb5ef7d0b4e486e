//! Job definition rows and match results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for creating a job posting.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    #[serde(default = "default_employment_type")]
    pub employment_type: String,
    #[serde(default = "default_job_category")]
    pub job_category: String,
    #[serde(default = "default_job_level")]
    pub job_level: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub application_url: Option<String>,
}

fn default_employment_type() -> String {
    "FULL_TIME".to_string()
}

fn default_job_category() -> String {
    "IT".to_string()
}

fn default_job_level() -> String {
    "MID".to_string()
}

/// A stored job posting, always scoped to its owning tenant.
#[derive(Debug, Clone, Serialize)]
pub struct JobDefinition {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub employment_type: String,
    pub job_category: String,
    pub job_level: String,
    pub skills_required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    pub posted_at: DateTime<Utc>,
}

/// Optional filters applied on top of the tenant scope in job search.
#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    pub job_level: Option<String>,
    pub job_category: Option<String>,
}

/// One job ranked against a query or a resume.
#[derive(Debug, Clone, Serialize)]
pub struct JobMatch {
    pub score: f32,
    pub job: JobDefinition,
}
