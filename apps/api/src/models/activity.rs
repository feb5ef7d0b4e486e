//! Append-only activity audit trail and the dashboard aggregates over it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The pipeline invocations that produce an auditable decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Quality,
    SkillGap,
    Screen,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Quality => "quality",
            ActivityKind::SkillGap => "skill_gap",
            ActivityKind::Screen => "screen",
        }
    }
}

/// One row of the audit trail. Rows are inserted, never updated or deleted.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub activity_type: String,
    pub filename: String,
    pub score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-tenant counters shown on the dashboard, plus the most recent rows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_resumes: i64,
    pub auto_screened: i64,
    pub high_matches: i64,
    pub skill_gaps: i64,
    pub quality_scored: i64,
    pub recent_activity: Vec<ActivityRecord>,
}
