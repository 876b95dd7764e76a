use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One screening per candidate. Scores and text sections stay NULL until the
/// process operation flips `is_processed`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AiScreeningRow {
    pub id: i64,
    pub candidate_id: i64,
    pub job_posting_id: i64,
    pub user_id: String,
    pub overall_score: Option<i32>,
    pub technical_skills_score: Option<i32>,
    pub experience_score: Option<i32>,
    pub culture_fit_score: Option<i32>,
    pub communication_score: Option<i32>,
    pub screening_summary: Option<String>,
    pub strengths: Option<String>,
    pub concerns: Option<String>,
    pub recommendation: Option<String>,
    pub is_processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
