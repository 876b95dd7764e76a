use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub job_posting_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_text: String,
    pub cover_letter: Option<String>,
    pub linkedin_url: Option<String>,
    /// Free-form pipeline stage; conventional values are
    /// new / reviewed / interview / hired / rejected.
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
