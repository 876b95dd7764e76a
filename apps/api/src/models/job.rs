use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection for the owner's posting list: one posting plus how many
/// candidates have applied to it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobPostingWithCount {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub candidate_count: i64,
}
