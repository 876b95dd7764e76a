//! Axum route handler for the owner dashboard.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::user::AuthUser;
use crate::state::AppState;

/// Response keys stay camelCase; that is the wire format the dashboard page
/// already consumes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_jobs: i64,
    pub total_candidates: i64,
    pub pending_screenings: i64,
    pub completed_screenings: i64,
    pub avg_score: i32,
    pub recent_activity: Vec<ActivityItem>,
}

/// One feed entry: a new application or a completed screening.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub id: i64,
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>, AppError> {
    let total_jobs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM job_postings WHERE user_id = $1")
            .bind(&user.id)
            .fetch_one(&state.db)
            .await?;

    let total_candidates: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM candidates c
        INNER JOIN job_postings jp ON jp.id = c.job_posting_id
        WHERE jp.user_id = $1
        "#,
    )
    .bind(&user.id)
    .fetch_one(&state.db)
    .await?;

    let pending_screenings: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM ai_screenings WHERE user_id = $1 AND is_processed = FALSE",
    )
    .bind(&user.id)
    .fetch_one(&state.db)
    .await?;

    let completed_screenings: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM ai_screenings WHERE user_id = $1 AND is_processed = TRUE",
    )
    .bind(&user.id)
    .fetch_one(&state.db)
    .await?;

    let avg_score: Option<f64> = sqlx::query_scalar(
        r#"
        SELECT AVG(overall_score)::float8
        FROM ai_screenings
        WHERE user_id = $1 AND is_processed = TRUE AND overall_score IS NOT NULL
        "#,
    )
    .bind(&user.id)
    .fetch_one(&state.db)
    .await?;

    let recent_activity: Vec<ActivityItem> = sqlx::query_as(
        r#"
        SELECT 'application' AS activity_type,
               'New application from ' || c.first_name || ' ' || c.last_name
                   || ' for ' || jp.title AS message,
               c.created_at AS "timestamp",
               c.id AS id
        FROM candidates c
        INNER JOIN job_postings jp ON jp.id = c.job_posting_id
        WHERE jp.user_id = $1
        UNION ALL
        SELECT 'screening' AS activity_type,
               'AI screening completed for ' || c.first_name || ' ' || c.last_name AS message,
               ai.updated_at AS "timestamp",
               ai.id AS id
        FROM ai_screenings ai
        INNER JOIN candidates c ON c.id = ai.candidate_id
        WHERE ai.user_id = $1 AND ai.is_processed = TRUE
        ORDER BY "timestamp" DESC
        LIMIT 10
        "#,
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DashboardResponse {
        total_jobs,
        total_candidates,
        pending_screenings,
        completed_screenings,
        avg_score: avg_score.map(|v| v.round() as i32).unwrap_or(0),
        recent_activity,
    }))
}
