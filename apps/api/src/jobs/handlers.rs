//! Axum route handlers for job posting management.
//!
//! Owner-scoped queries always filter on `user_id`; a posting that exists but
//! belongs to someone else is reported as not found, never as forbidden.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::job::{JobPostingRow, JobPostingWithCount};
use crate::models::user::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpsertJobPostingRequest {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
}

impl UpsertJobPostingRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("Company is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// GET /api/job-postings
///
/// Lists the owner's postings, newest first, with per-posting candidate counts.
pub async fn list_postings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<JobPostingWithCount>>, AppError> {
    let postings: Vec<JobPostingWithCount> = sqlx::query_as(
        r#"
        SELECT jp.id, jp.user_id, jp.title, jp.company, jp.description,
               jp.requirements, jp.location, jp.salary_range, jp.employment_type,
               jp.is_active, jp.created_at, jp.updated_at,
               COUNT(c.id) AS candidate_count
        FROM job_postings jp
        LEFT JOIN candidates c ON c.job_posting_id = jp.id
        WHERE jp.user_id = $1
        GROUP BY jp.id
        ORDER BY jp.created_at DESC
        "#,
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(postings))
}

/// POST /api/job-postings
pub async fn create_posting(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpsertJobPostingRequest>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    request.validate()?;

    let posting: JobPostingRow = sqlx::query_as(
        r#"
        INSERT INTO job_postings
            (user_id, title, company, description, requirements, location,
             salary_range, employment_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&user.id)
    .bind(&request.title)
    .bind(&request.company)
    .bind(&request.description)
    .bind(&request.requirements)
    .bind(&request.location)
    .bind(&request.salary_range)
    .bind(&request.employment_type)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(posting)))
}

/// GET /api/job-postings/:id
///
/// Public application landing: only active postings are visible here.
pub async fn get_public_posting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobPostingRow>, AppError> {
    let posting: Option<JobPostingRow> =
        sqlx::query_as("SELECT * FROM job_postings WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;

    let posting = posting.ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;
    Ok(Json(posting))
}

/// GET /api/job-postings/:id/edit
///
/// Owner view of a posting regardless of its active flag.
pub async fn get_posting_for_edit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<JobPostingRow>, AppError> {
    let posting: Option<JobPostingRow> =
        sqlx::query_as("SELECT * FROM job_postings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(&user.id)
            .fetch_optional(&state.db)
            .await?;

    let posting = posting.ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;
    Ok(Json(posting))
}

/// PUT /api/job-postings/:id
///
/// Full replace of the posting's content fields.
pub async fn update_posting(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(request): Json<UpsertJobPostingRequest>,
) -> Result<Json<JobPostingRow>, AppError> {
    request.validate()?;

    let posting: Option<JobPostingRow> = sqlx::query_as(
        r#"
        UPDATE job_postings
        SET title = $1, company = $2, description = $3, requirements = $4,
            location = $5, salary_range = $6, employment_type = $7,
            updated_at = now()
        WHERE id = $8 AND user_id = $9
        RETURNING *
        "#,
    )
    .bind(&request.title)
    .bind(&request.company)
    .bind(&request.description)
    .bind(&request.requirements)
    .bind(&request.location)
    .bind(&request.salary_range)
    .bind(&request.employment_type)
    .bind(id)
    .bind(&user.id)
    .fetch_optional(&state.db)
    .await?;

    let posting = posting.ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;
    Ok(Json(posting))
}

/// PATCH /api/job-postings/:id
///
/// Sets the active flag to the requested value.
pub async fn set_posting_active(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE job_postings
        SET is_active = $1, updated_at = now()
        WHERE id = $2 AND user_id = $3
        "#,
    )
    .bind(request.is_active)
    .bind(id)
    .bind(&user.id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Job posting not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

/// POST /api/job-postings/:id/toggle-active
pub async fn toggle_posting_active(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let is_active: Option<bool> = sqlx::query_scalar(
        r#"
        UPDATE job_postings
        SET is_active = NOT is_active, updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING is_active
        "#,
    )
    .bind(id)
    .bind(&user.id)
    .fetch_optional(&state.db)
    .await?;

    let is_active =
        is_active.ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;
    Ok(Json(json!({ "success": true, "is_active": is_active })))
}

/// DELETE /api/job-postings/:id
///
/// Candidates and screenings under the posting go with it (FK cascade).
pub async fn delete_posting(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM job_postings WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(&user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Job posting not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> UpsertJobPostingRequest {
        UpsertJobPostingRequest {
            title: "Senior Rust Engineer".to_string(),
            company: "TalentGate".to_string(),
            description: "Own the screening pipeline end to end.".to_string(),
            requirements: Some("5+ years Rust".to_string()),
            location: None,
            salary_range: None,
            employment_type: Some("full-time".to_string()),
        }
    }

    #[test]
    fn test_valid_posting_passes_validation() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut request = valid_request();
        request.title = "   ".to_string();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Title")));
    }

    #[test]
    fn test_empty_company_rejected() {
        let mut request = valid_request();
        request.company = String::new();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Company")));
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut request = valid_request();
        request.description = String::new();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Description")));
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let mut request = valid_request();
        request.requirements = None;
        request.employment_type = None;
        assert!(request.validate().is_ok());
    }
}
