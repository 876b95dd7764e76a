//! Axum route handlers for candidate intake and review.
//!
//! Application submission is the only public write in the system; everything
//! else is owner-scoped through the posting's `user_id`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::candidates::projection::{
    CandidateDetail, CandidateDetailRow, CandidateListRow, CandidateWithScreening,
};
use crate::errors::AppError;
use crate::models::candidate::CandidateRow;
use crate::models::job::JobPostingRow;
use crate::models::user::AuthUser;
use crate::state::AppState;

/// Columns shared by both candidate list queries; kept in one place so the
/// two shapes cannot drift apart.
const CANDIDATE_LIST_COLUMNS: &str = r#"
    SELECT c.id, c.job_posting_id, c.first_name, c.last_name, c.email, c.phone,
           c.resume_text, c.cover_letter, c.linkedin_url, c.status, c.notes,
           c.created_at, c.updated_at,
           jp.title AS job_title, jp.company AS company_name,
           ai.id AS screening_id, ai.user_id AS screening_user_id,
           ai.overall_score, ai.technical_skills_score, ai.experience_score,
           ai.culture_fit_score, ai.communication_score, ai.screening_summary,
           ai.strengths, ai.concerns, ai.recommendation,
           ai.is_processed AS screening_is_processed,
           ai.created_at AS screening_created_at,
           ai.updated_at AS screening_updated_at,
           vs.is_completed AS video_completed, vs.overall_video_score
    FROM candidates c
    INNER JOIN job_postings jp ON jp.id = c.job_posting_id
    LEFT JOIN ai_screenings ai ON ai.candidate_id = c.id
    LEFT JOIN video_screenings vs ON vs.candidate_id = c.id
"#;

#[derive(Debug, Deserialize)]
pub struct CreateCandidateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_text: String,
    pub cover_letter: Option<String>,
    pub linkedin_url: Option<String>,
}

impl CreateCandidateRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.first_name.trim().is_empty() {
            return Err(AppError::Validation("First name is required".to_string()));
        }
        if self.last_name.trim().is_empty() {
            return Err(AppError::Validation("Last name is required".to_string()));
        }
        if !is_plausible_email(&self.email) {
            return Err(AppError::Validation("Valid email is required".to_string()));
        }
        if self.resume_text.trim().is_empty() {
            return Err(AppError::Validation("Resume text is required".to_string()));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

/// POST /api/job-postings/:id/candidates
///
/// Public application intake against an active posting. The candidate and
/// its unprocessed screening are inserted in one transaction so every
/// candidate carries exactly one screening.
pub async fn submit_application(
    State(state): State<AppState>,
    Path(job_posting_id): Path<i64>,
    Json(request): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<CandidateRow>), AppError> {
    request.validate()?;

    let posting: Option<JobPostingRow> =
        sqlx::query_as("SELECT * FROM job_postings WHERE id = $1 AND is_active = TRUE")
            .bind(job_posting_id)
            .fetch_optional(&state.db)
            .await?;

    let posting = posting
        .ok_or_else(|| AppError::NotFound("Job posting not found or inactive".to_string()))?;

    let mut tx = state.db.begin().await?;

    let candidate: CandidateRow = sqlx::query_as(
        r#"
        INSERT INTO candidates
            (job_posting_id, first_name, last_name, email, phone, resume_text,
             cover_letter, linkedin_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(posting.id)
    .bind(request.first_name.trim())
    .bind(request.last_name.trim())
    .bind(request.email.trim())
    .bind(&request.phone)
    .bind(&request.resume_text)
    .bind(&request.cover_letter)
    .bind(&request.linkedin_url)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO ai_screenings (candidate_id, job_posting_id, user_id) VALUES ($1, $2, $3)",
    )
    .bind(candidate.id)
    .bind(posting.id)
    .bind(&posting.user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(candidate)))
}

/// GET /api/candidates
///
/// All candidates across the owner's postings, newest first.
pub async fn list_candidates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CandidateWithScreening>>, AppError> {
    let query = format!(
        "{CANDIDATE_LIST_COLUMNS} WHERE jp.user_id = $1 ORDER BY c.created_at DESC"
    );
    let rows: Vec<CandidateListRow> = sqlx::query_as(&query)
        .bind(&user.id)
        .fetch_all(&state.db)
        .await?;

    let candidates = rows
        .into_iter()
        .map(CandidateListRow::into_candidate_with_screening)
        .collect();
    Ok(Json(candidates))
}

/// GET /api/job-postings/:id/candidates
///
/// Applicants for one posting; the posting must belong to the caller.
pub async fn list_posting_candidates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(job_posting_id): Path<i64>,
) -> Result<Json<Vec<CandidateWithScreening>>, AppError> {
    let owned: Option<i64> =
        sqlx::query_scalar("SELECT id FROM job_postings WHERE id = $1 AND user_id = $2")
            .bind(job_posting_id)
            .bind(&user.id)
            .fetch_optional(&state.db)
            .await?;

    if owned.is_none() {
        return Err(AppError::NotFound("Job posting not found".to_string()));
    }

    let query = format!(
        "{CANDIDATE_LIST_COLUMNS} WHERE c.job_posting_id = $1 ORDER BY c.created_at DESC"
    );
    let rows: Vec<CandidateListRow> = sqlx::query_as(&query)
        .bind(job_posting_id)
        .fetch_all(&state.db)
        .await?;

    let candidates = rows
        .into_iter()
        .map(CandidateListRow::into_candidate_with_screening)
        .collect();
    Ok(Json(candidates))
}

/// GET /api/candidates/:id
pub async fn get_candidate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<CandidateDetail>, AppError> {
    let row: Option<CandidateDetailRow> = sqlx::query_as(
        r#"
        SELECT c.id, c.job_posting_id, c.first_name, c.last_name, c.email, c.phone,
               c.resume_text, c.cover_letter, c.linkedin_url, c.status, c.notes,
               c.created_at, c.updated_at,
               jp.title AS job_title, jp.company AS company_name,
               ai.id AS screening_id, ai.user_id AS screening_user_id,
               ai.overall_score, ai.technical_skills_score, ai.experience_score,
               ai.culture_fit_score, ai.communication_score, ai.screening_summary,
               ai.strengths, ai.concerns, ai.recommendation,
               ai.is_processed AS screening_is_processed,
               ai.created_at AS screening_created_at,
               ai.updated_at AS screening_updated_at
        FROM candidates c
        INNER JOIN job_postings jp ON jp.id = c.job_posting_id
        LEFT JOIN ai_screenings ai ON ai.candidate_id = c.id
        WHERE c.id = $1 AND jp.user_id = $2
        "#,
    )
    .bind(id)
    .bind(&user.id)
    .fetch_optional(&state.db)
    .await?;

    let row = row.ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;
    Ok(Json(row.into_candidate_detail()))
}

/// PUT /api/candidates/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    assert_candidate_ownership(&state, id, &user.id).await?;

    sqlx::query("UPDATE candidates SET status = $1, updated_at = now() WHERE id = $2")
        .bind(&request.status)
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// PUT /api/candidates/:id/notes
pub async fn update_notes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<Json<Value>, AppError> {
    assert_candidate_ownership(&state, id, &user.id).await?;

    sqlx::query("UPDATE candidates SET notes = $1, updated_at = now() WHERE id = $2")
        .bind(&request.notes)
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Ownership runs through the posting; a candidate under someone else's
/// posting is indistinguishable from a missing one.
async fn assert_candidate_ownership(
    state: &AppState,
    candidate_id: i64,
    user_id: &str,
) -> Result<(), AppError> {
    let owned: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT c.id
        FROM candidates c
        INNER JOIN job_postings jp ON jp.id = c.job_posting_id
        WHERE c.id = $1 AND jp.user_id = $2
        "#,
    )
    .bind(candidate_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;

    owned
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateCandidateRequest {
        CreateCandidateRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            resume_text: "Ten years of systems work.".to_string(),
            cover_letter: None,
            linkedin_url: None,
        }
    }

    #[test]
    fn test_valid_application_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_missing_first_name_rejected() {
        let mut request = valid_request();
        request.first_name = " ".to_string();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("First name")));
    }

    #[test]
    fn test_missing_last_name_rejected() {
        let mut request = valid_request();
        request.last_name = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_resume_rejected() {
        let mut request = valid_request();
        request.resume_text = "\n".to_string();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Resume")));
    }

    #[test]
    fn test_bad_email_rejected() {
        for email in ["", "no-at-sign", "@nodomain", "x@nodot", "x@.dot"] {
            let mut request = valid_request();
            request.email = email.to_string();
            assert!(
                request.validate().is_err(),
                "expected rejection for {email:?}"
            );
        }
    }

    #[test]
    fn test_reasonable_emails_accepted() {
        for email in ["ada@example.com", " ada@sub.example.org ", "a+b@x.co"] {
            assert!(is_plausible_email(email), "expected acceptance for {email:?}");
        }
    }
}
