//! Axum route handler for AI screening processing.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::screening::AiScreeningRow;
use crate::models::user::AuthUser;
use crate::screening::parser::parse_screening_response;
use crate::screening::prompts::{build_screening_prompt, SCREENING_SYSTEM};
use crate::state::AppState;

/// Everything the evaluation prompt needs, selected in one guarded query.
#[derive(Debug, Clone, FromRow)]
pub struct ScreeningContextRow {
    pub screening_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub resume_text: String,
    pub cover_letter: Option<String>,
    pub job_title: String,
    pub job_description: String,
    pub job_requirements: Option<String>,
}

/// POST /api/ai-screenings/:id/process
///
/// Runs the model evaluation for one unprocessed screening and persists the
/// parsed result, flipping the record to its terminal processed state. A
/// failed model call leaves the record unprocessed; re-invoking the endpoint
/// retries it. A processed record no longer matches the guard and reports
/// not found, so re-processing never issues another model call.
pub async fn process_screening(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<AiScreeningRow>, AppError> {
    // Two concurrent calls can both observe is_processed = FALSE here; both
    // pay for a model call and the later write wins. No row lock is taken.
    let context: Option<ScreeningContextRow> = sqlx::query_as(
        r#"
        SELECT ai.id AS screening_id,
               c.first_name, c.last_name, c.email, c.resume_text, c.cover_letter,
               jp.title AS job_title, jp.description AS job_description,
               jp.requirements AS job_requirements
        FROM ai_screenings ai
        INNER JOIN candidates c ON c.id = ai.candidate_id
        INNER JOIN job_postings jp ON jp.id = ai.job_posting_id
        WHERE ai.id = $1 AND ai.user_id = $2 AND ai.is_processed = FALSE
        "#,
    )
    .bind(id)
    .bind(&user.id)
    .fetch_optional(&state.db)
    .await?;

    let context = context.ok_or_else(|| {
        AppError::NotFound("Screening not found or already processed".to_string())
    })?;

    let prompt = build_screening_prompt(&context);
    let response = state
        .llm
        .call(&prompt, SCREENING_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Screening evaluation failed: {e}")))?;

    // An empty completion parses to all defaults rather than erroring.
    let evaluation = parse_screening_response(response.text().unwrap_or_default());

    let updated: AiScreeningRow = sqlx::query_as(
        r#"
        UPDATE ai_screenings
        SET overall_score = $1, technical_skills_score = $2, experience_score = $3,
            culture_fit_score = $4, communication_score = $5, screening_summary = $6,
            strengths = $7, concerns = $8, recommendation = $9,
            is_processed = TRUE, updated_at = now()
        WHERE id = $10
        RETURNING *
        "#,
    )
    .bind(evaluation.overall_score)
    .bind(evaluation.technical_skills_score)
    .bind(evaluation.experience_score)
    .bind(evaluation.culture_fit_score)
    .bind(evaluation.communication_score)
    .bind(&evaluation.screening_summary)
    .bind(&evaluation.strengths)
    .bind(&evaluation.concerns)
    .bind(&evaluation.recommendation)
    .bind(context.screening_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}
