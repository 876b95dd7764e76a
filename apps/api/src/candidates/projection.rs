//! Typed projections for the candidate join queries.
//!
//! Each query shape gets its own flat `FromRow` struct with aliased columns
//! and one mapping function that assembles the nested response, instead of
//! rebuilding objects from loosely-keyed rows at the call site.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::screening::AiScreeningRow;

/// Flat row of the candidate list queries:
/// candidates × job_postings × ai_screenings × video_screenings.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateListRow {
    pub id: i64,
    pub job_posting_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_text: String,
    pub cover_letter: Option<String>,
    pub linkedin_url: Option<String>,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub screening_id: Option<i64>,
    pub screening_user_id: Option<String>,
    pub overall_score: Option<i32>,
    pub technical_skills_score: Option<i32>,
    pub experience_score: Option<i32>,
    pub culture_fit_score: Option<i32>,
    pub communication_score: Option<i32>,
    pub screening_summary: Option<String>,
    pub strengths: Option<String>,
    pub concerns: Option<String>,
    pub recommendation: Option<String>,
    pub screening_is_processed: Option<bool>,
    pub screening_created_at: Option<DateTime<Utc>>,
    pub screening_updated_at: Option<DateTime<Utc>>,
    pub video_completed: Option<bool>,
    pub overall_video_score: Option<i32>,
}

/// Flat row of the single-candidate query (no video join).
#[derive(Debug, Clone, FromRow)]
pub struct CandidateDetailRow {
    pub id: i64,
    pub job_posting_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_text: String,
    pub cover_letter: Option<String>,
    pub linkedin_url: Option<String>,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub screening_id: Option<i64>,
    pub screening_user_id: Option<String>,
    pub overall_score: Option<i32>,
    pub technical_skills_score: Option<i32>,
    pub experience_score: Option<i32>,
    pub culture_fit_score: Option<i32>,
    pub communication_score: Option<i32>,
    pub screening_summary: Option<String>,
    pub strengths: Option<String>,
    pub concerns: Option<String>,
    pub recommendation: Option<String>,
    pub screening_is_processed: Option<bool>,
    pub screening_created_at: Option<DateTime<Utc>>,
    pub screening_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoScreeningSummary {
    pub is_completed: bool,
    pub overall_video_score: Option<i32>,
}

/// List entry: candidate with posting context and nested screening records.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateWithScreening {
    pub id: i64,
    pub job_posting_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_text: String,
    pub cover_letter: Option<String>,
    pub linkedin_url: Option<String>,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub ai_screening: Option<AiScreeningRow>,
    pub video_screening: Option<VideoScreeningSummary>,
}

/// Detail response: same shape without the video summary.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    pub id: i64,
    pub job_posting_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_text: String,
    pub cover_letter: Option<String>,
    pub linkedin_url: Option<String>,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub ai_screening: Option<AiScreeningRow>,
}

impl CandidateListRow {
    pub fn into_candidate_with_screening(self) -> CandidateWithScreening {
        let ai_screening = assemble_screening(ScreeningColumns {
            candidate_id: self.id,
            job_posting_id: self.job_posting_id,
            screening_id: self.screening_id,
            screening_user_id: self.screening_user_id,
            overall_score: self.overall_score,
            technical_skills_score: self.technical_skills_score,
            experience_score: self.experience_score,
            culture_fit_score: self.culture_fit_score,
            communication_score: self.communication_score,
            screening_summary: self.screening_summary,
            strengths: self.strengths,
            concerns: self.concerns,
            recommendation: self.recommendation,
            screening_is_processed: self.screening_is_processed,
            screening_created_at: self.screening_created_at,
            screening_updated_at: self.screening_updated_at,
        });

        // Only a completed video screening surfaces in the list.
        let video_screening = self
            .video_completed
            .filter(|completed| *completed)
            .map(|completed| VideoScreeningSummary {
                is_completed: completed,
                overall_video_score: self.overall_video_score,
            });

        CandidateWithScreening {
            id: self.id,
            job_posting_id: self.job_posting_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            resume_text: self.resume_text,
            cover_letter: self.cover_letter,
            linkedin_url: self.linkedin_url,
            status: self.status,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            job_title: self.job_title,
            company_name: self.company_name,
            ai_screening,
            video_screening,
        }
    }
}

impl CandidateDetailRow {
    pub fn into_candidate_detail(self) -> CandidateDetail {
        let ai_screening = assemble_screening(ScreeningColumns {
            candidate_id: self.id,
            job_posting_id: self.job_posting_id,
            screening_id: self.screening_id,
            screening_user_id: self.screening_user_id,
            overall_score: self.overall_score,
            technical_skills_score: self.technical_skills_score,
            experience_score: self.experience_score,
            culture_fit_score: self.culture_fit_score,
            communication_score: self.communication_score,
            screening_summary: self.screening_summary,
            strengths: self.strengths,
            concerns: self.concerns,
            recommendation: self.recommendation,
            screening_is_processed: self.screening_is_processed,
            screening_created_at: self.screening_created_at,
            screening_updated_at: self.screening_updated_at,
        });

        CandidateDetail {
            id: self.id,
            job_posting_id: self.job_posting_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            resume_text: self.resume_text,
            cover_letter: self.cover_letter,
            linkedin_url: self.linkedin_url,
            status: self.status,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            job_title: self.job_title,
            company_name: self.company_name,
            ai_screening,
        }
    }
}

/// The screening columns both join shapes share.
struct ScreeningColumns {
    candidate_id: i64,
    job_posting_id: i64,
    screening_id: Option<i64>,
    screening_user_id: Option<String>,
    overall_score: Option<i32>,
    technical_skills_score: Option<i32>,
    experience_score: Option<i32>,
    culture_fit_score: Option<i32>,
    communication_score: Option<i32>,
    screening_summary: Option<String>,
    strengths: Option<String>,
    concerns: Option<String>,
    recommendation: Option<String>,
    screening_is_processed: Option<bool>,
    screening_created_at: Option<DateTime<Utc>>,
    screening_updated_at: Option<DateTime<Utc>>,
}

fn assemble_screening(cols: ScreeningColumns) -> Option<AiScreeningRow> {
    match (
        cols.screening_id,
        cols.screening_user_id,
        cols.screening_created_at,
        cols.screening_updated_at,
    ) {
        (Some(id), Some(user_id), Some(created_at), Some(updated_at)) => Some(AiScreeningRow {
            id,
            candidate_id: cols.candidate_id,
            job_posting_id: cols.job_posting_id,
            user_id,
            overall_score: cols.overall_score,
            technical_skills_score: cols.technical_skills_score,
            experience_score: cols.experience_score,
            culture_fit_score: cols.culture_fit_score,
            communication_score: cols.communication_score,
            screening_summary: cols.screening_summary,
            strengths: cols.strengths,
            concerns: cols.concerns,
            recommendation: cols.recommendation,
            is_processed: cols.screening_is_processed.unwrap_or(false),
            created_at,
            updated_at,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn list_row() -> CandidateListRow {
        let now = Utc::now();
        CandidateListRow {
            id: 7,
            job_posting_id: 3,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            resume_text: "Wrote the first program.".to_string(),
            cover_letter: None,
            linkedin_url: None,
            status: "new".to_string(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
            job_title: "Senior Engineer".to_string(),
            company_name: "Analytical Engines Ltd".to_string(),
            screening_id: Some(11),
            screening_user_id: Some("user-1".to_string()),
            overall_score: Some(88),
            technical_skills_score: Some(92),
            experience_score: Some(85),
            culture_fit_score: Some(80),
            communication_score: Some(90),
            screening_summary: Some("Strong candidate.".to_string()),
            strengths: Some("Deep systems background.".to_string()),
            concerns: None,
            recommendation: Some("RECOMMEND".to_string()),
            screening_is_processed: Some(true),
            screening_created_at: Some(now),
            screening_updated_at: Some(now),
            video_completed: Some(true),
            overall_video_score: Some(75),
        }
    }

    #[test]
    fn test_list_row_maps_nested_screening() {
        let mapped = list_row().into_candidate_with_screening();
        let screening = mapped.ai_screening.expect("screening should be present");
        assert_eq!(screening.id, 11);
        assert_eq!(screening.candidate_id, 7);
        assert_eq!(screening.job_posting_id, 3);
        assert_eq!(screening.overall_score, Some(88));
        assert!(screening.is_processed);
    }

    #[test]
    fn test_missing_screening_join_maps_to_none() {
        let mut row = list_row();
        row.screening_id = None;
        row.screening_user_id = None;
        row.screening_created_at = None;
        row.screening_updated_at = None;
        let mapped = row.into_candidate_with_screening();
        assert!(mapped.ai_screening.is_none());
    }

    #[test]
    fn test_completed_video_screening_is_surfaced() {
        let mapped = list_row().into_candidate_with_screening();
        let video = mapped.video_screening.expect("video should be present");
        assert!(video.is_completed);
        assert_eq!(video.overall_video_score, Some(75));
    }

    #[test]
    fn test_incomplete_video_screening_is_hidden() {
        let mut row = list_row();
        row.video_completed = Some(false);
        assert!(row.into_candidate_with_screening().video_screening.is_none());

        let mut row = list_row();
        row.video_completed = None;
        row.overall_video_score = None;
        assert!(row.into_candidate_with_screening().video_screening.is_none());
    }

    #[test]
    fn test_detail_row_keeps_candidate_fields_and_screening() {
        let now = Utc::now();
        let row = CandidateDetailRow {
            id: 4,
            job_posting_id: 2,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: Some("555-0100".to_string()),
            resume_text: "Compilers.".to_string(),
            cover_letter: Some("Dear team,".to_string()),
            linkedin_url: None,
            status: "interview".to_string(),
            notes: "Follow up Tuesday".to_string(),
            created_at: now,
            updated_at: now,
            job_title: "Staff Engineer".to_string(),
            company_name: "TalentGate".to_string(),
            screening_id: None,
            screening_user_id: None,
            overall_score: None,
            technical_skills_score: None,
            experience_score: None,
            culture_fit_score: None,
            communication_score: None,
            screening_summary: None,
            strengths: None,
            concerns: None,
            recommendation: None,
            screening_is_processed: None,
            screening_created_at: None,
            screening_updated_at: None,
        };

        let detail = row.into_candidate_detail();
        assert_eq!(detail.status, "interview");
        assert_eq!(detail.notes, "Follow up Tuesday");
        assert!(detail.ai_screening.is_none());
    }

    #[test]
    fn test_unprocessed_screening_keeps_null_scores() {
        let mut row = list_row();
        row.overall_score = None;
        row.technical_skills_score = None;
        row.experience_score = None;
        row.culture_fit_score = None;
        row.communication_score = None;
        row.screening_summary = None;
        row.strengths = None;
        row.concerns = None;
        row.recommendation = None;
        row.screening_is_processed = Some(false);

        let screening = row
            .into_candidate_with_screening()
            .ai_screening
            .expect("screening row exists even before processing");
        assert!(!screening.is_processed);
        assert_eq!(screening.overall_score, None);
        assert_eq!(screening.screening_summary, None);
    }
}
