//! LLM prompt constants for candidate screening.
//!
//! The labels in the prompt ("Overall Score", "Screening Summary", ...) are
//! the same strings `screening::parser` searches for; change them together.

use crate::screening::handlers::ScreeningContextRow;

/// System prompt for the evaluation call.
pub const SCREENING_SYSTEM: &str = "You are an expert HR professional providing \
    fair and unbiased candidate evaluations. \
    Respond in a structured format that can be easily parsed.";

/// Evaluation prompt template. Placeholders are replaced per screening.
const SCREENING_PROMPT_TEMPLATE: &str = r#"You are an expert HR professional tasked with fairly evaluating a candidate for a job position.
Please analyze the candidate's qualifications and provide an unbiased assessment.

Job Position: {job_title}
Job Description: {job_description}
Job Requirements: {job_requirements}

Candidate Information:
Name: {first_name} {last_name}
Email: {email}
Resume: {resume_text}
Cover Letter: {cover_letter}

Please provide scores from 1-100 for each category and detailed feedback:

1. Technical Skills Score (1-100): How well do the candidate's technical skills match the job requirements?
2. Experience Score (1-100): How relevant and valuable is their work experience?
3. Culture Fit Score (1-100): Based on their communication style and background, how well might they fit the company culture?
4. Communication Score (1-100): How effectively do they communicate in their application materials?

Also provide:
Overall Score (1-100): A weighted average considering all factors
Screening Summary: A brief 2-3 sentence overview
Strengths: Key positive aspects of this candidate
Concerns: Any potential areas of concern or gaps
Recommendation: RECOMMEND, MAYBE, or NOT_RECOMMEND with brief reasoning

Focus on objective qualifications and avoid any bias based on name, gender, race, age, or other protected characteristics."#;

/// Builds the evaluation prompt for one screening.
pub fn build_screening_prompt(context: &ScreeningContextRow) -> String {
    SCREENING_PROMPT_TEMPLATE
        .replace("{job_title}", &context.job_title)
        .replace("{job_description}", &context.job_description)
        .replace(
            "{job_requirements}",
            context.job_requirements.as_deref().unwrap_or("Not specified"),
        )
        .replace("{first_name}", &context.first_name)
        .replace("{last_name}", &context.last_name)
        .replace("{email}", &context.email)
        .replace("{resume_text}", &context.resume_text)
        .replace(
            "{cover_letter}",
            context.cover_letter.as_deref().unwrap_or("Not provided"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ScreeningContextRow {
        ScreeningContextRow {
            screening_id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            resume_text: "Analytical engine programming.".to_string(),
            cover_letter: None,
            job_title: "Senior Engineer".to_string(),
            job_description: "Build the screening pipeline.".to_string(),
            job_requirements: Some("Rust, SQL".to_string()),
        }
    }

    #[test]
    fn test_prompt_contains_job_and_candidate_fields() {
        let prompt = build_screening_prompt(&context());
        assert!(prompt.contains("Job Position: Senior Engineer"));
        assert!(prompt.contains("Job Requirements: Rust, SQL"));
        assert!(prompt.contains("Name: Ada Lovelace"));
        assert!(prompt.contains("Resume: Analytical engine programming."));
    }

    #[test]
    fn test_missing_cover_letter_uses_placeholder() {
        let prompt = build_screening_prompt(&context());
        assert!(prompt.contains("Cover Letter: Not provided"));
    }

    #[test]
    fn test_missing_requirements_use_placeholder() {
        let mut ctx = context();
        ctx.job_requirements = None;
        let prompt = build_screening_prompt(&ctx);
        assert!(prompt.contains("Job Requirements: Not specified"));
    }

    #[test]
    fn test_prompt_labels_match_parser_labels() {
        let prompt = build_screening_prompt(&context());
        for label in [
            "Overall Score",
            "Technical Skills Score",
            "Experience Score",
            "Culture Fit Score",
            "Communication Score",
            "Screening Summary",
            "Strengths",
            "Concerns",
            "Recommendation",
        ] {
            assert!(prompt.contains(label), "prompt is missing label {label:?}");
        }
    }

    #[test]
    fn test_no_unreplaced_placeholders_remain() {
        let prompt = build_screening_prompt(&context());
        assert!(!prompt.contains('{'), "unreplaced placeholder in prompt");
    }
}
