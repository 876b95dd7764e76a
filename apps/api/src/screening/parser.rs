//! Screening response parser.
//!
//! The evaluation prompt asks the model for labeled lines ("Overall Score:
//! 87", "Strengths: ...") but nothing enforces that shape, so extraction is
//! best-effort over free text. A label that cannot be found degrades to a
//! default (50 for scores, empty string for sections) instead of failing the
//! request; a completely unparseable completion therefore still produces a
//! full record of defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Score used when a label is missing or its line holds no digits.
pub const DEFAULT_SCORE: i32 = 50;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern compiles"));

/// Structured result of parsing one model completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningEvaluation {
    pub overall_score: i32,
    pub technical_skills_score: i32,
    pub experience_score: i32,
    pub culture_fit_score: i32,
    pub communication_score: i32,
    pub screening_summary: String,
    pub strengths: String,
    pub concerns: String,
    pub recommendation: String,
}

/// Extracts the five scores and four text sections from a completion.
pub fn parse_screening_response(text: &str) -> ScreeningEvaluation {
    ScreeningEvaluation {
        overall_score: parse_score(text, "Overall Score"),
        technical_skills_score: parse_score(text, "Technical Skills Score"),
        experience_score: parse_score(text, "Experience Score"),
        culture_fit_score: parse_score(text, "Culture Fit Score"),
        communication_score: parse_score(text, "Communication Score"),
        screening_summary: parse_section(text, "Screening Summary"),
        strengths: parse_section(text, "Strengths"),
        concerns: parse_section(text, "Concerns"),
        recommendation: parse_section(text, "Recommendation"),
    }
}

/// Finds `label`, skips any decoration before the colon on the same line
/// (e.g. "(1-100)"), and takes the first run of digits in the remainder of
/// that line. Matched values are stored as-is; nothing clamps them to the
/// 1-100 range the prompt documents.
fn parse_score(text: &str, label: &str) -> i32 {
    let pattern = Regex::new(&format!(r"(?i){}.*?:([^\n]*)", regex::escape(label)))
        .expect("score pattern compiles");

    let Some(caps) = pattern.captures(text) else {
        return DEFAULT_SCORE;
    };

    DIGIT_RUN
        .find(&caps[1])
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_SCORE)
}

/// Captures the text after `label:` up to the next line that starts with an
/// ASCII uppercase letter (the next labeled section), or to end of input.
fn parse_section(text: &str, label: &str) -> String {
    let marker = Regex::new(&format!(r"(?i){}:", regex::escape(label)))
        .expect("section pattern compiles");

    let Some(m) = marker.find(text) else {
        return String::new();
    };

    let rest = &text[m.end()..];
    let end = rest
        .match_indices('\n')
        .find(|(idx, _)| {
            rest[idx + 1..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase())
        })
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());

    rest[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_score_extracted() {
        let parsed = parse_screening_response("Overall Score: 87");
        assert_eq!(parsed.overall_score, 87);
    }

    #[test]
    fn test_score_with_range_decoration_before_colon() {
        let parsed = parse_screening_response("Overall Score (1-100): 72");
        assert_eq!(parsed.overall_score, 72);
    }

    #[test]
    fn test_score_label_is_case_insensitive() {
        let parsed = parse_screening_response("overall score: 64");
        assert_eq!(parsed.overall_score, 64);
    }

    #[test]
    fn test_missing_label_defaults_to_50() {
        let parsed = parse_screening_response("The candidate seems fine.");
        assert_eq!(parsed.overall_score, DEFAULT_SCORE);
        assert_eq!(parsed.technical_skills_score, DEFAULT_SCORE);
        assert_eq!(parsed.communication_score, DEFAULT_SCORE);
    }

    #[test]
    fn test_label_without_digits_defaults_to_50() {
        let parsed = parse_screening_response("Overall Score: excellent");
        assert_eq!(parsed.overall_score, DEFAULT_SCORE);
    }

    #[test]
    fn test_adjacent_score_labels_do_not_bleed() {
        let parsed = parse_screening_response("Technical Skills Score: 95\nExperience Score: 40");
        assert_eq!(parsed.technical_skills_score, 95);
        assert_eq!(parsed.experience_score, 40);
    }

    #[test]
    fn test_digits_on_following_line_are_not_picked_up() {
        // The score must sit on the label's own line.
        let parsed = parse_screening_response("Overall Score:\n87");
        assert_eq!(parsed.overall_score, DEFAULT_SCORE);
    }

    #[test]
    fn test_scores_above_documented_range_pass_through_unclamped() {
        // The prompt documents 1-100 but matched digits are stored as-is.
        let parsed = parse_screening_response("Overall Score: 9999");
        assert_eq!(parsed.overall_score, 9999);
    }

    #[test]
    fn test_first_digit_run_wins_within_the_line() {
        let parsed = parse_screening_response("Overall Score: 85 out of 100");
        assert_eq!(parsed.overall_score, 85);
    }

    #[test]
    fn test_section_stops_at_next_label_line() {
        let parsed =
            parse_screening_response("Strengths: Good communicator\nConcerns: Limited experience");
        assert_eq!(parsed.strengths, "Good communicator");
        assert_eq!(parsed.concerns, "Limited experience");
    }

    #[test]
    fn test_section_spans_lowercase_continuation_lines() {
        let text = "Screening Summary: Solid backend engineer\nwith strong database skills.\nStrengths: SQL depth";
        let parsed = parse_screening_response(text);
        assert_eq!(
            parsed.screening_summary,
            "Solid backend engineer\nwith strong database skills."
        );
        assert_eq!(parsed.strengths, "SQL depth");
    }

    #[test]
    fn test_missing_section_defaults_to_empty() {
        let parsed = parse_screening_response("Overall Score: 70");
        assert_eq!(parsed.screening_summary, "");
        assert_eq!(parsed.recommendation, "");
    }

    #[test]
    fn test_final_section_runs_to_end_of_text() {
        let parsed =
            parse_screening_response("Recommendation: RECOMMEND - strong technical match");
        assert_eq!(parsed.recommendation, "RECOMMEND - strong technical match");
    }

    #[test]
    fn test_section_text_is_trimmed() {
        let parsed = parse_screening_response("Strengths:   clear writing  \nConcerns: none");
        assert_eq!(parsed.strengths, "clear writing");
    }

    #[test]
    fn test_empty_completion_yields_all_defaults() {
        let parsed = parse_screening_response("");
        assert_eq!(
            parsed,
            ScreeningEvaluation {
                overall_score: DEFAULT_SCORE,
                technical_skills_score: DEFAULT_SCORE,
                experience_score: DEFAULT_SCORE,
                culture_fit_score: DEFAULT_SCORE,
                communication_score: DEFAULT_SCORE,
                screening_summary: String::new(),
                strengths: String::new(),
                concerns: String::new(),
                recommendation: String::new(),
            }
        );
    }

    #[test]
    fn test_realistic_completion_parses_every_field() {
        let completion = "\
Here is my evaluation of the candidate.

1. Technical Skills Score (1-100): 82
2. Experience Score (1-100): 74
3. Culture Fit Score (1-100): 68
4. Communication Score (1-100): 90

Overall Score (1-100): 79
Screening Summary: A well-rounded backend engineer whose resume\nshows steady growth across two companies.
Strengths: Clear written communication and relevant database experience.
Concerns: No direct experience with the hiring team's stack.
Recommendation: MAYBE, pending a technical screen.";

        let parsed = parse_screening_response(completion);
        assert_eq!(parsed.overall_score, 79);
        assert_eq!(parsed.technical_skills_score, 82);
        assert_eq!(parsed.experience_score, 74);
        assert_eq!(parsed.culture_fit_score, 68);
        assert_eq!(parsed.communication_score, 90);
        assert_eq!(
            parsed.screening_summary,
            "A well-rounded backend engineer whose resume\nshows steady growth across two companies."
        );
        assert_eq!(
            parsed.strengths,
            "Clear written communication and relevant database experience."
        );
        assert_eq!(
            parsed.concerns,
            "No direct experience with the hiring team's stack."
        );
        assert_eq!(parsed.recommendation, "MAYBE, pending a technical screen.");
    }
}
