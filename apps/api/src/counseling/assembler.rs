//! Builds the analysis and chat prompts from a student profile. Output depends
//! only on the inputs.
//!
//! User input is interpolated verbatim and never escaped; the model is the
//! trust boundary. Templates are filled in a single pass so a `{placeholder}`
//! typed into a form field is left as-is.

use bytes::Bytes;
use chrono::{Months, NaiveDate};

use crate::counseling::profile::{ConversationTurn, StudentProfile, TurnRole};
use crate::counseling::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, CHAT_PROFILE_BLOCK, CHAT_PROMPT_TEMPLATE,
    PREVIOUS_CONVERSATION_HEADER, SELF_REPORTED_GPA_LINE, TRANSCRIPT_INSTRUCTION,
};
use crate::llm_client::prompts::{language_instruction, COUNSELOR_PERSONA};
use crate::llm_client::types::Part;

/// A file sent along with the profile, e.g. a transcript scan.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Bytes,
}

/// Instruction text plus the multimodal parts that accompany it.
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    pub text: String,
    pub parts: Vec<Part>,
}

pub fn build_analysis_prompt(
    profile: &StudentProfile,
    attachment: Option<&Attachment>,
    today: NaiveDate,
) -> AssembledPrompt {
    let persona = fill(COUNSELOR_PERSONA, &[("name", profile.full_name().as_str())]);
    let gpa_line = fill(SELF_REPORTED_GPA_LINE, &[("gpa", profile.gpa.as_str())]);
    let current_month = today.format("%B %Y").to_string();
    let next_months = two_month_window(today);

    let mut text = fill(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("persona", persona.as_str()),
            ("name", profile.name.as_str()),
            ("surname", profile.surname.as_str()),
            ("age", profile.age.as_str()),
            ("citizenship", profile.citizenship.as_str()),
            ("target_country", profile.target_country.as_str()),
            ("education", profile.education.as_str()),
            ("institution", profile.institution.as_str()),
            ("major", profile.major.as_str()),
            ("gpa_line", gpa_line.as_str()),
            ("edu_lang", profile.edu_lang.as_str()),
            ("english_level", profile.english_level.as_str()),
            (
                "language_instruction",
                language_instruction(profile.language.as_deref()),
            ),
            ("current_month", current_month.as_str()),
            ("next_months", next_months.as_str()),
        ],
    );

    let mut parts = Vec::new();
    if let Some(attachment) = attachment {
        text.push_str(&fill(
            TRANSCRIPT_INSTRUCTION,
            &[("name", profile.name.as_str()), ("gpa", profile.gpa.as_str())],
        ));
        parts.push(Part::inline_data(
            attachment.mime_type.clone(),
            &attachment.data,
        ));
    }

    AssembledPrompt { text, parts }
}

/// Builds the single-turn prompt for a follow-up question.
///
/// Only the most recent `history_limit` turns are replayed. The
/// "Previous Conversation" block is omitted when nothing is replayed.
pub fn build_chat_prompt(
    profile: &StudentProfile,
    history: &[ConversationTurn],
    question: &str,
    language: Option<&str>,
    history_limit: usize,
) -> String {
    let mut context = fill(
        CHAT_PROFILE_BLOCK,
        &[
            ("name", profile.name.as_str()),
            ("surname", profile.surname.as_str()),
            ("age", profile.age.as_str()),
            ("citizenship", profile.citizenship.as_str()),
            ("education", profile.education.as_str()),
            ("institution", profile.institution.as_str()),
            ("major", profile.major.as_str()),
            ("gpa", profile.gpa.as_str()),
            ("target_country", profile.target_country.as_str()),
            ("edu_lang", profile.edu_lang.as_str()),
            ("english_level", profile.english_level.as_str()),
        ],
    );

    let window = &history[history.len().saturating_sub(history_limit)..];
    if !window.is_empty() {
        context.push_str("\n\n");
        context.push_str(PREVIOUS_CONVERSATION_HEADER);
        context.push('\n');
        for turn in window {
            let speaker = match turn.role {
                TurnRole::User => "Student asked",
                TurnRole::Assistant => "You answered",
            };
            context.push_str(&format!("\n{speaker}: \"{}\"\n", turn.content));
        }
    }

    let persona = fill(COUNSELOR_PERSONA, &[("name", profile.name.as_str())]);
    fill(
        CHAT_PROMPT_TEMPLATE,
        &[
            ("persona", persona.as_str()),
            ("name", profile.name.as_str()),
            ("conversation_context", context.as_str()),
            ("question", question),
            (
                "language_instruction",
                language_instruction(language.or(profile.language.as_deref())),
            ),
            ("gpa", profile.gpa.as_str()),
            ("major", profile.major.as_str()),
            ("target_country", profile.target_country.as_str()),
        ],
    )
}

/// "February-March 2026", or "December 2026-January 2027" across a year boundary.
fn two_month_window(today: NaiveDate) -> String {
    match today.checked_add_months(Months::new(1)) {
        Some(next) if next.format("%Y").to_string() == today.format("%Y").to_string() => {
            format!("{}-{}", today.format("%B"), next.format("%B %Y"))
        }
        Some(next) => format!("{}-{}", today.format("%B %Y"), next.format("%B %Y")),
        None => today.format("%B %Y").to_string(),
    }
}

/// Replaces `{key}` placeholders in one left-to-right pass. Unknown
/// placeholders and substituted values are never rescanned.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> StudentProfile {
        StudentProfile {
            name: "Test".into(),
            surname: "User".into(),
            age: "19".into(),
            citizenship: "Azerbaijan".into(),
            target_country: "Germany".into(),
            education: "Bachelor".into(),
            major: "Computer Science".into(),
            gpa: "85".into(),
            english_level: "B2".into(),
            institution: "Test Uni".into(),
            edu_lang: "English".into(),
            language: Some("en".into()),
        }
    }

    fn feb_2026() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()
    }

    #[test]
    fn test_analysis_prompt_without_attachment() {
        let prompt = build_analysis_prompt(&profile(), None, feb_2026());

        assert!(prompt.text.contains("- Current GPA (self-reported): 85"));
        assert!(!prompt.text.contains("TRANSCRIPT ANALYSIS"));
        assert!(prompt.parts.is_empty());
        assert!(prompt.text.contains("Respond in English."));
        assert!(prompt.text.contains("Current Date: February 2026"));
        assert!(prompt.text.contains("February-March 2026"));
        assert!(prompt.text.contains("get_scholarships"));
    }

    #[test]
    fn test_analysis_prompt_interpolates_every_field() {
        let p = profile();
        let text = build_analysis_prompt(&p, None, feb_2026()).text;
        for value in [
            &p.name,
            &p.surname,
            &p.age,
            &p.citizenship,
            &p.target_country,
            &p.education,
            &p.major,
            &p.english_level,
            &p.institution,
            &p.edu_lang,
        ] {
            assert!(text.contains(value.as_str()), "missing {value}");
        }
        assert!(!text.contains("{name}"));
        assert!(!text.contains("{gpa_line}"));
    }

    #[test]
    fn test_analysis_prompt_with_attachment() {
        let attachment = Attachment {
            mime_type: "image/png".into(),
            data: Bytes::from_static(b"\x89PNG"),
        };
        let prompt = build_analysis_prompt(&profile(), Some(&attachment), feb_2026());

        assert!(prompt.text.contains("TRANSCRIPT ANALYSIS"));
        assert!(prompt.text.contains("self-reported GPA (85)"));
        assert_eq!(prompt.parts.len(), 1);
        let blob = prompt.parts[0].inline_data.as_ref().unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.data, "iVBORw==");
    }

    #[test]
    fn test_language_switch_in_prompt() {
        let mut p = profile();
        p.language = Some("ru".into());
        assert!(build_analysis_prompt(&p, None, feb_2026())
            .text
            .contains("Respond in Russian"));
        p.language = Some("xx".into());
        assert!(build_analysis_prompt(&p, None, feb_2026())
            .text
            .contains("Respond in English."));
    }

    #[test]
    fn test_user_input_is_not_rescanned() {
        let mut p = profile();
        p.major = "{gpa} <b>hacking</b>".into();
        let text = build_analysis_prompt(&p, None, feb_2026()).text;
        assert!(text.contains("Interested in: {gpa} <b>hacking</b>"));
    }

    #[test]
    fn test_chat_prompt_empty_history_omits_block() {
        let text = build_chat_prompt(&profile(), &[], "Which IELTS score?", Some("en"), 20);
        assert!(!text.contains("Previous Conversation"));
        assert!(text.contains("\"Which IELTS score?\""));
        assert!(text.contains("- GPA: 85"));
    }

    #[test]
    fn test_chat_prompt_replays_history() {
        let history = vec![
            ConversationTurn {
                role: TurnRole::User,
                content: "Is TU Munich realistic?".into(),
            },
            ConversationTurn {
                role: TurnRole::Assistant,
                content: "Yes, with IELTS 7.0.".into(),
            },
        ];
        let text = build_chat_prompt(&profile(), &history, "And RWTH?", None, 20);
        assert!(text.contains("**Previous Conversation:**"));
        assert!(text.contains("Student asked: \"Is TU Munich realistic?\""));
        assert!(text.contains("You answered: \"Yes, with IELTS 7.0.\""));
    }

    #[test]
    fn test_chat_prompt_windows_history() {
        let history: Vec<ConversationTurn> = (0..5)
            .map(|i| ConversationTurn {
                role: TurnRole::User,
                content: format!("question {i}"),
            })
            .collect();
        let text = build_chat_prompt(&profile(), &history, "next", None, 2);
        assert!(!text.contains("question 2"));
        assert!(text.contains("question 3"));
        assert!(text.contains("question 4"));
    }

    #[test]
    fn test_chat_language_overrides_profile_language() {
        let text = build_chat_prompt(&profile(), &[], "q", Some("az"), 20);
        assert!(text.contains("Respond in Azerbaijani"));
        let text = build_chat_prompt(&profile(), &[], "q", None, 20);
        assert!(text.contains("Respond in English."));
    }

    #[test]
    fn test_two_month_window_across_year() {
        let dec = NaiveDate::from_ymd_opt(2026, 12, 3).unwrap();
        assert_eq!(two_month_window(dec), "December 2026-January 2027");
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        assert_eq!(fill("{a} {b} {", &[("a", "x")]), "x {b} {");
    }
}
