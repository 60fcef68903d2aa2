// Shared prompt fragments used by more than one endpoint.
// Endpoint-specific templates live in counseling/prompts.rs.

use crate::i18n::Language;

/// Counselor persona opening line. Replace `{name}` before sending.
pub const COUNSELOR_PERSONA: &str = "You are {name}'s personal academic counselor at GlobalGo";

/// Instruction telling the model which language to answer in.
/// Unrecognized or missing codes fall back to English.
pub fn language_instruction(code: Option<&str>) -> &'static str {
    match code.and_then(Language::from_code) {
        Some(Language::Ru) => "Respond in Russian (Русский язык).",
        Some(Language::Az) => "Respond in Azerbaijani (Azərbaycan dili).",
        Some(Language::En) | None => "Respond in English.",
    }
}
