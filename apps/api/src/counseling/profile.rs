use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A prospective student as submitted through the counseling form.
///
/// Every field is free text and defaults to empty. `age` and `gpa` are not
/// validated; browsers send them as strings, API clients sometimes as numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentProfile {
    pub name: String,
    pub surname: String,
    #[serde(deserialize_with = "lenient_string")]
    pub age: String,
    pub citizenship: String,
    pub target_country: String,
    pub education: String,
    pub major: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gpa: String,
    pub english_level: String,
    pub institution: String,
    pub edu_lang: String,
    /// UI language code the answer should be written in.
    pub language: Option<String>,
}

impl StudentProfile {
    /// Sets a field from a multipart form entry. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "name" => self.name = value,
            "surname" => self.surname = value,
            "age" => self.age = value,
            "citizenship" => self.citizenship = value,
            "targetCountry" => self.target_country = value,
            "education" => self.education = value,
            "major" => self.major = value,
            "gpa" => self.gpa = value,
            "englishLevel" => self.english_level = value,
            "institution" => self.institution = value,
            "eduLang" => self.edu_lang = value,
            "language" => self.language = Some(value),
            _ => {}
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

/// Accepts a JSON string, number or null and keeps its textual form.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Who spoke a conversation turn. Anything but `user`, including no speaker
/// at all, is the counselor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", rename_all = "lowercase")]
pub enum TurnRole {
    User,
    #[default]
    Assistant,
}

impl From<Option<String>> for TurnRole {
    fn from(raw: Option<String>) -> Self {
        match raw {
            Some(raw) if raw.eq_ignore_ascii_case("user") => TurnRole::User,
            _ => TurnRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(rename = "type", alias = "role", default)]
    pub role: TurnRole,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_deserializes_camel_case_and_numbers() {
        let profile: StudentProfile = serde_json::from_value(json!({
            "name": "Test",
            "surname": "User",
            "age": 19,
            "citizenship": "Azerbaijan",
            "targetCountry": "Germany",
            "gpa": 85,
            "englishLevel": "B2",
            "eduLang": "English",
            "language": "en"
        }))
        .unwrap();

        assert_eq!(profile.age, "19");
        assert_eq!(profile.gpa, "85");
        assert_eq!(profile.target_country, "Germany");
        assert_eq!(profile.edu_lang, "English");
        assert_eq!(profile.language.as_deref(), Some("en"));
        assert_eq!(profile.major, "");
    }

    #[test]
    fn test_profile_null_age_is_empty() {
        let profile: StudentProfile = serde_json::from_value(json!({"age": null})).unwrap();
        assert_eq!(profile.age, "");
    }

    #[test]
    fn test_set_field_maps_form_names() {
        let mut profile = StudentProfile::default();
        profile.set_field("targetCountry", "Italy".into());
        profile.set_field("englishLevel", "C1".into());
        profile.set_field("transcript", "ignored".into());
        assert_eq!(profile.target_country, "Italy");
        assert_eq!(profile.english_level, "C1");
    }

    #[test]
    fn test_full_name_trims_missing_surname() {
        let profile = StudentProfile {
            name: "Leyla".into(),
            ..Default::default()
        };
        assert_eq!(profile.full_name(), "Leyla");
    }

    #[test]
    fn test_turn_role_accepts_type_or_role_and_any_non_user() {
        let turns: Vec<ConversationTurn> = serde_json::from_value(json!([
            {"type": "user", "content": "Which IELTS score?"},
            {"type": "ai", "content": "Aim for 7.0"},
            {"role": "assistant", "content": "Anything else?"}
        ]))
        .unwrap();

        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[2].role, TurnRole::Assistant);
    }

    #[test]
    fn test_turn_without_speaker_is_counselor() {
        let turns: Vec<ConversationTurn> = serde_json::from_value(json!([
            {"content": "Consider DAAD."},
            {"type": null, "content": null}
        ]))
        .unwrap();

        assert_eq!(turns[0].role, TurnRole::Assistant);
        assert_eq!(turns[0].content, "Consider DAAD.");
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].content, "");
    }
}
