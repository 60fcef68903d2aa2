//! Site languages and the explicit language context used for rendering.
//!
//! The browser owns the DOM rewrite; the server owns which languages exist,
//! how the current one is resolved, how the toggle cycles and where the
//! per-language dictionaries come from.

use serde::Serialize;

pub mod dictionary;
pub mod handlers;

/// Supported UI languages, in toggle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Az,
    En,
    Ru,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Az, Language::En, Language::Ru];
    pub const DEFAULT: Language = Language::Az;

    pub fn code(self) -> &'static str {
        match self {
            Language::Az => "az",
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    /// Exact, case-sensitive match against the known codes.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Next language in the toggle cycle, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&l| l == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Current UI language, passed explicitly to whatever renders localized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageContext {
    current: Language,
}

impl LanguageContext {
    pub fn new(current: Language) -> Self {
        Self { current }
    }

    /// Resolution order: URL query parameter, persisted preference, default.
    /// The first present value wins even if invalid; invalid codes become the default.
    pub fn resolve(query: Option<&str>, persisted: Option<&str>) -> Self {
        let current = query
            .filter(|code| !code.is_empty())
            .or(persisted.filter(|code| !code.is_empty()))
            .and_then(Language::from_code)
            .unwrap_or(Language::DEFAULT);
        Self { current }
    }

    pub fn current(&self) -> Language {
        self.current
    }

    /// Advances to the next language and returns it.
    pub fn cycle(&mut self) -> Language {
        self.current = self.current.next();
        self.current
    }

    /// The AI counselor panel is only offered in English.
    pub fn shows_ai_counselor(&self) -> bool {
        self.current == Language::En
    }

    /// Query string fragment reflecting the language in the page URL.
    pub fn query_param(&self) -> String {
        format!("lang={}", self.current.code())
    }
}

impl Default for LanguageContext {
    fn default() -> Self {
        Self::new(Language::DEFAULT)
    }
}
