use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::i18n::dictionary::{localize, Dictionary, I18nError, BUTTON_LABEL_KEY};
use crate::i18n::{Language, LanguageContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleResponse {
    pub language: Language,
    pub next: Language,
    pub button_label: Option<String>,
    pub show_ai_counselor: bool,
    /// Query string to mirror into the page URL, e.g. `lang=en`.
    pub query: String,
    pub dictionary: Dictionary,
}

/// GET /api/i18n/:lang
///
/// Unknown codes fall back to the default language, as the toggle does.
pub async fn handle_get_locale(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<LocaleResponse>, AppError> {
    let ctx = LanguageContext::resolve(Some(&lang), None);
    let language = ctx.current();
    let mut toggled = ctx;
    let next = toggled.cycle();

    debug!(
        "Locale {} requested (cached: {})",
        language.code(),
        state.dictionaries.is_loaded(language)
    );

    let dictionary = state
        .dictionaries
        .load(language)
        .await
        .map_err(|e| match e {
            I18nError::Io { .. } => AppError::NotFound(e.to_string()),
            I18nError::Parse { .. } => AppError::Internal(anyhow::Error::new(e)),
        })?;

    Ok(Json(LocaleResponse {
        language,
        next,
        button_label: localize(&dictionary, BUTTON_LABEL_KEY).map(String::from),
        show_ai_counselor: ctx.shows_ai_counselor(),
        query: ctx.query_param(),
        dictionary: (*dictionary).clone(),
    }))
}
