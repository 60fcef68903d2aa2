use std::sync::Arc;

use crate::config::Config;
use crate::i18n::dictionary::DictionaryStore;
use crate::llm_client::LanguageModel;
use crate::scholarships::ScholarshipStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model backend. Production: `GeminiClient`.
    pub llm: Arc<dyn LanguageModel>,
    pub scholarships: ScholarshipStore,
    /// Per-language site dictionaries, cached after first load.
    pub dictionaries: Arc<DictionaryStore>,
    pub config: Config,
}
