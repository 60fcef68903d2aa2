use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::info;

use crate::i18n::Language;

/// Translation key → HTML snippet for one language.
pub type Dictionary = BTreeMap<String, String>;

/// Key holding the toggle button's label in every dictionary.
pub const BUTTON_LABEL_KEY: &str = "btn_text";

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("Failed to read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed dictionary {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loads `<root>/lang/<code>.json` on first use and keeps it for the process lifetime.
pub struct DictionaryStore {
    root: PathBuf,
    loaded: RwLock<HashMap<Language, Arc<Dictionary>>>,
}

impl DictionaryStore {
    pub fn new(site_root: impl Into<PathBuf>) -> Self {
        Self {
            root: site_root.into(),
            loaded: RwLock::new(HashMap::new()),
        }
    }

    fn path_for(&self, language: Language) -> PathBuf {
        self.root
            .join("lang")
            .join(format!("{}.json", language.code()))
    }

    pub fn is_loaded(&self, language: Language) -> bool {
        self.loaded
            .read()
            .map(|map| map.contains_key(&language))
            .unwrap_or(false)
    }

    /// Returns the cached dictionary, reading it from disk only the first time.
    /// The lock is never held across the file read.
    pub async fn load(&self, language: Language) -> Result<Arc<Dictionary>, I18nError> {
        let cached = self
            .loaded
            .read()
            .ok()
            .and_then(|m| m.get(&language).cloned());
        if let Some(dict) = cached {
            return Ok(dict);
        }

        let path = self.path_for(language);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| I18nError::Io {
                path: path.clone(),
                source,
            })?;
        let dict: Dictionary =
            serde_json::from_str(&raw).map_err(|source| I18nError::Parse {
                path: path.clone(),
                source,
            })?;
        let dict = Arc::new(dict);

        info!(
            "Loaded {} dictionary ({} keys)",
            language.code(),
            dict.len()
        );

        if let Ok(mut map) = self.loaded.write() {
            map.entry(language).or_insert_with(|| dict.clone());
        }
        Ok(dict)
    }
}

/// Looks up a translation key. Missing keys leave the element untouched client-side.
pub fn localize<'d>(dictionary: &'d Dictionary, key: &str) -> Option<&'d str> {
    dictionary.get(key).map(String::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site_with(lang: &str, body: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lang")).unwrap();
        fs::write(dir.path().join("lang").join(format!("{lang}.json")), body).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_reads_and_caches() {
        let dir = site_with("en", r#"{"btn_text": "EN", "nav_home": "Home"}"#);
        let store = DictionaryStore::new(dir.path());

        assert!(!store.is_loaded(Language::En));
        let dict = store.load(Language::En).await.unwrap();
        assert_eq!(localize(&dict, BUTTON_LABEL_KEY), Some("EN"));
        assert!(store.is_loaded(Language::En));

        // Second load is served from the cache even if the file disappears.
        fs::remove_file(dir.path().join("lang/en.json")).unwrap();
        let again = store.load(Language::En).await.unwrap();
        assert!(Arc::ptr_eq(&dict, &again));
    }

    #[tokio::test]
    async fn test_missing_dictionary_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        assert!(matches!(store.load(Language::Ru).await, Err(I18nError::Io { .. })));
    }

    #[tokio::test]
    async fn test_malformed_dictionary_is_parse_error() {
        let dir = site_with("az", "not json");
        let store = DictionaryStore::new(dir.path());
        assert!(matches!(
            store.load(Language::Az).await,
            Err(I18nError::Parse { .. })
        ));
    }

    #[test]
    fn test_localize_skips_empty_values() {
        let mut dict = Dictionary::new();
        dict.insert("hero_title".into(), String::new());
        assert_eq!(localize(&dict, "hero_title"), None);
        assert_eq!(localize(&dict, "missing"), None);
    }
}
