//! Scholarship records, read from a flat JSON array on disk.
//!
//! The file is re-read on every request that needs it; there is no cache.
//! Reads use `tokio::fs`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub mod filter;
pub mod handlers;

pub use filter::{filter, ScholarshipQuery};

/// Sentinel in `eligible_citizenships` that admits every citizenship.
pub const ANY_CITIZENSHIP: &str = "all";
/// Sentinel requested country that matches every target country.
pub const ANY_EU_COUNTRY: &str = "EU";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    pub name: String,
    pub target_country: String,
    #[serde(default)]
    pub eligible_citizenships: Vec<String>,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Error)]
pub enum ScholarshipError {
    #[error("Failed to read scholarships file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed scholarships file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ScholarshipStore {
    path: PathBuf,
}

impl ScholarshipStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<ScholarshipRecord>, ScholarshipError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ScholarshipError::Io {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| ScholarshipError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Like `load`, but a missing or corrupt file degrades to no scholarships.
    pub async fn load_or_empty(&self) -> Vec<ScholarshipRecord> {
        match self.load().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Continuing without scholarship data: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;

    use tempfile::NamedTempFile;

    /// Writes a small scholarship fixture and returns the handle keeping it alive.
    pub fn fixture_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "DAAD Study Scholarship", "target_country": "Germany",
                  "eligible_citizenships": ["all"], "amount": "€934/month",
                  "deadline": "October", "description": "Graduate study in Germany"}},
                {{"name": "Türkiye Burslari", "target_country": "Germany",
                  "eligible_citizenships": ["Turkey"], "amount": "Full",
                  "deadline": "February", "description": "Restricted"}},
                {{"name": "Eiffel Excellence", "target_country": "France",
                  "eligible_citizenships": ["Azerbaijan", "Georgia"], "amount": "€1,181/month",
                  "deadline": "January", "description": "Master and PhD"}},
                {{"name": "Chevening", "target_country": "United Kingdom",
                  "eligible_citizenships": ["azerbaijan"], "amount": "Full",
                  "deadline": "November", "description": "One-year master"}}
            ]"#
        )
        .unwrap();
        file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_reads_records() {
        let file = test_support::fixture_file();
        let records = ScholarshipStore::new(file.path()).load().await.unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].eligible_citizenships, vec!["all".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error_and_degrades_to_empty() {
        let store = ScholarshipStore::new("/nonexistent/scholarships.json");
        assert!(matches!(store.load().await, Err(ScholarshipError::Io { .. })));
        assert!(store.load_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error_and_degrades_to_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"{not an array").unwrap();
        let store = ScholarshipStore::new(file.path());
        assert!(matches!(store.load().await, Err(ScholarshipError::Parse { .. })));
        assert!(store.load_or_empty().await.is_empty());
    }
}
