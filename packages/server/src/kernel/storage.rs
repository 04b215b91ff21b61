//! Persisted local state: the API key and the scan history.
//!
//! Plain files in a platform-local data directory. Missing or corrupt files
//! load as empty defaults — persistence failures must never take down a
//! scan session, so saves are best-effort and only logged.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::domains::scanning::history::{HistoryEntry, MAX_HISTORY};

const API_KEY_FILE: &str = "api_key";
const HISTORY_FILE: &str = "history.json";

/// File-backed store for the credential and history.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at the given directory, creating it if needed.
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open the default platform-local store (`<data_local_dir>/mailscan`).
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_local_dir().context("no local data directory available")?;
        Self::open(base.join("mailscan"))
    }

    pub fn load_api_key(&self) -> Option<String> {
        let raw = fs::read_to_string(self.dir.join(API_KEY_FILE)).ok()?;
        let key = raw.trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    pub fn save_api_key(&self, api_key: &str) {
        if let Err(e) = fs::write(self.dir.join(API_KEY_FILE), api_key) {
            tracing::warn!(error = %e, "failed to persist API key");
        }
    }

    /// Load history, oldest first. Corrupt or missing files load as empty.
    pub fn load_history(&self) -> Vec<HistoryEntry> {
        let path = self.dir.join(HISTORY_FILE);
        match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!(error = %e, path = %path.display(), "corrupt history file, starting empty");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    /// Save history, keeping only the most recent [`MAX_HISTORY`] entries.
    pub fn save_history(&self, history: &[HistoryEntry]) {
        let start = history.len().saturating_sub(MAX_HISTORY);
        let limited = &history[start..];
        match serde_json::to_string(limited) {
            Ok(data) => {
                if let Err(e) = fs::write(self.dir.join(HISTORY_FILE), data) {
                    tracing::warn!(error = %e, "failed to persist history");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize history"),
        }
    }

    pub fn clear_history(&self) {
        let _ = fs::remove_file(self.dir.join(HISTORY_FILE));
    }
}
