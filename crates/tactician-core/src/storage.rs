//! Flat string-keyed persistence.
//!
//! Every collection the app keeps is a single value under a single key:
//! JSON for structured data, plain text for the knowledge base, theme and
//! update tag. Writes replace the whole value.
//!
//! Layout (file backend):
//!   .tactician/store/<key>   one file per key

use crate::error::{Result, TacticianError};
use crate::{io, paths};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persisted key names.
pub mod keys {
    pub const SAVED_TACTICS: &str = "sm26_saved_tactics";
    pub const MATCH_HISTORY: &str = "sm26_match_history";
    pub const AI_KNOWLEDGE: &str = "sm26_ai_knowledge";
    pub const UPDATE_VIEWED: &str = "sm26_update_viewed";
    pub const MATCH_DRAFT: &str = "sm26_match_form_draft";
    pub const SEARCH_HISTORY: &str = "sm26_tactic_search_history";
    pub const THEME: &str = "sm26_theme";
}

// ---------------------------------------------------------------------------
// Storage trait
// ---------------------------------------------------------------------------

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Returns `true` if the key existed.
    fn remove(&self, key: &str) -> Result<bool>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

fn check_quota(quota: Option<usize>, key: &str, value: &str) -> Result<()> {
    match quota {
        Some(limit) if value.len() > limit => Err(TacticianError::QuotaExceeded {
            key: key.to_string(),
            bytes: value.len(),
            limit,
        }),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Storage rooted at `<root>/.tactician/store`. The directory is created
    /// lazily on the first write.
    pub fn open(root: &Path) -> Self {
        Self {
            dir: paths::store_dir(root),
            quota: None,
        }
    }

    /// Cap the size of any single value, in bytes.
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    fn entry(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        check_quota(self.quota, key, value)?;
        io::atomic_write(&self.entry(key), value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        io::remove_if_exists(&self.entry(key))
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        check_quota(self.quota, key, value)?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.lock().remove(key).is_some())
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

/// Read and decode a JSON value. Missing or blank entries are `None`.
pub fn load_json<T, S>(storage: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    match storage.get(key)? {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}

pub fn save_json<T, S>(storage: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
