//! The advisor's knowledge base: one plain-text blob.

use crate::error::Result;
use crate::storage::{keys, Storage};
use std::path::Path;

/// Stored knowledge, or an empty string when none has been generated.
pub fn load<S: Storage + ?Sized>(storage: &S) -> Result<String> {
    Ok(storage.get(keys::AI_KNOWLEDGE)?.unwrap_or_default())
}

/// Replace the knowledge base. Blank text removes it.
pub fn store<S: Storage + ?Sized>(storage: &S, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        storage.remove(keys::AI_KNOWLEDGE)?;
        return Ok(());
    }
    storage.set(keys::AI_KNOWLEDGE, text)
}

pub fn read_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

pub fn write_file(path: &Path, text: &str) -> Result<()> {
    crate::io::atomic_write(path, text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use tempfile::TempDir;

    #[test]
    fn blank_text_clears_the_key() {
        let storage = MemoryStorage::new();
        assert_eq!(load(&storage).unwrap(), "");
        store(&storage, "Press works away.").unwrap();
        assert_eq!(load(&storage).unwrap(), "Press works away.");
        store(&storage, "  \n").unwrap();
        assert!(!storage.contains(keys::AI_KNOWLEDGE).unwrap());
    }

    #[test]
    fn file_round_trip_is_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exports/knowledge.txt");
        let text = "Line one\n\n- bullet ✓\n";
        write_file(&path, text).unwrap();
        assert_eq!(read_file(&path).unwrap(), text);
    }
}
