use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TACTICIAN_DIR: &str = ".tactician";
pub const STORE_DIR: &str = ".tactician/store";
pub const EXPORTS_DIR: &str = ".tactician/exports";

pub const CONFIG_FILE: &str = ".tactician/config.yaml";

pub const MATCH_HISTORY_EXPORT: &str = "sm26_match_history.json";
pub const KNOWLEDGE_EXPORT: &str = "sm26_ai_knowledge.txt";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn tactician_dir(root: &Path) -> PathBuf {
    root.join(TACTICIAN_DIR)
}

pub fn store_dir(root: &Path) -> PathBuf {
    root.join(STORE_DIR)
}

pub fn exports_dir(root: &Path) -> PathBuf {
    root.join(EXPORTS_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Default export location for a tactic file, named after the tactic.
pub fn tactic_export_path(root: &Path, tactic_name: &str) -> PathBuf {
    exports_dir(root).join(format!("{}.json", crate::io::file_stem_for(tactic_name)))
}

pub fn match_history_export_path(root: &Path) -> PathBuf {
    exports_dir(root).join(MATCH_HISTORY_EXPORT)
}

pub fn knowledge_export_path(root: &Path) -> PathBuf {
    exports_dir(root).join(KNOWLEDGE_EXPORT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/club");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/club/.tactician/config.yaml")
        );
        assert_eq!(
            store_dir(root),
            PathBuf::from("/tmp/club/.tactician/store")
        );
        assert_eq!(
            tactic_export_path(root, "My Press 4-3-3"),
            PathBuf::from("/tmp/club/.tactician/exports/my_press_4_3_3.json")
        );
    }
}
