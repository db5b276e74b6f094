//! Built-in community tactics, shipped with the binary.

use crate::tactic::DetailedTactic;
use std::sync::OnceLock;

const COMMUNITY_JSON: &str = include_str!("../assets/community_tactics.json");

/// Every community tactic, in catalogue order.
pub fn community_tactics() -> &'static [DetailedTactic] {
    static CATALOG: OnceLock<Vec<DetailedTactic>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        // The asset is compiled in and covered by tests below.
        serde_json::from_str(COMMUNITY_JSON).unwrap_or_default()
    })
}

pub fn find(name: &str) -> Option<&'static DetailedTactic> {
    community_tactics().iter().find(|t| t.tactic_name == name)
}

/// Names of every tactic a match can be logged against: community first,
/// then the user's saved tactics.
pub fn available_tactic_names(saved: &[DetailedTactic]) -> Vec<String> {
    community_tactics()
        .iter()
        .chain(saved.iter())
        .map(|t| t.tactic_name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parses_and_is_complete() {
        let all: Vec<DetailedTactic> = serde_json::from_str(COMMUNITY_JSON).unwrap();
        assert_eq!(all.len(), community_tactics().len());
        assert!(all.len() >= 9);
        for t in &all {
            assert!(!t.tactic_name.is_empty());
            assert!(!t.general_instructions.is_empty());
            assert!(!t.is_favorite);
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = community_tactics().iter().map(|t| &t.tactic_name).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn find_and_available_names() {
        assert!(find("Park the Bus 5-4-1").is_some());
        assert!(find("Nope").is_none());

        let saved = vec![crate::tactic::fixtures::tactic("Mine")];
        let names = available_tactic_names(&saved);
        assert_eq!(names.first().map(String::as_str), Some("Gegenpress Inferno 4-3-3"));
        assert_eq!(names.last().map(String::as_str), Some("Mine"));
    }
}
