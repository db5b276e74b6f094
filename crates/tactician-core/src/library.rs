//! Browsing the tactic library: search, favourites, comparison.

use crate::catalog;
use crate::error::Result;
use crate::storage::{keys, load_json, save_json, Storage};
use crate::tactic::{DetailedTactic, TacticField};
use serde::{Deserialize, Serialize};

pub const SEARCH_HISTORY_LIMIT: usize = 5;
pub const COMPARE_LIMIT: usize = 2;

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryQuery {
    /// Case-insensitive substring of the name or formation.
    pub text: String,
    pub favorites_only: bool,
}

impl LibraryQuery {
    pub fn matches(&self, tactic: &DetailedTactic) -> bool {
        let needle = self.text.to_lowercase();
        tactic.tactic_name.to_lowercase().contains(&needle)
            || tactic.formation.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LibraryView {
    /// Matching saved tactics, favourites first.
    pub saved: Vec<DetailedTactic>,
    /// Matching community tactics; empty when only favourites are shown.
    pub community: Vec<DetailedTactic>,
}

pub fn browse(saved: &[DetailedTactic], query: &LibraryQuery) -> LibraryView {
    let mut mine: Vec<DetailedTactic> = saved
        .iter()
        .filter(|t| query.matches(t) && (!query.favorites_only || t.is_favorite))
        .cloned()
        .collect();
    mine.sort_by_key(|t| !t.is_favorite);

    let community = if query.favorites_only {
        Vec::new()
    } else {
        catalog::community_tactics()
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect()
    };
    LibraryView {
        saved: mine,
        community,
    }
}

/// Look a tactic up by exact name, saved tactics first.
pub fn find<'a>(saved: &'a [DetailedTactic], name: &str) -> Option<&'a DetailedTactic> {
    saved
        .iter()
        .find(|t| t.tactic_name == name)
        .or_else(|| catalog::find(name))
}

// ---------------------------------------------------------------------------
// Search history
// ---------------------------------------------------------------------------

pub fn load_search_history<S: Storage + ?Sized>(storage: &S) -> Result<Vec<String>> {
    Ok(load_json(storage, keys::SEARCH_HISTORY)?.unwrap_or_default())
}

/// Remember a submitted search, newest first. Blank and repeated queries are
/// ignored. Returns whether the history changed.
pub fn record_search<S: Storage + ?Sized>(storage: &S, query: &str) -> Result<bool> {
    let mut history = load_search_history(storage)?;
    if query.trim().is_empty() || history.iter().any(|h| h == query) {
        return Ok(false);
    }
    history.insert(0, query.to_string());
    history.truncate(SEARCH_HISTORY_LIMIT);
    save_json(storage, keys::SEARCH_HISTORY, &history)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Tactics picked for side-by-side comparison, at most two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareSelection {
    names: Vec<String>,
}

impl CompareSelection {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Select or deselect `name`. Selecting a third tactic is refused.
    /// Returns whether `name` is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(i) = self.names.iter().position(|n| n == name) {
            self.names.remove(i);
            return false;
        }
        if self.names.len() < COMPARE_LIMIT {
            self.names.push(name.to_string());
            return true;
        }
        false
    }

    pub fn is_full(&self) -> bool {
        self.names.len() >= COMPARE_LIMIT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub field: TacticField,
    pub label: &'static str,
    pub left: String,
    pub right: String,
    pub differs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub left: String,
    pub right: String,
    pub rows: Vec<ComparisonRow>,
}

/// Field-by-field comparison; every field but the name gets a row.
pub fn compare(left: &DetailedTactic, right: &DetailedTactic) -> Comparison {
    let rows = TacticField::ALL
        .into_iter()
        .filter(|f| *f != TacticField::TacticName)
        .map(|field| {
            let (l, r) = (left.field(field), right.field(field));
            ComparisonRow {
                field,
                label: field.label(),
                left: l.to_string(),
                right: r.to_string(),
                differs: l != r,
            }
        })
        .collect();
    Comparison {
        left: left.tactic_name.clone(),
        right: right.tactic_name.clone(),
        rows,
    }
}
