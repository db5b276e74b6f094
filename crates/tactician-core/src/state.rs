//! The application state container.
//!
//! [`State`] mirrors the saved tactics, match history and knowledge base in
//! memory. Every mutation builds the next collection, writes it through to
//! the store, and only then replaces the in-memory copy, so a failed write
//! leaves both sides as they were.

use crate::advisor::TacticImprovementSuggestion;
use crate::badges::{self, Badge};
use crate::capability::{pulse, Capabilities};
use crate::catalog;
use crate::draft::{self, MatchDraft};
use crate::error::{Result, TacticianError};
use crate::knowledge;
use crate::matches::{self, MatchData, NewMatch};
use crate::storage::{keys, load_json, save_json, Storage};
use crate::tactic::{self, DetailedTactic};
use crate::versioning::{self, VersionReport};

pub const CLEAR_HISTORY_PROMPT: &str =
    "Are you sure you want to delete all match history? This action cannot be undone.";

pub struct State<S: Storage> {
    storage: S,
    caps: Capabilities,
    saved_tactics: Vec<DetailedTactic>,
    match_history: Vec<MatchData>,
    knowledge: String,
}

impl<S: Storage> std::fmt::Debug for State<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("saved_tactics", &self.saved_tactics.len())
            .field("match_history", &self.match_history.len())
            .field("knowledge_bytes", &self.knowledge.len())
            .finish_non_exhaustive()
    }
}

impl<S: Storage> State<S> {
    // -----------------------------------------------------------------------
    // Loading and access
    // -----------------------------------------------------------------------

    pub fn load(storage: S, caps: Capabilities) -> Result<Self> {
        let saved_tactics = load_json(&storage, keys::SAVED_TACTICS)?.unwrap_or_default();
        let match_history = load_json(&storage, keys::MATCH_HISTORY)?.unwrap_or_default();
        let knowledge = knowledge::load(&storage)?;
        Ok(Self {
            storage,
            caps,
            saved_tactics,
            match_history,
            knowledge,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn saved_tactics(&self) -> &[DetailedTactic] {
        &self.saved_tactics
    }

    pub fn match_history(&self) -> &[MatchData] {
        &self.match_history
    }

    pub fn knowledge(&self) -> &str {
        &self.knowledge
    }

    /// Knowledge to feed into prompts, if any has been stored.
    pub fn knowledge_context(&self) -> Option<&str> {
        Some(self.knowledge.as_str()).filter(|k| !k.trim().is_empty())
    }

    /// Community tactics followed by saved ones.
    pub fn all_tactics(&self) -> Vec<&DetailedTactic> {
        catalog::community_tactics()
            .iter()
            .chain(self.saved_tactics.iter())
            .collect()
    }

    /// Saved tactics shadow community ones with the same name.
    pub fn find_tactic(&self, name: &str) -> Option<&DetailedTactic> {
        crate::library::find(&self.saved_tactics, name)
    }

    pub fn badges(&self) -> Vec<Badge> {
        badges::badges(self.saved_tactics.len(), self.match_history.len())
    }

    // -----------------------------------------------------------------------
    // Tactics
    // -----------------------------------------------------------------------

    fn commit_tactics(&mut self, next: Vec<DetailedTactic>) -> Result<()> {
        save_json(&self.storage, keys::SAVED_TACTICS, &next)?;
        self.saved_tactics = next;
        Ok(())
    }

    /// Add a tactic to the saved set. Names must be unique.
    pub fn save_tactic(&mut self, tactic: DetailedTactic) -> Result<()> {
        if self
            .saved_tactics
            .iter()
            .any(|t| t.tactic_name == tactic.tactic_name)
        {
            return Err(TacticianError::DuplicateTactic(tactic.tactic_name));
        }
        let mut next = self.saved_tactics.clone();
        next.push(tactic);
        self.commit_tactics(next)?;
        self.caps.haptics.pulse(pulse::CONFIRM);
        Ok(())
    }

    pub fn import_tactic(&mut self, raw: &str) -> Result<DetailedTactic> {
        let tactic = tactic::parse_tactic_file(raw)?;
        self.save_tactic(tactic.clone())?;
        Ok(tactic)
    }

    pub fn export_tactic(&self, name: &str) -> Result<String> {
        let tactic = self
            .find_tactic(name)
            .ok_or_else(|| TacticianError::TacticNotFound(name.to_string()))?;
        tactic::to_tactic_file(tactic)
    }

    pub fn delete_tactic(&mut self, name: &str) -> Result<()> {
        if !self.saved_tactics.iter().any(|t| t.tactic_name == name) {
            return Err(TacticianError::TacticNotFound(name.to_string()));
        }
        let next = self
            .saved_tactics
            .iter()
            .filter(|t| t.tactic_name != name)
            .cloned()
            .collect();
        self.commit_tactics(next)?;
        self.caps.haptics.pulse(pulse::REMOVE);
        Ok(())
    }

    /// Flip a saved tactic's favourite flag. Returns the new value.
    pub fn toggle_favorite(&mut self, name: &str) -> Result<bool> {
        let mut next = self.saved_tactics.clone();
        let tactic = next
            .iter_mut()
            .find(|t| t.tactic_name == name)
            .ok_or_else(|| TacticianError::TacticNotFound(name.to_string()))?;
        tactic.is_favorite = !tactic.is_favorite;
        let now = tactic.is_favorite;
        self.commit_tactics(next)?;
        self.caps.haptics.pulse(pulse::TOGGLE);
        Ok(now)
    }

    /// Save a new version of `name` with the suggested changes applied.
    pub fn version_tactic(
        &mut self,
        name: &str,
        improvement: &TacticImprovementSuggestion,
    ) -> Result<VersionReport> {
        let original = self
            .find_tactic(name)
            .ok_or_else(|| TacticianError::TacticNotFound(name.to_string()))?;
        let taken = self.all_tactics();
        let report = versioning::derive_version(
            original,
            improvement,
            taken.iter().map(|t| t.tactic_name.as_str()),
        );
        self.save_tactic(report.tactic.clone())?;
        Ok(report)
    }

    /// Copy a tactic's share text to the clipboard. `Ok(false)` when the
    /// host has no clipboard.
    pub fn copy_tactic(&self, name: &str) -> Result<bool> {
        let tactic = self
            .find_tactic(name)
            .ok_or_else(|| TacticianError::TacticNotFound(name.to_string()))?;
        let copied = self.caps.clipboard.copy(&tactic::share_text(tactic))?;
        if copied {
            self.caps.haptics.pulse(pulse::CONFIRM);
        }
        Ok(copied)
    }

    // -----------------------------------------------------------------------
    // Match history
    // -----------------------------------------------------------------------

    fn commit_history(&mut self, next: Vec<MatchData>) -> Result<()> {
        save_json(&self.storage, keys::MATCH_HISTORY, &next)?;
        self.match_history = next;
        Ok(())
    }

    pub fn add_match(&mut self, m: NewMatch) -> Result<MatchData> {
        m.validate()?;
        let mut next = self.match_history.clone();
        let created = matches::append(&mut next, m);
        self.commit_history(next)?;
        self.caps.haptics.pulse(pulse::CONFIRM);
        Ok(created)
    }

    /// Append a batch in order, numbered after the current maximum.
    pub fn add_matches(&mut self, batch: Vec<NewMatch>) -> Result<Vec<MatchData>> {
        let mut next = self.match_history.clone();
        let created = matches::append_all(&mut next, batch);
        self.commit_history(next)?;
        self.caps.haptics.pulse(pulse::CONFIRM);
        Ok(created)
    }

    /// Log a scanned batch, every entry under `tactic`.
    pub fn bulk_import(&mut self, batch: Vec<NewMatch>, tactic: &str) -> Result<Vec<MatchData>> {
        if tactic.trim().is_empty() {
            return Err(TacticianError::MissingField("Please choose a tactic for the imported matches.".into()));
        }
        self.add_matches(draft::with_tactic(batch, tactic))
    }

    pub fn import_history(&mut self, raw: &str) -> Result<Vec<MatchData>> {
        let batch = matches::parse_history_file(raw)?;
        self.add_matches(batch)
    }

    pub fn export_history(&self) -> Result<String> {
        matches::to_history_file(&self.match_history)
    }

    pub fn delete_match(&mut self, id: &str) -> Result<()> {
        if !self.match_history.iter().any(|m| m.id == id) {
            return Err(TacticianError::MatchNotFound(id.to_string()));
        }
        let next = self
            .match_history
            .iter()
            .filter(|m| m.id != id)
            .cloned()
            .collect();
        self.commit_history(next)?;
        self.caps.haptics.pulse(pulse::REMOVE);
        Ok(())
    }

    /// Delete every logged match. Without confirmation nothing changes,
    /// in memory or in the store. Returns how many matches were removed.
    pub fn clear_history(&mut self, confirmed: bool) -> Result<usize> {
        if !confirmed {
            return Err(TacticianError::ConfirmationRequired(CLEAR_HISTORY_PROMPT.into()));
        }
        self.storage.remove(keys::MATCH_HISTORY)?;
        let removed = std::mem::take(&mut self.match_history).len();
        self.caps.haptics.pulse(pulse::CLEAR_ALL);
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Draft
    // -----------------------------------------------------------------------

    pub fn load_draft(&self) -> MatchDraft {
        MatchDraft::load(&self.storage, &self.match_history, &self.saved_tactics)
    }

    /// Log the drafted match and start a fresh form.
    pub fn submit_draft(&mut self, draft: &mut MatchDraft) -> Result<MatchData> {
        let created = self.add_match(draft.submission()?)?;
        draft.reset(&self.storage, &self.match_history, &self.saved_tactics)?;
        Ok(created)
    }

    pub fn clear_draft(&self, draft: &mut MatchDraft, confirmed: bool) -> Result<()> {
        draft.clear(
            &self.storage,
            &self.match_history,
            &self.saved_tactics,
            confirmed,
        )?;
        self.caps.haptics.pulse(pulse::REMOVE);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Knowledge
    // -----------------------------------------------------------------------

    pub fn set_knowledge(&mut self, text: &str) -> Result<()> {
        knowledge::store(&self.storage, text)?;
        self.knowledge = if text.trim().is_empty() {
            String::new()
        } else {
            text.to_string()
        };
        self.caps.haptics.pulse(pulse::CONFIRM);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
