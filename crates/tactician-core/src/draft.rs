//! The match-logging form: an autosaved draft and its three-step wizard.
//!
//! The draft is written to the store on every change, minus attached
//! screenshots (they stay in memory only). Draft writes are best-effort: a
//! failure is logged and the in-memory draft carries on.

use crate::advisor::{AdvisorError, ExtractedMatch, HistoryEntry, NO_HISTORY_MATCHES, NO_MATCH_DATA};
use crate::catalog;
use crate::error::{Result, TacticianError};
use crate::matches::{MatchData, NewMatch};
use crate::storage::{keys, Storage};
use crate::tactic::DetailedTactic;
use serde::{Deserialize, Serialize};

pub const CLEAR_DRAFT_PROMPT: &str =
    "Are you sure you want to clear the form? Any unsaved data will be lost.";

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Tactic,
    Images,
    Details,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Tactic, WizardStep::Images, WizardStep::Details];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Tactic => "Tactic",
            WizardStep::Images => "Images",
            WizardStep::Details => "Details",
        }
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDraft {
    pub step: WizardStep,
    pub form: NewMatch,
}

/// What a screenshot scan did to the draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// One match found; its fields now fill the draft.
    Merged,
    /// Several matches found; they await a bulk import with one tactic.
    Batch { matches: Vec<NewMatch> },
}

/// Tactic a fresh form starts on: the one used last, else the first in the
/// library.
pub fn default_tactic(history: &[MatchData], saved: &[DetailedTactic]) -> Option<String> {
    history
        .last()
        .map(|m| m.tactic_used.clone())
        .or_else(|| catalog::available_tactic_names(saved).into_iter().next())
}

impl MatchDraft {
    fn blank(history: &[MatchData], saved: &[DetailedTactic]) -> Self {
        Self {
            step: WizardStep::Tactic,
            form: NewMatch {
                tactic_used: default_tactic(history, saved).unwrap_or_default(),
                ..NewMatch::default()
            },
        }
    }

    /// Restore the stored draft over a blank form. An unreadable draft is
    /// dropped with a warning.
    pub fn load<S: Storage + ?Sized>(
        storage: &S,
        history: &[MatchData],
        saved: &[DetailedTactic],
    ) -> Self {
        let mut draft = Self::blank(history, saved);
        let stored = match storage.get(keys::MATCH_DRAFT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return draft,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read match draft");
                return draft;
            }
        };
        match serde_json::from_str::<NewMatch>(&stored) {
            Ok(form) => {
                let fallback = std::mem::take(&mut draft.form.tactic_used);
                draft.form = form;
                if draft.form.tactic_used.is_empty() {
                    draft.form.tactic_used = fallback;
                }
            }
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable match draft"),
        }
        draft
    }

    /// Persist the form without its screenshots.
    pub fn save<S: Storage + ?Sized>(&self, storage: &S) {
        let form = NewMatch {
            match_images: Vec::new(),
            ..self.form.clone()
        };
        let result = serde_json::to_string(&form)
            .map_err(TacticianError::from)
            .and_then(|raw| storage.set(keys::MATCH_DRAFT, &raw));
        match result {
            Ok(()) => {}
            Err(e @ TacticianError::QuotaExceeded { .. }) => tracing::warn!(
                error = %e,
                "failed to save match draft: storage quota exceeded, notes may be too long"
            ),
            Err(e) => tracing::warn!(error = %e, "failed to save match draft"),
        }
    }

    /// Set one form field by its JSON name and autosave.
    pub fn set_field<S: Storage + ?Sized>(&mut self, storage: &S, field: &str, value: &str) -> Result<()> {
        let number = |v: &str| -> Result<u32> {
            if v.trim().is_empty() {
                return Ok(0);
            }
            v.trim()
                .parse::<f64>()
                .map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
                .map_err(|_| TacticianError::InvalidEdit(format!("{field} must be a number, got '{v}'")))
        };
        let optional = |v: &str| -> Result<Option<u32>> {
            if v.trim().is_empty() {
                Ok(None)
            } else {
                number(v).map(Some)
            }
        };
        let form = &mut self.form;
        match field {
            "tacticUsed" => form.tactic_used = value.to_string(),
            "opponent" => form.opponent = value.to_string(),
            "score" => form.score = value.to_string(),
            "notes" => form.notes = value.to_string(),
            "possession" => form.possession = number(value)?,
            "shots" => form.shots = number(value)?,
            "shotsOnTarget" => form.shots_on_target = number(value)?,
            "opponentPossession" => form.opponent_possession = optional(value)?,
            "opponentShots" => form.opponent_shots = optional(value)?,
            "opponentShotsOnTarget" => form.opponent_shots_on_target = optional(value)?,
            other => {
                return Err(TacticianError::InvalidEdit(format!("unknown match field '{other}'")))
            }
        }
        self.save(storage);
        Ok(())
    }

    pub fn attach_images(&mut self, data_urls: impl IntoIterator<Item = String>) {
        self.form.match_images.extend(data_urls);
    }

    pub fn clear_images(&mut self) {
        self.form.match_images.clear();
    }

    pub fn can_advance(&self) -> bool {
        self.step.next().is_some() && !self.form.tactic_used.trim().is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.step.prev().is_some()
    }

    /// Move to the next step. A tactic must be chosen first.
    pub fn advance(&mut self) -> Result<WizardStep> {
        if self.form.tactic_used.trim().is_empty() {
            return Err(TacticianError::MissingField("Please choose a tactic first.".into()));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back one step; a no-op on the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Validate and hand out the finished match. The caller logs it and
    /// then calls [`MatchDraft::reset`].
    pub fn submission(&self) -> Result<NewMatch> {
        self.form.validate()?;
        Ok(self.form.clone())
    }

    /// Back to a blank form on the first step, dropping the stored draft.
    pub fn reset<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        history: &[MatchData],
        saved: &[DetailedTactic],
    ) -> Result<()> {
        storage.remove(keys::MATCH_DRAFT)?;
        *self = Self::blank(history, saved);
        Ok(())
    }

    /// Like [`MatchDraft::reset`], but only once the user has confirmed.
    pub fn clear<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        history: &[MatchData],
        saved: &[DetailedTactic],
        confirmed: bool,
    ) -> Result<()> {
        if !confirmed {
            return Err(TacticianError::ConfirmationRequired(CLEAR_DRAFT_PROMPT.into()));
        }
        self.reset(storage, history, saved)
    }

    /// Fold a screenshot scan into the form. One match merges into the
    /// draft (and autosaves); several come back as a batch and the attached
    /// screenshots are released.
    pub fn apply_scan<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        scanned: Vec<ExtractedMatch>,
    ) -> Result<ScanOutcome> {
        match scanned.len() {
            0 => Err(AdvisorError::NothingDetected(NO_MATCH_DATA).into()),
            1 => {
                self.form.merge_extracted(&scanned[0]);
                self.save(storage);
                Ok(ScanOutcome::Merged)
            }
            _ => {
                self.clear_images();
                Ok(ScanOutcome::Batch {
                    matches: scanned.iter().map(NewMatch::from_extracted).collect(),
                })
            }
        }
    }
}

/// Matches read off a history screenshot, ready for a bulk import.
pub fn history_batch(entries: &[HistoryEntry]) -> Result<Vec<NewMatch>> {
    if entries.is_empty() {
        return Err(AdvisorError::NothingDetected(NO_HISTORY_MATCHES).into());
    }
    Ok(entries.iter().map(NewMatch::from_history_entry).collect())
}

/// Stamp one tactic on every match of a batch.
pub fn with_tactic(batch: Vec<NewMatch>, tactic: &str) -> Vec<NewMatch> {
    batch
        .into_iter()
        .map(|m| NewMatch {
            tactic_used: tactic.to_string(),
            ..m
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
