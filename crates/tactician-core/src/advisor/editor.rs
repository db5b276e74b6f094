//! Editing a tactic suggestion before it is saved, with undo/redo.
//!
//! Every edit pushes a full snapshot; undoing then editing discards the
//! redo tail. Reset pushes a copy of the original reply, so it can itself
//! be undone.

use super::types::{canonical_option, Slot, TacticSuggestion};
use crate::error::{Result, TacticianError};
use crate::instructions::InstructionGroup;
use crate::roles;

#[derive(Debug, Clone)]
pub struct SuggestionEditor {
    original: TacticSuggestion,
    history: Vec<TacticSuggestion>,
    index: usize,
}

impl SuggestionEditor {
    pub fn new(suggestion: TacticSuggestion) -> Self {
        Self {
            original: suggestion.clone(),
            history: vec![suggestion],
            index: 0,
        }
    }

    pub fn current(&self) -> &TacticSuggestion {
        &self.history[self.index]
    }

    pub fn original(&self) -> &TacticSuggestion {
        &self.original
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.history.len()
    }

    fn push(&mut self, next: TacticSuggestion) {
        self.history.truncate(self.index + 1);
        self.history.push(next);
        self.index = self.history.len() - 1;
    }

    /// Change one instruction. `key` may be the display key (`"Work Rate"`)
    /// or the reply field (`"workRate"`); `value` must be one of the allowed
    /// options, or `Yes`/`No` for switches.
    pub fn set_instruction(&mut self, group: InstructionGroup, key: &str, value: &str) -> Result<()> {
        let mut next = self.current().clone();
        let norm = |s: &str| s.replace(' ', "").to_ascii_lowercase();
        let wanted = norm(key);
        let (display, slot) = next
            .slots(group)
            .into_iter()
            .find(|(k, _)| norm(k) == wanted)
            .ok_or_else(|| {
                TacticianError::InvalidEdit(format!("no {} instruction named '{key}'", group.label()))
            })?;
        match slot {
            Slot::Text(field) => {
                let canonical = canonical_option(display, value).ok_or_else(|| {
                    TacticianError::InvalidEdit(format!("'{value}' is not a valid {display} option"))
                })?;
                *field = canonical.to_string();
            }
            Slot::Flag(field) => {
                *field = match value.trim().to_ascii_lowercase().as_str() {
                    "yes" | "true" => true,
                    "no" | "false" => false,
                    _ => {
                        return Err(TacticianError::InvalidEdit(format!(
                            "{display} takes Yes or No, not '{value}'"
                        )))
                    }
                };
            }
        }
        self.push(next);
        Ok(())
    }

    /// Change the role of the player at `index`. Known positions only accept
    /// the roles listed for them.
    pub fn set_role(&mut self, index: usize, role: &str) -> Result<()> {
        let mut next = self.current().clone();
        let player = next
            .player_roles
            .get_mut(index)
            .ok_or_else(|| TacticianError::InvalidEdit(format!("no player at index {index}")))?;
        let role = match roles::roles_for(&player.position) {
            Some(allowed) => allowed
                .iter()
                .find(|r| r.eq_ignore_ascii_case(role.trim()))
                .map(|r| r.to_string())
                .ok_or_else(|| {
                    TacticianError::InvalidEdit(format!(
                        "'{role}' is not a role for {}; choose one of: {}",
                        player.position,
                        allowed.join(", ")
                    ))
                })?,
            None => role.trim().to_string(),
        };
        player.role = role;
        self.push(next);
        Ok(())
    }

    /// Step back one edit. Returns `false` when already at the first state.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn reset(&mut self) {
        let original = self.original.clone();
        self.push(original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::types::fixtures::suggestion;

    #[test]
    fn edits_undo_and_redo() {
        let mut ed = SuggestionEditor::new(suggestion());
        assert!(!ed.can_undo());

        ed.set_instruction(InstructionGroup::General, "width", "narrow").unwrap();
        ed.set_instruction(InstructionGroup::Attack, "counterAttack", "No").unwrap();
        assert_eq!(ed.current().general.width, "Narrow");
        assert!(!ed.current().attack.counter_attack);

        assert!(ed.undo());
        assert!(ed.current().attack.counter_attack);
        assert!(ed.redo());
        assert!(!ed.current().attack.counter_attack);
        assert!(!ed.redo());
    }

    #[test]
    fn editing_after_undo_drops_redo_tail() {
        let mut ed = SuggestionEditor::new(suggestion());
        ed.set_instruction(InstructionGroup::General, "Tempo", "Slow").unwrap();
        ed.undo();
        ed.set_instruction(InstructionGroup::General, "Work Rate", "Normal").unwrap();
        assert!(!ed.can_redo());
        assert_eq!(ed.current().general.tempo, "Fast");
        assert_eq!(ed.current().general.work_rate, "Normal");
    }

    #[test]
    fn reset_is_undoable() {
        let mut ed = SuggestionEditor::new(suggestion());
        ed.set_role(2, "target man").unwrap();
        assert_eq!(ed.current().player_roles[2].role, "Target Man");
        ed.reset();
        assert_eq!(ed.current(), ed.original());
        assert!(ed.undo());
        assert_eq!(ed.current().player_roles[2].role, "Target Man");
    }

    #[test]
    fn invalid_edits_leave_history_alone() {
        let mut ed = SuggestionEditor::new(suggestion());
        assert!(ed.set_instruction(InstructionGroup::General, "Width", "Huge").is_err());
        assert!(ed.set_instruction(InstructionGroup::Defence, "Width", "Wide").is_err());
        assert!(ed.set_instruction(InstructionGroup::Defence, "Sweeper Keeper", "maybe").is_err());
        assert!(ed.set_role(0, "Finisher").is_err());
        assert!(ed.set_role(9, "Keeper").is_err());
        assert!(!ed.can_undo());
    }
}
