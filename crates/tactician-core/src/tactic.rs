//! Saved tactics and the portable tactic file.
//!
//! Instruction fields are free-form `"Key: Value; Key: Value"` strings; see
//! [`crate::instructions`] for the patcher that edits them.

use crate::error::{Result, TacticianError};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedTactic {
    pub tactic_name: String,
    pub formation: String,
    pub key_roles: String,
    pub general_instructions: String,
    pub attack_instructions: String,
    pub defence_instructions: String,
    pub best_for_tips: String,
    #[serde(default)]
    pub is_favorite: bool,
}

/// The string fields of a tactic, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TacticField {
    TacticName,
    Formation,
    KeyRoles,
    GeneralInstructions,
    AttackInstructions,
    DefenceInstructions,
    BestForTips,
}

impl TacticField {
    pub const ALL: [TacticField; 7] = [
        TacticField::TacticName,
        TacticField::Formation,
        TacticField::KeyRoles,
        TacticField::GeneralInstructions,
        TacticField::AttackInstructions,
        TacticField::DefenceInstructions,
        TacticField::BestForTips,
    ];

    /// The JSON key used in tactic files.
    pub fn json_key(self) -> &'static str {
        match self {
            TacticField::TacticName => "tacticName",
            TacticField::Formation => "formation",
            TacticField::KeyRoles => "keyRoles",
            TacticField::GeneralInstructions => "generalInstructions",
            TacticField::AttackInstructions => "attackInstructions",
            TacticField::DefenceInstructions => "defenceInstructions",
            TacticField::BestForTips => "bestForTips",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TacticField::TacticName => "Tactic Name",
            TacticField::Formation => "Formation",
            TacticField::KeyRoles => "Key Roles",
            TacticField::GeneralInstructions => "General Instructions",
            TacticField::AttackInstructions => "Attack Instructions",
            TacticField::DefenceInstructions => "Defence Instructions",
            TacticField::BestForTips => "Best For / Tips",
        }
    }
}

impl DetailedTactic {
    pub fn field(&self, field: TacticField) -> &str {
        match field {
            TacticField::TacticName => &self.tactic_name,
            TacticField::Formation => &self.formation,
            TacticField::KeyRoles => &self.key_roles,
            TacticField::GeneralInstructions => &self.general_instructions,
            TacticField::AttackInstructions => &self.attack_instructions,
            TacticField::DefenceInstructions => &self.defence_instructions,
            TacticField::BestForTips => &self.best_for_tips,
        }
    }

    pub fn field_mut(&mut self, field: TacticField) -> &mut String {
        match field {
            TacticField::TacticName => &mut self.tactic_name,
            TacticField::Formation => &mut self.formation,
            TacticField::KeyRoles => &mut self.key_roles,
            TacticField::GeneralInstructions => &mut self.general_instructions,
            TacticField::AttackInstructions => &mut self.attack_instructions,
            TacticField::DefenceInstructions => &mut self.defence_instructions,
            TacticField::BestForTips => &mut self.best_for_tips,
        }
    }
}

// ---------------------------------------------------------------------------
// Tactic file
// ---------------------------------------------------------------------------

/// On-disk shape of an exported tactic: every field except `isFavorite`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TacticFile<'a> {
    tactic_name: &'a str,
    formation: &'a str,
    key_roles: &'a str,
    general_instructions: &'a str,
    attack_instructions: &'a str,
    defence_instructions: &'a str,
    best_for_tips: &'a str,
}

/// Parse an imported tactic file.
///
/// All seven string fields must be present and non-empty. Whatever the file
/// says about favourites, the imported tactic starts unfavourited.
pub fn parse_tactic_file(raw: &str) -> Result<DetailedTactic> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| TacticianError::InvalidTacticFile(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| TacticianError::InvalidTacticFile("expected a JSON object".into()))?;

    let mut tactic = DetailedTactic {
        tactic_name: String::new(),
        formation: String::new(),
        key_roles: String::new(),
        general_instructions: String::new(),
        attack_instructions: String::new(),
        defence_instructions: String::new(),
        best_for_tips: String::new(),
        is_favorite: false,
    };
    for field in TacticField::ALL {
        let key = field.json_key();
        match obj.get(key).and_then(|v| v.as_str()) {
            Some(s) if !s.trim().is_empty() => *tactic.field_mut(field) = s.to_string(),
            _ => {
                return Err(TacticianError::InvalidTacticFile(format!(
                    "missing or empty field '{key}'"
                )))
            }
        }
    }
    Ok(tactic)
}

/// Render a tactic as a pretty-printed tactic file.
pub fn to_tactic_file(tactic: &DetailedTactic) -> Result<String> {
    let file = TacticFile {
        tactic_name: &tactic.tactic_name,
        formation: &tactic.formation,
        key_roles: &tactic.key_roles,
        general_instructions: &tactic.general_instructions,
        attack_instructions: &tactic.attack_instructions,
        defence_instructions: &tactic.defence_instructions,
        best_for_tips: &tactic.best_for_tips,
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

/// Plain-text rendering used when copying a tactic to the clipboard.
pub fn share_text(tactic: &DetailedTactic) -> String {
    format!(
        "Tactic Name: {}\nFormation: {}\n\nKey Roles:\n{}\n\nGeneral Instructions:\n{}\n\nAttack Instructions:\n{}\n\nDefence Instructions:\n{}\n\nBest For / Tips:\n{}",
        tactic.tactic_name,
        tactic.formation,
        tactic.key_roles,
        tactic.general_instructions,
        tactic.attack_instructions,
        tactic.defence_instructions,
        tactic.best_for_tips,
    )
    .trim()
    .to_string()
}

/// Link-safe identifier: lowercased, whitespace runs collapsed to `-`,
/// then percent-encoded.
pub fn share_slug(tactic_name: &str) -> String {
    let dashed = tactic_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    percent_encode(&dashed)
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use super::DetailedTactic;

    pub fn tactic(name: &str) -> DetailedTactic {
        DetailedTactic {
            tactic_name: name.to_string(),
            formation: "4-3-3".to_string(),
            key_roles: "GK: Keeper; MC: Box-to-box Midfielder; FC: Finisher".to_string(),
            general_instructions: "Width: Wide; Mentality: Normal".to_string(),
            attack_instructions: "Passing: Direct; Counter Attack: Yes".to_string(),
            defence_instructions: "Pressing: All Over; Back Line: High".to_string(),
            best_for_tips: "Fast wingers.".to_string(),
            is_favorite: false,
        }
    }
}
