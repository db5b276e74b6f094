use crate::instructions::{self, InstructionGroup};
use crate::tactic::DetailedTactic;
use serde::{Deserialize, Serialize};

// ─── Tactic suggestion ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticSuggestion {
    pub formation: String,
    pub general: GeneralInstructions,
    pub attack: AttackInstructions,
    pub defence: DefenceInstructions,
    pub player_roles: Vec<PlayerRole>,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInstructions {
    pub width: String,
    pub mentality: String,
    pub tempo: String,
    pub fluidity: String,
    pub work_rate: String,
    pub creativity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackInstructions {
    pub passing_style: String,
    pub attacking_style: String,
    pub forwards: String,
    pub wide_play: String,
    pub build_up: String,
    pub counter_attack: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenceInstructions {
    pub pressing: String,
    pub tackling_style: String,
    pub back_line: String,
    pub sweeper_keeper: bool,
    pub time_wasting: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRole {
    pub position: String,
    pub role: String,
}

fn yes_no(b: bool) -> String {
    if b { "Yes" } else { "No" }.to_string()
}

/// One instruction slot of a suggestion: its display key and a mutable
/// handle on the value.
pub(crate) enum Slot<'a> {
    Text(&'a mut String),
    Flag(&'a mut bool),
}

impl GeneralInstructions {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Width", self.width.clone()),
            ("Mentality", self.mentality.clone()),
            ("Tempo", self.tempo.clone()),
            ("Fluidity", self.fluidity.clone()),
            ("Work Rate", self.work_rate.clone()),
            ("Creativity", self.creativity.clone()),
        ]
    }

    fn slots(&mut self) -> Vec<(&'static str, Slot<'_>)> {
        vec![
            ("Width", Slot::Text(&mut self.width)),
            ("Mentality", Slot::Text(&mut self.mentality)),
            ("Tempo", Slot::Text(&mut self.tempo)),
            ("Fluidity", Slot::Text(&mut self.fluidity)),
            ("Work Rate", Slot::Text(&mut self.work_rate)),
            ("Creativity", Slot::Text(&mut self.creativity)),
        ]
    }
}

impl AttackInstructions {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Passing Style", self.passing_style.clone()),
            ("Attacking Style", self.attacking_style.clone()),
            ("Forwards", self.forwards.clone()),
            ("Wide Play", self.wide_play.clone()),
            ("Build Up", self.build_up.clone()),
            ("Counter Attack", yes_no(self.counter_attack)),
        ]
    }

    fn slots(&mut self) -> Vec<(&'static str, Slot<'_>)> {
        vec![
            ("Passing Style", Slot::Text(&mut self.passing_style)),
            ("Attacking Style", Slot::Text(&mut self.attacking_style)),
            ("Forwards", Slot::Text(&mut self.forwards)),
            ("Wide Play", Slot::Text(&mut self.wide_play)),
            ("Build Up", Slot::Text(&mut self.build_up)),
            ("Counter Attack", Slot::Flag(&mut self.counter_attack)),
        ]
    }
}

impl DefenceInstructions {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Pressing", self.pressing.clone()),
            ("Tackling Style", self.tackling_style.clone()),
            ("Back Line", self.back_line.clone()),
            ("Sweeper Keeper", yes_no(self.sweeper_keeper)),
            ("Time Wasting", self.time_wasting.clone()),
        ]
    }

    fn slots(&mut self) -> Vec<(&'static str, Slot<'_>)> {
        vec![
            ("Pressing", Slot::Text(&mut self.pressing)),
            ("Tackling Style", Slot::Text(&mut self.tackling_style)),
            ("Back Line", Slot::Text(&mut self.back_line)),
            ("Sweeper Keeper", Slot::Flag(&mut self.sweeper_keeper)),
            ("Time Wasting", Slot::Text(&mut self.time_wasting)),
        ]
    }
}

fn join_pairs(pairs: Vec<(&'static str, String)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl TacticSuggestion {
    pub(crate) fn slots(&mut self, group: InstructionGroup) -> Vec<(&'static str, Slot<'_>)> {
        match group {
            InstructionGroup::General => self.general.slots(),
            InstructionGroup::Attack => self.attack.slots(),
            InstructionGroup::Defence => self.defence.slots(),
        }
    }

    /// `"GK: Keeper; DC: Stopper; ..."`
    pub fn key_roles(&self) -> String {
        self.player_roles
            .iter()
            .map(|r| format!("{}: {}", r.position, r.role))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Flatten into a saveable tactic named `name`.
    pub fn to_tactic(&self, name: &str) -> DetailedTactic {
        DetailedTactic {
            tactic_name: name.to_string(),
            formation: self.formation.clone(),
            key_roles: self.key_roles(),
            general_instructions: join_pairs(self.general.pairs()),
            attack_instructions: join_pairs(self.attack.pairs()),
            defence_instructions: join_pairs(self.defence.pairs()),
            best_for_tips: self.justification.clone(),
            is_favorite: false,
        }
    }
}

/// Resolve a user-typed value against the allowed options for `key`,
/// returning the canonical spelling.
pub(crate) fn canonical_option(key: &str, value: &str) -> Option<&'static str> {
    instructions::OPTIONS
        .iter()
        .find(|o| o.key == key)?
        .values
        .iter()
        .find(|v| v.eq_ignore_ascii_case(value.trim()))
        .copied()
}

// ─── Other replies ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPrediction {
    pub predicted_score: String,
    pub key_events: Vec<String>,
    pub justification: String,
    pub win_probability: WinProbability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinProbability {
    pub team_a: f64,
    pub draw: f64,
    pub team_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRoleSuggestion {
    pub role: String,
    pub score: f64,
    pub justification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticImprovementSuggestion {
    pub analysis: String,
    #[serde(default)]
    pub suggested_changes: SuggestedChanges,
    pub justification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_roles: Option<String>,
}

/// A match read off a result screenshot. Only the opponent is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMatch {
    pub opponent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possession: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots_on_target: Option<f64>,
}

/// One row of a match-history screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub opponent: String,
    pub score: String,
}
