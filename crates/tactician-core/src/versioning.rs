//! Derive a new tactic version from an improvement suggestion.

use crate::advisor::TacticImprovementSuggestion;
use crate::instructions::{self, PatchOutcome};
use crate::tactic::{DetailedTactic, TacticField};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// The result of versioning a tactic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionReport {
    pub tactic: DetailedTactic,
    /// Fields that at least one suggested change was applied to.
    pub applied: Vec<TacticField>,
    /// Fields that had a suggestion which matched nothing.
    pub missed: Vec<TacticField>,
}

fn version_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+v\d+$").unwrap())
}

/// `"Press v3"` → `"Press"`.
pub fn base_name(name: &str) -> &str {
    match version_suffix_re().find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// First `"<base> vN"` (N ≥ 2) not already taken.
pub fn version_name<'a, I>(name: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = taken.into_iter().collect();
    let base = base_name(name);
    (2u32..)
        .map(|n| format!("{base} v{n}"))
        .find(|candidate| !taken.contains(&candidate.as_str()))
        .unwrap_or_else(|| format!("{base} v2"))
}

/// Apply every sentence in `description` that looks like a change, in order.
fn apply_all(
    text: &str,
    description: &str,
    verb: &str,
    apply: fn(&str, &str) -> PatchOutcome,
) -> PatchOutcome {
    let mut out = PatchOutcome {
        text: text.to_string(),
        applied: false,
    };
    for sentence in instructions::sentences(description)
        .into_iter()
        .filter(|s| s.to_lowercase().contains(verb))
    {
        let step = apply(&out.text, sentence);
        if step.applied {
            out = PatchOutcome {
                text: step.text,
                applied: true,
            };
        }
    }
    out
}

/// Build the next version of `original`. The original is not modified; the
/// new tactic is never a favourite.
pub fn derive_version<'a, I>(
    original: &DetailedTactic,
    improvement: &TacticImprovementSuggestion,
    taken_names: I,
) -> VersionReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tactic = original.clone();
    tactic.is_favorite = false;
    tactic.tactic_name = version_name(&original.tactic_name, taken_names);

    let changes = &improvement.suggested_changes;
    let plan: [(TacticField, Option<&String>, &str, fn(&str, &str) -> PatchOutcome); 4] = [
        (TacticField::GeneralInstructions, changes.general.as_ref(), "change", instructions::apply_change),
        (TacticField::AttackInstructions, changes.attack.as_ref(), "change", instructions::apply_change),
        (TacticField::DefenceInstructions, changes.defence.as_ref(), "change", instructions::apply_change),
        (TacticField::KeyRoles, changes.key_roles.as_ref(), "switch", instructions::apply_role_change),
    ];

    let mut applied = Vec::new();
    let mut missed = Vec::new();
    for (field, description, verb, apply) in plan {
        let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
            continue;
        };
        let out = apply_all(tactic.field(field), description, verb, apply);
        if out.applied {
            *tactic.field_mut(field) = out.text;
            applied.push(field);
        } else {
            missed.push(field);
        }
    }

    VersionReport {
        tactic,
        applied,
        missed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::types::SuggestedChanges;
    use crate::tactic::fixtures::tactic;

    fn improvement(changes: SuggestedChanges) -> TacticImprovementSuggestion {
        TacticImprovementSuggestion {
            analysis: "Too open.".into(),
            suggested_changes: changes,
            justification: "Tighter.".into(),
        }
    }

    #[test]
    fn names_skip_taken_versions() {
        assert_eq!(version_name("Press", ["Press"]), "Press v2");
        assert_eq!(version_name("Press", ["Press", "Press v2"]), "Press v3");
        assert_eq!(version_name("Press v2", ["Press", "Press v2"]), "Press v3");
        assert_eq!(version_name("Press v10", ["Press v2"]), "Press v3");
        assert_eq!(base_name("4-3-3 v"), "4-3-3 v");
    }

    #[test]
    fn derives_patched_copy_and_leaves_original() {
        let mut original = tactic("Press");
        original.is_favorite = true;
        let before = original.clone();
        let imp = improvement(SuggestedChanges {
            general: Some("Change Width from Wide to Narrow. This keeps us compact.".into()),
            attack: Some("Change Passing from Direct to Short. Change Counter Attack to No.".into()),
            defence: Some("Lower the line a bit.".into()),
            key_roles: Some("Switch Box-to-box Midfielder to a Ball-Winning Midfielder.".into()),
        });

        let report = derive_version(&original, &imp, ["Press", "Press v2"]);
        assert_eq!(original, before);

        let t = &report.tactic;
        assert_eq!(t.tactic_name, "Press v3");
        assert!(!t.is_favorite);
        assert_eq!(t.general_instructions, "Width: Narrow; Mentality: Normal");
        assert_eq!(t.attack_instructions, "Passing: Short; Counter Attack: No");
        assert_eq!(t.defence_instructions, original.defence_instructions);
        assert_eq!(t.key_roles, "GK: Keeper; MC: Ball-Winning Midfielder; FC: Finisher");
        assert_eq!(
            report.applied,
            vec![
                TacticField::GeneralInstructions,
                TacticField::AttackInstructions,
                TacticField::KeyRoles
            ]
        );
        assert_eq!(report.missed, vec![TacticField::DefenceInstructions]);
    }

    #[test]
    fn empty_suggestion_still_versions() {
        let original = tactic("Press");
        let report = derive_version(&original, &improvement(SuggestedChanges::default()), ["Press"]);
        assert_eq!(report.tactic.tactic_name, "Press v2");
        assert!(report.applied.is_empty() && report.missed.is_empty());
    }

    #[test]
    fn dotted_option_values_survive_versioning() {
        let imp = improvement(SuggestedChanges {
            general: Some("Change Mentality from Normal to V.Attacking. This pushes us up.".into()),
            defence: Some("Change Back Line to Low.\nChange Pressing to Own Half.".into()),
            ..SuggestedChanges::default()
        });
        let report = derive_version(&tactic("Press"), &imp, ["Press"]);
        assert_eq!(report.tactic.general_instructions, "Width: Wide; Mentality: V.Attacking");
        assert_eq!(report.tactic.defence_instructions, "Pressing: Own Half; Back Line: Low");
    }
}

