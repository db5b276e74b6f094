//! Instruction strings and the natural-language patcher.
//!
//! Instructions are stored as `"Key: Value; Key: Value"` text. The patcher
//! understands two change descriptions:
//!
//!   change <Key> [from <Old>] to <New>   replaces one instruction value
//!   switch <Old role> to [a|an] <New role>   swaps a role in the key roles
//!
//! A description that does not match leaves the text untouched, byte for
//! byte, and reports `applied: false`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Instruction options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionGroup {
    General,
    Attack,
    Defence,
}

#[derive(Debug, Clone, Copy)]
pub struct InstructionOption {
    pub group: InstructionGroup,
    pub key: &'static str,
    pub values: &'static [&'static str],
}

const YES_NO: &[&str] = &["Yes", "No"];
const SLOW_NORMAL_FAST: &[&str] = &["Slow", "Normal", "Fast"];

pub const OPTIONS: &[InstructionOption] = &[
    InstructionOption { group: InstructionGroup::General, key: "Width", values: &["Narrow", "Normal", "Wide"] },
    InstructionOption {
        group: InstructionGroup::General,
        key: "Mentality",
        values: &["V.Defensive", "Defensive", "Normal", "Attacking", "V.Attacking"],
    },
    InstructionOption { group: InstructionGroup::General, key: "Tempo", values: SLOW_NORMAL_FAST },
    InstructionOption {
        group: InstructionGroup::General,
        key: "Fluidity",
        values: &["Disciplined", "Normal", "Adventurous"],
    },
    InstructionOption { group: InstructionGroup::General, key: "Work Rate", values: SLOW_NORMAL_FAST },
    InstructionOption {
        group: InstructionGroup::General,
        key: "Creativity",
        values: &["Cautious", "Balanced", "Bold"],
    },
    InstructionOption {
        group: InstructionGroup::Attack,
        key: "Passing Style",
        values: &["Short", "Mixed", "Direct", "Long Ball"],
    },
    InstructionOption {
        group: InstructionGroup::Attack,
        key: "Attacking Style",
        values: &["Mixed", "Down Both Flanks", "Through the Middle"],
    },
    InstructionOption {
        group: InstructionGroup::Attack,
        key: "Forwards",
        values: &["Mixed", "Work ball into box", "Shoot on sight"],
    },
    InstructionOption {
        group: InstructionGroup::Attack,
        key: "Wide Play",
        values: &["Mixed", "Byline crosses", "Play early crosses", "Work ball into box"],
    },
    InstructionOption { group: InstructionGroup::Attack, key: "Build Up", values: SLOW_NORMAL_FAST },
    InstructionOption { group: InstructionGroup::Attack, key: "Counter Attack", values: YES_NO },
    InstructionOption {
        group: InstructionGroup::Defence,
        key: "Pressing",
        values: &["Own Area", "Own Half", "All Over"],
    },
    InstructionOption {
        group: InstructionGroup::Defence,
        key: "Tackling Style",
        values: &["Normal", "Hard", "Aggressive"],
    },
    InstructionOption { group: InstructionGroup::Defence, key: "Back Line", values: &["Low", "Normal", "High"] },
    InstructionOption { group: InstructionGroup::Defence, key: "Sweeper Keeper", values: YES_NO },
    InstructionOption { group: InstructionGroup::Defence, key: "Time Wasting", values: &["Low", "Normal", "High"] },
];

impl InstructionGroup {
    pub fn label(self) -> &'static str {
        match self {
            InstructionGroup::General => "General",
            InstructionGroup::Attack => "Attack",
            InstructionGroup::Defence => "Defence",
        }
    }

    pub fn options(self) -> impl Iterator<Item = &'static InstructionOption> {
        OPTIONS.iter().filter(move |o| o.group == self)
    }
}

/// Prompt section enumerating every allowed instruction value.
pub fn render_options() -> String {
    let mut out =
        String::from("**AVAILABLE TACTICAL INSTRUCTIONS (Strictly use these values)**\n");
    for group in [
        InstructionGroup::General,
        InstructionGroup::Attack,
        InstructionGroup::Defence,
    ] {
        let parts: Vec<String> = group
            .options()
            .map(|o| format!("{} ({})", o.key, o.values.join(", ")))
            .collect();
        out.push_str(&format!("- **{}:** {}\n", group.label(), parts.join(", ")));
    }
    out
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Pair { key: String, value: String },
    /// A segment with no `:`; kept as written.
    Raw(String),
}

/// Split `"Key: Value; Key: Value"` into ordered segments. Empty segments
/// (e.g. from a trailing `;`) are dropped.
pub fn parse(text: &str) -> Vec<Segment> {
    text.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|seg| match seg.split_once(':') {
            Some((k, v)) => Segment::Pair {
                key: k.trim().to_string(),
                value: v.trim().to_string(),
            },
            None => Segment::Raw(seg.to_string()),
        })
        .collect()
}

pub fn serialize(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            Segment::Pair { key, value } => format!("{key}: {value}"),
            Segment::Raw(raw) => raw.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Case-insensitive lookup of one instruction value.
pub fn get<'a>(segments: &'a [Segment], key: &str) -> Option<&'a str> {
    segments.iter().find_map(|s| match s {
        Segment::Pair { key: k, value } if keys_match(k, key) => Some(value.as_str()),
        _ => None,
    })
}

/// Keys compare case-insensitively and ignore internal spacing, so
/// `"Build up"`, `"Build Up"` and `"buildup"` are the same instruction.
fn keys_match(a: &str, b: &str) -> bool {
    let norm = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    norm(a) == norm(b)
}

// ---------------------------------------------------------------------------
// Patching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    pub text: String,
    pub applied: bool,
}

impl PatchOutcome {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            applied: false,
        }
    }
}

fn change_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bchange\s+(.+?)\s+(?:from\s+(.+?)\s+)?to\s+(.+)$").unwrap()
    })
}

fn switch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bswitch\s+(.+?)\s+to\s+(?:(?:a|an)\s+)?(.+)$").unwrap()
    })
}

fn role_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s+(midfielder|defender|forward|keeper|back)$").unwrap()
    })
}

/// Strip sentence punctuation and wrapping quotes from a captured phrase.
fn clean(s: &str) -> &str {
    s.trim()
        .trim_end_matches('.')
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
}

/// A `.` ends a sentence only when whitespace or the end of the text
/// follows, so values like `V.Attacking` stay whole.
fn ends_sentence(text: &str, dot: usize) -> bool {
    text[dot + 1..].chars().next().map_or(true, char::is_whitespace)
}

/// Split a description into trimmed, non-empty sentences. Newlines also
/// end a sentence.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c == '\n' || (c == '.' && ends_sentence(text, i)) {
            out.push(&text[start..=i]);
            start = i + 1;
        }
    }
    out.push(&text[start..]);
    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Only the first sentence of a description carries the change; the rest
/// is usually the model's reasoning ("... to Normal to be more compact.").
fn first_clause(description: &str) -> &str {
    let desc = description.trim();
    let end = desc
        .char_indices()
        .find(|(i, c)| *c == '.' && ends_sentence(desc, *i))
        .map(|(i, _)| i)
        .unwrap_or(desc.len());
    &desc[..end]
}

/// Apply `change <Key> [from <Old>] to <New>` to an instruction string.
pub fn apply_change(instructions: &str, description: &str) -> PatchOutcome {
    let Some(caps) = change_re().captures(first_clause(description)) else {
        tracing::warn!(description, "unrecognised instruction change");
        return PatchOutcome::unchanged(instructions);
    };
    let key = clean(&caps[1]);
    let new_value = strip_purpose(clean(&caps[3]));

    let mut segments = parse(instructions);
    let Some(value) = segments.iter_mut().find_map(|s| match s {
        Segment::Pair { key: k, value } if keys_match(k.as_str(), key) => Some(value),
        _ => None,
    }) else {
        tracing::warn!(key, "instruction key not found; leaving text unchanged");
        return PatchOutcome::unchanged(instructions);
    };
    *value = new_value.to_string();
    PatchOutcome {
        text: serialize(&segments),
        applied: true,
    }
}

/// `"Normal to be more compact"` → `"Normal"`: the new value ends where a
/// trailing purpose clause begins.
fn strip_purpose(value: &str) -> &str {
    match value.find(" to ") {
        Some(i) => value[..i].trim(),
        None => value,
    }
}

/// Apply `switch <Old> to [a|an] <New>` to a key-roles string.
pub fn apply_role_change(key_roles: &str, description: &str) -> PatchOutcome {
    let Some(caps) = switch_re().captures(first_clause(description)) else {
        tracing::warn!(description, "unrecognised role change");
        return PatchOutcome::unchanged(key_roles);
    };
    let old = clean(&caps[1]);
    let new = strip_purpose(clean(&caps[2]));

    if let Some(text) = replace_first_ci(key_roles, old, new) {
        return PatchOutcome { text, applied: true };
    }

    let stripped = role_suffix_re().replace(old, "");
    if stripped != old {
        if let Some(text) = replace_first_ci(key_roles, &stripped, new) {
            return PatchOutcome { text, applied: true };
        }
    }

    tracing::warn!(role = old, "role not found in key roles; leaving text unchanged");
    PatchOutcome::unchanged(key_roles)
}

/// Replace the first occurrence of `needle` (exact case first, then ASCII
/// case-insensitive).
fn replace_first_ci(haystack: &str, needle: &str, with: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    if let Some(i) = haystack.find(needle) {
        return Some(format!("{}{}{}", &haystack[..i], with, &haystack[i + needle.len()..]));
    }
    let pattern = format!("(?i){}", regex::escape(needle));
    let re = Regex::new(&pattern).ok()?;
    let m = re.find(haystack)?;
    Some(format!("{}{}{}", &haystack[..m.start()], with, &haystack[m.end()..]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_preserves_key_order() {
        let out = apply_change("Width: Wide; Mentality: Normal", "change Width from Wide to Narrow.");
        assert_eq!(out.text, "Width: Narrow; Mentality: Normal");
        assert!(out.applied);
    }

    #[test]
    fn change_without_from_and_with_reasoning() {
        let out = apply_change(
            "Width: Wide; Tempo: Fast",
            "Change Tempo to Normal to keep shape. This slows the game down.",
        );
        assert_eq!(out.text, "Width: Wide; Tempo: Normal");
    }

    #[test]
    fn change_matches_key_case_and_spacing_loosely() {
        let out = apply_change(
            "Passing: Direct; Build up: Fast",
            "Change 'Build Up' from Fast to \"Slow\"",
        );
        assert_eq!(out.text, "Passing: Direct; Build up: Slow");
    }

    #[test]
    fn miss_returns_input_byte_for_byte() {
        let input = "Width:Wide ;  Mentality: Normal;";
        let out = apply_change(input, "change Tempo from Fast to Slow");
        assert_eq!(out.text, input);
        assert!(!out.applied);

        let out = apply_change(input, "make the team better");
        assert_eq!(out.text, input);
        assert!(!out.applied);
    }

    #[test]
    fn raw_segments_survive_a_patch() {
        let out = apply_change("Width: Wide; keep it tight", "change width to Normal");
        assert_eq!(out.text, "Width: Normal; keep it tight");
    }

    #[test]
    fn role_switch_exact() {
        let roles = "GK: Keeper; MC: Box-to-box Midfielder; FC: Finisher";
        let out = apply_role_change(
            roles,
            "Switch Box-to-box Midfielder to a Ball-Winning Midfielder.",
        );
        assert_eq!(out.text, "GK: Keeper; MC: Ball-Winning Midfielder; FC: Finisher");
        assert!(out.applied);
    }

    #[test]
    fn role_switch_strips_positional_suffix() {
        let roles = "DC: Stopper; DMC: Ball-Winning; FC: Finisher";
        let out = apply_role_change(roles, "switch Ball-Winning Midfielder to a Deep-lying Playmaker");
        assert_eq!(out.text, "DC: Stopper; DMC: Deep-lying Playmaker; FC: Finisher");
    }

    #[test]
    fn role_switch_miss_is_noop() {
        let roles = "GK: Keeper";
        let out = apply_role_change(roles, "switch Target Man to an Finisher");
        assert_eq!(out.text, roles);
        assert!(!out.applied);
    }

    #[test]
    fn parse_and_get() {
        let segs = parse("Width: Wide; Counter Attack: Yes;");
        assert_eq!(segs.len(), 2);
        assert_eq!(get(&segs, "counter attack"), Some("Yes"));
        assert_eq!(get(&segs, "Tempo"), None);
    }

    #[test]
    fn options_render_every_group() {
        let s = render_options();
        assert!(s.contains("- **General:** Width (Narrow, Normal, Wide)"));
        assert!(s.contains("Sweeper Keeper (Yes, No)"));
        assert_eq!(InstructionGroup::Attack.options().count(), 6);
    }

    #[test]
    fn sentences_keep_dotted_values_whole() {
        assert_eq!(
            sentences("Change Mentality to V.Attacking. Change Tempo to Fast.\nMore pace"),
            ["Change Mentality to V.Attacking.", "Change Tempo to Fast.", "More pace"]
        );
        assert!(sentences("  ").is_empty());
    }
}
