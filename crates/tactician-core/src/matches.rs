//! Match history: logging, numbering, import/export and per-tactic stats.
//!
//! `matchNumber` is the running maximum plus one at insertion time, so a
//! number is never reused after a deletion.

use crate::advisor::{ExtractedMatch, HistoryEntry};
use crate::error::{Result, TacticianError};
use serde::{Deserialize, Serialize};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Opponent and Score are required fields.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    pub id: String,
    #[serde(deserialize_with = "rounded::deserialize")]
    pub match_number: u32,
    pub tactic_used: String,
    pub opponent: String,
    pub score: String,
    #[serde(deserialize_with = "rounded::deserialize")]
    pub possession: u32,
    #[serde(deserialize_with = "rounded::deserialize")]
    pub shots: u32,
    #[serde(deserialize_with = "rounded::deserialize")]
    pub shots_on_target: u32,
    pub notes: String,
    #[serde(default)]
    pub match_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "rounded::option")]
    pub opponent_possession: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "rounded::option")]
    pub opponent_shots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "rounded::option")]
    pub opponent_shots_on_target: Option<u32>,
}

/// A match before it has an id and number. Missing fields take the blank
/// form defaults (possession 50, zeros, empty strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewMatch {
    pub tactic_used: String,
    pub opponent: String,
    pub score: String,
    #[serde(deserialize_with = "rounded::deserialize")]
    pub possession: u32,
    #[serde(deserialize_with = "rounded::deserialize")]
    pub shots: u32,
    #[serde(deserialize_with = "rounded::deserialize")]
    pub shots_on_target: u32,
    pub notes: String,
    pub match_images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "rounded::option")]
    pub opponent_possession: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "rounded::option")]
    pub opponent_shots: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "rounded::option")]
    pub opponent_shots_on_target: Option<u32>,
}

impl Default for NewMatch {
    fn default() -> Self {
        Self {
            tactic_used: String::new(),
            opponent: String::new(),
            score: String::new(),
            possession: 50,
            shots: 0,
            shots_on_target: 0,
            notes: String::new(),
            match_images: Vec::new(),
            opponent_possession: None,
            opponent_shots: None,
            opponent_shots_on_target: None,
        }
    }
}

fn count(v: f64) -> u32 {
    v.round().clamp(0.0, u32::MAX as f64) as u32
}

/// Counts written by other tools may be fractional (`55.5`); round them.
mod rounded {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        f64::deserialize(d).map(super::count)
    }

    pub fn option<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.map(super::count))
    }
}

impl NewMatch {
    pub fn validate(&self) -> Result<()> {
        if self.opponent.trim().is_empty() || self.score.trim().is_empty() {
            return Err(TacticianError::MissingField(REQUIRED_FIELDS_MESSAGE.into()));
        }
        Ok(())
    }

    /// Overlay whatever a screenshot scan found.
    pub fn merge_extracted(&mut self, scan: &ExtractedMatch) {
        self.opponent = scan.opponent.clone();
        if let Some(score) = &scan.score {
            self.score = score.clone();
        }
        if let Some(p) = scan.possession {
            self.possession = count(p);
        }
        if let Some(s) = scan.shots {
            self.shots = count(s);
        }
        if let Some(s) = scan.shots_on_target {
            self.shots_on_target = count(s);
        }
    }

    pub fn from_extracted(scan: &ExtractedMatch) -> Self {
        let mut m = Self::default();
        m.merge_extracted(scan);
        m
    }

    pub fn from_history_entry(entry: &HistoryEntry) -> Self {
        Self {
            opponent: entry.opponent.clone(),
            score: entry.score.clone(),
            ..Self::default()
        }
    }

    fn into_match(self, id: String, match_number: u32) -> MatchData {
        MatchData {
            id,
            match_number,
            tactic_used: self.tactic_used,
            opponent: self.opponent,
            score: self.score,
            possession: self.possession,
            shots: self.shots,
            shots_on_target: self.shots_on_target,
            notes: self.notes,
            match_images: self.match_images,
            opponent_possession: self.opponent_possession,
            opponent_shots: self.opponent_shots,
            opponent_shots_on_target: self.opponent_shots_on_target,
        }
    }
}

impl From<&MatchData> for NewMatch {
    fn from(m: &MatchData) -> Self {
        Self {
            tactic_used: m.tactic_used.clone(),
            opponent: m.opponent.clone(),
            score: m.score.clone(),
            possession: m.possession,
            shots: m.shots,
            shots_on_target: m.shots_on_target,
            notes: m.notes.clone(),
            match_images: m.match_images.clone(),
            opponent_possession: m.opponent_possession,
            opponent_shots: m.opponent_shots,
            opponent_shots_on_target: m.opponent_shots_on_target,
        }
    }
}

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

pub fn max_match_number(history: &[MatchData]) -> u32 {
    history.iter().map(|m| m.match_number).max().unwrap_or(0)
}

pub fn next_match_number(history: &[MatchData]) -> u32 {
    max_match_number(history) + 1
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Append a batch, numbering it `max+1 ..` in input order. Returns the
/// created matches.
pub fn append_all(history: &mut Vec<MatchData>, batch: Vec<NewMatch>) -> Vec<MatchData> {
    let base = max_match_number(history);
    let created: Vec<MatchData> = batch
        .into_iter()
        .enumerate()
        .map(|(i, m)| m.into_match(new_id(), base + 1 + i as u32))
        .collect();
    history.extend(created.iter().cloned());
    created
}

pub fn append(history: &mut Vec<MatchData>, m: NewMatch) -> MatchData {
    let number = next_match_number(history);
    let created = m.into_match(new_id(), number);
    history.push(created.clone());
    created
}

// ---------------------------------------------------------------------------
// History file
// ---------------------------------------------------------------------------

/// Parse an exported history. The first entry must carry string `opponent`
/// and `score` fields; ids and numbers in the file are ignored.
pub fn parse_history_file(raw: &str) -> Result<Vec<NewMatch>> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| TacticianError::InvalidMatchFile(e.to_string()))?;
    let items = value
        .as_array()
        .ok_or_else(|| TacticianError::InvalidMatchFile("expected a JSON array".into()))?;
    if let Some(first) = items.first() {
        let ok = first.get("opponent").is_some_and(|v| v.is_string())
            && first.get("score").is_some_and(|v| v.is_string());
        if !ok {
            return Err(TacticianError::InvalidMatchFile(
                "first entry needs string 'opponent' and 'score'".into(),
            ));
        }
    }
    serde_json::from_value(value).map_err(|e| TacticianError::InvalidMatchFile(e.to_string()))
}

pub fn to_history_file(history: &[MatchData]) -> Result<String> {
    Ok(serde_json::to_string_pretty(history)?)
}

// ---------------------------------------------------------------------------
// Results and statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// Parse `"3-1"` (user's goals first). Spaces and en dashes are tolerated.
pub fn parse_score(score: &str) -> Option<(u32, u32)> {
    let normalised = score.replace('\u{2013}', "-");
    let (a, b) = normalised.split_once('-')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

pub fn outcome(score: &str) -> Option<Outcome> {
    let (a, b) = parse_score(score)?;
    Some(match a.cmp(&b) {
        std::cmp::Ordering::Greater => Outcome::Win,
        std::cmp::Ordering::Equal => Outcome::Draw,
        std::cmp::Ordering::Less => Outcome::Loss,
    })
}

pub fn for_tactic<'a>(history: &'a [MatchData], tactic: &str) -> Vec<&'a MatchData> {
    history.iter().filter(|m| m.tactic_used == tactic).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TacticStats {
    pub tactic: String,
    pub played: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub goals_for: u32,
    pub goals_against: u32,
    pub avg_possession: f64,
}

pub fn stats_for(history: &[MatchData], tactic: &str) -> TacticStats {
    let played = for_tactic(history, tactic);
    let mut stats = TacticStats {
        tactic: tactic.to_string(),
        played: played.len(),
        ..TacticStats::default()
    };
    for m in &played {
        if let Some((gf, ga)) = parse_score(&m.score) {
            stats.goals_for += gf;
            stats.goals_against += ga;
        }
        match outcome(&m.score) {
            Some(Outcome::Win) => stats.wins += 1,
            Some(Outcome::Draw) => stats.draws += 1,
            Some(Outcome::Loss) => stats.losses += 1,
            None => {}
        }
    }
    if !played.is_empty() {
        let total: u32 = played.iter().map(|m| m.possession).sum();
        stats.avg_possession = total as f64 / played.len() as f64;
    }
    stats
}

/// Stats for every tactic that appears in the history, first use first.
pub fn stats_by_tactic(history: &[MatchData]) -> Vec<TacticStats> {
    let mut seen: Vec<&str> = Vec::new();
    for m in history {
        if !seen.contains(&m.tactic_used.as_str()) {
            seen.push(&m.tactic_used);
        }
    }
    seen.into_iter().map(|t| stats_for(history, t)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::new_match;

    #[test]
    fn numbering_starts_at_one_and_survives_deletes() {
        let mut history = Vec::new();
        assert_eq!(append(&mut history, new_match("A", "X", "1-0")).match_number, 1);
        append(&mut history, new_match("A", "Y", "2-0"));
        history.retain(|m| m.match_number != 2);
        append(&mut history, new_match("A", "Z", "0-0"));
        let nums: Vec<_> = history.iter().map(|m| m.match_number).collect();
        assert_eq!(nums, vec![1, 2]);

        history.retain(|m| m.match_number != 1);
        assert_eq!(append(&mut history, new_match("A", "W", "0-1")).match_number, 3);
    }

    #[test]
    fn bulk_numbers_follow_input_order() {
        let mut history = Vec::new();
        append(&mut history, new_match("A", "X", "1-0"));
        let mut m7 = append(&mut history, new_match("A", "Y", "1-0"));
        m7.match_number = 7;
        history[1] = m7;

        let created = append_all(
            &mut history,
            vec![new_match("A", "P", "1-1"), new_match("A", "Q", "2-2"), new_match("A", "R", "3-3")],
        );
        let nums: Vec<_> = created.iter().map(|m| (m.opponent.as_str(), m.match_number)).collect();
        assert_eq!(nums, vec![("P", 8), ("Q", 9), ("R", 10)]);
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn ids_are_unique() {
        let mut history = Vec::new();
        let created = append_all(&mut history, vec![new_match("A", "P", "1-1"); 3]);
        assert_ne!(created[0].id, created[1].id);
        assert_ne!(created[1].id, created[2].id);
    }

    #[test]
    fn export_then_import_preserves_everything_but_identity() {
        let mut history = Vec::new();
        let mut first = new_match("A", "P", "1-1");
        first.opponent_shots = Some(9);
        first.notes = "wet pitch".into();
        append_all(&mut history, vec![first, new_match("B", "Q", "0-3")]);

        let file = to_history_file(&history).unwrap();
        let mut fresh = Vec::new();
        let imported = append_all(&mut fresh, parse_history_file(&file).unwrap());

        assert_eq!(imported.len(), 2);
        for (a, b) in history.iter().zip(imported.iter()) {
            assert_eq!(NewMatch::from(a), NewMatch::from(b));
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn import_checks_first_entry() {
        assert!(parse_history_file("[]").unwrap().is_empty());
        assert!(parse_history_file(r#"{"opponent":"x"}"#).is_err());
        let err = parse_history_file(r#"[{"opponent":"x","score":3}]"#).unwrap_err();
        assert!(matches!(err, TacticianError::InvalidMatchFile(_)));

        let partial = parse_history_file(r#"[{"opponent":"x","score":"1-0"}]"#).unwrap();
        assert_eq!(partial[0].possession, 50);
        assert_eq!(partial[0].tactic_used, "");
    }

    #[test]
    fn import_rounds_fractional_counts() {
        let batch = parse_history_file(
            r#"[{"opponent":"A","score":"1-0","possession":55.5,"shots":7.2,"opponentPossession":44.5,"opponentShots":null}]"#,
        )
        .unwrap();
        assert_eq!(batch[0].possession, 56);
        assert_eq!(batch[0].shots, 7);
        assert_eq!(batch[0].opponent_possession, Some(45));
        assert_eq!(batch[0].opponent_shots, None);

        let stored: Vec<MatchData> = serde_json::from_str(
            r#"[{"id":"x","matchNumber":1,"tacticUsed":"P","opponent":"A","score":"1-0",
                "possession":49.6,"shots":3,"shotsOnTarget":1.4,"notes":""}]"#,
        )
        .unwrap();
        assert_eq!(stored[0].possession, 50);
        assert_eq!(stored[0].shots_on_target, 1);
    }

    #[test]
    fn validate_requires_opponent_and_score() {
        let err = NewMatch::default().validate().unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS_MESSAGE);
        assert!(new_match("A", "X", "1-0").validate().is_ok());
    }

    #[test]
    fn merge_extracted_keeps_unset_fields() {
        let mut m = NewMatch {
            notes: "keep".into(),
            shots: 3,
            ..NewMatch::default()
        };
        m.merge_extracted(&ExtractedMatch {
            opponent: "Leeds".into(),
            score: Some("2-0".into()),
            possession: Some(61.6),
            shots: None,
            shots_on_target: Some(5.0),
        });
        assert_eq!(m.opponent, "Leeds");
        assert_eq!(m.possession, 62);
        assert_eq!(m.shots, 3);
        assert_eq!(m.shots_on_target, 5);
        assert_eq!(m.notes, "keep");
    }

    #[test]
    fn stats_aggregate_results() {
        let mut history = Vec::new();
        append_all(
            &mut history,
            vec![
                new_match("Press", "A", "3-1"),
                new_match("Press", "B", "1-1"),
                new_match("Bus", "C", "0-2"),
                new_match("Press", "D", "0 - 2"),
                new_match("Press", "E", "n/a"),
            ],
        );
        let s = stats_for(&history, "Press");
        assert_eq!((s.played, s.wins, s.draws, s.losses), (4, 1, 1, 1));
        assert_eq!((s.goals_for, s.goals_against), (4, 4));
        assert!((s.avg_possession - 55.0).abs() < f64::EPSILON);

        let all = stats_by_tactic(&history);
        assert_eq!(all.iter().map(|s| s.tactic.as_str()).collect::<Vec<_>>(), vec!["Press", "Bus"]);
    }
}
