use crate::error::{Result, TacticianError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outfield positions a squad composition counts, in prompt order.
pub const SQUAD_POSITIONS: [&str; 15] = [
    "dc", "dl", "dr", "dml", "dmr", "dmc", "mc", "ml", "mr", "amc", "aml", "amr", "fl", "fr", "st",
];

pub const OUTFIELD_PLAYERS: u32 = 10;
const MAX_PER_POSITION: u32 = 10;

/// How many outfield players the user has per position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct SquadComposition {
    counts: [u32; SQUAD_POSITIONS.len()],
}

fn index_of(position: &str) -> Option<usize> {
    let pos = position.trim().to_ascii_lowercase();
    let pos = if pos == "fc" { "st".to_string() } else { pos };
    SQUAD_POSITIONS.iter().position(|p| *p == pos)
}

impl SquadComposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for one position. `fc` is accepted for `st`.
    pub fn set(&mut self, position: &str, count: u32) -> Result<()> {
        let idx = index_of(position)
            .ok_or_else(|| TacticianError::InvalidEdit(format!("unknown position '{position}'")))?;
        if count > MAX_PER_POSITION {
            return Err(TacticianError::InvalidEdit(format!(
                "{position}: at most {MAX_PER_POSITION} players per position"
            )));
        }
        self.counts[idx] = count;
        Ok(())
    }

    pub fn get(&self, position: &str) -> u32 {
        index_of(position).map(|i| self.counts[i]).unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// The squad must name exactly ten outfield players.
    pub fn validate(&self) -> Result<()> {
        match self.total() {
            OUTFIELD_PLAYERS => Ok(()),
            n => Err(TacticianError::InvalidSquad(n)),
        }
    }

    /// Parse `"dc=2,dl=1,..."`.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut squad = Self::new();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (pos, count) = part.split_once('=').ok_or_else(|| {
                TacticianError::InvalidEdit(format!("expected POSITION=COUNT, got '{part}'"))
            })?;
            let count: u32 = count.trim().parse().map_err(|_| {
                TacticianError::InvalidEdit(format!("invalid count in '{part}'"))
            })?;
            squad.set(pos, count)?;
        }
        Ok(squad)
    }

    /// `- DC: 2` lines for every position, zeros included.
    pub fn prompt_lines(&self) -> String {
        SQUAD_POSITIONS
            .iter()
            .zip(self.counts.iter())
            .map(|(pos, n)| format!("- {}: {n}", pos.to_uppercase()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TryFrom<BTreeMap<String, u32>> for SquadComposition {
    type Error = String;

    fn try_from(map: BTreeMap<String, u32>) -> std::result::Result<Self, Self::Error> {
        let mut squad = Self::new();
        for (pos, count) in map {
            squad.set(&pos, count).map_err(|e| e.to_string())?;
        }
        Ok(squad)
    }
}

impl From<SquadComposition> for BTreeMap<String, u32> {
    fn from(squad: SquadComposition) -> Self {
        SQUAD_POSITIONS
            .iter()
            .zip(squad.counts)
            .map(|(p, n)| (p.to_string(), n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squad(spec: &str) -> SquadComposition {
        SquadComposition::parse(spec).unwrap()
    }

    #[test]
    fn exactly_ten_is_required() {
        assert!(squad("dc=2,dl=1,dr=1,mc=3,aml=1,amr=1,st=1").validate().is_ok());

        let err = squad("dc=2,dl=1,dr=1,mc=3,aml=1,st=1").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "You must select exactly 10 outfield players. You have selected 9."
        );

        let err = squad("dc=3,dl=1,dr=1,mc=3,aml=1,amr=1,st=1").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "You must select exactly 10 outfield players. You have selected 11."
        );
    }

    #[test]
    fn fc_is_st() {
        let s = squad("FC=2");
        assert_eq!(s.get("st"), 2);
    }

    #[test]
    fn rejects_unknown_positions_and_large_counts() {
        assert!(SquadComposition::parse("gk=1").is_err());
        assert!(SquadComposition::parse("dc=11").is_err());
        assert!(SquadComposition::parse("dc").is_err());
    }

    #[test]
    fn prompt_lists_every_position() {
        let lines = squad("dc=2").prompt_lines();
        assert!(lines.starts_with("- DC: 2\n- DL: 0"));
        assert_eq!(lines.lines().count(), SQUAD_POSITIONS.len());
    }

    #[test]
    fn serde_as_map() {
        let s: SquadComposition = serde_json::from_str(r#"{"dc": 4, "mc": 6}"#).unwrap();
        assert_eq!(s.total(), 10);
        let back = serde_json::to_value(&s).unwrap();
        assert_eq!(back["dc"], 4);
        assert_eq!(back["st"], 0);
        assert!(serde_json::from_str::<SquadComposition>(r#"{"gk": 1}"#).is_err());
    }
}
