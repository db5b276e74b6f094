//! Achievements earned from the size of the tactic library and history.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counted {
    Tactics,
    Matches,
}

struct BadgeDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    counted: Counted,
    threshold: usize,
}

const BADGES: &[BadgeDef] = &[
    BadgeDef { id: "newcomer", name: "Newcomer", description: "Saved your first tactic.", icon: "🏆", counted: Counted::Tactics, threshold: 1 },
    BadgeDef { id: "collector", name: "Tactic Collector", description: "Saved 5 different tactics.", icon: "📚", counted: Counted::Tactics, threshold: 5 },
    BadgeDef { id: "maestro", name: "Tactical Maestro", description: "Saved 10 different tactics.", icon: "👑", counted: Counted::Tactics, threshold: 10 },
    BadgeDef { id: "first_match", name: "First Match", description: "Logged your first match result.", icon: "⚽", counted: Counted::Matches, threshold: 1 },
    BadgeDef { id: "seasoned", name: "Seasoned Manager", description: "Logged 10 match results.", icon: "📊", counted: Counted::Matches, threshold: 10 },
    BadgeDef { id: "centurion", name: "Centurion", description: "Logged 25 match results.", icon: "📈", counted: Counted::Matches, threshold: 25 },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub achieved: bool,
}

/// Every badge, earned or not, in display order.
pub fn badges(saved_tactics: usize, logged_matches: usize) -> Vec<Badge> {
    BADGES
        .iter()
        .map(|b| {
            let count = match b.counted {
                Counted::Tactics => saved_tactics,
                Counted::Matches => logged_matches,
            };
            Badge {
                id: b.id,
                name: b.name,
                description: b.description,
                icon: b.icon,
                achieved: count >= b.threshold,
            }
        })
        .collect()
}
