//! Prompt construction for each advisor task.

use super::image::InlineImage;
use super::squad::SquadComposition;
use super::{schema, AdvisorRequest, Task};
use crate::error::{Result, TacticianError};
use crate::matches::MatchData;
use crate::tactic::DetailedTactic;
use crate::{instructions, roles};
use serde::{Deserialize, Serialize};

const GUIDE: &str = include_str!("../../assets/tactics_guide.md");

/// Matches with a tactic needed before an improvement analysis.
pub const MIN_MATCHES_FOR_IMPROVEMENT: usize = 3;
/// Only the most recent matches with a tactic are analysed.
pub const IMPROVEMENT_WINDOW: usize = 10;
/// Logged matches needed before knowledge synthesis.
pub const MIN_MATCHES_FOR_KNOWLEDGE: usize = 5;

/// How much of each match goes into an improvement prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    #[default]
    Full,
    ScoresOnly,
}

impl std::str::FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "full" => Ok(DetailLevel::Full),
            "scores_only" | "scores-only" => Ok(DetailLevel::ScoresOnly),
            other => Err(format!("unknown detail level '{other}' (expected full or scores_only)")),
        }
    }
}

/// The tactical guide, followed by the allowed instruction values and roles.
pub fn guide_context() -> String {
    format!(
        "{}\n{}\n{}",
        GUIDE.trim_end(),
        instructions::render_options(),
        roles::render_position_roles()
    )
}

fn knowledge_section(knowledge: Option<&str>) -> String {
    match knowledge.map(str::trim).filter(|k| !k.is_empty()) {
        Some(k) => format!(
            "\nLEARNED KNOWLEDGE FROM THE USER'S MATCH HISTORY (apply where relevant):\n{k}\n"
        ),
        None => String::new(),
    }
}

fn require_text(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TacticianError::MissingField(message.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn tactic_suggestion(
    squad: &SquadComposition,
    playstyle: &str,
    knowledge: Option<&str>,
) -> Result<AdvisorRequest> {
    squad.validate()?;

    let playstyle_section = if playstyle.trim().is_empty() {
        String::new()
    } else {
        format!("\nUSER'S TEAM PLAYSTYLE AND KEY PLAYERS:\n\"{}\"\n", playstyle.trim())
    };

    let prompt = format!(
        r#"CONTEXT:
{context}
{knowledge}
---

USER'S SQUAD COMPOSITION:
The user has the following number of outfield players available for each position. The total is exactly 10.
{squad}
{playstyle_section}
---

INSTRUCTIONS:
Based on the Soccer Manager 2026 CONTEXT, the user's SQUAD COMPOSITION, and their TEAM PLAYSTYLE (if provided):
1.  **Strict Formation:** Devise a logical and balanced formation that uses EXACTLY the number of players specified for each position. For example, if the user provides 3 for DC, the formation MUST use 3 central defenders.
2.  **Assign Roles:** Provide a role for ALL 11 PLAYER POSITIONS (add a Goalkeeper automatically). The roles should complement the formation, the likely strengths of a team with this player distribution, AND the described playstyle.
3.  **Set Instructions:** Provide a complete set of General, Attack, and Defence instructions that are tactically sound for the generated formation and playstyle.
4.  **Justify:** Explain your reasoning, detailing why the chosen formation and instructions are the most effective approach for the given squad structure and playstyle, referencing the SM26 meta.
"#,
        context = guide_context(),
        knowledge = knowledge_section(knowledge),
        squad = squad.prompt_lines(),
    );
    Ok(AdvisorRequest::new(
        Task::TacticSuggestion,
        prompt,
        Some(schema::tactic_suggestion()),
    ))
}

pub fn match_prediction(team_a: &str, team_b: &str) -> Result<AdvisorRequest> {
    if team_a.trim().is_empty() || team_b.trim().is_empty() {
        return Err(TacticianError::MissingField("Please describe both teams.".into()));
    }
    let prompt = format!(
        r#"CONTEXT:
You are a Soccer Manager 2026 (SM26) expert analyst. The game's meta favors fast forwards, central attacks, high pressing, and counter-attacks. Analyze the following two team descriptions and predict the outcome of a match between them.

TEAM A (My Team):
"{a}"

TEAM B (Opponent):
"{b}"

INSTRUCTIONS:
1.  Predict the final score.
2.  Estimate the win probabilities for Team A, a Draw, and Team B. The total must sum to 100.
3.  List 3-4 likely key events in the match.
4.  Provide a justification explaining your reasoning, comparing the tactical matchups.
"#,
        a = team_a.trim(),
        b = team_b.trim(),
    );
    Ok(AdvisorRequest::new(
        Task::MatchPrediction,
        prompt,
        Some(schema::match_prediction()),
    ))
}

pub fn player_roles(description: &str) -> Result<AdvisorRequest> {
    require_text(description, "Please describe the player.")?;
    let prompt = format!(
        r#"CONTEXT:
You are a world-class Soccer Manager 2026 (SM26) scout. Your task is to analyze a player's description and determine their best roles on the pitch. Use the provided list of roles and the general SM26 meta (fast players, technical ability, etc.) to make your assessment.

AVAILABLE PLAYER ROLES:
{roles}

PLAYER DESCRIPTION:
"{description}"

INSTRUCTIONS:
1.  Based on the description, identify the 3-5 most suitable roles for this player.
2.  For each role, provide a compatibility score from 1 to 100.
3.  Provide a short justification for each score.
4.  Return the results as an array of objects, ordered from the highest score to the lowest.
"#,
        roles = roles::role_names().collect::<Vec<_>>().join(", "),
        description = description.trim(),
    );
    Ok(AdvisorRequest::new(
        Task::PlayerRoleSuggestion,
        prompt,
        Some(schema::player_roles()),
    ))
}

/// One-line summary per match, joined with `"; "`.
pub fn history_summary(matches: &[&MatchData], detail: DetailLevel) -> String {
    matches
        .iter()
        .map(|m| match detail {
            DetailLevel::ScoresOnly => format!("vs {}: {}", m.opponent, m.score),
            DetailLevel::Full => format!(
                "vs {}: {}, Poss: {}%, Shots: {}({})",
                m.opponent, m.score, m.possession, m.shots, m.shots_on_target
            ),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn tactic_improvement(
    tactic: &DetailedTactic,
    history: &[MatchData],
    detail: DetailLevel,
    knowledge: Option<&str>,
) -> Result<AdvisorRequest> {
    let relevant = crate::matches::for_tactic(history, &tactic.tactic_name);
    if relevant.len() < MIN_MATCHES_FOR_IMPROVEMENT {
        return Err(TacticianError::NotEnoughMatches {
            needed: MIN_MATCHES_FOR_IMPROVEMENT,
            found: relevant.len(),
        });
    }
    let recent = &relevant[relevant.len().saturating_sub(IMPROVEMENT_WINDOW)..];
    let heading = match detail {
        DetailLevel::ScoresOnly => "RECENT MATCH RESULTS (scores only):",
        DetailLevel::Full => "RECENT MATCH HISTORY (full details):",
    };

    let prompt = format!(
        r#"CONTEXT:
You are an expert Soccer Manager 2026 tactical analyst. Your task is to analyze a tactic and its recent match results to provide concrete improvement suggestions.
You MUST adhere strictly to the valid instructions and roles defined in the guide below. Do not invent new roles or instruction values.

--- TACTICAL GUIDE ---
{context}
--- END GUIDE ---
{knowledge}
TACTIC TO ANALYZE:
- Name: {name}
- Formation: {formation}
- Key Roles: {key_roles}
- General: {general}
- Attack: {attack}
- Defence: {defence}

{heading}
{summary}

INSTRUCTIONS:
1.  **Analyze Performance**: Based on the match data, identify the tactic's main weaknesses.
2.  **Suggest Key Changes**: Propose a few (1-4) specific, high-impact changes to the tactic's instructions or key player roles. The suggested changes MUST come from the options in the TACTICAL GUIDE. For example, if you suggest changing "Width", the new value must be "Narrow", "Normal", or "Wide".
3.  **Phrase Changes Precisely**: Write instruction changes as "Change <Instruction> from <Old> to <New>." and role changes as "Switch <Old Role> to <New Role>."
4.  **Justify Your Suggestions**: Explain how your proposed changes will address the identified weaknesses.
"#,
        context = guide_context(),
        knowledge = knowledge_section(knowledge),
        name = tactic.tactic_name,
        formation = tactic.formation,
        key_roles = tactic.key_roles,
        general = tactic.general_instructions,
        attack = tactic.attack_instructions,
        defence = tactic.defence_instructions,
        summary = history_summary(recent, detail),
    );
    Ok(AdvisorRequest::new(
        Task::TacticImprovement,
        prompt,
        Some(schema::tactic_improvement()),
    ))
}

const SCORE_COLOUR_RULE: &str = r#"You MUST determine the final score based on the color of the score box.
    - If the box is **GREEN**, the user's team **WON**. Their score is the higher of the two numbers.
    - If the box is **RED**, the user's team **LOST**. Their score is the lower of the two numbers.
    - If the box is **GRAY/NEUTRAL**, it's a **DRAW**.
    - **Format the score:** Always return the score as 'user_score-opponent_score'."#;

/// Screenshot(s) of one or more match results. When `team` is given the
/// model is told which side is the user's; otherwise it takes the home side.
pub fn match_images(images: Vec<InlineImage>, team: Option<&str>) -> Result<AdvisorRequest> {
    if images.is_empty() {
        return Err(TacticianError::InvalidImage("no images provided for analysis".into()));
    }
    let identify = match team.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!(
            "The user's team is **{t}**. Every other team name is an opponent."
        ),
        None => "The user's team is the one shown on the left (home) side of each result. Every other team name is an opponent.".to_string(),
    };
    let prompt = format!(
        r#"Analyze the provided Soccer Manager 2026 match result screenshot(s). Each image could represent a different match, or multiple images could be for the same match.

**Primary Goal:** Identify all distinct matches and extract their data.

**INSTRUCTIONS:**
1.  **Identify User's Team:** {identify}
2.  **Group and Extract:** Group screenshots that belong to the same match (e.g., one for score, one for stats). Then for each distinct match, extract the following information for the user's team:
    - opponent: The name of the opponent team.
    - score: The final score.
    - possession: The user's possession percentage.
    - shots: The user's total shots.
    - shotsOnTarget: The user's shots on target.
3.  **Score Interpretation (CRITICAL):** {rule}
4.  **Return Format:** Return a JSON array of objects, with one object for each distinct match you identify. If a stat isn't visible in an image for a match, return null for that field. Ensure the 'opponent' field is always populated."#,
        rule = SCORE_COLOUR_RULE,
    );
    Ok(AdvisorRequest::new(Task::MatchImageExtraction, prompt, Some(schema::match_images()))
        .with_images(images))
}

pub fn match_history_image(image: InlineImage) -> AdvisorRequest {
    let prompt = format!(
        r#"Analyze the provided Soccer Manager 2026 match history screenshot. For each match in the list, extract the opponent's name and the final score.

**INSTRUCTIONS FOR SCORE INTERPRETATION:**
{rule}

**Examples:**
- Score '3-5' in a GREEN box means a WIN -> Format as '5-3'.
- Score '4-1' in a RED box means a LOSS -> Format as '1-4'.
- Score '2-0' in a GREEN box means a WIN -> Format as '2-0'.

**Data to Extract:**
For each match found, return an object containing:
- opponent: The name of the opponent team.
- score: The final score, correctly interpreted using the color rule."#,
        rule = SCORE_COLOUR_RULE,
    );
    AdvisorRequest::new(
        Task::MatchHistoryImageExtraction,
        prompt,
        Some(schema::match_history_image()),
    )
    .with_images(vec![image])
}

/// Condense the whole match history into a reusable plain-text knowledge base.
pub fn knowledge_synthesis(history: &[MatchData]) -> Result<AdvisorRequest> {
    if history.len() < MIN_MATCHES_FOR_KNOWLEDGE {
        return Err(TacticianError::NotEnoughMatches {
            needed: MIN_MATCHES_FOR_KNOWLEDGE,
            found: history.len(),
        });
    }
    let lines: Vec<String> = history
        .iter()
        .map(|m| {
            format!(
                "#{} [{}] vs {}: {}, Poss: {}%, Shots: {}({}){}",
                m.match_number,
                m.tactic_used,
                m.opponent,
                m.score,
                m.possession,
                m.shots,
                m.shots_on_target,
                if m.notes.trim().is_empty() {
                    String::new()
                } else {
                    format!(", Notes: {}", m.notes.trim())
                }
            )
        })
        .collect();
    let prompt = format!(
        r#"CONTEXT:
You are an expert Soccer Manager 2026 tactical analyst building a long-term memory for one manager.

--- TACTICAL GUIDE ---
{context}
--- END GUIDE ---

COMPLETE MATCH HISTORY:
{history}

INSTRUCTIONS:
1.  Identify which tactics perform best and worst, and against what kind of opposition.
2.  Note recurring patterns in possession, shots and results.
3.  Write concise, reusable lessons that a future tactic suggestion or analysis should apply.
4.  Reply with plain text only: short headed sections with bullet points, no JSON and no code fences.
"#,
        context = guide_context(),
        history = lines.join("\n"),
    );
    Ok(AdvisorRequest::new(Task::KnowledgeSynthesis, prompt, None))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::{append_all, fixtures::new_match};
    use crate::tactic::fixtures::tactic;

    fn ten() -> SquadComposition {
        SquadComposition::parse("dc=2,dl=1,dr=1,mc=3,aml=1,amr=1,st=1").unwrap()
    }

    #[test]
    fn suggestion_prompt_carries_squad_playstyle_and_knowledge() {
        let req = tactic_suggestion(&ten(), "fast wingers", Some("Bus tactics lose at home.")).unwrap();
        assert_eq!(req.task, Task::TacticSuggestion);
        assert_eq!(req.temperature, Some(0.7));
        assert!(req.prompt.contains("- DC: 2\n- DL: 1"));
        assert!(req.prompt.contains("\"fast wingers\""));
        assert!(req.prompt.contains("Bus tactics lose at home."));
        assert!(req.prompt.contains("**AVAILABLE TACTICAL INSTRUCTIONS"));
        assert!(req.schema.is_some());
    }

    #[test]
    fn suggestion_blocks_invalid_squads() {
        let nine = SquadComposition::parse("dc=9").unwrap();
        let err = tactic_suggestion(&nine, "", None).unwrap_err();
        assert!(matches!(err, TacticianError::InvalidSquad(9)));
    }

    #[test]
    fn prediction_and_roles_need_descriptions() {
        assert!(match_prediction("ours", " ").is_err());
        assert_eq!(match_prediction("ours", "theirs").unwrap().temperature, Some(0.5));
        assert!(player_roles("").is_err());
        let req = player_roles("quick and tall").unwrap();
        assert!(req.prompt.contains("Target Man"));
        assert_eq!(req.temperature, Some(0.3));
    }

    #[test]
    fn improvement_needs_three_matches_and_uses_last_ten() {
        let t = tactic("Press");
        let mut history = Vec::new();
        append_all(&mut history, vec![new_match("Press", "A", "1-0"), new_match("Other", "B", "0-1")]);
        let err = tactic_improvement(&t, &history, DetailLevel::Full, None).unwrap_err();
        assert!(matches!(err, TacticianError::NotEnoughMatches { needed: 3, found: 1 }));

        let batch = (0..12).map(|i| new_match("Press", &format!("Team{i}"), "2-1")).collect();
        append_all(&mut history, batch);
        let req = tactic_improvement(&t, &history, DetailLevel::Full, None).unwrap();
        assert!(req.prompt.contains("RECENT MATCH HISTORY (full details):"));
        assert!(req.prompt.contains("vs Team11: 2-1, Poss: 55%, Shots: 10(4)"));
        assert!(req.prompt.contains("vs Team2: 2-1"));
        assert!(!req.prompt.contains("vs Team1:"));
        assert!(!req.prompt.contains("vs A:"));

        let req = tactic_improvement(&t, &history, DetailLevel::ScoresOnly, None).unwrap();
        assert!(req.prompt.contains("vs Team5: 2-1; vs Team6: 2-1"));
    }

    #[test]
    fn image_requests_need_images() {
        assert!(match_images(vec![], None).is_err());
        let img = InlineImage { mime_type: "image/png".into(), data: "AAAA".into() };
        let req = match_images(vec![img.clone()], Some("Leeds")).unwrap();
        assert_eq!(req.images.len(), 1);
        assert!(req.temperature.is_none());
        assert!(req.prompt.contains("The user's team is **Leeds**"));

        let req = match_history_image(img);
        assert_eq!(req.task, Task::MatchHistoryImageExtraction);
        assert!(req.temperature.is_none());
    }

    #[test]
    fn knowledge_needs_five_matches() {
        let mut history = Vec::new();
        append_all(&mut history, (0..4).map(|_| new_match("Press", "A", "1-0")).collect());
        assert!(knowledge_synthesis(&history).is_err());
        append_all(&mut history, vec![new_match("Bus", "B", "0-0")]);
        let req = knowledge_synthesis(&history).unwrap();
        assert!(req.schema.is_none());
        assert!(req.prompt.contains("#5 [Bus] vs B: 0-0"));
    }

    #[test]
    fn detail_level_parses() {
        assert_eq!("scores_only".parse::<DetailLevel>().unwrap(), DetailLevel::ScoresOnly);
        assert!("loud".parse::<DetailLevel>().is_err());
    }
}
