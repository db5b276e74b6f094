//! Response schemas, in the OpenAPI subset the generative API accepts.

use serde_json::{json, Value};

fn options(key: &str) -> String {
    crate::instructions::OPTIONS
        .iter()
        .find(|o| o.key == key)
        .map(|o| format!("Options: {}.", o.values.join(", ")))
        .unwrap_or_default()
}

fn text(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn choice(key: &str) -> Value {
    text(&options(key))
}

pub fn tactic_suggestion() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "formation": text("The recommended formation, e.g., '4-3-3' or '4-2-3-1'."),
            "general": {
                "type": "OBJECT",
                "properties": {
                    "width": choice("Width"),
                    "mentality": choice("Mentality"),
                    "tempo": choice("Tempo"),
                    "fluidity": choice("Fluidity"),
                    "workRate": choice("Work Rate"),
                    "creativity": choice("Creativity"),
                },
                "required": ["width", "mentality", "tempo", "fluidity", "workRate", "creativity"],
            },
            "attack": {
                "type": "OBJECT",
                "properties": {
                    "passingStyle": choice("Passing Style"),
                    "attackingStyle": choice("Attacking Style"),
                    "forwards": choice("Forwards"),
                    "widePlay": choice("Wide Play"),
                    "buildUp": choice("Build Up"),
                    "counterAttack": {
                        "type": "BOOLEAN",
                        "description": "Whether to enable counter attacks (true for Yes, false for No).",
                    },
                },
                "required": ["passingStyle", "attackingStyle", "forwards", "widePlay", "buildUp", "counterAttack"],
            },
            "defence": {
                "type": "OBJECT",
                "properties": {
                    "pressing": choice("Pressing"),
                    "tacklingStyle": choice("Tackling Style"),
                    "backLine": choice("Back Line"),
                    "sweeperKeeper": {
                        "type": "BOOLEAN",
                        "description": "Whether to use a sweeper keeper (true for Yes, false for No).",
                    },
                    "timeWasting": choice("Time Wasting"),
                },
                "required": ["pressing", "tacklingStyle", "backLine", "sweeperKeeper", "timeWasting"],
            },
            "playerRoles": {
                "type": "ARRAY",
                "description": "A complete list of roles for all 11 player positions suitable for the chosen formation.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "position": text("The position on the pitch, e.g., 'GK', 'DC', 'FC' or 'MC'."),
                        "role": text("The specific Soccer Manager role, e.g., 'Target Man' or 'Advanced Playmaker'."),
                    },
                    "required": ["position", "role"],
                },
            },
            "justification": text("A detailed explanation for why this tactic and these instructions suit the user's team."),
        },
        "required": ["formation", "general", "attack", "defence", "playerRoles", "justification"],
    })
}

pub fn match_prediction() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "predictedScore": text("The most likely final score, e.g., '2-1'."),
            "keyEvents": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of 3-4 key events that might happen in the match.",
            },
            "justification": text("A detailed justification for the prediction, analysing both teams' strengths and weaknesses."),
            "winProbability": {
                "type": "OBJECT",
                "properties": {
                    "teamA": { "type": "NUMBER", "description": "Win probability for Team A (user's team) from 0 to 100." },
                    "draw": { "type": "NUMBER", "description": "Probability of a draw from 0 to 100." },
                    "teamB": { "type": "NUMBER", "description": "Win probability for Team B (opponent) from 0 to 100." },
                },
                "required": ["teamA", "draw", "teamB"],
            },
        },
        "required": ["predictedScore", "keyEvents", "justification", "winProbability"],
    })
}

pub fn player_roles() -> Value {
    json!({
        "type": "ARRAY",
        "description": "An array of 3-5 suggested player roles, ordered by score.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "role": text("A specific player role from Soccer Manager 2026."),
                "score": { "type": "NUMBER", "description": "A compatibility score from 1 to 100." },
                "justification": text("A brief justification for the score."),
            },
            "required": ["role", "score", "justification"],
        },
    })
}

pub fn tactic_improvement() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "analysis": text("A summary of the team's performance based on match history, identifying key weaknesses."),
            "suggestedChanges": {
                "type": "OBJECT",
                "properties": {
                    "general": text("Suggested change to ONE General instruction, e.g., 'Change Width from Wide to Normal.'"),
                    "attack": text("Suggested change to ONE Attack instruction."),
                    "defence": text("Suggested change to ONE Defence instruction."),
                    "keyRoles": text("Suggested change to ONE or TWO key player roles, e.g., 'Switch Box-to-box Midfielder to a Ball-Winning Midfielder.'"),
                },
            },
            "justification": text("Detailed reasoning for why these changes will improve performance."),
        },
        "required": ["analysis", "suggestedChanges", "justification"],
    })
}

pub fn match_images() -> Value {
    json!({
        "type": "ARRAY",
        "description": "One match data object per distinct match found in the images. Consolidate images of the same match.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "opponent": text("The name of the opponent team. This is a required field."),
                "score": text("The final score for the user's team vs opponent, e.g., '3-1'. Null if not found."),
                "possession": { "type": "NUMBER", "description": "The user's team possession percentage (0-100). Null if not found." },
                "shots": { "type": "NUMBER", "description": "Total shots for the user's team. Null if not found." },
                "shotsOnTarget": { "type": "NUMBER", "description": "Shots on target for the user's team. Null if not found." },
            },
            "required": ["opponent"],
        },
    })
}

pub fn match_history_image() -> Value {
    json!({
        "type": "ARRAY",
        "description": "Match data objects extracted from the image, one per match.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "opponent": text("The name of the opponent team."),
                "score": text("The final score, formatted as 'user_score-opponent_score'."),
            },
            "required": ["opponent", "score"],
        },
    })
}
