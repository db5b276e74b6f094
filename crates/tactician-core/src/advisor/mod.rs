//! Requests to, and replies from, the generative tactics advisor.
//!
//! This module is transport-free: it builds [`AdvisorRequest`]s (prompt,
//! inline images, response schema, temperature) and decodes the reply text
//! into typed results. Sending the request is the caller's job.

pub mod editor;
pub mod extract;
pub mod image;
pub mod prompts;
pub mod schema;
pub mod squad;
pub mod types;

pub use editor::SuggestionEditor;
pub use extract::{extract_json, parse_extracted_matches, parse_history_entries, parse_knowledge, parse_reply};
pub use image::InlineImage;
pub use prompts::DetailLevel;
pub use squad::SquadComposition;
pub use types::{
    ExtractedMatch, HistoryEntry, MatchPrediction, PlayerRoleSuggestion, TacticImprovementSuggestion,
    TacticSuggestion,
};

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("received an empty response from the model")]
    EmptyReply,

    #[error("could not parse the model's reply: {0}")]
    MalformedReply(String),

    #[error("the model did not return an array of matches as expected")]
    NotAnArray,

    #[error("{0}")]
    NothingDetected(&'static str),
}

pub const NO_MATCH_DATA: &str = "AI could not detect any match data in the image(s).";
pub const NO_HISTORY_MATCHES: &str = "AI could not find any matches in the screenshot.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    TacticSuggestion,
    MatchPrediction,
    PlayerRoleSuggestion,
    TacticImprovement,
    MatchImageExtraction,
    MatchHistoryImageExtraction,
    KnowledgeSynthesis,
}

impl Task {
    /// Sampling temperature; image extraction runs at the model default.
    pub fn temperature(self) -> Option<f32> {
        match self {
            Task::TacticSuggestion => Some(0.7),
            Task::MatchPrediction | Task::TacticImprovement | Task::KnowledgeSynthesis => Some(0.5),
            Task::PlayerRoleSuggestion => Some(0.3),
            Task::MatchImageExtraction | Task::MatchHistoryImageExtraction => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Task::TacticSuggestion => "tactic_suggestion",
            Task::MatchPrediction => "match_prediction",
            Task::PlayerRoleSuggestion => "player_role_suggestion",
            Task::TacticImprovement => "tactic_improvement",
            Task::MatchImageExtraction => "match_image_extraction",
            Task::MatchHistoryImageExtraction => "match_history_image_extraction",
            Task::KnowledgeSynthesis => "knowledge_synthesis",
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a transport needs to run one advisor call.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorRequest {
    pub task: Task,
    pub prompt: String,
    pub images: Vec<InlineImage>,
    /// JSON response schema; `None` for plain-text replies.
    pub schema: Option<serde_json::Value>,
    pub temperature: Option<f32>,
}

impl AdvisorRequest {
    pub(crate) fn new(task: Task, prompt: String, schema: Option<serde_json::Value>) -> Self {
        Self {
            task,
            prompt,
            images: Vec::new(),
            schema,
            temperature: task.temperature(),
        }
    }

    pub(crate) fn with_images(mut self, images: Vec<InlineImage>) -> Self {
        self.images = images;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperatures_per_task() {
        assert_eq!(Task::TacticSuggestion.temperature(), Some(0.7));
        assert_eq!(Task::MatchPrediction.temperature(), Some(0.5));
        assert_eq!(Task::TacticImprovement.temperature(), Some(0.5));
        assert_eq!(Task::PlayerRoleSuggestion.temperature(), Some(0.3));
        assert_eq!(Task::MatchImageExtraction.temperature(), None);
        assert_eq!(Task::MatchHistoryImageExtraction.temperature(), None);
    }

    #[test]
    fn task_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Task::MatchHistoryImageExtraction).unwrap(),
            "match_history_image_extraction"
        );
        assert_eq!(Task::KnowledgeSynthesis.to_string(), "knowledge_synthesis");
    }
}
