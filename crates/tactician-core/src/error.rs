use thiserror::Error;

#[derive(Debug, Error)]
pub enum TacticianError {
    #[error("not initialized: run 'tactician init'")]
    NotInitialized,

    #[error("a tactic with the name \"{0}\" already exists")]
    DuplicateTactic(String),

    #[error("tactic not found: {0}")]
    TacticNotFound(String),

    #[error("match not found: {0}")]
    MatchNotFound(String),

    #[error("invalid or incomplete tactic format: {0}")]
    InvalidTacticFile(String),

    #[error("invalid match history format: {0}")]
    InvalidMatchFile(String),

    #[error("{0}")]
    MissingField(String),

    #[error("You must select exactly 10 outfield players. You have selected {0}.")]
    InvalidSquad(u32),

    #[error("not enough match data: {needed} matches required, {found} logged")]
    NotEnoughMatches { needed: usize, found: usize },

    #[error("confirmation required: {0}")]
    ConfirmationRequired(String),

    #[error("invalid edit: {0}")]
    InvalidEdit(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("storage quota exceeded writing '{key}' ({bytes} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        bytes: usize,
        limit: usize,
    },

    #[error(transparent)]
    Advisor(#[from] crate::advisor::AdvisorError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TacticianError>;
