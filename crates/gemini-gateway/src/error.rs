use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no API key configured; set the {0} environment variable")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode Gemini response: {0}")]
    Decode(String),

    #[error("request blocked by the model: {0}")]
    Blocked(String),
}
