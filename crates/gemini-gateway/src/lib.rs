//! `gemini-gateway`: a small async client for Gemini's `generateContent`.
//!
//! ```rust,ignore
//! use gemini_gateway::{GeminiClient, GenerateContentRequest};
//!
//! let client = GeminiClient::from_env("GEMINI_API_KEY", gemini_gateway::DEFAULT_BASE_URL, "gemini-2.5-flash")?;
//! let req = GenerateContentRequest::new("Suggest a 4-3-3.").with_temperature(Some(0.7));
//! let text = client.generate_text(&req).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{GeminiClient, DEFAULT_BASE_URL};
pub use error::GatewayError;
pub use types::{
    Blob, Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part, PromptFeedback,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GatewayError>;
