//! Runs core advisor requests through a transport and decodes the replies.

use futures::future::BoxFuture;
use gemini_gateway::{GeminiClient, GenerateContentRequest};
use serde::de::DeserializeOwned;
use tactician_core::advisor::{self, AdvisorRequest, ExtractedMatch, HistoryEntry};
use tactician_core::config::AdvisorConfig;

/// Something that can answer an [`AdvisorRequest`] with raw reply text.
pub trait Advisor: Send + Sync {
    fn generate<'a>(&'a self, request: &'a AdvisorRequest) -> BoxFuture<'a, anyhow::Result<String>>;
}

/// Gemini over HTTP. The API key is read from the configured environment
/// variable on every call.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    config: AdvisorConfig,
}

impl GeminiAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }
}

/// Text part first, then the screenshots in order.
pub fn to_gemini(request: &AdvisorRequest) -> GenerateContentRequest {
    let mut req = GenerateContentRequest::new(request.prompt.clone());
    for image in &request.images {
        req = req.with_inline_data(image.mime_type.clone(), image.data.clone());
    }
    let req = req.with_temperature(request.temperature);
    match &request.schema {
        Some(schema) => req.with_json_schema(schema.clone()),
        None => req,
    }
}

impl Advisor for GeminiAdvisor {
    fn generate<'a>(&'a self, request: &'a AdvisorRequest) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(async move {
            let client = GeminiClient::from_env(
                &self.config.api_key_env,
                self.config.base_url.clone(),
                self.config.model.clone(),
            )?;
            tracing::info!(task = %request.task, model = client.model(), images = request.images.len(), "advisor call");
            let text = client.generate_text(&to_gemini(request)).await?;
            Ok(text)
        })
    }
}

// ---------------------------------------------------------------------------
// Typed calls
// ---------------------------------------------------------------------------

/// Run a request whose reply is a JSON document of type `T`.
pub async fn ask<T: DeserializeOwned>(
    advisor: &dyn Advisor,
    request: &AdvisorRequest,
) -> anyhow::Result<T> {
    let raw = advisor.generate(request).await?;
    Ok(advisor::parse_reply(&raw)?)
}

pub async fn scan_matches(
    advisor: &dyn Advisor,
    request: &AdvisorRequest,
) -> anyhow::Result<Vec<ExtractedMatch>> {
    let raw = advisor.generate(request).await?;
    Ok(advisor::parse_extracted_matches(&raw)?)
}

pub async fn scan_history(
    advisor: &dyn Advisor,
    request: &AdvisorRequest,
) -> anyhow::Result<Vec<HistoryEntry>> {
    let raw = advisor.generate(request).await?;
    Ok(advisor::parse_history_entries(&raw)?)
}

pub async fn synthesize(advisor: &dyn Advisor, request: &AdvisorRequest) -> anyhow::Result<String> {
    let raw = advisor.generate(request).await?;
    Ok(advisor::parse_knowledge(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactician_core::advisor::{prompts, InlineImage, PlayerRoleSuggestion};

    struct Canned(&'static str);

    impl Advisor for Canned {
        fn generate<'a>(&'a self, _request: &'a AdvisorRequest) -> BoxFuture<'a, anyhow::Result<String>> {
            Box::pin(async move { Ok(self.0.to_string()) })
        }
    }

    #[test]
    fn gemini_request_puts_text_before_images() {
        let images = vec![
            InlineImage { mime_type: "image/png".into(), data: "AAA".into() },
            InlineImage { mime_type: "image/jpeg".into(), data: "BBB".into() },
        ];
        let request = prompts::match_images(images, None).unwrap();
        let body = serde_json::to_value(to_gemini(&request)).unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts[0]["text"].is_string());
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[2]["inlineData"]["data"], "BBB");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn gemini_request_carries_temperature() {
        let request = prompts::player_roles("fast winger").unwrap();
        let body = serde_json::to_value(to_gemini(&request)).unwrap();
        let t = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((t - 0.3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn ask_parses_fenced_reply() {
        let advisor = Canned("```json\n[{\"role\":\"Poacher\",\"score\":9,\"justification\":\"pace\"}]\n```");
        let request = prompts::player_roles("fast striker").unwrap();
        let roles: Vec<PlayerRoleSuggestion> = ask(&advisor, &request).await.unwrap();
        assert_eq!(roles[0].role, "Poacher");
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let advisor = Canned("  ");
        let request = prompts::player_roles("fast striker").unwrap();
        let err = ask::<Vec<PlayerRoleSuggestion>>(&advisor, &request).await.unwrap_err();
        assert!(err.downcast_ref::<advisor::AdvisorError>().is_some());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let advisor = GeminiAdvisor::new(AdvisorConfig {
            api_key_env: "TACTICIAN_SERVER_TEST_UNSET_KEY".into(),
            ..AdvisorConfig::default()
        });
        let request = prompts::player_roles("x").unwrap();
        let err = advisor.generate(&request).await.unwrap_err();
        assert!(err.downcast_ref::<gemini_gateway::GatewayError>().is_some());
    }
}
