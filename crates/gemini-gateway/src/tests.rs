/// Wire-format tests for request and response bodies.
#[cfg(test)]
mod unit {
    use crate::types::{GenerateContentRequest, GenerateContentResponse};
    use serde_json::json;

    #[test]
    fn request_serializes_camel_case() {
        let req = GenerateContentRequest::new("hello")
            .with_inline_data("image/png", "AAAA")
            .with_temperature(Some(0.5))
            .with_json_schema(json!({"type": "OBJECT"}));
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["contents"][0]["role"], "user");
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(v["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(v["generationConfig"]["temperature"], 0.5);
        assert_eq!(v["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(v["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn plain_request_has_no_config() {
        let v = serde_json::to_value(GenerateContentRequest::new("x").with_temperature(None)).unwrap();
        assert!(v.get("generationConfig").is_none());
        assert!(v["contents"][0]["parts"][0].get("inlineData").is_none());
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 12}
        }))
        .unwrap();
        assert_eq!(resp.text(), "{\"a\":1}");
    }

    #[test]
    fn response_without_candidates_is_empty_text() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.text(), "");
        assert!(resp.block_reason().is_none());
    }
}

/// Client tests against a local mock server.
#[cfg(test)]
mod http {
    use crate::{GatewayError, GeminiClient, GenerateContentRequest};
    use mockito::Matcher;
    use serde_json::json;

    const REPLY: &str = r#"{"candidates":[{"content":{"parts":[{"text":"[]"}]}}]}"#;

    #[tokio::test]
    async fn posts_to_model_endpoint_with_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "secret".into()))
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": {"temperature": 0.3}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(REPLY)
            .create_async()
            .await;

        let client = GeminiClient::new("secret", format!("{}/", server.url()), "gemini-2.5-flash");
        let req = GenerateContentRequest::new("roles").with_temperature(Some(0.3));
        let text = client.generate_text(&req).await.unwrap();
        assert_eq!(text, "[]");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("quota exhausted")
            .create_async()
            .await;

        let client = GeminiClient::new("k", server.url(), "m");
        let err = client
            .generate_text(&GenerateContentRequest::new("x"))
            .await
            .unwrap_err();
        match err {
            GatewayError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exhausted");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocked_prompt_and_bad_json_are_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/blocked:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/v1beta/models/garbled:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let req = GenerateContentRequest::new("x");
        let blocked = GeminiClient::new("k", server.url(), "blocked");
        assert!(matches!(
            blocked.generate_text(&req).await,
            Err(GatewayError::Blocked(r)) if r == "SAFETY"
        ));
        let garbled = GeminiClient::new("k", server.url(), "garbled");
        assert!(matches!(garbled.generate_text(&req).await, Err(GatewayError::Decode(_))));
    }

    #[test]
    fn from_env_requires_key() {
        let err = GeminiClient::from_env("GEMINI_GATEWAY_TEST_UNSET_KEY", "http://x", "m").unwrap_err();
        assert!(matches!(err, GatewayError::MissingApiKey(v) if v == "GEMINI_GATEWAY_TEST_UNSET_KEY"));
    }
}
