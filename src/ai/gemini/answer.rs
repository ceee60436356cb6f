//! Gemini implementation of [`AnswerService`].
//!
//! Each configured payload shape is sent in order; the first attempt that
//! produces an answer wins. Transport failures, non-2xx statuses and empty
//! bodies are recorded and the next shape is tried.

use super::client::{AuthMode, GeminiHttpClient};
use super::payload::PayloadShape;
use crate::ai::AnswerService;
use crate::diagnostics::ResponseRecorder;
use crate::extract::answer_from_body;
use crate::models::Config;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Upstream bodies are cut to this many characters in logs and errors.
const MAX_LOGGED_BODY_CHARS: usize = 1500;

pub struct GeminiAnswerClient {
    http: GeminiHttpClient,
    shapes: Vec<PayloadShape>,
    recorder: ResponseRecorder,
}

impl GeminiAnswerClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, timeout, client),
            shapes: PayloadShape::ALL.to_vec(),
            recorder: ResponseRecorder::disabled(),
        }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new_with_client(config.gemini_api_key.clone(), config.timeout, client)
            .with_base_url(config.base_url.clone())
            .with_auth_mode(config.auth_mode)
            .with_payload_shapes(config.payload_shapes.clone())
            .with_recorder(ResponseRecorder::new(config.debug_response_file.clone()))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.http = self.http.with_auth_mode(auth_mode);
        self
    }

    pub fn with_payload_shapes(mut self, shapes: Vec<PayloadShape>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_recorder(mut self, recorder: ResponseRecorder) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn payload_shapes(&self) -> &[PayloadShape] {
        &self.shapes
    }

    /// One request with one payload shape.
    async fn attempt(&self, shape: PayloadShape, question: &str, model: &str) -> Result<String> {
        let response = self
            .http
            .generate_content(model, &shape.build(question))
            .await?;

        self.recorder.record(&response).await;
        info!(shape = %shape, status = %response.status, "Gemini responded");

        if !response.status.is_success() {
            let body = truncate(&response.body, MAX_LOGGED_BODY_CHARS);
            error!(
                "Gemini API error (status {}), body (truncated): {}",
                response.status, body
            );
            return Err(Error::UpstreamHttp {
                status: response.status.as_u16(),
                body,
            });
        }

        answer_from_body(&response.body).ok_or(Error::UpstreamUnparseable)
    }
}

#[async_trait]
impl AnswerService for GeminiAnswerClient {
    async fn answer(&self, question: &str, model: &str) -> Result<String> {
        let mut last_error = None;

        for &shape in &self.shapes {
            debug!(shape = %shape, model, "Sending candidate payload to Gemini");

            match self.attempt(shape, question, model).await {
                Ok(answer) => return Ok(answer),
                Err(e) => {
                    warn!(shape = %shape, "Candidate payload failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(Error::UpstreamUnparseable))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> GeminiAnswerClient {
        GeminiAnswerClient::new("test-key".to_string(), Duration::from_secs(5))
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_answer_parses_candidates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{ "parts": [{ "text": "What is Rust?" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "A systems " }, { "text": "language." }]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = make_client(&server)
            .answer("What is Rust?", "gemini-2.0-flash")
            .await
            .unwrap();
        assert_eq!(answer, "A systems language.");
    }

    #[tokio::test]
    async fn test_answer_falls_back_to_next_payload_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "input": "hi" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "output_text": "from input shape" })),
            )
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(400).set_body_string("bad payload"))
            .expect(2)
            .mount(&server)
            .await;

        let answer = make_client(&server).answer("hi", "m").await.unwrap();
        assert_eq!(answer, "from input shape");
    }

    #[tokio::test]
    async fn test_all_shapes_failing_returns_last_upstream_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(4)
            .mount(&server)
            .await;

        let err = make_client(&server).answer("hi", "m").await.unwrap_err();
        match err {
            Error::UpstreamHttp { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_single_shape_stops_after_one_attempt() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .expect(1)
            .mount(&server)
            .await;

        let err = make_client(&server)
            .with_payload_shapes(vec![PayloadShape::Contents])
            .answer("hi", "m")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamHttp { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_returned_trimmed() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_string("  just text \n"))
            .expect(1)
            .mount(&server)
            .await;

        let answer = make_client(&server).answer("hi", "m").await.unwrap();
        assert_eq!(answer, "just text");
    }

    #[tokio::test]
    async fn test_json_without_text_is_returned_serialized() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "usageMetadata": { "totalTokenCount": 4 } })),
            )
            .mount(&server)
            .await;

        let answer = make_client(&server).answer("hi", "m").await.unwrap();
        assert_eq!(answer, r#"{"usageMetadata":{"totalTokenCount":4}}"#);
    }

    #[tokio::test]
    async fn test_empty_success_body_is_unparseable() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_string("   "))
            .expect(4)
            .mount(&server)
            .await;

        let err = make_client(&server).answer("hi", "m").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnparseable));
    }

    #[tokio::test]
    async fn test_timeout_is_treated_as_failed_attempt() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("too late")
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let err = GeminiAnswerClient::new("test-key".to_string(), Duration::from_millis(100))
            .with_base_url(server.uri())
            .with_payload_shapes(vec![PayloadShape::Contents, PayloadShape::Text])
            .answer("hi", "m")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_timeout_moves_on_to_next_payload_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{ "parts": [{ "text": "slow?" }] }]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "output_text": "too late" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "prompt": { "text": "slow?" } })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "output_text": "from prompt shape" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let answer = GeminiAnswerClient::new("test-key".to_string(), Duration::from_millis(200))
            .with_base_url(server.uri())
            .answer("slow?", "m")
            .await
            .unwrap();
        assert_eq!(answer, "from prompt shape");

        server.verify().await;
    }

    #[tokio::test]
    async fn test_responses_are_recorded() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let debug_path = dir.path().join("last_gemini_response.txt");

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "recorded" }] } }]
            })))
            .mount(&server)
            .await;

        let answer = make_client(&server)
            .with_recorder(ResponseRecorder::new(Some(debug_path.clone())))
            .answer("hi", "m")
            .await
            .unwrap();
        assert_eq!(answer, "recorded");

        let written = std::fs::read_to_string(debug_path).unwrap();
        assert!(written.contains("STATUS: 200"));
        assert!(written.contains("\"recorded\""));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("short", 10), "short");
    }
}
