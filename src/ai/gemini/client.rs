use crate::models::DEFAULT_BASE_URL;
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Where the API key is attached on upstream requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `x-goog-api-key` request header.
    Header,
    /// `key=` query parameter.
    Query,
}

impl FromStr for AuthMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "header" => Ok(AuthMode::Header),
            "query" => Ok(AuthMode::Query),
            other => Err(Error::Config(format!(
                "Unknown auth mode '{}', expected 'header' or 'query'",
                other
            ))),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Header => f.write_str("header"),
            AuthMode::Query => f.write_str("query"),
        }
    }
}

/// Raw upstream response, kept unparsed so callers can decide how to read it.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Lightweight Gemini REST client used by the answer client.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    auth_mode: AuthMode,
    timeout: Duration,
}

impl GeminiHttpClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_mode: AuthMode::Header,
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    /// `generateContent` URL for a model; a `models/` prefix is dropped.
    pub fn generate_content_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// POST a payload to `generateContent` and return the response unparsed.
    ///
    /// Non-2xx statuses are not errors here; only transport failures are.
    pub async fn generate_content<Req: Serialize>(
        &self,
        model: &str,
        request: &Req,
    ) -> Result<UpstreamResponse> {
        let mut builder = self
            .client
            .post(self.generate_content_url(model))
            .timeout(self.timeout)
            .header("Content-Type", "application/json");

        builder = match self.auth_mode {
            AuthMode::Header => builder.header("x-goog-api-key", &self.api_key),
            AuthMode::Query => builder.query(&[("key", &self.api_key)]),
        };

        // Strip the URL so a query-string key never ends up in logs.
        let response = builder.json(request).send().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to send request to Gemini: {}", e);
            e
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to read Gemini response body: {}", e);
            e
        })?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
