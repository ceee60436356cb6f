//! Data models and structures
//!
//! Defines the proxy configuration and the JSON shapes exchanged with
//! `/ask` callers.

use crate::ai::gemini::{AuthMode, PayloadShape};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Question and model as supplied by either `GET /ask` or `POST /ask`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskParams {
    pub q: Option<String>,
    pub question: Option<String>,
    pub model: Option<String>,
}

impl AskParams {
    /// Read each field of a JSON body on its own; non-string values are
    /// ignored rather than invalidating the whole body.
    pub fn from_json(body: &Value) -> Self {
        let field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            q: field("q"),
            question: field("question"),
            model: field("model"),
        }
    }

    /// `q` wins over `question` when both are present and non-blank.
    pub fn question(&self) -> &str {
        [self.q.as_deref(), self.question.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or("")
    }
}

/// JSON body returned by `/ask`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AskResponse {
    pub fn success(answer: String, model: String) -> Self {
        Self {
            ok: true,
            answer: Some(answer),
            model: Some(model),
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            ok: false,
            answer: None,
            model: None,
            error: Some(error),
        }
    }
}

/// Successful outcome of a proxied question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub model: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub default_model: String,
    pub base_url: String,
    pub auth_mode: AuthMode,
    pub timeout: Duration,
    pub payload_shapes: Vec<PayloadShape>,
    pub host: String,
    pub port: u16,
    pub debug_response_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let gemini_api_key = var("GEMINI_API_KEY")
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let auth_mode = match var("GEMINI_AUTH_MODE") {
            Some(raw) => raw.parse()?,
            None => AuthMode::Header,
        };

        let timeout_secs = match var("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "GEMINI_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let payload_shapes = match var("GEMINI_PAYLOAD_SHAPES") {
            Some(raw) => PayloadShape::parse_list(&raw)?,
            None => PayloadShape::ALL.to_vec(),
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a valid port, got '{}'", raw)))?,
            None => 5000,
        };

        Ok(Self {
            gemini_api_key,
            default_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            auth_mode,
            timeout: Duration::from_secs(timeout_secs),
            payload_shapes,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            debug_response_file: var("DEBUG_RESPONSE_FILE").map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
