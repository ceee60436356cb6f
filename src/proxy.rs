//! The answer proxy: validates a question, resolves the model and delegates
//! to the configured [`AnswerService`].

use crate::ai::{AnswerService, GeminiAnswerClient};
use crate::models::{Answer, Config};
use crate::{Error, Result};
use tracing::info;

pub struct AnswerProxy {
    service: Box<dyn AnswerService>,
    default_model: String,
}

impl AnswerProxy {
    /// Build a proxy around any answer service.
    ///
    /// Useful for tests and local harnesses that need to inject mocks.
    pub fn with_service(service: Box<dyn AnswerService>, default_model: String) -> Self {
        Self {
            service,
            default_model,
        }
    }

    /// Construct the production proxy backed by Gemini.
    pub fn from_config(config: &Config) -> Self {
        let client = GeminiAnswerClient::from_config(config, reqwest::Client::new());
        info!(
            model = %config.default_model,
            auth_mode = %config.auth_mode,
            shapes = ?client.payload_shapes(),
            "Answer provider: Gemini"
        );
        Self::with_service(Box::new(client), config.default_model.clone())
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Answer `question` with `model`, or the default model when absent or blank.
    pub async fn answer(&self, question: &str, model: Option<&str>) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput(
                "Missing question parameter 'q'".to_string(),
            ));
        }

        let model = match model.map(str::trim).filter(|m| !m.is_empty()) {
            Some(model) => normalize_model(model)?,
            None => self.default_model.clone(),
        };

        let text = self.service.answer(question, &model).await?;
        Ok(Answer { text, model })
    }
}

/// Caller-supplied model ids end up as one upstream URL path segment, so
/// only plain identifier characters are accepted.
fn normalize_model(model: &str) -> Result<String> {
    let id = model.strip_prefix("models/").unwrap_or(model);
    let valid = !id.is_empty()
        && !id.contains("..")
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));

    if valid {
        Ok(id.to_string())
    } else {
        Err(Error::InvalidInput(format!(
            "Invalid model identifier '{}'",
            model
        )))
    }
}
