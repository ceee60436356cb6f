use super::AnswerService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Clones share recorded calls and canned answers.
#[derive(Clone)]
pub struct MockAnswerClient {
    answers: Arc<Mutex<Vec<String>>>,
    failure_status: Option<u16>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAnswerClient {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(Mutex::new(Vec::new())),
            failure_status: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_answer(self, answer: String) -> Self {
        self.answers.lock().unwrap().push(answer);
        self
    }

    /// Make every call fail as if the upstream returned `status`.
    pub fn with_upstream_failure(mut self, status: u16) -> Self {
        self.failure_status = Some(status);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `(question, model)` pairs received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAnswerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerService for MockAnswerClient {
    async fn answer(&self, question: &str, model: &str) -> Result<String> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((question.to_string(), model.to_string()));
            calls.len()
        };

        if let Some(status) = self.failure_status {
            return Err(Error::UpstreamHttp {
                status,
                body: "mock upstream failure".to_string(),
            });
        }

        let answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            // Default mock response
            Ok(format!("Mock answer to: {}", question))
        } else {
            let index = (count - 1) % answers.len();
            Ok(answers[index].clone())
        }
    }
}
