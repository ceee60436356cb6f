//! Candidate request payloads for `generateContent`.
//!
//! Shapes are tried in order until one yields an answer. Only `contents` is
//! the documented Gemini request format; the others are kept for endpoints
//! that accept simpler bodies and have not been verified against the current
//! upstream contract.

use super::types::{Content, PromptText};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{"contents":[{"parts":[{"text":Q}]}]}`
    Contents,
    /// `{"prompt":{"text":Q}}`
    Prompt,
    /// `{"input":Q}`
    Input,
    /// `{"text":Q}`
    Text,
}

impl PayloadShape {
    pub const ALL: [PayloadShape; 4] = [
        PayloadShape::Contents,
        PayloadShape::Prompt,
        PayloadShape::Input,
        PayloadShape::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PayloadShape::Contents => "contents",
            PayloadShape::Prompt => "prompt",
            PayloadShape::Input => "input",
            PayloadShape::Text => "text",
        }
    }

    pub fn build(self, question: &str) -> CandidatePayload {
        match self {
            PayloadShape::Contents => CandidatePayload::Contents {
                contents: vec![Content::text(question)],
            },
            PayloadShape::Prompt => CandidatePayload::Prompt {
                prompt: PromptText {
                    text: question.to_string(),
                },
            },
            PayloadShape::Input => CandidatePayload::Input {
                input: question.to_string(),
            },
            PayloadShape::Text => CandidatePayload::Text {
                text: question.to_string(),
            },
        }
    }

    /// Parse a comma-separated, ordered list such as `contents,prompt`.
    pub fn parse_list(raw: &str) -> Result<Vec<PayloadShape>> {
        let shapes = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<PayloadShape>)
            .collect::<Result<Vec<_>>>()?;

        if shapes.is_empty() {
            return Err(Error::Config(
                "GEMINI_PAYLOAD_SHAPES must name at least one shape".to_string(),
            ));
        }
        Ok(shapes)
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PayloadShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PayloadShape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::Config(format!(
                    "Unknown payload shape '{}', expected one of contents, prompt, input, text",
                    s
                ))
            })
    }
}

/// Serialized request body for one candidate shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CandidatePayload {
    Contents { contents: Vec<Content> },
    Prompt { prompt: PromptText },
    Input { input: String },
    Text { text: String },
}
