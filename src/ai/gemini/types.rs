//! Gemini request payload types shared by the candidate payload shapes.

use serde::Serialize;

/// Gemini content container used in `generateContent` requests.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// Text content part.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Part {
    pub text: String,
}

/// Body of the `prompt` candidate shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptText {
    pub text: String,
}
