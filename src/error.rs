//! Error handling and custom error types
//!
//! Provides unified error handling across the proxy using thiserror.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Gemini API error (status {status}): {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Gemini response was empty or could not be parsed")]
    UpstreamUnparseable,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// HTTP status reported to `/ask` callers for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamHttp { .. } | Error::UpstreamUnparseable | Error::Network(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
