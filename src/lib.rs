//! Answer proxy for the Gemini generative-language API.
//!
//! Exposes a single `/ask` endpoint that forwards a question upstream,
//! extracts a text answer from whatever JSON comes back, and returns it.

pub mod ai;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod models;
pub mod proxy;
pub mod server;

pub use error::{Error, Result};
