//! Best-effort dump of the last raw upstream response for debugging.

use crate::ai::gemini::UpstreamResponse;
use chrono::Utc;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Overwrites a file with each upstream response it is handed.
///
/// Writes are uncoordinated; concurrent requests may race for the file.
#[derive(Debug, Clone, Default)]
pub struct ResponseRecorder {
    path: Option<PathBuf>,
}

impl ResponseRecorder {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a response; failures are logged and swallowed.
    pub async fn record(&self, response: &UpstreamResponse) {
        let Some(path) = &self.path else {
            return;
        };

        if let Err(e) = tokio::fs::write(path, render(response)).await {
            warn!("Could not write {}: {}", path.display(), e);
        }
    }
}

fn render(response: &UpstreamResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "RECORDED: {}", Utc::now().to_rfc3339());
    let _ = writeln!(out, "STATUS: {}\n", response.status.as_u16());
    out.push_str("HEADERS:\n");
    for (name, value) in &response.headers {
        let _ = writeln!(
            out,
            "{}: {}",
            name,
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    out.push_str("\nBODY:\n");
    out.push_str(&response.body);
    out
}
