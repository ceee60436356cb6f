pub mod answer;
pub mod client;
pub mod payload;
pub mod types;

pub use answer::GeminiAnswerClient;
pub use client::{AuthMode, GeminiHttpClient, UpstreamResponse};
pub use payload::{CandidatePayload, PayloadShape};
