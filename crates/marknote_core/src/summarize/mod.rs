//! Note summarization: wire contract, client proxy and request sequencing.
//!
//! # Responsibility
//! - Define the `POST /api/summarize` request/response bodies shared by the
//!   client proxy and the server endpoint.
//! - Provide `Summarizer` implementations that always return a structured
//!   `SummaryResult` instead of an error.
//!
//! # Invariants
//! - Empty or whitespace-only content is rejected locally, with no request.
//! - No retries: one failure is reported once.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod client;
mod gate;
mod offline;

pub use client::SummarizeClient;
pub use gate::{SummaryGate, SummaryTicket};
pub use offline::OfflineSummarizer;

/// Path of the summarize endpoint, relative to the server base URL.
pub const SUMMARIZE_PATH: &str = "/api/summarize";

/// User-facing messages shared by the client and the endpoint.
pub mod messages {
    pub const EMPTY_CONTENT: &str =
        "Note content is empty. Please add some content before summarizing.";
    pub const CONTENT_REQUIRED: &str = "Note content is required and must be a non-empty string";
    pub const NOT_CONFIGURED: &str = "AI service is not configured. Please add your Groq API key.";
    pub const INVALID_API_KEY: &str = "Invalid API key. Please check your Groq API key.";
    pub const RATE_LIMITED: &str = "Rate limit exceeded. Please try again in a moment.";
    pub const PROVIDER_UNAVAILABLE: &str =
        "Groq service is temporarily unavailable. Please try again later.";
    pub const SUMMARY_FAILED: &str = "Failed to generate summary. Please try again.";
    pub const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";
}

/// Body of `POST /api/summarize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub content: String,
}

/// Body returned by `POST /api/summarize`; exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummarizeResponse {
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            summary: None,
            error: Some(message.into()),
        }
    }
}

/// Outcome handed to callers: a summary, or an error message to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryResult {
    pub fn success(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            summary: String::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Produces a summary for note content.
///
/// Implementations must not panic and must map every failure into
/// `SummaryResult::failure`.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, content: &str) -> SummaryResult;
}

pub(crate) fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{SummarizeResponse, SummaryResult};

    #[test]
    fn response_omits_unset_fields() {
        let json = serde_json::to_string(&SummarizeResponse::summary("short")).unwrap();
        assert_eq!(json, r#"{"summary":"short"}"#);
        let json = serde_json::to_string(&SummarizeResponse::error("nope")).unwrap();
        assert_eq!(json, r#"{"error":"nope"}"#);
    }

    #[test]
    fn failure_has_empty_summary() {
        let result = SummaryResult::failure("bad");
        assert!(!result.is_ok());
        assert!(result.summary.is_empty());
    }
}
