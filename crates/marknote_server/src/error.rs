//! Endpoint error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use marknote_core::summarize::messages;
use marknote_core::SummarizeResponse;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Every way a summarize request can fail.
#[derive(Debug)]
pub enum SummarizeError {
    /// JSON body whose `content` is missing, not a string, or blank.
    InvalidContent,
    /// Body that is not JSON at all, or JSON `null`.
    MalformedBody(String),
    /// No provider API key configured.
    NotConfigured,
    ProviderUnauthorized,
    ProviderRateLimited,
    ProviderUnavailable,
    /// Any other non-2xx provider status.
    ProviderStatus { status: u16, status_text: String },
    /// Provider answered 2xx without usable summary text.
    EmptySummary,
    /// Network failure talking to the provider.
    Transport(reqwest::Error),
    /// Provider answered 2xx with a body that is not a chat completion.
    InvalidProviderBody(reqwest::Error),
    /// Panic or other unexpected failure inside the handler.
    Internal(String),
}

impl SummarizeError {
    /// Classifies a non-success provider status.
    pub fn from_provider_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::ProviderUnauthorized,
            429 => Self::ProviderRateLimited,
            500 => Self::ProviderUnavailable,
            code => Self::ProviderStatus {
                status: code,
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidContent => StatusCode::BAD_REQUEST,
            Self::ProviderUnauthorized => StatusCode::UNAUTHORIZED,
            Self::ProviderRateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ProviderStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::NotConfigured
            | Self::ProviderUnavailable
            | Self::EmptySummary
            | Self::Transport(_)
            | Self::InvalidProviderBody(_)
            | Self::MalformedBody(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message placed in the `error` field.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidContent => messages::CONTENT_REQUIRED.to_string(),
            Self::NotConfigured => messages::NOT_CONFIGURED.to_string(),
            Self::ProviderUnauthorized => messages::INVALID_API_KEY.to_string(),
            Self::ProviderRateLimited => messages::RATE_LIMITED.to_string(),
            Self::ProviderUnavailable => messages::PROVIDER_UNAVAILABLE.to_string(),
            Self::ProviderStatus { status_text, .. } => format!("AI service error: {status_text}"),
            Self::EmptySummary => messages::SUMMARY_FAILED.to_string(),
            Self::Transport(_)
            | Self::InvalidProviderBody(_)
            | Self::MalformedBody(_)
            | Self::Internal(_) => messages::UNEXPECTED.to_string(),
        }
    }
}

impl Display for SummarizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContent => write!(f, "invalid summarize request content"),
            Self::NotConfigured => write!(f, "provider API key is not configured"),
            Self::ProviderUnauthorized => write!(f, "provider rejected the API key"),
            Self::ProviderRateLimited => write!(f, "provider rate limit exceeded"),
            Self::ProviderUnavailable => write!(f, "provider internal error"),
            Self::ProviderStatus {
                status,
                status_text,
            } => write!(f, "provider returned {status} {status_text}"),
            Self::EmptySummary => write!(f, "provider returned no summary text"),
            Self::Transport(err) => write!(f, "provider request failed: {err}"),
            Self::InvalidProviderBody(err) => write!(f, "undecodable provider response: {err}"),
            Self::MalformedBody(details) => write!(f, "unreadable request body: {details}"),
            Self::Internal(details) => write!(f, "internal error: {details}"),
        }
    }
}

impl Error for SummarizeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) | Self::InvalidProviderBody(err) => Some(err),
            _ => None,
        }
    }
}

impl IntoResponse for SummarizeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=summarize module=server status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        } else {
            warn!(
                "event=summarize module=server status=rejected http_status={} error={}",
                status.as_u16(),
                self
            );
        }
        (status, Json(SummarizeResponse::error(self.message()))).into_response()
    }
}
