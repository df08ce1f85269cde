//! HTTP proxy to the summarize endpoint.

use super::messages::{EMPTY_CONTENT, SUMMARY_FAILED};
use super::{
    is_blank, SummarizeRequest, SummarizeResponse, Summarizer, SummaryResult, SUMMARIZE_PATH,
};
use async_trait::async_trait;
use log::{error, info, warn};

/// Client for `POST /api/summarize` on a marknote server.
#[derive(Debug, Clone)]
pub struct SummarizeClient {
    endpoint: String,
    client: reqwest::Client,
}

impl SummarizeClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SUMMARIZE_PATH),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Requests a summary of `content`.
    ///
    /// Never fails: blank input, transport errors, non-success statuses and
    /// responses without summary text all become `SummaryResult::failure`.
    pub async fn summarize_note(&self, content: &str) -> SummaryResult {
        if is_blank(content) {
            return SummaryResult::failure(EMPTY_CONTENT);
        }

        let request = SummarizeRequest {
            content: content.to_string(),
        };
        let response = match self.client.post(&self.endpoint).json(&request).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("event=summarize_request module=summarize status=error error={err}");
                return SummaryResult::failure(err.to_string());
            }
        };

        let status = response.status();
        let body = match response.json::<SummarizeResponse>().await {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    "event=summarize_request module=summarize status=error http_status={} error=undecodable_body detail={err}",
                    status.as_u16()
                );
                return SummaryResult::failure(SUMMARY_FAILED);
            }
        };

        if !status.is_success() {
            warn!(
                "event=summarize_request module=summarize status=rejected http_status={}",
                status.as_u16()
            );
            let message = body
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| SUMMARY_FAILED.to_string());
            return SummaryResult::failure(message);
        }

        match body.summary.map(|summary| summary.trim().to_string()) {
            Some(summary) if !summary.is_empty() => {
                info!(
                    "event=summarize_request module=summarize status=ok summary_chars={}",
                    summary.chars().count()
                );
                SummaryResult::success(summary)
            }
            _ => SummaryResult::failure(SUMMARY_FAILED),
        }
    }
}

#[async_trait]
impl Summarizer for SummarizeClient {
    async fn summarize(&self, content: &str) -> SummaryResult {
        self.summarize_note(content).await
    }
}
