//! Typed client for the OpenAI-compatible chat-completion API.

use crate::config::ProviderConfig;
use crate::error::SummarizeError;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates concise, clear summaries of notes. \
Keep summaries brief (2-4 sentences) and focus on the main points.";

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Trimmed text of the first choice, if non-empty.
    pub fn first_text(&self) -> Option<String> {
        self.choices
            .as_deref()
            .and_then(<[ChatChoice]>::first)
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

pub struct ChatCompletionClient {
    endpoint: String,
    config: ProviderConfig,
    client: reqwest::Client,
}

impl ChatCompletionClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            config,
            client,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Asks the provider for a summary of `content`.
    ///
    /// Issues exactly one request; no retries.
    pub async fn summarize(&self, api_key: &str, content: &str) -> Result<String, SummarizeError> {
        let user_prompt = format!("Please summarize the following note:\n\n{content}");
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let started_at = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(SummarizeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "event=provider_call module=provider status=error http_status={} duration_ms={} body={}",
                status.as_u16(),
                started_at.elapsed().as_millis(),
                body.replace(['\n', '\r'], " ")
            );
            return Err(SummarizeError::from_provider_status(status));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(SummarizeError::InvalidProviderBody)?;
        let summary = completion.first_text().ok_or(SummarizeError::EmptySummary)?;
        info!(
            "event=provider_call module=provider status=ok model={} duration_ms={}",
            self.config.model,
            started_at.elapsed().as_millis()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::ChatCompletionResponse;

    #[test]
    fn first_text_trims_and_rejects_blank() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Summary.  "}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("Summary."));

        let blank: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert!(blank.first_text().is_none());

        let empty: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.first_text().is_none());

        let null_choices: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":null}"#).unwrap();
        assert!(null_choices.first_text().is_none());
    }
}
