//! Local summarizer that needs no server, for offline use and demos.

use super::messages::EMPTY_CONTENT;
use super::{is_blank, Summarizer, SummaryResult};
use async_trait::async_trait;

/// Describes the note's size instead of calling a language model.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSummarizer;

impl OfflineSummarizer {
    pub fn summarize_note(&self, content: &str) -> SummaryResult {
        if is_blank(content) {
            return SummaryResult::failure(EMPTY_CONTENT);
        }
        let words = content.split_whitespace().count();
        let lines = content.split('\n').count();
        SummaryResult::success(format!(
            "This note contains approximately {words} words across {lines} lines. \
             Connect a summarize server for an AI-generated summary."
        ))
    }
}

#[async_trait]
impl Summarizer for OfflineSummarizer {
    async fn summarize(&self, content: &str) -> SummaryResult {
        self.summarize_note(content)
    }
}
