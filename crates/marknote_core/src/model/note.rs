//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note shape and its partial-update patch.
//! - Provide tag helpers that keep the no-duplicates invariant.
//!
//! # Invariants
//! - `id` is never changed after creation.
//! - `updated_at >= created_at`.
//! - `tags` keeps insertion order and holds no duplicates (exact match).

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Title given to freshly created notes.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

const PREVIEW_MAX_CHARS: usize = 100;

static PREVIEW_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#*\-_]").expect("valid preview symbol regex"));

/// Stable note identifier: creation time in epoch milliseconds, as text.
pub type NoteId = String;

/// One markdown note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Markdown source text.
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note with default title, empty content and no tags.
    pub fn new(id: impl Into<NoteId>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_NOTE_TITLE.to_string(),
            content: String::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns whether `tag` is attached (case-sensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Sets `updated_at`, clamped so it never precedes `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Applies a patch without touching timestamps.
    pub fn apply(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(tags) = patch.tags {
            self.tags = dedup_tags(tags);
        }
    }

    /// List preview: first 100 characters with markdown markers removed.
    pub fn preview(&self) -> String {
        let head: String = self.content.chars().take(PREVIEW_MAX_CHARS).collect();
        PREVIEW_SYMBOL_RE.replace_all(&head, "").trim().to_string()
    }
}

/// Partial update for `Note`. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

/// Trims a user-entered tag; blank input yields `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Drops repeated tags, keeping the first occurrence order.
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}
