//! Transient filter state and pure projections over a note collection.
//!
//! # Invariants
//! - Projections never mutate their input.
//! - Search is a case-insensitive substring match on title or content.
//! - Tag selection uses AND semantics: a note must carry every selected tag.

use crate::model::note::Note;
use std::collections::BTreeSet;

/// Search text plus selected tags. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub search_query: String,
    pub selected_tags: BTreeSet<String>,
}

impl NoteFilter {
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
    }

    /// Selects `tag` if unselected, otherwise deselects it.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
    }

    pub fn clear_tags(&mut self) {
        self.selected_tags.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty() || !self.selected_tags.is_empty()
    }

    /// Returns whether `note` passes both the search and the tag filter.
    pub fn matches(&self, note: &Note) -> bool {
        matches_search(note, &self.search_query)
            && self.selected_tags.iter().all(|tag| note.has_tag(tag))
    }
}

fn matches_search(note: &Note, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    note.title.to_lowercase().contains(&needle) || note.content.to_lowercase().contains(&needle)
}

/// Sorted, deduplicated union of all tags in `notes`.
pub fn all_tags(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .flat_map(|note| note.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Notes passing `filter`, in collection order.
pub fn filter_notes<'a>(notes: &'a [Note], filter: &NoteFilter) -> Vec<&'a Note> {
    notes.iter().filter(|note| filter.matches(note)).collect()
}
