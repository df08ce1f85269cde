//! Notes manager: CRUD, tagging and filtering over a persisted collection.
//!
//! # Responsibility
//! - Own the in-memory note collection, the active note and filter state.
//! - Persist the whole collection after every mutation.
//! - Expose derived views (`all_tags`, `filtered_notes`, `active_note`).
//!
//! # Invariants
//! - Note ids are unique within the collection and never change.
//! - New notes are inserted at the head of the collection.
//! - Every mutation refreshes `updated_at` (never below `created_at`).
//! - Filter changes are transient and never persisted.
//! - A failed save leaves the in-memory collection authoritative.

use crate::model::note::{normalize_tag, Note, NoteId, NotePatch};
use crate::service::clock::{Clock, SystemClock};
use crate::service::note_filter::{self, NoteFilter};
use crate::store::{KeyValueStore, PersistentStore};
use log::{debug, info, warn};

/// Storage key holding the full note collection as a JSON array.
pub const NOTES_STORAGE_KEY: &str = "notes";

/// Single-session notes state backed by a key-value store.
pub struct NotesManager<S: KeyValueStore, C: Clock = SystemClock> {
    store: PersistentStore<S>,
    clock: C,
    notes: Vec<Note>,
    active_note_id: Option<NoteId>,
    filter: NoteFilter,
    last_save_ok: bool,
}

impl<S: KeyValueStore> NotesManager<S> {
    /// Loads the collection from `backend` using the wall clock.
    pub fn new(backend: S) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> NotesManager<S, C> {
    /// Loads the collection from `backend` with an explicit time source.
    ///
    /// The head of the loaded collection becomes the active note.
    pub fn with_clock(backend: S, clock: C) -> Self {
        let store = PersistentStore::new(backend);
        let notes: Vec<Note> = store.load(NOTES_STORAGE_KEY, Vec::new());
        let active_note_id = notes.first().map(|note| note.id.clone());
        info!(
            "event=notes_load module=notes status=ok count={}",
            notes.len()
        );
        Self {
            store,
            clock,
            notes,
            active_note_id,
            filter: NoteFilter::default(),
            last_save_ok: true,
        }
    }

    /// Full collection, newest-created first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn active_note_id(&self) -> Option<&str> {
        self.active_note_id.as_deref()
    }

    /// Note matching the active id, if it still exists.
    pub fn active_note(&self) -> Option<&Note> {
        self.active_note_id
            .as_deref()
            .and_then(|id| self.note(id))
    }

    pub fn filter(&self) -> &NoteFilter {
        &self.filter
    }

    /// Sorted union of tags across all notes.
    pub fn all_tags(&self) -> Vec<String> {
        note_filter::all_tags(&self.notes)
    }

    /// Notes passing the current search text and tag selection.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        note_filter::filter_notes(&self.notes, &self.filter)
    }

    /// Whether the most recent save reached the backend.
    pub fn is_persisted(&self) -> bool {
        self.last_save_ok
    }

    pub fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    pub fn into_store(self) -> PersistentStore<S> {
        self.store
    }

    /// Inserts a default note at the head and makes it active.
    pub fn create_note(&mut self) -> Note {
        let now = self.clock.now();
        let note = Note::new(self.next_note_id(now.timestamp_millis()), now);
        self.notes.insert(0, note.clone());
        self.active_note_id = Some(note.id.clone());
        info!("event=note_create module=notes status=ok note_id={}", note.id);
        self.persist();
        note
    }

    /// Merges `patch` into the note with `id`.
    ///
    /// Returns the updated note, or `None` (and persists nothing) when no
    /// note has that id.
    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> Option<Note> {
        let now = self.clock.now();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            debug!("event=note_update module=notes status=skip reason=not_found note_id={id}");
            return None;
        };
        note.apply(patch);
        note.touch(now);
        let updated = note.clone();
        self.persist();
        Some(updated)
    }

    /// Removes the note with `id`.
    ///
    /// Deleting the active note moves the selection to the new head, or
    /// clears it when the collection becomes empty.
    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        if self.notes.len() == before {
            return false;
        }

        if self.active_note_id.as_deref() == Some(id) {
            self.active_note_id = self.notes.first().map(|note| note.id.clone());
        }
        info!("event=note_delete module=notes status=ok note_id={id}");
        self.persist();
        true
    }

    /// Appends `tag` unless the note already has it (case-sensitive).
    ///
    /// Returns `true` only when the tag was appended. Blank tags are ignored.
    pub fn add_tag_to_note(&mut self, id: &str, tag: &str) -> bool {
        let Some(tag) = normalize_tag(tag) else {
            return false;
        };
        let now = self.clock.now();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            return false;
        };
        if note.has_tag(&tag) {
            return false;
        }
        note.tags.push(tag);
        note.touch(now);
        self.persist();
        true
    }

    /// Removes `tag` from the note, trimmed the same way `add_tag_to_note`
    /// trims it, then matched exactly.
    ///
    /// The note is touched and persisted whenever it exists, even if the tag
    /// was absent. Returns whether the note exists.
    pub fn remove_tag_from_note(&mut self, id: &str, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        let now = self.clock.now();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            return false;
        };
        if let Some(tag) = tag.as_deref() {
            note.tags.retain(|existing| existing != tag);
        }
        note.touch(now);
        self.persist();
        true
    }

    /// Makes `id` the active note. Unknown ids are ignored.
    pub fn set_active_note(&mut self, id: &str) -> bool {
        if self.note(id).is_none() {
            return false;
        }
        self.active_note_id = Some(id.to_string());
        true
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.filter.set_search_query(text);
    }

    pub fn toggle_tag_filter(&mut self, tag: &str) {
        self.filter.toggle_tag(tag);
    }

    pub fn clear_tag_filters(&mut self) {
        self.filter.clear_tags();
    }

    fn next_note_id(&self, mut millis: i64) -> NoteId {
        loop {
            let candidate = millis.to_string();
            if self.note(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }

    fn persist(&mut self) {
        self.last_save_ok = self.store.save(NOTES_STORAGE_KEY, &self.notes);
        if !self.last_save_ok {
            warn!(
                "event=notes_persist module=notes status=degraded count={}",
                self.notes.len()
            );
        }
    }
}
