//! Core domain logic for marknote.
//! This crate owns note invariants, persistence and the summarize contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod summarize;

pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::note::{Note, NoteId, NotePatch, DEFAULT_NOTE_TITLE};
pub use service::clock::{Clock, ManualClock, SystemClock};
pub use service::note_filter::{all_tags, filter_notes, NoteFilter};
pub use service::notes_manager::{NotesManager, NOTES_STORAGE_KEY};
pub use service::theme_settings::{ThemePreference, ThemeSettings, THEME_STORAGE_KEY};
pub use store::{
    KeyValueStore, MemoryStore, PersistentStore, SqliteStore, StoreError, StoreResult,
};
pub use summarize::{
    OfflineSummarizer, SummarizeClient, SummarizeRequest, SummarizeResponse, Summarizer,
    SummaryGate, SummaryResult, SummaryTicket,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
