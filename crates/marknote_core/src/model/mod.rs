//! Domain model for notes.
//!
//! # Invariants
//! - Every note is identified by an immutable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
