//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate note mutations and persistence behind one manager.
//! - Keep front ends decoupled from storage details.

pub mod clock;
pub mod note_filter;
pub mod notes_manager;
pub mod theme_settings;
