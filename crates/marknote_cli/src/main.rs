//! Command-line front end for marknote.
//!
//! # Responsibility
//! - Drive the notes manager over a SQLite-backed store.
//! - Request summaries from a marknote server, or offline.
//!
//! # Invariants
//! - Every subcommand is one load → mutate/query → persist cycle.
//! - Summarize failures are printed, never panicked on.

use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use marknote_core::{
    Note, NotePatch, NotesManager, OfflineSummarizer, SqliteStore, SummarizeClient, Summarizer,
    SummaryGate, ThemeSettings,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "marknote", version, about = "Markdown notes with AI summaries")]
struct Cli {
    /// SQLite file holding notes and preferences.
    #[arg(long, env = "MARKNOTE_DB", default_value = "marknote.sqlite3")]
    db: PathBuf,

    /// Base URL of the summarize server.
    #[arg(long, env = "MARKNOTE_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Summarize locally without contacting a server.
    #[arg(long)]
    offline: bool,

    /// Absolute directory for rolling log files; logs go to stderr otherwise.
    #[arg(long, env = "MARKNOTE_LOG_DIR")]
    log_dir: Option<String>,

    #[arg(long, env = "MARKNOTE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a note and print its id.
    New {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// List notes, newest first.
    List {
        /// Case-insensitive text to find in title or content.
        #[arg(long)]
        search: Option<String>,
        /// Only notes carrying every given tag.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Print one note in full.
    Show { id: String },
    /// Replace the title and/or content of a note.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Delete { id: String },
    Tag { id: String, tag: String },
    Untag { id: String, tag: String },
    /// Print every tag in use.
    Tags,
    /// Summarize a note (the newest one when no id is given).
    Summarize { id: Option<String> },
    /// Show or change the theme preference.
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeAction {
    Toggle,
    Dark,
    Light,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = match cli.log_dir.as_deref() {
        Some(dir) => marknote_core::init_logging(&cli.log_level, dir),
        None => marknote_core::init_stderr_logging(&cli.log_level),
    };
    if let Err(err) = logging {
        eprintln!("marknote: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("marknote: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let open_store = || {
        SqliteStore::open(&cli.db)
            .map_err(|err| format!("cannot open `{}`: {err}", cli.db.display()))
    };

    if let Command::Theme { action } = &cli.command {
        let mut theme = ThemeSettings::load(open_store()?);
        match action {
            Some(ThemeAction::Toggle) => {
                theme.toggle();
            }
            Some(ThemeAction::Dark) => theme.set_dark(true),
            Some(ThemeAction::Light) => theme.set_dark(false),
            None => {}
        }
        println!("{}", if theme.is_dark() { "dark" } else { "light" });
        return Ok(());
    }

    let mut manager = NotesManager::new(open_store()?);
    let outcome = match cli.command {
        Command::New { title, content } => {
            let note = manager.create_note();
            let patch = NotePatch {
                title,
                content,
                tags: None,
            };
            if !patch.is_empty() {
                manager.update_note(&note.id, patch);
            }
            println!("{}", note.id);
            Ok(())
        }
        Command::List { search, tags } => {
            if let Some(search) = search {
                manager.set_search_query(search);
            }
            for tag in &tags {
                if !manager.filter().selected_tags.contains(tag) {
                    manager.toggle_tag_filter(tag);
                }
            }
            for note in manager.filtered_notes() {
                print_summary_line(note);
            }
            Ok(())
        }
        Command::Show { id } => {
            let note = find(&manager, &id)?;
            print_note(note);
            Ok(())
        }
        Command::Edit { id, title, content } => {
            let patch = NotePatch {
                title,
                content,
                tags: None,
            };
            if patch.is_empty() {
                return Err("nothing to edit: pass --title and/or --content".to_string());
            }
            manager
                .update_note(&id, patch)
                .map(|_| ())
                .ok_or_else(|| not_found(&id))
        }
        Command::Delete { id } => {
            if manager.delete_note(&id) {
                Ok(())
            } else {
                Err(not_found(&id))
            }
        }
        Command::Tag { id, tag } => {
            find(&manager, &id)?;
            if !manager.add_tag_to_note(&id, &tag) {
                debug!("event=cli_tag module=cli status=skip note_id={id} tag={tag}");
            }
            Ok(())
        }
        Command::Untag { id, tag } => {
            if manager.remove_tag_from_note(&id, &tag) {
                Ok(())
            } else {
                Err(not_found(&id))
            }
        }
        Command::Tags => {
            for tag in manager.all_tags() {
                println!("{tag}");
            }
            Ok(())
        }
        Command::Summarize { id } => {
            let note = match id.as_deref() {
                Some(id) => find(&manager, id)?,
                None => manager
                    .active_note()
                    .ok_or_else(|| "no notes to summarize".to_string())?,
            };
            let summarizer: Box<dyn Summarizer> = if cli.offline {
                Box::new(OfflineSummarizer)
            } else {
                Box::new(SummarizeClient::new(&cli.server))
            };

            let mut gate = SummaryGate::new();
            let ticket = gate.begin(&note.id);
            let result = summarizer.summarize(&note.content).await;
            match gate.finish(ticket, result) {
                Some(result) => match result.error {
                    None => {
                        println!("{}", result.summary);
                        Ok(())
                    }
                    Some(message) => Err(message),
                },
                None => Ok(()),
            }
        }
        Command::Theme { .. } => Ok(()),
    };

    if !manager.is_persisted() {
        eprintln!("marknote: warning: changes could not be saved to `{}`", cli.db.display());
    }
    outcome
}

fn find<'a, C: marknote_core::Clock>(
    manager: &'a NotesManager<SqliteStore, C>,
    id: &str,
) -> Result<&'a Note, String> {
    manager.note(id).ok_or_else(|| not_found(id))
}

fn not_found(id: &str) -> String {
    format!("no note with id `{id}`")
}

fn print_summary_line(note: &Note) {
    let tags = if note.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", note.tags.join(", "))
    };
    println!(
        "{}  {}{}  {}",
        note.id,
        note.title,
        tags,
        note.updated_at.format("%Y-%m-%d %H:%M")
    );
    let preview = note.preview();
    if !preview.is_empty() {
        println!("    {preview}");
    }
}

fn print_note(note: &Note) {
    println!("# {}", note.title);
    println!("id:      {}", note.id);
    println!("tags:    {}", note.tags.join(", "));
    println!("created: {}", note.created_at.to_rfc3339());
    println!("updated: {}", note.updated_at.to_rfc3339());
    println!();
    println!("{}", note.content);
}
