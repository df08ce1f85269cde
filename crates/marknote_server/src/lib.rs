//! HTTP server exposing `POST /api/summarize`.
//!
//! The endpoint validates note content, resolves the provider API key per
//! request, calls an OpenAI-compatible chat-completion API and maps every
//! outcome to `{ "summary": ... }` or `{ "error": ... }`.

pub mod config;
pub mod error;
pub mod provider;
pub mod routes;

pub use config::{ApiKeySource, ConfigError, EnvApiKey, ProviderConfig, ServerConfig, StaticApiKey};
pub use error::SummarizeError;
pub use provider::ChatCompletionClient;
pub use routes::{router, AppState};
