//! MCP protocol layer for the persona server.
//!
//! Exposes the persona repository as a set of tools over newline-delimited
//! JSON-RPC on stdio, generic over any
//! [`persona_core::store::PersonaStore`] backend.

pub mod error;
pub mod server;
pub mod tools;

pub use error::ServerError;

use serde::Deserialize;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with the
/// `NOTION_TOKEN` and `PERSONA_DATABASE_ID` environment variables layered on
/// top.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub notion_token:        String,
  pub persona_database_id: String,
}
