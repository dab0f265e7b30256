//! Error type for the protocol layer.

use thiserror::Error;

/// A failure while serving one `tools/call`. Never fatal to the process;
/// each variant maps to the JSON-RPC error code it surfaces as.
#[derive(Debug, Error)]
pub enum ServerError {
  #[error("unknown tool: {0}")]
  UnknownTool(String),

  #[error("invalid arguments for {tool}: {message}")]
  InvalidArgs { tool: String, message: String },

  #[error(transparent)]
  Repo(#[from] persona_core::Error),
}

impl ServerError {
  /// The JSON-RPC error code this failure is reported under. Malformed
  /// argument bags are the caller's fault (`-32602`); everything else is an
  /// internal error (`-32603`), unknown tools included.
  pub fn code(&self) -> i64 {
    match self {
      ServerError::InvalidArgs { .. } => -32602,
      ServerError::UnknownTool(_) | ServerError::Repo(_) => -32603,
    }
  }
}
