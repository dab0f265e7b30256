//! Error types for `persona-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("persona not found: {0}")]
  PersonaNotFound(String),

  #[error("history log not found: {0}")]
  LogNotFound(Uuid),

  #[error("blob not found: {0}")]
  BlobNotFound(String),

  #[error("no checkpoint entry in history for persona: {0}")]
  NoCheckpoint(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error for propagation across the repository boundary.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
