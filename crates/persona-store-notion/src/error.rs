//! Error type for `persona-store-notion`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport-level failure: connection, TLS, timeout, body read.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// Notion answered with a non-success status.
  #[error("notion api error (status {status}): {message}")]
  Api { status: u16, message: String },

  /// A response carried a page we could not turn into a domain value.
  #[error("decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
