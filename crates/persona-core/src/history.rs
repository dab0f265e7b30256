//! History log entries and the collapse algorithm.
//!
//! A persona's history is an append-only, time-ordered sequence of typed
//! entries. Entries are never edited or removed; appending a new checkpoint
//! changes which older entries future reads can reach, nothing else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Entries ─────────────────────────────────────────────────────────────────

/// The kind of a history log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
  /// A full replacement of the persona's current content.
  Checkpoint,
  /// An incremental reflection recorded since the last checkpoint.
  Delta,
}

/// Opaque handle returned by a blob upload, referenced when appending an
/// entry. Distinct from [`ContentRef`]: a backend may hand out different
/// identifiers for writing and for reading back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobId(pub String);

/// Opaque locator carried by a read-back entry; resolves to text via
/// [`crate::store::PersonaStore::fetch_blob`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef(pub String);

/// One immutable history log entry. `recorded_at` is assigned by the store
/// at append time; no field ever changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
  pub recorded_at: DateTime<Utc>,
  pub kind:        EntryKind,
  pub content:     ContentRef,
}

/// Input to [`crate::store::PersonaStore::append_entry`].
/// `recorded_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
  pub kind:    EntryKind,
  pub content: BlobId,
}

// ─── Collapse ────────────────────────────────────────────────────────────────

/// Outcome of collapsing a history: the most recent checkpoint entry plus
/// every delta recorded after it, newest first.
#[derive(Debug)]
pub struct Collapsed<'a> {
  pub checkpoint: &'a LogEntry,
  pub deltas:     Vec<&'a LogEntry>,
}

/// Walk `entries` — which must be ordered newest first — collecting every
/// delta encountered, in encounter order. The walk stops at and includes the
/// first checkpoint; entries older than it are never visited. Returns `None`
/// when the log contains no checkpoint at all.
pub fn collapse(entries: &[LogEntry]) -> Option<Collapsed<'_>> {
  let mut deltas = Vec::new();
  for entry in entries {
    match entry.kind {
      EntryKind::Delta => deltas.push(entry),
      EntryKind::Checkpoint => {
        return Some(Collapsed { checkpoint: entry, deltas });
      }
    }
  }
  None
}
