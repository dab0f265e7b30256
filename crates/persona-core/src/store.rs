//! The `PersonaStore` trait.
//!
//! The trait is implemented by storage backends (`persona-store-notion` for
//! the remote document store, [`crate::memory::MemoryStore`] in-process).
//! Higher layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  history::{BlobId, ContentRef, LogEntry, NewLogEntry},
  persona::{NewPersona, Persona, PersonaStatus},
};

/// Abstraction over a persona store backend.
///
/// History writes are append-only: entries are created with a store-assigned
/// timestamp and never edited or removed. The only mutable persona field is
/// the lifecycle status.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait PersonaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Personas ──────────────────────────────────────────────────────────

  /// Create and persist a new persona with `Active` status, allocating its
  /// history log in the same operation. The returned [`Persona`] carries
  /// the log's identifier.
  fn create_persona(
    &self,
    input: NewPersona,
  ) -> impl Future<Output = Result<Persona, Self::Error>> + Send + '_;

  /// Resolve a persona by exact slug match. Returns `None` if no record
  /// matches. Slug uniqueness is not enforced; if the store holds
  /// duplicates, the first match wins.
  fn find_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Persona>, Self::Error>> + Send + 'a;

  /// List all personas with `Active` status, in the store's default order.
  fn list_active(
    &self,
  ) -> impl Future<Output = Result<Vec<Persona>, Self::Error>> + Send + '_;

  /// Set a persona's lifecycle status (soft delete / restore).
  fn set_status(
    &self,
    persona_id: Uuid,
    status: PersonaStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── History log — append-only writes ──────────────────────────────────

  /// Append one entry to a history log. The `recorded_at` timestamp is set
  /// by the store. Nothing validates that a checkpoint already exists; any
  /// number of checkpoints may be appended over time.
  fn append_entry(
    &self,
    history_id: Uuid,
    entry: NewLogEntry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Return all entries of a history log, ordered by `recorded_at`
  /// descending (newest first).
  fn list_entries(
    &self,
    history_id: Uuid,
  ) -> impl Future<Output = Result<Vec<LogEntry>, Self::Error>> + Send + '_;

  // ── Blobs ─────────────────────────────────────────────────────────────

  /// Upload a text payload and return its opaque handle. Single-shot,
  /// whole-payload semantics: no retry, no chunking, no dedup.
  fn store_blob<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<BlobId, Self::Error>> + Send + 'a;

  /// Fetch a text payload by the locator carried on a read-back entry.
  fn fetch_blob<'a>(
    &'a self,
    content: &'a ContentRef,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
