//! In-memory [`PersonaStore`] backend — the reference implementation, used
//! by tests and ephemeral runs where no remote store is wanted.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  history::{BlobId, ContentRef, EntryKind, LogEntry, NewLogEntry},
  persona::{NewPersona, Persona, PersonaStatus},
  store::PersonaStore,
};

/// A stored entry plus the insertion sequence number used to break
/// same-instant timestamp ties deterministically.
#[derive(Debug, Clone)]
struct StoredEntry {
  recorded_at: DateTime<Utc>,
  kind:        EntryKind,
  blob_key:    String,
  seq:         u64,
}

#[derive(Debug, Default)]
struct Inner {
  personas: Vec<Persona>,
  logs:     HashMap<Uuid, Vec<StoredEntry>>,
  blobs:    HashMap<String, String>,
  next_seq: u64,
}

/// An in-memory persona store.
///
/// Cloning is cheap — the state is reference-counted and shared between
/// clones.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl PersonaStore for MemoryStore {
  type Error = Error;

  // ── Personas ──────────────────────────────────────────────────────────────

  async fn create_persona(&self, input: NewPersona) -> Result<Persona> {
    let persona = Persona {
      persona_id: Uuid::new_v4(),
      slug:       input.slug,
      name:       input.name,
      headline:   input.headline,
      status:     PersonaStatus::Active,
      history_id: Uuid::new_v4(),
    };

    let mut inner = self.inner.write().await;
    inner.logs.insert(persona.history_id, Vec::new());
    inner.personas.push(persona.clone());
    Ok(persona)
  }

  async fn find_by_slug(&self, slug: &str) -> Result<Option<Persona>> {
    let inner = self.inner.read().await;
    Ok(inner.personas.iter().find(|p| p.slug == slug).cloned())
  }

  async fn list_active(&self) -> Result<Vec<Persona>> {
    let inner = self.inner.read().await;
    Ok(
      inner
        .personas
        .iter()
        .filter(|p| p.status == PersonaStatus::Active)
        .cloned()
        .collect(),
    )
  }

  async fn set_status(
    &self,
    persona_id: Uuid,
    status: PersonaStatus,
  ) -> Result<()> {
    let mut inner = self.inner.write().await;
    let persona = inner
      .personas
      .iter_mut()
      .find(|p| p.persona_id == persona_id)
      .ok_or_else(|| Error::PersonaNotFound(persona_id.to_string()))?;
    persona.status = status;
    Ok(())
  }

  // ── History log ───────────────────────────────────────────────────────────

  async fn append_entry(
    &self,
    history_id: Uuid,
    entry: NewLogEntry,
  ) -> Result<()> {
    let mut inner = self.inner.write().await;
    let seq = inner.next_seq;
    inner.next_seq += 1;

    let log = inner
      .logs
      .get_mut(&history_id)
      .ok_or(Error::LogNotFound(history_id))?;
    log.push(StoredEntry {
      recorded_at: Utc::now(),
      kind: entry.kind,
      blob_key: entry.content.0,
      seq,
    });
    Ok(())
  }

  async fn list_entries(&self, history_id: Uuid) -> Result<Vec<LogEntry>> {
    let inner = self.inner.read().await;
    let log = inner
      .logs
      .get(&history_id)
      .ok_or(Error::LogNotFound(history_id))?;

    let mut entries = log.clone();
    // Newest first; the sequence number makes same-instant appends ordered.
    entries.sort_by(|a, b| {
      (b.recorded_at, b.seq).cmp(&(a.recorded_at, a.seq))
    });

    Ok(
      entries
        .into_iter()
        .map(|e| LogEntry {
          recorded_at: e.recorded_at,
          kind:        e.kind,
          content:     ContentRef(e.blob_key),
        })
        .collect(),
    )
  }

  // ── Blobs ─────────────────────────────────────────────────────────────────

  async fn store_blob(&self, text: &str) -> Result<BlobId> {
    let key = Uuid::new_v4().to_string();
    let mut inner = self.inner.write().await;
    inner.blobs.insert(key.clone(), text.to_owned());
    Ok(BlobId(key))
  }

  async fn fetch_blob(&self, content: &ContentRef) -> Result<String> {
    let inner = self.inner.read().await;
    inner
      .blobs
      .get(&content.0)
      .cloned()
      .ok_or_else(|| Error::BlobNotFound(content.0.clone()))
  }
}
