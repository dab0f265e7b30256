//! The persona repository — entity-level operations composed from the store
//! primitives: locate, append, collapse, resolve blobs.

use crate::{
  error::{Error, Result},
  history::{EntryKind, NewLogEntry, collapse},
  persona::{
    NewPersona, Persona, PersonaDocument, PersonaStatus, PersonaSummary,
    derive_slug,
  },
  store::PersonaStore,
};

/// Entity-level operations over a persona store.
///
/// Each operation runs its store round-trips sequentially to completion.
/// Nothing is retried, and multi-step writes are not transactional (see
/// [`PersonaRepository::create`]).
#[derive(Clone)]
pub struct PersonaRepository<S> {
  store: S,
}

impl<S: PersonaStore> PersonaRepository<S> {
  pub fn new(store: S) -> Self { Self { store } }

  /// Create a persona: derive the slug, allocate the entity and its history
  /// log, then record the initial content as the first checkpoint.
  ///
  /// The steps are not transactional: a failure after the entity exists but
  /// before the checkpoint lands leaves a persona whose reads fail with
  /// [`Error::NoCheckpoint`] until an [`update`](Self::update) repairs it.
  pub async fn create(
    &self,
    name: &str,
    headline: &str,
    content: &str,
  ) -> Result<Persona> {
    let input = NewPersona {
      slug:     derive_slug(name),
      name:     name.to_owned(),
      headline: headline.to_owned(),
    };
    let persona =
      self.store.create_persona(input).await.map_err(Error::store)?;

    let blob = self.store.store_blob(content).await.map_err(Error::store)?;
    self
      .store
      .append_entry(persona.history_id, NewLogEntry {
        kind:    EntryKind::Checkpoint,
        content: blob,
      })
      .await
      .map_err(Error::store)?;

    Ok(persona)
  }

  /// List all active personas, in the store's default order.
  pub async fn list(&self) -> Result<Vec<PersonaSummary>> {
    let personas = self.store.list_active().await.map_err(Error::store)?;
    Ok(personas.into_iter().map(PersonaSummary::from).collect())
  }

  /// Read a persona's collapsed document: the latest checkpoint content plus
  /// every reflection recorded after it, newest first.
  pub async fn get(&self, slug: &str) -> Result<PersonaDocument> {
    let persona = self.resolve(slug).await?;
    let entries = self
      .store
      .list_entries(persona.history_id)
      .await
      .map_err(Error::store)?;

    let Some(collapsed) = collapse(&entries) else {
      return Err(Error::NoCheckpoint(slug.to_owned()));
    };

    // Blobs resolve in walk order: deltas newest first, checkpoint last.
    let mut reflections = Vec::with_capacity(collapsed.deltas.len());
    for delta in &collapsed.deltas {
      reflections
        .push(self.store.fetch_blob(&delta.content).await.map_err(Error::store)?);
    }
    let content = self
      .store
      .fetch_blob(&collapsed.checkpoint.content)
      .await
      .map_err(Error::store)?;

    Ok(PersonaDocument {
      slug: persona.slug,
      name: persona.name,
      content,
      reflections,
    })
  }

  /// Replace the persona's current content by appending a new checkpoint.
  /// Earlier reflections stay in the log but become unreachable from future
  /// reads.
  pub async fn update(&self, slug: &str, content: &str) -> Result<()> {
    let persona = self.resolve(slug).await?;
    let blob = self.store.store_blob(content).await.map_err(Error::store)?;
    self
      .store
      .append_entry(persona.history_id, NewLogEntry {
        kind:    EntryKind::Checkpoint,
        content: blob,
      })
      .await
      .map_err(Error::store)
  }

  /// Record a reflection against the persona's history.
  pub async fn add_reflection(
    &self,
    slug: &str,
    reflection: &str,
  ) -> Result<()> {
    let persona = self.resolve(slug).await?;
    let blob =
      self.store.store_blob(reflection).await.map_err(Error::store)?;
    self
      .store
      .append_entry(persona.history_id, NewLogEntry {
        kind:    EntryKind::Delta,
        content: blob,
      })
      .await
      .map_err(Error::store)
  }

  /// Soft delete: flip the status to `Archived`. The history log is left
  /// untouched, and the persona stays reachable by slug.
  pub async fn archive(&self, slug: &str) -> Result<()> {
    let persona = self.resolve(slug).await?;
    self
      .store
      .set_status(persona.persona_id, PersonaStatus::Archived)
      .await
      .map_err(Error::store)
  }

  /// Resolve `slug` or fail with [`Error::PersonaNotFound`].
  async fn resolve(&self, slug: &str) -> Result<Persona> {
    self
      .store
      .find_by_slug(slug)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::PersonaNotFound(slug.to_owned()))
  }
}
