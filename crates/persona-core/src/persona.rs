//! Persona — the named entity that owns a history log.
//!
//! A persona record holds identity and lifecycle metadata only. Its actual
//! content lives in the history log and is reconstructed on read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a persona. Archiving is a soft delete: archived
/// personas are hidden from listings but stay resolvable by slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaStatus {
  Active,
  Archived,
}

/// A named, sluggable entity with a mutable lifecycle status and an explicit
/// reference to its append-only history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
  pub persona_id: Uuid,
  /// Derived from `name` at creation; immutable thereafter.
  pub slug:       String,
  pub name:       String,
  pub headline:   String,
  pub status:     PersonaStatus,
  /// Identifier of the history log allocated alongside this persona.
  pub history_id: Uuid,
}

/// Input to [`crate::store::PersonaStore::create_persona`].
/// The store allocates the ids and the history log; status starts `Active`.
#[derive(Debug, Clone)]
pub struct NewPersona {
  pub slug:     String,
  pub name:     String,
  pub headline: String,
}

/// The `{slug, name, headline}` projection returned by list operations.
/// Field order here is the serialisation key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaSummary {
  pub slug:     String,
  pub name:     String,
  pub headline: String,
}

impl From<Persona> for PersonaSummary {
  fn from(p: Persona) -> Self {
    Self { slug: p.slug, name: p.name, headline: p.headline }
  }
}

/// The collapsed read model: current content plus every reflection recorded
/// since the last checkpoint, newest first. Never stored, always derived.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaDocument {
  pub slug:        String,
  pub name:        String,
  pub content:     String,
  pub reflections: Vec<String>,
}

/// Derive the URL-safe slug for `name`: lower-cased, each whitespace run
/// becomes a single hyphen, and every remaining character outside
/// `[a-z0-9_-]` is stripped. Deterministic; applied once at creation.
pub fn derive_slug(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut in_whitespace = false;
  for c in name.to_lowercase().chars() {
    if c.is_whitespace() {
      if !in_whitespace {
        slug.push('-');
        in_whitespace = true;
      }
      continue;
    }
    in_whitespace = false;
    if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
      slug.push(c);
    }
  }
  slug
}
