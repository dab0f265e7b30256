//! Typed views of Notion response objects.
//!
//! Responses deserialize into the `Raw*` shapes below, then convert into
//! domain types in one shot. A property that is missing or not the expected
//! shape fails the whole conversion with [`Error::Decode`] rather than
//! defaulting; a page we cannot read is a page we refuse to act on.

use std::collections::HashMap;

use persona_core::{
  history::{ContentRef, LogEntry},
  persona::Persona,
};
use serde::Deserialize;

use crate::{
  Error, Result,
  encode::{decode_dt, decode_entry_kind, decode_status, decode_uuid},
};

// ─── Response envelopes ──────────────────────────────────────────────────────

/// Result list from `POST /databases/{id}/query`.
#[derive(Debug, Deserialize)]
pub struct RawQueryResults {
  pub results: Vec<RawPage>,
}

/// The one field we keep from object-creation responses (pages, databases,
/// file uploads).
#[derive(Debug, Deserialize)]
pub struct RawCreated {
  pub id: String,
}

/// Notion's error body; only the human-readable message is interesting.
#[derive(Debug, Deserialize)]
pub struct RawErrorBody {
  pub message: String,
}

// ─── Pages and properties ────────────────────────────────────────────────────

/// A page object as returned by queries.
#[derive(Debug, Deserialize)]
pub struct RawPage {
  pub id:         String,
  #[serde(default)]
  pub properties: HashMap<String, RawProperty>,
}

/// One property value. The wire object is tagged with a `type` field and
/// populates exactly one of the payloads below; the others stay `None`.
#[derive(Debug, Deserialize)]
pub struct RawProperty {
  #[serde(default)]
  pub title:     Option<Vec<RawRichText>>,
  #[serde(default)]
  pub rich_text: Option<Vec<RawRichText>>,
  #[serde(default)]
  pub select:    Option<RawSelectValue>,
  #[serde(default)]
  pub status:    Option<RawSelectValue>,
  #[serde(default)]
  pub files:     Option<Vec<RawFile>>,
}

/// One span of a rich-text value. Spans that are not plain text (mentions,
/// equations) carry no `text` payload.
#[derive(Debug, Deserialize)]
pub struct RawRichText {
  #[serde(default)]
  pub text: Option<RawTextContent>,
}

#[derive(Debug, Deserialize)]
pub struct RawTextContent {
  pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RawSelectValue {
  pub name: String,
}

/// One attachment in a `files` property. Uploaded blobs come back as hosted
/// files carrying a pre-signed download URL.
#[derive(Debug, Deserialize)]
pub struct RawFile {
  #[serde(default)]
  pub file: Option<RawHostedFile>,
}

#[derive(Debug, Deserialize)]
pub struct RawHostedFile {
  pub url: String,
}

fn first_text(spans: &[RawRichText]) -> Option<&str> {
  spans
    .first()
    .and_then(|s| s.text.as_ref())
    .map(|t| t.content.as_str())
}

impl RawPage {
  fn property(&self, name: &str) -> Result<&RawProperty> {
    self.properties.get(name).ok_or_else(|| {
      Error::Decode(format!("page {}: missing property {name:?}", self.id))
    })
  }

  fn shape_err(&self, name: &str, expected: &str) -> Error {
    Error::Decode(format!(
      "page {}: property {name:?} is not a populated {expected}",
      self.id
    ))
  }

  fn title_text(&self, name: &str) -> Result<&str> {
    self
      .property(name)?
      .title
      .as_deref()
      .and_then(first_text)
      .ok_or_else(|| self.shape_err(name, "title"))
  }

  fn rich_text(&self, name: &str) -> Result<&str> {
    self
      .property(name)?
      .rich_text
      .as_deref()
      .and_then(first_text)
      .ok_or_else(|| self.shape_err(name, "rich_text"))
  }

  fn select_name(&self, name: &str) -> Result<&str> {
    self
      .property(name)?
      .select
      .as_ref()
      .map(|s| s.name.as_str())
      .ok_or_else(|| self.shape_err(name, "select"))
  }

  fn status_name(&self, name: &str) -> Result<&str> {
    self
      .property(name)?
      .status
      .as_ref()
      .map(|s| s.name.as_str())
      .ok_or_else(|| self.shape_err(name, "status"))
  }

  fn file_url(&self, name: &str) -> Result<&str> {
    self
      .property(name)?
      .files
      .as_deref()
      .and_then(|fs| fs.first())
      .and_then(|f| f.file.as_ref())
      .map(|h| h.url.as_str())
      .ok_or_else(|| self.shape_err(name, "hosted file"))
  }

  /// Read a root-database row as a persona.
  pub fn into_persona(self) -> Result<Persona> {
    Ok(Persona {
      persona_id: decode_uuid(&self.id)?,
      slug:       self.rich_text("Slug")?.to_owned(),
      name:       self.title_text("Name")?.to_owned(),
      headline:   self.rich_text("Headline")?.to_owned(),
      status:     decode_status(self.status_name("Status")?)?,
      history_id: decode_uuid(self.rich_text("History")?)?,
    })
  }

  /// Read a history-database row as a log entry.
  pub fn into_log_entry(self) -> Result<LogEntry> {
    Ok(LogEntry {
      recorded_at: decode_dt(self.title_text("Date")?)?,
      kind:        decode_entry_kind(self.select_name("Document Type")?)?,
      content:     ContentRef(self.file_url("Content")?.to_owned()),
    })
  }
}
