//! Encoding helpers between Rust domain types and the Notion wire schema.
//!
//! Timestamps are RFC 3339 strings with millisecond precision and a literal
//! `Z`, the format the history log's `Date` titles already use. Enum-like
//! fields map to the option names provisioned on the remote databases.
//! Write-side property payloads are built as [`serde_json::Value`] fragments.

use chrono::{DateTime, SecondsFormat, Utc};
use persona_core::{history::EntryKind, persona::PersonaStatus};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| Error::Decode(format!("bad id {s:?}: {e}")))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── PersonaStatus ───────────────────────────────────────────────────────────

pub fn encode_status(s: PersonaStatus) -> &'static str {
  match s {
    PersonaStatus::Active => "Active",
    PersonaStatus::Archived => "Archived",
  }
}

pub fn decode_status(s: &str) -> Result<PersonaStatus> {
  match s {
    "Active" => Ok(PersonaStatus::Active),
    "Archived" => Ok(PersonaStatus::Archived),
    other => Err(Error::Decode(format!("unknown status: {other:?}"))),
  }
}

// ─── EntryKind ───────────────────────────────────────────────────────────────

pub fn encode_entry_kind(k: EntryKind) -> &'static str {
  match k {
    EntryKind::Checkpoint => "Persona Update",
    EntryKind::Delta => "Reflection",
  }
}

pub fn decode_entry_kind(s: &str) -> Result<EntryKind> {
  match s {
    "Persona Update" => Ok(EntryKind::Checkpoint),
    "Reflection" => Ok(EntryKind::Delta),
    other => Err(Error::Decode(format!("unknown document type: {other:?}"))),
  }
}

/// Attachment filename recorded on an entry's `Content` property.
pub fn entry_filename(k: EntryKind) -> &'static str {
  match k {
    EntryKind::Checkpoint => "persona.md",
    EntryKind::Delta => "reflection.md",
  }
}

// ─── Property objects ────────────────────────────────────────────────────────

pub fn title_prop(text: &str) -> Value {
  json!({ "title": [{ "text": { "content": text } }] })
}

pub fn rich_text_prop(text: &str) -> Value {
  json!({ "rich_text": [{ "text": { "content": text } }] })
}

pub fn select_prop(name: &str) -> Value {
  json!({ "select": { "name": name } })
}

pub fn status_prop(name: &str) -> Value {
  json!({ "status": { "name": name } })
}

/// A `files` property holding one freshly uploaded attachment.
pub fn file_upload_prop(filename: &str, upload_id: &str) -> Value {
  json!({ "files": [{ "name": filename, "file_upload": { "id": upload_id } }] })
}
