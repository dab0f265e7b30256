//! [`NotionStore`] — the Notion-backed [`PersonaStore`] implementation.
//!
//! Personas are pages in one pre-provisioned root database. Each persona
//! page owns a child database that is its append-only history log, and the
//! log's id is written back onto the page's `History` property so reads
//! never have to walk the page's child blocks. Entry contents are uploaded
//! as file blobs and attached to entry rows.
//!
//! Every operation is a single-shot HTTP round-trip: no retry, no paging
//! (logs and rosters are expected to stay well under one result page).

use std::time::Duration;

use chrono::Utc;
use persona_core::{
  history::{BlobId, ContentRef, EntryKind, LogEntry, NewLogEntry},
  persona::{NewPersona, Persona, PersonaStatus},
  store::PersonaStore,
};
use reqwest::{Client, RequestBuilder, Response, multipart};
use serde_json::json;
use uuid::Uuid;

use crate::{
  Error, Result,
  decode::{RawCreated, RawErrorBody, RawPage, RawQueryResults},
  encode::{
    decode_uuid, encode_dt, encode_entry_kind, encode_status, entry_filename,
    file_upload_prop, rich_text_prop, select_prop, status_prop, title_prop,
  },
};

const API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Connection settings for the Notion API.
#[derive(Debug, Clone)]
pub struct NotionConfig {
  /// Integration token, sent as a bearer credential on every API call.
  pub token: String,
  /// Id of the pre-provisioned root persona database.
  pub persona_database_id: String,
}

/// A persona store backed by the Notion API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct NotionStore {
  client: Client,
  config: NotionConfig,
}

impl NotionStore {
  pub fn new(config: NotionConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String { format!("{API_BASE}{path}") }

  /// Attach the bearer token and version header every API call needs.
  /// Blob downloads go to pre-signed URLs and must NOT go through this.
  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req
      .bearer_auth(&self.config.token)
      .header("Notion-Version", NOTION_VERSION)
  }

  /// Turn a non-success response into [`Error::Api`], lifting the message
  /// out of Notion's error body when one parses.
  async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RawErrorBody>(&body)
      .map(|e| e.message)
      .unwrap_or(body);
    Err(Error::Api { status: status.as_u16(), message })
  }

  /// `POST /databases/{id}/query`
  async fn query_database(
    &self,
    database_id: &str,
    body: serde_json::Value,
  ) -> Result<Vec<RawPage>> {
    let url = self.url(&format!("/databases/{database_id}/query"));
    let resp = self.auth(self.client.post(url)).json(&body).send().await?;
    let results: RawQueryResults = Self::check(resp).await?.json().await?;
    Ok(results.results)
  }
}

impl PersonaStore for NotionStore {
  type Error = Error;

  // ── Personas ──────────────────────────────────────────────────────────────

  async fn create_persona(&self, input: NewPersona) -> Result<Persona> {
    // The persona page itself.
    let page_body = json!({
      "parent": { "database_id": self.config.persona_database_id },
      "properties": {
        "Name":     title_prop(&input.name),
        "Status":   status_prop(encode_status(PersonaStatus::Active)),
        "Slug":     rich_text_prop(&input.slug),
        "Headline": rich_text_prop(&input.headline),
      },
    });
    let resp = self
      .auth(self.client.post(self.url("/pages")))
      .json(&page_body)
      .send()
      .await?;
    let page: RawCreated = Self::check(resp).await?.json().await?;
    let persona_id = decode_uuid(&page.id)?;

    // Its history log: a child database under the page.
    let db_body = json!({
      "parent": { "type": "page_id", "page_id": page.id },
      "title": [{
        "type": "text",
        "text": { "content": format!("{} Persona History", input.name) },
      }],
      "properties": {
        "Date": { "title": {} },
        "Document Type": {
          "type": "select",
          "select": { "options": [
            { "name": encode_entry_kind(EntryKind::Checkpoint) },
            { "name": encode_entry_kind(EntryKind::Delta) },
          ] },
        },
        "Content": { "type": "files", "files": {} },
      },
    });
    let resp = self
      .auth(self.client.post(self.url("/databases")))
      .json(&db_body)
      .send()
      .await?;
    let database: RawCreated = Self::check(resp).await?.json().await?;
    let history_id = decode_uuid(&database.id)?;

    // Record the log's id on the page so lookups stay one query deep.
    let patch_body = json!({
      "properties": { "History": rich_text_prop(&database.id) },
    });
    let resp = self
      .auth(self.client.patch(self.url(&format!("/pages/{persona_id}"))))
      .json(&patch_body)
      .send()
      .await?;
    Self::check(resp).await?;

    Ok(Persona {
      persona_id,
      slug: input.slug,
      name: input.name,
      headline: input.headline,
      status: PersonaStatus::Active,
      history_id,
    })
  }

  async fn find_by_slug(&self, slug: &str) -> Result<Option<Persona>> {
    let body = json!({
      "filter": { "property": "Slug", "rich_text": { "equals": slug } },
    });
    let pages = self
      .query_database(&self.config.persona_database_id, body)
      .await?;
    // Slug uniqueness is not enforced remotely; the first match wins.
    match pages.into_iter().next() {
      Some(page) => Ok(Some(page.into_persona()?)),
      None => Ok(None),
    }
  }

  async fn list_active(&self) -> Result<Vec<Persona>> {
    let body = json!({
      "filter": {
        "property": "Status",
        "status": { "equals": encode_status(PersonaStatus::Active) },
      },
    });
    self
      .query_database(&self.config.persona_database_id, body)
      .await?
      .into_iter()
      .map(RawPage::into_persona)
      .collect()
  }

  async fn set_status(
    &self,
    persona_id: Uuid,
    status: PersonaStatus,
  ) -> Result<()> {
    let body = json!({
      "properties": { "Status": status_prop(encode_status(status)) },
    });
    let resp = self
      .auth(self.client.patch(self.url(&format!("/pages/{persona_id}"))))
      .json(&body)
      .send()
      .await?;
    Self::check(resp).await?;
    Ok(())
  }

  // ── History log ───────────────────────────────────────────────────────────

  async fn append_entry(
    &self,
    history_id: Uuid,
    entry: NewLogEntry,
  ) -> Result<()> {
    let content = file_upload_prop(entry_filename(entry.kind), &entry.content.0);
    let body = json!({
      "parent": { "database_id": history_id },
      "properties": {
        "Date":          title_prop(&encode_dt(Utc::now())),
        "Document Type": select_prop(encode_entry_kind(entry.kind)),
        "Content":       content,
      },
    });
    let resp = self
      .auth(self.client.post(self.url("/pages")))
      .json(&body)
      .send()
      .await?;
    Self::check(resp).await?;
    Ok(())
  }

  async fn list_entries(&self, history_id: Uuid) -> Result<Vec<LogEntry>> {
    // Date titles are RFC 3339, so lexicographic descending is newest first.
    let body = json!({
      "sorts": [{ "property": "Date", "direction": "descending" }],
    });
    self
      .query_database(&history_id.to_string(), body)
      .await?
      .into_iter()
      .map(RawPage::into_log_entry)
      .collect()
  }

  // ── Blobs ─────────────────────────────────────────────────────────────────

  async fn store_blob(&self, text: &str) -> Result<BlobId> {
    // Register the upload, then push the payload in one part.
    let create_body =
      json!({ "mode": "single_part", "content_type": "text/plain" });
    let resp = self
      .auth(self.client.post(self.url("/file_uploads")))
      .json(&create_body)
      .send()
      .await?;
    let upload: RawCreated = Self::check(resp).await?.json().await?;

    let part = multipart::Part::text(text.to_owned())
      .file_name("content.txt")
      .mime_str("text/plain")?;
    let form = multipart::Form::new().part("file", part);
    let url = self.url(&format!("/file_uploads/{}/send", upload.id));
    let resp = self.auth(self.client.post(url)).multipart(form).send().await?;
    Self::check(resp).await?;

    Ok(BlobId(upload.id))
  }

  async fn fetch_blob(&self, content: &ContentRef) -> Result<String> {
    // Pre-signed hosted URL; sending our auth headers would break it.
    let resp = self.client.get(&content.0).send().await?;
    Ok(Self::check(resp).await?.text().await?)
  }
}
