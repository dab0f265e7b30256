//! Tests for slug derivation, the collapse walk, and the repository against
//! the in-memory store.

use chrono::{Duration, Utc};

use crate::{
  Error,
  history::{BlobId, ContentRef, EntryKind, LogEntry, NewLogEntry, collapse},
  memory::MemoryStore,
  persona::{NewPersona, derive_slug},
  repo::PersonaRepository,
  store::PersonaStore,
};

// ─── Slug derivation ─────────────────────────────────────────────────────────

#[test]
fn slug_lowercases_and_hyphenates() {
  assert_eq!(derive_slug("Code Reviewer"), "code-reviewer");
  assert_eq!(derive_slug("QA"), "qa");
}

#[test]
fn slug_collapses_whitespace_runs() {
  assert_eq!(derive_slug("Staff   Platform\tEngineer"), "staff-platform-engineer");
}

#[test]
fn slug_strips_punctuation_but_keeps_word_chars() {
  assert_eq!(derive_slug("Dr. Strange's Helper!"), "dr-stranges-helper");
  assert_eq!(derive_slug("snake_case Name"), "snake_case-name");
  assert_eq!(derive_slug("Agent #7 (beta)"), "agent-7-beta");
}

#[test]
fn slug_is_deterministic_and_stays_in_alphabet() {
  let names = ["Émile Zola", "  padded  ", "C++ Dev", "already-a-slug", "日本語 Agent"];
  for name in names {
    let slug = derive_slug(name);
    assert_eq!(slug, derive_slug(name));
    assert!(
      slug.chars().all(|c| c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || c == '_'
        || c == '-'),
      "slug {slug:?} for {name:?} left the allowed alphabet"
    );
  }
}

// ─── Collapse walk ───────────────────────────────────────────────────────────

/// Build an entry recorded `age_secs` in the past; smaller age = newer.
fn entry(kind: EntryKind, key: &str, age_secs: i64) -> LogEntry {
  LogEntry {
    recorded_at: Utc::now() - Duration::seconds(age_secs),
    kind,
    content: ContentRef(key.to_owned()),
  }
}

#[test]
fn collapse_collects_deltas_until_first_checkpoint() {
  // Newest first: r2, r1, then the checkpoint.
  let entries = vec![
    entry(EntryKind::Delta, "r2", 1),
    entry(EntryKind::Delta, "r1", 2),
    entry(EntryKind::Checkpoint, "c1", 3),
  ];

  let collapsed = collapse(&entries).unwrap();
  assert_eq!(collapsed.checkpoint.content.0, "c1");
  let keys: Vec<_> =
    collapsed.deltas.iter().map(|d| d.content.0.as_str()).collect();
  assert_eq!(keys, ["r2", "r1"]);
}

#[test]
fn collapse_stops_at_newest_checkpoint() {
  // Entries older than the newest checkpoint must never be visited.
  let entries = vec![
    entry(EntryKind::Delta, "r3", 1),
    entry(EntryKind::Checkpoint, "c2", 2),
    entry(EntryKind::Delta, "r1", 3),
    entry(EntryKind::Checkpoint, "c1", 4),
  ];

  let collapsed = collapse(&entries).unwrap();
  assert_eq!(collapsed.checkpoint.content.0, "c2");
  assert_eq!(collapsed.deltas.len(), 1);
  assert_eq!(collapsed.deltas[0].content.0, "r3");
}

#[test]
fn collapse_with_checkpoint_on_top_has_no_deltas() {
  let entries = vec![
    entry(EntryKind::Checkpoint, "c2", 1),
    entry(EntryKind::Delta, "r1", 2),
    entry(EntryKind::Checkpoint, "c1", 3),
  ];

  let collapsed = collapse(&entries).unwrap();
  assert_eq!(collapsed.checkpoint.content.0, "c2");
  assert!(collapsed.deltas.is_empty());
}

#[test]
fn collapse_without_checkpoint_is_none() {
  let deltas_only = vec![
    entry(EntryKind::Delta, "r2", 1),
    entry(EntryKind::Delta, "r1", 2),
  ];
  assert!(collapse(&deltas_only).is_none());
  assert!(collapse(&[]).is_none());
}

// ─── Repository ──────────────────────────────────────────────────────────────

fn repo() -> PersonaRepository<MemoryStore> {
  PersonaRepository::new(MemoryStore::new())
}

#[tokio::test]
async fn create_then_get_roundtrip() {
  let repo = repo();
  repo
    .create("Code Reviewer", "Reviews pull requests", "# Reviewer\nBe kind.")
    .await
    .unwrap();

  let doc = repo.get("code-reviewer").await.unwrap();
  assert_eq!(doc.slug, "code-reviewer");
  assert_eq!(doc.name, "Code Reviewer");
  assert_eq!(doc.content, "# Reviewer\nBe kind.");
  assert!(doc.reflections.is_empty());
}

#[tokio::test]
async fn reflections_come_back_newest_first() {
  let repo = repo();
  repo.create("Scribe", "Takes notes", "v1").await.unwrap();
  repo.add_reflection("scribe", "r1").await.unwrap();
  repo.add_reflection("scribe", "r2").await.unwrap();

  let doc = repo.get("scribe").await.unwrap();
  assert_eq!(doc.content, "v1");
  assert_eq!(doc.reflections, ["r2", "r1"]);
}

#[tokio::test]
async fn update_makes_prior_reflections_unreachable() {
  let repo = repo();
  repo.create("Scribe", "Takes notes", "v1").await.unwrap();
  repo.add_reflection("scribe", "stale note").await.unwrap();
  repo.update("scribe", "v2").await.unwrap();

  let doc = repo.get("scribe").await.unwrap();
  assert_eq!(doc.content, "v2");
  assert!(doc.reflections.is_empty(), "deltas behind a checkpoint leaked");
}

#[tokio::test]
async fn reflections_after_update_are_visible() {
  let repo = repo();
  repo.create("Scribe", "Takes notes", "v1").await.unwrap();
  repo.add_reflection("scribe", "old").await.unwrap();
  repo.update("scribe", "v2").await.unwrap();
  repo.add_reflection("scribe", "new").await.unwrap();

  let doc = repo.get("scribe").await.unwrap();
  assert_eq!(doc.content, "v2");
  assert_eq!(doc.reflections, ["new"]);
}

#[tokio::test]
async fn latest_of_many_checkpoints_wins() {
  let repo = repo();
  repo.create("Scribe", "Takes notes", "v1").await.unwrap();
  repo.update("scribe", "v2").await.unwrap();
  repo.update("scribe", "v3").await.unwrap();

  let doc = repo.get("scribe").await.unwrap();
  assert_eq!(doc.content, "v3");
}

#[tokio::test]
async fn list_returns_active_summaries() {
  let repo = repo();
  repo.create("Alpha One", "first", "a").await.unwrap();
  repo.create("Beta Two", "second", "b").await.unwrap();

  let listed = repo.list().await.unwrap();
  assert_eq!(listed.len(), 2);
  let slugs: Vec<_> = listed.iter().map(|s| s.slug.as_str()).collect();
  assert!(slugs.contains(&"alpha-one"));
  assert!(slugs.contains(&"beta-two"));
  let beta = listed.iter().find(|s| s.slug == "beta-two").unwrap();
  assert_eq!(beta.name, "Beta Two");
  assert_eq!(beta.headline, "second");
}

#[tokio::test]
async fn archive_hides_from_list_but_get_still_works() {
  let repo = repo();
  repo.create("Keeper", "stays", "k").await.unwrap();
  repo.create("Goner", "goes", "g").await.unwrap();
  repo.archive("goner").await.unwrap();

  let listed = repo.list().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].slug, "keeper");

  // Soft delete: direct access by slug is not blocked.
  let doc = repo.get("goner").await.unwrap();
  assert_eq!(doc.content, "g");
  repo.add_reflection("goner", "still writable").await.unwrap();
  repo.update("goner", "g2").await.unwrap();
  assert_eq!(repo.get("goner").await.unwrap().content, "g2");
}

#[tokio::test]
async fn unknown_slug_is_persona_not_found() {
  let repo = repo();
  repo.create("Real", "exists", "x").await.unwrap();

  let err = repo.get("nonexistent-slug").await.unwrap_err();
  assert!(matches!(err, Error::PersonaNotFound(ref s) if s == "nonexistent-slug"));

  let err = repo.update("nonexistent-slug", "y").await.unwrap_err();
  assert!(matches!(err, Error::PersonaNotFound(_)));

  let err = repo.add_reflection("nonexistent-slug", "z").await.unwrap_err();
  assert!(matches!(err, Error::PersonaNotFound(_)));

  let err = repo.archive("nonexistent-slug").await.unwrap_err();
  assert!(matches!(err, Error::PersonaNotFound(_)));
}

#[tokio::test]
async fn duplicate_slugs_resolve_to_first_match() {
  // Uniqueness is not enforced; reads take the first record with the slug.
  let repo = repo();
  repo.create("Twin", "first of two", "first").await.unwrap();
  repo.create("Twin", "second of two", "second").await.unwrap();

  let doc = repo.get("twin").await.unwrap();
  assert_eq!(doc.content, "first");
}

#[tokio::test]
async fn persona_without_checkpoint_reads_fail_until_update() {
  let store = MemoryStore::new();
  let repo = PersonaRepository::new(store.clone());

  // Simulate a create that failed after entity allocation: the persona and
  // its (empty) log exist, but no checkpoint was ever appended.
  store
    .create_persona(NewPersona {
      slug:     "half-made".into(),
      name:     "Half Made".into(),
      headline: "interrupted".into(),
    })
    .await
    .unwrap();

  let err = repo.get("half-made").await.unwrap_err();
  assert!(matches!(err, Error::NoCheckpoint(ref s) if s == "half-made"));

  // A reflection alone does not repair the log…
  repo.add_reflection("half-made", "note").await.unwrap();
  let err = repo.get("half-made").await.unwrap_err();
  assert!(matches!(err, Error::NoCheckpoint(_)));

  // …but an update does.
  repo.update("half-made", "whole again").await.unwrap();
  let doc = repo.get("half-made").await.unwrap();
  assert_eq!(doc.content, "whole again");
  assert!(doc.reflections.is_empty());
}

// ─── Blob store ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn blob_roundtrip_preserves_text_exactly() {
  let store = MemoryStore::new();

  for text in ["plain", "", "héllo 世界 🦀", "line one\nline two\n"] {
    let id = store.store_blob(text).await.unwrap();
    let entries_ref = ContentRef(id.0.clone());
    assert_eq!(store.fetch_blob(&entries_ref).await.unwrap(), text);
  }
}

#[tokio::test]
async fn fetch_unknown_blob_is_an_error() {
  let store = MemoryStore::new();
  let err =
    store.fetch_blob(&ContentRef("missing".into())).await.unwrap_err();
  assert!(matches!(err, Error::BlobNotFound(_)));
}

#[tokio::test]
async fn append_to_unknown_log_is_an_error() {
  let store = MemoryStore::new();
  let blob = store.store_blob("text").await.unwrap();
  let err = store
    .append_entry(uuid::Uuid::new_v4(), NewLogEntry {
      kind:    EntryKind::Delta,
      content: BlobId(blob.0),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::LogNotFound(_)));
}
