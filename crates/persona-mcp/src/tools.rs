//! The tool surface: declarations served by `tools/list` and the dispatch
//! behind `tools/call`.
//!
//! Six tools map one-to-one onto repository operations. Argument bags are
//! extracted with serde into per-tool structs; missing or mis-typed fields
//! are the caller's error, anything the repository raises is passed through
//! unchanged.

use persona_core::{
  persona::PersonaSummary, repo::PersonaRepository, store::PersonaStore,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::error::ServerError;

// ─── Declarations ────────────────────────────────────────────────────────────

/// The `tools/list` payload: name, description and JSON Schema of every tool.
pub fn declarations() -> Vec<Value> {
  vec![
    json!({
      "name": "create_persona",
      "description": "Create a new AI agent persona with a name, headline, and Markdown prompt defining its behaviour",
      "inputSchema": {
        "type": "object",
        "properties": {
          "name": {
            "type": "string",
            "description": "The name of the persona",
          },
          "headline": {
            "type": "string",
            "description": "A short headline describing the persona and its responsibilities",
          },
          "content": {
            "type": "string",
            "description": "The full Markdown prompt defining the persona's behaviour and deliverables",
          },
        },
        "required": ["name", "headline", "content"],
      },
    }),
    json!({
      "name": "list_personas",
      "description": "List all active AI agent personas",
      "inputSchema": {
        "type": "object",
        "properties": {},
        "required": [],
      },
    }),
    json!({
      "name": "add_reflection",
      "description": "Adds a reflection to an existing persona, which is a short text reflecting on the persona's performance or behaviour in a specific interaction",
      "inputSchema": {
        "type": "object",
        "properties": {
          "slug": {
            "type": "string",
            "description": "The slug of the persona to add a reflection to",
          },
          "reflection": {
            "type": "string",
            "description": "The reflection text to add to the persona's history",
          },
        },
        "required": ["slug", "reflection"],
      },
    }),
    json!({
      "name": "update_persona",
      "description": "Updates an existing persona's content with new Markdown prompt defining its updated behaviour and deliverables",
      "inputSchema": {
        "type": "object",
        "properties": {
          "slug": {
            "type": "string",
            "description": "The slug of the persona to update",
          },
          "content": {
            "type": "string",
            "description": "The new full Markdown prompt defining the updated persona's behaviour and deliverables",
          },
        },
        "required": ["slug", "content"],
      },
    }),
    json!({
      "name": "get_persona",
      "description": "Retrieves the full content of a persona by its slug so that it can be applied to an interaction",
      "inputSchema": {
        "type": "object",
        "properties": {
          "slug": {
            "type": "string",
            "description": "The slug of the persona to retrieve",
          },
        },
        "required": ["slug"],
      },
    }),
    json!({
      "name": "get_reflections",
      "description": "Retrieves all reflections for a persona, which are short texts reflecting on the persona's performance or behaviour in specific interactions",
      "inputSchema": {
        "type": "object",
        "properties": {
          "slug": {
            "type": "string",
            "description": "The slug of the persona to retrieve reflections for",
          },
        },
        "required": ["slug"],
      },
    }),
  ]
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One `text` content block in a tool-call result.
#[derive(Debug, Serialize)]
pub struct ContentBlock {
  #[serde(rename = "type")]
  pub kind: &'static str,
  pub text: String,
}

impl ContentBlock {
  fn text(text: impl Into<String>) -> Self {
    Self { kind: "text", text: text.into() }
  }
}

/// Render one roster line as a fenced JSON block. Field order on
/// [`PersonaSummary`] is the advertised key order.
fn render_listing(summary: &PersonaSummary) -> String {
  let body = serde_json::to_string_pretty(summary).unwrap_or_default();
  format!("```json\n{body}\n```")
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CreateArgs {
  name:     String,
  headline: String,
  content:  String,
}

#[derive(Debug, Deserialize)]
struct SlugArgs {
  slug: String,
}

#[derive(Debug, Deserialize)]
struct ReflectionArgs {
  slug:       String,
  reflection: String,
}

#[derive(Debug, Deserialize)]
struct UpdateArgs {
  slug:    String,
  content: String,
}

fn extract<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ServerError> {
  serde_json::from_value(arguments).map_err(|e| ServerError::InvalidArgs {
    tool:    tool.to_owned(),
    message: e.to_string(),
  })
}

/// Route one `tools/call` to the repository and render the result as text
/// content blocks.
pub async fn dispatch<S>(
  repo: &PersonaRepository<S>,
  params: Option<Value>,
) -> Result<Vec<ContentBlock>, ServerError>
where
  S: PersonaStore,
{
  let params = params.unwrap_or_default();
  let name = params
    .get("name")
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_owned();
  let arguments = params
    .get("arguments")
    .cloned()
    .unwrap_or_else(|| json!({}));

  match name.as_str() {
    "create_persona" => {
      let args: CreateArgs = extract(&name, arguments)?;
      repo.create(&args.name, &args.headline, &args.content).await?;
      Ok(vec![ContentBlock::text("Persona created successfully")])
    }

    "list_personas" => {
      let personas = repo.list().await?;
      Ok(
        personas
          .iter()
          .map(|p| ContentBlock::text(render_listing(p)))
          .collect(),
      )
    }

    "add_reflection" => {
      let args: ReflectionArgs = extract(&name, arguments)?;
      repo.add_reflection(&args.slug, &args.reflection).await?;
      Ok(vec![ContentBlock::text("Reflection added successfully")])
    }

    "update_persona" => {
      let args: UpdateArgs = extract(&name, arguments)?;
      repo.update(&args.slug, &args.content).await?;
      Ok(vec![ContentBlock::text("Persona updated successfully")])
    }

    "get_persona" => {
      let args: SlugArgs = extract(&name, arguments)?;
      let document = repo.get(&args.slug).await?;
      Ok(vec![ContentBlock::text(document.content)])
    }

    "get_reflections" => {
      let args: SlugArgs = extract(&name, arguments)?;
      let document = repo.get(&args.slug).await?;
      Ok(
        document
          .reflections
          .into_iter()
          .map(ContentBlock::text)
          .collect(),
      )
    }

    other => Err(ServerError::UnknownTool(other.to_owned())),
  }
}
