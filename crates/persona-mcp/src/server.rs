//! Newline-delimited JSON-RPC 2.0 over stdio.
//!
//! One frame per line, requests answered in arrival order. stdout carries
//! response frames and nothing else; all logging goes to stderr. A bad frame
//! never takes the process down: unparseable lines are dropped (there is no
//! id to answer under) and tool failures become error responses.

use persona_core::{repo::PersonaRepository, store::PersonaStore};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader};

use crate::tools;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "notion-personas-mcp";

// ─── Frames ──────────────────────────────────────────────────────────────────

/// One incoming frame. Requests carry an id; notifications do not.
#[derive(Debug, Deserialize)]
pub struct Request {
  #[serde(default)]
  pub id:     Option<Value>,
  pub method: String,
  #[serde(default)]
  pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct Response {
  pub jsonrpc: &'static str,
  pub id:      Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub result:  Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<ErrorFrame>,
}

#[derive(Debug, Serialize)]
pub struct ErrorFrame {
  pub code:    i64,
  pub message: String,
}

impl Response {
  fn ok(id: Value, result: Value) -> Self {
    Self { jsonrpc: "2.0", id, result: Some(result), error: None }
  }

  fn err(id: Value, code: i64, message: String) -> Self {
    Self {
      jsonrpc: "2.0",
      id,
      result: None,
      error: Some(ErrorFrame { code, message }),
    }
  }
}

// ─── Handling ────────────────────────────────────────────────────────────────

fn initialize_result() -> Value {
  json!({
    "protocolVersion": PROTOCOL_VERSION,
    "capabilities": { "tools": {}, "prompts": {}, "resources": {} },
    "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
  })
}

/// Serve one frame. Returns `None` when no response is owed: notifications,
/// and the post-handshake `initialized` signal in particular.
pub async fn handle_request<S>(
  repo: &PersonaRepository<S>,
  request: Request,
) -> Option<Response>
where
  S: PersonaStore,
{
  if matches!(request.method.as_str(), "initialized" | "notifications/initialized") {
    return None;
  }
  let id = request.id?;

  let response = match request.method.as_str() {
    "initialize" => Response::ok(id, initialize_result()),

    "tools/list" => Response::ok(id, json!({ "tools": tools::declarations() })),

    "tools/call" => match tools::dispatch(repo, request.params).await {
      Ok(content) => Response::ok(id, json!({ "content": content })),
      Err(e) => {
        tracing::warn!(error = %e, "tool call failed");
        Response::err(id, e.code(), e.to_string())
      }
    },

    // Declared capabilities with nothing behind them.
    "prompts/list" => Response::ok(id, json!({ "prompts": [] })),
    "resources/list" => Response::ok(id, json!({ "resources": [] })),

    "ping" => Response::ok(id, json!({})),

    other => Response::err(id, -32601, format!("method not found: {other}")),
  };
  Some(response)
}

// ─── Stdio loop ──────────────────────────────────────────────────────────────

/// Read frames from stdin until EOF, writing one response line per request.
pub async fn run<S>(repo: PersonaRepository<S>) -> anyhow::Result<()>
where
  S: PersonaStore,
{
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut stdout = tokio::io::stdout();

  while let Some(line) = lines.next_line().await? {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }

    let request: Request = match serde_json::from_str(line) {
      Ok(request) => request,
      Err(e) => {
        // No id to answer under.
        tracing::debug!(error = %e, "dropping unparseable frame");
        continue;
      }
    };

    tracing::debug!(method = %request.method, "request");
    if let Some(response) = handle_request(&repo, request).await {
      let mut frame = serde_json::to_vec(&response)?;
      frame.push(b'\n');
      stdout.write_all(&frame).await?;
      stdout.flush().await?;
    }
  }

  tracing::info!("stdin closed, shutting down");
  Ok(())
}
