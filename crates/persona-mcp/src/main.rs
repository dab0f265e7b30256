//! persona-mcp server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) with environment
//! overrides layered on top, builds the Notion-backed persona repository,
//! and serves MCP over stdio until stdin closes.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use persona_core::repo::PersonaRepository;
use persona_mcp::ServerConfig;
use persona_store_notion::{NotionConfig, NotionStore};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Persona MCP server backed by Notion")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing. stdout is reserved for protocol frames, so all
  // logging goes to stderr.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  // Load configuration. Both settings are required; a missing one fails
  // startup before the first frame is read.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::default())
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store = NotionStore::new(NotionConfig {
    token:               server_cfg.notion_token,
    persona_database_id: server_cfg.persona_database_id,
  })
  .context("failed to build Notion client")?;

  tracing::info!("persona-mcp serving on stdio");
  persona_mcp::server::run(PersonaRepository::new(store)).await
}
