//! roster-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), seeds an
//! in-memory roster store, and serves the JSON API over HTTP.
//!
//! ```text
//! cargo run -p roster-server -- serve
//! cargo run -p roster-server -- export --output roster.csv
//! cargo run -p roster-server -- check --fixture my-roster.json
//! ```

use std::{
  fs::File,
  io::{self, Write as _},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use roster_core::store::RosterStore as _;
use roster_server::ServerConfig;
use roster_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster hierarchy server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Write the roster export as CSV.
  Export {
    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Load a fixture, validate it and audit the derived counters.
  Check {
    /// Fixture to check instead of the configured one.
    #[arg(short, long)]
    fixture: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROSTER"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(server_cfg).await,
    Command::Export { output } => {
      let store = open_store(&server_cfg).await?;
      export(&store, output).await
    }
    Command::Check { fixture } => {
      if fixture.is_some() {
        server_cfg.fixture_path = fixture;
      }
      // Checking never needs the simulated delays.
      server_cfg.latency = false;
      let store = open_store(&server_cfg).await?;
      check(&store).await
    }
  }
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<MemoryStore> {
  let source = match &config.fixture_path {
    Some(path) => path.display().to_string(),
    None => "bundled fixture".to_string(),
  };
  config
    .open_store()
    .await
    .with_context(|| format!("failed to load roster from {source}"))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
  let store = open_store(&config).await?;
  tracing::info!(
    latency = ?store.latency(),
    enforce_window = config.enforce_verification_window,
    "roster store ready"
  );

  let app = roster_server::app(Arc::new(store), &config);
  let address = config.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn export(store: &MemoryStore, output: Option<PathBuf>) -> anyhow::Result<()> {
  let rows = store.export_roster().await?;
  match &output {
    Some(path) => {
      let file =
        File::create(path).with_context(|| format!("failed to create {path:?}"))?;
      roster_api::export::write_csv(&rows, file).context("failed to write CSV")?;
    }
    None => {
      roster_api::export::write_csv(&rows, io::stdout().lock())
        .context("failed to write CSV")?;
    }
  }
  tracing::info!(rows = rows.len(), "roster exported");
  Ok(())
}

async fn check(store: &MemoryStore) -> anyhow::Result<()> {
  store.audit().await.context("roster failed audit")?;
  let stats = store.verification_statistics().await?;
  let districts = store.list_districts().await?;
  let mut stdout = io::stdout().lock();
  writeln!(
    stdout,
    "ok: {} districts, {} courses, {} verified ({}%)",
    districts.len(),
    stats.total_courses,
    stats.verified_courses,
    stats.verified_percentage,
  )?;
  Ok(())
}
