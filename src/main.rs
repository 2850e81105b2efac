use anyhow::{Context, Result, anyhow};
use clap::Parser;
use snake_arcade::account::{JsonFileStore, MemoryStore, ScoreStore};
use snake_arcade::game::GameConfig;
use snake_arcade::modes::{HumanMode, LoginMode};
use snake_arcade::session::PlayerSession;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Terminal Snake with an email login and a saved max score")]
struct Cli {
    /// Log in with this email instead of prompting for one
    #[arg(long, env = "SNAKE_ARCADE_EMAIL")]
    email: Option<String>,

    /// JSON file holding users and their max scores
    #[arg(long, env = "SNAKE_ARCADE_STORE", default_value = "scores.json")]
    store: PathBuf,

    /// Keep users in memory only; nothing is saved. Overrides --store
    #[arg(long)]
    memory_store: bool,

    /// JSON game config; missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board side length in cells
    #[arg(long)]
    grid_size: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Append logs to this file; the terminal is taken by the game
    #[arg(long, env = "SNAKE_ARCADE_LOG")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = build_config(&cli)?;

    let store: Arc<dyn ScoreStore> = if cli.memory_store {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(&cli.store))
    };

    let user = LoginMode::new(Arc::clone(&store))
        .run(
            cli.email.as_deref(),
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await?;

    let session = PlayerSession::start(store, user.email).await;
    let mut human_mode = HumanMode::new(config, session);
    human_mode.run().await?;

    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load game config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }

    config.validate().context("Invalid game config")?;
    Ok(config)
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snake_arcade=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("{err}"))
        .context("Failed to install tracing subscriber")
}
