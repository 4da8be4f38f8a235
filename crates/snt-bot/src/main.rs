//! snt-bot binary.
//!
//! Reads `snt-bot.toml` (or the path given with `--config`), opens the SQLite
//! store and answers Telegram updates, either by long polling or behind a
//! webhook endpoint.
//!
//! The webhook itself is registered out of band with `setWebhook`, pointing
//! at `/telegram` and passing the configured `secret_token`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use snt_bot::{
  config::BotConfig,
  dispatch::Dispatcher,
  poll,
  telegram::TelegramClient,
  weather::OpenWeather,
  webhook::{self, WebhookState},
};
use snt_store_sqlite::{SqliteBackend, SqliteStore};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
  /// Long-poll `getUpdates`.
  Poll,
  /// Serve `POST /telegram`.
  Webhook,
}

#[derive(Parser)]
#[command(author, version, about = "SNT community Telegram bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "snt-bot.toml")]
  config: PathBuf,

  /// How updates are received.
  #[arg(short, long, value_enum, default_value_t = Mode::Poll)]
  mode: Mode,
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
    .init();

  let cli = Cli::parse();

  let cfg = BotConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Open SQLite store. Only connectivity failures end up here.
  let store = SqliteStore::open(&cfg.store_config())
    .await
    .with_context(|| format!("failed to open database at {:?}", cfg.database_path))?;
  let backend = SqliteBackend::new(store);

  let api = TelegramClient::new(&cfg.api_url, &cfg.token, cfg.poll_timeout_secs)
    .context("failed to build Telegram client")?;
  let weather = OpenWeather::new(cfg.weather.clone()).context("failed to build weather client")?;

  let bot_username = match cfg.bot_username.clone() {
    Some(name) => Some(name),
    None => {
      api
        .get_me()
        .await
        .context("failed to fetch the bot account with getMe")?
        .username
    }
  };
  tracing::info!(bot_username = ?bot_username, "bot account resolved");

  let dispatcher =
    Dispatcher::new(backend, weather, cfg.admin_id).with_bot_username(bot_username);

  match cli.mode {
    Mode::Poll => poll::run(&dispatcher, &api, shutdown_signal()).await,
    Mode::Webhook => {
      let state = WebhookState::new(Arc::new(dispatcher), Arc::new(api), cfg.webhook.secret.clone());
      let app = webhook::router(state);
      let address = format!("{}:{}", cfg.webhook.host, cfg.webhook.port);

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    }
  }

  Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
