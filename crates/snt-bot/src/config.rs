//! Runtime configuration.
//!
//! Read from an optional TOML file and overridden by `SNT_`-prefixed
//! environment variables (nested keys use a double underscore, e.g.
//! `SNT_WEATHER__API_KEY`).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use snt_store_sqlite::StoreConfig;

use crate::Result;

/// Top-level bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Bot API token issued by @BotFather.
  pub token:             String,
  /// The single user allowed to run `/admin`.
  pub admin_id:          i64,
  /// Used in "write me privately" texts; fetched with `getMe` when unset.
  #[serde(default)]
  pub bot_username:      Option<String>,
  #[serde(default = "default_api_url")]
  pub api_url:           String,
  #[serde(default = "default_database_path")]
  pub database_path:     PathBuf,
  #[serde(default = "default_max_connections")]
  pub max_connections:   u32,
  #[serde(default = "default_poll_timeout")]
  pub poll_timeout_secs: u64,
  #[serde(default)]
  pub weather:           WeatherConfig,
  #[serde(default)]
  pub webhook:           WebhookConfig,
}

/// OpenWeatherMap settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
  pub url:        String,
  pub api_key:    String,
  /// City query, e.g. `Barnaul,ru`.
  pub city:       String,
  /// How the city is named in the reply ("Погода в …").
  pub city_label: String,
}

impl Default for WeatherConfig {
  fn default() -> Self {
    Self {
      url:        "http://api.openweathermap.org/data/2.5/weather".to_string(),
      api_key:    String::new(),
      city:       "Barnaul,ru".to_string(),
      city_label: "Барнауле".to_string(),
    }
  }
}

/// Where the webhook endpoint listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
  pub host:   String,
  pub port:   u16,
  /// Expected `X-Telegram-Bot-Api-Secret-Token` value.
  pub secret: Option<String>,
}

impl Default for WebhookConfig {
  fn default() -> Self {
    Self { host: "0.0.0.0".to_string(), port: 8443, secret: None }
  }
}

fn default_api_url() -> String { "https://api.telegram.org".to_string() }

fn default_database_path() -> PathBuf { PathBuf::from("snt.db") }

fn default_max_connections() -> u32 { 10 }

fn default_poll_timeout() -> u64 { 60 }

impl BotConfig {
  /// Layer `path` (if it exists) under the environment.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = ::config::Config::builder()
      .add_source(::config::File::from(path).required(false))
      .add_source(
        ::config::Environment::with_prefix("SNT")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  pub fn store_config(&self) -> StoreConfig {
    StoreConfig::new(&self.database_path, self.max_connections)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_config(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("snt-bot-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, body).unwrap();
    path
  }

  #[test]
  fn minimal_file_gets_defaults() {
    let path = write_config("minimal", "token = \"123:abc\"\nadmin_id = 466588600\n");
    let cfg = BotConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.token, "123:abc");
    assert_eq!(cfg.admin_id, 466588600);
    assert_eq!(cfg.bot_username, None);
    assert_eq!(cfg.max_connections, 10);
    assert_eq!(cfg.poll_timeout_secs, 60);
    assert_eq!(cfg.database_path, PathBuf::from("snt.db"));
    assert_eq!(cfg.weather.city, "Barnaul,ru");
    assert_eq!(cfg.webhook.port, 8443);
  }

  #[test]
  fn nested_sections_override_defaults() {
    let path = write_config(
      "nested",
      r#"
token = "t"
admin_id = 1
max_connections = 3

[weather]
api_key = "k"
city = "Moscow,ru"

[webhook]
port = 9000
secret = "s3cret"
"#,
    );
    let cfg = BotConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.weather.api_key, "k");
    assert_eq!(cfg.weather.city, "Moscow,ru");
    assert_eq!(cfg.weather.city_label, "Барнауле");
    assert_eq!(cfg.webhook.port, 9000);
    assert_eq!(cfg.webhook.secret.as_deref(), Some("s3cret"));
    assert_eq!(cfg.store_config().max_connections, 3);
  }

  #[test]
  fn missing_token_is_an_error() {
    let path = write_config("broken", "admin_id = 1\n");
    let result = BotConfig::load(&path);
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
  }
}
