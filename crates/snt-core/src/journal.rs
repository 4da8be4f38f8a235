//! The bot's persisted audit log.
//!
//! Journal entries are append-only and written fire-and-forget: a failed write
//! is reported through `tracing` and otherwise swallowed, so recording an
//! entry can never fail a handler.

use std::{fmt, future::Future, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Severity of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  Debug,
  Info,
  Warn,
  Error,
}

impl LogLevel {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Debug => "debug",
      Self::Info => "info",
      Self::Warn => "warn",
      Self::Error => "error",
    }
  }
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for LogLevel {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "debug" => Ok(Self::Debug),
      "info" => Ok(Self::Info),
      "warn" => Ok(Self::Warn),
      "error" => Ok(Self::Error),
      other => Err(Error::UnknownLogLevel(other.to_string())),
    }
  }
}

/// A persisted journal row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
  pub id:      i64,
  pub level:   LogLevel,
  pub message: String,
  pub detail:  Option<serde_json::Value>,
  pub created: DateTime<Utc>,
}

/// Sink for journal entries.
pub trait Journal: Send + Sync {
  /// Append an entry. Never fails from the caller's point of view.
  fn record_log(
    &self,
    level: LogLevel,
    message: String,
    detail: Option<serde_json::Value>,
  ) -> impl Future<Output = ()> + Send + '_;
}

/// An absent journal (store not initialised) drops entries after tracing them.
impl<J: Journal> Journal for Option<J> {
  async fn record_log(
    &self,
    level: LogLevel,
    message: String,
    detail: Option<serde_json::Value>,
  ) {
    match self {
      Some(journal) => journal.record_log(level, message, detail).await,
      None => {
        tracing::debug!(%level, %message, "journal unavailable, entry skipped");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn level_parses_its_own_name() {
    for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
      assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
    }
  }

  #[test]
  fn unknown_level_is_rejected() {
    assert!(matches!(
      "fatal".parse::<LogLevel>(),
      Err(Error::UnknownLogLevel(s)) if s == "fatal"
    ));
  }

  #[tokio::test]
  async fn absent_journal_is_a_silent_noop() {
    let journal: Option<Never> = None;
    journal
      .record_log(LogLevel::Error, "lost".to_string(), None)
      .await;
  }

  struct Never;

  impl Journal for Never {
    async fn record_log(&self, _: LogLevel, _: String, _: Option<serde_json::Value>) {
      unreachable!("an absent journal must not be called")
    }
  }
}
