//! Error type for `snt-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] snt_core::Error),

  /// The pool could not be built or the liveness probe failed. Fatal at
  /// startup.
  #[error("database unreachable: {0}")]
  Connectivity(String),

  /// A schema statement failed. Reported, never fatal.
  #[error("schema statement {statement} failed: {source}")]
  Schema {
    statement: &'static str,
    #[source]
    source:    rusqlite::Error,
  },

  #[error("{operation} failed: {source}")]
  Query {
    operation: &'static str,
    #[source]
    source:    rusqlite::Error,
  },

  #[error("{entity} not found: {key}")]
  NotFound { entity: &'static str, key: String },

  #[error("connection pool error: {0}")]
  Pool(#[from] r2d2::Error),

  #[error("database worker failed: {0}")]
  Worker(#[from] tokio::task::JoinError),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
