//! Error types for `snt-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown log level: {0:?}")]
  UnknownLogLevel(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
