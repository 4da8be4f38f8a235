//! Error type for the bot's transport and service layer.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// Telegram answered `ok: false`.
  #[error("telegram api error: {0}")]
  Api(String),

  #[error("configuration error: {0}")]
  Config(#[from] ::config::ConfigError),

  /// Webhook call without the expected secret token.
  #[error("unauthorized")]
  Unauthorized,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
      other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response(),
    }
  }
}
