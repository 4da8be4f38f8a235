//! Webhook mode: Telegram POSTs each update to `/telegram`.
//!
//! Requests may arrive concurrently, but dispatch is serialised behind a
//! mutex so events are still handled one at a time.

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::State,
  http::{HeaderMap, StatusCode},
  routing::post,
};
use snt_core::store::Backend;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::{
  Error, Result,
  dispatch::Dispatcher,
  poll::process,
  telegram::{BotApi, Update},
  weather::WeatherSource,
};

/// Header Telegram echoes the `secret_token` from `setWebhook` in.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through the webhook handler.
pub struct WebhookState<B, W, A> {
  pub dispatcher: Arc<Dispatcher<B, W>>,
  pub api:        Arc<A>,
  pub secret:     Option<Arc<str>>,
  gate:           Arc<Mutex<()>>,
}

impl<B, W, A> WebhookState<B, W, A> {
  pub fn new(dispatcher: Arc<Dispatcher<B, W>>, api: Arc<A>, secret: Option<String>) -> Self {
    Self {
      dispatcher,
      api,
      secret: secret.map(Arc::from),
      gate: Arc::new(Mutex::new(())),
    }
  }
}

impl<B, W, A> Clone for WebhookState<B, W, A> {
  fn clone(&self) -> Self {
    Self {
      dispatcher: Arc::clone(&self.dispatcher),
      api:        Arc::clone(&self.api),
      secret:     self.secret.clone(),
      gate:       Arc::clone(&self.gate),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn router<B, W, A>(state: WebhookState<B, W, A>) -> Router
where
  B: Backend + 'static,
  W: WeatherSource + 'static,
  A: BotApi + 'static,
{
  Router::new()
    .route("/telegram", post(receive::<B, W, A>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Reject the call unless it carries the configured secret. No secret
/// configured means every call is accepted.
fn verify_secret(headers: &HeaderMap, expected: Option<&str>) -> Result<()> {
  let Some(expected) = expected else {
    return Ok(());
  };
  let given = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
  if given != Some(expected) {
    return Err(Error::Unauthorized);
  }
  Ok(())
}

async fn receive<B, W, A>(
  State(state): State<WebhookState<B, W, A>>,
  headers: HeaderMap,
  Json(update): Json<Update>,
) -> Result<StatusCode>
where
  B: Backend + 'static,
  W: WeatherSource + 'static,
  A: BotApi + 'static,
{
  if let Err(e) = verify_secret(&headers, state.secret.as_deref()) {
    tracing::warn!(update_id = update.update_id, "webhook call without a valid secret");
    return Err(e);
  }

  let _turn = state.gate.lock().await;
  process(state.dispatcher.as_ref(), state.api.as_ref(), update).await;
  Ok(StatusCode::OK)
}
