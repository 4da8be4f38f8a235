//! Long-polling update loop.
//!
//! Updates are handled strictly one after another in `update_id` order. An
//! update is acknowledged by asking for the next offset, so a batch is only
//! confirmed once every update in it has been dispatched.

use std::{future::Future, time::Duration};

use snt_core::store::Backend;

use crate::{
  dispatch::Dispatcher,
  telegram::{BotApi, Update},
  weather::WeatherSource,
};

/// Pause after a failed `getUpdates` before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Poll until `shutdown` resolves. Transport failures are logged and retried;
/// they never end the loop.
pub async fn run<B, W, A>(
  dispatcher: &Dispatcher<B, W>,
  api: &A,
  shutdown: impl Future<Output = ()>,
) where
  B: Backend,
  W: WeatherSource,
  A: BotApi,
{
  tokio::pin!(shutdown);
  let mut offset = 0;
  tracing::info!("polling for updates");

  loop {
    let polled = tokio::select! {
      _ = &mut shutdown => break,
      polled = api.get_updates(offset) => polled,
    };

    match polled {
      Ok(updates) => {
        for update in updates {
          offset = offset.max(update.update_id + 1);
          process(dispatcher, api, update).await;
        }
      }
      Err(e) => {
        tracing::warn!(error = %e, retry_in = ?RETRY_DELAY, "failed to fetch updates");
        tokio::select! {
          _ = &mut shutdown => break,
          _ = tokio::time::sleep(RETRY_DELAY) => {}
        }
      }
    }
  }

  tracing::info!("polling stopped");
}

/// Dispatch one update and send the reply, if any. A failed send is logged
/// and dropped.
pub async fn process<B, W, A>(dispatcher: &Dispatcher<B, W>, api: &A, update: Update)
where
  B: Backend,
  W: WeatherSource,
  A: BotApi,
{
  let update_id = update.update_id;
  let Some(event) = update.into_event() else {
    tracing::debug!(update_id, "ignoring update");
    return;
  };
  let Some(reply) = dispatcher.handle(event).await else {
    return;
  };

  let chat_id = reply.chat_id;
  if let Err(e) = api.send_message(reply).await {
    tracing::warn!(update_id, chat_id, error = %e, "failed to send reply");
  }
}
