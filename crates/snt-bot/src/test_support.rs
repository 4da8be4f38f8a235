//! Fakes shared by the unit tests of the runners and the dispatcher.

use std::{collections::VecDeque, sync::Mutex};

use serde_json::{Value, json};
use snt_core::reply::Reply;
use snt_store_sqlite::{SqliteBackend, SqliteStore};
use tokio::sync::Notify;

use crate::{
  Error, Result,
  dispatch::Dispatcher,
  telegram::{BotApi, Update},
  weather::WeatherSource,
};

pub const ADMIN: i64 = 466588600;

pub struct StubWeather;

impl WeatherSource for StubWeather {
  async fn current(&self) -> String { "Погода в Барнауле: 1.0°C, снег".to_string() }
}

pub type TestDispatcher = Dispatcher<SqliteBackend, StubWeather>;

/// A dispatcher over a fresh in-memory store.
pub async fn dispatcher() -> TestDispatcher {
  let store = SqliteStore::open_in_memory().await.unwrap();
  Dispatcher::new(SqliteBackend::new(store), StubWeather, ADMIN)
    .with_bot_username(Some("snt_bot".to_string()))
}

/// Raw JSON of a private-chat message update from user 7. Text starting with
/// `/` is marked as a command.
pub fn text_update_json(update_id: i64, text: &str) -> Value {
  let entities = if text.starts_with('/') {
    json!([{ "type": "bot_command", "offset": 0, "length": text.encode_utf16().count() }])
  } else {
    json!([])
  };
  json!({
    "update_id": update_id,
    "message": {
      "message_id": update_id,
      "date": 0,
      "chat": { "id": 42, "type": "private" },
      "from": { "id": 7, "is_bot": false, "first_name": "Иван", "username": "ivan" },
      "text": text,
      "entities": entities,
    }
  })
}

pub fn text_update(update_id: i64, text: &str) -> Update {
  serde_json::from_value(text_update_json(update_id, text)).unwrap()
}

/// Serves queued `getUpdates` batches, then signals `drained` and hangs.
#[derive(Default)]
pub struct FakeApi {
  batches:     Mutex<VecDeque<Result<Vec<Update>>>>,
  offsets:     Mutex<Vec<i64>>,
  sent:        Mutex<Vec<Reply>>,
  fail_sends:  bool,
  pub drained: Notify,
}

impl FakeApi {
  pub fn with_batches(batches: Vec<Result<Vec<Update>>>) -> Self {
    Self { batches: Mutex::new(batches.into()), ..Self::default() }
  }

  pub fn failing_sends(mut self) -> Self {
    self.fail_sends = true;
    self
  }

  pub fn offsets(&self) -> Vec<i64> { self.offsets.lock().unwrap().clone() }

  pub fn sent(&self) -> Vec<Reply> { self.sent.lock().unwrap().clone() }
}

impl BotApi for FakeApi {
  async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
    self.offsets.lock().unwrap().push(offset);
    let next = self.batches.lock().unwrap().pop_front();
    match next {
      Some(batch) => batch,
      None => {
        self.drained.notify_one();
        std::future::pending().await
      }
    }
  }

  async fn send_message(&self, reply: Reply) -> Result<()> {
    if self.fail_sends {
      return Err(Error::Api("Forbidden: bot was blocked by the user".to_string()));
    }
    self.sent.lock().unwrap().push(reply);
    Ok(())
  }
}
