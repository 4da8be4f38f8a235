//! Telegram Bot API transport.
//!
//! Only the handful of methods and update fields the bot uses are modelled.
//! [`Update::into_event`] turns a raw update into the transport-neutral
//! [`InboundEvent`] the dispatcher works with.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use snt_core::{
  event::{ChatKind, ChatMessage, InboundEvent, Member, MemberStatus, MembershipChange},
  reply::{Keyboard, Reply},
};

use crate::{Error, Result, texts::MenuItem};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Update kinds requested from `getUpdates`. `chat_member` is only delivered
/// when asked for explicitly.
const ALLOWED_UPDATES: [&str; 3] = ["message", "my_chat_member", "chat_member"];

// ─── Update payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id:      i64,
  pub message:        Option<Message>,
  pub my_chat_member: Option<ChatMemberUpdated>,
  pub chat_member:    Option<ChatMemberUpdated>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub chat:     Chat,
  pub from:     Option<User>,
  pub text:     Option<String>,
  #[serde(default)]
  pub entities: Vec<MessageEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
  pub id:   i64,
  #[serde(rename = "type")]
  pub kind: ChatKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
  pub id:         i64,
  pub first_name: String,
  pub username:   Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
  #[serde(rename = "type")]
  pub kind:   String,
  /// UTF-16 code units.
  pub offset: usize,
  /// UTF-16 code units.
  pub length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMemberUpdated {
  pub chat:            Chat,
  pub old_chat_member: ChatMember,
  pub new_chat_member: ChatMember,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMember {
  pub status: MemberStatus,
  pub user:   User,
}

impl Update {
  /// `None` for update kinds the bot does not react to, and for messages
  /// without a sender (channel posts).
  pub fn into_event(self) -> Option<InboundEvent> {
    if let Some(message) = self.message {
      return message.into_event();
    }
    if let Some(change) = self.my_chat_member {
      return Some(InboundEvent::SelfMembership(change.into_change()));
    }
    self
      .chat_member
      .map(|change| InboundEvent::MemberChange(change.into_change()))
  }
}

impl Message {
  fn into_event(self) -> Option<InboundEvent> {
    let from = self.from?;
    let text = self.text.unwrap_or_default();
    let command = command_name(&text, &self.entities);

    Some(InboundEvent::Message(ChatMessage {
      chat_id: self.chat.id,
      chat_kind: self.chat.kind,
      sender_id: from.id,
      sender_handle: from.username.unwrap_or(from.first_name),
      command,
      text,
    }))
  }
}

impl ChatMemberUpdated {
  fn into_change(self) -> MembershipChange {
    let user = self.new_chat_member.user;
    MembershipChange {
      chat_id: self.chat.id,
      old:     self.old_chat_member.status,
      new:     self.new_chat_member.status,
      member:  Member { user_id: user.id, first_name: user.first_name },
    }
  }
}

/// The command a message starts with, without the `/` and `@bot` suffix.
///
/// A message is a command only when its first entity is a `bot_command` at
/// offset zero.
fn command_name(text: &str, entities: &[MessageEntity]) -> Option<String> {
  let first = entities.first()?;
  if first.kind != "bot_command" || first.offset != 0 {
    return None;
  }

  let mut units = 0;
  let end = text
    .char_indices()
    .find(|(_, c)| {
      let past = units >= first.length;
      units += c.len_utf16();
      past
    })
    .map_or(text.len(), |(i, _)| i);

  let name = text[..end].strip_prefix('/')?;
  let name = name.split('@').next().unwrap_or_default();
  (!name.is_empty()).then(|| name.to_string())
}

// ─── Outbound ────────────────────────────────────────────────────────────────

/// The `reply_markup` object for a keyboard directive.
pub fn reply_markup(keyboard: Keyboard) -> Value {
  match keyboard {
    Keyboard::MainMenu => {
      let rows: Vec<Value> = MenuItem::ALL
        .into_iter()
        .map(|item| json!([{ "text": item.label() }]))
        .collect();
      json!({ "keyboard": rows })
    }
    Keyboard::Remove => json!({ "remove_keyboard": true }),
  }
}

#[derive(Serialize)]
struct SendMessage<'a> {
  chat_id:      i64,
  text:         &'a str,
  parse_mode:   &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  reply_markup: Option<Value>,
}

#[derive(Serialize)]
struct GetUpdates {
  offset:          i64,
  timeout:         u64,
  allowed_updates: [&'static str; 3],
}

/// Every Bot API response is wrapped in this.
#[derive(Deserialize)]
struct Envelope<T> {
  ok:          bool,
  result:      Option<T>,
  description: Option<String>,
}

impl<T> Envelope<T> {
  fn into_result(self) -> Result<T> {
    match (self.ok, self.result) {
      (true, Some(result)) => Ok(result),
      _ => Err(Error::Api(self.description.unwrap_or_else(|| "no result".to_string()))),
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// What the runners need from the messaging platform.
pub trait BotApi: Send + Sync {
  /// Long-poll for updates with `update_id >= offset`.
  fn get_updates(&self, offset: i64) -> impl Future<Output = Result<Vec<Update>>> + Send + '_;

  fn send_message(&self, reply: Reply) -> impl Future<Output = Result<()>> + Send + '_;
}

/// HTTP client for the Bot API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TelegramClient {
  client:       Client,
  /// `{api_url}/bot{token}`. Never logged.
  base_url:     String,
  poll_timeout: u64,
}

impl TelegramClient {
  pub fn new(api_url: &str, token: &str, poll_timeout_secs: u64) -> Result<Self> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(Self {
      client,
      base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
      poll_timeout: poll_timeout_secs,
    })
  }

  /// POST one method call. URLs are stripped from transport errors since
  /// they carry the token.
  async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T>
  where
    B: Serialize + Sync + ?Sized,
    T: DeserializeOwned,
  {
    let envelope: Envelope<T> = self
      .client
      .post(format!("{}/{method}", self.base_url))
      .timeout(timeout)
      .json(body)
      .send()
      .await
      .map_err(reqwest::Error::without_url)?
      .json()
      .await
      .map_err(reqwest::Error::without_url)?;
    envelope.into_result()
  }

  /// `getMe`: the bot's own account.
  pub async fn get_me(&self) -> Result<User> {
    self.call("getMe", &json!({}), REQUEST_TIMEOUT).await
  }
}

impl BotApi for TelegramClient {
  async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
    let body = GetUpdates {
      offset,
      timeout: self.poll_timeout,
      allowed_updates: ALLOWED_UPDATES,
    };
    // The server holds the request for up to `timeout` seconds.
    let timeout = Duration::from_secs(self.poll_timeout + 10);
    self.call("getUpdates", &body, timeout).await
  }

  async fn send_message(&self, reply: Reply) -> Result<()> {
    let body = SendMessage {
      chat_id:      reply.chat_id,
      text:         &reply.text,
      parse_mode:   "HTML",
      reply_markup: reply.keyboard.map(reply_markup),
    };
    let _: Value = self.call("sendMessage", &body, REQUEST_TIMEOUT).await?;
    Ok(())
  }
}
