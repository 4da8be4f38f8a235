//! Routes one inbound event to its handler and produces at most one reply.
//!
//! The dispatcher never fails: storage errors are traced, journalled and
//! turned into a fixed polite text, so a bad row or a locked database cannot
//! take down the update loop.

use serde_json::json;
use snt_core::{
  event::{ChatKind, ChatMessage, InboundEvent, MembershipChange},
  journal::{Journal, LogLevel},
  reply::{Keyboard, Reply},
  store::{Backend, ContactManager, PaymentDetailManager, PersonManager},
};

use crate::{
  format::{render_contacts, render_payment_details},
  texts::{self, MenuItem},
  weather::WeatherSource,
};

pub struct Dispatcher<B, W> {
  backend:      B,
  weather:      W,
  admin_id:     i64,
  bot_username: Option<String>,
}

impl<B: Backend, W: WeatherSource> Dispatcher<B, W> {
  pub fn new(backend: B, weather: W, admin_id: i64) -> Self {
    Self { backend, weather, admin_id, bot_username: None }
  }

  /// The bot's own username, mentioned in "write me privately" texts.
  pub fn with_bot_username(mut self, bot_username: Option<String>) -> Self {
    self.bot_username = bot_username;
    self
  }

  pub fn backend(&self) -> &B { &self.backend }

  /// Handle one event. `None` means nothing is sent.
  pub async fn handle(&self, event: InboundEvent) -> Option<Reply> {
    match event {
      InboundEvent::SelfMembership(change) => self.on_self_membership(&change),
      InboundEvent::MemberChange(change) => self.on_member_change(&change),
      InboundEvent::Message(msg) => match msg.chat_kind {
        ChatKind::Private => self.on_private_message(&msg).await,
        ChatKind::Group | ChatKind::Supergroup => self.on_group_message(&msg),
        ChatKind::Channel => None,
      },
    }
  }

  fn username(&self) -> Option<&str> { self.bot_username.as_deref() }

  // ─── Membership ────────────────────────────────────────────────────────────

  fn on_self_membership(&self, change: &MembershipChange) -> Option<Reply> {
    if !change.is_join() {
      return None;
    }
    tracing::info!(chat_id = change.chat_id, "bot added to chat");
    Some(
      Reply::new(change.chat_id, texts::bot_joined(self.username()))
        .with_keyboard(Keyboard::Remove),
    )
  }

  fn on_member_change(&self, change: &MembershipChange) -> Option<Reply> {
    if !change.is_join() {
      return None;
    }
    tracing::info!(
      chat_id = change.chat_id,
      user_id = change.member.user_id,
      "member joined chat"
    );
    let text = texts::member_joined(&change.member.first_name, self.username());
    Some(Reply::new(change.chat_id, text).with_keyboard(Keyboard::Remove))
  }

  // ─── Messages ──────────────────────────────────────────────────────────────

  /// Groups only get pointed at the private chat.
  fn on_group_message(&self, msg: &ChatMessage) -> Option<Reply> {
    if msg.command.as_deref() != Some("start") {
      return None;
    }
    Some(
      Reply::new(msg.chat_id, texts::group_redirect(self.username()))
        .with_keyboard(Keyboard::Remove),
    )
  }

  async fn on_private_message(&self, msg: &ChatMessage) -> Option<Reply> {
    let Some(command) = msg.command.as_deref() else {
      return self.on_menu_text(msg).await;
    };

    match command {
      "start" => Some(self.register(msg).await),
      "show" => {
        Some(Reply::new(msg.chat_id, texts::MENU_OPENED).with_keyboard(Keyboard::MainMenu))
      }
      "admin" => self.admin(msg),
      other => {
        tracing::debug!(chat_id = msg.chat_id, command = other, "unknown command");
        Some(Reply::new(msg.chat_id, texts::UNKNOWN_COMMAND).with_keyboard(Keyboard::Remove))
      }
    }
  }

  async fn register(&self, msg: &ChatMessage) -> Reply {
    let detail = json!({ "user_id": msg.sender_id, "user_name": msg.sender_handle });

    match self.backend.people().upsert(msg.sender_id, msg.sender_handle.clone()).await {
      Ok(()) => {
        tracing::info!(user_id = msg.sender_id, handle = %msg.sender_handle, "user registered");
        self
          .backend
          .journal()
          .record_log(LogLevel::Info, "user registered".to_string(), Some(detail))
          .await;
        Reply::new(msg.chat_id, texts::WELCOME).with_keyboard(Keyboard::MainMenu)
      }
      Err(e) => {
        tracing::error!(user_id = msg.sender_id, error = %e, "failed to register user");
        self
          .backend
          .journal()
          .record_log(LogLevel::Error, "failed to register user".to_string(), Some(detail))
          .await;
        Reply::new(msg.chat_id, texts::REGISTRATION_FAILED).with_keyboard(Keyboard::Remove)
      }
    }
  }

  /// Silent for anyone but the configured administrator. Nothing is stored.
  fn admin(&self, msg: &ChatMessage) -> Option<Reply> {
    if msg.sender_id != self.admin_id {
      tracing::info!(user_id = msg.sender_id, "ignored /admin from non-admin");
      return None;
    }
    Some(Reply::new(msg.chat_id, texts::ADMIN_GREETING).with_keyboard(Keyboard::Remove))
  }

  async fn on_menu_text(&self, msg: &ChatMessage) -> Option<Reply> {
    let item = MenuItem::from_label(&msg.text)?;

    let body = match item {
      MenuItem::Weather => self.weather.current().await,
      MenuItem::Timetable => texts::TIMETABLE_UNAVAILABLE.to_string(),
      MenuItem::Contacts => match self.backend.contacts().list_all_by_priority().await {
        Ok(contacts) => render_contacts(&contacts),
        Err(e) => self.lookup_failed("list contacts", msg.chat_id, &e).await,
      },
      MenuItem::PaymentDetails => match self.backend.payment_details().list_all().await {
        Ok(details) => render_payment_details(&details),
        Err(e) => self.lookup_failed("list payment details", msg.chat_id, &e).await,
      },
      MenuItem::Quote => texts::QUOTE.to_string(),
      MenuItem::Anecdote => texts::ANECDOTE.to_string(),
      MenuItem::Bash => texts::BASH_QUOTE.to_string(),
    };

    Some(Reply::new(msg.chat_id, body).with_keyboard(Keyboard::Remove))
  }

  /// Trace and journal a failed read; the user only sees a fixed text.
  async fn lookup_failed(
    &self,
    operation: &'static str,
    chat_id: i64,
    error: &(dyn std::error::Error + Send + Sync),
  ) -> String {
    tracing::error!(operation, chat_id, error = %error, "lookup failed");
    self
      .backend
      .journal()
      .record_log(
        LogLevel::Error,
        format!("{operation} failed"),
        Some(json!({ "chat_id": chat_id, "error": error.to_string() })),
      )
      .await;
    texts::LOOKUP_FAILED.to_string()
  }
}
