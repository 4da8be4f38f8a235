//! Outbound replies produced by the dispatcher.

use serde::{Deserialize, Serialize};

/// What to do with the user's reply keyboard alongside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyboard {
  /// Show the seven-button main menu.
  MainMenu,
  /// Hide any custom keyboard.
  Remove,
}

/// A single message to send. Text is HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
  pub chat_id:  i64,
  pub text:     String,
  pub keyboard: Option<Keyboard>,
}

impl Reply {
  pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
    Self { chat_id, text: text.into(), keyboard: None }
  }

  pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
    self.keyboard = Some(keyboard);
    self
  }
}
