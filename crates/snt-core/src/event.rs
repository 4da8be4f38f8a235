//! Normalised inbound events.
//!
//! Transports translate their own update payloads into [`InboundEvent`]
//! before handing them to the dispatcher.

use serde::{Deserialize, Serialize};

/// The kind of chat an event originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
  Private,
  Group,
  Supergroup,
  Channel,
}

impl ChatKind {
  /// Group and supergroup chats, where the bot stays quiet.
  pub fn is_group(self) -> bool { matches!(self, Self::Group | Self::Supergroup) }
}

/// A chat member's status as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
  Creator,
  Administrator,
  Member,
  Restricted,
  Left,
  Kicked,
}

/// The member whose status changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
  pub user_id:    i64,
  pub first_name: String,
}

/// A status transition for one member of one chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipChange {
  pub chat_id: i64,
  pub old:     MemberStatus,
  pub new:     MemberStatus,
  pub member:  Member,
}

impl MembershipChange {
  /// True only for `left` → `member`, the transition that means "joined".
  pub fn is_join(&self) -> bool {
    self.old == MemberStatus::Left && self.new == MemberStatus::Member
  }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub chat_id:       i64,
  pub chat_kind:     ChatKind,
  pub sender_id:     i64,
  pub sender_handle: String,
  /// Command name without the leading `/` or `@bot` suffix.
  pub command:       Option<String>,
  pub text:          String,
}

/// Everything the dispatcher can be asked to handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
  /// The bot's own membership in a chat changed.
  SelfMembership(MembershipChange),
  /// Another user's membership in a chat changed.
  MemberChange(MembershipChange),
  Message(ChatMessage),
}
