//! A chat user who has registered with the bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered chat user, keyed by the platform's numeric user id.
///
/// Rows are created by the first `start` command and never deleted. Both
/// timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub user_id:   i64,
  /// The platform display handle, refreshed on every `start`.
  pub handle:    String,
  pub full_name: Option<String>,
  pub phone:     Option<String>,
  pub note:      Option<String>,
  pub created:   DateTime<Utc>,
  pub modified:  DateTime<Utc>,
}
