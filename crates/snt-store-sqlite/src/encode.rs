//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, whether written by the store
//! (`chrono`) or by a column default (`strftime`). Journal details are stored
//! as compact JSON.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use snt_core::{
  journal::{LogEntry, LogLevel},
  person::Person,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Parameters ──────────────────────────────────────────────────────────────

pub fn text(s: impl Into<String>) -> Value { Value::Text(s.into()) }

pub fn opt_text(s: Option<String>) -> Value { s.map_or(Value::Null, Value::Text) }

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `snt_users` row as read, before timestamp parsing.
pub struct RawPerson {
  pub user_id:   i64,
  pub handle:    String,
  pub full_name: Option<String>,
  pub phone:     Option<String>,
  pub note:      Option<String>,
  pub created:   String,
  pub modified:  String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:   row.get(0)?,
      handle:    row.get(1)?,
      full_name: row.get(2)?,
      phone:     row.get(3)?,
      note:      row.get(4)?,
      created:   row.get(5)?,
      modified:  row.get(6)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      user_id:   self.user_id,
      handle:    self.handle,
      full_name: self.full_name,
      phone:     self.phone,
      note:      self.note,
      created:   decode_dt(&self.created)?,
      modified:  decode_dt(&self.modified)?,
    })
  }
}

/// A `snt_logs` row as read.
pub struct RawLogEntry {
  pub id:      i64,
  pub level:   String,
  pub message: String,
  pub details: Option<String>,
  pub created: String,
}

impl RawLogEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:      row.get(0)?,
      level:   row.get(1)?,
      message: row.get(2)?,
      details: row.get(3)?,
      created: row.get(4)?,
    })
  }

  pub fn into_entry(self) -> Result<LogEntry> {
    Ok(LogEntry {
      id:      self.id,
      level:   self.level.parse::<LogLevel>()?,
      message: self.message,
      detail:  self
        .details
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?,
      created: decode_dt(&self.created)?,
    })
  }
}
