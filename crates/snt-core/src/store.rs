//! Data-access traits, one per entity, plus the [`Backend`] bundle.
//!
//! Storage backends (e.g. `snt-store-sqlite`) implement these. The dispatcher
//! in `snt-bot` depends on the abstraction, never on a concrete backend.
//!
//! Each operation is a single request/response round trip. Nothing here
//! retries; a failure comes back as the implementation's error value.

use std::future::Future;

use crate::{
  journal::Journal,
  person::Person,
  reference::{ContactEntry, PaymentDetail},
};

// ─── Per-entity managers ─────────────────────────────────────────────────────

/// Registered users.
pub trait PersonManager: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert the user, or refresh the handle of an existing row, in one
  /// statement.
  fn upsert(
    &self,
    user_id: i64,
    handle: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set the full name of an existing user.
  fn set_full_name(
    &self,
    user_id: i64,
    full_name: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set the phone number of an existing user.
  fn set_phone(
    &self,
    user_id: i64,
    phone: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch one user. `None` means no such row.
  fn get(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;
}

/// Bank details, read-only.
pub trait PaymentDetailManager: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All rows ordered by code.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<PaymentDetail>, Self::Error>> + Send + '_;
}

/// The contact list, read-only.
pub trait ContactManager: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All rows ordered by ascending priority.
  fn list_all_by_priority(
    &self,
  ) -> impl Future<Output = Result<Vec<ContactEntry>, Self::Error>> + Send + '_;
}

// ─── Bundle ──────────────────────────────────────────────────────────────────

/// Everything the dispatcher needs from storage, handed over as one value.
pub trait Backend: Send + Sync {
  type People: PersonManager;
  type PaymentDetails: PaymentDetailManager;
  type Contacts: ContactManager;
  type Journal: Journal;

  fn people(&self) -> &Self::People;
  fn payment_details(&self) -> &Self::PaymentDetails;
  fn contacts(&self) -> &Self::Contacts;
  fn journal(&self) -> &Self::Journal;
}
