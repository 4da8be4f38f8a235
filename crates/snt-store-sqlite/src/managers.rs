//! Per-entity managers over [`SqliteStore`].

use chrono::Utc;
use rusqlite::types::Value;
use snt_core::{
  person::Person,
  reference::{ContactEntry, PaymentDetail},
  store::{Backend, ContactManager, PaymentDetailManager, PersonManager},
};

use crate::{
  Error, Result, SqliteStore,
  encode::{RawPerson, encode_dt, text},
};

// ─── People ──────────────────────────────────────────────────────────────────

/// `snt_users`.
#[derive(Clone)]
pub struct People {
  store: SqliteStore,
}

impl People {
  pub fn new(store: SqliteStore) -> Self { Self { store } }

  /// Run a single-column update and turn "no row" into [`Error::NotFound`].
  async fn update_one(
    &self,
    operation: &'static str,
    sql:       &'static str,
    user_id:   i64,
    value:     String,
  ) -> Result<()> {
    let changed = self
      .store
      .execute(
        operation,
        sql,
        vec![text(value), text(encode_dt(Utc::now())), Value::Integer(user_id)],
      )
      .await?;

    if changed == 0 {
      return Err(Error::NotFound { entity: "person", key: user_id.to_string() });
    }
    Ok(())
  }
}

impl PersonManager for People {
  type Error = Error;

  async fn upsert(&self, user_id: i64, handle: String) -> Result<()> {
    let now = encode_dt(Utc::now());
    self
      .store
      .execute(
        "upsert person",
        "INSERT INTO snt_users (user_id, user_name, created, modified)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT (user_id) DO UPDATE
         SET user_name = excluded.user_name,
             modified  = excluded.modified",
        vec![Value::Integer(user_id), text(handle), text(now)],
      )
      .await?;
    Ok(())
  }

  async fn set_full_name(&self, user_id: i64, full_name: String) -> Result<()> {
    self
      .update_one(
        "update person full name",
        "UPDATE snt_users SET user_fio = ?1, modified = ?2 WHERE user_id = ?3",
        user_id,
        full_name,
      )
      .await
  }

  async fn set_phone(&self, user_id: i64, phone: String) -> Result<()> {
    self
      .update_one(
        "update person phone",
        "UPDATE snt_users SET user_phone = ?1, modified = ?2 WHERE user_id = ?3",
        user_id,
        phone,
      )
      .await
  }

  async fn get(&self, user_id: i64) -> Result<Option<Person>> {
    let raws = self
      .store
      .query(
        "get person",
        "SELECT user_id, user_name, user_fio, user_phone, comment, created, modified
         FROM snt_users WHERE user_id = ?1",
        vec![Value::Integer(user_id)],
        RawPerson::from_row,
      )
      .await?;

    raws.into_iter().next().map(RawPerson::into_person).transpose()
  }
}

// ─── Payment details ─────────────────────────────────────────────────────────

/// `snt_details`. Read-only.
#[derive(Clone)]
pub struct PaymentDetails {
  store: SqliteStore,
}

impl PaymentDetails {
  pub fn new(store: SqliteStore) -> Self { Self { store } }
}

impl PaymentDetailManager for PaymentDetails {
  type Error = Error;

  async fn list_all(&self) -> Result<Vec<PaymentDetail>> {
    self
      .store
      .query(
        "list payment details",
        "SELECT id, name, inn, kpp, personal_acc, bank_name, bik, corresp_acc, comment
         FROM snt_details ORDER BY id",
        vec![],
        |row| {
          Ok(PaymentDetail {
            code:                  row.get(0)?,
            organization:          row.get(1)?,
            inn:                   row.get(2)?,
            kpp:                   row.get(3)?,
            account:               row.get(4)?,
            bank_name:             row.get(5)?,
            bik:                   row.get(6)?,
            correspondent_account: row.get(7)?,
            note:                  row.get(8)?,
          })
        },
      )
      .await
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// `snt_contacts`. Read-only.
#[derive(Clone)]
pub struct Contacts {
  store: SqliteStore,
}

impl Contacts {
  pub fn new(store: SqliteStore) -> Self { Self { store } }
}

impl ContactManager for Contacts {
  type Error = Error;

  async fn list_all_by_priority(&self) -> Result<Vec<ContactEntry>> {
    // `type` is unique, which makes ties in `prior` come back in a stable
    // order.
    self
      .store
      .query(
        "list contacts",
        "SELECT prior, type, value, adds, comment
         FROM snt_contacts ORDER BY prior ASC, type ASC",
        vec![],
        |row| {
          Ok(ContactEntry {
            priority: row.get(0)?,
            kind:     row.get(1)?,
            value:    row.get(2)?,
            extra:    row.get(3)?,
            note:     row.get(4)?,
          })
        },
      )
      .await
  }
}

// ─── Backend bundle ──────────────────────────────────────────────────────────

/// All managers over one shared store.
#[derive(Clone)]
pub struct SqliteBackend {
  store:           SqliteStore,
  people:          People,
  payment_details: PaymentDetails,
  contacts:        Contacts,
}

impl SqliteBackend {
  pub fn new(store: SqliteStore) -> Self {
    Self {
      people:          People::new(store.clone()),
      payment_details: PaymentDetails::new(store.clone()),
      contacts:        Contacts::new(store.clone()),
      store,
    }
  }

  pub fn store(&self) -> &SqliteStore { &self.store }
}

impl Backend for SqliteBackend {
  type People = People;
  type PaymentDetails = PaymentDetails;
  type Contacts = Contacts;
  type Journal = SqliteStore;

  fn people(&self) -> &People { &self.people }

  fn payment_details(&self) -> &PaymentDetails { &self.payment_details }

  fn contacts(&self) -> &Contacts { &self.contacts }

  fn journal(&self) -> &SqliteStore { &self.store }
}
