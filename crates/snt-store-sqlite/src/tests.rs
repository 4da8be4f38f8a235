//! Integration tests for `SqliteStore` and its managers against an in-memory
//! database.

use std::time::Duration;

use rusqlite::types::Value;
use snt_core::{
  journal::{Journal, LogLevel},
  reference::PaymentDetail,
  store::{ContactManager, PaymentDetailManager, PersonManager},
};

use crate::{Contacts, Error, PaymentDetails, People, SqliteStore, StoreConfig};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn count(s: &SqliteStore, sql: &'static str) -> i64 {
  s.query("count", sql, vec![], |row| row.get::<_, i64>(0))
    .await
    .unwrap()[0]
}

async fn add_contact(s: &SqliteStore, prior: i64, kind: &str, value: &str, adds: Option<&str>) {
  s.execute(
    "add contact",
    "INSERT INTO snt_contacts (prior, type, value, adds) VALUES (?1, ?2, ?3, ?4)",
    vec![
      Value::Integer(prior),
      Value::Text(kind.into()),
      Value::Text(value.into()),
      adds.map_or(Value::Null, |a| Value::Text(a.into())),
    ],
  )
  .await
  .unwrap();
}

// ─── Connection ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn unreachable_database_is_a_connectivity_error() {
  let mut config = StoreConfig::new("/nonexistent/snt/bot.db", 2);
  config.connect_timeout = Duration::from_millis(200);

  let result = SqliteStore::connect(&config).await;
  assert!(matches!(result, Err(Error::Connectivity(_))));
}

#[tokio::test]
async fn file_store_with_pool_opens() {
  let path = std::env::temp_dir().join(format!("snt-store-{}.db", std::process::id()));
  let _ = std::fs::remove_file(&path);

  let s = SqliteStore::open(&StoreConfig::new(&path, 4)).await.unwrap();
  let people = People::new(s.clone());
  people.upsert(7, "neighbour".into()).await.unwrap();
  assert_eq!(count(&s, "SELECT COUNT(*) FROM snt_users").await, 1);

  drop(people);
  drop(s);
  let _ = std::fs::remove_file(&path);
}

// ─── Schema & seed ───────────────────────────────────────────────────────────

#[tokio::test]
async fn open_seeds_one_payment_detail() {
  let s = store().await;
  let details = PaymentDetails::new(s).list_all().await.unwrap();
  assert_eq!(details, vec![PaymentDetail::seed()]);
}

#[tokio::test]
async fn ensure_schema_twice_never_reseeds() {
  let s = store().await;

  let report = s.ensure_schema().await.unwrap();
  assert!(report.is_clean(), "{:?}", report.warnings);
  assert!(!report.seeded);

  let report = s.ensure_schema().await.unwrap();
  assert!(!report.seeded);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM snt_details").await, 1);
}

#[tokio::test]
async fn first_ensure_schema_reports_the_seed() {
  let s = SqliteStore::connect(&StoreConfig::in_memory()).await.unwrap();
  let report = s.ensure_schema().await.unwrap();
  assert!(report.is_clean(), "{:?}", report.warnings);
  assert!(report.seeded);
}

#[tokio::test]
async fn admin_rows_suppress_the_seed() {
  let s = SqliteStore::connect(&StoreConfig::in_memory()).await.unwrap();
  s.ensure_schema().await.unwrap();
  s.execute("clear", "DELETE FROM snt_details", vec![]).await.unwrap();
  s.execute(
    "add detail",
    "INSERT INTO snt_details (id, name, inn, kpp, personal_acc, bank_name, bik, corresp_acc)
     VALUES ('ALT', 'СНТ', '1', '2', '3', 'Банк', '4', '5')",
    vec![],
  )
  .await
  .unwrap();

  let report = s.ensure_schema().await.unwrap();
  assert!(!report.seeded);

  let details = PaymentDetails::new(s).list_all().await.unwrap();
  assert_eq!(details.len(), 1);
  assert_eq!(details[0].code, "ALT");
  assert_eq!(details[0].note, None);
}

#[tokio::test]
async fn failing_schema_statement_is_reported_not_fatal() {
  let s = SqliteStore::connect(&StoreConfig::in_memory()).await.unwrap();
  // A view squatting on the users table name cannot be indexed.
  s.execute("squat", "CREATE VIEW snt_users AS SELECT 'x' AS user_name", vec![])
    .await
    .unwrap();

  let report = s.ensure_schema().await.unwrap();
  assert!(report.warnings.iter().any(|w| matches!(
    w,
    Error::Schema { statement: "idx_snt_users_user_name", .. }
  )));

  // Everything else was still created.
  assert!(report.seeded);
  add_contact(&s, 1, "Председатель", "+7 900 000-00-01", None).await;
  let contacts = Contacts::new(s).list_all_by_priority().await.unwrap();
  assert_eq!(contacts.len(), 1);
}

#[tokio::test]
async fn out_of_band_edit_bumps_modified() {
  let s = store().await;
  let before: String = s
    .query("read", "SELECT modified FROM snt_details WHERE id = 'MAIN'", vec![], |r| r.get(0))
    .await
    .unwrap()
    .remove(0);

  tokio::time::sleep(Duration::from_millis(5)).await;
  s.execute("edit", "UPDATE snt_details SET bank_name = 'Другой банк'", vec![])
    .await
    .unwrap();

  let after: String = s
    .query("read", "SELECT modified FROM snt_details WHERE id = 'MAIN'", vec![], |r| r.get(0))
    .await
    .unwrap()
    .remove(0);
  assert_ne!(before, after);
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creates_person() {
  let s = store().await;
  let people = People::new(s);

  people.upsert(42, "dacha_owner".into()).await.unwrap();

  let person = people.get(42).await.unwrap().expect("person row");
  assert_eq!(person.user_id, 42);
  assert_eq!(person.handle, "dacha_owner");
  assert_eq!(person.full_name, None);
  assert_eq!(person.phone, None);
  assert_eq!(person.created, person.modified);
}

#[tokio::test]
async fn upsert_twice_keeps_one_row_with_latest_handle() {
  let s = store().await;
  let people = People::new(s.clone());

  people.upsert(42, "old_handle".into()).await.unwrap();
  let first = people.get(42).await.unwrap().unwrap();
  people.upsert(42, "new_handle".into()).await.unwrap();

  assert_eq!(count(&s, "SELECT COUNT(*) FROM snt_users").await, 1);
  let person = people.get(42).await.unwrap().unwrap();
  assert_eq!(person.handle, "new_handle");
  assert_eq!(person.created, first.created);
  assert!(person.modified >= first.modified);
}

#[tokio::test]
async fn upsert_preserves_profile_fields() {
  let s = store().await;
  let people = People::new(s);

  people.upsert(5, "a".into()).await.unwrap();
  people.set_full_name(5, "Иванов Иван Иванович".into()).await.unwrap();
  people.set_phone(5, "9001234567".into()).await.unwrap();
  people.upsert(5, "b".into()).await.unwrap();

  let person = people.get(5).await.unwrap().unwrap();
  assert_eq!(person.handle, "b");
  assert_eq!(person.full_name.as_deref(), Some("Иванов Иван Иванович"));
  assert_eq!(person.phone.as_deref(), Some("9001234567"));
}

#[tokio::test]
async fn get_missing_person_returns_none() {
  let people = People::new(store().await);
  assert!(people.get(404).await.unwrap().is_none());
}

#[tokio::test]
async fn updating_missing_person_is_not_found() {
  let people = People::new(store().await);

  let err = people.set_phone(404, "9000000000".into()).await.unwrap_err();
  assert!(err.is_not_found(), "{err}");

  let err = people.set_full_name(404, "Никто".into()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { entity: "person", .. }));
}

#[tokio::test]
async fn hostile_handle_is_stored_verbatim() {
  let s = store().await;
  let people = People::new(s.clone());
  let handle = "x'); DROP TABLE snt_users; --";

  people.upsert(1, handle.into()).await.unwrap();

  assert_eq!(people.get(1).await.unwrap().unwrap().handle, handle);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM snt_users").await, 1);
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn contacts_come_back_in_priority_order() {
  let s = store().await;
  add_contact(&s, 3, "Сторож", "+7 900 000-00-03", None).await;
  add_contact(&s, 1, "Председатель", "+7 900 000-00-01", Some("по будням")).await;
  add_contact(&s, 2, "Бухгалтер", "+7 900 000-00-02", None).await;

  let contacts = Contacts::new(s).list_all_by_priority().await.unwrap();
  let order: Vec<_> = contacts.iter().map(|c| c.priority).collect();
  assert_eq!(order, [1, 2, 3]);
  assert_eq!(contacts[0].extra.as_deref(), Some("по будням"));
}

#[tokio::test]
async fn contact_priority_ties_are_stable() {
  let s = store().await;
  add_contact(&s, 1, "Б", "2", None).await;
  add_contact(&s, 1, "А", "1", None).await;
  let contacts = Contacts::new(s);

  let first: Vec<_> = contacts.list_all_by_priority().await.unwrap();
  let second: Vec<_> = contacts.list_all_by_priority().await.unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn payment_details_ordered_by_code() {
  let s = store().await;
  s.execute(
    "add detail",
    "INSERT INTO snt_details (id, name, inn, kpp, personal_acc, bank_name, bik, corresp_acc, comment)
     VALUES ('ALT', 'СНТ', '1', '2', '3', 'Банк', '4', '5', 'взносы')",
    vec![],
  )
  .await
  .unwrap();

  let codes: Vec<_> = PaymentDetails::new(s)
    .list_all()
    .await
    .unwrap()
    .into_iter()
    .map(|d| d.code)
    .collect();
  assert_eq!(codes, ["ALT", "MAIN"]);
}

#[tokio::test]
async fn empty_contacts_is_empty_vec() {
  let contacts = Contacts::new(store().await);
  assert!(contacts.list_all_by_priority().await.unwrap().is_empty());
}

// ─── Journal ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn journal_appends_entries() {
  let s = store().await;

  s.record_log(LogLevel::Info, "user registered".into(), Some(serde_json::json!({"user_id": 42})))
    .await;
  s.record_log(LogLevel::Error, "query failed".into(), None).await;

  let logs = s.recent_logs(10).await.unwrap();
  assert_eq!(logs.len(), 2);
  assert_eq!(logs[0].level, LogLevel::Error);
  assert_eq!(logs[0].detail, None);
  assert_eq!(logs[1].message, "user registered");
  assert_eq!(logs[1].detail, Some(serde_json::json!({"user_id": 42})));
  assert!(logs[0].id > logs[1].id);
}

#[tokio::test]
async fn journal_failure_is_swallowed() {
  let s = store().await;
  s.execute("drop", "DROP TABLE snt_logs", vec![]).await.unwrap();

  s.record_log(LogLevel::Warn, "nowhere to go".into(), None).await;

  assert!(matches!(
    s.recent_logs(1).await,
    Err(Error::Query { operation: "read journal", .. })
  ));
}
