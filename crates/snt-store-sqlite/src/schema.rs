//! SQL schema for the SNT SQLite store.
//!
//! Every statement is idempotent and executed on its own, so one failing
//! statement does not prevent the others from running. Column names follow
//! the association's existing `snt_*` tables.

/// Connection-level settings applied to every pooled connection.
pub const PRAGMAS: &str = "
PRAGMA busy_timeout = 5000;
PRAGMA journal_mode = WAL;
";

/// One named DDL statement.
pub struct Statement {
  pub name: &'static str,
  pub sql:  &'static str,
}

/// Full schema, in dependency order.
pub const STATEMENTS: &[Statement] = &[
  Statement {
    name: "snt_users",
    sql:  "CREATE TABLE IF NOT EXISTS snt_users (
             created    TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
             modified   TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
             user_id    INTEGER NOT NULL PRIMARY KEY,
             user_name  TEXT    NOT NULL,
             user_fio   TEXT,
             user_phone TEXT,
             comment    TEXT
           )",
  },
  Statement {
    name: "idx_snt_users_user_name",
    sql:  "CREATE INDEX IF NOT EXISTS idx_snt_users_user_name ON snt_users(user_name)",
  },
  Statement {
    name: "snt_details",
    sql:  "CREATE TABLE IF NOT EXISTS snt_details (
             created      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
             modified     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
             id           TEXT NOT NULL PRIMARY KEY,
             name         TEXT NOT NULL,
             inn          TEXT NOT NULL,
             kpp          TEXT NOT NULL,
             personal_acc TEXT NOT NULL,
             bank_name    TEXT NOT NULL,
             bik          TEXT NOT NULL,
             corresp_acc  TEXT NOT NULL,
             comment      TEXT
           )",
  },
  Statement {
    name: "snt_contacts",
    sql:  "CREATE TABLE IF NOT EXISTS snt_contacts (
             created  TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
             modified TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
             prior    INTEGER NOT NULL,
             type     TEXT    NOT NULL PRIMARY KEY,
             value    TEXT    NOT NULL,
             adds     TEXT,
             comment  TEXT
           )",
  },
  Statement {
    name: "idx_snt_contacts_prior",
    sql:  "CREATE INDEX IF NOT EXISTS idx_snt_contacts_prior ON snt_contacts(prior)",
  },
  // Journal rows are append-only; nothing issues UPDATE or DELETE here.
  Statement {
    name: "snt_logs",
    sql:  "CREATE TABLE IF NOT EXISTS snt_logs (
             id      INTEGER PRIMARY KEY AUTOINCREMENT,
             created TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
             level   TEXT NOT NULL,
             message TEXT NOT NULL,
             details TEXT
           )",
  },
  // Out-of-band edits (an admin with a SQL shell) still bump `modified`.
  // Statements issued by the store set it themselves, which the WHEN skips.
  Statement {
    name: "snt_users_touch",
    sql:  "CREATE TRIGGER IF NOT EXISTS snt_users_touch
           AFTER UPDATE ON snt_users FOR EACH ROW
           WHEN NEW.modified IS OLD.modified
           BEGIN
             UPDATE snt_users SET modified = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE user_id = NEW.user_id;
           END",
  },
  Statement {
    name: "snt_details_touch",
    sql:  "CREATE TRIGGER IF NOT EXISTS snt_details_touch
           AFTER UPDATE ON snt_details FOR EACH ROW
           WHEN NEW.modified IS OLD.modified
           BEGIN
             UPDATE snt_details SET modified = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = NEW.id;
           END",
  },
  Statement {
    name: "snt_contacts_touch",
    sql:  "CREATE TRIGGER IF NOT EXISTS snt_contacts_touch
           AFTER UPDATE ON snt_contacts FOR EACH ROW
           WHEN NEW.modified IS OLD.modified
           BEGIN
             UPDATE snt_contacts SET modified = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE type = NEW.type;
           END",
  },
];

/// Insert the default payment-detail row only when the table is empty. A
/// single statement, so racing initialisers cannot both seed.
pub const SEED_PAYMENT_DETAIL: &str = "
INSERT INTO snt_details (
  id, name, inn, kpp, personal_acc, bank_name, bik, corresp_acc, comment
)
SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
WHERE NOT EXISTS (SELECT 1 FROM snt_details)
";
