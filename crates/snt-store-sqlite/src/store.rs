//! [`SqliteStore`], the pooled record store.

use std::{path::PathBuf, time::Duration};

use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, types::Value};
use snt_core::{
  journal::{Journal, LogEntry, LogLevel},
  reference::PaymentDetail,
};

use crate::{
  Error, Result,
  encode::{RawLogEntry, encode_dt, opt_text, text},
  schema::{PRAGMAS, SEED_PAYMENT_DETAIL, STATEMENTS},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Where the database lives and how many connections may be open at once.
#[derive(Debug, Clone)]
pub struct StoreConfig {
  /// Database file, or `:memory:`.
  pub path:            PathBuf,
  pub max_connections: u32,
  /// How long a checkout may wait for a free connection.
  pub connect_timeout: Duration,
}

impl StoreConfig {
  pub const MEMORY: &'static str = ":memory:";

  pub fn new(path: impl Into<PathBuf>, max_connections: u32) -> Self {
    Self {
      path: path.into(),
      max_connections,
      connect_timeout: Duration::from_secs(5),
    }
  }

  pub fn in_memory() -> Self { Self::new(Self::MEMORY, 1) }

  fn is_memory(&self) -> bool { self.path.as_os_str() == Self::MEMORY }
}

// ─── Initialisation report ───────────────────────────────────────────────────

/// Outcome of [`SqliteStore::ensure_schema`].
///
/// Schema and seed failures never abort startup; they are collected here
/// (and traced) instead.
#[derive(Debug, Default)]
pub struct InitReport {
  pub warnings: Vec<Error>,
  /// Whether this run inserted the default payment-detail row.
  pub seeded:   bool,
}

impl InitReport {
  pub fn is_clean(&self) -> bool { self.warnings.is_empty() }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The SNT record store backed by SQLite.
///
/// Cloning is cheap: the pool is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
  /// Connect, verify liveness, then make sure the schema and seed row exist.
  ///
  /// Only connectivity problems are returned as errors; schema warnings are
  /// traced and otherwise ignored.
  pub async fn open(config: &StoreConfig) -> Result<Self> {
    let store = Self::connect(config).await?;
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Open a single-connection in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> { Self::open(&StoreConfig::in_memory()).await }

  /// Build the pool and run a round-trip probe. Does not touch the schema.
  pub async fn connect(config: &StoreConfig) -> Result<Self> {
    let memory  = config.is_memory();
    let manager = if memory {
      SqliteConnectionManager::memory()
    } else {
      SqliteConnectionManager::file(&config.path)
    }
    .with_init(|conn| conn.execute_batch(PRAGMAS));

    // Every in-memory connection is its own database, so an in-memory pool
    // holds exactly one connection and never recycles it.
    let builder = Pool::<SqliteConnectionManager>::builder()
      .connection_timeout(config.connect_timeout);
    let builder = if memory {
      builder.max_size(1).idle_timeout(None).max_lifetime(None)
    } else {
      builder.max_size(config.max_connections.max(1))
    };

    let pool = tokio::task::spawn_blocking(move || builder.build(manager))
      .await?
      .map_err(|e| Error::Connectivity(e.to_string()))?;

    let store = Self { pool };
    store
      .call("probe", |conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
      .await
      .map_err(|e| Error::Connectivity(e.to_string()))?;

    tracing::debug!(path = ?config.path, "database connection pool ready");
    Ok(store)
  }

  /// Run every schema statement, then seed the payment details if empty.
  ///
  /// Safe to call any number of times, from any number of processes.
  pub async fn ensure_schema(&self) -> Result<InitReport> {
    let seed = PaymentDetail::seed();

    let report = self
      .with_conn(move |conn| {
        let mut report = InitReport::default();

        for statement in STATEMENTS {
          if let Err(source) = conn.execute_batch(statement.sql) {
            report.warnings.push(Error::Schema { statement: statement.name, source });
          }
        }

        let seeded = conn.execute(
          SEED_PAYMENT_DETAIL,
          rusqlite::params![
            seed.code,
            seed.organization,
            seed.inn,
            seed.kpp,
            seed.account,
            seed.bank_name,
            seed.bik,
            seed.correspondent_account,
            seed.note,
          ],
        );
        match seeded {
          Ok(n) => report.seeded = n > 0,
          Err(source) => report
            .warnings
            .push(Error::Query { operation: "seed payment details", source }),
        }

        Ok(report)
      })
      .await?;

    for warning in &report.warnings {
      tracing::warn!(error = %warning, "schema initialisation step failed");
    }
    if report.seeded {
      tracing::info!("seeded default payment details");
    }
    tracing::info!("connected to database and initialised tables");

    Ok(report)
  }

  // ── Pass-through execution ────────────────────────────────────────────────

  /// Execute one parameterised statement and return the affected row count.
  ///
  /// Statement text is `'static`; values only ever travel as parameters.
  pub async fn execute(
    &self,
    operation: &'static str,
    sql:       &'static str,
    params:    Vec<Value>,
  ) -> Result<usize> {
    self
      .call(operation, move |conn| {
        conn.execute(sql, rusqlite::params_from_iter(params))
      })
      .await
  }

  /// Run one parameterised query, mapping each row with `map`.
  pub async fn query<T, F>(
    &self,
    operation: &'static str,
    sql:       &'static str,
    params:    Vec<Value>,
    map:       F,
  ) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    self
      .call(operation, move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
  }

  /// The most recent journal entries, newest first.
  pub async fn recent_logs(&self, limit: usize) -> Result<Vec<LogEntry>> {
    let raws = self
      .query(
        "read journal",
        "SELECT id, level, message, details, created
         FROM snt_logs ORDER BY id DESC LIMIT ?1",
        vec![Value::Integer(limit as i64)],
        RawLogEntry::from_row,
      )
      .await?;

    raws.into_iter().map(RawLogEntry::into_entry).collect()
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  /// Run `f` against a pooled connection on the blocking thread pool, naming
  /// the operation in any database error.
  async fn call<T, F>(&self, operation: &'static str, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
  {
    self
      .with_conn(move |conn| f(conn).map_err(|source| Error::Query { operation, source }))
      .await
  }

  async fn with_conn<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
  {
    let pool = self.pool.clone();
    tokio::task::spawn_blocking(move || {
      let conn = pool.get()?;
      f(&conn)
    })
    .await?
  }
}

// ─── Journal impl ────────────────────────────────────────────────────────────

impl Journal for SqliteStore {
  async fn record_log(
    &self,
    level: LogLevel,
    message: String,
    detail: Option<serde_json::Value>,
  ) {
    let params = vec![
      text(encode_dt(Utc::now())),
      text(level.as_str()),
      text(message),
      opt_text(detail.map(|d| d.to_string())),
    ];

    let written = self
      .execute(
        "record log",
        "INSERT INTO snt_logs (created, level, message, details) VALUES (?1, ?2, ?3, ?4)",
        params,
      )
      .await;

    if let Err(e) = written {
      tracing::warn!(error = %e, %level, "failed to write journal entry");
    }
  }
}
