//! SQLite backend for the SNT bot.
//!
//! Connections come from a bounded [`r2d2`] pool; every statement runs on
//! tokio's blocking thread pool so the async runtime is never stalled.

mod encode;
mod managers;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use managers::{Contacts, PaymentDetails, People, SqliteBackend};
pub use store::{InitReport, SqliteStore, StoreConfig};

#[cfg(test)]
mod tests;
