//! Core types and trait definitions for the SNT community bot.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend (`snt-store-sqlite`) and the bot service (`snt-bot`) both
//! depend on it.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures where they matter.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod event;
pub mod journal;
pub mod person;
pub mod reference;
pub mod reply;
pub mod store;

pub use error::{Error, Result};
