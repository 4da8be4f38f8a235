//! The SNT community bot: dispatch, formatting and the Telegram transport.
//!
//! [`dispatch::Dispatcher`] turns one [`snt_core::event::InboundEvent`] into
//! at most one [`snt_core::reply::Reply`]. The runners in [`poll`] and
//! [`webhook`] feed it updates from Telegram and send what it returns.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod poll;
pub mod telegram;
pub mod texts;
pub mod weather;
pub mod webhook;

pub use error::{Error, Result};

#[cfg(test)]
mod test_support;
