//! Renders reference data into HTML message bodies.
//!
//! An empty listing always renders a fixed "not found" text, never an empty
//! body.

use std::fmt::Write as _;

use snt_core::reference::{ContactEntry, PaymentDetail};

use crate::texts::{CONTACTS_NOT_FOUND, DETAILS_NOT_FOUND};

/// Escape the three characters Telegram's HTML parse mode cares about.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      c => out.push(c),
    }
  }
  out
}

/// One `type: value` block per contact, in the order given, with the extra
/// text on an indented line below.
pub fn render_contacts(contacts: &[ContactEntry]) -> String {
  if contacts.is_empty() {
    return CONTACTS_NOT_FOUND.to_string();
  }

  let mut out = String::new();
  for c in contacts {
    let _ = writeln!(out, "<b>{}</b>: {}", escape_html(&c.kind), escape_html(&c.value));
    if let Some(extra) = c.extra.as_deref().filter(|e| !e.is_empty()) {
      let _ = writeln!(out, "  <i>{}</i>", escape_html(extra));
    }
  }
  out
}

/// One labelled block per payment detail, blocks separated by a blank line.
pub fn render_payment_details(details: &[PaymentDetail]) -> String {
  if details.is_empty() {
    return DETAILS_NOT_FOUND.to_string();
  }

  let mut out = String::new();
  for d in details {
    let _ = writeln!(out, "🏦 <b>{}</b>", escape_html(&d.organization));
    let _ = writeln!(out, "ИНН: {}", escape_html(&d.inn));
    let _ = writeln!(out, "КПП: {}", escape_html(&d.kpp));
    let _ = writeln!(out, "Счёт: {}", escape_html(&d.account));
    let _ = writeln!(out, "Банк: {}", escape_html(&d.bank_name));
    let _ = writeln!(out, "БИК: {}", escape_html(&d.bik));
    let _ = writeln!(out, "К/с: {}", escape_html(&d.correspondent_account));
    if let Some(note) = d.note.as_deref().filter(|n| !n.is_empty()) {
      let _ = writeln!(out, "Комментарий: {}", escape_html(note));
    }
    out.push('\n');
  }
  out
}
