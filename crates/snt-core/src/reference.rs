//! Reference data: payment details and the contact list.
//!
//! Both tables are maintained by an administrator out-of-band. The bot only
//! reads them; the single program-driven write is the default payment-detail
//! row seeded into an empty table at startup.

use serde::{Deserialize, Serialize};

/// Bank transfer details for paying association dues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetail {
  /// Short code, e.g. `MAIN`.
  pub code:                  String,
  pub organization:          String,
  /// Taxpayer identification number (INN).
  pub inn:                   String,
  /// Registration reason code (KPP).
  pub kpp:                   String,
  pub account:               String,
  pub bank_name:             String,
  /// Bank identification code (BIK).
  pub bik:                   String,
  pub correspondent_account: String,
  pub note:                  Option<String>,
}

impl PaymentDetail {
  /// The row seeded into an empty payment-detail table.
  pub fn seed() -> Self {
    Self {
      code:                  "MAIN".to_string(),
      organization:          "СНТ \"КОТЕЛЬЩИК\"".to_string(),
      inn:                   "2263006486".to_string(),
      kpp:                   "226301001".to_string(),
      account:               "40703810202140010272".to_string(),
      bank_name:             "АЛТАЙСКОЕ ОТДЕЛЕНИЕ N8644 ПАО СБЕРБАНК".to_string(),
      bik:                   "040173604".to_string(),
      correspondent_account: "30101810200000000604".to_string(),
      note:                  Some("Первоначальное значение".to_string()),
    }
  }
}

/// One line of the association's contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
  /// Display order, ascending.
  pub priority: i64,
  /// Unique label such as "Председатель" or "Электрик".
  pub kind:     String,
  pub value:    String,
  /// Extra text rendered on its own line under the entry.
  pub extra:    Option<String>,
  pub note:     Option<String>,
}
