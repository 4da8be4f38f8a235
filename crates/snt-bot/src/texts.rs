//! Fixed user-facing texts and the main menu.
//!
//! Everything the bot says that does not come from the database lives here.
//! Texts are HTML (the transport sends with `parse_mode=HTML`).

use crate::format::escape_html;

// ─── Main menu ───────────────────────────────────────────────────────────────

/// One button of the seven-button main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
  Weather,
  Timetable,
  Contacts,
  PaymentDetails,
  Quote,
  Anecdote,
  Bash,
}

impl MenuItem {
  /// Menu order, top to bottom.
  pub const ALL: [MenuItem; 7] = [
    Self::Weather,
    Self::Timetable,
    Self::Contacts,
    Self::PaymentDetails,
    Self::Quote,
    Self::Anecdote,
    Self::Bash,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Self::Weather => "Прогноз погоды",
      Self::Timetable => "Расписание электричек",
      Self::Contacts => "Контакты",
      Self::PaymentDetails => "Реквизиты для оплаты",
      Self::Quote => "Цитату!",
      Self::Anecdote => "Анекдот!",
      Self::Bash => "Баш!",
    }
  }

  /// Exact match only: no trimming, no case folding.
  pub fn from_label(text: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|item| item.label() == text)
  }
}

// ─── Commands ────────────────────────────────────────────────────────────────

pub const WELCOME: &str = "Добро пожаловать! Выберите действие:";
pub const MENU_OPENED: &str = "Меню открыто.";
pub const ADMIN_GREETING: &str = "Привет, админ!";
pub const UNKNOWN_COMMAND: &str = "Неизвестная команда. Используйте /start";

// ─── Failures ────────────────────────────────────────────────────────────────

pub const REGISTRATION_FAILED: &str = "Произошла ошибка при регистрации.";
pub const LOOKUP_FAILED: &str = "Не удалось получить данные. Попробуйте позже.";
pub const WEATHER_UNAVAILABLE: &str = "Не удалось получить погоду.";
pub const WEATHER_UNREADABLE: &str = "Ошибка обработки погоды.";

// ─── Empty listings ──────────────────────────────────────────────────────────

pub const CONTACTS_NOT_FOUND: &str = "Контакты не найдены.";
pub const DETAILS_NOT_FOUND: &str = "Реквизиты не найдены.";

// ─── Canned answers ──────────────────────────────────────────────────────────

pub const TIMETABLE_UNAVAILABLE: &str = "Расписание электричек временно недоступно.";

pub const QUOTE: &str = "Цитата дня: «Программирование — это искусство заставить компьютер \
  делать то, что нужно, а не то, что вы сказали».";

pub const ANECDOTE: &str = "Анекдот: Штирлиц шёл по коридору и вдруг услышал шаги сзади. \
  «За мной следят», — подумал Штирлиц и ускорил шаг. Шаги тоже ускорились. Тогда Штирлиц \
  побежал. Шаги тоже побежали. Тогда Штирлиц остановился и закричал: «Кто здесь?». В ответ \
  тишина. Тогда Штирлиц закурил и пошёл дальше. А сзади шли его шаги.";

pub const BASH_QUOTE: &str = "Цитата с Баша: – У вас есть план Б? – У нас есть план «Бля буду».";

// ─── Greetings ───────────────────────────────────────────────────────────────

fn mention(bot_username: Option<&str>) -> String {
  format!("@{}", bot_username.unwrap_or_default())
}

/// Reply to `/start` in a group chat.
pub fn group_redirect(bot_username: Option<&str>) -> String {
  format!(
    "Привет! Я бот СНТ. Для работы со мной перейдите, пожалуйста, в личный чат: {}",
    mention(bot_username)
  )
}

/// Sent to a chat the bot has just been added to.
pub fn bot_joined(bot_username: Option<&str>) -> String {
  format!(
    "Всем привет! Я бот СНТ. Чем могу помочь? Напишите мне в личку: {}",
    mention(bot_username)
  )
}

/// Sent to a chat a new member has just joined.
pub fn member_joined(first_name: &str, bot_username: Option<&str>) -> String {
  format!(
    "Привет, {}! Добро пожаловать в чат СНТ. Я бот, могу помочь. Напиши мне в личку: {}",
    escape_html(first_name),
    mention(bot_username)
  )
}
