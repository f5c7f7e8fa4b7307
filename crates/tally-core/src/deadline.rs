//! Deadlines, their priorities, and the history snapshots they become once
//! archived.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The wire format for due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Priority ────────────────────────────────────────────────────────────────

/// How urgent a deadline is; determines the points awarded on completion.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::IntoStaticStr,
)]
pub enum Priority {
  High,
  #[default]
  Medium,
  Low,
}

impl Priority {
  /// Points awarded when a deadline of this priority is completed.
  pub fn points(self) -> u32 {
    match self {
      Self::High => 20,
      Self::Medium => 15,
      Self::Low => 10,
    }
  }

  /// Parse one of the literals `High`, `Medium`, `Low`. A missing or blank
  /// value falls back to [`Priority::Medium`].
  pub fn parse_field(raw: Option<&str>) -> Result<Self> {
    match raw.map(str::trim) {
      None | Some("") => Ok(Self::default()),
      Some(s) => s
        .parse()
        .map_err(|_| Error::invalid(format!("unknown priority {s:?}"))),
    }
  }
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` due date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
    Error::invalid(format!("invalid date {raw:?}, expected YYYY-MM-DD"))
  })
}

// ─── Deadline ────────────────────────────────────────────────────────────────

/// An active deadline. Lives in the user's active set until the whole set is
/// completed and archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
  pub deadline_id: Uuid,
  pub user_id:     Uuid,
  pub title:       String,
  pub due_date:    NaiveDate,
  pub priority:    Priority,
  pub completed:   bool,
  /// Set once a due-tomorrow reminder has been raised for this deadline.
  pub notified:    bool,
  pub created_at:  DateTime<Utc>,
}

impl Deadline {
  /// The immutable history snapshot of this deadline.
  pub fn snapshot(&self, completed_on: NaiveDate) -> HistoryRecord {
    HistoryRecord {
      history_id: Uuid::new_v4(),
      user_id: self.user_id,
      title: self.title.clone(),
      due_date: self.due_date,
      priority: self.priority,
      completed_on,
    }
  }
}

/// A validated add-deadline command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeadline {
  title:    String,
  due_date: NaiveDate,
  priority: Priority,
}

impl NewDeadline {
  pub fn new(
    title: impl Into<String>,
    due_date: NaiveDate,
    priority: Priority,
  ) -> Result<Self> {
    let title = title.into().trim().to_owned();
    if title.is_empty() {
      return Err(Error::invalid("title must not be empty"));
    }
    Ok(Self { title, due_date, priority })
  }

  /// Validate raw form fields: a title, a `YYYY-MM-DD` date, and an optional
  /// priority literal.
  pub fn from_fields(
    title: &str,
    due_date: &str,
    priority: Option<&str>,
  ) -> Result<Self> {
    let due_date = parse_due_date(due_date)?;
    let priority = Priority::parse_field(priority)?;
    Self::new(title, due_date, priority)
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn due_date(&self) -> NaiveDate { self.due_date }

  pub fn priority(&self) -> Priority { self.priority }

  pub(crate) fn into_deadline(self, user_id: Uuid) -> Deadline {
    Deadline {
      deadline_id: Uuid::new_v4(),
      user_id,
      title: self.title,
      due_date: self.due_date,
      priority: self.priority,
      completed: false,
      notified: false,
      created_at: Utc::now(),
    }
  }
}

// ─── History ─────────────────────────────────────────────────────────────────

/// A snapshot of a completed deadline, written when the user's whole active
/// set is archived. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
  pub history_id:   Uuid,
  pub user_id:      Uuid,
  pub title:        String,
  pub due_date:     NaiveDate,
  pub priority:     Priority,
  pub completed_on: NaiveDate,
}
