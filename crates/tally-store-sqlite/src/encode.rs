//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 with fixed microsecond precision so they sort
//! lexically. Calendar dates are `YYYY-MM-DD`. UUIDs are hyphenated lowercase
//! strings. Booleans are stored as 0/1 integers by rusqlite itself.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tally_core::{
  deadline::{DATE_FORMAT, Deadline, HistoryRecord, Priority},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Priority ────────────────────────────────────────────────────────────────

pub fn encode_priority(p: Priority) -> &'static str { p.into() }

pub fn decode_priority(s: &str) -> Result<Priority> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown priority: {s:?}")))
}

// ─── Points ──────────────────────────────────────────────────────────────────

pub fn decode_points(n: i64) -> Result<u32> {
  u32::try_from(n).map_err(|_| Error::Decode(format!("points out of range: {n}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub name:       String,
  pub email:      String,
  pub points:     i64,
  pub created_at: String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "user_id, name, email, points, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      points:     row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      email:      self.email,
      points:     decode_points(self.points)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `deadlines` row.
pub struct RawDeadline {
  pub deadline_id: String,
  pub user_id:     String,
  pub title:       String,
  pub due_date:    String,
  pub priority:    String,
  pub completed:   bool,
  pub notified:    bool,
  pub created_at:  String,
}

impl RawDeadline {
  pub const COLUMNS: &'static str = "deadline_id, user_id, title, due_date, \
                                     priority, completed, notified, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      deadline_id: row.get(0)?,
      user_id:     row.get(1)?,
      title:       row.get(2)?,
      due_date:    row.get(3)?,
      priority:    row.get(4)?,
      completed:   row.get(5)?,
      notified:    row.get(6)?,
      created_at:  row.get(7)?,
    })
  }

  pub fn into_deadline(self) -> Result<Deadline> {
    Ok(Deadline {
      deadline_id: decode_uuid(&self.deadline_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      title:       self.title,
      due_date:    decode_date(&self.due_date)?,
      priority:    decode_priority(&self.priority)?,
      completed:   self.completed,
      notified:    self.notified,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `history` row.
pub struct RawHistory {
  pub history_id:   String,
  pub user_id:      String,
  pub title:        String,
  pub due_date:     String,
  pub priority:     String,
  pub completed_on: String,
}

impl RawHistory {
  pub const COLUMNS: &'static str =
    "history_id, user_id, title, due_date, priority, completed_on";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      history_id:   row.get(0)?,
      user_id:      row.get(1)?,
      title:        row.get(2)?,
      due_date:     row.get(3)?,
      priority:     row.get(4)?,
      completed_on: row.get(5)?,
    })
  }

  pub fn into_record(self) -> Result<HistoryRecord> {
    Ok(HistoryRecord {
      history_id:   decode_uuid(&self.history_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      title:        self.title,
      due_date:     decode_date(&self.due_date)?,
      priority:     decode_priority(&self.priority)?,
      completed_on: decode_date(&self.completed_on)?,
    })
  }
}
