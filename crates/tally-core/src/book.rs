//! The per-user working set and the ledger's state transitions.
//!
//! A [`Book`] is loaded by a store inside a transaction, mutated by the pure
//! operations below, and its journal of [`Mutation`]s is written back before
//! the transaction commits. Nothing here touches I/O or reads a clock.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  deadline::{Deadline, HistoryRecord, NewDeadline},
  rank::Rank,
  user::User,
};

// ─── Journal ─────────────────────────────────────────────────────────────────

/// A single write a store must apply, in order, to persist a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
  InsertDeadline(Deadline),
  /// Replace the `completed` and `notified` flags of an existing deadline.
  UpdateDeadline(Deadline),
  SetPoints(u32),
  /// Delete the user's entire active set and insert these snapshots.
  Archive(Vec<HistoryRecord>),
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Emitted when the last pending deadline of a user is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEvent {
  pub completed_on: NaiveDate,
  pub records:      Vec<HistoryRecord>,
}

/// The result of [`Book::mark_completed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkResult {
  pub deadline:          Deadline,
  pub points_awarded:    u32,
  /// The deadline was already completed; nothing was awarded or changed.
  pub already_completed: bool,
  /// The user's point total after the command.
  pub points:            u32,
  pub previous_rank:     Rank,
  pub rank:              Rank,
  pub archived:          Option<ArchiveEvent>,
}

impl MarkResult {
  pub fn rank_changed(&self) -> bool { self.previous_rank != self.rank }
}

// ─── Book ────────────────────────────────────────────────────────────────────

/// A user and their active deadline set.
#[derive(Debug, Clone)]
pub struct Book {
  user:    User,
  active:  Vec<Deadline>,
  journal: Vec<Mutation>,
}

impl Book {
  pub fn new(user: User, active: Vec<Deadline>) -> Self {
    Self { user, active, journal: Vec::new() }
  }

  pub fn user(&self) -> &User { &self.user }

  pub fn active(&self) -> &[Deadline] { &self.active }

  /// Pending writes, oldest first.
  pub fn journal(&self) -> &[Mutation] { &self.journal }

  pub fn into_parts(self) -> (User, Vec<Deadline>, Vec<Mutation>) {
    (self.user, self.active, self.journal)
  }

  /// Add a deadline to the active set. Points and rank are untouched.
  pub fn add_deadline(&mut self, input: NewDeadline) -> Deadline {
    let deadline = input.into_deadline(self.user.user_id);
    self.active.push(deadline.clone());
    self.journal.push(Mutation::InsertDeadline(deadline.clone()));
    deadline
  }

  /// Complete a deadline, award its points, and archive the whole active set
  /// if nothing is left pending.
  ///
  /// Completing an already-completed deadline is a no-op that reports
  /// `already_completed` and awards nothing.
  pub fn mark_completed(
    &mut self,
    deadline_id: Uuid,
    today: NaiveDate,
  ) -> Result<MarkResult> {
    let previous_rank = self.user.rank();
    let idx = self
      .active
      .iter()
      .position(|d| d.deadline_id == deadline_id)
      .ok_or(Error::DeadlineNotFound(deadline_id))?;

    if self.active[idx].completed {
      return Ok(MarkResult {
        deadline: self.active[idx].clone(),
        points_awarded: 0,
        already_completed: true,
        points: self.user.points,
        previous_rank,
        rank: previous_rank,
        archived: None,
      });
    }

    self.active[idx].completed = true;
    let deadline = self.active[idx].clone();
    self.journal.push(Mutation::UpdateDeadline(deadline.clone()));

    let points_awarded = deadline.priority.points();
    self.user.points = self.user.points.saturating_add(points_awarded);
    self.journal.push(Mutation::SetPoints(self.user.points));

    let archived = if self.active.iter().all(|d| d.completed) {
      Some(self.archive(today))
    } else {
      None
    };

    Ok(MarkResult {
      deadline,
      points_awarded,
      already_completed: false,
      points: self.user.points,
      previous_rank,
      rank: self.user.rank(),
      archived,
    })
  }

  fn archive(&mut self, completed_on: NaiveDate) -> ArchiveEvent {
    let records: Vec<HistoryRecord> = self
      .active
      .drain(..)
      .map(|d| d.snapshot(completed_on))
      .collect();
    self.journal.push(Mutation::Archive(records.clone()));
    ArchiveEvent { completed_on, records }
  }

  /// Pending deadlines due the day after `today` that have not yet been
  /// announced. Each returned deadline is flagged so it is announced once.
  pub fn due_tomorrow(&mut self, today: NaiveDate) -> Vec<Deadline> {
    let Some(tomorrow) = today.checked_add_days(Days::new(1)) else {
      return Vec::new();
    };

    let mut due = Vec::new();
    for d in self.active.iter_mut() {
      if !d.completed && !d.notified && d.due_date == tomorrow {
        d.notified = true;
        self.journal.push(Mutation::UpdateDeadline(d.clone()));
        due.push(d.clone());
      }
    }
    due
  }

  /// Completion percentage of the active set.
  pub fn progress(&self) -> f64 { progress(&self.active) }
}

/// Percentage of `deadlines` that are completed; 0 for an empty slice.
pub fn progress(deadlines: &[Deadline]) -> f64 {
  if deadlines.is_empty() {
    return 0.0;
  }
  let done = deadlines.iter().filter(|d| d.completed).count();
  done as f64 / deadlines.len() as f64 * 100.0
}
