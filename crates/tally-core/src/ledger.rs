//! [`Ledger`] — the command surface over any [`LedgerStore`].
//!
//! Each mutating command runs as one [`LedgerStore::transact`] call, so the
//! read of the user's deadlines and points and the write of the outcome form
//! a single transaction.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  book::{self, MarkResult},
  deadline::{Deadline, HistoryRecord, NewDeadline, Priority},
  rank::Rank,
  store::LedgerStore,
  user::{NewUser, User, UserSummary},
};

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of "today" for commands that stamp a date.
pub trait Clock: Send + Sync {
  fn today(&self) -> NaiveDate;
}

/// The local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

/// Always the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { self.0 }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// Active deadlines in due-date order, with progress over exactly the listed
/// deadlines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
  pub deadlines: Vec<Deadline>,
  pub priority:  Option<Priority>,
  pub progress:  f64,
  pub rank:      Rank,
}

/// The landing view: standing, progress, and any fresh due-tomorrow alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
  pub user:          UserSummary,
  pub progress:      f64,
  pub notifications: Vec<Deadline>,
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

fn lift<E: Into<Error>>(err: E) -> Error { err.into() }

pub struct Ledger<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for Ledger<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

impl<S: LedgerStore> Ledger<S> {
  pub fn new(store: Arc<S>) -> Self { Self::with_clock(store, Arc::new(SystemClock)) }

  pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self { store, clock }
  }

  pub fn today(&self) -> NaiveDate { self.clock.today() }

  async fn require_user(&self, user_id: Uuid) -> Result<User> {
    self
      .store
      .get_user(user_id)
      .await
      .map_err(lift)?
      .ok_or(Error::UserNotFound(user_id))
  }

  // ── Users ─────────────────────────────────────────────────────────────

  pub async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = self.store.add_user(input).await.map_err(lift)?;
    tracing::info!(user = %user.user_id, "user created");
    Ok(user)
  }

  pub async fn user(&self, user_id: Uuid) -> Result<UserSummary> {
    Ok(self.require_user(user_id).await?.summary())
  }

  // ── Commands ──────────────────────────────────────────────────────────

  pub async fn add_deadline(
    &self,
    user_id: Uuid,
    input: NewDeadline,
  ) -> Result<Deadline> {
    tracing::debug!(
      user = %user_id,
      title = input.title(),
      due = %input.due_date(),
      priority = %input.priority(),
      "adding deadline"
    );
    self
      .store
      .transact(user_id, move |book| Ok(book.add_deadline(input)))
      .await
      .map_err(lift)
  }

  /// Complete a deadline owned by `user_id`. A deadline owned by anyone else
  /// is reported as not found.
  pub async fn mark_completed(
    &self,
    user_id: Uuid,
    deadline_id: Uuid,
  ) -> Result<MarkResult> {
    let today = self.today();
    let result = self
      .store
      .transact(user_id, move |book| book.mark_completed(deadline_id, today))
      .await
      .map_err(lift)?;

    if result.already_completed {
      tracing::debug!(user = %user_id, deadline = %deadline_id, "already completed");
    }
    if result.rank_changed() {
      tracing::info!(
        user = %user_id,
        from = %result.previous_rank,
        to = %result.rank,
        points = result.points,
        "rank changed"
      );
    }
    if let Some(event) = &result.archived {
      tracing::info!(
        user = %user_id,
        archived = event.records.len(),
        "all deadlines completed; archived to history"
      );
    }
    Ok(result)
  }

  /// Completion percentage of the user's active set.
  pub async fn compute_progress(&self, user_id: Uuid) -> Result<f64> {
    self.require_user(user_id).await?;
    let deadlines = self
      .store
      .list_deadlines(user_id, None)
      .await
      .map_err(lift)?;
    Ok(book::progress(&deadlines))
  }

  /// Pending deadlines due the day after `today` that have not been announced
  /// before. Repeated calls with the same `today` return them only once.
  pub async fn due_tomorrow_notifications(
    &self,
    user_id: Uuid,
    today: NaiveDate,
  ) -> Result<Vec<Deadline>> {
    self
      .store
      .transact(user_id, move |book| Ok(book.due_tomorrow(today)))
      .await
      .map_err(lift)
  }

  // ── Views ─────────────────────────────────────────────────────────────

  pub async fn calendar(
    &self,
    user_id: Uuid,
    priority: Option<Priority>,
  ) -> Result<Calendar> {
    let user = self.require_user(user_id).await?;
    let deadlines = self
      .store
      .list_deadlines(user_id, priority)
      .await
      .map_err(lift)?;
    Ok(Calendar {
      progress: book::progress(&deadlines),
      deadlines,
      priority,
      rank: user.rank(),
    })
  }

  pub async fn history(&self, user_id: Uuid) -> Result<Vec<HistoryRecord>> {
    self.require_user(user_id).await?;
    self.store.history(user_id).await.map_err(lift)
  }

  /// Progress and standing, raising due-tomorrow alerts in the same
  /// transaction.
  pub async fn dashboard(
    &self,
    user_id: Uuid,
    today: NaiveDate,
  ) -> Result<Dashboard> {
    let dashboard = self
      .store
      .transact(user_id, move |book| {
        let notifications = book.due_tomorrow(today);
        Ok(Dashboard {
          user: book.user().summary(),
          progress: book.progress(),
          notifications,
        })
      })
      .await
      .map_err(lift)?;

    if !dashboard.notifications.is_empty() {
      tracing::info!(
        user = %user_id,
        count = dashboard.notifications.len(),
        "deadlines due tomorrow"
      );
    }
    Ok(dashboard)
  }
}
