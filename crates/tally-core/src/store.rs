//! The `LedgerStore` trait.
//!
//! Implemented by persistence backends ([`crate::memory::MemoryStore`],
//! `tally-store-sqlite`). The [`crate::ledger::Ledger`] service and the HTTP
//! layer depend on this abstraction, not on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  book::Book,
  deadline::{Deadline, HistoryRecord, Priority},
  user::{NewUser, User},
};

/// Abstraction over a ledger persistence backend.
///
/// Every state change goes through [`LedgerStore::transact`], which gives the
/// caller exclusive access to one user's [`Book`] for the duration of the
/// closure and persists the book's journal atomically afterwards.
pub trait LedgerStore: Send + Sync {
  /// Backend error. Must carry domain errors in both directions so that a
  /// [`crate::Error`] raised inside a transaction reaches the caller intact.
  type Error: std::error::Error
    + Send
    + Sync
    + 'static
    + From<crate::Error>
    + Into<crate::Error>;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user with zero points. Fails with
  /// [`crate::Error::EmailTaken`] if the email is already registered.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Transactions ──────────────────────────────────────────────────────

  /// Load the user's book, run `f` against it, and write back its journal,
  /// all inside one serialisable transaction.
  ///
  /// If `f` returns an error nothing is written. Fails with
  /// [`crate::Error::UserNotFound`] if the user does not exist.
  fn transact<T, F>(
    &self,
    user_id: Uuid,
    f: F,
  ) -> impl Future<Output = Result<T, Self::Error>> + Send + '_
  where
    F: FnOnce(&mut Book) -> crate::Result<T> + Send + 'static,
    T: Send + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// The user's active deadlines ordered by due date, then creation time,
  /// optionally restricted to one priority.
  fn list_deadlines(
    &self,
    user_id: Uuid,
    priority: Option<Priority>,
  ) -> impl Future<Output = Result<Vec<Deadline>, Self::Error>> + Send + '_;

  /// The user's history records, most recently completed first.
  fn history(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<HistoryRecord>, Self::Error>> + Send + '_;
}
