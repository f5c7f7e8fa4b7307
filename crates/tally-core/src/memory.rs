//! [`MemoryStore`] — an in-process [`LedgerStore`] for tests and embedding.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::{
  Error, Result,
  book::{Book, Mutation},
  deadline::{Deadline, HistoryRecord, Priority},
  store::LedgerStore,
  user::{NewUser, User},
};

#[derive(Debug, Default)]
struct State {
  users:     HashMap<Uuid, User>,
  /// Active deadlines of every user, in insertion order.
  deadlines: Vec<Deadline>,
  history:   Vec<HistoryRecord>,
}

/// A ledger store held entirely in memory behind a single mutex.
///
/// Cloning is cheap and clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<Mutex<State>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> Result<MutexGuard<'_, State>> {
    self
      .state
      .lock()
      .map_err(|_| Error::Store("memory store mutex poisoned".into()))
  }
}

impl State {
  fn apply(&mut self, user_id: Uuid, journal: Vec<Mutation>) {
    for m in journal {
      match m {
        Mutation::InsertDeadline(d) => self.deadlines.push(d),
        Mutation::UpdateDeadline(d) => {
          if let Some(slot) = self
            .deadlines
            .iter_mut()
            .find(|x| x.deadline_id == d.deadline_id)
          {
            slot.completed = d.completed;
            slot.notified = d.notified;
          }
        }
        Mutation::SetPoints(points) => {
          if let Some(user) = self.users.get_mut(&user_id) {
            user.points = points;
          }
        }
        Mutation::Archive(records) => {
          self.deadlines.retain(|d| d.user_id != user_id);
          self.history.extend(records);
        }
      }
    }
  }
}

impl LedgerStore for MemoryStore {
  type Error = Error;

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let mut state = self.lock()?;
    if state.users.values().any(|u| u.email == input.email()) {
      return Err(Error::EmailTaken(input.email().to_owned()));
    }
    let user = input.into_user();
    state.users.insert(user.user_id, user.clone());
    Ok(user)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    Ok(self.lock()?.users.get(&user_id).cloned())
  }

  async fn transact<T, F>(&self, user_id: Uuid, f: F) -> Result<T>
  where
    F: FnOnce(&mut Book) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let mut state = self.lock()?;
    let user = state
      .users
      .get(&user_id)
      .cloned()
      .ok_or(Error::UserNotFound(user_id))?;
    let active = state
      .deadlines
      .iter()
      .filter(|d| d.user_id == user_id)
      .cloned()
      .collect();

    let mut book = Book::new(user, active);
    let out = f(&mut book)?;

    let (_, _, journal) = book.into_parts();
    state.apply(user_id, journal);
    Ok(out)
  }

  async fn list_deadlines(
    &self,
    user_id: Uuid,
    priority: Option<Priority>,
  ) -> Result<Vec<Deadline>> {
    let state = self.lock()?;
    let mut out: Vec<Deadline> = state
      .deadlines
      .iter()
      .filter(|d| d.user_id == user_id)
      .filter(|d| priority.is_none_or(|p| d.priority == p))
      .cloned()
      .collect();
    out.sort_by_key(|d| (d.due_date, d.created_at));
    Ok(out)
  }

  async fn history(&self, user_id: Uuid) -> Result<Vec<HistoryRecord>> {
    let state = self.lock()?;
    let mut out: Vec<HistoryRecord> = state
      .history
      .iter()
      .filter(|h| h.user_id == user_id)
      .cloned()
      .collect();
    out.reverse();
    out.sort_by(|a, b| b.completed_on.cmp(&a.completed_on));
    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::deadline::NewDeadline;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[tokio::test]
  async fn duplicate_email_is_rejected() {
    let s = MemoryStore::new();
    s.add_user(NewUser::new("Ada", "ada@example.com").unwrap())
      .await
      .unwrap();
    let err = s
      .add_user(NewUser::new("Other", "ada@example.com").unwrap())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::EmailTaken(_)));
  }

  #[tokio::test]
  async fn failed_transaction_writes_nothing() {
    let s = MemoryStore::new();
    let user = s
      .add_user(NewUser::new("Ada", "ada@example.com").unwrap())
      .await
      .unwrap();

    let err = s
      .transact(user.user_id, |book| {
        book.add_deadline(
          NewDeadline::new("x", date(2024, 1, 1), Priority::High).unwrap(),
        );
        Err::<(), _>(Error::invalid("abort"))
      })
      .await
      .unwrap_err();
    assert!(err.is_invalid_input());
    assert!(
      s.list_deadlines(user.user_id, None)
        .await
        .unwrap()
        .is_empty()
    );
  }

  #[tokio::test]
  async fn transact_for_unknown_user_is_not_found() {
    let s = MemoryStore::new();
    let err = s.transact(Uuid::new_v4(), |_| Ok(())).await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound(_)));
  }

  #[tokio::test]
  async fn deadlines_are_scoped_and_sorted() {
    let s = MemoryStore::new();
    let a = s
      .add_user(NewUser::new("A", "a@example.com").unwrap())
      .await
      .unwrap();
    let b = s
      .add_user(NewUser::new("B", "b@example.com").unwrap())
      .await
      .unwrap();

    s.transact(a.user_id, |book| {
      book.add_deadline(
        NewDeadline::new("late", date(2024, 3, 1), Priority::Low).unwrap(),
      );
      book.add_deadline(
        NewDeadline::new("early", date(2024, 1, 1), Priority::High).unwrap(),
      );
      Ok(())
    })
    .await
    .unwrap();
    s.transact(b.user_id, |book| {
      book.add_deadline(
        NewDeadline::new("theirs", date(2024, 2, 1), Priority::Low).unwrap(),
      );
      Ok(())
    })
    .await
    .unwrap();

    let titles: Vec<_> = s
      .list_deadlines(a.user_id, None)
      .await
      .unwrap()
      .into_iter()
      .map(|d| d.title)
      .collect();
    assert_eq!(titles, ["early", "late"]);

    let low = s
      .list_deadlines(a.user_id, Some(Priority::Low))
      .await
      .unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].title, "late");
  }
}
