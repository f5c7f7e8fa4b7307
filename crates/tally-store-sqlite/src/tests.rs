//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::NaiveDate;
use tally_core::{
  deadline::{NewDeadline, Priority},
  ledger::{FixedClock, Ledger},
  rank::Rank,
  store::LedgerStore,
  user::NewUser,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ledger(s: SqliteStore, today: NaiveDate) -> Ledger<SqliteStore> {
  Ledger::with_clock(Arc::new(s), Arc::new(FixedClock(today)))
}

fn deadline(title: &str, due: &str, priority: &str) -> NewDeadline {
  NewDeadline::from_fields(title, due, Some(priority)).unwrap()
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let user = s
    .add_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap();
  assert_eq!(user.points, 0);

  let fetched = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(fetched, user);
  assert_eq!(fetched.rank(), Rank::Unranked);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_email_taken() {
  let s = store().await;
  s.add_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap();

  let err = s
    .add_user(NewUser::new("Imposter", "ada@example.com").unwrap())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(tally_core::Error::EmailTaken(_))
  ));
}

// ─── Transactions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn added_deadline_roundtrips() {
  let s = store().await;
  let l = ledger(s.clone(), date(2024, 4, 10));
  let user = l
    .create_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap();

  let added = l
    .add_deadline(user.user_id, deadline("Essay", "2024-04-20", "High"))
    .await
    .unwrap();

  let listed = s.list_deadlines(user.user_id, None).await.unwrap();
  assert_eq!(listed, vec![added]);
}

#[tokio::test]
async fn domain_error_rolls_back_the_transaction() {
  let s = store().await;
  let user = s
    .add_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap();

  let err = s
    .transact(user.user_id, |book| {
      book.add_deadline(deadline("never", "2024-04-20", "Low"));
      Err::<(), _>(tally_core::Error::invalid("abort"))
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Core(ref e) if e.is_invalid_input()));
  assert!(s.list_deadlines(user.user_id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn transact_unknown_user_is_not_found() {
  let s = store().await;
  let err = s.transact(Uuid::new_v4(), |_| Ok(())).await.unwrap_err();
  let core: tally_core::Error = err.into();
  assert!(matches!(core, tally_core::Error::UserNotFound(_)));
}

#[tokio::test]
async fn points_and_archive_are_persisted() {
  let s = store().await;
  let today = date(2024, 4, 10);
  let l = ledger(s.clone(), today);
  let user = l
    .create_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap();
  let u = user.user_id;

  let mut ids = Vec::new();
  for (t, p) in [("a", "High"), ("b", "High"), ("c", "High")] {
    ids.push(
      l.add_deadline(u, deadline(t, "2024-04-15", p))
        .await
        .unwrap()
        .deadline_id,
    );
  }

  l.mark_completed(u, ids[0]).await.unwrap();
  l.mark_completed(u, ids[1]).await.unwrap();
  assert_eq!(s.get_user(u).await.unwrap().unwrap().points, 40);
  let active = s.list_deadlines(u, None).await.unwrap();
  assert_eq!(active.len(), 3);
  assert_eq!(active.iter().filter(|d| d.completed).count(), 2);
  assert!(s.history(u).await.unwrap().is_empty());

  let r = l.mark_completed(u, ids[2]).await.unwrap();
  assert_eq!(r.rank, Rank::BronzeBeater);
  assert!(r.archived.is_some());

  assert!(s.list_deadlines(u, None).await.unwrap().is_empty());
  let history = s.history(u).await.unwrap();
  assert_eq!(history.len(), 3);
  assert!(history.iter().all(|h| h.completed_on == today));
  assert!(history.iter().all(|h| h.priority == Priority::High));
  assert_eq!(s.get_user(u).await.unwrap().unwrap().points, 60);
}

#[tokio::test]
async fn failed_archive_rolls_back_the_completion() {
  let s = store().await;
  let l = ledger(s.clone(), date(2024, 4, 10));
  let u = l
    .create_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap()
    .user_id;
  let d = l
    .add_deadline(u, deadline("only", "2024-04-15", "High"))
    .await
    .unwrap()
    .deadline_id;

  s.connection()
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER reject_history BEFORE INSERT ON history
         BEGIN SELECT RAISE(ABORT, 'history is read-only'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = l.mark_completed(u, d).await.unwrap_err();
  assert!(matches!(err, tally_core::Error::Store(_)));

  assert_eq!(s.get_user(u).await.unwrap().unwrap().points, 0);
  let active = s.list_deadlines(u, None).await.unwrap();
  assert_eq!(active.len(), 1);
  assert!(!active[0].completed);
  assert!(s.history(u).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_completions_award_once() {
  let s = store().await;
  let l = ledger(s.clone(), date(2024, 4, 10));
  let u = l
    .create_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap()
    .user_id;
  let d = l
    .add_deadline(u, deadline("race", "2024-04-15", "High"))
    .await
    .unwrap()
    .deadline_id;
  l.add_deadline(u, deadline("keep set open", "2024-04-16", "Low"))
    .await
    .unwrap();

  let (l1, l2) = (l.clone(), l.clone());
  let a = tokio::spawn(async move { l1.mark_completed(u, d).await });
  let b = tokio::spawn(async move { l2.mark_completed(u, d).await });
  let a = a.await.unwrap().unwrap();
  let b = b.await.unwrap().unwrap();

  assert_eq!(a.points_awarded + b.points_awarded, 20);
  assert!(a.already_completed ^ b.already_completed);
  assert_eq!(s.get_user(u).await.unwrap().unwrap().points, 20);
}

#[tokio::test]
async fn foreign_deadline_is_untouched() {
  let s = store().await;
  let l = ledger(s.clone(), date(2024, 4, 10));
  let owner = l
    .create_user(NewUser::new("Owner", "owner@example.com").unwrap())
    .await
    .unwrap()
    .user_id;
  let other = l
    .create_user(NewUser::new("Other", "other@example.com").unwrap())
    .await
    .unwrap()
    .user_id;
  let d = l
    .add_deadline(owner, deadline("mine", "2024-04-15", "High"))
    .await
    .unwrap()
    .deadline_id;

  let err = l.mark_completed(other, d).await.unwrap_err();
  assert!(matches!(err, tally_core::Error::DeadlineNotFound(_)));
  assert!(!s.list_deadlines(owner, None).await.unwrap()[0].completed);
  assert_eq!(s.get_user(other).await.unwrap().unwrap().points, 0);
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notified_flag_is_persisted() {
  let s = store().await;
  let today = date(2024, 4, 10);
  let l = ledger(s.clone(), today);
  let u = l
    .create_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap()
    .user_id;
  l.add_deadline(u, deadline("tomorrow", "2024-04-11", "Medium"))
    .await
    .unwrap();

  assert_eq!(l.due_tomorrow_notifications(u, today).await.unwrap().len(), 1);
  assert!(s.list_deadlines(u, None).await.unwrap()[0].notified);
  assert!(l.due_tomorrow_notifications(u, today).await.unwrap().is_empty());
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deadlines_sorted_and_filtered() {
  let s = store().await;
  let l = ledger(s.clone(), date(2024, 4, 10));
  let u = l
    .create_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap()
    .user_id;
  l.add_deadline(u, deadline("third", "2024-05-01", "Low")).await.unwrap();
  l.add_deadline(u, deadline("first", "2024-04-11", "High")).await.unwrap();
  l.add_deadline(u, deadline("second", "2024-04-20", "Low")).await.unwrap();

  let titles: Vec<_> = s
    .list_deadlines(u, None)
    .await
    .unwrap()
    .into_iter()
    .map(|d| d.title)
    .collect();
  assert_eq!(titles, ["first", "second", "third"]);

  let low = s.list_deadlines(u, Some(Priority::Low)).await.unwrap();
  assert_eq!(low.len(), 2);
  assert!(low.iter().all(|d| d.priority == Priority::Low));
}

#[tokio::test]
async fn history_newest_first() {
  let s = store().await;
  let u = s
    .add_user(NewUser::new("Ada", "ada@example.com").unwrap())
    .await
    .unwrap()
    .user_id;

  for (title, day) in [("older", date(2024, 1, 5)), ("newer", date(2024, 2, 5))] {
    s.transact(u, move |book| {
      let d = book.add_deadline(deadline(title, "2024-01-01", "Low"));
      book.mark_completed(d.deadline_id, day)
    })
    .await
    .unwrap();
  }

  let titles: Vec<_> = s
    .history(u)
    .await
    .unwrap()
    .into_iter()
    .map(|h| h.title)
    .collect();
  assert_eq!(titles, ["newer", "older"]);
}
