//! [`SqliteStore`] — the SQLite implementation of [`LedgerStore`].

use std::path::Path;

use rusqlite::{
  Connection, ErrorCode, OptionalExtension as _, TransactionBehavior,
};
use tally_core::{
  book::{Book, Mutation},
  deadline::{Deadline, HistoryRecord, Priority},
  store::LedgerStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    RawDeadline, RawHistory, RawUser, encode_date, encode_dt, encode_priority,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ledger store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Blocking helpers ────────────────────────────────────────────────────────
//
// These run on the connection thread, inside `Connection::call`.

fn select_user(conn: &Connection, user_id: Uuid) -> Result<Option<User>> {
  let raw = conn
    .query_row(
      &format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS),
      rusqlite::params![encode_uuid(user_id)],
      RawUser::from_row,
    )
    .optional()?;
  raw.map(RawUser::into_user).transpose()
}

fn insert_user(conn: &Connection, user: &User) -> Result<()> {
  let inserted = conn.execute(
    "INSERT INTO users (user_id, name, email, points, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      encode_uuid(user.user_id),
      user.name,
      user.email,
      i64::from(user.points),
      encode_dt(user.created_at),
    ],
  );
  match inserted {
    Ok(_) => Ok(()),
    Err(rusqlite::Error::SqliteFailure(e, _))
      if e.code == ErrorCode::ConstraintViolation =>
    {
      Err(tally_core::Error::EmailTaken(user.email.clone()).into())
    }
    Err(e) => Err(e.into()),
  }
}

fn select_deadlines(
  conn: &Connection,
  user_id: Uuid,
  priority: Option<Priority>,
) -> Result<Vec<Deadline>> {
  let sql = format!(
    "SELECT {} FROM deadlines
     WHERE user_id = ?1 AND (?2 IS NULL OR priority = ?2)
     ORDER BY due_date, created_at, rowid",
    RawDeadline::COLUMNS
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(
      rusqlite::params![encode_uuid(user_id), priority.map(encode_priority)],
      RawDeadline::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawDeadline::into_deadline).collect()
}

fn select_history(conn: &Connection, user_id: Uuid) -> Result<Vec<HistoryRecord>> {
  let sql = format!(
    "SELECT {} FROM history
     WHERE user_id = ?1
     ORDER BY completed_on DESC, rowid DESC",
    RawHistory::COLUMNS
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(rusqlite::params![encode_uuid(user_id)], RawHistory::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawHistory::into_record).collect()
}

/// Write one journal entry.
fn apply(conn: &Connection, user_id: Uuid, mutation: Mutation) -> Result<()> {
  let user_id_str = encode_uuid(user_id);
  match mutation {
    Mutation::InsertDeadline(d) => {
      conn.execute(
        "INSERT INTO deadlines (
           deadline_id, user_id, title, due_date, priority,
           completed, notified, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
          encode_uuid(d.deadline_id),
          user_id_str,
          d.title,
          encode_date(d.due_date),
          encode_priority(d.priority),
          d.completed,
          d.notified,
          encode_dt(d.created_at),
        ],
      )?;
    }
    Mutation::UpdateDeadline(d) => {
      conn.execute(
        "UPDATE deadlines SET completed = ?1, notified = ?2
         WHERE deadline_id = ?3 AND user_id = ?4",
        rusqlite::params![
          d.completed,
          d.notified,
          encode_uuid(d.deadline_id),
          user_id_str,
        ],
      )?;
    }
    Mutation::SetPoints(points) => {
      conn.execute(
        "UPDATE users SET points = ?1 WHERE user_id = ?2",
        rusqlite::params![i64::from(points), user_id_str],
      )?;
    }
    Mutation::Archive(records) => {
      let mut insert = conn.prepare(
        "INSERT INTO history (
           history_id, user_id, title, due_date, priority, completed_on
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      )?;
      for h in &records {
        insert.execute(rusqlite::params![
          encode_uuid(h.history_id),
          user_id_str,
          h.title,
          encode_date(h.due_date),
          encode_priority(h.priority),
          encode_date(h.completed_on),
        ])?;
      }
      conn.execute(
        "DELETE FROM deadlines WHERE user_id = ?1",
        rusqlite::params![user_id_str],
      )?;
    }
  }
  Ok(())
}

/// Load the book, run `f`, persist its journal. Any error drops the
/// transaction, which rolls it back.
fn run_transaction<T, F>(conn: &mut Connection, user_id: Uuid, f: F) -> Result<T>
where
  F: FnOnce(&mut Book) -> tally_core::Result<T>,
{
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let user =
    select_user(&tx, user_id)?.ok_or(tally_core::Error::UserNotFound(user_id))?;
  let active = select_deadlines(&tx, user_id, None)?;

  let mut book = Book::new(user, active);
  let out = f(&mut book)?;

  let (_, _, journal) = book.into_parts();
  for mutation in journal {
    apply(&tx, user_id, mutation)?;
  }
  tx.commit()?;
  Ok(out)
}

// ─── LedgerStore impl ────────────────────────────────────────────────────────

impl LedgerStore for SqliteStore {
  type Error = crate::Error;

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = input.into_user();
    let row = user.clone();
    self
      .conn
      .call(move |conn| Ok(insert_user(conn, &row)))
      .await??;
    Ok(user)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    self
      .conn
      .call(move |conn| Ok(select_user(conn, user_id)))
      .await?
  }

  async fn transact<T, F>(&self, user_id: Uuid, f: F) -> Result<T>
  where
    F: FnOnce(&mut Book) -> tally_core::Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| Ok(run_transaction(conn, user_id, f)))
      .await?
  }

  async fn list_deadlines(
    &self,
    user_id: Uuid,
    priority: Option<Priority>,
  ) -> Result<Vec<Deadline>> {
    self
      .conn
      .call(move |conn| Ok(select_deadlines(conn, user_id, priority)))
      .await?
  }

  async fn history(&self, user_id: Uuid) -> Result<Vec<HistoryRecord>> {
    self
      .conn
      .call(move |conn| Ok(select_history(conn, user_id)))
      .await?
  }
}
