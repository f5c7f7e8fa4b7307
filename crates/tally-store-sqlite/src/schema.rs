//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout so later releases can detect it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    points      INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0),
    created_at  TEXT NOT NULL
);

-- The active set. Rows are deleted only by a whole-set archive.
CREATE TABLE IF NOT EXISTS deadlines (
    deadline_id TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    title       TEXT NOT NULL CHECK (title != ''),
    due_date    TEXT NOT NULL,               -- YYYY-MM-DD
    priority    TEXT NOT NULL DEFAULT 'Medium',
    completed   INTEGER NOT NULL DEFAULT 0,
    notified    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

-- Append-only snapshots of archived deadlines.
CREATE TABLE IF NOT EXISTS history (
    history_id   TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    title        TEXT NOT NULL,
    due_date     TEXT NOT NULL,
    priority     TEXT NOT NULL,
    completed_on TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS deadlines_user_idx ON deadlines(user_id, due_date);
CREATE INDEX IF NOT EXISTS history_user_idx   ON history(user_id, completed_on);

PRAGMA user_version = 1;
";
