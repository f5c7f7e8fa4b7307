//! Handlers for `/users/:id/deadlines` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/deadlines` | Optional `?priority=High\|Medium\|Low` |
//! | `POST` | `/users/:id/deadlines` | Body: [`AddBody`]; returns 201 + the deadline |
//! | `POST` | `/users/:id/deadlines/:deadline_id/complete` | Returns the [`MarkResult`] |
//!
//! Form fields arrive as plain text and are validated here, before the ledger
//! sees them.

use axum::{
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tally_core::{
  book::MarkResult,
  deadline::{NewDeadline, Priority},
  ledger::{Calendar, Ledger},
  store::LedgerStore,
};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Json, Path, Query},
  flash::{Flash, Flashed},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub priority: Option<String>,
}

/// `GET /users/:id/deadlines[?priority=<High|Medium|Low>]`
pub async fn list<S>(
  State(ledger): State<Ledger<S>>,
  Path(user_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Calendar>, ApiError>
where
  S: LedgerStore + 'static,
{
  let priority = match params.priority.as_deref().map(str::trim) {
    None | Some("") => None,
    Some(p) => Some(Priority::parse_field(Some(p))?),
  };
  Ok(Json(ledger.calendar(user_id, priority).await?))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

/// Raw form fields accepted by `POST /users/:id/deadlines`.
#[derive(Debug, Deserialize)]
pub struct AddBody {
  #[serde(default)]
  pub title:    String,
  /// `YYYY-MM-DD`.
  #[serde(default)]
  pub due_date: String,
  /// `High`, `Medium` or `Low`; defaults to `Medium`.
  pub priority: Option<String>,
}

/// `POST /users/:id/deadlines`
pub async fn add<S>(
  State(ledger): State<Ledger<S>>,
  Path(user_id): Path<Uuid>,
  Json(body): Json<AddBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore + 'static,
{
  let input = NewDeadline::from_fields(
    &body.title,
    &body.due_date,
    body.priority.as_deref(),
  )?;
  let deadline = ledger.add_deadline(user_id, input).await?;
  Ok((
    StatusCode::CREATED,
    Json(Flashed::new(deadline, vec![Flash::success(
      "Deadline added successfully!",
    )])),
  ))
}

// ─── Complete ─────────────────────────────────────────────────────────────────

/// `POST /users/:id/deadlines/:deadline_id/complete`
pub async fn complete<S>(
  State(ledger): State<Ledger<S>>,
  Path((user_id, deadline_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Flashed<MarkResult>>, ApiError>
where
  S: LedgerStore + 'static,
{
  let result = ledger.mark_completed(user_id, deadline_id).await?;
  let flashes = completion_flashes(&result);
  Ok(Json(Flashed::new(result, flashes)))
}

fn completion_flashes(result: &MarkResult) -> Vec<Flash> {
  let title = &result.deadline.title;
  if result.already_completed {
    return vec![Flash::info(format!("'{title}' was already completed."))];
  }

  let mut flashes = Vec::new();
  if result.archived.is_some() {
    flashes.push(Flash::success("All deadlines completed! Moved to history."));
  }
  if result.rank_changed() {
    flashes.push(Flash::success(format!("New rank: {}!", result.rank)));
  }
  flashes.push(Flash::success(format!(
    "'{title}' marked as completed! +{} points",
    result.points_awarded
  )));
  flashes
}
