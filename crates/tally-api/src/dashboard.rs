//! Handlers for the dashboard and history views.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/dashboard` | Optional `?today=YYYY-MM-DD`; defaults to the server's date |
//! | `GET`  | `/users/:id/history` | Newest first |

use axum::extract::State;
use serde::Deserialize;
use tally_core::{
  deadline::{HistoryRecord, parse_due_date},
  ledger::{Dashboard, Ledger},
  store::LedgerStore,
};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Json, Path, Query},
  flash::{Flash, Flashed},
};

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
  pub today: Option<String>,
}

/// `GET /users/:id/dashboard[?today=YYYY-MM-DD]`
///
/// Raises due-tomorrow reminders; each deadline is reminded about once.
pub async fn dashboard<S>(
  State(ledger): State<Ledger<S>>,
  Path(user_id): Path<Uuid>,
  Query(params): Query<DashboardParams>,
) -> Result<Json<Flashed<Dashboard>>, ApiError>
where
  S: LedgerStore + 'static,
{
  let today = match params.today.as_deref() {
    Some(raw) => parse_due_date(raw)?,
    None => ledger.today(),
  };
  let dashboard = ledger.dashboard(user_id, today).await?;

  let flashes = if dashboard.notifications.is_empty() {
    Vec::new()
  } else {
    vec![Flash::warning(
      "Reminder: You have deadlines due tomorrow! Check your calendar.",
    )]
  };
  Ok(Json(Flashed::new(dashboard, flashes)))
}

/// `GET /users/:id/history`
pub async fn history<S>(
  State(ledger): State<Ledger<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<HistoryRecord>>, ApiError>
where
  S: LedgerStore + 'static,
{
  Ok(Json(ledger.history(user_id).await?))
}
