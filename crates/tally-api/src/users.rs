//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: `{"name":"...","email":"..."}`; 409 if the email is taken |
//! | `GET`  | `/users/:id` | Points and rank; 404 if not found |

use axum::{
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tally_core::{
  ledger::Ledger,
  store::LedgerStore,
  user::{NewUser, UserSummary},
};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{Json, Path},
  flash::{Flash, Flashed},
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub name:  String,
  #[serde(default)]
  pub email: String,
}

/// `POST /users` — returns 201 + the new user's summary.
pub async fn create<S>(
  State(ledger): State<Ledger<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LedgerStore + 'static,
{
  let input = NewUser::new(&body.name, &body.email)
    .map_err(|_| ApiError::BadRequest("All fields are required!".to_string()))?;
  let user = ledger.create_user(input).await?;
  Ok((
    StatusCode::CREATED,
    Json(Flashed::new(user.summary(), vec![Flash::success(
      "Sign-up successful!",
    )])),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(ledger): State<Ledger<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<UserSummary>, ApiError>
where
  S: LedgerStore + 'static,
{
  Ok(Json(ledger.user(user_id).await?))
}
