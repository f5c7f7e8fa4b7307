//! JSON REST API for Tally.
//!
//! Exposes an axum [`Router`] backed by a [`Ledger`] over any
//! [`tally_core::store::LedgerStore`]. The user is taken from the path; auth,
//! TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(ledger.clone()))
//! ```

pub mod dashboard;
pub mod deadlines;
pub mod error;
pub mod extract;
pub mod flash;
pub mod users;

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::{ledger::Ledger, store::LedgerStore};

pub use error::ApiError;
pub use flash::{Flash, Flashed, Level};

/// Build a fully-materialised API router for `ledger`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(ledger: Ledger<S>) -> Router<()>
where
  S: LedgerStore + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::create::<S>))
    .route("/users/{user_id}", get(users::get_one::<S>))
    // Deadlines
    .route(
      "/users/{user_id}/deadlines",
      get(deadlines::list::<S>).post(deadlines::add::<S>),
    )
    .route(
      "/users/{user_id}/deadlines/{deadline_id}/complete",
      post(deadlines::complete::<S>),
    )
    // Views
    .route("/users/{user_id}/dashboard", get(dashboard::dashboard::<S>))
    .route("/users/{user_id}/history", get(dashboard::history::<S>))
    .with_state(ledger)
}

// ─── Integration tests ────────────────────────────────────────────────────────
