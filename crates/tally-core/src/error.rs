//! Error types for `tally-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed command input: empty title, bad date, unknown priority.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  /// The deadline does not exist, or belongs to a different user.
  #[error("deadline not found: {0}")]
  DeadlineNotFound(Uuid),

  #[error("email already registered: {0}")]
  EmailTaken(String),

  /// A persistence failure. No partial mutation is visible when this is
  /// returned.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidInput(msg.into())
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::UserNotFound(_) | Self::DeadlineNotFound(_))
  }

  pub fn is_invalid_input(&self) -> bool {
    matches!(self, Self::InvalidInput(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
