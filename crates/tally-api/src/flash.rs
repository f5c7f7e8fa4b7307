//! Flash messages: levelled, user-facing one-liners attached to responses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Success,
  Info,
  Warning,
  Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
  pub level:   Level,
  pub message: String,
}

impl Flash {
  pub fn new(level: Level, message: impl Into<String>) -> Self {
    Self { level, message: message.into() }
  }

  pub fn success(message: impl Into<String>) -> Self {
    Self::new(Level::Success, message)
  }

  pub fn info(message: impl Into<String>) -> Self { Self::new(Level::Info, message) }

  pub fn warning(message: impl Into<String>) -> Self {
    Self::new(Level::Warning, message)
  }

  pub fn danger(message: impl Into<String>) -> Self {
    Self::new(Level::Danger, message)
  }
}

/// A response body with flashes alongside its fields.
#[derive(Debug, Clone, Serialize)]
pub struct Flashed<T> {
  #[serde(flatten)]
  pub body:    T,
  pub flashes: Vec<Flash>,
}

impl<T> Flashed<T> {
  pub fn new(body: T, flashes: Vec<Flash>) -> Self { Self { body, flashes } }
}
