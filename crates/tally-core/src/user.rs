//! Users — the owners of deadlines, points, and history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, rank::Rank};

/// An account. The rank is not stored; see [`User::rank`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  pub email:      String,
  pub points:     u32,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn rank(&self) -> Rank { Rank::for_points(self.points) }

  pub fn summary(&self) -> UserSummary {
    UserSummary {
      user_id:      self.user_id,
      name:         self.name.clone(),
      points:       self.points,
      rank:         self.rank(),
      next_rank_at: self.rank().next().map(Rank::threshold),
    }
  }
}

/// Read model returned to callers: a user with its derived rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub user_id:      Uuid,
  pub name:         String,
  pub points:       u32,
  pub rank:         Rank,
  /// Points needed for the next rank; `None` at the top of the ladder.
  pub next_rank_at: Option<u32>,
}

/// Input to [`crate::store::LedgerStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  name:  String,
  email: String,
}

impl NewUser {
  pub fn new(name: &str, email: &str) -> Result<Self> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() {
      return Err(Error::invalid("name and email are required"));
    }
    Ok(Self { name: name.to_owned(), email: email.to_owned() })
  }

  pub fn email(&self) -> &str { &self.email }

  pub fn into_user(self) -> User {
    User {
      user_id:    Uuid::new_v4(),
      name:       self.name,
      email:      self.email,
      points:     0,
      created_at: Utc::now(),
    }
  }
}
