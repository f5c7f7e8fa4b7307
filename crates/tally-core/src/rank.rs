//! The rank ladder.
//!
//! A rank is never stored or adjusted incrementally; it is always derived
//! from the user's current point total.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

/// A label earned by accumulating points, lowest first.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
)]
pub enum Rank {
  #[strum(serialize = "Unranked")]
  #[serde(rename = "Unranked")]
  Unranked,
  #[strum(serialize = "Bronze Beater")]
  #[serde(rename = "Bronze Beater")]
  BronzeBeater,
  #[strum(serialize = "Silver Stroker")]
  #[serde(rename = "Silver Stroker")]
  SilverStroker,
  #[strum(serialize = "Gold Gooner")]
  #[serde(rename = "Gold Gooner")]
  GoldGooner,
  #[strum(serialize = "Emerald Edger")]
  #[serde(rename = "Emerald Edger")]
  EmeraldEdger,
  #[strum(serialize = "Platinum Puller")]
  #[serde(rename = "Platinum Puller")]
  PlatinumPuller,
}

/// Thresholds checked highest first.
const LADDER: [(u32, Rank); 5] = [
  (500, Rank::PlatinumPuller),
  (400, Rank::EmeraldEdger),
  (200, Rank::GoldGooner),
  (100, Rank::SilverStroker),
  (50, Rank::BronzeBeater),
];

impl Rank {
  /// The rank for a point total.
  pub fn for_points(points: u32) -> Self {
    LADDER
      .iter()
      .find(|(threshold, _)| points >= *threshold)
      .map(|(_, rank)| *rank)
      .unwrap_or(Rank::Unranked)
  }

  /// The minimum number of points that earns this rank.
  pub fn threshold(self) -> u32 {
    LADDER
      .iter()
      .find(|(_, rank)| *rank == self)
      .map(|(threshold, _)| *threshold)
      .unwrap_or(0)
  }

  /// The rank directly above this one, if any.
  pub fn next(self) -> Option<Self> { Self::iter().find(|r| *r > self) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn boundaries_match_the_ladder() {
    assert_eq!(Rank::for_points(0), Rank::Unranked);
    assert_eq!(Rank::for_points(49), Rank::Unranked);
    assert_eq!(Rank::for_points(50), Rank::BronzeBeater);
    assert_eq!(Rank::for_points(99), Rank::BronzeBeater);
    assert_eq!(Rank::for_points(100), Rank::SilverStroker);
    assert_eq!(Rank::for_points(199), Rank::SilverStroker);
    assert_eq!(Rank::for_points(200), Rank::GoldGooner);
    assert_eq!(Rank::for_points(399), Rank::GoldGooner);
    assert_eq!(Rank::for_points(400), Rank::EmeraldEdger);
    assert_eq!(Rank::for_points(499), Rank::EmeraldEdger);
    assert_eq!(Rank::for_points(500), Rank::PlatinumPuller);
    assert_eq!(Rank::for_points(u32::MAX), Rank::PlatinumPuller);
  }

  #[test]
  fn monotonic_in_points() {
    let mut prev = Rank::for_points(0);
    for p in 1..=600 {
      let next = Rank::for_points(p);
      assert!(next >= prev, "rank dropped at {p} points");
      prev = next;
    }
  }

  #[test]
  fn threshold_is_the_first_point_total_with_that_rank() {
    for rank in Rank::iter() {
      assert_eq!(Rank::for_points(rank.threshold()), rank);
      if rank.threshold() > 0 {
        assert!(Rank::for_points(rank.threshold() - 1) < rank);
      }
    }
  }

  #[test]
  fn next_climbs_one_step() {
    assert_eq!(Rank::Unranked.next(), Some(Rank::BronzeBeater));
    assert_eq!(Rank::GoldGooner.next(), Some(Rank::EmeraldEdger));
    assert_eq!(Rank::PlatinumPuller.next(), None);
  }

  #[test]
  fn labels() {
    assert_eq!(Rank::BronzeBeater.to_string(), "Bronze Beater");
    assert_eq!("Platinum Puller".parse::<Rank>().unwrap(), Rank::PlatinumPuller);
    assert_eq!(
      serde_json::to_string(&Rank::GoldGooner).ok(),
      Some("\"Gold Gooner\"".to_string())
    );
  }
}
