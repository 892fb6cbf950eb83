//! Reward policies for both play modes.
//!
//! Study blends correctness with the reasoning hit count and floors the currency at zero.
//! Versus pays out a fixed confidence-wager table and has no floor.

use crate::domain::Confidence;

const STUDY_CORRECT: i64 = 2;
const STUDY_INCORRECT: i64 = -4;
const ZERO_EFFORT_PENALTY: i64 = 1;

fn reasoning_bonus(hit_count: usize) -> i64 {
  match hit_count {
    0 | 1 => 0,
    2 => 1,
    _ => 2,
  }
}

/// Points awarded for one Study round.
pub fn study_delta(correct: bool, hit_count: usize) -> i64 {
  let base = if correct { STUDY_CORRECT } else { STUDY_INCORRECT };
  let penalty = if hit_count == 0 { ZERO_EFFORT_PENALTY } else { 0 };
  base + reasoning_bonus(hit_count) - penalty
}

/// New currency balance after a Study round, never below zero.
pub fn apply_study_delta(currency: i64, correct: bool, hit_count: usize) -> i64 {
  currency.saturating_add(study_delta(correct, hit_count)).max(0)
}

impl Confidence {
  /// `(correct, incorrect)` payoff for this wager.
  pub fn payoff(self) -> (i64, i64) {
    match self {
      Confidence::Low => (0, 0),
      Confidence::Medium => (1, -1),
      Confidence::High => (2, -2),
    }
  }
}

/// Signed points for one Versus round.
pub fn versus_delta(confidence: Confidence, correct: bool) -> i64 {
  let (win, loss) = confidence.payoff();
  if correct { win } else { loss }
}

/// "+4" / "-5" / "0" as shown next to the balance.
pub fn format_delta(delta: i64) -> String {
  if delta > 0 { format!("+{delta}") } else { delta.to_string() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn versus_payoff_table_is_exact() {
    assert_eq!(versus_delta(Confidence::High, true), 2);
    assert_eq!(versus_delta(Confidence::High, false), -2);
    assert_eq!(versus_delta(Confidence::Medium, true), 1);
    assert_eq!(versus_delta(Confidence::Medium, false), -1);
    assert_eq!(versus_delta(Confidence::Low, true), 0);
    assert_eq!(versus_delta(Confidence::Low, false), 0);
  }

  #[test]
  fn study_delta_table() {
    assert_eq!(study_delta(true, 0), 1);
    assert_eq!(study_delta(true, 1), 2);
    assert_eq!(study_delta(true, 2), 3);
    assert_eq!(study_delta(true, 3), 4);
    assert_eq!(study_delta(true, 4), 4);
    assert_eq!(study_delta(false, 0), -5);
    assert_eq!(study_delta(false, 1), -4);
    assert_eq!(study_delta(false, 2), -3);
    assert_eq!(study_delta(false, 4), -2);
  }

  #[test]
  fn correct_with_strong_reasoning_from_fifty() {
    assert_eq!(apply_study_delta(50, true, 3), 54);
  }

  #[test]
  fn incorrect_without_reasoning_from_ten() {
    assert_eq!(apply_study_delta(10, false, 0), 5);
  }

  #[test]
  fn currency_never_goes_negative() {
    let mut currency = 7;
    for _ in 0..50 {
      currency = apply_study_delta(currency, false, 0);
      assert!(currency >= 0);
    }
    assert_eq!(currency, 0);
    assert_eq!(apply_study_delta(0, true, 3), 4);
  }

  #[test]
  fn currency_has_no_ceiling() {
    let mut currency = 0;
    for _ in 0..1000 {
      currency = apply_study_delta(currency, true, 4);
    }
    assert_eq!(currency, 4000);
  }

  #[test]
  fn delta_text() {
    assert_eq!(format_delta(4), "+4");
    assert_eq!(format_delta(-5), "-5");
    assert_eq!(format_delta(0), "0");
  }
}
