//! Keyword-rubric evaluation of free-text reasoning.
//!
//! Matching is plain case-insensitive substring containment: a keyword "hf" also matches
//! inside "shfit". The reward tables are tuned against this loose behaviour, so tightening it
//! to word boundaries changes scoring for users.

use serde::{Deserialize, Serialize};

use crate::domain::ReasoningCheck;

/// Reward tables only define reasoning bonuses for 0..=4 hits.
pub const MAX_REASONING_SCORE: usize = 4;
/// Fewer hits than this flags the explanation as low quality.
pub const LOW_QUALITY_THRESHOLD: usize = 2;

const CARDIOVASCULAR: &[&str] = &["cardiovascular", "heart failure", "cardio", "ascvd", "mace"];
const GLYCEMIC: &[&str] = &["glycemic", "a1c", "glucose", "hyperglycemia", "insulin"];
const CARDIORENAL: &[&str] = &[
  "cardiovascular",
  "heart failure",
  "cardio",
  "ascvd",
  "renal",
  "kidney",
  "ckd",
];
const SAFETY: &[&str] = &["contraindic", "risk", "avoid"];

const CV_CLAUSE: &str = "You prioritized cardiovascular outcomes";
const GLYCEMIC_CLAUSE: &str = "You prioritized glycemic control over long-term outcomes";
const SAFETY_CLAUSE: &str = "safety considerations were deprioritized";

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningResult {
  pub hits: Vec<ReasoningCheck>,
  pub misses: Vec<ReasoningCheck>,
  pub score: usize,
  pub low_quality: bool,
  /// Empty when nothing noteworthy was detected.
  pub priority_signal: String,
}

/// "label: feedback" pair rendered in result and breakdown views.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackLine {
  pub label: String,
  pub feedback: String,
}

impl ReasoningResult {
  pub fn hit_count(&self) -> usize {
    self.hits.len()
  }

  pub fn hit_feedback(&self) -> Vec<FeedbackLine> {
    self
      .hits
      .iter()
      .map(|c| FeedbackLine { label: c.label.clone(), feedback: c.hit_feedback.clone() })
      .collect()
  }

  pub fn miss_feedback(&self) -> Vec<FeedbackLine> {
    self
      .misses
      .iter()
      .map(|c| FeedbackLine { label: c.label.clone(), feedback: c.miss_feedback.clone() })
      .collect()
  }
}

/// True if any needle occurs in `haystack`. Both sides are expected to be lower-cased already.
pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
  needles.iter().any(|n| haystack.contains(n))
}

fn is_hit(normalized: &str, check: &ReasoningCheck) -> bool {
  check
    .keywords
    .iter()
    .any(|k| normalized.contains(k.to_lowercase().as_str()))
}

fn pool(checks: &[ReasoningCheck]) -> String {
  checks
    .iter()
    .flat_map(|c| std::iter::once(c.label.as_str()).chain(c.keywords.iter().map(String::as_str)))
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

fn priority_signal(hits: &[ReasoningCheck], misses: &[ReasoningCheck]) -> String {
  let hit_pool = pool(hits);
  let miss_pool = pool(misses);

  let focus = if contains_any(&hit_pool, CARDIOVASCULAR) {
    Some(CV_CLAUSE)
  } else if contains_any(&hit_pool, GLYCEMIC) && contains_any(&miss_pool, CARDIORENAL) {
    Some(GLYCEMIC_CLAUSE)
  } else {
    None
  };
  let safety_missed = contains_any(&miss_pool, SAFETY);

  match (focus, safety_missed) {
    (Some(f), true) => format!("{f} — {SAFETY_CLAUSE}"),
    (Some(f), false) => f.to_string(),
    (None, true) => {
      let mut chars = SAFETY_CLAUSE.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
      }
    }
    (None, false) => String::new(),
  }
}

/// Partition the rubric into hits and misses for `text` and derive score, quality flag and
/// priority signal. Pure: the same `(text, rubric)` always yields the same result.
pub fn evaluate_reasoning(text: &str, rubric: &[ReasoningCheck]) -> ReasoningResult {
  let normalized = text.to_lowercase();
  let (hits, misses): (Vec<ReasoningCheck>, Vec<ReasoningCheck>) =
    rubric.iter().cloned().partition(|c| is_hit(&normalized, c));

  let priority_signal = priority_signal(&hits, &misses);
  ReasoningResult {
    score: hits.len().min(MAX_REASONING_SCORE),
    low_quality: hits.len() < LOW_QUALITY_THRESHOLD,
    hits,
    misses,
    priority_signal,
  }
}
