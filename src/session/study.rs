//! Study mode: one player walks the case bank in order, explains each choice in free text, and
//! earns or loses currency according to correctness and reasoning quality.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Case;
use crate::error::TrainerError;
use crate::reasoning::{evaluate_reasoning, FeedbackLine};
use crate::repository::CaseRepository;
use crate::scoring::{apply_study_delta, study_delta};
use crate::shuffle::{shuffle_options, STUDY_MODE};

pub const DEFAULT_MIN_EXPLANATION_CHARS: usize = 200;
pub const DEFAULT_STARTING_CURRENCY: i64 = 50;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StudyPhase {
  Unanswered,
  Selected,
  Explaining,
  Locked,
  Finished,
}

/// Everything needed to regenerate the breakdown view for a locked round.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudySnapshot {
  pub case_id: u32,
  pub case_index: usize,
  pub total_cases: usize,
  pub selected_id: String,
  pub is_correct: bool,
  pub explanation: String,
  pub correct_display_label: String,
  pub reasoning_score: usize,
  pub low_quality: bool,
  pub priority_signal: String,
  pub hits: Vec<FeedbackLine>,
  pub misses: Vec<FeedbackLine>,
  pub delta: i64,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudySummary {
  pub correct: usize,
  pub total: usize,
  pub percent: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudySession {
  pub id: Uuid,
  total_cases: usize,
  current_index: usize,
  selected_id: Option<String>,
  explanation: String,
  locked: bool,
  results: Vec<bool>,
  finished: bool,
  currency: i64,
  last_snapshot: Option<StudySnapshot>,
}

impl StudySession {
  pub fn new(id: Uuid, total_cases: usize, currency: i64) -> Self {
    Self {
      id,
      total_cases,
      current_index: 0,
      selected_id: None,
      explanation: String::new(),
      locked: false,
      results: Vec::new(),
      finished: false,
      currency: currency.max(0),
      last_snapshot: None,
    }
  }

  pub fn current_index(&self) -> usize { self.current_index }
  pub fn total_cases(&self) -> usize { self.total_cases }
  pub fn selected_id(&self) -> Option<&str> { self.selected_id.as_deref() }
  pub fn explanation(&self) -> &str { &self.explanation }
  pub fn currency(&self) -> i64 { self.currency }
  pub fn results(&self) -> &[bool] { &self.results }
  pub fn is_finished(&self) -> bool { self.finished }
  pub fn last_snapshot(&self) -> Option<&StudySnapshot> { self.last_snapshot.as_ref() }

  pub fn phase(&self) -> StudyPhase {
    if self.finished {
      StudyPhase::Finished
    } else if self.locked {
      StudyPhase::Locked
    } else if self.selected_id.is_none() {
      StudyPhase::Unanswered
    } else if self.explanation.is_empty() {
      StudyPhase::Selected
    } else {
      StudyPhase::Explaining
    }
  }

  /// A round is in progress: the shell should confirm before leaving.
  pub fn round_active(&self) -> bool {
    !self.finished && !self.locked && self.selected_id.is_some()
  }

  /// Cases answered so far, counting the current one once it is locked.
  pub fn progress(&self) -> usize {
    if self.finished {
      self.total_cases
    } else {
      self.current_index + usize::from(self.locked)
    }
  }

  pub fn current_case<'a>(&self, repo: &'a CaseRepository) -> Result<&'a Case, TrainerError> {
    repo.cycled(self.current_index)
  }

  fn ensure_open(&self) -> Result<(), TrainerError> {
    if self.finished {
      return Err(TrainerError::SessionFinished);
    }
    if self.locked {
      return Err(TrainerError::RoundLocked);
    }
    Ok(())
  }

  pub fn select(&mut self, repo: &CaseRepository, option_id: &str) -> Result<(), TrainerError> {
    self.ensure_open()?;
    let case = self.current_case(repo)?;
    if case.option(option_id).is_none() {
      return Err(TrainerError::UnknownOption { case_id: case.id, option_id: option_id.to_string() });
    }
    self.selected_id = Some(option_id.to_string());
    Ok(())
  }

  pub fn explain(&mut self, text: &str) -> Result<(), TrainerError> {
    self.ensure_open()?;
    if self.selected_id.is_none() {
      return Err(TrainerError::SelectionRequired);
    }
    self.explanation = text.to_string();
    Ok(())
  }

  /// Lock the answer: evaluate the explanation, score the round and record a snapshot.
  pub fn lock(&mut self, repo: &CaseRepository, min_chars: usize) -> Result<StudySnapshot, TrainerError> {
    self.ensure_open()?;
    let selected = self.selected_id.clone().ok_or(TrainerError::SelectionRequired)?;
    let actual = self.explanation.chars().count();
    if actual < min_chars {
      return Err(TrainerError::ExplanationTooShort { required: min_chars, actual });
    }

    let case = self.current_case(repo)?;
    let shuffled = shuffle_options(case, STUDY_MODE)?;
    let reasoning = evaluate_reasoning(&self.explanation, repo.rubric(case.id));
    let is_correct = case.is_correct(&selected);
    let delta = study_delta(is_correct, reasoning.hit_count());

    let snapshot = StudySnapshot {
      case_id: case.id,
      case_index: self.current_index,
      total_cases: self.total_cases,
      selected_id: selected,
      is_correct,
      explanation: self.explanation.clone(),
      correct_display_label: shuffled.correct_display_label,
      reasoning_score: reasoning.score,
      low_quality: reasoning.low_quality,
      priority_signal: reasoning.priority_signal.clone(),
      hits: reasoning.hit_feedback(),
      misses: reasoning.miss_feedback(),
      delta,
    };

    self.currency = apply_study_delta(self.currency, is_correct, reasoning.hit_count());
    self.results.push(is_correct);
    self.locked = true;
    self.last_snapshot = Some(snapshot.clone());
    Ok(snapshot)
  }

  /// Advance to the next case, or finish after the last one.
  pub fn next(&mut self) -> Result<(), TrainerError> {
    if self.finished {
      return Err(TrainerError::SessionFinished);
    }
    if !self.locked {
      return Err(TrainerError::RoundNotLocked);
    }
    if self.current_index + 1 >= self.total_cases {
      self.finished = true;
    } else {
      self.current_index += 1;
    }
    self.selected_id = None;
    self.explanation.clear();
    self.locked = false;
    Ok(())
  }

  /// Back to the first case. Currency is kept.
  pub fn restart(&mut self) {
    self.current_index = 0;
    self.selected_id = None;
    self.explanation.clear();
    self.locked = false;
    self.results.clear();
    self.finished = false;
    self.last_snapshot = None;
  }

  pub fn summary(&self) -> StudySummary {
    let correct = self.results.iter().filter(|r| **r).count();
    let percent = if self.total_cases == 0 {
      0
    } else {
      ((correct as f64 / self.total_cases as f64) * 100.0).round() as u32
    };
    StudySummary { correct, total: self.total_cases, percent }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::{seed_cases, seed_rubrics};

  const FILLER: &str = " I would start this agent today and review the patient again at the next visit with repeat labs.";

  fn repo() -> CaseRepository {
    CaseRepository::new(seed_cases(), seed_rubrics())
  }

  fn padded(text: &str) -> String {
    let mut out = text.to_string();
    while out.chars().count() < DEFAULT_MIN_EXPLANATION_CHARS {
      out.push_str(FILLER);
    }
    out
  }

  fn session(repo: &CaseRepository, currency: i64) -> StudySession {
    StudySession::new(Uuid::new_v4(), repo.len(), currency)
  }

  #[test]
  fn correct_answer_with_strong_reasoning() {
    let repo = repo();
    let mut s = session(&repo, 50);
    s.select(&repo, "A").unwrap();
    s.explain(&padded(
      "Heart failure with reduced EF makes an SGLT2 inhibitor the best add-on because of its cardiovascular benefit.",
    ))
    .unwrap();
    let snap = s.lock(&repo, DEFAULT_MIN_EXPLANATION_CHARS).unwrap();

    assert!(snap.is_correct);
    assert_eq!(snap.reasoning_score, 3);
    assert_eq!(snap.delta, 4);
    assert_eq!(s.currency(), 54);
    assert_eq!(
      snap.priority_signal,
      "You prioritized cardiovascular outcomes — safety considerations were deprioritized"
    );
    assert_eq!(s.phase(), StudyPhase::Locked);
  }

  #[test]
  fn incorrect_answer_without_reasoning() {
    let repo = repo();
    let mut s = session(&repo, 10);
    s.select(&repo, "B").unwrap();
    s.explain(&padded("I picked glipizide because it lowers sugar quickly and is cheap.")).unwrap();
    let snap = s.lock(&repo, DEFAULT_MIN_EXPLANATION_CHARS).unwrap();

    assert!(!snap.is_correct);
    assert_eq!(snap.reasoning_score, 0);
    assert_eq!(snap.delta, -5);
    assert_eq!(s.currency(), 5);
  }

  #[test]
  fn currency_is_floored_over_a_long_losing_run() {
    let repo = repo();
    let mut s = session(&repo, 3);
    for _ in 0..repo.len() {
      let wrong = {
        let case = s.current_case(&repo).unwrap();
        case.options.iter().find(|o| o.id != case.correct_option_id).unwrap().id.clone()
      };
      s.select(&repo, &wrong).unwrap();
      s.explain(&padded("no idea")).unwrap();
      s.lock(&repo, DEFAULT_MIN_EXPLANATION_CHARS).unwrap();
      assert!(s.currency() >= 0);
      s.next().unwrap();
    }
    assert_eq!(s.currency(), 0);
    assert!(s.is_finished());
  }

  #[test]
  fn phases_follow_the_round() {
    let repo = repo();
    let mut s = session(&repo, 50);
    assert_eq!(s.phase(), StudyPhase::Unanswered);
    assert!(!s.round_active());
    s.select(&repo, "C").unwrap();
    assert_eq!(s.phase(), StudyPhase::Selected);
    assert!(s.round_active());
    s.explain("thinking").unwrap();
    assert_eq!(s.phase(), StudyPhase::Explaining);
    s.select(&repo, "A").unwrap();
    assert_eq!(s.selected_id(), Some("A"));
  }

  #[test]
  fn lock_requires_selection_and_length() {
    let repo = repo();
    let mut s = session(&repo, 50);
    assert!(matches!(s.explain("x"), Err(TrainerError::SelectionRequired)));
    assert!(matches!(s.lock(&repo, 10), Err(TrainerError::SelectionRequired)));
    s.select(&repo, "A").unwrap();
    s.explain("too short").unwrap();
    assert!(matches!(
      s.lock(&repo, DEFAULT_MIN_EXPLANATION_CHARS),
      Err(TrainerError::ExplanationTooShort { required: 200, actual: 9 })
    ));
    assert_eq!(s.currency(), 50);
  }

  #[test]
  fn locked_round_cannot_be_changed() {
    let repo = repo();
    let mut s = session(&repo, 50);
    s.select(&repo, "A").unwrap();
    s.explain(&padded("sglt2")).unwrap();
    s.lock(&repo, DEFAULT_MIN_EXPLANATION_CHARS).unwrap();
    assert!(matches!(s.select(&repo, "B"), Err(TrainerError::RoundLocked)));
    assert!(matches!(s.explain("edit"), Err(TrainerError::RoundLocked)));
    assert!(matches!(s.lock(&repo, 0), Err(TrainerError::RoundLocked)));
    assert!(!s.round_active());
  }

  #[test]
  fn unknown_option_is_rejected() {
    let repo = repo();
    let mut s = session(&repo, 50);
    assert!(matches!(s.select(&repo, "Z"), Err(TrainerError::UnknownOption { case_id: 1, .. })));
  }

  #[test]
  fn next_requires_lock_and_resets_round() {
    let repo = repo();
    let mut s = session(&repo, 50);
    assert!(matches!(s.next(), Err(TrainerError::RoundNotLocked)));
    s.select(&repo, "A").unwrap();
    s.explain(&padded("heart failure")).unwrap();
    s.lock(&repo, DEFAULT_MIN_EXPLANATION_CHARS).unwrap();
    assert_eq!(s.progress(), 1);
    s.next().unwrap();
    assert_eq!(s.current_index(), 1);
    assert_eq!(s.phase(), StudyPhase::Unanswered);
    assert_eq!(s.explanation(), "");
    assert_eq!(s.current_case(&repo).unwrap().id, 2);
  }

  #[test]
  fn summary_and_restart() {
    let repo = repo();
    let mut s = session(&repo, 50);
    for _ in 0..repo.len() {
      let correct = s.current_case(&repo).unwrap().correct_option_id.clone();
      s.select(&repo, &correct).unwrap();
      s.explain(&padded("reasoning")).unwrap();
      s.lock(&repo, DEFAULT_MIN_EXPLANATION_CHARS).unwrap();
      s.next().unwrap();
    }
    assert_eq!(s.phase(), StudyPhase::Finished);
    assert_eq!(s.summary(), StudySummary { correct: 10, total: 10, percent: 100 });
    assert!(matches!(s.next(), Err(TrainerError::SessionFinished)));

    let earned = s.currency();
    s.restart();
    assert_eq!(s.current_index(), 0);
    assert!(s.results().is_empty());
    assert_eq!(s.currency(), earned);
    assert_eq!(s.summary().percent, 0);
  }

  #[test]
  fn session_survives_json_roundtrip() {
    let repo = repo();
    let mut s = session(&repo, 50);
    s.select(&repo, "A").unwrap();
    s.explain("partial").unwrap();
    let raw = serde_json::to_string(&s).unwrap();
    let back: StudySession = serde_json::from_str(&raw).unwrap();
    assert_eq!(back.selected_id(), Some("A"));
    assert_eq!(back.explanation(), "partial");
    assert_eq!(back.phase(), StudyPhase::Explaining);
  }
}
