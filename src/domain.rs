//! Domain models used by the backend: clinical cases, answer options, reasoning rubric entries,
//! and the small enums shared by both play modes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Display labels available for answer options ("A".."H").
pub const DISPLAY_LABELS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

pub const MIN_OPTIONS: usize = 3;
pub const MAX_OPTIONS: usize = DISPLAY_LABELS.len();

/// Lab-like values as shown on the patient card ("8.2%", "75 mL/min", "34 kg/m²").
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
  pub a1c: String,
  pub egfr: String,
  pub bmi: String,
}

impl Metrics {
  pub fn a1c_value(&self) -> Option<f64> { leading_number(&self.a1c) }
  pub fn egfr_value(&self) -> Option<f64> { leading_number(&self.egfr) }
  pub fn bmi_value(&self) -> Option<f64> { leading_number(&self.bmi) }
}

/// Parse the numeric prefix of a display string: "8.2%" -> 8.2, "75 mL/min" -> 75.
/// Leading whitespace is skipped; no digits at all yields `None`.
pub fn leading_number(raw: &str) -> Option<f64> {
  let s = raw.trim_start();
  let mut end = 0;
  let mut seen_dot = false;
  for (i, ch) in s.char_indices() {
    match ch {
      '0'..='9' => end = i + 1,
      '-' | '+' if i == 0 => {}
      '.' if !seen_dot => seen_dot = true,
      _ => break,
    }
  }
  s[..end].parse::<f64>().ok()
}

/// One selectable answer as authored in the case bank.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseOption {
  pub id: String,
  pub label: String,
}

/// A fixed patient vignette with its answer key and teaching material.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Case {
  pub id: u32,
  pub patient_stem_short: String,
  #[serde(default)] pub background_country: Option<String>,
  #[serde(default)] pub background_flag: Option<String>,
  pub metrics: Metrics,
  #[serde(default)] pub comorbidities: Vec<String>,
  #[serde(default)] pub current_meds: Vec<String>,
  pub options: Vec<CaseOption>,
  pub correct_option_id: String,
  #[serde(default)] pub why_correct: Vec<String>,
  #[serde(default)] pub avoid_list: Vec<String>,
  #[serde(default)] pub guidelines: Vec<String>,
  /// Per-distractor note on why that option is suboptimal.
  #[serde(default)] pub incorrect_rationale: BTreeMap<String, String>,
}

impl Case {
  pub fn option(&self, id: &str) -> Option<&CaseOption> {
    self.options.iter().find(|o| o.id == id)
  }

  pub fn correct_option(&self) -> Option<&CaseOption> {
    self.option(&self.correct_option_id)
  }

  pub fn is_correct(&self, option_id: &str) -> bool {
    self.correct_option_id == option_id
  }

  /// Check the bank invariants: 3..=8 options, unique ids, exactly one correct option.
  pub fn validate(&self) -> Result<(), TrainerError> {
    let invalid = |reason: String| TrainerError::InvalidCase { case_id: self.id, reason };

    if self.options.len() < MIN_OPTIONS || self.options.len() > MAX_OPTIONS {
      return Err(invalid(format!(
        "expected {}..={} options, found {}",
        MIN_OPTIONS,
        MAX_OPTIONS,
        self.options.len()
      )));
    }
    for (i, opt) in self.options.iter().enumerate() {
      if self.options[..i].iter().any(|o| o.id == opt.id) {
        return Err(invalid(format!("duplicate option id '{}'", opt.id)));
      }
    }
    if self.correct_option().is_none() {
      return Err(invalid(format!(
        "correct option '{}' is not among the options",
        self.correct_option_id
      )));
    }
    Ok(())
  }
}

/// Rubric entry used to grade free-text reasoning for one case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReasoningCheck {
  pub label: String,
  pub keywords: Vec<String>,
  pub hit_feedback: String,
  pub miss_feedback: String,
}

/// Confidence wager declared before a Versus answer is revealed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
  Low,
  Medium,
  High,
}

impl std::str::FromStr for Confidence {
  type Err = TrainerError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "low" => Ok(Confidence::Low),
      "medium" => Ok(Confidence::Medium),
      "high" => Ok(Confidence::High),
      other => Err(TrainerError::InvalidConfidence(other.to_string())),
    }
  }
}

/// UI theme preference; anything but "light" reads as dark.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
  Light,
  #[default]
  Dark,
}

impl Theme {
  pub fn as_str(&self) -> &'static str {
    match self {
      Theme::Light => "light",
      Theme::Dark => "dark",
    }
  }

  pub fn parse_lenient(raw: &str) -> Self {
    if raw == "light" { Theme::Light } else { Theme::Dark }
  }
}
