//! Detailed breakdown of a locked Study round.
//!
//! Everything here is derived from the case and the stored snapshot; reasoning hits and misses
//! are re-evaluated from the saved explanation so the view can be rebuilt at any time.

use serde::Serialize;

use crate::domain::{Case, CaseOption, ReasoningCheck};
use crate::reasoning::{contains_any, evaluate_reasoning, FeedbackLine};
use crate::session::study::StudySnapshot;

const GENERIC_SUBOPTIMAL: &str =
  "This option lacks the specific clinical benefit needed for this patient's comorbidity profile.";

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningBreakdown {
  pub score: usize,
  pub low_quality: bool,
  pub priority_signal: String,
  pub hits: Vec<FeedbackLine>,
  pub misses: Vec<FeedbackLine>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
  pub case_id: u32,
  pub case_index: usize,
  pub total_cases: usize,
  pub patient_stem_short: String,
  pub is_correct: bool,
  pub correct_option: Option<CaseOption>,
  pub correct_display_label: String,
  pub selected_option: Option<CaseOption>,
  pub why_correct: Vec<String>,
  /// Why the chosen distractor is worse; absent when the answer was correct.
  pub suboptimal_rationale: Option<String>,
  pub focus_areas: Vec<String>,
  pub safety_notes: Vec<String>,
  pub takeaway: String,
  pub explanation: String,
  pub reasoning: ReasoningBreakdown,
  pub guidelines: Vec<String>,
}

fn comorbidity_text(case: &Case) -> String {
  case.comorbidities.join(" ").to_lowercase()
}

/// Clinical priorities implied by the patient profile.
pub fn focus_areas(case: &Case) -> Vec<String> {
  let comorb = comorbidity_text(case);
  let egfr = case.metrics.egfr_value();
  let bmi = case.metrics.bmi_value();
  let a1c = case.metrics.a1c_value();

  let mut out: Vec<String> = Vec::new();
  if contains_any(&comorb, &["heart failure", "hfref", "hfpef"]) {
    out.push("Prioritize cardiorenal protection over pure glycemic lowering.".into());
  }
  if contains_any(&comorb, &["ascvd", "mi", "cardiovascular"]) {
    out.push("Prioritize cardiovascular risk reduction (MACE benefit).".into());
  }
  if contains_any(&comorb, &["ckd", "kidney"]) || egfr.is_some_and(|v| v < 45.0) {
    out.push("Renal safety and kidney-protective agents take priority.".into());
  }
  if bmi.is_some_and(|v| v >= 30.0) {
    out.push("Weight management is a key therapeutic goal.".into());
  }
  if contains_any(&comorb, &["hypoglycemia", "frail"]) {
    out.push("Minimizing hypoglycemia risk is essential in this patient.".into());
  }
  if a1c.is_some_and(|v| v >= 10.0) {
    out.push("Glycemic urgency — rapid control needed (consider insulin).".into());
  }
  if out.is_empty() {
    out.push("Balance glycemic efficacy with side-effect profile for this patient.".into());
  }
  out
}

/// Avoid-list bullets plus contraindications implied by labs and comorbidities.
pub fn safety_notes(case: &Case) -> Vec<String> {
  let comorb = comorbidity_text(case);
  let mut out = case.avoid_list.clone();
  if case.metrics.egfr_value().is_some_and(|v| v < 30.0) {
    out.push("eGFR < 30: Metformin contraindicated; many agents need dose adjustment.".into());
  }
  if comorb.contains("heart failure") {
    out.push("Thiazolidinediones (TZDs) are contraindicated in heart failure (fluid retention).".into());
  }
  out
}

/// One-line teaching point, first matching profile wins.
pub fn takeaway(case: &Case) -> &'static str {
  let comorb = comorbidity_text(case);
  let bmi = case.metrics.bmi_value();
  let a1c = case.metrics.a1c_value();

  if comorb.contains("heart failure") {
    "In T2DM with heart failure, SGLT2 inhibitors are first-line add-on — they reduce HF hospitalization regardless of glycemic effect."
  } else if comorb.contains("ascvd") {
    "Established ASCVD in T2DM calls for GLP-1 RA or SGLT2i — choose agents with proven MACE reduction."
  } else if contains_any(&comorb, &["ckd", "kidney"]) {
    "In CKD, match agents to eGFR cutoffs — and prioritize kidney-protective drugs when albuminuria is present."
  } else if bmi.is_some_and(|v| v >= 35.0) {
    "With severe obesity, weight-lowering agents (GLP-1 RA, dual agonists) offer the greatest net clinical benefit."
  } else if a1c.is_some_and(|v| v >= 10.0) {
    "A1C ≥ 10% with symptoms = insulin first. Oral agents alone cannot close this gap quickly enough."
  } else if comorb.contains("hypoglycemia") {
    "When hypoglycemia is the problem, removing the offending agent matters more than adding a new one."
  } else {
    "Always let comorbidities — not A1C alone — drive medication choice in T2DM."
  }
}

pub fn build_breakdown(case: &Case, snapshot: &StudySnapshot, rubric: &[ReasoningCheck]) -> Breakdown {
  let reasoning = evaluate_reasoning(&snapshot.explanation, rubric);
  let suboptimal_rationale = if snapshot.is_correct {
    None
  } else {
    Some(
      case
        .incorrect_rationale
        .get(&snapshot.selected_id)
        .cloned()
        .unwrap_or_else(|| GENERIC_SUBOPTIMAL.to_string()),
    )
  };

  Breakdown {
    case_id: case.id,
    case_index: snapshot.case_index,
    total_cases: snapshot.total_cases,
    patient_stem_short: case.patient_stem_short.clone(),
    is_correct: snapshot.is_correct,
    correct_option: case.correct_option().cloned(),
    correct_display_label: snapshot.correct_display_label.clone(),
    selected_option: case.option(&snapshot.selected_id).cloned(),
    why_correct: case.why_correct.clone(),
    suboptimal_rationale,
    focus_areas: focus_areas(case),
    safety_notes: safety_notes(case),
    takeaway: takeaway(case).to_string(),
    explanation: snapshot.explanation.clone(),
    reasoning: ReasoningBreakdown {
      score: reasoning.score,
      low_quality: reasoning.low_quality,
      hits: reasoning.hit_feedback(),
      misses: reasoning.miss_feedback(),
      priority_signal: reasoning.priority_signal,
    },
    guidelines: case.guidelines.clone(),
  }
}
