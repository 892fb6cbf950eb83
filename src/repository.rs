//! Read-only case repository: ordered cases plus their reasoning rubrics.

use std::collections::HashMap;

use tracing::{error, info};

use crate::domain::{Case, ReasoningCheck};
use crate::error::TrainerError;

#[derive(Clone, Debug, Default)]
pub struct CaseRepository {
  cases: Vec<Case>,
  rubrics: HashMap<u32, Vec<ReasoningCheck>>,
}

impl CaseRepository {
  /// Build from cases in display order. Invalid cases and duplicate ids are skipped.
  pub fn new(cases: Vec<Case>, rubrics: HashMap<u32, Vec<ReasoningCheck>>) -> Self {
    let mut kept: Vec<Case> = Vec::with_capacity(cases.len());
    for case in cases {
      if let Err(e) = case.validate() {
        error!(target: "trainer_backend", case_id = case.id, error = %e, "Skipping invalid case");
        continue;
      }
      if kept.iter().any(|c| c.id == case.id) {
        error!(target: "trainer_backend", case_id = case.id, "Skipping duplicate case id");
        continue;
      }
      kept.push(case);
    }
    info!(target: "trainer_backend", cases = kept.len(), rubrics = rubrics.len(), "Case repository ready");
    Self { cases: kept, rubrics }
  }

  pub fn len(&self) -> usize {
    self.cases.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cases.is_empty()
  }

  pub fn cases(&self) -> &[Case] {
    &self.cases
  }

  pub fn get(&self, id: u32) -> Result<&Case, TrainerError> {
    self.cases.iter().find(|c| c.id == id).ok_or(TrainerError::UnknownCase(id))
  }

  /// Case at `index`, wrapping around the end of the bank.
  pub fn cycled(&self, index: usize) -> Result<&Case, TrainerError> {
    if self.cases.is_empty() {
      return Err(TrainerError::EmptyRepository);
    }
    Ok(&self.cases[index % self.cases.len()])
  }

  /// Rubric for a case; cases without one get an empty slice.
  pub fn rubric(&self, case_id: u32) -> &[ReasoningCheck] {
    self.rubrics.get(&case_id).map(Vec::as_slice).unwrap_or(&[])
  }
}
