//! Deterministic per-mode option shuffling.
//!
//! The permutation is a pure function of `(case id, mode tag)`: the pair is hashed into a
//! 32-bit seed, the seed drives a mulberry32 generator, and `SliceRandom::shuffle`
//! (Fisher–Yates) permutes the option indices. Display letters are assigned in permuted order.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::Serialize;

use crate::domain::{Case, DISPLAY_LABELS, MAX_OPTIONS};
use crate::error::TrainerError;

/// Mode tags namespace the shuffle so the same case is ordered independently per mode.
pub const STUDY_MODE: &str = "study";
pub const VERSUS_MODE: &str = "versus";

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShuffledOption {
  pub original_id: String,
  pub label: String,
  pub display_label: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShuffledOptions {
  pub options: Vec<ShuffledOption>,
  pub correct_display_label: String,
}

impl ShuffledOptions {
  pub fn display_label_of(&self, original_id: &str) -> Option<&str> {
    self
      .options
      .iter()
      .find(|o| o.original_id == original_id)
      .map(|o| o.display_label.as_str())
  }
}

/// Polynomial rolling hash (`h * 31 + unit`) over UTF-16 code units, wrapping at 32 bits.
pub fn hash_seed(input: &str) -> i32 {
  input
    .encode_utf16()
    .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// mulberry32: tiny 32-bit generator, fully determined by its seed.
#[derive(Clone, Debug)]
pub struct Mulberry32 {
  state: u32,
}

impl Mulberry32 {
  pub fn new(seed: i32) -> Self {
    Self { state: seed as u32 }
  }

  fn step(&mut self) -> u32 {
    self.state = self.state.wrapping_add(0x6D2B_79F5);
    let mut t = self.state;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    t ^ (t >> 14)
  }
}

impl RngCore for Mulberry32 {
  fn next_u32(&mut self) -> u32 {
    self.step()
  }

  fn next_u64(&mut self) -> u64 {
    let hi = self.step() as u64;
    let lo = self.step() as u64;
    (hi << 32) | lo
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    for chunk in dest.chunks_mut(4) {
      let bytes = self.step().to_le_bytes();
      chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
    self.fill_bytes(dest);
    Ok(())
  }
}

/// Stable permutation of `case.options` for the given mode, relabelled A, B, C, ...
pub fn shuffle_options(case: &Case, mode: &str) -> Result<ShuffledOptions, TrainerError> {
  if case.options.is_empty() {
    return Err(TrainerError::NoOptions(case.id));
  }
  if case.options.len() > MAX_OPTIONS {
    return Err(TrainerError::TooManyOptions {
      case_id: case.id,
      count: case.options.len(),
      max: MAX_OPTIONS,
    });
  }

  let mut rng = Mulberry32::new(hash_seed(&format!("{}-{}", case.id, mode)));
  let mut indices: Vec<usize> = (0..case.options.len()).collect();
  indices.shuffle(&mut rng);

  let options: Vec<ShuffledOption> = indices
    .iter()
    .zip(DISPLAY_LABELS.iter())
    .map(|(&idx, letter)| ShuffledOption {
      original_id: case.options[idx].id.clone(),
      label: case.options[idx].label.clone(),
      display_label: (*letter).to_string(),
    })
    .collect();

  let correct_display_label = options
    .iter()
    .find(|o| o.original_id == case.correct_option_id)
    .map(|o| o.display_label.clone())
    .unwrap_or_else(|| "?".to_string());

  Ok(ShuffledOptions { options, correct_display_label })
}
