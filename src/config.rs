//! Loading trainer configuration (tunables + optional case bank) from TOML.
//!
//! See `TrainerConfig` for the expected schema. Every section is optional.
//!
//! ```toml
//! [study]
//! starting_currency = 50
//! min_explanation_chars = 200
//!
//! [versus]
//! turn_seconds = 60
//!
//! [storage]
//! path = "./data/trainer-store.json"
//!
//! [[cases]]
//! id = 11
//! patient_stem_short = "59 y/o female"
//! # ... remaining case fields, plus inline reasoning checks:
//! [[cases.checks]]
//! label = "Renal function"
//! keywords = ["ckd", "egfr"]
//! hit_feedback = "..."
//! miss_feedback = "..."
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Case, ReasoningCheck};
use crate::session::study::{DEFAULT_MIN_EXPLANATION_CHARS, DEFAULT_STARTING_CURRENCY};
use crate::session::versus::DEFAULT_TURN_SECONDS;

pub const DEFAULT_STORE_PATH: &str = "./data/trainer-store.json";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TrainerConfig {
  #[serde(default)]
  pub study: StudyConfig,
  #[serde(default)]
  pub versus: VersusConfig,
  #[serde(default)]
  pub storage: StorageConfig,
  #[serde(default)]
  pub cases: Vec<CaseCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StudyConfig {
  #[serde(default = "default_starting_currency")]
  pub starting_currency: i64,
  #[serde(default = "default_min_chars")]
  pub min_explanation_chars: usize,
}

impl Default for StudyConfig {
  fn default() -> Self {
    Self {
      starting_currency: DEFAULT_STARTING_CURRENCY,
      min_explanation_chars: DEFAULT_MIN_EXPLANATION_CHARS,
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct VersusConfig {
  #[serde(default = "default_turn_seconds")]
  pub turn_seconds: u32,
}

impl Default for VersusConfig {
  fn default() -> Self {
    Self { turn_seconds: DEFAULT_TURN_SECONDS }
  }
}

/// `path = ""` keeps everything in memory.
#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
  #[serde(default = "default_store_path")]
  pub path: PathBuf,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self { path: default_store_path() }
  }
}

impl StorageConfig {
  pub fn in_memory(&self) -> bool {
    self.path.as_os_str().is_empty()
  }
}

/// Case bank entry accepted in TOML: a full case plus its reasoning checks.
#[derive(Clone, Debug, Deserialize)]
pub struct CaseCfg {
  #[serde(flatten)]
  pub case: Case,
  #[serde(default)]
  pub checks: Vec<ReasoningCheck>,
}

fn default_starting_currency() -> i64 { DEFAULT_STARTING_CURRENCY }
fn default_min_chars() -> usize { DEFAULT_MIN_EXPLANATION_CHARS }
fn default_turn_seconds() -> u32 { DEFAULT_TURN_SECONDS }
fn default_store_path() -> PathBuf { PathBuf::from(DEFAULT_STORE_PATH) }

impl TrainerConfig {
  /// Split the bank into cases and a rubric map keyed by case id.
  pub fn bank(&self) -> (Vec<Case>, HashMap<u32, Vec<ReasoningCheck>>) {
    let mut cases = Vec::with_capacity(self.cases.len());
    let mut rubrics = HashMap::new();
    for entry in &self.cases {
      if !entry.checks.is_empty() {
        rubrics.insert(entry.case.id, entry.checks.clone());
      }
      cases.push(entry.case.clone());
    }
    (cases, rubrics)
  }
}

pub fn parse_config(raw: &str) -> Result<TrainerConfig, toml::de::Error> {
  toml::from_str::<TrainerConfig>(raw)
}

/// Attempt to load `TrainerConfig` from TRAINER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<TrainerConfig> {
  let path = std::env::var("TRAINER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "trainer_backend", %path, cases = cfg.cases.len(), "Loaded trainer config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "trainer_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "trainer_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
