//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Case listing, deterministic shuffles and stateless reasoning/score evaluation
//!   - Study session actions (select, explain, lock, next, restart, breakdown)
//!   - Versus session actions and the per-turn countdown task
//!   - Player names and theme, persisted through the store

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::breakdown::{build_breakdown, Breakdown};
use crate::error::TrainerError;
use crate::protocol::*;
use crate::reasoning::{evaluate_reasoning, ReasoningResult};
use crate::repository::CaseRepository;
use crate::scoring::{apply_study_delta, format_delta, study_delta, versus_delta};
use crate::session::study::{StudyPhase, StudySession};
use crate::session::versus::{PlayerSlot, TickOutcome, VersusPhase, VersusSession};
use crate::shuffle::{shuffle_options, STUDY_MODE, VERSUS_MODE};
use crate::state::AppState;
use crate::store::{load_theme, save_currency, save_player_name, save_theme};
use crate::domain::Theme;

//
// Stateless operations
//

pub fn list_cases(state: &AppState) -> Vec<CaseSummaryOut> {
  state.repo.cases().iter().map(CaseSummaryOut::from).collect()
}

#[instrument(level = "info", skip(state), fields(%case_id))]
pub fn shuffle_case(state: &AppState, case_id: u32, mode: Option<&str>) -> Result<ShuffleOut, TrainerError> {
  let mode = match mode.map(str::trim) {
    Some(m) if !m.is_empty() => m.to_string(),
    _ => STUDY_MODE.to_string(),
  };
  let case = state.repo.get(case_id)?;
  let shuffled = shuffle_options(case, &mode)?;
  debug!(target: "trainer_backend", %case_id, %mode, correct = %shuffled.correct_display_label, "Options shuffled");
  Ok(ShuffleOut {
    case_id,
    mode,
    options: shuffled.options,
    correct_display_label: shuffled.correct_display_label,
  })
}

#[instrument(level = "info", skip(state, text), fields(%case_id, text_len = text.len()))]
pub fn evaluate_for_case(state: &AppState, case_id: u32, text: &str) -> Result<ReasoningResult, TrainerError> {
  let case = state.repo.get(case_id)?;
  let result = evaluate_reasoning(text, state.repo.rubric(case.id));
  debug!(target: "study", %case_id, score = result.score, low_quality = result.low_quality, "Reasoning evaluated");
  Ok(result)
}

pub fn score_study(body: &StudyScoreIn) -> StudyScoreOut {
  let delta = study_delta(body.correct, body.hit_count);
  StudyScoreOut {
    delta,
    delta_text: format_delta(delta),
    currency: apply_study_delta(body.currency, body.correct, body.hit_count),
  }
}

pub fn score_versus(body: &VersusScoreIn) -> VersusScoreOut {
  let delta = versus_delta(body.confidence, body.correct);
  VersusScoreOut { delta, delta_text: format_delta(delta) }
}

//
// Study
//

pub fn study_view(repo: &CaseRepository, s: &StudySession) -> Result<StudyView, TrainerError> {
  let phase = s.phase();
  let case = if s.is_finished() {
    None
  } else {
    let case = s.current_case(repo)?;
    Some(CaseCard::new(case, shuffle_options(case, STUDY_MODE)?.options))
  };
  let last_outcome = s.last_snapshot().cloned();
  let delta_text = match (&last_outcome, phase) {
    (Some(snap), StudyPhase::Locked | StudyPhase::Finished) => Some(format_delta(snap.delta)),
    _ => None,
  };
  Ok(StudyView {
    id: s.id,
    phase,
    case_index: s.current_index(),
    total_cases: s.total_cases(),
    progress: s.progress(),
    currency: s.currency(),
    selected_id: s.selected_id().map(str::to_string),
    explanation: s.explanation().to_string(),
    round_active: s.round_active(),
    case,
    last_outcome,
    delta_text,
    summary: s.is_finished().then(|| s.summary()),
  })
}

pub async fn new_study(state: &AppState) -> Result<StudyView, TrainerError> {
  let session = state.create_study().await?;
  study_view(&state.repo, &session)
}

pub async fn get_study(state: &AppState, id: Uuid) -> Result<StudyView, TrainerError> {
  let session = state.study_session(id).await?;
  study_view(&state.repo, &session)
}

#[instrument(level = "info", skip(state), fields(%id, %option_id))]
pub async fn study_select(state: &AppState, id: Uuid, option_id: &str) -> Result<StudyView, TrainerError> {
  state
    .update_study(id, |s, repo| {
      s.select(repo, option_id)?;
      study_view(repo, s)
    })
    .await
}

#[instrument(level = "info", skip(state, text), fields(%id, text_len = text.len()))]
pub async fn study_explain(state: &AppState, id: Uuid, text: &str) -> Result<StudyView, TrainerError> {
  state
    .update_study(id, |s, repo| {
      s.explain(text)?;
      study_view(repo, s)
    })
    .await
}

/// Lock the round, then persist the new balance. A failed write is logged; the round stays scored.
#[instrument(level = "info", skip(state), fields(%id))]
pub async fn study_lock(state: &AppState, id: Uuid) -> Result<StudyView, TrainerError> {
  let min_chars = state.config.study.min_explanation_chars;
  let view = state
    .update_study(id, |s, repo| {
      s.lock(repo, min_chars)?;
      study_view(repo, s)
    })
    .await?;

  if let Err(e) = save_currency(state.store.as_ref(), view.currency) {
    error!(target: "study", %id, error = %e, "Failed to persist currency");
  }
  if let Some(out) = &view.last_outcome {
    info!(
      target: "study",
      %id,
      case_id = out.case_id,
      correct = out.is_correct,
      reasoning = out.reasoning_score,
      delta = out.delta,
      currency = view.currency,
      "Study round locked"
    );
  }
  Ok(view)
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn study_next(state: &AppState, id: Uuid) -> Result<StudyView, TrainerError> {
  let view = state
    .update_study(id, |s, repo| {
      s.next()?;
      study_view(repo, s)
    })
    .await?;
  if let Some(summary) = &view.summary {
    info!(target: "study", %id, correct = summary.correct, total = summary.total, percent = summary.percent, "Study session finished");
  }
  Ok(view)
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn study_restart(state: &AppState, id: Uuid) -> Result<StudyView, TrainerError> {
  state
    .update_study(id, |s, repo| {
      s.restart();
      study_view(repo, s)
    })
    .await
}

/// Breakdown of the most recently locked round.
#[instrument(level = "info", skip(state), fields(%id))]
pub async fn study_breakdown(state: &AppState, id: Uuid) -> Result<Breakdown, TrainerError> {
  let session = state.study_session(id).await?;
  let snapshot = session.last_snapshot().ok_or(TrainerError::RoundNotLocked)?;
  let case = state.repo.get(snapshot.case_id)?;
  Ok(build_breakdown(case, snapshot, state.repo.rubric(case.id)))
}

/// Discard a Study session and its stored snapshot. Currency is kept.
pub async fn leave_study(state: &AppState, id: Uuid) -> Result<(), TrainerError> {
  state.remove_study(id).await
}

//
// Versus
//

pub fn versus_view(repo: &CaseRepository, s: &VersusSession) -> Result<VersusView, TrainerError> {
  let (case, correct_display_label) = if s.phase() == VersusPhase::Playing {
    let case = s.current_case(repo)?;
    let shuffled = shuffle_options(case, VERSUS_MODE)?;
    let label = s.is_revealed().then(|| shuffled.correct_display_label.clone());
    (Some(CaseCard::new(case, shuffled.options)), label)
  } else {
    (None, None)
  };
  Ok(VersusView {
    id: s.id,
    phase: s.phase(),
    active: s.active(),
    players: s.players().to_vec(),
    time_left: s.time_left(),
    turn_seconds: s.turn_seconds(),
    round_active: s.round_active(),
    confidence: s.confidence(),
    selected_id: s.selected_id().map(str::to_string),
    revealed: s.is_revealed(),
    round_result: s.round_result(),
    delta_text: s.round_result().map(|r| format_delta(r.delta)),
    correct_display_label,
    case,
    winner: s.winner(),
  })
}

pub async fn new_versus(state: &AppState) -> Result<VersusView, TrainerError> {
  let session = state.create_versus().await?;
  versus_view(&state.repo, &session)
}

pub async fn get_versus(state: &AppState, id: Uuid) -> Result<VersusView, TrainerError> {
  let session = state.versus_session(id).await?;
  versus_view(&state.repo, &session)
}

/// Ready -> Playing(A); spawns the countdown for the new turn.
#[instrument(level = "info", skip(state), fields(%id))]
pub async fn versus_start(state: &Arc<AppState>, id: Uuid) -> Result<VersusView, TrainerError> {
  let (turn, view) = state
    .update_versus(id, |s, repo| {
      let turn = s.start()?;
      Ok((turn, versus_view(repo, s)?))
    })
    .await?;
  info!(target: "versus", %id, turn, player = "a", "Versus turn started");
  spawn_turn_ticker(state.clone(), id, turn);
  Ok(view)
}

/// Handoff -> Playing(B); spawns the countdown for the new turn.
#[instrument(level = "info", skip(state), fields(%id))]
pub async fn versus_player_b(state: &Arc<AppState>, id: Uuid) -> Result<VersusView, TrainerError> {
  let (turn, view) = state
    .update_versus(id, |s, repo| {
      let turn = s.start_player_b()?;
      Ok((turn, versus_view(repo, s)?))
    })
    .await?;
  info!(target: "versus", %id, turn, player = "b", "Versus turn started");
  spawn_turn_ticker(state.clone(), id, turn);
  Ok(view)
}

#[instrument(level = "info", skip(state), fields(%id, ?confidence))]
pub async fn versus_confidence(
  state: &AppState,
  id: Uuid,
  confidence: crate::domain::Confidence,
) -> Result<VersusView, TrainerError> {
  state
    .update_versus(id, |s, repo| {
      s.set_confidence(confidence)?;
      versus_view(repo, s)
    })
    .await
}

#[instrument(level = "info", skip(state), fields(%id, %option_id))]
pub async fn versus_select(state: &AppState, id: Uuid, option_id: &str) -> Result<VersusView, TrainerError> {
  state
    .update_versus(id, |s, repo| {
      s.select(repo, option_id)?;
      versus_view(repo, s)
    })
    .await
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn versus_confirm(state: &AppState, id: Uuid) -> Result<VersusView, TrainerError> {
  let view = state
    .update_versus(id, |s, repo| {
      s.confirm(repo)?;
      versus_view(repo, s)
    })
    .await?;
  if let Some(r) = &view.round_result {
    info!(target: "versus", %id, player = ?view.active, correct = r.correct, delta = r.delta, "Versus answer revealed");
  }
  Ok(view)
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn versus_next(state: &AppState, id: Uuid) -> Result<VersusView, TrainerError> {
  state
    .update_versus(id, |s, repo| {
      s.next_case()?;
      versus_view(repo, s)
    })
    .await
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn versus_restart(state: &AppState, id: Uuid) -> Result<VersusView, TrainerError> {
  state
    .update_versus(id, |s, repo| {
      s.restart();
      versus_view(repo, s)
    })
    .await
}

/// Discard a Versus session; a running countdown sees it gone and stops.
pub async fn leave_versus(state: &AppState, id: Uuid) -> Result<(), TrainerError> {
  state.remove_versus(id).await
}

/// One-second countdown for `turn`. Stops when the turn ends or the session moved on.
pub fn spawn_turn_ticker(state: Arc<AppState>, id: Uuid, turn: u64) {
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately.
    interval.tick().await;
    loop {
      interval.tick().await;
      let outcome = {
        let mut sessions = state.versus.write().await;
        match sessions.get_mut(&id) {
          Some(s) => s.tick(turn),
          None => TickOutcome::Stale,
        }
      };
      match outcome {
        TickOutcome::Running(_) => {}
        TickOutcome::TurnEnded(phase) => {
          info!(target: "versus", %id, turn, phase = phase.as_str(), "Turn timer expired");
          break;
        }
        TickOutcome::Stale => {
          debug!(target: "versus", %id, turn, "Ticker stopped");
          break;
        }
      }
    }
  });
}

//
// Settings
//

/// Persist a player's display name and apply it to live Versus sessions.
#[instrument(level = "info", skip(state, name), fields(slot = ?slot))]
pub async fn set_player_name(state: &AppState, slot: PlayerSlot, name: &str) -> Result<PlayerNameOut, TrainerError> {
  save_player_name(state.store.as_ref(), slot.index(), name)?;
  for s in state.versus.write().await.values_mut() {
    s.set_player_name(slot, name);
  }
  Ok(PlayerNameOut { slot, name: name.trim().to_string() })
}

pub fn get_theme(state: &AppState) -> Theme {
  load_theme(state.store.as_ref())
}

pub fn set_theme(state: &AppState, raw: &str) -> Result<Theme, TrainerError> {
  let theme = Theme::parse_lenient(raw.trim());
  if theme.as_str() != raw.trim() {
    warn!(target: "trainer_backend", raw, "Unknown theme; falling back to dark");
  }
  save_theme(state.store.as_ref(), theme)?;
  Ok(theme)
}
