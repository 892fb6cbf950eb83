//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Failures surface as `TrainerError`, which renders its own status and JSON body.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::breakdown::Breakdown;
use crate::error::TrainerError;
use crate::logic::*;
use crate::protocol::*;
use crate::reasoning::ReasoningResult;
use crate::session::versus::PlayerSlot;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, TrainerError>;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

pub async fn http_list_cases(State(state): State<Arc<AppState>>) -> Json<Vec<CaseSummaryOut>> {
  Json(list_cases(&state))
}

pub async fn http_shuffle(
  State(state): State<Arc<AppState>>,
  Path(id): Path<u32>,
  Query(q): Query<ShuffleQuery>,
) -> ApiResult<ShuffleOut> {
  shuffle_case(&state, id, q.mode.as_deref()).map(Json)
}

pub async fn http_evaluate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EvaluateIn>,
) -> ApiResult<ReasoningResult> {
  evaluate_for_case(&state, body.case_id, &body.text).map(Json)
}

#[instrument(level = "debug", skip(body), fields(currency = body.currency, correct = body.correct, hits = body.hit_count))]
pub async fn http_score_study(Json(body): Json<StudyScoreIn>) -> Json<StudyScoreOut> {
  Json(score_study(&body))
}

pub async fn http_score_versus(Json(body): Json<VersusScoreIn>) -> Json<VersusScoreOut> {
  Json(score_versus(&body))
}

//
// Study
//

pub async fn http_new_study(State(state): State<Arc<AppState>>) -> ApiResult<StudyView> {
  let view = new_study(&state).await?;
  info!(target: "study", id = %view.id, "HTTP study session started");
  Ok(Json(view))
}

pub async fn http_get_study(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<StudyView> {
  get_study(&state, id).await.map(Json)
}

pub async fn http_leave_study(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<()> {
  leave_study(&state, id).await.map(Json)
}

pub async fn http_study_select(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SelectIn>,
) -> ApiResult<StudyView> {
  study_select(&state, id, &body.option_id).await.map(Json)
}

pub async fn http_study_explain(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ExplainIn>,
) -> ApiResult<StudyView> {
  study_explain(&state, id, &body.text).await.map(Json)
}

pub async fn http_study_lock(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<StudyView> {
  study_lock(&state, id).await.map(Json)
}

pub async fn http_study_next(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<StudyView> {
  study_next(&state, id).await.map(Json)
}

pub async fn http_study_restart(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<StudyView> {
  study_restart(&state, id).await.map(Json)
}

pub async fn http_study_breakdown(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<Breakdown> {
  study_breakdown(&state, id).await.map(Json)
}

//
// Versus
//

pub async fn http_new_versus(State(state): State<Arc<AppState>>) -> ApiResult<VersusView> {
  let view = new_versus(&state).await?;
  info!(target: "versus", id = %view.id, "HTTP versus session started");
  Ok(Json(view))
}

pub async fn http_get_versus(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<VersusView> {
  get_versus(&state, id).await.map(Json)
}

pub async fn http_leave_versus(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<()> {
  leave_versus(&state, id).await.map(Json)
}

pub async fn http_versus_start(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<VersusView> {
  versus_start(&state, id).await.map(Json)
}

pub async fn http_versus_player_b(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<VersusView> {
  versus_player_b(&state, id).await.map(Json)
}

pub async fn http_versus_confidence(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ConfidenceIn>,
) -> ApiResult<VersusView> {
  versus_confidence(&state, id, body.confidence).await.map(Json)
}

pub async fn http_versus_select(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SelectIn>,
) -> ApiResult<VersusView> {
  versus_select(&state, id, &body.option_id).await.map(Json)
}

pub async fn http_versus_confirm(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<VersusView> {
  versus_confirm(&state, id).await.map(Json)
}

pub async fn http_versus_next(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<VersusView> {
  versus_next(&state, id).await.map(Json)
}

pub async fn http_versus_restart(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<VersusView> {
  versus_restart(&state, id).await.map(Json)
}

#[instrument(level = "info", skip(state, body), fields(%slot))]
pub async fn http_set_player_name(
  State(state): State<Arc<AppState>>,
  Path(slot): Path<String>,
  Json(body): Json<PlayerNameIn>,
) -> ApiResult<PlayerNameOut> {
  let slot: PlayerSlot = slot.parse()?;
  set_player_name(&state, slot, &body.name).await.map(Json)
}

//
// Settings
//

pub async fn http_get_theme(State(state): State<Arc<AppState>>) -> Json<ThemeOut> {
  Json(ThemeOut { theme: get_theme(&state) })
}

pub async fn http_put_theme(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ThemeIn>,
) -> ApiResult<ThemeOut> {
  let theme = set_theme(&state, &body.theme)?;
  Ok(Json(ThemeOut { theme }))
}
