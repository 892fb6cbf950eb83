//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::error::TrainerError;
use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "trainer_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "trainer_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "trainer_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "trainer_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "trainer_backend", "WebSocket disconnected");
}

fn or_error(result: Result<ServerWsMessage, TrainerError>) -> ServerWsMessage {
  result.unwrap_or_else(|e| ServerWsMessage::Error { message: e.to_string() })
}

#[instrument(level = "info", skip(state))]
pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let study = |view| ServerWsMessage::Study { session: view };
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Shuffle { case_id, mode } => or_error(
      shuffle_case(state, case_id, mode.as_deref())
        .map(|out| ServerWsMessage::Shuffled { case_id, mode: out.mode, options: out.options }),
    ),

    ClientWsMessage::EvaluateReasoning { case_id, text } => or_error(
      evaluate_for_case(state, case_id, &text).map(|result| ServerWsMessage::Reasoning { case_id, result }),
    ),

    ClientWsMessage::NewStudy => or_error(new_study(state).await.map(study)),
    ClientWsMessage::StudySelect { session_id, option_id } => {
      or_error(study_select(state, session_id, &option_id).await.map(study))
    }
    ClientWsMessage::StudyExplain { session_id, text } => {
      or_error(study_explain(state, session_id, &text).await.map(study))
    }
    ClientWsMessage::StudyLock { session_id } => or_error(study_lock(state, session_id).await.map(study)),
    ClientWsMessage::StudyNext { session_id } => or_error(study_next(state, session_id).await.map(study)),
    ClientWsMessage::StudyRestart { session_id } => or_error(study_restart(state, session_id).await.map(study)),
    ClientWsMessage::StudyBreakdown { session_id } => or_error(
      study_breakdown(state, session_id)
        .await
        .map(|breakdown| ServerWsMessage::Breakdown { breakdown }),
    ),
    ClientWsMessage::StudyLeave { session_id } => or_error(
      leave_study(state, session_id)
        .await
        .map(|()| ServerWsMessage::Left { session_id }),
    ),
  }
}
