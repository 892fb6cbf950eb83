//! Crate-wide error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("case {0} has no answer options")]
    NoOptions(u32),
    #[error("case {case_id} has {count} options; at most {max} can be labelled")]
    TooManyOptions { case_id: u32, count: usize, max: usize },
    #[error("case {case_id} is invalid: {reason}")]
    InvalidCase { case_id: u32, reason: String },
    #[error("unknown case: {0}")]
    UnknownCase(u32),
    #[error("unknown session: {0}")]
    UnknownSession(Uuid),
    #[error("unknown option '{option_id}' for case {case_id}")]
    UnknownOption { case_id: u32, option_id: String },
    #[error("unknown player slot: {0}")]
    UnknownPlayer(String),
    #[error("invalid confidence level: {0}")]
    InvalidConfidence(String),
    #[error("round is locked; advance to the next case")]
    RoundLocked,
    #[error("round is not locked yet")]
    RoundNotLocked,
    #[error("declare a confidence level first")]
    ConfidenceRequired,
    #[error("select an option first")]
    SelectionRequired,
    #[error("explanation needs at least {required} characters (got {actual})")]
    ExplanationTooShort { required: usize, actual: usize },
    #[error("action not allowed in phase {0}")]
    WrongPhase(&'static str),
    #[error("session is finished")]
    SessionFinished,
    #[error("case repository is empty")]
    EmptyRepository,
    #[error("store io error: {0}")]
    StoreIo(#[from] std::io::Error),
    #[error("store encoding error: {0}")]
    StoreJson(#[from] serde_json::Error),
}

impl TrainerError {
    pub fn status(&self) -> StatusCode {
        match self {
            TrainerError::UnknownCase(_) | TrainerError::UnknownSession(_) => StatusCode::NOT_FOUND,
            TrainerError::RoundLocked
            | TrainerError::RoundNotLocked
            | TrainerError::WrongPhase(_)
            | TrainerError::SessionFinished => StatusCode::CONFLICT,
            TrainerError::StoreIo(_)
            | TrainerError::StoreJson(_)
            | TrainerError::EmptyRepository
            | TrainerError::NoOptions(_)
            | TrainerError::TooManyOptions { .. }
            | TrainerError::InvalidCase { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for TrainerError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
