//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Field names are camelCase on the wire; enums are snake_case.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::breakdown::Breakdown;
use crate::domain::{Case, Confidence, Metrics, Theme};
use crate::reasoning::ReasoningResult;
use crate::session::study::{StudyPhase, StudySnapshot, StudySummary};
use crate::session::versus::{PlayerSlot, PlayerState, RoundResult, VersusPhase, Winner};
use crate::shuffle::ShuffledOption;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Shuffle {
        #[serde(rename = "caseId")]
        case_id: u32,
        mode: Option<String>,
    },
    EvaluateReasoning {
        #[serde(rename = "caseId")]
        case_id: u32,
        text: String,
    },
    NewStudy,
    StudySelect {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        #[serde(rename = "optionId")]
        option_id: String,
    },
    StudyExplain {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        text: String,
    },
    StudyLock {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    StudyNext {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    StudyRestart {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    StudyBreakdown {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    StudyLeave {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Shuffled {
        #[serde(rename = "caseId")]
        case_id: u32,
        mode: String,
        options: Vec<ShuffledOption>,
    },
    Reasoning {
        #[serde(rename = "caseId")]
        case_id: u32,
        result: ReasoningResult,
    },
    Study {
        session: StudyView,
    },
    Breakdown {
        breakdown: Breakdown,
    },
    Left {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    Error {
        message: String,
    },
}

/// Patient card as shown to a player; never carries the answer key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseCard {
    pub id: u32,
    pub patient_stem_short: String,
    pub background_country: Option<String>,
    pub background_flag: Option<String>,
    pub metrics: Metrics,
    pub comorbidities: Vec<String>,
    pub current_meds: Vec<String>,
    pub options: Vec<ShuffledOption>,
}

impl CaseCard {
    pub fn new(case: &Case, options: Vec<ShuffledOption>) -> Self {
        Self {
            id: case.id,
            patient_stem_short: case.patient_stem_short.clone(),
            background_country: case.background_country.clone(),
            background_flag: case.background_flag.clone(),
            metrics: case.metrics.clone(),
            comorbidities: case.comorbidities.clone(),
            current_meds: case.current_meds.clone(),
            options,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummaryOut {
    pub id: u32,
    pub patient_stem_short: String,
    pub background_country: Option<String>,
    pub background_flag: Option<String>,
    pub option_count: usize,
}

impl From<&Case> for CaseSummaryOut {
    fn from(c: &Case) -> Self {
        Self {
            id: c.id,
            patient_stem_short: c.patient_stem_short.clone(),
            background_country: c.background_country.clone(),
            background_flag: c.background_flag.clone(),
            option_count: c.options.len(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyView {
    pub id: Uuid,
    pub phase: StudyPhase,
    pub case_index: usize,
    pub total_cases: usize,
    pub progress: usize,
    pub currency: i64,
    pub selected_id: Option<String>,
    pub explanation: String,
    pub round_active: bool,
    /// Absent once the session is finished.
    pub case: Option<CaseCard>,
    pub last_outcome: Option<StudySnapshot>,
    pub delta_text: Option<String>,
    pub summary: Option<StudySummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersusView {
    pub id: Uuid,
    pub phase: VersusPhase,
    pub active: PlayerSlot,
    pub players: Vec<PlayerState>,
    pub time_left: u32,
    pub turn_seconds: u32,
    pub round_active: bool,
    pub confidence: Option<Confidence>,
    pub selected_id: Option<String>,
    pub revealed: bool,
    pub round_result: Option<RoundResult>,
    pub delta_text: Option<String>,
    /// Only present after the reveal.
    pub correct_display_label: Option<String>,
    pub case: Option<CaseCard>,
    pub winner: Option<Winner>,
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShuffleQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleOut {
    pub case_id: u32,
    pub mode: String,
    pub options: Vec<ShuffledOption>,
    pub correct_display_label: String,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateIn {
    #[serde(rename = "caseId")]
    pub case_id: u32,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct StudyScoreIn {
    pub currency: i64,
    pub correct: bool,
    #[serde(rename = "hitCount")]
    pub hit_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyScoreOut {
    pub delta: i64,
    pub delta_text: String,
    pub currency: i64,
}

#[derive(Debug, Deserialize)]
pub struct VersusScoreIn {
    pub confidence: Confidence,
    pub correct: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersusScoreOut {
    pub delta: i64,
    pub delta_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectIn {
    #[serde(rename = "optionId")]
    pub option_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ExplainIn {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfidenceIn {
    pub confidence: Confidence,
}

#[derive(Debug, Deserialize)]
pub struct PlayerNameIn {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerNameOut {
    pub slot: PlayerSlot,
    pub name: String,
}

/// Free-form so unknown values degrade to dark instead of a 422.
#[derive(Debug, Deserialize)]
pub struct ThemeIn {
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct ThemeOut {
    pub theme: Theme,
}
