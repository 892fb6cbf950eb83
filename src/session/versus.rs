//! Versus mode: two players share one device, each gets a timed turn and wagers a confidence
//! level on every answer. Scores have no floor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Case, Confidence};
use crate::error::TrainerError;
use crate::repository::CaseRepository;
use crate::scoring::versus_delta;

pub const DEFAULT_TURN_SECONDS: u32 = 60;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VersusPhase {
    Ready,
    Playing,
    Handoff,
    Results,
}

impl VersusPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersusPhase::Ready => "ready",
            VersusPhase::Playing => "playing",
            VersusPhase::Handoff => "handoff",
            VersusPhase::Results => "results",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSlot {
    A,
    B,
}

impl PlayerSlot {
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::A => 0,
            PlayerSlot::B => 1,
        }
    }
}

impl std::str::FromStr for PlayerSlot {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "0" => Ok(PlayerSlot::A),
            "b" | "1" => Ok(PlayerSlot::B),
            other => Err(TrainerError::UnknownPlayer(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub name: String,
    pub score: i64,
    pub answered: u32,
    pub case_index: usize,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub confidence: Confidence,
    pub correct: bool,
    pub delta: i64,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    A,
    B,
    Tie,
}

/// What a one-second tick did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running(u32),
    TurnEnded(VersusPhase),
    /// The ticker belongs to a turn that is no longer running.
    Stale,
}

#[derive(Clone, Debug)]
pub struct VersusSession {
    pub id: Uuid,
    phase: VersusPhase,
    active: PlayerSlot,
    players: [PlayerState; 2],
    turn_seconds: u32,
    time_left: u32,
    turn: u64,
    selected_id: Option<String>,
    confidence: Option<Confidence>,
    revealed: bool,
    round_result: Option<RoundResult>,
}

impl VersusSession {
    pub fn new(id: Uuid, turn_seconds: u32, names: (String, String)) -> Self {
        let turn_seconds = turn_seconds.max(1);
        Self {
            id,
            phase: VersusPhase::Ready,
            active: PlayerSlot::A,
            players: [
                PlayerState { name: names.0, ..PlayerState::default() },
                PlayerState { name: names.1, ..PlayerState::default() },
            ],
            turn_seconds,
            time_left: turn_seconds,
            turn: 0,
            selected_id: None,
            confidence: None,
            revealed: false,
            round_result: None,
        }
    }

    pub fn phase(&self) -> VersusPhase { self.phase }
    pub fn active(&self) -> PlayerSlot { self.active }
    pub fn players(&self) -> &[PlayerState; 2] { &self.players }
    pub fn time_left(&self) -> u32 { self.time_left }
    pub fn turn_seconds(&self) -> u32 { self.turn_seconds }
    pub fn turn(&self) -> u64 { self.turn }
    pub fn selected_id(&self) -> Option<&str> { self.selected_id.as_deref() }
    pub fn confidence(&self) -> Option<Confidence> { self.confidence }
    pub fn is_revealed(&self) -> bool { self.revealed }
    pub fn round_result(&self) -> Option<RoundResult> { self.round_result }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerState {
        &self.players[slot.index()]
    }

    pub fn set_player_name(&mut self, slot: PlayerSlot, name: &str) {
        self.players[slot.index()].name = name.trim().to_string();
    }

    pub fn round_active(&self) -> bool {
        self.phase == VersusPhase::Playing
    }

    pub fn current_case<'a>(&self, repo: &'a CaseRepository) -> Result<&'a Case, TrainerError> {
        repo.cycled(self.player(self.active).case_index)
    }

    fn clear_round(&mut self) {
        self.selected_id = None;
        self.confidence = None;
        self.revealed = false;
        self.round_result = None;
    }

    fn begin_turn(&mut self, slot: PlayerSlot) {
        self.active = slot;
        self.clear_round();
        self.time_left = self.turn_seconds;
        self.turn += 1;
        self.phase = VersusPhase::Playing;
    }

    fn ensure_playing(&self) -> Result<(), TrainerError> {
        if self.phase != VersusPhase::Playing {
            return Err(TrainerError::WrongPhase(self.phase.as_str()));
        }
        Ok(())
    }

    /// Ready -> Playing for player A.
    pub fn start(&mut self) -> Result<u64, TrainerError> {
        if self.phase != VersusPhase::Ready {
            return Err(TrainerError::WrongPhase(self.phase.as_str()));
        }
        self.begin_turn(PlayerSlot::A);
        Ok(self.turn)
    }

    /// Handoff -> Playing for player B.
    pub fn start_player_b(&mut self) -> Result<u64, TrainerError> {
        if self.phase != VersusPhase::Handoff {
            return Err(TrainerError::WrongPhase(self.phase.as_str()));
        }
        self.begin_turn(PlayerSlot::B);
        Ok(self.turn)
    }

    /// Declare (or change) the wager. Frozen once the answer is revealed.
    pub fn set_confidence(&mut self, confidence: Confidence) -> Result<(), TrainerError> {
        self.ensure_playing()?;
        if self.revealed {
            return Err(TrainerError::RoundLocked);
        }
        self.confidence = Some(confidence);
        Ok(())
    }

    pub fn select(&mut self, repo: &CaseRepository, option_id: &str) -> Result<(), TrainerError> {
        self.ensure_playing()?;
        if self.revealed {
            return Err(TrainerError::RoundLocked);
        }
        if self.confidence.is_none() {
            return Err(TrainerError::ConfidenceRequired);
        }
        let case = self.current_case(repo)?;
        if case.option(option_id).is_none() {
            return Err(TrainerError::UnknownOption { case_id: case.id, option_id: option_id.to_string() });
        }
        self.selected_id = Some(option_id.to_string());
        Ok(())
    }

    /// Reveal the answer and apply the wager payoff to the active player.
    pub fn confirm(&mut self, repo: &CaseRepository) -> Result<RoundResult, TrainerError> {
        self.ensure_playing()?;
        if self.revealed {
            return Err(TrainerError::RoundLocked);
        }
        let confidence = self.confidence.ok_or(TrainerError::ConfidenceRequired)?;
        let selected = self.selected_id.clone().ok_or(TrainerError::SelectionRequired)?;

        let correct = self.current_case(repo)?.is_correct(&selected);
        let delta = versus_delta(confidence, correct);
        let player = &mut self.players[self.active.index()];
        player.score += delta;
        player.answered += 1;

        let result = RoundResult { confidence, correct, delta };
        self.revealed = true;
        self.round_result = Some(result);
        Ok(result)
    }

    /// Move the active player to their next case after a reveal.
    pub fn next_case(&mut self) -> Result<(), TrainerError> {
        self.ensure_playing()?;
        if !self.revealed {
            return Err(TrainerError::RoundNotLocked);
        }
        self.players[self.active.index()].case_index += 1;
        self.clear_round();
        Ok(())
    }

    /// One second of the countdown for `turn`. At zero the turn ends and any unrevealed round
    /// is dropped without scoring.
    pub fn tick(&mut self, turn: u64) -> TickOutcome {
        if self.phase != VersusPhase::Playing || self.turn != turn {
            return TickOutcome::Stale;
        }
        if self.time_left > 1 {
            self.time_left -= 1;
            return TickOutcome::Running(self.time_left);
        }
        self.time_left = 0;
        self.clear_round();
        self.phase = match self.active {
            PlayerSlot::A => VersusPhase::Handoff,
            PlayerSlot::B => VersusPhase::Results,
        };
        TickOutcome::TurnEnded(self.phase)
    }

    pub fn restart(&mut self) {
        for p in self.players.iter_mut() {
            p.score = 0;
            p.answered = 0;
            p.case_index = 0;
        }
        self.active = PlayerSlot::A;
        self.clear_round();
        self.time_left = self.turn_seconds;
        self.turn += 1;
        self.phase = VersusPhase::Ready;
    }

    pub fn winner(&self) -> Option<Winner> {
        if self.phase != VersusPhase::Results {
            return None;
        }
        let (a, b) = (self.players[0].score, self.players[1].score);
        Some(match a.cmp(&b) {
            std::cmp::Ordering::Greater => Winner::A,
            std::cmp::Ordering::Less => Winner::B,
            std::cmp::Ordering::Equal => Winner::Tie,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::{seed_cases, seed_rubrics};

    fn repo() -> CaseRepository {
        CaseRepository::new(seed_cases(), seed_rubrics())
    }

    fn playing(turn_seconds: u32) -> (VersusSession, u64) {
        let mut s = VersusSession::new(Uuid::new_v4(), turn_seconds, ("Ana".into(), "Bo".into()));
        let turn = s.start().unwrap();
        (s, turn)
    }

    fn answer(s: &mut VersusSession, repo: &CaseRepository, confidence: Confidence, correct: bool) -> RoundResult {
        let case = s.current_case(repo).unwrap();
        let pick = if correct {
            case.correct_option_id.clone()
        } else {
            case.options.iter().find(|o| o.id != case.correct_option_id).unwrap().id.clone()
        };
        s.set_confidence(confidence).unwrap();
        s.select(repo, &pick).unwrap();
        s.confirm(repo).unwrap()
    }

    #[test]
    fn selection_requires_confidence_first() {
        let repo = repo();
        let (mut s, _) = playing(60);
        assert!(matches!(s.select(&repo, "A"), Err(TrainerError::ConfidenceRequired)));
        assert!(matches!(s.confirm(&repo), Err(TrainerError::ConfidenceRequired)));
        s.set_confidence(Confidence::High).unwrap();
        assert!(matches!(s.confirm(&repo), Err(TrainerError::SelectionRequired)));
    }

    #[test]
    fn wagers_pay_out_and_allow_negative_scores() {
        let repo = repo();
        let (mut s, _) = playing(60);
        let r = answer(&mut s, &repo, Confidence::High, false);
        assert_eq!(r.delta, -2);
        s.next_case().unwrap();
        let r = answer(&mut s, &repo, Confidence::Medium, false);
        assert_eq!(r.delta, -1);
        s.next_case().unwrap();
        let r = answer(&mut s, &repo, Confidence::Low, true);
        assert_eq!(r.delta, 0);

        let a = s.player(PlayerSlot::A);
        assert_eq!(a.score, -3);
        assert_eq!(a.answered, 3);
        assert_eq!(a.case_index, 2);
    }

    #[test]
    fn confidence_is_frozen_after_reveal() {
        let repo = repo();
        let (mut s, _) = playing(60);
        answer(&mut s, &repo, Confidence::Medium, true);
        assert!(matches!(s.set_confidence(Confidence::High), Err(TrainerError::RoundLocked)));
        assert!(matches!(s.select(&repo, "B"), Err(TrainerError::RoundLocked)));
        assert!(matches!(s.confirm(&repo), Err(TrainerError::RoundLocked)));
        assert_eq!(s.round_result().unwrap().confidence, Confidence::Medium);
        assert_eq!(s.player(PlayerSlot::A).score, 1);
    }

    #[test]
    fn next_case_requires_reveal() {
        let (mut s, _) = playing(60);
        assert!(matches!(s.next_case(), Err(TrainerError::RoundNotLocked)));
    }

    #[test]
    fn timeout_abandons_unrevealed_round() {
        let repo = repo();
        let (mut s, turn) = playing(3);
        s.set_confidence(Confidence::High).unwrap();
        let correct = s.current_case(&repo).unwrap().correct_option_id.clone();
        s.select(&repo, &correct).unwrap();

        assert_eq!(s.tick(turn), TickOutcome::Running(2));
        assert_eq!(s.tick(turn), TickOutcome::Running(1));
        assert_eq!(s.tick(turn), TickOutcome::TurnEnded(VersusPhase::Handoff));
        assert_eq!(s.time_left(), 0);
        assert_eq!(s.player(PlayerSlot::A).score, 0);
        assert_eq!(s.player(PlayerSlot::A).answered, 0);
        assert!(s.selected_id().is_none());
        assert!(matches!(s.confirm(&repo), Err(TrainerError::WrongPhase("handoff"))));
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let (mut s, turn) = playing(5);
        assert_eq!(s.tick(turn + 1), TickOutcome::Stale);
        assert_eq!(s.time_left(), 5);
    }

    #[test]
    fn full_match_to_results() {
        let repo = repo();
        let (mut s, turn_a) = playing(1);
        answer(&mut s, &repo, Confidence::High, true);
        assert_eq!(s.tick(turn_a), TickOutcome::TurnEnded(VersusPhase::Handoff));
        assert!(!s.round_active());
        assert_eq!(s.winner(), None);

        let turn_b = s.start_player_b().unwrap();
        assert_ne!(turn_a, turn_b);
        assert_eq!(s.active(), PlayerSlot::B);
        assert_eq!(s.time_left(), 1);
        assert_eq!(s.current_case(&repo).unwrap().id, repo.cases()[0].id);
        answer(&mut s, &repo, Confidence::Medium, true);
        assert_eq!(s.tick(turn_a), TickOutcome::Stale);
        assert_eq!(s.tick(turn_b), TickOutcome::TurnEnded(VersusPhase::Results));
        assert_eq!(s.winner(), Some(Winner::A));

        s.restart();
        assert_eq!(s.phase(), VersusPhase::Ready);
        assert_eq!(s.players()[0].score, 0);
        assert_eq!(s.players()[1].name, "Bo");
    }

    #[test]
    fn phase_guards() {
        let mut s = VersusSession::new(Uuid::new_v4(), 60, (String::new(), String::new()));
        assert!(matches!(s.set_confidence(Confidence::Low), Err(TrainerError::WrongPhase("ready"))));
        assert!(matches!(s.start_player_b(), Err(TrainerError::WrongPhase("ready"))));
        s.start().unwrap();
        assert!(s.round_active());
        assert!(matches!(s.start(), Err(TrainerError::WrongPhase("playing"))));
    }

    #[test]
    fn player_slot_parsing() {
        assert_eq!("A".parse::<PlayerSlot>().unwrap(), PlayerSlot::A);
        assert_eq!("1".parse::<PlayerSlot>().unwrap(), PlayerSlot::B);
        assert!("c".parse::<PlayerSlot>().is_err());
    }
}
