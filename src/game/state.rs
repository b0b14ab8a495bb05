//! Game state and transitions
//!
//! `GameState` is a plain value. Transitions never mutate it; `apply`
//! returns the next state or an error, leaving the prior one untouched.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Difficulty, GameFunction};
use crate::config::GameConfig;
use crate::error::{GameError, Result};

/// Coarse game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// No game running
    #[default]
    Idle,
    /// Waiting for the player's answer (or for the first round)
    Playing,
    /// Current round answered correctly
    RoundOver,
    /// All rounds played
    GameOver,
}

/// Result of one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub function: GameFunction,
    pub time_spent_secs: f64,
    pub was_correct: bool,
    pub points: u32,
}

/// Transition requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Start(Difficulty),
    AdvanceRound,
    RecordAnswer { correct: bool },
    ApplyHintPenalty,
    Reset,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Start(_) => "start",
            GameEvent::AdvanceRound => "advance_round",
            GameEvent::RecordAnswer { .. } => "record_answer",
            GameEvent::ApplyHintPenalty => "apply_hint_penalty",
            GameEvent::Reset => "reset",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub difficulty: Option<Difficulty>,
    /// 1-based; 0 before the first round
    pub current_round: u32,
    pub total_rounds: u32,
    pub current_function: Option<GameFunction>,
    /// Shuffled copy of the tier, fixed for one game
    pub functions: Vec<GameFunction>,
    pub start_time_ms: Option<f64>,
    pub round_start_time_ms: Option<f64>,
    pub total_points: u32,
    /// One record per answer, oldest first
    pub history: Vec<RoundRecord>,
}

impl GameState {
    /// The idle state a store starts in and `reset` returns to
    pub fn new(total_rounds: u32) -> Self {
        Self {
            phase: GamePhase::Idle,
            difficulty: None,
            current_round: 0,
            total_rounds,
            current_function: None,
            functions: Vec::new(),
            start_time_ms: None,
            round_start_time_ms: None,
            total_points: 0,
            history: Vec::new(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Seconds since the current round started, while one is running
    pub fn round_elapsed_secs(&self, now_ms: f64) -> Option<f64> {
        match (self.phase, self.round_start_time_ms) {
            (GamePhase::Playing, Some(start)) => Some(((now_ms - start) / 1000.0).max(0.0)),
            _ => None,
        }
    }

    /// Most recent answer
    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.history.last()
    }

    /// Compute the state that follows `event`
    pub fn apply<R: Rng + ?Sized>(
        &self,
        event: GameEvent,
        now_ms: f64,
        rng: &mut R,
        config: &GameConfig,
    ) -> Result<GameState> {
        match event {
            GameEvent::Start(difficulty) => self.start(difficulty, now_ms, rng, config),
            GameEvent::AdvanceRound => self.advance_round(now_ms),
            GameEvent::RecordAnswer { correct } => self.record_answer(correct, now_ms, config),
            GameEvent::ApplyHintPenalty => self.apply_hint_penalty(),
            GameEvent::Reset => Ok(GameState::new(config.total_rounds)),
        }
    }

    fn reject(&self, event: GameEvent) -> GameError {
        GameError::InvalidTransition {
            action: event.name(),
            phase: self.phase,
        }
    }

    fn start<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        now_ms: f64,
        rng: &mut R,
        config: &GameConfig,
    ) -> Result<GameState> {
        let mut functions = difficulty.functions();
        if functions.len() < config.total_rounds as usize {
            return Err(GameError::NotEnoughFunctions {
                difficulty,
                available: functions.len(),
                required: config.total_rounds,
            });
        }
        shuffle(&mut functions, rng);

        Ok(GameState {
            phase: GamePhase::Playing,
            difficulty: Some(difficulty),
            functions,
            start_time_ms: Some(now_ms),
            ..GameState::new(config.total_rounds)
        })
    }

    fn advance_round(&self, now_ms: f64) -> Result<GameState> {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::RoundOver) {
            return Err(self.reject(GameEvent::AdvanceRound));
        }

        let next_round = self.current_round + 1;
        if next_round > self.total_rounds {
            return Ok(GameState {
                phase: GamePhase::GameOver,
                ..self.clone()
            });
        }

        let current_function = self.functions.get(next_round as usize - 1).cloned();
        Ok(GameState {
            phase: GamePhase::Playing,
            current_round: next_round,
            current_function,
            round_start_time_ms: Some(now_ms),
            ..self.clone()
        })
    }

    fn record_answer(&self, correct: bool, now_ms: f64, config: &GameConfig) -> Result<GameState> {
        let event = GameEvent::RecordAnswer { correct };
        let (Some(round_start), Some(function)) = (self.round_start_time_ms, &self.current_function)
        else {
            return Err(self.reject(event));
        };
        if self.phase != GamePhase::Playing {
            return Err(self.reject(event));
        }

        let time_spent_secs = ((now_ms - round_start) / 1000.0).max(0.0);
        let points = config.scoring.points(correct, time_spent_secs);

        let mut next = self.clone();
        next.history.push(RoundRecord {
            round: self.current_round,
            function: function.clone(),
            time_spent_secs,
            was_correct: correct,
            points,
        });
        next.total_points = next.total_points.saturating_add(points);
        next.phase = if correct {
            GamePhase::RoundOver
        } else {
            GamePhase::Playing
        };
        Ok(next)
    }

    fn apply_hint_penalty(&self) -> Result<GameState> {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::RoundOver) {
            return Err(self.reject(GameEvent::ApplyHintPenalty));
        }
        Ok(GameState {
            total_points: self.total_points / 2,
            ..self.clone()
        })
    }
}

/// Uniform in-place permutation (Fisher-Yates)
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
