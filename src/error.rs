//! Error types shared by the checker, the store and configuration

use thiserror::Error;

use crate::catalog::Difficulty;
use crate::game::GamePhase;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("unknown difficulty tier `{0}` (expected easy, medium or hard)")]
    InvalidDifficulty(String),
    #[error("`{action}` is not allowed while the game is {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("the {difficulty:?} tier has {available} functions but a game needs {required}")]
    NotEnoughFunctions {
        difficulty: Difficulty,
        available: usize,
        required: u32,
    },
    #[error("the evaluator dropped a request without settling its value")]
    EvaluationNeverSettled,
    #[error("invalid configuration: {0}")]
    InvalidSetting(&'static str),
    #[error(transparent)]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
