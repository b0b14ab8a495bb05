//! Func Match - guess a function the calculator agrees with
//!
//! Core modules:
//! - `equivalence`: Numeric spot-check of two calculator functions
//! - `game`: Round progression, scoring and the elapsed-time observable
//! - `catalog`: Functions to guess, by difficulty tier
//! - `session`: Guess submission glue between checker, store and toasts
//! - `toast`: Transient player notifications
//! - `platform`: Browser/native clock, timers and calculator bindings
//! - `config`: Data-driven game rules

pub mod catalog;
pub mod config;
pub mod equivalence;
pub mod error;
pub mod game;
pub mod platform;
pub mod session;
pub mod toast;

pub use catalog::{Difficulty, GameFunction};
pub use config::{CheckConfig, GameConfig, ScoringPolicy};
pub use equivalence::{EquivalenceChecker, Evaluator, FnEvaluator, Settled, Verdict};
pub use error::{GameError, Result};
pub use game::{GameEvent, GamePhase, GameState, GameStore, RoundRecord, Subscription};
pub use session::Session;
pub use toast::{LogNotifier, Notifier, Severity, ToastState, Toaster};
