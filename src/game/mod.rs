//! Game progression
//!
//! - `state`: the `GameState` value and its pure transitions
//! - `store`: single-writer container with listeners and the elapsed ticker

mod listeners;
pub mod state;
pub mod store;
mod timer;

pub use listeners::Subscription;
pub use state::{GameEvent, GamePhase, GameState, RoundRecord, shuffle};
pub use store::GameStore;
