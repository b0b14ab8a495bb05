//! Guess submission: runs the equivalence check and records the outcome
//!
//! The store and the checker never talk to each other; this is the glue a
//! host would otherwise write itself.

use crate::equivalence::{EquivalenceChecker, Evaluator, Verdict};
use crate::error::{GameError, Result};
use crate::game::{GamePhase, GameStore};
use crate::platform::{Clock, Scheduler};
use crate::toast::{Notifier, Severity};

/// Name the target function is registered under in the evaluator
pub const TARGET_NAME: &str = "f";
/// Name the player's guess is registered under
pub const GUESS_NAME: &str = "g";

pub struct Session<C: Clock, S: Scheduler, N: Notifier> {
    store: GameStore<C, S>,
    notifier: N,
    checker: EquivalenceChecker,
}

impl<C: Clock + Clone + 'static, S: Scheduler, N: Notifier> Session<C, S, N> {
    pub fn new(store: GameStore<C, S>, notifier: N) -> Self {
        let checker = EquivalenceChecker::from(&store.config().check);
        Self {
            store,
            notifier,
            checker,
        }
    }

    pub fn store(&self) -> &GameStore<C, S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GameStore<C, S> {
        &mut self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn checker(&self) -> &EquivalenceChecker {
        &self.checker
    }

    /// Check the guess against the target and score it
    ///
    /// `Indeterminate` records nothing; the player may submit again.
    pub async fn submit_guess<E>(&mut self, evaluator: &E) -> Result<Verdict>
    where
        E: Evaluator + ?Sized,
    {
        let state = self.store.state();
        if state.phase != GamePhase::Playing || state.current_function.is_none() {
            return Err(GameError::InvalidTransition {
                action: "submit_guess",
                phase: state.phase,
            });
        }

        let verdict = self.checker.check(TARGET_NAME, GUESS_NAME, evaluator).await;
        let duration = self.store.config().toast_duration_ms;

        match verdict {
            Verdict::Equal => {
                self.store.record_answer(true)?;
                let points = self.store.last_round().map(|r| r.points).unwrap_or(0);
                self.notifier.notify(
                    Severity::Success,
                    &format!("Correct! +{} points", points),
                    duration,
                );
            }
            Verdict::NotEqual => {
                self.store.record_answer(false)?;
                self.notifier
                    .notify(Severity::Error, "Not quite. Try again!", duration);
            }
            Verdict::Indeterminate => {
                self.notifier.notify(
                    Severity::Warning,
                    "Your function is undefined at every test point",
                    duration,
                );
            }
        }

        Ok(verdict)
    }

    /// Spend a hint: halves the score
    pub fn use_hint(&mut self) -> Result<()> {
        self.store.apply_hint_penalty()?;
        let duration = self.store.config().toast_duration_ms;
        self.notifier
            .notify(Severity::Warning, "Hint used: score halved", duration);
        Ok(())
    }
}
