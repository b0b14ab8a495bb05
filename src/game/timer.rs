//! Elapsed-time observable
//!
//! Emits seconds since the round started at a fixed cadence, only while a
//! round is being played.

use super::listeners::{Listeners, SharedListeners, Subscription};
use super::state::GameState;
use crate::platform::{Clock, Scheduler};

pub(crate) struct ElapsedTicker<S: Scheduler> {
    scheduler: S,
    period_ms: u32,
    listeners: SharedListeners<f64>,
    /// Round start the running task measures from
    running: Option<(f64, S::Task)>,
}

impl<S: Scheduler> ElapsedTicker<S> {
    pub(crate) fn new(scheduler: S, period_ms: u32) -> Self {
        Self {
            scheduler,
            period_ms,
            listeners: Listeners::shared(),
            running: None,
        }
    }

    pub(crate) fn subscribe(&self, mut listener: Box<dyn FnMut(f64)>) -> Subscription {
        Listeners::subscribe(&self.listeners, Box::new(move |secs: &f64| listener(*secs)))
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start, restart or stop the periodic task to match `state`
    pub(crate) fn sync<C: Clock + Clone + 'static>(&mut self, state: &GameState, clock: &C) {
        let wanted = match (state.is_playing(), state.round_start_time_ms) {
            (true, Some(start)) => Some(start),
            _ => None,
        };

        match wanted {
            None => {
                if self.running.take().is_some() {
                    log::debug!("Elapsed ticker stopped ({:?})", state.phase);
                }
            }
            Some(start) => {
                if matches!(self.running, Some((current, _)) if current == start) {
                    return;
                }
                // Cancel the old task before the new one exists
                self.running = None;

                let listeners = self.listeners.clone();
                let clock = clock.clone();
                let task = self.scheduler.every(
                    self.period_ms,
                    Box::new(move || {
                        let elapsed = ((clock.now_ms() - start) / 1000.0).max(0.0);
                        Listeners::emit(&listeners, &elapsed);
                    }),
                );
                self.running = Some((start, task));
                log::debug!("Elapsed ticker started ({} ms)", self.period_ms);
            }
        }
    }
}
