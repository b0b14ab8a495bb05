//! Game store: owns the current state and its observers
//!
//! Single writer. Every transition runs the reducer, swaps in the complete
//! new state, resyncs the elapsed ticker and then notifies listeners.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::listeners::{Listeners, SharedListeners, Subscription};
use super::state::{GameEvent, GamePhase, GameState, RoundRecord};
use super::timer::ElapsedTicker;
use crate::catalog::Difficulty;
use crate::config::GameConfig;
use crate::error::Result;
use crate::platform::{Clock, Scheduler};

pub struct GameStore<C: Clock, S: Scheduler> {
    state: GameState,
    config: GameConfig,
    seed: u64,
    rng: Pcg32,
    clock: C,
    listeners: SharedListeners<GameState>,
    ticker: ElapsedTicker<S>,
}

impl<C: Clock + Clone + 'static, S: Scheduler> GameStore<C, S> {
    /// Create an idle store; `seed` drives every shuffle
    pub fn new(config: GameConfig, clock: C, scheduler: S, seed: u64) -> Self {
        let ticker = ElapsedTicker::new(scheduler, config.tick_interval_ms);
        Self {
            state: GameState::new(config.total_rounds),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock,
            listeners: Listeners::shared(),
            ticker,
            config,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.state.last_round()
    }

    /// Seconds into the current round, polled instead of observed
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.state.round_elapsed_secs(self.clock.now_ms())
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Apply one transition. On error nothing changes and nobody is notified.
    pub fn dispatch(&mut self, event: GameEvent) -> Result<&GameState> {
        let now_ms = self.clock.now_ms();
        let next = match self.state.apply(event, now_ms, &mut self.rng, &self.config) {
            Ok(next) => next,
            Err(e) => {
                log::warn!("Rejected {}: {}", event.name(), e);
                return Err(e);
            }
        };

        log_transition(&self.state, &next, event);
        self.state = next;
        self.ticker.sync(&self.state, &self.clock);
        Listeners::emit(&self.listeners, &self.state);
        Ok(&self.state)
    }

    pub fn start(&mut self, difficulty: Difficulty) -> Result<&GameState> {
        self.dispatch(GameEvent::Start(difficulty))
    }

    /// Start from a tier name as typed by the host
    pub fn start_named(&mut self, difficulty: &str) -> Result<&GameState> {
        let difficulty = Difficulty::parse(difficulty)?;
        self.start(difficulty)
    }

    pub fn advance_round(&mut self) -> Result<&GameState> {
        self.dispatch(GameEvent::AdvanceRound)
    }

    pub fn record_answer(&mut self, correct: bool) -> Result<&GameState> {
        self.dispatch(GameEvent::RecordAnswer { correct })
    }

    pub fn apply_hint_penalty(&mut self) -> Result<&GameState> {
        self.dispatch(GameEvent::ApplyHintPenalty)
    }

    pub fn reset(&mut self) -> Result<&GameState> {
        self.dispatch(GameEvent::Reset)
    }

    /// Observe every state change; called once right away with the current state
    pub fn subscribe(&self, mut listener: impl FnMut(&GameState) + 'static) -> Subscription {
        listener(&self.state);
        Listeners::subscribe(&self.listeners, Box::new(listener))
    }

    /// Observe elapsed round time (seconds) while a round is being played
    pub fn subscribe_elapsed(&self, listener: impl FnMut(f64) + 'static) -> Subscription {
        self.ticker.subscribe(Box::new(listener))
    }
}

fn log_transition(prev: &GameState, next: &GameState, event: GameEvent) {
    match (event, next.phase) {
        (GameEvent::Start(difficulty), _) => {
            log::info!("Game started ({}, {} rounds)", difficulty.as_str(), next.total_rounds)
        }
        (_, GamePhase::GameOver) if prev.phase != GamePhase::GameOver => {
            log::info!("Game over: {} points over {} answers", next.total_points, next.history.len())
        }
        _ => log::debug!(
            "{}: {:?} -> {:?} (round {}/{}, {} pts)",
            event.name(),
            prev.phase,
            next.phase,
            next.current_round,
            next.total_rounds,
            next.total_points
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::platform::manual::{ManualClock, ManualScheduler};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store() -> (GameStore<ManualClock, ManualScheduler>, ManualClock, ManualScheduler) {
        let clock = ManualClock::new(10_000.0);
        let scheduler = ManualScheduler::default();
        let store = GameStore::new(GameConfig::default(), clock.clone(), scheduler.clone(), 42);
        (store, clock, scheduler)
    }

    #[test]
    fn test_full_game() {
        let (mut store, clock, _) = store();
        store.start(Difficulty::Easy).unwrap();
        for _ in 0..5 {
            store.advance_round().unwrap();
            clock.advance_secs(30.0);
            store.record_answer(true).unwrap();
        }
        assert_eq!(store.state().total_points, 5 * 900);
        let over = store.advance_round().unwrap();
        assert_eq!(over.phase, GamePhase::GameOver);
        assert_eq!(over.history.len(), 5);
    }

    #[test]
    fn test_same_seed_same_order() {
        let (mut a, _, _) = store();
        let (mut b, _, _) = store();
        a.start(Difficulty::Easy).unwrap();
        b.start(Difficulty::Easy).unwrap();
        assert_eq!(a.state().functions, b.state().functions);
    }

    #[test]
    fn test_start_named_surfaces_bad_tier() {
        let (mut store, _, _) = store();
        assert!(matches!(
            store.start_named("impossible"),
            Err(GameError::InvalidDifficulty(_))
        ));
        assert_eq!(store.phase(), GamePhase::Idle);
        store.start_named("Hard").unwrap();
        assert_eq!(store.state().difficulty, Some(Difficulty::Hard));
    }

    #[test]
    fn test_rejected_transition_does_not_notify() {
        let (mut store, _, _) = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = store.subscribe(move |s: &GameState| sink.borrow_mut().push(s.phase));
        assert_eq!(*seen.borrow(), vec![GamePhase::Idle]);

        assert!(store.record_answer(true).is_err());
        assert_eq!(seen.borrow().len(), 1);

        store.start(Difficulty::Medium).unwrap();
        store.advance_round().unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![GamePhase::Idle, GamePhase::Playing, GamePhase::Playing]
        );
    }

    #[test]
    fn test_unsubscribed_listener_goes_quiet() {
        let (mut store, _, _) = store();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let sub = store.subscribe(move |_| *sink.borrow_mut() += 1);
        store.start(Difficulty::Easy).unwrap();
        sub.unsubscribe();
        store.advance_round().unwrap();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_ticker_runs_only_while_playing_a_round() {
        let (mut store, clock, scheduler) = store();
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let sink = ticks.clone();
        let _sub = store.subscribe_elapsed(move |secs| sink.borrow_mut().push(secs));

        store.start(Difficulty::Easy).unwrap();
        // No round stamped yet
        assert_eq!(scheduler.active(), 0);

        store.advance_round().unwrap();
        assert_eq!(scheduler.active(), 1);
        assert_eq!(scheduler.periods(), vec![100]);

        clock.advance_secs(0.1);
        scheduler.fire();
        clock.advance_secs(0.1);
        scheduler.fire();
        assert_eq!(ticks.borrow().len(), 2);
        assert!((ticks.borrow()[1] - 0.2).abs() < 1e-9);

        // Wrong answer keeps the same round and the same task
        store.record_answer(false).unwrap();
        assert_eq!(scheduler.active(), 1);

        store.record_answer(true).unwrap();
        assert_eq!(scheduler.active(), 0);
        assert!(!store.ticker_running());
        scheduler.fire();
        assert_eq!(ticks.borrow().len(), 2);
    }

    #[test]
    fn test_new_round_restarts_ticker_from_zero() {
        let (mut store, clock, scheduler) = store();
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let sink = ticks.clone();
        let _sub = store.subscribe_elapsed(move |secs| sink.borrow_mut().push(secs));

        store.start(Difficulty::Easy).unwrap();
        store.advance_round().unwrap();
        clock.advance_secs(5.0);
        store.advance_round().unwrap();
        assert_eq!(scheduler.active(), 1);

        clock.advance_secs(0.1);
        scheduler.fire();
        assert!((ticks.borrow()[0] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_ticker_stops_on_reset_and_teardown() {
        let (mut store, _, scheduler) = store();
        store.start(Difficulty::Easy).unwrap();
        store.advance_round().unwrap();
        assert_eq!(scheduler.active(), 1);
        store.reset().unwrap();
        assert_eq!(scheduler.active(), 0);
        assert_eq!(*store.state(), GameState::new(5));

        store.start(Difficulty::Easy).unwrap();
        store.advance_round().unwrap();
        assert_eq!(scheduler.active(), 1);
        drop(store);
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_polled_elapsed() {
        let (mut store, clock, _) = store();
        assert_eq!(store.elapsed_secs(), None);
        store.start(Difficulty::Easy).unwrap();
        store.advance_round().unwrap();
        clock.advance_secs(2.5);
        assert_eq!(store.elapsed_secs(), Some(2.5));
    }

    #[test]
    fn test_hint_penalty_through_store() {
        let (mut store, clock, _) = store();
        store.start(Difficulty::Easy).unwrap();
        store.advance_round().unwrap();
        clock.advance_secs(3.0);
        store.record_answer(true).unwrap();
        assert_eq!(store.state().total_points, 990);
        store.apply_hint_penalty().unwrap();
        assert_eq!(store.state().total_points, 495);
        assert_eq!(store.phase(), GamePhase::RoundOver);
    }
}
