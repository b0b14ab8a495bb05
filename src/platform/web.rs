//! Browser platform: JS clock, `setInterval` ticker, calculator bindings
//!
//! `WasmGame` is the surface the page's UI drives.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

use super::{Clock, Scheduler};
use crate::catalog::Difficulty;
use crate::config::GameConfig;
use crate::equivalence::{EquivalenceChecker, Evaluator, Settled};
use crate::error::GameError;
use crate::game::{GameStore, Subscription};
use crate::session::{GUESS_NAME, TARGET_NAME};
use crate::toast::{Notifier, Severity, Toaster};

// JS binding for the calculator's one-shot value observation
#[wasm_bindgen(inline_js = "
    export function observe_numeric_value(calculator, latex) {
        return new Promise((resolve) => {
            const helper = calculator.HelperExpression({ latex });
            helper.observe('numericValue', () => resolve(helper.numericValue));
        });
    }
")]
extern "C" {
    fn observe_numeric_value(calculator: &JsValue, latex: &str) -> js_sys::Promise;
}

/// `Date.now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Periodic tasks on `window.setInterval`
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalScheduler;

/// Running interval; `clearInterval` on drop
pub struct IntervalTask {
    id: Option<i32>,
    _closure: Closure<dyn FnMut()>,
}

impl Drop for IntervalTask {
    fn drop(&mut self) {
        if let (Some(id), Some(window)) = (self.id, web_sys::window()) {
            window.clear_interval_with_handle(id);
        }
    }
}

impl Scheduler for IntervalScheduler {
    type Task = IntervalTask;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> IntervalTask {
        let closure = Closure::wrap(tick);
        let id = web_sys::window().and_then(|window| {
            window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    period_ms as i32,
                )
                .map_err(|e| log::error!("setInterval failed: {:?}", e))
                .ok()
        });
        IntervalTask {
            id,
            _closure: closure,
        }
    }
}

/// Evaluator backed by an embedded graphing calculator
///
/// Each registration creates a helper expression and settles on the first
/// `numericValue` notification.
pub struct CalculatorEvaluator {
    calculator: JsValue,
}

impl CalculatorEvaluator {
    pub fn new(calculator: JsValue) -> Self {
        Self { calculator }
    }
}

impl Evaluator for CalculatorEvaluator {
    fn register(&self, expression: &str) -> Settled {
        let (settle, settled) = Settled::channel();
        let promise = observe_numeric_value(&self.calculator, expression);
        let expression = expression.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(value) => settle.settle(value.as_f64().unwrap_or(f64::NAN)),
                Err(e) => log::warn!("Calculator failed on {}: {:?}", expression, e),
            }
        });
        settled
    }
}

/// Resolves after `ms` milliseconds
async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    });
    let _ = JsFuture::from(promise).await;
}

fn to_js(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
    log::info!("func-match core loaded");
}

/// Game core as seen from the page
#[wasm_bindgen]
pub struct WasmGame {
    store: GameStore<SystemClock, IntervalScheduler>,
    toaster: Toaster<SystemClock>,
    checker: EquivalenceChecker,
    subscriptions: Vec<Subscription>,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        let config = GameConfig::load();
        let seed = js_sys::Date::now() as u64;
        let checker = EquivalenceChecker::from(&config.check);
        WasmGame {
            store: GameStore::new(config, SystemClock, IntervalScheduler, seed),
            toaster: Toaster::new(SystemClock),
            checker,
            subscriptions: Vec::new(),
        }
    }

    pub fn start(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty = Difficulty::parse(difficulty).map_err(to_js)?;
        self.store.start(difficulty).map(|_| ()).map_err(to_js)
    }

    pub fn advance_round(&mut self) -> Result<(), JsValue> {
        self.store.advance_round().map(|_| ()).map_err(to_js)
    }

    /// Returns the points the answer earned
    pub fn record_answer(&mut self, correct: bool) -> Result<u32, JsValue> {
        self.store.record_answer(correct).map_err(to_js)?;
        Ok(self.store.last_round().map(|r| r.points).unwrap_or(0))
    }

    pub fn apply_hint_penalty(&mut self) -> Result<(), JsValue> {
        self.store.apply_hint_penalty().map(|_| ()).map_err(to_js)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.store.reset().map(|_| ()).map_err(to_js)
    }

    pub fn state_json(&self) -> String {
        serde_json::to_string(self.store.state()).unwrap_or_default()
    }

    pub fn elapsed_secs(&self) -> Option<f64> {
        self.store.elapsed_secs()
    }

    /// `callback(stateJson)` on every change
    pub fn on_change(&mut self, callback: js_sys::Function) {
        let sub = self.store.subscribe(move |state| {
            let json = serde_json::to_string(state).unwrap_or_default();
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::warn!("State listener threw: {:?}", e);
            }
        });
        self.subscriptions.push(sub);
    }

    /// `callback(seconds)` at the ticker cadence while a round runs
    pub fn on_elapsed(&mut self, callback: js_sys::Function) {
        let sub = self.store.subscribe_elapsed(move |secs| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(secs)) {
                log::warn!("Elapsed listener threw: {:?}", e);
            }
        });
        self.subscriptions.push(sub);
    }

    pub fn clear_listeners(&mut self) {
        self.subscriptions.clear();
    }

    pub fn show_toast(&mut self, severity: &str, message: &str, duration_ms: Option<u32>) {
        let severity = Severity::parse(severity).unwrap_or_default();
        let duration = duration_ms.unwrap_or(self.store.config().toast_duration_ms);
        self.toaster.notify(severity, message, duration);
    }

    pub fn toast_json(&mut self) -> String {
        serde_json::to_string(self.toaster.current()).unwrap_or_default()
    }

    /// Compare the calculator's `f` and `g`; resolves to `"equal"`,
    /// `"not_equal"` or `"indeterminate"`
    pub fn check_functions(&self, calculator: JsValue, timeout_ms: Option<u32>) -> js_sys::Promise {
        let checker = self.checker;
        future_to_promise(async move {
            let evaluator = CalculatorEvaluator::new(calculator);
            let verdict = match timeout_ms {
                Some(ms) => {
                    checker
                        .check_with_deadline(TARGET_NAME, GUESS_NAME, &evaluator, || sleep_ms(ms))
                        .await
                }
                None => checker.check(TARGET_NAME, GUESS_NAME, &evaluator).await,
            };
            Ok(JsValue::from_str(verdict.as_str()))
        })
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
