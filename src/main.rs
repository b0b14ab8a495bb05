//! Func Match entry point
//!
//! The game runs in the browser (see `platform::web`). Natively this plays
//! a scripted game against closure-backed functions, which is handy for
//! checking rules and logging.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Func Match (native) starting...");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Could not start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let local_set = tokio::task::LocalSet::new();
    if let Err(e) = local_set.block_on(&runtime, demo::run()) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::Duration;

    use func_match::platform::{Clock, LocalScheduler, SystemClock};
    use func_match::{
        Difficulty, FnEvaluator, GameConfig, GamePhase, GameStore, LogNotifier, Result, Session,
        Verdict,
    };

    /// Guesses for the medium tier, keyed by the expression they should match
    fn guess_for(expression: &str) -> Option<fn(f64) -> f64> {
        match expression {
            "x^3-2x" => Some(|x: f64| x * (x * x - 2.0)),
            "\\tan(x)" => Some(|x: f64| x.sin() / x.cos()),
            "x^0.5" => Some(|x: f64| x.sqrt()),
            "1/x" => Some(|x: f64| if x == 0.0 { f64::NAN } else { x.recip() }),
            "e^x" => Some(|x: f64| x.exp()),
            _ => None,
        }
    }

    fn target_for(expression: &str) -> Option<fn(f64) -> f64> {
        match expression {
            "x^3-2x" => Some(|x: f64| x.powi(3) - 2.0 * x),
            "\\tan(x)" => Some(f64::tan),
            "x^0.5" => Some(|x: f64| x.powf(0.5)),
            "1/x" => Some(|x: f64| if x == 0.0 { f64::NAN } else { 1.0 / x }),
            "e^x" => Some(f64::exp),
            _ => None,
        }
    }

    pub async fn run() -> Result<()> {
        let config = GameConfig::load();
        let seed = SystemClock.now_ms() as u64;
        let store = GameStore::new(config, SystemClock, LocalScheduler, seed);
        let mut session = Session::new(store, LogNotifier);

        let _elapsed = session
            .store()
            .subscribe_elapsed(|secs| log::trace!("{:.1}s", secs));

        session.store_mut().start(Difficulty::Medium)?;
        loop {
            let state = session.store_mut().advance_round()?;
            if state.phase == GamePhase::GameOver {
                break;
            }
            let Some(function) = state.current_function.clone() else {
                break;
            };
            log::info!(
                "Round {}: {} ({})",
                state.current_round,
                function.display_expression(),
                function.description
            );

            // Think for a moment so the ticker has something to report
            tokio::time::sleep(Duration::from_millis(250)).await;

            let (Some(target), Some(guess)) = (
                target_for(&function.expression),
                guess_for(&function.expression),
            ) else {
                log::warn!("No scripted guess for {}", function.expression);
                continue;
            };
            let evaluator = FnEvaluator::new().with("f", target).with("g", guess);
            let verdict = session.submit_guess(&evaluator).await?;
            if verdict != Verdict::Equal {
                log::warn!("Scripted guess judged {}, skipping round", verdict.as_str());
            }
        }

        let state = session.store().state();
        log::info!(
            "Final score: {} points in {} answers",
            state.total_points,
            state.history.len()
        );
        Ok(())
    }
}
