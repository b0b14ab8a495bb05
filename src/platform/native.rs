//! Native platform: system clock and tokio local tasks

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::{Clock, Scheduler};

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Periodic tasks on the current `tokio::task::LocalSet`
///
/// Tick callbacks are not `Send`, so `every` must be called from inside a
/// `LocalSet` (it panics otherwise, like `spawn_local`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalScheduler;

/// Handle to a running interval; aborts the task on drop
#[derive(Debug)]
pub struct LocalTask(JoinHandle<()>);

impl Drop for LocalTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl Scheduler for LocalScheduler {
    type Task = LocalTask;

    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> LocalTask {
        let period = Duration::from_millis(period_ms.max(1) as u64);
        let handle = tokio::task::spawn_local(async move {
            // First tick one period from now, like setInterval
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                tick();
            }
        });
        LocalTask(handle)
    }
}
