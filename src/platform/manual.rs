//! Hand-driven clock and scheduler for tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{Clock, Scheduler};

#[derive(Debug, Clone, Default)]
pub(crate) struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub(crate) fn new(start_ms: f64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub(crate) fn advance_secs(&self, secs: f64) {
        self.0.set(self.0.get() + secs * 1000.0);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

struct ManualEntry {
    id: u64,
    period_ms: u32,
    tick: Box<dyn FnMut()>,
}

#[derive(Default)]
struct ManualTasks {
    next_id: u64,
    entries: Vec<ManualEntry>,
}

/// Scheduler whose ticks only run when a test calls `fire`
#[derive(Clone, Default)]
pub(crate) struct ManualScheduler(Rc<RefCell<ManualTasks>>);

pub(crate) struct ManualTask {
    id: u64,
    tasks: Rc<RefCell<ManualTasks>>,
}

impl Drop for ManualTask {
    fn drop(&mut self) {
        self.tasks.borrow_mut().entries.retain(|e| e.id != self.id);
    }
}

impl ManualScheduler {
    /// Number of live periodic tasks
    pub(crate) fn active(&self) -> usize {
        self.0.borrow().entries.len()
    }

    pub(crate) fn periods(&self) -> Vec<u32> {
        self.0.borrow().entries.iter().map(|e| e.period_ms).collect()
    }

    /// Run one tick of every live task
    pub(crate) fn fire(&self) {
        let mut entries = std::mem::take(&mut self.0.borrow_mut().entries);
        for entry in &mut entries {
            (entry.tick)();
        }
        let mut tasks = self.0.borrow_mut();
        entries.append(&mut tasks.entries);
        tasks.entries = entries;
    }
}

impl Scheduler for ManualScheduler {
    type Task = ManualTask;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> ManualTask {
        let mut tasks = self.0.borrow_mut();
        let id = tasks.next_id;
        tasks.next_id += 1;
        tasks.entries.push(ManualEntry {
            id,
            period_ms,
            tick,
        });
        ManualTask {
            id,
            tasks: self.0.clone(),
        }
    }
}
