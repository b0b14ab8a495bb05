//! Transient player notifications
//!
//! The core only needs something that can display a message; `ToastState`
//! is the state a host renders, with at most one toast visible at a time.

use serde::{Deserialize, Serialize};

use crate::platform::Clock;

/// Default toast lifetime
pub const DEFAULT_DURATION_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Success,
    Error,
    Warning,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "success" => Some(Severity::Success),
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            _ => None,
        }
    }
}

/// Display-a-message capability
pub trait Notifier {
    fn notify(&mut self, severity: Severity, message: &str, duration_ms: u32);
}

/// Current toast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastState {
    pub visible: bool,
    pub severity: Severity,
    pub message: String,
    pub duration_ms: u32,
    /// When the visible toast auto-dismisses
    #[serde(skip)]
    hide_at_ms: Option<f64>,
}

impl Default for ToastState {
    fn default() -> Self {
        Self {
            visible: false,
            severity: Severity::Success,
            message: String::new(),
            duration_ms: DEFAULT_DURATION_MS,
            hide_at_ms: None,
        }
    }
}

impl ToastState {
    /// Replace whatever is showing; the old dismissal no longer applies
    pub fn show(&mut self, severity: Severity, message: &str, duration_ms: u32, now_ms: f64) {
        self.visible = true;
        self.severity = severity;
        self.message = message.to_string();
        self.duration_ms = duration_ms;
        self.hide_at_ms = Some(now_ms + duration_ms as f64);
    }

    /// Hide the toast once its time is up. Returns true if it was hidden now.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        match self.hide_at_ms {
            Some(hide_at) if now_ms >= hide_at => {
                self.visible = false;
                self.hide_at_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn hide_at_ms(&self) -> Option<f64> {
        self.hide_at_ms
    }
}

/// `Notifier` that keeps a `ToastState` for the host to render
#[derive(Debug, Clone)]
pub struct Toaster<C: Clock> {
    clock: C,
    toast: ToastState,
}

impl<C: Clock> Toaster<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            toast: ToastState::default(),
        }
    }

    /// Current toast, expiring it first if due
    pub fn current(&mut self) -> &ToastState {
        self.toast.expire(self.clock.now_ms());
        &self.toast
    }
}

impl<C: Clock> Notifier for Toaster<C> {
    fn notify(&mut self, severity: Severity, message: &str, duration_ms: u32) {
        self.toast
            .show(severity, message, duration_ms, self.clock.now_ms());
    }
}

/// `Notifier` that writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, severity: Severity, message: &str, _duration_ms: u32) {
        match severity {
            Severity::Success => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::manual::ManualClock;

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::parse("Warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("warn"), None);
    }

    #[test]
    fn test_toast_auto_dismisses() {
        let mut toast = ToastState::default();
        toast.show(Severity::Error, "Not quite", 3000, 1_000.0);
        assert!(toast.visible);
        assert!(!toast.expire(3_999.0));
        assert!(toast.visible);
        assert!(toast.expire(4_000.0));
        assert!(!toast.visible);
        // Message stays for fade-out rendering
        assert_eq!(toast.message, "Not quite");
    }

    #[test]
    fn test_new_toast_rearms_dismissal() {
        let mut toast = ToastState::default();
        toast.show(Severity::Success, "first", 3000, 0.0);
        toast.show(Severity::Warning, "second", 3000, 2_000.0);
        assert!(!toast.expire(3_500.0));
        assert_eq!(toast.severity, Severity::Warning);
        assert!(toast.expire(5_000.0));
    }

    #[test]
    fn test_toaster_uses_clock() {
        let clock = ManualClock::new(0.0);
        let mut toaster = Toaster::new(clock.clone());
        toaster.notify(Severity::Success, "Correct!", 1000);
        assert!(toaster.current().visible);
        clock.advance_secs(1.0);
        assert!(!toaster.current().visible);
    }
}
