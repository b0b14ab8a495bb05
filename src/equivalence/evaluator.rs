//! Numeric evaluator contract
//!
//! The engine that actually computes function values lives outside this
//! crate. Registering an expression hands back a [`Settled`] future that
//! resolves exactly once, when the engine reports the value.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::error::{GameError, Result};

/// External numeric engine
pub trait Evaluator {
    /// Register `expression` (e.g. `f(-3)`) and return its pending value
    fn register(&self, expression: &str) -> Settled;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn register(&self, expression: &str) -> Settled {
        (**self).register(expression)
    }
}

/// Resolving half of a [`Settled`] value. Consumed by use.
#[derive(Debug)]
pub struct Settle(oneshot::Sender<f64>);

impl Settle {
    pub fn settle(self, value: f64) {
        // Receiver gone means the check already finished
        let _ = self.0.send(value);
    }
}

/// One-shot numeric result; NaN when the engine has no value
#[derive(Debug)]
pub struct Settled(SettledInner);

#[derive(Debug)]
enum SettledInner {
    Ready(Option<f64>),
    Pending(oneshot::Receiver<f64>),
}

impl Settled {
    /// Pair of resolver and pending value
    pub fn channel() -> (Settle, Settled) {
        let (tx, rx) = oneshot::channel();
        (Settle(tx), Settled(SettledInner::Pending(rx)))
    }

    /// Already-known value
    pub fn ready(value: f64) -> Self {
        Settled(SettledInner::Ready(Some(value)))
    }
}

impl Future for Settled {
    type Output = Result<f64>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.0 {
            SettledInner::Ready(value) => {
                Poll::Ready(value.take().ok_or(GameError::EvaluationNeverSettled))
            }
            SettledInner::Pending(rx) => Pin::new(rx)
                .poll(cx)
                .map(|r| r.map_err(|_| GameError::EvaluationNeverSettled)),
        }
    }
}

/// Split `name(arg)` into its parts
pub fn parse_call(expression: &str) -> Option<(&str, f64)> {
    let expression = expression.trim();
    let open = expression.find('(')?;
    let inner = expression[open + 1..].strip_suffix(')')?;
    let name = expression[..open].trim();
    if name.is_empty() {
        return None;
    }
    let arg = inner.trim().parse().ok()?;
    Some((name, arg))
}

/// Evaluator backed by Rust closures, keyed by function name
///
/// Understands only `name(number)` registrations; anything else, or an
/// unknown name, settles to NaN.
#[derive(Default)]
pub struct FnEvaluator {
    functions: HashMap<String, Box<dyn Fn(f64) -> f64>>,
}

impl FnEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a function
    pub fn define(&mut self, name: &str, f: impl Fn(f64) -> f64 + 'static) -> &mut Self {
        self.functions.insert(name.to_string(), Box::new(f));
        self
    }

    pub fn with(mut self, name: &str, f: impl Fn(f64) -> f64 + 'static) -> Self {
        self.define(name, f);
        self
    }

    pub fn evaluate(&self, expression: &str) -> f64 {
        parse_call(expression)
            .and_then(|(name, x)| self.functions.get(name).map(|f| f(x)))
            .unwrap_or(f64::NAN)
    }
}

impl Evaluator for FnEvaluator {
    fn register(&self, expression: &str) -> Settled {
        Settled::ready(self.evaluate(expression))
    }
}
