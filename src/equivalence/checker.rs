//! Sampling equivalence check
//!
//! Two functions count as equal when they agree (within tolerance) at
//! every domain point where both are defined. This is a spot-check, not a
//! proof.

use std::future::Future;
use std::ops::RangeInclusive;
use std::pin::pin;

use futures::future::{self, Either};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};

use super::evaluator::{Evaluator, Settled};
use crate::config::CheckConfig;

/// Outcome of an equivalence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Equal,
    NotEqual,
    /// No point had a value on both sides
    Indeterminate,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Equal => "equal",
            Verdict::NotEqual => "not_equal",
            Verdict::Indeterminate => "indeterminate",
        }
    }
}

/// Both functions evaluated at one domain point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleResult {
    pub x: i32,
    pub value_f: f64,
    pub value_g: f64,
}

/// What one sample says about equivalence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Agree,
    Disagree,
    /// At least one side is undefined
    Inconclusive,
}

impl SampleResult {
    pub fn outcome(&self, tolerance: f64) -> SampleOutcome {
        if self.value_f.is_nan() || self.value_g.is_nan() {
            return SampleOutcome::Inconclusive;
        }
        // inf - inf is NaN, which never exceeds the tolerance
        if (self.value_f - self.value_g).abs() > tolerance {
            SampleOutcome::Disagree
        } else {
            SampleOutcome::Agree
        }
    }
}

/// Samples two registered functions over an integer domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquivalenceChecker {
    domain_min: i32,
    domain_max: i32,
    tolerance: f64,
}

impl Default for EquivalenceChecker {
    fn default() -> Self {
        Self::from(&CheckConfig::default())
    }
}

impl From<&CheckConfig> for EquivalenceChecker {
    fn from(config: &CheckConfig) -> Self {
        Self {
            domain_min: config.domain_min,
            domain_max: config.domain_max,
            tolerance: config.tolerance,
        }
    }
}

impl EquivalenceChecker {
    pub fn domain(&self) -> RangeInclusive<i32> {
        self.domain_min..=self.domain_max
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Compare `name_f` and `name_g` at every domain point
    ///
    /// A value the evaluator never settles stalls the check; use
    /// [`check_with_deadline`](Self::check_with_deadline) to bound it.
    pub async fn check<E>(&self, name_f: &str, name_g: &str, evaluator: &E) -> Verdict
    where
        E: Evaluator + ?Sized,
    {
        self.check_with_deadline(name_f, name_g, evaluator, future::pending::<()>)
            .await
    }

    /// Like [`check`](Self::check), but every value races a fresh
    /// `deadline()` future; a value that loses is treated as NaN.
    pub async fn check_with_deadline<E, D, T>(
        &self,
        name_f: &str,
        name_g: &str,
        evaluator: &E,
        deadline: D,
    ) -> Verdict
    where
        E: Evaluator + ?Sized,
        D: Fn() -> T,
        T: Future<Output = ()>,
    {
        // Every request is issued here, before anything is awaited
        let mut samples: FuturesUnordered<_> = self
            .domain()
            .map(|x| {
                let f = evaluator.register(&call(name_f, x));
                let g = evaluator.register(&call(name_g, x));
                let value_f = settle_or_nan(f, deadline(), name_f, x);
                let value_g = settle_or_nan(g, deadline(), name_g, x);
                async move {
                    let (value_f, value_g) = future::join(value_f, value_g).await;
                    SampleResult { x, value_f, value_g }
                }
            })
            .collect();

        let mut comparable = false;
        while let Some(sample) = samples.next().await {
            match sample.outcome(self.tolerance) {
                SampleOutcome::Agree => comparable = true,
                SampleOutcome::Inconclusive => {}
                SampleOutcome::Disagree => {
                    log::debug!(
                        "{} and {} differ at x={}: {} vs {}",
                        name_f,
                        name_g,
                        sample.x,
                        sample.value_f,
                        sample.value_g
                    );
                    return Verdict::NotEqual;
                }
            }
        }

        if comparable {
            Verdict::Equal
        } else {
            log::debug!("{} and {} undefined across the domain", name_f, name_g);
            Verdict::Indeterminate
        }
    }
}

fn call(name: &str, x: i32) -> String {
    format!("{}({})", name, x)
}

async fn settle_or_nan<T>(settled: Settled, deadline: T, name: &str, x: i32) -> f64
where
    T: Future<Output = ()>,
{
    let deadline = pin!(deadline);
    match future::select(settled, deadline).await {
        Either::Left((Ok(value), _)) => value,
        Either::Left((Err(e), _)) => {
            log::warn!("{}({}): {}", name, x, e);
            f64::NAN
        }
        Either::Right(_) => {
            log::warn!("{}({}) did not settle before its deadline", name, x);
            f64::NAN
        }
    }
}
