//! Numeric equivalence checking
//!
//! - `evaluator`: contract for the external calculator engine
//! - `checker`: concurrent sampling over a fixed integer domain

pub mod checker;
pub mod evaluator;

pub use checker::{EquivalenceChecker, SampleOutcome, SampleResult, Verdict};
pub use evaluator::{Evaluator, FnEvaluator, Settle, Settled, parse_call};
