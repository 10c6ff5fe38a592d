// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The verifier capability interface and the in-tree bounded backend.
//!
//! The framework consumes the verifier through three capabilities: produce a
//! fresh symbolic value over a type's full range ([`Symbolic::fresh`]),
//! constrain it with an assumption ([`Symbolic::assume_in`]), and discharge a
//! precondition/postcondition contract over the constrained space
//! ([`prove_unary`]/[`prove_binary`]).
//!
//! The backend here is a bounded concrete-exploration engine: it enumerates
//! every representable value in the assumed domain, skips states where the
//! precondition (the assumption layer) does not hold, and checks the
//! obligation on the rest. A domain larger than the state budget yields
//! `ResourceExhausted` before any exploration: an over-budget domain is
//! never sampled, because a sampled pass must not be reported as a proof.

use std::time::{Duration, Instant};

use tracing::trace;
use ubcheck_metadata::Verdict;

use crate::primitive::Scalar;

/// How often the inner loop consults the wall-clock deadline.
const DEADLINE_STRIDE: u64 = 1 << 12;

/// Per-harness resource limits. Exceeding either limit classifies the run as
/// resource-exhausted, never as proved or disproved.
#[derive(Debug, Clone)]
pub struct Budget {
    /// Maximum number of states (representable input tuples) to explore.
    pub max_states: u64,
    /// Wall-clock deadline for this run, if any.
    pub deadline: Option<Instant>,
}

impl Budget {
    pub fn new(max_states: u64, timeout: Option<Duration>) -> Self {
        Budget { max_states, deadline: timeout.map(|t| Instant::now() + t) }
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// A symbolic value: the set of representable values of `T` within a closed
/// key-ordered range. Fresh values are unconstrained over the full range;
/// assumptions narrow the range.
#[derive(Debug, Clone, Copy)]
pub struct Symbolic<T: Scalar> {
    lo: T,
    hi: T,
}

impl<T: Scalar> Symbolic<T> {
    /// A fresh symbolic value unconstrained over the full representable
    /// range of `T` (for floats this includes infinities and NaNs; the
    /// precondition decides what survives).
    pub fn fresh() -> Self {
        let (lo, hi) = T::full_range();
        Symbolic { lo, hi }
    }

    /// Assume `lo <= self <= hi` (key order), intersecting with any prior
    /// constraint. Interval endpoints come from the validated catalog, so an
    /// empty intersection is a caller bug.
    pub fn assume_in(&mut self, lo: T, hi: T) {
        debug_assert!(lo.key_le(hi));
        if self.lo.key_le(lo) {
            self.lo = lo;
        }
        if hi.key_le(self.hi) {
            self.hi = hi;
        }
        debug_assert!(self.lo.key_le(self.hi));
    }

    fn span(&self) -> Option<u64> {
        T::span(self.lo, self.hi)
    }

    fn nth(&self, k: u64) -> T {
        T::nth(self.lo, k)
    }
}

/// Proves a contract over one symbolic operand: for every value in the
/// assumed domain satisfying `pre`, `check` must not report a violation.
///
/// `check` runs the operation under verification and compares against its
/// trusted reference, returning the violation rendered as an error string.
pub fn prove_unary<T: Scalar>(
    input: Symbolic<T>,
    budget: &Budget,
    pre: impl Fn(T) -> bool,
    check: impl Fn(T) -> Result<(), String>,
) -> Verdict {
    let Some(span) = input.span() else {
        return Verdict::ResourceExhausted { explored: 0 };
    };
    if span > budget.max_states {
        trace!(span, max_states = budget.max_states, "domain over budget");
        return Verdict::ResourceExhausted { explored: 0 };
    }

    let mut explored = 0;
    for k in 0..span {
        if k % DEADLINE_STRIDE == 0 && budget.expired() {
            return Verdict::ResourceExhausted { explored };
        }
        let v = input.nth(k);
        if !pre(v) {
            // Assumption layer: states outside the precondition are pruned,
            // not failed.
            continue;
        }
        explored += 1;
        if let Err(detail) = check(v) {
            return Verdict::Counterexample { inputs: vec![v.to_string()], detail };
        }
    }
    Verdict::Proved { explored }
}

/// Proves a contract over two symbolic operands of the same type. The state
/// space is the cross product of the two assumed domains.
pub fn prove_binary<T: Scalar>(
    a: Symbolic<T>,
    b: Symbolic<T>,
    budget: &Budget,
    pre: impl Fn(T, T) -> bool,
    check: impl Fn(T, T) -> Result<(), String>,
) -> Verdict {
    let states = a.span().zip(b.span()).and_then(|(x, y)| x.checked_mul(y));
    let Some(states) = states else {
        return Verdict::ResourceExhausted { explored: 0 };
    };
    if states > budget.max_states {
        trace!(states, max_states = budget.max_states, "domain over budget");
        return Verdict::ResourceExhausted { explored: 0 };
    }

    let b_span = b.span().unwrap_or(0);
    let mut explored = 0;
    for k in 0..states {
        if k % DEADLINE_STRIDE == 0 && budget.expired() {
            return Verdict::ResourceExhausted { explored };
        }
        let x = a.nth(k / b_span);
        let y = b.nth(k % b_span);
        if !pre(x, y) {
            continue;
        }
        explored += 1;
        if let Err(detail) = check(x, y) {
            return Verdict::Counterexample {
                inputs: vec![x.to_string(), y.to_string()],
                detail,
            };
        }
    }
    Verdict::Proved { explored }
}
