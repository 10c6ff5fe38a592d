// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The harness generator: given an operation, an operand type (plus target
//! type for widening/truncating operations) and optionally an interval
//! catalog entry, produce one self-contained proof unit.
//!
//! Each harness body does the same three things, monomorphized per type:
//! obtain fresh symbolic operands, constrain them to the interval if one is
//! declared, and discharge the operation's contract: precondition as an
//! assumption, postcondition as the obligation. Generation is parametric;
//! the per-combination code is never written by hand, because hand
//! duplication across dozens of type/operation pairs is where coverage gaps
//! come from.

use anyhow::Result;
use ubcheck_metadata::{HarnessMetadata, Operation, Verdict};

use crate::catalog::IntervalSpec;
use crate::contracts;
use crate::engine::{self, Budget, Symbolic};
use crate::primitive::{Scalar, SignedVerified, TruncFrom, VerifiedFloat, VerifiedInt, Widening};

/// One materialized proof unit: identity plus a runnable verification body.
///
/// Stateless between runs; the body owns everything it needs, so harnesses
/// can run in parallel with no shared mutable state.
pub struct Harness {
    pub meta: HarnessMetadata,
    body: Box<dyn Fn(&Budget) -> Verdict + Send + Sync>,
}

impl Harness {
    pub(crate) fn new(meta: HarnessMetadata, body: Box<dyn Fn(&Budget) -> Verdict + Send + Sync>) -> Self {
        Harness { meta, body }
    }

    /// Executes the verification run under the given budget.
    pub fn run(&self, budget: &Budget) -> Verdict {
        (self.body)(budget)
    }
}

fn harness_name(op: Operation, ty: &str, target: Option<&str>, interval: Option<&str>) -> String {
    let mut name = format!("{op}_{ty}");
    if let Some(target) = target {
        name.push_str("_to_");
        name.push_str(target);
    }
    name.push('_');
    name.push_str(interval.unwrap_or("full"));
    name
}

fn metadata<T: Scalar>(
    op: Operation,
    target: Option<&'static str>,
    interval: Option<&IntervalSpec<T>>,
) -> HarnessMetadata {
    let interval_name = interval.map(|s| s.name.clone());
    HarnessMetadata {
        pretty_name: harness_name(op, T::NAME, target, interval_name.as_deref()),
        operation: op.to_string(),
        type_name: T::NAME.to_string(),
        target_type: target.map(str::to_string),
        interval: interval_name,
    }
}

fn constrained<T: Scalar>(spec: &Option<IntervalSpec<T>>, operand: usize) -> Symbolic<T> {
    let mut sym = Symbolic::fresh();
    if let Some(spec) = spec {
        let (lo, hi) = spec.ranges[operand];
        sym.assume_in(lo, hi);
    }
    sym
}

/// A harness for a two-operand unchecked integer operation.
pub fn binary_int_harness<T: VerifiedInt>(
    op: Operation,
    interval: Option<IntervalSpec<T>>,
) -> Result<Harness> {
    if let Some(spec) = &interval {
        spec.validate(2)?;
    }
    let meta = metadata::<T>(op, None, interval.as_ref());
    let body = Box::new(move |budget: &Budget| {
        let a = constrained(&interval, 0);
        let b = constrained(&interval, 1);
        engine::prove_binary(
            a,
            b,
            budget,
            |x, y| contracts::binary_pre::<T>(op, x, y),
            |x, y| contracts::binary_check::<T>(op, x, y),
        )
    });
    Ok(Harness::new(meta, body))
}

/// A harness for signed `unchecked_neg`.
pub fn neg_harness<T: SignedVerified>(interval: Option<IntervalSpec<T>>) -> Result<Harness> {
    if let Some(spec) = &interval {
        spec.validate(1)?;
    }
    let meta = metadata::<T>(Operation::UncheckedNeg, None, interval.as_ref());
    let body = Box::new(move |budget: &Budget| {
        let v = constrained(&interval, 0);
        engine::prove_unary(v, budget, contracts::neg_pre::<T>, contracts::neg_check::<T>)
    });
    Ok(Harness::new(meta, body))
}

/// A harness for a widening operation on an unsigned type; the wide type is
/// recorded as the harness's target type.
pub fn widening_harness<T: Widening>(
    op: Operation,
    interval: Option<IntervalSpec<T>>,
) -> Result<Harness> {
    if let Some(spec) = &interval {
        spec.validate(2)?;
    }
    let meta = metadata::<T>(op, Some(<T::Wide as Scalar>::NAME), interval.as_ref());
    let body = Box::new(move |budget: &Budget| {
        let a = constrained(&interval, 0);
        let b = constrained(&interval, 1);
        // Total operation: the precondition is the constant true, and the
        // whole obligation lives in the postcondition.
        engine::prove_binary(a, b, budget, |_, _| true, |x, y| contracts::widening_check::<T>(op, x, y))
    });
    Ok(Harness::new(meta, body))
}

/// A harness for `to_int_unchecked` from float `F` to integer target `T`.
pub fn trunc_harness<F: VerifiedFloat, T: TruncFrom<F>>(
    interval: Option<IntervalSpec<F>>,
) -> Result<Harness> {
    if let Some(spec) = &interval {
        spec.validate(1)?;
    }
    let meta = metadata::<F>(Operation::FloatToInt, Some(T::NAME), interval.as_ref());
    let body = Box::new(move |budget: &Budget| {
        let v = constrained(&interval, 0);
        engine::prove_unary(v, budget, contracts::trunc_pre::<F, T>, contracts::trunc_check::<F, T>)
    });
    Ok(Harness::new(meta, body))
}

#[cfg(test)]
mod tests {
    use crate::catalog::{self, CatalogConfig};

    use super::*;

    fn budget() -> Budget {
        Budget::new(1 << 22, None)
    }

    #[test]
    fn full_range_add_on_i8_proves() {
        let h = binary_int_harness::<i8>(Operation::UncheckedAdd, None).unwrap();
        assert_eq!(h.meta.pretty_name, "unchecked_add_i8_full");
        match h.run(&budget()) {
            Verdict::Proved { explored } => {
                // 256*256 pairs minus those pruned by the overflow
                // precondition; well over half survive.
                assert!(explored > 30000, "explored {explored}");
            }
            other => panic!("expected proof, got {other:?}"),
        }
    }

    #[test]
    fn full_range_shifts_and_neg_prove_on_small_types() {
        let h = binary_int_harness::<u8>(Operation::UncheckedShl, None).unwrap();
        assert!(h.run(&budget()).is_proved());
        let h = neg_harness::<i16>(None).unwrap();
        assert_eq!(h.meta.pretty_name, "unchecked_neg_i16_full");
        // Everything except i16::MIN survives the precondition.
        assert_eq!(h.run(&budget()), Verdict::Proved { explored: 65535 });
    }

    #[test]
    fn interval_harnesses_prove_on_wide_types() {
        let cfg = CatalogConfig::default();
        for spec in catalog::intervals_for_int::<u64>(Operation::UncheckedMul, &cfg).unwrap() {
            let h = binary_int_harness::<u64>(Operation::UncheckedMul, Some(spec)).unwrap();
            assert!(h.run(&budget()).is_proved(), "failed: {}", h.meta.pretty_name);
        }
        for spec in catalog::intervals_for_int::<i32>(Operation::UncheckedNeg, &cfg).unwrap() {
            let h = neg_harness::<i32>(Some(spec)).unwrap();
            assert!(h.run(&budget()).is_proved(), "failed: {}", h.meta.pretty_name);
        }
    }

    #[test]
    fn widening_full_range_on_u8_matches_the_wide_reference() {
        let h = widening_harness::<u8>(Operation::WideningMul, None).unwrap();
        assert_eq!(h.meta.pretty_name, "widening_mul_u8_to_u16_full");
        assert_eq!(h.meta.target_type.as_deref(), Some("u16"));
        // Total operation: every one of the 65536 pairs is an obligation.
        assert_eq!(h.run(&budget()), Verdict::Proved { explored: 65536 });
        let h = widening_harness::<u8>(Operation::CarryingMul, None).unwrap();
        assert!(h.run(&budget()).is_proved());
    }

    #[test]
    fn trunc_interval_harnesses_prove_and_prune_non_finite() {
        let cfg = CatalogConfig::default();
        for spec in catalog::intervals_for_trunc::<f32, i8>(&cfg) {
            let name = spec.name.clone();
            let h = trunc_harness::<f32, i8>(Some(spec)).unwrap();
            let verdict = h.run(&budget());
            assert!(verdict.is_proved(), "failed: {name}: {verdict:?}");
            if name == "pos_inf" || name == "neg_inf" {
                // The whole neighborhood is outside the checked domain:
                // pruned by the finite precondition, not counterexampled.
                assert_eq!(verdict, Verdict::Proved { explored: 0 });
            }
        }
    }

    #[test]
    fn harness_names_encode_the_full_identity() {
        let spec = catalog::intervals_for_trunc::<f64, u32>(&CatalogConfig::default()).remove(2);
        let h = trunc_harness::<f64, u32>(Some(spec)).unwrap();
        assert_eq!(h.meta.pretty_name, "float_to_int_f64_to_u32_hi_boundary");
        assert_eq!(h.meta.interval_label(), "hi_boundary");
        assert_eq!(h.meta.group_key(), ("float_to_int".to_string(), "f64 -> u32".to_string()));
    }
}
