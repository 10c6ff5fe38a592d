// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interval catalog: for (operation, type) combinations whose
//! unconstrained input space exceeds the engine budget, a finite ordered
//! list of named sub-ranges covering the regions where overflow and range
//! logic is most likely to be mis-implemented: a neighborhood straddling
//! zero, the extremes of the domain, the overflow-onset midpoints (`MAX/2`
//! for addition, `~sqrt(MAX)` for multiplication), and for floats the
//! ULP-neighborhoods around the truncation boundaries.
//!
//! The catalog trades formal completeness for tractable, targeted coverage.
//! Nothing proves that these intervals are exhaustive over "interesting"
//! behavior; that gap is recorded in the campaign report's scope notes
//! rather than hidden.

use anyhow::{Result, bail};
use ubcheck_metadata::Operation;

use crate::primitive::{Scalar, TruncFrom, VerifiedFloat, VerifiedInt};

/// Tuning knobs for catalog generation. Kept as reviewable data: changing
/// any of these changes what the campaign actually covers.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Half-width (in representable values) of each integer region.
    pub half_width: u64,
    /// Half-width (in ULPs) of each float neighborhood.
    pub float_ulp_half_width: u64,
    /// Combinations whose total operand bit count is at most this are
    /// verified unconstrained over the full range in a single harness.
    pub full_range_max_bits: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig { half_width: 127, float_ulp_half_width: 4096, full_range_max_bits: 16 }
    }
}

/// A named sub-range assignment: one closed `[lo, hi]` (key order) per
/// operand position of one (operation, type) pair.
#[derive(Debug, Clone)]
pub struct IntervalSpec<T: Scalar> {
    pub name: String,
    pub ranges: Vec<(T, T)>,
}

impl<T: Scalar> IntervalSpec<T> {
    fn unary(name: impl Into<String>, range: (T, T)) -> Self {
        IntervalSpec { name: name.into(), ranges: vec![range] }
    }

    fn binary(name: impl Into<String>, a: (T, T), b: (T, T)) -> Self {
        IntervalSpec { name: name.into(), ranges: vec![a, b] }
    }

    /// Build-time validation: endpoint order and operand count. Endpoints
    /// are representable by construction (they are values of `T`).
    pub fn validate(&self, operands: usize) -> Result<()> {
        if self.ranges.len() != operands {
            bail!(
                "interval '{}' declares {} operand ranges, operation takes {operands}",
                self.name,
                self.ranges.len()
            );
        }
        for (i, (lo, hi)) in self.ranges.iter().enumerate() {
            if !lo.key_le(*hi) {
                bail!("interval '{}' operand {i} has inverted bounds [{lo}, {hi}]", self.name);
            }
        }
        Ok(())
    }
}

/// A named region of one type's domain, used as the per-operand building
/// block of binary interval cross products.
struct Region<T> {
    name: &'static str,
    lo: T,
    hi: T,
}

impl<T: VerifiedInt> Region<T> {
    fn around(name: &'static str, center: T, w: u64) -> Self {
        Region { name, lo: center.key_sub(w), hi: center.key_add(w) }
    }
}

/// The per-operand regions of interest for one integer operation.
fn int_regions<T: VerifiedInt>(op: Operation, w: u64) -> Vec<Region<T>> {
    let mut regions = Vec::new();
    if T::SIGNED {
        regions.push(Region { name: "min", lo: T::MIN, hi: T::MIN.key_add(w) });
    }
    regions.push(Region::around("zero", T::ZERO, w));
    regions.push(Region::around("mid", T::MAX_HALF, w));
    if matches!(op, Operation::UncheckedMul | Operation::WideningMul | Operation::CarryingMul) {
        // Multiplication overflow onset is near sqrt(MAX), not MAX/2.
        regions.push(Region::around("sqrt", T::SQRT_MAX, w));
    }
    regions.push(Region { name: "max", lo: T::MAX.key_sub(w), hi: T::MAX });
    regions
}

fn operand_count(op: Operation) -> usize {
    match op.arity() {
        ubcheck_metadata::Arity::Unary => 1,
        ubcheck_metadata::Arity::Binary => 2,
    }
}

/// The interval catalog entry for an integer operation on `T`: `None` means
/// the full representable range is checked in one unconstrained harness,
/// `Some` is the ordered interval list.
pub fn intervals_for_int<T: VerifiedInt>(
    op: Operation,
    cfg: &CatalogConfig,
) -> Option<Vec<IntervalSpec<T>>> {
    let total_bits = T::BITS * operand_count(op) as u32;
    if total_bits <= cfg.full_range_max_bits {
        return None;
    }

    let w = cfg.half_width;
    let specs = match op {
        Operation::UncheckedNeg => int_regions::<T>(op, w)
            .into_iter()
            .map(|r| IntervalSpec::unary(r.name, (r.lo, r.hi)))
            .collect(),
        Operation::UncheckedShl | Operation::UncheckedShr => {
            // The shift-amount operand gets one fixed region spanning
            // [0 - slack, BITS], so each harness exercises both the valid
            // amounts and the pruned out-of-range ones.
            let amt = (T::ZERO.key_sub(4), T::ZERO.key_add(u64::from(T::BITS)));
            int_regions::<T>(op, w)
                .into_iter()
                .map(|r| IntervalSpec::binary(format!("a_{}_amt", r.name), (r.lo, r.hi), amt))
                .collect()
        }
        _ => {
            let regions = int_regions::<T>(op, w);
            let mut specs = Vec::with_capacity(regions.len() * regions.len());
            for ra in &regions {
                for rb in &regions {
                    specs.push(IntervalSpec::binary(
                        format!("a_{}_b_{}", ra.name, rb.name),
                        (ra.lo, ra.hi),
                        (rb.lo, rb.hi),
                    ));
                }
            }
            specs
        }
    };
    Some(specs)
}

/// The interval catalog for one float-to-integer truncation pair. Floats are
/// always partitioned: any value-space interval straddling zero contains on
/// the order of 2^62 representable values, so the catalog works in ULP
/// neighborhoods around the points where truncation behavior flips.
pub fn intervals_for_trunc<F: VerifiedFloat, T: TruncFrom<F>>(
    cfg: &CatalogConfig,
) -> Vec<IntervalSpec<F>> {
    let w = cfg.float_ulp_half_width;
    let (lo_bound, hi_bound) = T::range_bounds();
    let around = |name: &str, center: F| {
        IntervalSpec::unary(name, (center.key_sub(w), center.key_add(w)))
    };
    vec![
        // Subnormals on both sides of zero; everything truncates to 0.
        around("zero", F::ZERO),
        // The 0/1 truncation step.
        around("one", F::ONE),
        // The exclusive range bounds, where in_range flips.
        around("hi_boundary", hi_bound),
        around("lo_boundary", lo_bound),
        // Non-finite neighborhoods: large finites, the infinity, and the
        // adjacent NaN payloads. Everything here must be pruned or safe.
        around("pos_inf", F::INFINITY),
        around("neg_inf", F::NEG_INFINITY),
    ]
}

#[cfg(test)]
mod tests {
    use crate::contracts;

    use super::*;

    #[test]
    fn eight_bit_binary_operations_stay_unconstrained() {
        let cfg = CatalogConfig::default();
        assert!(intervals_for_int::<u8>(Operation::UncheckedAdd, &cfg).is_none());
        assert!(intervals_for_int::<i8>(Operation::UncheckedMul, &cfg).is_none());
        // One 16-bit operand is fine, two are not.
        assert!(intervals_for_int::<i16>(Operation::UncheckedNeg, &cfg).is_none());
        assert!(intervals_for_int::<u16>(Operation::UncheckedAdd, &cfg).is_some());
    }

    #[test]
    fn wide_multiplication_gets_a_sqrt_onset_region() {
        let cfg = CatalogConfig::default();
        let specs = intervals_for_int::<u32>(Operation::UncheckedMul, &cfg).unwrap();
        assert!(specs.iter().any(|s| s.name == "a_sqrt_b_sqrt"));
        let specs = intervals_for_int::<u32>(Operation::UncheckedAdd, &cfg).unwrap();
        assert!(!specs.iter().any(|s| s.name.contains("sqrt")));
    }

    #[test]
    fn catalog_entries_validate_and_fit_the_budget() {
        let cfg = CatalogConfig::default();
        for spec in intervals_for_int::<i64>(Operation::UncheckedMul, &cfg).unwrap() {
            spec.validate(2).unwrap();
            for (lo, hi) in &spec.ranges {
                let span = i64::span(*lo, *hi).unwrap();
                assert!(span <= 2 * cfg.half_width + 1);
            }
        }
    }

    #[test]
    fn interval_boundary_values_satisfy_precondition_implies_no_overflow() {
        // For every declared interval: lo, hi, lo+1, hi-1 either fail the
        // precondition (pruned) or pass the postcondition check directly.
        let cfg = CatalogConfig::default();
        for op in [Operation::UncheckedAdd, Operation::UncheckedSub, Operation::UncheckedMul] {
            for spec in intervals_for_int::<i32>(op, &cfg).unwrap() {
                let (alo, ahi) = spec.ranges[0];
                let (blo, bhi) = spec.ranges[1];
                for a in [alo, ahi, alo.key_add(1), ahi.key_sub(1)] {
                    for b in [blo, bhi, blo.key_add(1), bhi.key_sub(1)] {
                        if contracts::binary_pre::<i32>(op, a, b) {
                            contracts::binary_check::<i32>(op, a, b).unwrap();
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn shift_amount_region_includes_the_excluded_bit_width() {
        let cfg = CatalogConfig::default();
        let specs = intervals_for_int::<u32>(Operation::UncheckedShl, &cfg).unwrap();
        for spec in &specs {
            let (_, hi) = spec.ranges[1];
            assert_eq!(hi, 32);
        }
        // Signed shift-amount regions dip below zero to exercise pruning.
        let specs = intervals_for_int::<i32>(Operation::UncheckedShr, &cfg).unwrap();
        for spec in &specs {
            let (lo, _) = spec.ranges[1];
            assert_eq!(lo, -4);
        }
    }

    #[test]
    fn trunc_catalog_centers_on_the_range_boundaries() {
        let cfg = CatalogConfig::default();
        let specs = intervals_for_trunc::<f32, i8>(&cfg);
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["zero", "one", "hi_boundary", "lo_boundary", "pos_inf", "neg_inf"]);
        for spec in &specs {
            spec.validate(1).unwrap();
            let (lo, hi) = spec.ranges[0];
            assert!(f32::span(lo, hi).unwrap() <= 2 * cfg.float_ulp_half_width + 1);
        }
        // The hi_boundary neighborhood straddles the in_range flip at 128.0.
        let (lo, hi) = specs[2].ranges[0];
        assert!(lo < 128.0 && hi > 128.0);
    }

    #[test]
    fn inverted_bounds_fail_validation() {
        let spec = IntervalSpec { name: "bad".into(), ranges: vec![(10u8, 5u8)] };
        assert!(spec.validate(1).is_err());
        let spec = IntervalSpec { name: "wrong_arity".into(), ranges: vec![(0u8, 5u8)] };
        assert!(spec.validate(2).is_err());
    }
}
