// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The expansion driver: deterministically enumerate every (operation,
//! primitive type, interval-or-full) combination declared reachable by the
//! contract layer and the interval catalog, and materialize exactly one
//! uniquely named harness per combination.
//!
//! No combination is silently skipped: anything the campaign cannot
//! meaningfully verify is pushed onto the exclusion list with its reason,
//! and a duplicate generated name is a hard build error, not a warning.

use std::collections::HashSet;

use anyhow::{Result, bail};
use strum::IntoEnumIterator;
use tracing::debug;
use ubcheck_metadata::{ExcludedCombo, Operation};

use crate::catalog;
use crate::config::ResolvedConfig;
use crate::generator::{self, Harness};
use crate::primitive::VerifiedInt;

/// The materialized campaign: every runnable harness in expansion order,
/// plus the recorded exclusions.
pub struct Campaign {
    pub harnesses: Vec<Harness>,
    pub excluded: Vec<ExcludedCombo>,
}

macro_rules! push_binary_int {
    ($op:expr, $config:expr, $out:expr; $($t:ty),* $(,)?) => {$(
        match catalog::intervals_for_int::<$t>($op, &$config.catalog) {
            None => $out.push(generator::binary_int_harness::<$t>($op, None)?),
            Some(specs) => {
                for spec in specs {
                    $out.push(generator::binary_int_harness::<$t>($op, Some(spec))?);
                }
            }
        }
    )*};
}

macro_rules! push_neg {
    ($config:expr, $out:expr; $($t:ty),* $(,)?) => {$(
        match catalog::intervals_for_int::<$t>(Operation::UncheckedNeg, &$config.catalog) {
            None => $out.push(generator::neg_harness::<$t>(None)?),
            Some(specs) => {
                for spec in specs {
                    $out.push(generator::neg_harness::<$t>(Some(spec))?);
                }
            }
        }
    )*};
}

macro_rules! push_widening {
    ($op:expr, $config:expr, $out:expr; $($t:ty),* $(,)?) => {$(
        match catalog::intervals_for_int::<$t>($op, &$config.catalog) {
            None => $out.push(generator::widening_harness::<$t>($op, None)?),
            Some(specs) => {
                for spec in specs {
                    $out.push(generator::widening_harness::<$t>($op, Some(spec))?);
                }
            }
        }
    )*};
}

macro_rules! push_trunc {
    ($f:ty, $config:expr, $out:expr, $excluded:expr; $($t:ty),* $(,)?) => {$(
        if <$t as VerifiedInt>::BITS <= $config.float_target_max_bits {
            for spec in catalog::intervals_for_trunc::<$f, $t>(&$config.catalog) {
                $out.push(generator::trunc_harness::<$f, $t>(Some(spec))?);
            }
        } else {
            $excluded.push(ExcludedCombo {
                operation: Operation::FloatToInt.to_string(),
                type_name: format!("{} -> {}", stringify!($f), stringify!($t)),
                reason: format!(
                    "target wider than configured float_target_max_bits ({})",
                    $config.float_target_max_bits
                ),
            });
        }
    )*};
}

/// Expands the full campaign from the contract layer and interval catalog.
///
/// Deterministic: the same configuration always yields the same harness
/// names, in the same order, with the same assumption intervals.
pub fn expand(config: &ResolvedConfig) -> Result<Campaign> {
    let mut harnesses: Vec<Harness> = Vec::new();
    let mut excluded: Vec<ExcludedCombo> = Vec::new();

    for op in Operation::iter() {
        match op {
            Operation::UncheckedAdd
            | Operation::UncheckedSub
            | Operation::UncheckedMul
            | Operation::UncheckedShl
            | Operation::UncheckedShr => {
                push_binary_int!(op, config, harnesses;
                    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
            }
            Operation::UncheckedNeg => {
                push_neg!(config, harnesses; i8, i16, i32, i64, i128, isize);
            }
            Operation::WideningMul | Operation::CarryingMul => {
                push_widening!(op, config, harnesses; u8, u16, u32, u64);
                excluded.push(ExcludedCombo {
                    operation: op.to_string(),
                    type_name: "u128".into(),
                    reason: "no wider primitive exists for the double-width reference product"
                        .into(),
                });
                excluded.push(ExcludedCombo {
                    operation: op.to_string(),
                    type_name: "usize".into(),
                    reason: "pointer-width wide type is platform-dependent; covered by the \
                             fixed-width types"
                        .into(),
                });
            }
            Operation::FloatToInt => {
                push_trunc!(f32, config, harnesses, excluded;
                    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
                push_trunc!(f64, config, harnesses, excluded;
                    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
                for (ty, reason) in [
                    ("f16", "verifier float-conversion reasoning does not model 16-bit floats"),
                    ("f128", "verifier float-conversion reasoning does not model 128-bit floats"),
                    (
                        "f32 -> i128/u128",
                        "range-membership predicate precision is unvalidated for 128-bit bounds",
                    ),
                    (
                        "f64 -> i128/u128",
                        "range-membership predicate precision is unvalidated for 128-bit bounds",
                    ),
                ] {
                    excluded.push(ExcludedCombo {
                        operation: op.to_string(),
                        type_name: ty.into(),
                        reason: reason.into(),
                    });
                }
            }
        }
    }

    check_unique_names(&harnesses)?;
    debug!(harnesses = harnesses.len(), excluded = excluded.len(), "campaign expanded");
    Ok(Campaign { harnesses, excluded })
}

/// Injectivity of the naming scheme: two distinct combinations colliding on
/// a generated name is a build error.
fn check_unique_names(harnesses: &[Harness]) -> Result<()> {
    let mut seen = HashSet::with_capacity(harnesses.len());
    for harness in harnesses {
        if !seen.insert(harness.meta.pretty_name.as_str()) {
            bail!("duplicate generated harness name: {}", harness.meta.pretty_name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::args::UbcheckArgs;
    use crate::config::{FileConfig, ResolvedConfig};

    use super::*;

    fn test_config() -> ResolvedConfig {
        ResolvedConfig::resolve(&UbcheckArgs::parse_from(["ubcheck"]), FileConfig::default())
    }

    #[test]
    fn expansion_is_deterministic() {
        let config = test_config();
        let names = |c: &Campaign| {
            c.harnesses.iter().map(|h| h.meta.pretty_name.clone()).collect::<Vec<_>>()
        };
        let first = expand(&config).unwrap();
        let second = expand(&config).unwrap();
        assert_eq!(names(&first), names(&second));
        assert_eq!(first.excluded, second.excluded);
        assert!(!first.harnesses.is_empty());
    }

    #[test]
    fn no_two_harnesses_share_a_name() {
        let campaign = expand(&test_config()).unwrap();
        let mut names = HashSet::new();
        for h in &campaign.harnesses {
            assert!(names.insert(h.meta.pretty_name.clone()), "dup {}", h.meta.pretty_name);
        }
    }

    #[test]
    fn every_harness_type_is_in_its_operations_declared_families() {
        use std::str::FromStr;
        use ubcheck_metadata::TypeFamily;

        let campaign = expand(&test_config()).unwrap();
        for h in &campaign.harnesses {
            let op = Operation::from_str(&h.meta.operation).unwrap();
            let family = match h.meta.type_name.as_str() {
                "f32" | "f64" => TypeFamily::Float,
                t if t.starts_with('i') => TypeFamily::SignedInt,
                _ => TypeFamily::UnsignedInt,
            };
            assert!(
                op.families().contains(&family),
                "{} instantiated outside its declared families",
                h.meta.pretty_name
            );
            // Widening and truncating harnesses always record a target type.
            if matches!(op, Operation::WideningMul | Operation::CarryingMul | Operation::FloatToInt)
            {
                assert!(h.meta.target_type.is_some());
            }
        }
    }

    #[test]
    fn eight_bit_combinations_run_unconstrained() {
        let campaign = expand(&test_config()).unwrap();
        let full: Vec<_> = campaign
            .harnesses
            .iter()
            .filter(|h| h.meta.interval.is_none())
            .map(|h| h.meta.pretty_name.as_str())
            .collect();
        assert!(full.contains(&"unchecked_add_i8_full"));
        assert!(full.contains(&"widening_mul_u8_to_u16_full"));
        assert!(full.contains(&"unchecked_neg_i16_full"));
        // Nothing 32-bit or wider runs unconstrained.
        assert!(!full.iter().any(|n| n.contains("32") || n.contains("64")));
    }

    #[test]
    fn unsupported_combinations_are_excluded_with_reasons() {
        let campaign = expand(&test_config()).unwrap();
        assert!(
            campaign
                .excluded
                .iter()
                .any(|e| e.operation == "widening_mul" && e.type_name == "u128")
        );
        assert!(campaign.excluded.iter().any(|e| e.type_name == "f16"));
        for e in &campaign.excluded {
            assert!(!e.reason.is_empty());
        }
    }

    #[test]
    fn configured_float_target_width_narrows_the_trunc_set() {
        let mut config = test_config();
        config.float_target_max_bits = 16;
        let campaign = expand(&config).unwrap();
        assert!(
            !campaign
                .harnesses
                .iter()
                .any(|h| h.meta.operation == "float_to_int"
                    && h.meta.target_type.as_deref() == Some("u32"))
        );
        assert!(
            campaign
                .excluded
                .iter()
                .any(|e| e.type_name == "f32 -> u32" && e.reason.contains("float_target_max_bits"))
        );
    }
}
