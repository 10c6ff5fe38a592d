// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// An unsafe numeric primitive operation whose safety contract the campaign
/// verifies.
///
/// Each variant corresponds to one `unsafe` method (or intrinsic-backed
/// method pair, for the widening operations) on the standard numeric
/// primitives. The precondition and postcondition predicates themselves are
/// monomorphic per type and live in the driver's contract layer; this enum is
/// the shared vocabulary between expansion, reports, and CLI filters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    clap::ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `<int>::unchecked_add`: UB unless `checked_add` would return `Some`.
    UncheckedAdd,
    /// `<int>::unchecked_sub`: UB unless `checked_sub` would return `Some`.
    UncheckedSub,
    /// `<int>::unchecked_mul`: UB unless `checked_mul` would return `Some`.
    UncheckedMul,
    /// `<int>::unchecked_shl`: UB unless the shift amount is < bit width.
    UncheckedShl,
    /// `<int>::unchecked_shr`: UB unless the shift amount is < bit width.
    UncheckedShr,
    /// `<signed int>::unchecked_neg`: UB when the operand is `MIN`.
    UncheckedNeg,
    /// Half-word widening multiply, checked against the wide-cast product.
    /// Total: the double-width product always fits.
    WideningMul,
    /// Widening multiply plus carry, checked against the wide-cast reference.
    /// Total for the same reason as [`Operation::WideningMul`].
    CarryingMul,
    /// `f32/f64::to_int_unchecked`: UB unless the value is finite and its
    /// truncation is representable in the target integer type.
    FloatToInt,
}

/// Number of symbolic input operands a harness allocates for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

/// The family of primitive types an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    SignedInt,
    UnsignedInt,
    /// Floating-point source of a truncation.
    Float,
}

impl Operation {
    pub fn arity(self) -> Arity {
        match self {
            Operation::UncheckedNeg | Operation::FloatToInt => Arity::Unary,
            Operation::UncheckedAdd
            | Operation::UncheckedSub
            | Operation::UncheckedMul
            | Operation::UncheckedShl
            | Operation::UncheckedShr
            | Operation::WideningMul
            | Operation::CarryingMul => Arity::Binary,
        }
    }

    /// The type families this operation is declared for. Applying an
    /// operation outside these families is a build-time configuration error
    /// in the expansion driver.
    pub fn families(self) -> &'static [TypeFamily] {
        match self {
            Operation::UncheckedAdd
            | Operation::UncheckedSub
            | Operation::UncheckedMul
            | Operation::UncheckedShl
            | Operation::UncheckedShr => &[TypeFamily::SignedInt, TypeFamily::UnsignedInt],
            Operation::UncheckedNeg => &[TypeFamily::SignedInt],
            Operation::WideningMul | Operation::CarryingMul => &[TypeFamily::UnsignedInt],
            Operation::FloatToInt => &[TypeFamily::Float],
        }
    }

    /// Operations whose precondition is the constant `true`.
    ///
    /// Only permitted for truly total operations; the proof obligation then
    /// rests entirely on the postcondition.
    pub fn is_total(self) -> bool {
        matches!(self, Operation::WideningMul | Operation::CarryingMul)
    }
}
