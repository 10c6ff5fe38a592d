// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract layer: one precondition/postcondition pair per operation,
//! stated as pure predicates over typed inputs (and, for postconditions, the
//! result).
//!
//! Every precondition here transcribes the documented safety requirement of
//! the corresponding standard-library method. A precondition weaker than the
//! real safety contract turns the campaign's proofs into false confidence:
//!
//! - `unchecked_add`/`unchecked_sub`/`unchecked_mul`: "results in undefined
//!   behavior when the respective checked variant would return `None`".
//! - `unchecked_shl`/`unchecked_shr`: "results in undefined behavior if
//!   `rhs` is larger than or equal to the number of bits in `self`".
//! - `unchecked_neg`: "results in undefined behavior when `self == MIN`".
//! - `to_int_unchecked`: "the value must not be NaN [or infinite] and must
//!   be representable in the return type after truncating off its
//!   fractional part".
//!
//! Postconditions assert behavioral equivalence with a trusted reference:
//! the checked variant's value, the wide-cast product, or the saturating
//! `as` cast restricted to the in-range domain.

use ubcheck_metadata::Operation;

use crate::primitive::{SignedVerified, TruncFrom, VerifiedFloat, VerifiedInt, Widening};

/// Precondition for a two-operand integer operation.
pub fn binary_pre<T: VerifiedInt>(op: Operation, a: T, b: T) -> bool {
    match op {
        Operation::UncheckedAdd => a.checked_add(b).is_some(),
        Operation::UncheckedSub => a.checked_sub(b).is_some(),
        Operation::UncheckedMul => a.checked_mul(b).is_some(),
        Operation::UncheckedShl | Operation::UncheckedShr => {
            matches!(b.to_shift_amount(), Some(amt) if amt < T::BITS)
        }
        op => unreachable!("{op} is not a two-operand integer operation"),
    }
}

/// Invokes a two-operand unchecked operation and checks its postcondition:
/// bitwise equality with the checked variant's value.
///
/// The caller (the proof engine) only reaches this inside the assumed
/// domain, so the unsafe invocation is within contract; the redundant
/// `checked_*` probe here keeps the function safe against misuse and doubles
/// as the reference computation.
pub fn binary_check<T: VerifiedInt>(op: Operation, a: T, b: T) -> Result<(), String> {
    match op {
        Operation::UncheckedAdd => {
            let expected = reference(a.checked_add(b), op)?;
            assert_matches(unsafe { a.unchecked_add(b) }, expected, op)
        }
        Operation::UncheckedSub => {
            let expected = reference(a.checked_sub(b), op)?;
            assert_matches(unsafe { a.unchecked_sub(b) }, expected, op)
        }
        Operation::UncheckedMul => {
            let expected = reference(a.checked_mul(b), op)?;
            assert_matches(unsafe { a.unchecked_mul(b) }, expected, op)
        }
        Operation::UncheckedShl => {
            let amt = shift_amount::<T>(b)?;
            let expected = reference(a.checked_shl(amt), op)?;
            assert_matches(unsafe { a.unchecked_shl(amt) }, expected, op)
        }
        Operation::UncheckedShr => {
            let amt = shift_amount::<T>(b)?;
            let expected = reference(a.checked_shr(amt), op)?;
            assert_matches(unsafe { a.unchecked_shr(amt) }, expected, op)
        }
        op => unreachable!("{op} is not a two-operand integer operation"),
    }
}

/// Precondition for signed negation: the operand is not `MIN`.
pub fn neg_pre<T: SignedVerified>(v: T) -> bool {
    v.checked_neg().is_some()
}

/// Postcondition for signed negation: equality with `checked_neg`.
pub fn neg_check<T: SignedVerified>(v: T) -> Result<(), String> {
    let expected = reference(v.checked_neg(), Operation::UncheckedNeg)?;
    assert_matches(unsafe { v.unchecked_neg() }, expected, Operation::UncheckedNeg)
}

/// Postcondition for the widening operations: reassembling the half-word
/// result equals the product computed in the wide type. Total, so there is
/// no precondition; `carrying_mul` additionally covers the carry dimension
/// with its boundary values.
pub fn widening_check<T: Widening>(op: Operation, a: T, b: T) -> Result<(), String> {
    match op {
        Operation::WideningMul => {
            let (lo, hi) = a.widening_mul(b);
            assert_matches(T::combine(lo, hi), a.wide_product(b), op)
        }
        Operation::CarryingMul => {
            for carry in [T::ZERO, T::ONE, T::MAX] {
                let (lo, hi) = a.carrying_mul(b, carry);
                let expected = a
                    .wide_product(b)
                    .checked_add(carry.wide_of())
                    .ok_or_else(|| "wide product + carry overflowed the wide type".to_string())?;
                if T::combine(lo, hi) != expected {
                    return Err(format!(
                        "carrying_mul with carry {carry} returned {}, expected {expected}",
                        T::combine(lo, hi)
                    ));
                }
            }
            Ok(())
        }
        op => unreachable!("{op} is not a widening operation"),
    }
}

/// Precondition for float-to-integer truncation: finite and in range after
/// truncation.
pub fn trunc_pre<F: VerifiedFloat, T: TruncFrom<F>>(v: F) -> bool {
    T::in_range(v)
}

/// Postcondition for float-to-integer truncation: equality with the
/// saturating `as` cast, which is trusted independent semantics on the
/// in-range domain.
pub fn trunc_check<F: VerifiedFloat, T: TruncFrom<F>>(v: F) -> Result<(), String> {
    let got = unsafe { T::trunc_unchecked(v) };
    let expected = T::cast_trunc(v);
    if got == expected {
        Ok(())
    } else {
        Err(format!("to_int_unchecked returned {got}, the as-cast reference returned {expected}"))
    }
}

fn reference<T>(checked: Option<T>, op: Operation) -> Result<T, String> {
    checked.ok_or_else(|| format!("checked variant of {op} reported overflow inside the assumed domain"))
}

fn shift_amount<T: VerifiedInt>(b: T) -> Result<u32, String> {
    b.to_shift_amount()
        .ok_or_else(|| format!("shift amount {b} is not convertible to u32 inside the assumed domain"))
}

fn assert_matches<T: VerifiedInt>(got: T, expected: T, op: Operation) -> Result<(), String> {
    if got == expected {
        Ok(())
    } else {
        Err(format!("{op} returned {got}, the checked reference returned {expected}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_precondition_tracks_overflow_on_i8() {
        // 127 + 1 overflows and must be excluded by the assumption layer;
        // 100 + 27 is fine and equals 127.
        assert!(!binary_pre::<i8>(Operation::UncheckedAdd, 127, 1));
        assert!(binary_pre::<i8>(Operation::UncheckedAdd, 100, 27));
        assert_eq!(binary_check::<i8>(Operation::UncheckedAdd, 100, 27), Ok(()));
        assert_eq!(unsafe { 100i8.unchecked_add(27) }, 127);
    }

    #[test]
    fn sub_and_mul_preconditions_on_the_unsigned_floor() {
        assert!(!binary_pre::<u8>(Operation::UncheckedSub, 0, 1));
        assert!(binary_pre::<u8>(Operation::UncheckedSub, 1, 1));
        assert!(!binary_pre::<u8>(Operation::UncheckedMul, 16, 16));
        assert!(binary_pre::<u8>(Operation::UncheckedMul, 15, 17));
    }

    #[test]
    fn shift_precondition_excludes_the_bit_width() {
        assert!(binary_pre::<u8>(Operation::UncheckedShl, 1, 7));
        assert!(!binary_pre::<u8>(Operation::UncheckedShl, 1, 8));
        assert!(!binary_pre::<i8>(Operation::UncheckedShr, 1, -1));
        assert_eq!(binary_check::<u8>(Operation::UncheckedShl, 1, 7), Ok(()));
    }

    #[test]
    fn neg_precondition_excludes_only_min() {
        assert!(!neg_pre(i8::MIN));
        assert!(neg_pre(i8::MIN + 1));
        assert!(neg_pre(0i8));
        assert_eq!(neg_check(-128i8 + 1), Ok(()));
    }

    #[test]
    fn widening_postcondition_holds_at_the_u16_extreme() {
        assert_eq!(widening_check::<u16>(Operation::WideningMul, 65535, 65535), Ok(()));
        assert_eq!(widening_check::<u16>(Operation::CarryingMul, 65535, 65535), Ok(()));
    }

    #[test]
    fn infinity_fails_the_truncation_precondition() {
        // Non-finite values are excluded from the checked domain entirely;
        // they must never surface as counterexamples.
        assert!(!trunc_pre::<f32, u16>(f32::INFINITY));
        assert!(!trunc_pre::<f32, u16>(f32::NEG_INFINITY));
        assert!(!trunc_pre::<f32, u16>(f32::NAN));
        assert!(trunc_pre::<f32, u16>(5.6));
        assert_eq!(trunc_check::<f32, u16>(5.6), Ok(()));
    }
}
