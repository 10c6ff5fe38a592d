// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The primitive-type layer: every type the campaign can quantify over
//! implements [`Scalar`], which gives the engine a total enumeration order
//! via a monotone key space. Integers add [`VerifiedInt`] (checked reference
//! operations plus the unsafe operations under verification), signed integers
//! add [`SignedVerified`], the unsigned widening pairs add [`Widening`], and
//! float-to-integer truncation targets add [`TruncFrom`].
//!
//! All impls are macro-generated from one table per family so that adding a
//! type cannot drift from the others.

use std::fmt::{Debug, Display};

/// A primitive type the verifier can produce symbolic values of.
///
/// The key space is a monotone injection of the type's representable values
/// into `0..=KEY_MAX`: adjacent keys are adjacent representable values. For
/// integers the key is the value offset by `MIN`; for floats it is the
/// standard total-order bit trick, which places negative NaN payloads below
/// `-inf` and positive ones above `+inf`. Enumeration over keys is therefore
/// total, and assumptions decide which of the enumerated values count.
pub trait Scalar: Copy + PartialEq + Debug + Display + Send + Sync + 'static {
    /// Type name as it appears in harness names and reports.
    const NAME: &'static str;
    /// Largest key value; the key space is `0..=KEY_MAX`.
    const KEY_MAX: u128;

    fn to_key(self) -> u128;
    fn from_key(key: u128) -> Self;

    /// The full representable range in key order.
    fn full_range() -> (Self, Self) {
        (Self::from_key(0), Self::from_key(Self::KEY_MAX))
    }

    /// Number of representable values in `[lo, hi]`, or `None` when the count
    /// does not fit a `u64` (treated as unconditionally over budget).
    fn span(lo: Self, hi: Self) -> Option<u64> {
        let (l, h) = (lo.to_key(), hi.to_key());
        if h < l {
            return Some(0);
        }
        u64::try_from(h - l).ok()?.checked_add(1)
    }

    /// The `k`-th representable value at or above `lo`. Requires
    /// `k < span(lo, hi)` for the enclosing range.
    fn nth(lo: Self, k: u64) -> Self {
        Self::from_key(lo.to_key() + u128::from(k))
    }

    /// Steps `ulps` representable values upward, saturating at the top of the
    /// key space. One "ulp" is one key increment.
    fn key_add(self, ulps: u64) -> Self {
        Self::from_key((self.to_key() + u128::from(ulps)).min(Self::KEY_MAX))
    }

    /// Steps `ulps` representable values downward, saturating at the bottom.
    fn key_sub(self, ulps: u64) -> Self {
        Self::from_key(self.to_key().saturating_sub(u128::from(ulps)))
    }

    fn key_le(self, other: Self) -> bool {
        self.to_key() <= other.to_key()
    }
}

/// Integer types whose unchecked arithmetic the campaign verifies.
///
/// The `checked_*` methods are the trusted reference computations; the
/// `unchecked_*` methods are the operations under verification. Every
/// precondition in the contract layer is stated in terms of the checked
/// variants, mirroring the documented safety requirement of the unchecked
/// methods ("this results in undefined behavior when the checked variant
/// would return `None`").
pub trait VerifiedInt: Scalar + PartialOrd + Ord {
    const BITS: u32;
    const SIGNED: bool;
    const ZERO: Self;
    const ONE: Self;
    const MIN: Self;
    const MAX: Self;
    /// `MAX / 2`, the overflow-onset midpoint for addition.
    const MAX_HALF: Self;
    /// A power of two near `sqrt(MAX)`, the overflow-onset region for
    /// multiplication.
    const SQRT_MAX: Self;

    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn checked_mul(self, rhs: Self) -> Option<Self>;
    fn checked_shl(self, rhs: u32) -> Option<Self>;
    fn checked_shr(self, rhs: u32) -> Option<Self>;
    fn overflowing_add(self, rhs: Self) -> (Self, bool);

    /// # Safety
    /// `self.checked_add(rhs)` must be `Some`.
    unsafe fn unchecked_add(self, rhs: Self) -> Self;
    /// # Safety
    /// `self.checked_sub(rhs)` must be `Some`.
    unsafe fn unchecked_sub(self, rhs: Self) -> Self;
    /// # Safety
    /// `self.checked_mul(rhs)` must be `Some`.
    unsafe fn unchecked_mul(self, rhs: Self) -> Self;
    /// # Safety
    /// `rhs < Self::BITS`.
    unsafe fn unchecked_shl(self, rhs: u32) -> Self;
    /// # Safety
    /// `rhs < Self::BITS`.
    unsafe fn unchecked_shr(self, rhs: u32) -> Self;

    /// Converts a symbolic shift-amount operand to `u32`; `None` when the
    /// value is negative or too large, which the shift precondition rejects.
    fn to_shift_amount(self) -> Option<u32>;
}

/// Signed integers, which additionally support negation. `unchecked_neg` is
/// undefined behavior exactly when the operand is `MIN`.
pub trait SignedVerified: VerifiedInt {
    fn checked_neg(self) -> Option<Self>;
    /// # Safety
    /// `self != Self::MIN`.
    unsafe fn unchecked_neg(self) -> Self;
}

/// Unsigned integers that have a double-width counterpart.
///
/// `widening_mul`/`carrying_mul` are the implementations under verification:
/// schoolbook half-word multiplication using only `Self`-width arithmetic.
/// `wide_product` is the trusted reference in the wide type. The two must
/// agree everywhere; the double-width product always fits, so the operations
/// are total and carry no precondition.
pub trait Widening: VerifiedInt {
    type Wide: VerifiedInt;

    /// `(low, high)` halves of the full product, computed half-word wise.
    fn widening_mul(self, rhs: Self) -> (Self, Self);
    /// `(low, high)` halves of `self * rhs + carry`. The full result fits:
    /// `MAX * MAX + MAX == MAX * (MAX + 1) < (MAX + 1)^2`.
    fn carrying_mul(self, rhs: Self, carry: Self) -> (Self, Self);

    /// Trusted reference: the product computed in the wide type.
    fn wide_product(self, rhs: Self) -> Self::Wide;
    fn wide_of(self) -> Self::Wide;
    /// Reassembles `(low, high)` halves into the wide type.
    fn combine(lo: Self, hi: Self) -> Self::Wide;
}

/// Floating-point sources of an unchecked truncation.
pub trait VerifiedFloat: Scalar {
    const ZERO: Self;
    const ONE: Self;
    const INFINITY: Self;
    const NEG_INFINITY: Self;

    fn is_finite(self) -> bool;
}

/// Integer targets of `to_int_unchecked` from float source `F`.
pub trait TruncFrom<F: VerifiedFloat>: VerifiedInt {
    /// The operation under verification.
    ///
    /// # Safety
    /// `Self::in_range(value)` must hold.
    unsafe fn trunc_unchecked(value: F) -> Self;

    /// Range-membership predicate: the value is finite and, after truncating
    /// off its fractional part, representable in `Self`. Stated with
    /// exclusive bounds `(MIN - 1, MAX + 1)`; where `MIN - 1` is not exactly
    /// representable in `F` the bound rounds toward `MIN`, excluding at most
    /// one safe value. Under-approximation is the safe direction for a
    /// predicate that gates an unsafe call.
    fn in_range(value: F) -> bool;

    /// Trusted reference: the saturating `as` cast, which agrees with
    /// truncation on the in-range domain.
    fn cast_trunc(value: F) -> Self;

    /// The exclusive `(lo, hi)` bounds used by [`TruncFrom::in_range`],
    /// exposed so the interval catalog can center neighborhoods on the
    /// exact values where range membership flips.
    fn range_bounds() -> (F, F);
}

macro_rules! impl_scalar_unsigned {
    ($($t:ty),* $(,)?) => {$(
        impl Scalar for $t {
            const NAME: &'static str = stringify!($t);
            const KEY_MAX: u128 = <$t>::MAX as u128;

            fn to_key(self) -> u128 {
                self as u128
            }

            fn from_key(key: u128) -> Self {
                key as $t
            }
        }
    )*};
}

macro_rules! impl_scalar_signed {
    ($($t:ty => $u:ty),* $(,)?) => {$(
        impl Scalar for $t {
            const NAME: &'static str = stringify!($t);
            const KEY_MAX: u128 = <$u>::MAX as u128;

            fn to_key(self) -> u128 {
                // Flip the sign bit: MIN maps to key 0, MAX to KEY_MAX.
                ((self as $u) ^ (1 << (<$t>::BITS - 1))) as u128
            }

            fn from_key(key: u128) -> Self {
                ((key as $u) ^ (1 << (<$t>::BITS - 1))) as $t
            }
        }
    )*};
}

impl_scalar_unsigned!(u8, u16, u32, u64, u128, usize);
impl_scalar_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

macro_rules! impl_verified_int {
    ($signed:literal; $($t:ty),* $(,)?) => {$(
        impl VerifiedInt for $t {
            const BITS: u32 = <$t>::BITS;
            const SIGNED: bool = $signed;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const MAX_HALF: Self = <$t>::MAX / 2;
            const SQRT_MAX: Self = 1 << (<$t>::BITS / 2 - ($signed as u32));

            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$t>::checked_add(self, rhs)
            }
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                <$t>::checked_sub(self, rhs)
            }
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                <$t>::checked_mul(self, rhs)
            }
            fn checked_shl(self, rhs: u32) -> Option<Self> {
                <$t>::checked_shl(self, rhs)
            }
            fn checked_shr(self, rhs: u32) -> Option<Self> {
                <$t>::checked_shr(self, rhs)
            }
            fn overflowing_add(self, rhs: Self) -> (Self, bool) {
                <$t>::overflowing_add(self, rhs)
            }

            unsafe fn unchecked_add(self, rhs: Self) -> Self {
                unsafe { <$t>::unchecked_add(self, rhs) }
            }
            unsafe fn unchecked_sub(self, rhs: Self) -> Self {
                unsafe { <$t>::unchecked_sub(self, rhs) }
            }
            unsafe fn unchecked_mul(self, rhs: Self) -> Self {
                unsafe { <$t>::unchecked_mul(self, rhs) }
            }
            unsafe fn unchecked_shl(self, rhs: u32) -> Self {
                unsafe { <$t>::unchecked_shl(self, rhs) }
            }
            unsafe fn unchecked_shr(self, rhs: u32) -> Self {
                unsafe { <$t>::unchecked_shr(self, rhs) }
            }

            fn to_shift_amount(self) -> Option<u32> {
                u32::try_from(self).ok()
            }
        }
    )*};
}

impl_verified_int!(false; u8, u16, u32, u64, u128, usize);
impl_verified_int!(true; i8, i16, i32, i64, i128, isize);

macro_rules! impl_signed_verified {
    ($($t:ty),* $(,)?) => {$(
        impl SignedVerified for $t {
            fn checked_neg(self) -> Option<Self> {
                <$t>::checked_neg(self)
            }
            unsafe fn unchecked_neg(self) -> Self {
                unsafe { <$t>::unchecked_neg(self) }
            }
        }
    )*};
}

impl_signed_verified!(i8, i16, i32, i64, i128, isize);

macro_rules! impl_widening {
    ($($t:ty => $wide:ty),* $(,)?) => {$(
        impl Widening for $t {
            type Wide = $wide;

            fn widening_mul(self, rhs: Self) -> (Self, Self) {
                const HALF: u32 = <$t>::BITS / 2;
                const MASK: $t = <$t>::MAX >> HALF;
                let (a0, a1) = (self & MASK, self >> HALF);
                let (b0, b1) = (rhs & MASK, rhs >> HALF);
                // Each sum is bounded by (2^H - 1) * 2^H < 2^(2H), so none of
                // these additions can overflow Self.
                let lo_lo = a0 * b0;
                let mid1 = a1 * b0 + (lo_lo >> HALF);
                let mid2 = a0 * b1 + (mid1 & MASK);
                let hi = a1 * b1 + (mid1 >> HALF) + (mid2 >> HALF);
                let lo = (mid2 << HALF) | (lo_lo & MASK);
                (lo, hi)
            }

            fn carrying_mul(self, rhs: Self, carry: Self) -> (Self, Self) {
                let (lo, hi) = self.widening_mul(rhs);
                let (lo, overflowed) = lo.overflowing_add(carry);
                (lo, hi + overflowed as $t)
            }

            fn wide_product(self, rhs: Self) -> Self::Wide {
                (self as $wide) * (rhs as $wide)
            }

            fn wide_of(self) -> Self::Wide {
                self as $wide
            }

            fn combine(lo: Self, hi: Self) -> Self::Wide {
                ((hi as $wide) << <$t>::BITS) | (lo as $wide)
            }
        }
    )*};
}

impl_widening!(u8 => u16, u16 => u32, u32 => u64, u64 => u128);

macro_rules! impl_scalar_float {
    ($($t:ty => $bits:ty),* $(,)?) => {$(
        impl Scalar for $t {
            const NAME: &'static str = stringify!($t);
            const KEY_MAX: u128 = <$bits>::MAX as u128;

            fn to_key(self) -> u128 {
                // Total-order bit trick: negative values (and negative NaN
                // payloads) map below positives; adjacent keys are adjacent
                // representable values.
                const SIGN: $bits = 1 << (<$bits>::BITS - 1);
                let bits = self.to_bits();
                let key = if bits & SIGN != 0 { !bits } else { bits | SIGN };
                key as u128
            }

            fn from_key(key: u128) -> Self {
                const SIGN: $bits = 1 << (<$bits>::BITS - 1);
                let key = key as $bits;
                let bits = if key & SIGN != 0 { key ^ SIGN } else { !key };
                <$t>::from_bits(bits)
            }
        }

        impl VerifiedFloat for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const INFINITY: Self = <$t>::INFINITY;
            const NEG_INFINITY: Self = <$t>::NEG_INFINITY;

            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }
        }
    )*};
}

impl_scalar_float!(f32 => u32, f64 => u64);

macro_rules! impl_trunc {
    ($f:ty => $($t:ty),* $(,)?) => {$(
        impl TruncFrom<$f> for $t {
            unsafe fn trunc_unchecked(value: $f) -> Self {
                unsafe { value.to_int_unchecked::<$t>() }
            }

            fn in_range(value: $f) -> bool {
                const LO: $f = <$t>::MIN as $f - 1.0;
                const HI: $f = <$t>::MAX as $f + 1.0;
                value.is_finite() && value > LO && value < HI
            }

            fn cast_trunc(value: $f) -> Self {
                value as $t
            }

            fn range_bounds() -> ($f, $f) {
                (<$t>::MIN as $f - 1.0, <$t>::MAX as $f + 1.0)
            }
        }
    )*};
}

impl_trunc!(f32 => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_trunc!(f64 => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
