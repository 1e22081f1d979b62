// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric abstraction over `f32`/`f64` extents.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// A floating-point type usable for extents, offsets, and scroll positions.
///
/// Implemented for `f32` and `f64`. Only operations available in `core` are
/// required, so the crate needs neither `std` nor `libm`.
pub trait Scalar:
    Copy
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity.
    fn zero() -> Self;

    /// Converts an item count or index.
    fn from_usize(n: usize) -> Self;

    /// The larger of `self` and `other`; a NaN operand yields the other one.
    #[must_use]
    fn max(self, other: Self) -> Self;

    /// The smaller of `self` and `other`; a NaN operand yields the other one.
    #[must_use]
    fn min(self, other: Self) -> Self;

    /// Returns `true` for negative values, including `-0.0`.
    fn is_sign_negative(self) -> bool;

    /// Returns `true` if the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Rounds toward negative infinity and converts, saturating at the
    /// bounds of `isize`.
    fn floor_to_isize(self) -> isize;
}

macro_rules! impl_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            #[inline(always)]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            #[allow(
                clippy::cast_precision_loss,
                reason = "Item counts stay well inside the exact integer range"
            )]
            fn from_usize(n: usize) -> Self {
                n as $t
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                <$t>::max(self, other)
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                <$t>::min(self, other)
            }

            #[inline]
            fn is_sign_negative(self) -> bool {
                <$t>::is_sign_negative(self)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            #[inline]
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_precision_loss,
                reason = "Float to int casts saturate; the comparison only corrects the rounding direction"
            )]
            fn floor_to_isize(self) -> isize {
                let truncated = self as isize;
                if (truncated as $t) > self {
                    truncated.saturating_sub(1)
                } else {
                    truncated
                }
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);
