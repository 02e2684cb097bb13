//! Utility functions and types used accross the library
use crate::{Scalar, Vector};
use std::ops::Mul;

/// Restrict value to the `[lower, upper]` interval
///
/// Bounds are checked in order, so if `lower > upper` the result is whichever
/// bound is violated first.
#[inline]
pub fn clamp<T>(lower: T, upper: T, val: T) -> T
where
    T: PartialOrd,
{
    if val < lower {
        lower
    } else if val > upper {
        upper
    } else {
        val
    }
}

/// Binomial coefficient `n! / (k! * (n - k)!)`, zero if `k > n`
///
/// Saturates at `u64::MAX` when the coefficient does not fit.
pub fn choose(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    // every partial product is itself a binomial coefficient, division is exact
    let mut acc: u128 = 1;
    for i in 1..=k {
        let Some(prod) = acc.checked_mul((n + 1 - i) as u128) else {
            return u64::MAX;
        };
        acc = prod / i as u128;
    }
    u64::try_from(acc).unwrap_or(u64::MAX)
}

/// Linear interpolation `(1 - alpha) * start + alpha * end`
///
/// `alpha` is not restricted to `[0, 1]`, values outside extrapolate. It can be
/// a scalar or, for points, a per-coordinate vector.
#[inline]
pub fn interpolate<V: Vector>(start: V, end: V, alpha: impl Into<V>) -> V {
    let alpha = alpha.into();
    (V::from(1.0) - alpha) * start + alpha * end
}

/// Middle point between `start` and `end`
#[inline]
pub fn mid<V: Vector>(start: V, end: V) -> V {
    (start + end).scale(0.5)
}

/// Find `alpha` such that `interpolate(start, end, alpha) == value`
///
/// Division is elementwise, degenerate range `start == end` produces `inf` or `NaN`.
#[inline]
pub fn inverse_interpolate<V: Vector>(start: V, end: V, value: V) -> V {
    (value - start) / (end - start)
}

/// Map `old_value` from `[old_start, old_end]` range to `[new_start, new_end]` range
#[inline]
pub fn match_interpolate<V: Vector>(
    new_start: V,
    new_end: V,
    old_start: V,
    old_end: V,
    old_value: V,
) -> V {
    interpolate(
        new_start,
        new_end,
        inverse_interpolate(old_start, old_end, old_value),
    )
}

/// Sqaure 4x4 matrix
#[derive(Debug, Clone, Copy)]
pub(crate) struct M4x4(pub [Scalar; 16]);

impl Mul<M4x4> for M4x4 {
    type Output = M4x4;

    fn mul(self, other: Self) -> Self::Output {
        let M4x4(a) = self;
        let M4x4(b) = other;
        let mut out = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    out[k + 4 * i] += a[j + 4 * i] * b[k + 4 * j];
                }
            }
        }
        M4x4(out)
    }
}
