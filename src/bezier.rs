//! Bezier curves of arbitrary degree
//!
//! Curves are given by their control points, any `Vector` works as a control point
//! so the same code handles scalar curves and curves in any dimension.
use crate::{Cubic, Curve, Point, Scalar, Vector, interpolate};

/// Binomial coefficient as a float, does not overflow for high degree curves
fn binomial(n: usize, k: usize) -> Scalar {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as Scalar / (i + 1) as Scalar)
}

/// Bernstein basis polynomial `C(n, k) * (1 - t) ^ (n - k) * t ^ k`
#[inline]
fn bernstein(n: usize, k: usize, t: Scalar) -> Scalar {
    binomial(n, k) * (1.0 - t).powi((n - k) as i32) * t.powi(k as i32)
}

/// Evaluate bezier curve with control `points` at parameter `t`
///
/// Uses Bernstein form, which loses precision for high degree curves, prefer
/// `de_casteljau` if degree is large. Curve without control points evaluates
/// to zero.
pub fn bezier_at<V: Vector>(points: &[V], t: Scalar) -> V {
    let Some(n) = points.len().checked_sub(1) else {
        return V::from(0.0);
    };
    points
        .iter()
        .enumerate()
        .fold(V::from(0.0), |acc, (k, point)| {
            acc + point.scale(bernstein(n, k, t))
        })
}

/// Bezier curve with control `points` as a function of parameter `t`
pub fn bezier<V: Vector>(points: &[V]) -> impl Fn(Scalar) -> V + '_ {
    move |t| bezier_at(points, t)
}

/// Evaluate bezier curve at parameter `t` with de Casteljau algorithm
pub fn de_casteljau<V: Vector>(points: &[V], t: Scalar) -> V {
    let mut beta = points.to_vec();
    for j in 1..beta.len() {
        for k in 0..beta.len() - j {
            beta[k] = interpolate(beta[k], beta[k + 1], t);
        }
    }
    beta.first().copied().unwrap_or_else(|| V::from(0.0))
}

/// Split bezier curve at parameter `t` into two curves of the same degree
pub fn de_casteljau_split<V: Vector>(points: &[V], t: Scalar) -> (Vec<V>, Vec<V>) {
    let n = points.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut beta = points.to_vec();
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    left.push(beta[0]);
    right.push(beta[n - 1]);
    for j in 1..n {
        for k in 0..n - j {
            beta[k] = interpolate(beta[k], beta[k + 1], t);
        }
        left.push(beta[0]);
        right.push(beta[n - j - 1]);
    }
    right.reverse();
    (left, right)
}

/// Control points of the portion of the curve between parameter values `a` and `b`
///
/// Expects `0 <= a < b <= 1`, this is not checked and other values extrapolate.
/// Result has the same number of points as the input.
pub fn partial_bezier_points<V: Vector>(points: &[V], a: Scalar, b: Scalar) -> Vec<V> {
    // control points of the curve restricted to [a, 1]
    let a_to_1: Vec<V> = (0..points.len())
        .map(|i| bezier_at(&points[i..], a))
        .collect();
    // [a, b] is the prefix [0, (b - a) / (1 - a)] of the [a, 1] curve
    let t = (b - a) / (1.0 - a);
    (0..points.len())
        .map(|i| bezier_at(&a_to_1[..=i], t))
        .collect()
}

/// Bezier curve of arbitrary degree
#[derive(Debug, Clone, PartialEq)]
pub struct Bezier<V> {
    points: Vec<V>,
}

impl<V: Vector> Bezier<V> {
    pub fn new(points: impl IntoIterator<Item = V>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &[V] {
        &self.points
    }

    /// Degree of the curve, number of control points minus one
    pub fn degree(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Derivative with respect to `t`, curve of one degree less
    pub fn deriv(&self) -> Self {
        let n = self.degree();
        if n == 0 {
            return Self::new([V::from(0.0)]);
        }
        Self::new(
            self.points
                .windows(2)
                .map(|pair| (pair[1] - pair[0]).scale(n as Scalar)),
        )
    }
}

impl<V: Vector> Curve for Bezier<V> {
    type Point = V;

    fn start(&self) -> V {
        self.points.first().copied().unwrap_or_else(|| V::from(0.0))
    }

    fn end(&self) -> V {
        self.points.last().copied().unwrap_or_else(|| V::from(0.0))
    }

    fn at(&self, t: Scalar) -> V {
        bezier_at(&self.points, t)
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        let (left, right) = de_casteljau_split(&self.points, t);
        (Self { points: left }, Self { points: right })
    }

    fn cut(&self, a: Scalar, b: Scalar) -> Self {
        Self {
            points: partial_bezier_points(&self.points, a, b),
        }
    }

    fn reverse(&self) -> Self {
        Self::new(self.points.iter().rev().copied())
    }
}

impl<const D: usize> From<Cubic<D>> for Bezier<Point<D>> {
    fn from(cubic: Cubic<D>) -> Self {
        Self::new(cubic.points())
    }
}
