//! Curve trait and cubic bezier segments

use crate::{M4x4, Point, Scalar, interpolate};
use std::fmt;

/// Set of operations common to all bezier curves.
pub trait Curve: Sized {
    /// Type of the points the curve passes through
    type Point;

    /// Point at which curve starts
    fn start(&self) -> Self::Point;

    /// Point at which curve ends
    fn end(&self) -> Self::Point;

    /// Evaluate curve at parameter value `t` in (0.0..=1.0)
    fn at(&self, t: Scalar) -> Self::Point;

    /// Split the curve in half, same as `Curve::split_at(0.5)`
    fn split(&self) -> (Self, Self) {
        self.split_at(0.5)
    }

    /// Split the curve at prameter value `t`
    fn split_at(&self, t: Scalar) -> (Self, Self);

    /// Create subcurve specified starting at parameter value `a` and ending at value `b`
    fn cut(&self, a: Scalar, b: Scalar) -> Self;

    /// Identical curve but directed from end to start, instead of start to end.
    fn reverse(&self) -> Self;
}

/// Matrix form for cubic bezier curve
#[rustfmt::skip]
const C: M4x4 = M4x4([
    1.0,  0.0,  0.0, 0.0,
   -3.0,  3.0,  0.0, 0.0,
    3.0, -6.0,  3.0, 0.0,
   -1.0,  3.0, -3.0, 1.0,
]);

/// Inverted matrix form for cubic bezier curve
#[rustfmt::skip]
const CI: M4x4 = M4x4([
    1.0, 0.0      , 0.0      , 0.0,
    1.0, 1.0 / 3.0, 0.0      , 0.0,
    1.0, 2.0 / 3.0, 1.0 / 3.0, 0.0,
    1.0, 1.0      , 1.0      , 1.0,
]);

/// Cubic bezier curve
///
/// Polynimial form:
/// `(1 - t) ^ 3 * p0 + 3 * (1 - t) ^ 2 * t * p1 + 3 * (1 - t) * t ^ 2 * p2 + t ^ 3 * p3`
/// Matrix from:
///                 ┌             ┐ ┌    ┐
/// ┌             ┐ │  1  0  0  0 │ │ p0 │
/// │ 1 t t^2 t^3 │ │ -3  3  0  0 │ │ p1 │
/// └             ┘ │  3 -6  3  0 │ │ p2 │
///                 │ -1  3 -3  1 │ │ p3 │
///                 └             ┘ └    ┘
///
/// Segments produced by the smooth curve fit are cubics with anchors at `p0`, `p3`
/// and handles at `p1`, `p2`.
#[derive(Clone, Copy, PartialEq)]
pub struct Cubic<const D: usize>(pub [Point<D>; 4]);

impl<const D: usize> fmt::Debug for Cubic<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cubic([p0, p1, p2, p3]) = self;
        write!(f, "Cubic {:?} {:?} {:?} {:?}", p0, p1, p2, p3)
    }
}

impl<const D: usize> Cubic<D> {
    pub fn new(
        p0: impl Into<Point<D>>,
        p1: impl Into<Point<D>>,
        p2: impl Into<Point<D>>,
        p3: impl Into<Point<D>>,
    ) -> Self {
        Self([p0.into(), p1.into(), p2.into(), p3.into()])
    }

    pub fn points(&self) -> [Point<D>; 4] {
        self.0
    }

    /// Reflection of the second handle over the end point, first handle of
    /// the following segment that keeps the joint smooth
    pub fn smooth(&self) -> Point<D> {
        let Cubic([_p0, _p1, p2, p3]) = self;
        2.0 * p3 - *p2
    }
}

/// Cubic Bernstein basis at `t`, weights of `p0..p3`
fn cubic_weights(t: Scalar) -> [Scalar; 4] {
    let s = 1.0 - t;
    [s * s * s, 3.0 * s * s * t, 3.0 * s * t * t, t * t * t]
}

impl<const D: usize> Curve for Cubic<D> {
    type Point = Point<D>;

    fn start(&self) -> Point<D> {
        self.0[0]
    }

    fn end(&self) -> Point<D> {
        self.0[3]
    }

    fn at(&self, t: Scalar) -> Point<D> {
        let [w0, w1, w2, w3] = cubic_weights(t);
        let Self([p0, p1, p2, p3]) = self;
        w0 * p0 + w1 * p1 + w2 * p2 + w3 * p3
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        // de Casteljau levels, the last one is the point on the curve
        let Self([p0, p1, p2, p3]) = *self;
        let (q0, q1, q2) = (
            interpolate(p0, p1, t),
            interpolate(p1, p2, t),
            interpolate(p2, p3, t),
        );
        let (r0, r1) = (interpolate(q0, q1, t), interpolate(q1, q2, t));
        let at = interpolate(r0, r1, t);
        (Self([p0, q0, r0, at]), Self([at, r1, q2, p3]))
    }

    fn cut(&self, a: Scalar, b: Scalar) -> Self {
        // Given curve as C(t) = [1 t t^2 t^3] M C
        // we can change parameter t -> a + (b - a) * t which will produced desired curve
        // it is possible to decompose it as
        //                 ┌                                       ┐
        // ┌             ┐ │  1  a       a^2         a^3           │
        // │ 1 t t^2 t^3 │ │  0  (b - a) 2*a*(b - a) 3*a^2*(b - a) │ = [1 t t^2 t^3] T
        // └             ┘ │  0  0       (b - a)^2   3*a*(b - a)^2 │
        //                 │  0  0       0           (b - a)^3     │
        //                 └                                       ┘
        // we can convert it back to desired curve by C[a, b](t) = [1 t t^2 t^3] C (CI T C) P
        let Self([p0, p1, p2, p3]) = self;
        let ba = b - a;
        #[rustfmt::skip]
        let t = M4x4([
            1.0, a  , a * a       , a * a * a        ,
            0.0, ba , 2.0 * a * ba, 3.0 * a * a * ba ,
            0.0, 0.0, ba * ba     , 3.0 * a * ba * ba,
            0.0, 0.0, 0.0         , ba * ba * ba     ,
        ]);
        #[rustfmt::skip]
        let M4x4([
            m00, m01, m02, m03,
            m10, m11, m12, m13,
            m20, m21, m22, m23,
            m30, m31, m32, m33,
        ]) = CI * t * C;
        let c0 = m00 * p0 + m01 * p1 + m02 * p2 + m03 * p3;
        let c1 = m10 * p0 + m11 * p1 + m12 * p2 + m13 * p3;
        let c2 = m20 * p0 + m21 * p1 + m22 * p2 + m23 * p3;
        let c3 = m30 * p0 + m31 * p1 + m32 * p2 + m33 * p3;
        Self([c0, c1, c2, c3])
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1, p2, p3]) = *self;
        Self([p3, p2, p1, p0])
    }
}
