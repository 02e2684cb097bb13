use bytemuck::{Pod, Zeroable};
use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

pub type Scalar = f64;
pub const EPSILON: f64 = f64::EPSILON;

/// Format floats in a compact way
pub fn scalar_fmt(f: &mut fmt::Formatter<'_>, value: Scalar) -> fmt::Result {
    let value_abs = value.abs();
    if !value.is_finite() {
        write!(f, "{}", value)
    } else if value_abs.fract() < EPSILON {
        write!(f, "{}", value.trunc() as i64)
    } else if value_abs > 9999.0 || value_abs <= 0.0001 {
        write!(f, "{:.3e}", value)
    } else {
        let ten: Scalar = 10.0;
        let round = ten.powi(6 - (value_abs.trunc() + 1.0).log10().ceil() as i32);
        write!(f, "{}", (value * round).round() / round)
    }
}

/// Anything that can be interpolated, evaluated on a bezier curve or subdivided.
///
/// Implemented for plain scalars and for points of any dimension, arithmetic
/// is elementwise and a scalar converts into a vector by broadcasting.
pub trait Vector:
    Copy
    + From<Scalar>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Multiply every component by `factor`
    fn scale(self, factor: Scalar) -> Self;
}

impl Vector for Scalar {
    #[inline]
    fn scale(self, factor: Scalar) -> Self {
        self * factor
    }
}

/// Value representing a point or a vector in `D` dimensional space.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq)]
pub struct Point<const D: usize>(pub [Scalar; D]);

pub type Point2 = Point<2>;
pub type Point3 = Point<3>;

// SAFETY: transparent wrapper around an array of `f64`
unsafe impl<const D: usize> Zeroable for Point<D> {}
unsafe impl<const D: usize> Pod for Point<D> {}

impl<const D: usize> fmt::Debug for Point<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.0.iter().enumerate() {
            if index != 0 {
                write!(f, ",")?;
            }
            scalar_fmt(f, *value)?;
        }
        Ok(())
    }
}

impl<const D: usize> Default for Point<D> {
    fn default() -> Self {
        Self::zero()
    }
}

impl Point<2> {
    #[inline]
    pub fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    /// Get `x` component of the point
    #[inline]
    pub fn x(self) -> Scalar {
        self.0[0]
    }

    /// Get `y` compenent of the point
    #[inline]
    pub fn y(self) -> Scalar {
        self.0[1]
    }
}

impl<const D: usize> Point<D> {
    /// Point at the origin
    #[inline]
    pub fn zero() -> Self {
        Self([0.0; D])
    }

    /// Number of coordinates
    #[inline]
    pub fn dim(&self) -> usize {
        D
    }

    /// Coordinates of the point
    #[inline]
    pub fn coords(&self) -> [Scalar; D] {
        self.0
    }

    /// Get length of the vector (distance from the origin)
    pub fn length(self) -> Scalar {
        self.dot(self).sqrt()
    }

    /// Distance between two points
    pub fn dist(self, other: Self) -> Scalar {
        (self - other).length()
    }

    /// Dot product between two vectors
    pub fn dot(self, other: Self) -> Scalar {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Determine if self is close to the other within the marging of error (EPSILON)
    pub fn is_close_to(self, other: Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() < EPSILON)
    }

    #[inline]
    fn map(self, f: impl Fn(Scalar) -> Scalar) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i])))
    }

    #[inline]
    fn zip_with(self, other: Self, f: impl Fn(Scalar, Scalar) -> Scalar) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], other.0[i])))
    }
}

impl<const D: usize> Vector for Point<D> {
    #[inline]
    fn scale(self, factor: Scalar) -> Self {
        self.map(|v| v * factor)
    }
}

impl From<(Scalar, Scalar)> for Point<2> {
    #[inline]
    fn from(xy: (Scalar, Scalar)) -> Self {
        Self([xy.0, xy.1])
    }
}

impl From<(Scalar, Scalar, Scalar)> for Point<3> {
    #[inline]
    fn from(xyz: (Scalar, Scalar, Scalar)) -> Self {
        Self([xyz.0, xyz.1, xyz.2])
    }
}

impl<const D: usize> From<[Scalar; D]> for Point<D> {
    #[inline]
    fn from(coords: [Scalar; D]) -> Self {
        Self(coords)
    }
}

/// Broadcast scalar to all coordinates
impl<const D: usize> From<Scalar> for Point<D> {
    #[inline]
    fn from(value: Scalar) -> Self {
        Self([value; D])
    }
}

impl<const D: usize> Mul<&Point<D>> for Scalar {
    type Output = Point<D>;

    #[inline]
    fn mul(self, other: &Point<D>) -> Self::Output {
        other.scale(self)
    }
}

impl<const D: usize> Mul<Point<D>> for Scalar {
    type Output = Point<D>;

    #[inline]
    fn mul(self, other: Point<D>) -> Self::Output {
        other.scale(self)
    }
}

impl<const D: usize> Div<Scalar> for Point<D> {
    type Output = Point<D>;

    #[inline]
    fn div(self, rhs: Scalar) -> Self::Output {
        self.map(|v| v / rhs)
    }
}

impl<const D: usize> Add for Point<D> {
    type Output = Point<D>;

    #[inline]
    fn add(self, other: Point<D>) -> Self::Output {
        self.zip_with(other, |a, b| a + b)
    }
}

impl<const D: usize> Sub for Point<D> {
    type Output = Point<D>;

    #[inline]
    fn sub(self, other: Point<D>) -> Self::Output {
        self.zip_with(other, |a, b| a - b)
    }
}

impl<const D: usize> Mul for Point<D> {
    type Output = Point<D>;

    #[inline]
    fn mul(self, other: Point<D>) -> Self::Output {
        self.zip_with(other, |a, b| a * b)
    }
}

/// Elementwise division, zero denominators produce `inf` or `NaN`
impl<const D: usize> Div for Point<D> {
    type Output = Point<D>;

    #[inline]
    fn div(self, other: Point<D>) -> Self::Output {
        self.zip_with(other, |a, b| a / b)
    }
}

impl<const D: usize> Neg for Point<D> {
    type Output = Point<D>;

    #[inline]
    fn neg(self) -> Self::Output {
        self.map(|v| -v)
    }
}

#[cfg(feature = "serde")]
impl<const D: usize> serde::Serialize for Point<D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tuple = serializer.serialize_tuple(D)?;
        for value in self.0.iter() {
            tuple.serialize_element(value)?;
        }
        tuple.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, const D: usize> serde::Deserialize<'de> for Point<D> {
    fn deserialize<T>(deserializer: T) -> Result<Self, T::Error>
    where
        T: serde::Deserializer<'de>,
    {
        struct PointVisitor<const D: usize>;

        impl<'de, const D: usize> serde::de::Visitor<'de> for PointVisitor<D> {
            type Value = Point<D>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a sequence of {} numbers", D)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut coords = [0.0; D];
                for (index, coord) in coords.iter_mut().enumerate() {
                    *coord = seq
                        .next_element()?
                        .ok_or_else(|| <A::Error as serde::de::Error>::invalid_length(index, &self))?;
                }
                Ok(Point(coords))
            }
        }

        deserializer.deserialize_tuple(D, PointVisitor::<D>)
    }
}
