//! Smooth bezier curves through a sequence of points, and the primitives to work with them.
//!
//! Main features:
//!  - Smooth handle points for piecewise cubic curves through anchors (open and closed)
//!  - Bezier curve evaluation of arbitrary degree
//!  - Sub-curve extraction and subdivision
//!  - Linear interpolation helpers over scalars and points of any dimension
//!
#![deny(warnings)]

mod bezier;
mod curve;
mod geometry;
mod linalg;
mod smooth;
mod utils;

pub use bezier::{
    Bezier, bezier, bezier_at, de_casteljau, de_casteljau_split, partial_bezier_points,
};
pub use curve::{Cubic, Curve};
pub use geometry::{EPSILON, Point, Point2, Point3, Scalar, Vector, scalar_fmt};
pub use linalg::{BandedMatrix, Error, Matrix, diag_to_matrix};
pub use smooth::{
    CLOSED_THRESHOLD, HandlePoints, SmoothConfig, get_smooth_handle_points,
    get_smooth_handle_points_with, is_closed, smooth_cubics,
};
pub use utils::{choose, clamp, inverse_interpolate, interpolate, match_interpolate, mid};
use utils::M4x4;
