//! Smooth cubic bezier curves through a sequence of anchor points
//!
//! Each segment `i` of the curve is a cubic `anchor[i], handle1[i], handle2[i], anchor[i + 1]`.
//! Handles are chosen so that first and second derivatives are continuous at every
//! interior anchor. Open curves have zero second derivative at both ends, closed curves
//! (first anchor equal to the last one) are smooth across the seam instead.
//!
//! Reference: <https://www.particleincell.com/2012/bezier-splines/>
use crate::{BandedMatrix, Cubic, Error, Matrix, Point, Scalar};

/// Default maximum distance between first and last anchors of a closed curve
///
/// Zero means first and last anchors have to be exactly equal.
pub const CLOSED_THRESHOLD: Scalar = 0.0;

/// Handle points `(handles1, handles2)` of each curve segment
pub type HandlePoints<const D: usize> = (Vec<Point<D>>, Vec<Point<D>>);

/// Smooth curve fitting options
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmoothConfig {
    /// Curve is closed if distance between its first and last anchors does not exceed this value
    pub closed_threshold: Scalar,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            closed_threshold: CLOSED_THRESHOLD,
        }
    }
}

impl SmoothConfig {
    /// Check if first and last anchors are close enough to treat the curve as closed
    pub fn is_closed<const D: usize>(&self, points: &[Point<D>]) -> bool {
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => first.dist(*last) <= self.closed_threshold,
            _ => false,
        }
    }
}

/// Check if the curve through `points` is closed, with the default threshold
pub fn is_closed<const D: usize>(points: &[Point<D>]) -> bool {
    SmoothConfig::default().is_closed(points)
}

/// Find handle points of the smooth curve passing through `points`
///
/// Returns two sequences with one point per segment, both empty if there are
/// less than two anchors.
pub fn get_smooth_handle_points<const D: usize>(
    points: &[Point<D>],
) -> Result<HandlePoints<D>, Error> {
    get_smooth_handle_points_with(points, &SmoothConfig::default())
}

/// Same as `get_smooth_handle_points` but with explicit configuration
pub fn get_smooth_handle_points_with<const D: usize>(
    points: &[Point<D>],
    config: &SmoothConfig,
) -> Result<HandlePoints<D>, Error> {
    let count = points.len().saturating_sub(1);
    if count < 1 {
        return Ok((Vec::new(), Vec::new()));
    }
    let closed = config.is_closed(points);
    tracing::debug_span!("[smooth_handles]", anchors = points.len(), closed).in_scope(|| {
        let band = handles_band(count);
        let mut rhs = handles_rhs(points);
        let solved = if closed {
            tracing::trace!("[smooth_handles] closed curve, dense solve");
            let matrix = closed_handles_matrix(&band);
            rhs[0] = 2.0 * points[0];
            rhs[2 * count - 1] = Point::zero();
            solve_columns(&rhs, |column| matrix.solve(column))?
        } else {
            tracing::trace!("[smooth_handles] open curve, banded solve");
            solve_columns(&rhs, |column| band.solve(column))?
        };
        let handles1: Vec<Point<D>> = solved.iter().step_by(2).copied().collect();
        let handles2: Vec<Point<D>> = solved.iter().skip(1).step_by(2).copied().collect();
        Ok((handles1, handles2))
    })
}

/// Cubic segments of the smooth curve passing through `points`
pub fn smooth_cubics<const D: usize>(points: &[Point<D>]) -> Result<Vec<Cubic<D>>, Error> {
    let (handles1, handles2) = get_smooth_handle_points(points)?;
    let cubics = points
        .windows(2)
        .zip(handles1.into_iter().zip(handles2))
        .map(|(anchors, (h1, h2))| Cubic([anchors[0], h1, h2, anchors[1]]))
        .collect();
    Ok(cubics)
}

/// System matrix for `count` segments of an open curve
///
/// Unknowns are interleaved `[h1[0], h2[0], h1[1], h2[1], ...]`, rows are:
///  - first: `2 * h1[0] - h2[0] = p[0]`
///  - odd `2k + 1`: `h2[k] + h1[k + 1] = 2 * p[k + 1]` (first derivative)
///  - even `2k + 2`: `h1[k] - 2 * h2[k] + 2 * h1[k + 1] - h2[k + 1] = 0` (second derivative)
///  - last: `2 * h2[n - 1] - h1[n - 1] = p[n]`
fn handles_band(count: usize) -> BandedMatrix {
    let size = 2 * count;
    let mut band = BandedMatrix::new(2, 1, size);
    for (col, value) in band.band_mut(0).iter_mut().enumerate().skip(1) {
        *value = if col % 2 == 1 { -1.0 } else { 1.0 };
    }
    for (col, value) in band.band_mut(1).iter_mut().enumerate() {
        *value = if col % 2 == 0 { 2.0 } else { 1.0 };
    }
    for value in band.band_mut(2)[..size - 2].iter_mut().skip(1).step_by(2) {
        *value = -2.0;
    }
    for value in band.band_mut(3)[..size.saturating_sub(3)].iter_mut().step_by(2) {
        *value = 1.0;
    }
    band.band_mut(2)[size - 2] = -1.0;
    band.band_mut(1)[size - 1] = 2.0;
    band
}

/// Replace end conditions of the open curve system with seam conditions
///
///  - first: `h1[0] + h2[n - 1] = 2 * p[0]` (first derivative)
///  - last: `2 * h1[0] - h2[0] + h1[n - 1] - 2 * h2[n - 1] = 0` (second derivative)
fn closed_handles_matrix(band: &BandedMatrix) -> Matrix {
    let mut matrix = band.to_dense();
    let last = matrix.size() - 1;
    // with a single segment columns overlap, later assignment wins
    for (col, value) in [(0, 2.0), (1, -1.0), (last - 1, 1.0), (last, -2.0)] {
        matrix[(last, col)] = value;
    }
    matrix.row_mut(0).fill(0.0);
    matrix[(0, 0)] = 1.0;
    matrix[(0, last)] = 1.0;
    matrix
}

/// Right hand side of the open curve system, one column per coordinate
fn handles_rhs<const D: usize>(points: &[Point<D>]) -> Vec<Point<D>> {
    let count = points.len() - 1;
    let mut rhs = vec![Point::zero(); 2 * count];
    for (value, point) in rhs.iter_mut().skip(1).step_by(2).zip(&points[1..]) {
        *value = 2.0 * point;
    }
    rhs[0] = points[0];
    rhs[2 * count - 1] = points[count];
    rhs
}

/// Solve the system independently for every coordinate column of `rhs`
fn solve_columns<const D: usize>(
    rhs: &[Point<D>],
    solve: impl Fn(&[Scalar]) -> Result<Vec<Scalar>, Error>,
) -> Result<Vec<Point<D>>, Error> {
    let mut solved = vec![Point::zero(); rhs.len()];
    if D == 0 {
        return Ok(solved);
    }
    let coords: &[Scalar] = bytemuck::cast_slice(rhs);
    for dim in 0..D {
        let column: Vec<Scalar> = coords.iter().skip(dim).step_by(D).copied().collect();
        for (point, value) in solved.iter_mut().zip(solve(&column)?) {
            point.0[dim] = value;
        }
    }
    Ok(solved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Curve, Point2, Point3, assert_point_approx_eq};
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn assert_points_approx_eq<const D: usize>(ps0: &[Point<D>], ps1: &[Point<D>]) {
        assert_eq!(ps0.len(), ps1.len());
        for (p0, p1) in ps0.iter().zip(ps1) {
            assert_point_approx_eq!(*p0, *p1);
        }
    }

    fn square() -> Vec<Point2> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_degenerate() -> Result<(), Error> {
        init_tracing();
        let (h1, h2) = get_smooth_handle_points::<2>(&[])?;
        assert!(h1.is_empty() && h2.is_empty());
        let (h1, h2) = get_smooth_handle_points(&[Point3::from((1.0, 2.0, 3.0))])?;
        assert!(h1.is_empty() && h2.is_empty());
        assert!(smooth_cubics::<2>(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_single_segment() -> Result<(), Error> {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(3.0, 6.0);
        let (h1, h2) = get_smooth_handle_points(&[p0, p1])?;
        assert_points_approx_eq(&h1, &[Point::new(1.0, 2.0)]);
        assert_points_approx_eq(&h2, &[Point::new(2.0, 4.0)]);
        Ok(())
    }

    #[test]
    fn test_collinear() -> Result<(), Error> {
        init_tracing();
        let step = Point3::from((1.0, 2.0, -0.5));
        let origin = Point3::from((-1.0, 0.0, 4.0));
        let points: Vec<_> = (0..6).map(|i| origin + (i as Scalar) * step).collect();
        let (h1, h2) = get_smooth_handle_points(&points)?;
        assert_eq!(h1.len(), 5);
        assert_eq!(h2.len(), 5);
        for (i, point) in points[..5].iter().enumerate() {
            assert_point_approx_eq!(h1[i], *point + step / 3.0);
            assert_point_approx_eq!(h2[i], *point + 2.0 * step / 3.0);
        }
        Ok(())
    }

    #[test]
    fn test_open() -> Result<(), Error> {
        init_tracing();
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 3.0),
            Point::new(4.0, 0.0),
        ];
        assert!(!is_closed(&points));
        let (h1, h2) = get_smooth_handle_points(&points)?;
        let expected1 = [
            Point::new(2.0 / 9.0, 2.0 / 3.0),
            Point::new(14.0 / 9.0, 8.0 / 3.0),
            Point::new(32.0 / 9.0, 8.0 / 3.0),
        ];
        let expected2 = [
            Point::new(4.0 / 9.0, 4.0 / 3.0),
            Point::new(22.0 / 9.0, 10.0 / 3.0),
            Point::new(34.0 / 9.0, 4.0 / 3.0),
        ];
        assert_points_approx_eq(&h1, &expected1);
        assert_points_approx_eq(&h2, &expected2);

        // natural end conditions, zero second derivative at both ends
        let n = h1.len();
        assert_point_approx_eq!(points[0] - 2.0 * h1[0] + h2[0], Point::zero());
        assert_point_approx_eq!(h1[n - 1] - 2.0 * h2[n - 1] + points[n], Point::zero());
        Ok(())
    }

    #[test]
    fn test_continuity() -> Result<(), Error> {
        init_tracing();
        let points = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 5.0),
            Point::new(3.0, -1.0),
            Point::new(7.0, 4.0),
            Point::new(8.0, 8.0),
            Point::new(12.0, 0.0),
            Point::new(9.0, -3.0),
        ];
        let (h1, h2) = get_smooth_handle_points(&points)?;
        for k in 0..h1.len() - 1 {
            // first derivative
            assert_point_approx_eq!(h2[k] + h1[k + 1], 2.0 * points[k + 1]);
            // second derivative
            assert_point_approx_eq!(
                h1[k] - 2.0 * h2[k] + 2.0 * h1[k + 1] - h2[k + 1],
                Point::zero()
            );
        }

        // banded solution agrees with the dense one
        let band = handles_band(h1.len());
        let dense = band.to_dense();
        let rhs = handles_rhs(&points);
        let banded = solve_columns(&rhs, |column| band.solve(column))?;
        let general = solve_columns(&rhs, |column| dense.solve(column))?;
        assert_points_approx_eq(&banded, &general);
        Ok(())
    }

    #[test]
    fn test_closed() -> Result<(), Error> {
        init_tracing();
        let points = square();
        assert!(is_closed(&points));
        let (h1, h2) = get_smooth_handle_points(&points)?;
        let expected1 = [
            Point::new(0.25, -0.25),
            Point::new(1.25, 0.25),
            Point::new(0.75, 1.25),
            Point::new(-0.25, 0.75),
        ];
        let expected2 = [
            Point::new(0.75, -0.25),
            Point::new(1.25, 0.75),
            Point::new(0.25, 1.25),
            Point::new(-0.25, 0.25),
        ];
        assert_points_approx_eq(&h1, &expected1);
        assert_points_approx_eq(&h2, &expected2);

        // smooth across the seam
        let n = h1.len();
        assert_point_approx_eq!(h1[0] + h2[n - 1], 2.0 * points[0]);
        assert_point_approx_eq!(
            2.0 * h1[0] - h2[0] + h1[n - 1] - 2.0 * h2[n - 1],
            Point::zero()
        );
        Ok(())
    }

    #[test]
    fn test_closed_threshold() -> Result<(), Error> {
        let mut points = square();
        points[4] = Point::new(1e-9, 0.0);
        assert!(!is_closed(&points));
        assert!(!is_closed::<2>(&[]));

        let config = SmoothConfig {
            closed_threshold: 1e-6,
        };
        assert!(config.is_closed(&points));
        let (h1, h2) = get_smooth_handle_points_with(&points, &config)?;
        let n = h1.len();
        assert_point_approx_eq!(h1[0] + h2[n - 1], 2.0 * points[0]);

        // default threshold treats it as open, ends have zero curvature
        let (h1, h2) = get_smooth_handle_points(&points)?;
        assert_point_approx_eq!(points[0] - 2.0 * h1[0] + h2[0], Point::zero());
        Ok(())
    }

    #[test]
    fn test_smooth_cubics() -> Result<(), Error> {
        init_tracing();
        let points = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 5.0),
            Point::new(3.0, -1.0),
            Point::new(7.0, 4.0),
        ];
        let cubics = smooth_cubics(&points)?;
        assert_eq!(cubics.len(), 3);
        for (cubic, anchors) in cubics.iter().zip(points.windows(2)) {
            assert_eq!(cubic.start(), anchors[0]);
            assert_eq!(cubic.end(), anchors[1]);
        }
        for pair in cubics.windows(2) {
            assert_point_approx_eq!(pair[0].smooth(), pair[1].points()[1]);
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde() -> Result<(), serde_json::Error> {
        let config: SmoothConfig = serde_json::from_str(r#"{"closed_threshold": 0.001}"#)?;
        assert_eq!(config.closed_threshold, 0.001);
        let json = serde_json::to_string(&SmoothConfig::default())?;
        assert_eq!(json, r#"{"closed_threshold":0.0}"#);
        Ok(())
    }
}
