//! Recovers a 3D point for a query 2D point
//! known to lie on the same line as two anchors with known 3D
//! correspondences, by linear interpolation along the anchors' dominant
//! 2D axis.

use nalgebra::{Point2, Point3};

use crate::error::{LineError, Result};

/// Interpolates the 3D position of `query_2d` given two 2D/3D anchor
/// correspondences on the same line.
///
/// # Errors
///
/// Returns [`LineError::ZeroLengthAnchor`] if the anchors coincide
/// along the dominant axis, which would make the ratio undefined.
pub fn point2d_to_3d(anchor1_2d: Point2<f64>, anchor1_3d: Point3<f64>, anchor2_2d: Point2<f64>, anchor2_3d: Point3<f64>, query_2d: Point2<f64>) -> Result<Point3<f64>> {
    let dx = anchor2_2d.x - anchor1_2d.x;
    let dy = anchor2_2d.y - anchor1_2d.y;

    let (anchor_span, query_offset) = if dx.abs() >= dy.abs() { (dx, query_2d.x - anchor1_2d.x) } else { (dy, query_2d.y - anchor1_2d.y) };

    if anchor_span == 0.0 {
        return Err(LineError::ZeroLengthAnchor);
    }

    let t = query_offset / anchor_span;
    Ok(anchor1_3d + (anchor2_3d - anchor1_3d) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_midpoint_on_dominant_x_axis() {
        let a1_2d = Point2::new(0.0, 0.0);
        let a1_3d = Point3::new(0.0, 0.0, 10.0);
        let a2_2d = Point2::new(10.0, 0.0);
        let a2_3d = Point3::new(10.0, 0.0, 20.0);
        let query = Point2::new(5.0, 0.0);

        let result = point2d_to_3d(a1_2d, a1_3d, a2_2d, a2_3d, query).unwrap();
        assert!((result.z - 15.0).abs() < 1e-9);
    }

    #[test]
    fn extrapolates_beyond_anchors() {
        let a1_2d = Point2::new(0.0, 0.0);
        let a1_3d = Point3::new(0.0, 0.0, 0.0);
        let a2_2d = Point2::new(10.0, 0.0);
        let a2_3d = Point3::new(10.0, 0.0, 10.0);
        let query = Point2::new(20.0, 0.0);

        let result = point2d_to_3d(a1_2d, a1_3d, a2_2d, a2_3d, query).unwrap();
        assert!((result.z - 20.0).abs() < 1e-9);
    }

    #[test]
    fn uses_dominant_y_axis_when_steeper() {
        let a1_2d = Point2::new(0.0, 0.0);
        let a1_3d = Point3::new(0.0, 0.0, 0.0);
        let a2_2d = Point2::new(1.0, 10.0);
        let a2_3d = Point3::new(5.0, 0.0, 50.0);
        let query = Point2::new(0.5, 5.0);

        let result = point2d_to_3d(a1_2d, a1_3d, a2_2d, a2_3d, query).unwrap();
        assert!((result.z - 25.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_degenerate_anchor_pair() {
        let a = Point2::new(3.0, 4.0);
        let a3d = Point3::new(0.0, 0.0, 0.0);
        let err = point2d_to_3d(a, a3d, a, a3d, a).unwrap_err();
        assert!(matches!(err, LineError::ZeroLengthAnchor));
    }
}
