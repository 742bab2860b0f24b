//! 3D reconstruction: a rectified-stereo triangulator, a
//! two-view Plücker-intersection triangulator, and the
//! endpoints-to-`Line3D` helper they both build on.

use nalgebra::{Isometry3, Point3, Vector3};

use crate::error::{LineError, Result};
use crate::geom::{sort_points_on_line, Segment2D};
use crate::line3d::Line3D;

const NEAR_ZERO: f64 = 1e-5;
const NEAR_HORIZONTAL_RAD: f64 = 0.087;
const MIN_ENDPOINT_DISTANCE: f64 = 0.01;
const PARALLEL_COS_LIMIT: f64 = 0.9848;

/// Back-projection and disparity-range contract of the stereo rig.
pub trait CameraModel {
    fn min_x_diff(&self) -> f64;
    fn max_x_diff(&self) -> f64;
    /// `(u, v, u_right)` pixel plus matched right-image x -> camera-frame 3D.
    fn back_project_stereo(&self, uv_right: (f64, f64, f64)) -> Point3<f64>;
}

/// A plane in Hessian normal form: points `p` on the plane satisfy
/// `n.dot(p) + d == 0`, with `n` normalized to unit length.
#[derive(Debug, Clone, Copy)]
pub struct Plane3D {
    n: Vector3<f64>,
    d: f64,
}

impl Plane3D {
    /// Builds a plane from a normal and offset, rescaling both so `n` is
    /// unit length and the Hessian-form invariant holds.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::DegenerateNormal`] if `n` is (near) zero.
    pub fn new(n: Vector3<f64>, d: f64) -> Result<Self> {
        let norm = n.norm();
        if norm <= NEAR_ZERO {
            return Err(LineError::DegenerateNormal(norm));
        }
        Ok(Self { n: n / norm, d: d / norm })
    }

    #[must_use]
    pub fn normal(&self) -> Vector3<f64> {
        self.n
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.d
    }
}

/// Triangulates a rectified stereo line pair into 3D world-frame
/// endpoints.
///
/// # Errors
///
/// Returns [`LineError`] for any of the geometric-degeneracy guards in
/// the steps below.
pub fn triangulate_stereo(
    left: &Segment2D,
    right: &Segment2D,
    pose: &Isometry3<f64>,
    camera: &dyn CameraModel,
) -> Result<(Point3<f64>, Point3<f64>)> {
    let (x11, y11, x12, y12) = (left.p1.x, left.p1.y, left.p2.x, left.p2.y);
    let dx = x12 - x11;
    let dy = y12 - y11;

    if dx.abs() <= NEAR_ZERO {
        tracing::debug!(dx, "rejecting stereo pair: left line near-vertical");
        return Err(LineError::NearVertical(dx.abs()));
    }

    let angle = (dy / dx).atan();
    if angle.abs() < NEAR_HORIZONTAL_RAD {
        tracing::debug!(angle, "rejecting stereo pair: left line near-horizontal");
        return Err(LineError::NearHorizontal);
    }

    let k_inv = dx / dy;
    let (x21, y21, x22, y22) = (right.p1.x, right.p1.y, right.p2.x, right.p2.y);
    let x21_left = x11 + k_inv * (y21 - y11);
    let x22_left = x11 + k_inv * (y22 - y11);

    if (x22_left - x21_left).abs() <= NEAR_ZERO {
        return Err(LineError::ProjectedNearVertical((x22_left - x21_left).abs()));
    }

    #[derive(Clone, Copy)]
    struct Candidate {
        x: f64,
        y: f64,
    }
    let candidates = [
        Candidate { x: x11, y: y11 },
        Candidate { x: x12, y: y12 },
        Candidate { x: x21_left, y: y21 },
        Candidate { x: x22_left, y: y22 },
    ];
    let xs: Vec<_> = candidates.iter().map(|c| nalgebra::Point2::new(c.x, c.y)).collect();
    let order = sort_points_on_line(&xs, true);
    let lo = candidates[order[0]];
    let hi = candidates[order[order.len() - 1]];

    let back_project_one = |c: Candidate| -> Result<Point3<f64>> {
        let t = (c.x - x21_left) / (x22_left - x21_left);
        let right_x = x21 + t * (x22 - x21);
        let disparity = c.x - right_x;
        if disparity < camera.min_x_diff() || disparity > camera.max_x_diff() {
            return Err(LineError::DisparityOutOfRange {
                disparity,
                min: camera.min_x_diff(),
                max: camera.max_x_diff(),
            });
        }
        let camera_point = camera.back_project_stereo((c.x, c.y, right_x));
        Ok(pose * camera_point)
    };

    let p1 = back_project_one(lo)?;
    let p2 = back_project_one(hi)?;
    Ok((p1, p2))
}

/// Triangulates a 3D [`Line3D`] from two 2D line observations in
/// different camera frames via plane intersection, using line B's
/// endpoints (not line A's again) to build plane 2.
///
/// # Errors
///
/// Returns [`LineError::PlanesTooParallel`] when the two observation
/// planes are within ~10 degrees of coplanar.
pub fn triangulate_two_frame(line_a: &Segment2D, pose_a: &Isometry3<f64>, line_b: &Segment2D, pose_b: &Isometry3<f64>) -> Result<Line3D> {
    let relative = pose_a.inverse() * pose_b;
    let r12 = relative.rotation;
    let t12 = relative.translation.vector;

    let p1 = Vector3::new(line_a.p1.x, line_a.p1.y, 1.0);
    let p2 = Vector3::new(line_a.p2.x, line_a.p2.y, 1.0);
    let n1 = p1.cross(&p2);
    let d1 = -n1.dot(&p1);
    let plane1 = Plane3D::new(n1, d1)?;

    let q1 = Vector3::new(line_b.p1.x, line_b.p1.y, 1.0);
    let q2 = Vector3::new(line_b.p2.x, line_b.p2.y, 1.0);
    let q1_a = r12 * q1 + t12;
    let q2_a = r12 * q2 + t12;
    let n2 = (q1_a - t12).cross(&(q2_a - t12));
    let d2 = -n2.dot(&t12);
    let plane2 = Plane3D::new(n2, d2)?;

    let cos_angle = plane1.normal().dot(&plane2.normal());
    if cos_angle.abs() > PARALLEL_COS_LIMIT {
        tracing::debug!(cos_angle, "rejecting two-view pair: observation planes too parallel");
        return Err(LineError::PlanesTooParallel(cos_angle.abs()));
    }

    let direction = plane1.normal().cross(&plane2.normal());
    let moment = plane1.normal() * plane2.offset() - plane2.normal() * plane1.offset();
    let mut line = Line3D::from_raw(direction, moment);
    line.normalize();
    Ok(line)
}

/// Builds a normalized [`Line3D`] from two 3D endpoints.
///
/// # Errors
///
/// Returns [`LineError::ZeroLengthEndpoints`] if the endpoints are
/// closer than the minimum separation.
pub fn line3d_from_endpoints(p1: Point3<f64>, p2: Point3<f64>) -> Result<Line3D> {
    let distance = (p2 - p1).norm();
    if distance < MIN_ENDPOINT_DISTANCE {
        return Err(LineError::ZeroLengthEndpoints(distance));
    }
    let mut line = Line3D::from_two_points(p1, p2);
    line.normalize();
    Ok(line)
}
