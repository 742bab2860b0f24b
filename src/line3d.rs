//! `Line3D`: a 3D line stored as a Plücker pair, kept as a native type
//! here since no external crate in this stack models projective lines.

use nalgebra::{Point3, Vector3};

/// A 3D line in Plücker coordinates: `d` is the direction, `w = p × d`
/// for any point `p` on the line. Mirrors the origin+direction shape of
/// a conventional 3D line type but carries the moment vector needed for
/// perpendicular-distance and intersection queries without picking an
/// arbitrary base point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3D {
    d: Vector3<f64>,
    w: Vector3<f64>,
}

impl Line3D {
    /// Builds a line through `p1` and `p2`. Does not normalize; call
    /// [`Line3D::normalize`] when a unit direction is required.
    #[must_use]
    pub fn from_two_points(p1: Point3<f64>, p2: Point3<f64>) -> Self {
        let d = p2 - p1;
        let w = p1.coords.cross(&d);
        Self { d, w }
    }

    /// Builds a line directly from its Plücker `(direction, moment)`
    /// pair, e.g. as produced by a plane-intersection construction.
    #[must_use]
    pub fn from_raw(d: Vector3<f64>, w: Vector3<f64>) -> Self {
        Self { d, w }
    }

    #[must_use]
    pub fn direction(&self) -> Vector3<f64> {
        self.d
    }

    #[must_use]
    pub fn moment(&self) -> Vector3<f64> {
        self.w
    }

    pub fn set_direction(&mut self, d: Vector3<f64>) {
        self.d = d;
    }

    pub fn set_moment(&mut self, w: Vector3<f64>) {
        self.w = w;
    }

    /// Rescales `(d, w)` so `d` is unit length, preserving the line.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `d` is the zero vector: callers must
    /// not construct a degenerate line.
    pub fn normalize(&mut self) {
        let norm = self.d.norm();
        debug_assert!(norm > 0.0, "cannot normalize a zero-direction Line3D");
        self.d /= norm;
        self.w /= norm;
    }

    /// Recovers one point on the line (the foot of the perpendicular
    /// from the origin) plus the direction, for callers that need a
    /// conventional point+direction representation.
    #[must_use]
    pub fn to_cartesian(&self) -> (Point3<f64>, Vector3<f64>) {
        let d_sq = self.d.norm_squared();
        let point = if d_sq > 0.0 { self.d.cross(&self.w) / d_sq } else { Vector3::zeros() };
        (Point3::from(point), self.d)
    }
}
