//! Pairwise line merger: fuses two overlapping near-collinear
//! segments into one, along a length-weighted direction.

use nalgebra::{Point2, Vector2};

use crate::geom::Segment2D;

/// Fuses `l1` and `l2` into a single segment oriented along a
/// length-weighted average direction.
///
/// Each segment contributes its two endpoints as unit point masses
/// (total mass `2 * length` per segment), so the centroid is the
/// length-weighted average of all four endpoints — this is what makes
/// `merge_two_lines(l, l) == l` (up to endpoint order) hold exactly.
///
/// # Panics (debug only)
///
/// Both inputs must be non-degenerate (`length() > 0`); this is a
/// precondition violation, not a recoverable error.
#[must_use]
pub fn merge_two_lines(l1: &Segment2D, l2: &Segment2D) -> Segment2D {
    let len1 = l1.length();
    let len2 = l2.length();
    debug_assert!(len1 > 0.0 && len2 > 0.0, "merge_two_lines requires non-degenerate inputs");

    let total_mass = 2.0 * (len1 + len2);
    let sum1 = Vector2::new(l1.p1.x + l1.p2.x, l1.p1.y + l1.p2.y);
    let sum2 = Vector2::new(l2.p1.x + l2.p2.x, l2.p1.y + l2.p2.y);
    let g = Point2::from((sum1 * len1 + sum2 * len2) / total_mass);

    let theta1 = l1.angle();
    let theta2 = l2.angle();
    let weight_total = len1 + len2;
    let theta = if (theta1 - theta2).abs() <= std::f64::consts::FRAC_PI_2 {
        (len1 * theta1 + len2 * theta2) / weight_total
    } else {
        let theta2_wrapped = theta2 - std::f64::consts::PI * theta2.signum();
        (len1 * theta1 + len2 * theta2_wrapped) / weight_total
    };
    let theta = normalize_angle(theta);

    let dir = Vector2::new(theta.cos(), theta.sin());
    let project = |p: Point2<f64>| (p - g).dot(&dir);

    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for p in [l1.p1, l1.p2, l2.p1, l2.p2] {
        let t = project(p);
        min_t = min_t.min(t);
        max_t = max_t.max(t);
    }

    let a = g + dir * min_t;
    let b = g + dir * max_t;
    Segment2D::new(a.x, a.y, b.x, b.y)
}

/// Maps an angle back into the canonical `(-pi/2, pi/2]` range.
fn normalize_angle(mut theta: f64) -> f64 {
    let pi = std::f64::consts::PI;
    while theta <= -std::f64::consts::FRAC_PI_2 {
        theta += pi;
    }
    while theta > std::f64::consts::FRAC_PI_2 {
        theta -= pi;
    }
    theta
}
