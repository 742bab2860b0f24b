//! Point-to-line assignment: for one image, builds a sparse
//! mapping `{line -> {point -> perpendicular distance}}`.

use std::collections::BTreeMap;

use crate::geom::Segment2D;
use crate::point_set::PointSet;

/// `LineAssignment[line_id]` maps an accepted point id to its
/// perpendicular distance from that line. A `BTreeMap` gives
/// deterministic iteration order at emit time without an explicit sort
/// step.
pub type LineAssignment = Vec<BTreeMap<usize, f64>>;

const BBOX_MARGIN: f64 = 3.0;
const MAX_PERP_DIST: f64 = 3.0;
const ENDPOINT_SNAP_SQ: f64 = 9.0;

/// Builds the point-to-line assignment for every line in `lines` against
/// every point in `points`.
#[must_use]
pub fn assign_points_to_lines(lines: &[Segment2D], points: &PointSet) -> LineAssignment {
    lines.iter().map(|line| assign_one_line(line, points)).collect()
}

fn assign_one_line(line: &Segment2D, points: &PointSet) -> BTreeMap<usize, f64> {
    let (x1, y1, x2, y2) = (line.p1.x, line.p1.y, line.p2.x, line.p2.y);
    let a = y2 - y1;
    let b = x1 - x2;
    let c = x2 * y1 - x1 * y2;
    let d = (a * a + b * b).sqrt();
    debug_assert!(d > 0.0, "assign_points_to_lines called on a zero-length line");
    let d_sq = d * d;

    let (bbox_min_x, bbox_max_x) = (x1.min(x2) - BBOX_MARGIN, x1.max(x2) + BBOX_MARGIN);
    let (bbox_min_y, bbox_max_y) = (y1.min(y2) - BBOX_MARGIN, y1.max(y2) + BBOX_MARGIN);

    let mut accepted = BTreeMap::new();
    for idx in 0..points.len() {
        let p = points.xy(idx);
        if p.x < bbox_min_x || p.x > bbox_max_x || p.y < bbox_min_y || p.y > bbox_max_y {
            continue;
        }

        let dp = (a * p.x + b * p.y + c).abs() / d;
        if dp > MAX_PERP_DIST {
            continue;
        }

        let side1 = (p.x - x1).powi(2) + (p.y - y1).powi(2);
        let side2 = (p.x - x2).powi(2) + (p.y - y2).powi(2);
        let near_endpoint = side1 <= ENDPOINT_SNAP_SQ || side2 <= ENDPOINT_SNAP_SQ;
        let projects_between = side1 < d_sq + side2 && side2 < d_sq + side1;

        if near_endpoint || projects_between {
            accepted.insert(idx, dp);
        }
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(xs: &[(f64, f64)]) -> PointSet {
        let mut ps = PointSet::new();
        for &(x, y) in xs {
            ps.push_xy(x, y);
        }
        ps
    }

    #[test]
    fn accepts_point_between_endpoints_within_distance() {
        let lines = vec![Segment2D::new(0.0, 0.0, 10.0, 0.0)];
        let ps = points(&[(5.0, 2.0)]);
        let assignment = assign_points_to_lines(&lines, &ps);
        assert_eq!(assignment[0].len(), 1);
        assert!((assignment[0][&0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_point_outside_bbox() {
        let lines = vec![Segment2D::new(0.0, 0.0, 10.0, 0.0)];
        let ps = points(&[(50.0, 0.0)]);
        let assignment = assign_points_to_lines(&lines, &ps);
        assert!(assignment[0].is_empty());
    }

    #[test]
    fn rejects_point_too_far_perpendicular() {
        let lines = vec![Segment2D::new(0.0, 0.0, 10.0, 0.0)];
        let ps = points(&[(5.0, 5.0)]);
        let assignment = assign_points_to_lines(&lines, &ps);
        assert!(assignment[0].is_empty());
    }

    #[test]
    fn accepts_point_near_endpoint_even_off_projection() {
        let lines = vec![Segment2D::new(0.0, 0.0, 10.0, 0.0)];
        // Slightly past the endpoint but within the 3px snap radius.
        let ps = points(&[(11.5, 1.0)]);
        let assignment = assign_points_to_lines(&lines, &ps);
        assert_eq!(assignment[0].len(), 1);
    }

    #[test]
    fn symmetric_under_endpoint_swap() {
        let a = vec![Segment2D::new(0.0, 0.0, 10.0, 0.0)];
        let b = vec![Segment2D::new(10.0, 0.0, 0.0, 0.0)];
        let ps = points(&[(5.0, 1.5)]);
        let assign_a = assign_points_to_lines(&a, &ps);
        let assign_b = assign_points_to_lines(&b, &ps);
        assert_eq!(assign_a[0].keys().collect::<Vec<_>>(), assign_b[0].keys().collect::<Vec<_>>());
        for k in assign_a[0].keys() {
            assert!((assign_a[0][k] - assign_b[0][k]).abs() < 1e-9);
        }
    }
}
