//! Short-line rejection.

use crate::geom::Segment2D;

/// Removes every segment whose squared length is `<= length_thr^2`,
/// preserving the relative order of survivors.
///
/// Post-condition: every surviving segment has length strictly greater
/// than `length_thr`.
pub fn filter_short_lines(lines: &mut Vec<Segment2D>, length_thr: f64) {
    let thr_sq = length_thr * length_thr;
    lines.retain(|l| l.length_squared() > thr_sq);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_segments_at_or_below_threshold() {
        let mut lines = vec![Segment2D::new(0.0, 0.0, 3.0, 4.0), Segment2D::new(0.0, 0.0, 1.0, 1.0)];
        filter_short_lines(&mut lines, 4.0);
        assert_eq!(lines.len(), 1);
        assert!((lines[0].length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn preserves_relative_order() {
        let mut lines = vec![
            Segment2D::new(0.0, 0.0, 100.0, 0.0),
            Segment2D::new(0.0, 0.0, 1.0, 0.0),
            Segment2D::new(0.0, 0.0, 50.0, 0.0),
        ];
        filter_short_lines(&mut lines, 10.0);
        assert_eq!(lines.len(), 2);
        assert!((lines[0].length() - 100.0).abs() < 1e-9);
        assert!((lines[1].length() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut lines: Vec<Segment2D> = Vec::new();
        filter_short_lines(&mut lines, 5.0);
        assert!(lines.is_empty());
    }
}
