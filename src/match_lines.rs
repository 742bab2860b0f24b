//! Line matcher: given point-to-line assignments for two
//! images plus a list of point matches across them, builds a voting
//! matrix between lines and extracts a mutually-best bipartite matching.

use crate::assign::LineAssignment;
use crate::point_set::PointMatch;

/// `LineMatches[line_id_in_a]` is the matched line id in image B, or
/// `None` if unmatched: an unmatched line is normal operation, not an
/// error.
pub type LineMatches = Vec<Option<usize>>;

const MIN_VOTES: u32 = 2;
const MIN_SCORE: f64 = 0.8;

/// Inverts a [`LineAssignment`] into `assigned_lines[point_id] = [line
/// ids containing this point]`.
fn invert(assignment: &LineAssignment, num_points: usize) -> Vec<Vec<usize>> {
    let mut assigned_lines = vec![Vec::new(); num_points];
    for (line_id, points) in assignment.iter().enumerate() {
        for &point_id in points.keys() {
            assigned_lines[point_id].push(line_id);
        }
    }
    assigned_lines
}

/// Matches lines in image A against lines in image B, driven by
/// already-known point correspondences.
#[must_use]
pub fn match_lines(r0: &LineAssignment, r1: &LineAssignment, point_matches: &[PointMatch], n0: usize, n1: usize) -> LineMatches {
    let num_lines0 = r0.len();
    let num_lines1 = r1.len();

    let assigned0 = invert(r0, n0);
    let assigned1 = invert(r1, n1);

    let mut votes = vec![vec![0u32; num_lines1]; num_lines0];
    for pm in point_matches {
        let Some(lines0) = assigned0.get(pm.query_idx) else { continue };
        let Some(lines1) = assigned1.get(pm.train_idx) else { continue };
        for &l0 in lines0 {
            for &l1 in lines1 {
                votes[l0][l1] += 1;
            }
        }
    }

    // Row maxima: for each L0, the best L1 and its vote count.
    let mut row_best = vec![(0usize, 0u32); num_lines0];
    for (l0, row) in votes.iter().enumerate() {
        let mut best_l1 = 0usize;
        let mut best_v = 0u32;
        for (l1, &v) in row.iter().enumerate() {
            if v > best_v {
                best_v = v;
                best_l1 = l1;
            }
        }
        row_best[l0] = (best_l1, best_v);
    }

    let mut matches: LineMatches = vec![None; num_lines0];
    for l1 in 0..num_lines1 {
        let mut best_l0 = 0usize;
        let mut best_v = 0u32;
        for l0 in 0..num_lines0 {
            let v = votes[l0][l1];
            if v > best_v {
                best_v = v;
                best_l0 = l0;
            }
        }
        if num_lines0 == 0 {
            continue;
        }
        let (row_argmax_l1, _) = row_best[best_l0];
        if best_v >= MIN_VOTES && row_argmax_l1 == l1 {
            let denom = r0[best_l0].len().min(r1[l1].len()) as f64;
            if denom > 0.0 {
                let score = f64::from(best_v) * f64::from(best_v) / denom;
                if score >= MIN_SCORE {
                    matches[best_l0] = Some(l1);
                }
            }
        }
    }

    tracing::debug!(
        accepted = matches.iter().filter(|m| m.is_some()).count(),
        num_lines0,
        num_lines1,
        "line matching complete"
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn assignment_from(entries: &[&[(usize, f64)]]) -> LineAssignment {
        entries
            .iter()
            .map(|line| line.iter().copied().collect::<BTreeMap<_, _>>())
            .collect()
    }

    #[test]
    fn mutual_best_matches_win_when_scores_clear_threshold() {
        // V = [[5,0],[0,3]], |R0|=|R1|=[10,10].
        // line 0 sees 10 points, line 1 sees 10 points, in both images.
        let r0 = assignment_from(&[
            &(0..10).map(|i| (i, 0.0)).collect::<Vec<_>>(),
            &(10..20).map(|i| (i, 0.0)).collect::<Vec<_>>(),
        ]);
        let r1 = assignment_from(&[
            &(0..10).map(|i| (i, 0.0)).collect::<Vec<_>>(),
            &(10..20).map(|i| (i, 0.0)).collect::<Vec<_>>(),
        ]);
        // 5 point matches land both endpoints on (line0, line0); 3 on (line1, line1).
        let mut point_matches = Vec::new();
        for i in 0..5 {
            point_matches.push(PointMatch::new(i, i));
        }
        for i in 10..13 {
            point_matches.push(PointMatch::new(i, i));
        }
        let matches = match_lines(&r0, &r1, &point_matches, 20, 20);
        assert_eq!(matches[0], Some(0));
        assert_eq!(matches[1], Some(1));
    }

    #[test]
    fn rejects_when_votes_below_minimum() {
        let r0 = assignment_from(&[&[(0, 0.0)], &[(1, 0.0)]]);
        let r1 = assignment_from(&[&[(0, 0.0)], &[(1, 0.0)]]);
        let point_matches = vec![PointMatch::new(0, 0)];
        let matches = match_lines(&r0, &r1, &point_matches, 2, 2);
        assert_eq!(matches, vec![None, None]);
    }

    #[test]
    fn every_accepted_match_is_mutually_best() {
        let r0 = assignment_from(&[
            &(0..5).map(|i| (i, 0.0)).collect::<Vec<_>>(),
            &(5..10).map(|i| (i, 0.0)).collect::<Vec<_>>(),
        ]);
        let r1 = assignment_from(&[
            &(0..5).map(|i| (i, 0.0)).collect::<Vec<_>>(),
            &(5..10).map(|i| (i, 0.0)).collect::<Vec<_>>(),
        ]);
        let mut point_matches = Vec::new();
        for i in 0..5 {
            point_matches.push(PointMatch::new(i, i));
        }
        for i in 5..10 {
            point_matches.push(PointMatch::new(i, i));
        }
        let matches = match_lines(&r0, &r1, &point_matches, 10, 10);
        for (l0, m) in matches.iter().enumerate() {
            if let Some(l1) = m {
                assert!(r0[l0].len() >= 2);
                assert!(r1[*l1].len() >= 2);
            }
        }
    }
}
