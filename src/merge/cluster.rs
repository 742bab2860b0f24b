//! Line clusterer and merge pipeline: builds a neighbor graph
//! over segments under angle/distance/endpoint tests, extracts connected
//! components, splits them into length-ordered sub-clusters, and applies
//! the pairwise merger ([`crate::merge::pair::merge_two_lines`])
//! iteratively.

use nalgebra::Point2;
use std::collections::VecDeque;

use crate::config::MergeConfig;
use crate::filter::filter_short_lines;
use crate::geom::{angle_diff, point_line_distance, Segment2D};
use crate::merge::pair::merge_two_lines;

/// Per-segment precomputed quantities, batched once per `merge_lines`
/// call so the O(N^2) neighbor sweep never recomputes trig.
#[derive(Debug, Clone, Copy)]
struct LinePrecomputed {
    angle: f64,
    length: f64,
}

/// Builds the symmetric neighbor adjacency list for `segments` under the
/// given thresholds.
fn discover_neighbors(
    segments: &[Segment2D],
    angle_thr: f64,
    distance_thr: f64,
    endpoint_thr: f64,
) -> Vec<Vec<usize>> {
    let n = segments.len();
    let pre: Vec<LinePrecomputed> = segments
        .iter()
        .map(|s| LinePrecomputed {
            angle: s.angle(),
            length: s.length(),
        })
        .collect();

    let mut sorted: Vec<usize> = (0..n).collect();
    sorted.sort_by(|&a, &b| pre[a].angle.partial_cmp(&pre[b].angle).unwrap_or(std::cmp::Ordering::Equal));

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    let endpoint_thr_sq = endpoint_thr * endpoint_thr;
    let quarter_pi = std::f64::consts::FRAC_PI_4;
    let half_pi = std::f64::consts::FRAC_PI_2;

    for i in 0..n {
        let idx1 = sorted[i];
        let theta1 = pre[idx1].angle;
        let sort_by_x = theta1.abs() < quarter_pi;
        let (a1, b1) = ordered_endpoints(&segments[idx1], sort_by_x);

        for &idx2 in sorted.iter().skip(i + 1) {
            let theta2 = pre[idx2].angle;

            let d_angle = angle_diff(theta1, theta2);
            if d_angle > angle_thr {
                if theta1.abs() < half_pi - angle_thr {
                    break;
                }
                continue;
            }

            let mid1 = midpoint(&segments[idx1]);
            let mid2 = midpoint(&segments[idx2]);
            let m1_to_l2 = point_line_distance(&segments[idx2], &mid1);
            let m2_to_l1 = point_line_distance(&segments[idx1], &mid2);
            if m1_to_l2 > distance_thr && m2_to_l1 > distance_thr {
                continue;
            }

            let (a2, b2) = ordered_endpoints(&segments[idx2], sort_by_x);
            let ca1 = axis_coord(&a1, sort_by_x);
            let cb1 = axis_coord(&b1, sort_by_x);
            let ca2 = axis_coord(&a2, sort_by_x);
            let cb2 = axis_coord(&b2, sort_by_x);

            let overlaps = ca1.max(ca2) <= cb1.min(cb2);
            let accept = if overlaps {
                true
            } else if cb1 < ca2 {
                squared_dist(&b1, &a2) < endpoint_thr_sq
            } else {
                squared_dist(&b2, &a1) < endpoint_thr_sq
            };

            if accept {
                adjacency[idx1].push(idx2);
                adjacency[idx2].push(idx1);
            }
        }
    }

    adjacency
}

fn midpoint(s: &Segment2D) -> Point2<f64> {
    Point2::new((s.p1.x + s.p2.x) * 0.5, (s.p1.y + s.p2.y) * 0.5)
}

fn ordered_endpoints(s: &Segment2D, sort_by_x: bool) -> (Point2<f64>, Point2<f64>) {
    if axis_coord(&s.p1, sort_by_x) <= axis_coord(&s.p2, sort_by_x) {
        (s.p1, s.p2)
    } else {
        (s.p2, s.p1)
    }
}

fn axis_coord(p: &Point2<f64>, sort_by_x: bool) -> f64 {
    if sort_by_x {
        p.x
    } else {
        p.y
    }
}

fn squared_dist(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}

/// Connected components of the symmetric neighbor relation, via BFS.
/// Every index in `0..adjacency.len()` appears in
/// exactly one component, including isolated segments.
fn connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start] = true;
        while let Some(cur) = queue.pop_front() {
            component.push(cur);
            for &nb in &adjacency[cur] {
                if !visited[nb] {
                    visited[nb] = true;
                    queue.push_back(nb);
                }
            }
        }
        components.push(component);
    }

    components
}

/// Splits a cluster larger than 2 into star-shaped sub-clusters: a
/// non-seed member is never revisited once placed, and a seed — once
/// consumed as a seed or as another seed's member — is never placed again.
fn subcluster(component: &[usize], adjacency: &[Vec<usize>], segments: &[Segment2D]) -> Vec<Vec<usize>> {
    if component.len() <= 2 {
        return vec![component.to_vec()];
    }

    let in_component: std::collections::HashSet<usize> = component.iter().copied().collect();
    let mut members = component.to_vec();
    members.sort_by(|&a, &b| segments[b].length().partial_cmp(&segments[a].length()).unwrap_or(std::cmp::Ordering::Equal));

    let mut taken = std::collections::HashSet::new();
    let mut subclusters = Vec::new();

    for &seed in &members {
        if taken.contains(&seed) {
            continue;
        }
        let mut sub = vec![seed];
        taken.insert(seed);
        for &nb in &adjacency[seed] {
            if in_component.contains(&nb) && !taken.contains(&nb) {
                sub.push(nb);
                taken.insert(nb);
            }
        }
        subclusters.push(sub);
    }

    subclusters
}

/// Folds [`merge_two_lines`] left-to-right over a sub-cluster, with a
/// fast path for near-duplicate overlapping segments (see `DESIGN.md`):
/// when one segment's axis-aligned span already covers more than 70% of
/// the other's, the longer segment is kept outright instead of being
/// blended through the weighted-angle average, avoiding spurious
/// orientation drift from near-duplicate detections of the same edge.
fn fuse(sub: &[usize], segments: &[Segment2D]) -> Segment2D {
    let mut acc = segments[sub[0]];
    for &idx in &sub[1..] {
        let next = segments[idx];
        acc = match overlap_absorb(&acc, &next) {
            Some(absorbed) => absorbed,
            None => merge_two_lines(&acc, &next),
        };
    }
    acc
}

fn overlap_absorb(a: &Segment2D, b: &Segment2D) -> Option<Segment2D> {
    let sort_by_x = a.angle().abs() < std::f64::consts::FRAC_PI_4;
    let (a_lo, a_hi) = axis_range(a, sort_by_x);
    let (b_lo, b_hi) = axis_range(b, sort_by_x);

    let overlap = a_hi.min(b_hi) - a_lo.max(b_lo);
    if overlap <= 0.0 {
        return None;
    }
    let a_span = a_hi - a_lo;
    let b_span = b_hi - b_lo;
    let shorter = a_span.min(b_span);
    if shorter <= 0.0 {
        return None;
    }
    if overlap / shorter > 0.7 {
        Some(if b_span > a_span { *b } else { *a })
    } else {
        None
    }
}

fn axis_range(s: &Segment2D, sort_by_x: bool) -> (f64, f64) {
    let c1 = axis_coord(&s.p1, sort_by_x);
    let c2 = axis_coord(&s.p2, sort_by_x);
    (c1.min(c2), c1.max(c2))
}

/// Runs the full clusterer (Phases A-D) once, at a single set of
/// thresholds.
#[must_use]
pub fn merge_lines(segments: &[Segment2D], angle_thr: f64, distance_thr: f64, endpoint_thr: f64) -> Vec<Segment2D> {
    if segments.is_empty() {
        return Vec::new();
    }
    let adjacency = discover_neighbors(segments, angle_thr, distance_thr, endpoint_thr);
    let components = connected_components(&adjacency);

    let mut out = Vec::with_capacity(components.len());
    for component in components {
        for sub in subcluster(&component, &adjacency, segments) {
            out.push(fuse(&sub, segments));
        }
    }
    out
}

/// The full three-stage driver: `filter > f0, merge(s0), filter > f1,
/// merge(s1), filter > f2`.
#[must_use]
pub fn merge_pipeline(mut segments: Vec<Segment2D>, config: &MergeConfig) -> Vec<Segment2D> {
    let input_count = segments.len();
    filter_short_lines(&mut segments, config.filter_thresholds[0]);
    segments = merge_lines(
        &segments,
        config.stages[0].angle_thr,
        config.stages[0].distance_thr,
        config.stages[0].endpoint_thr,
    );
    tracing::trace!(remaining = segments.len(), "merge pipeline stage 0 done");
    filter_short_lines(&mut segments, config.filter_thresholds[1]);
    segments = merge_lines(
        &segments,
        config.stages[1].angle_thr,
        config.stages[1].distance_thr,
        config.stages[1].endpoint_thr,
    );
    tracing::trace!(remaining = segments.len(), "merge pipeline stage 1 done");
    filter_short_lines(&mut segments, config.filter_thresholds[2]);
    tracing::debug!(input_count, output_count = segments.len(), "merge pipeline complete");
    segments
}
