use crate::geometry::Segment;
use crate::math::{Point2, Vector2, TOLERANCE};

/// Supporting line: a reference point plus a unit direction.
#[derive(Debug, Clone, Copy)]
struct LineKey {
    origin: Point2,
    dir: Vector2,
}

impl LineKey {
    fn from_segment(seg: &Segment) -> Option<Self> {
        let d = seg.end - seg.start;
        let len = d.norm();
        if len < TOLERANCE {
            return None;
        }
        Some(Self {
            origin: seg.start,
            dir: d / len,
        })
    }

    fn param(&self, p: &Point2) -> f64 {
        (p - self.origin).dot(&self.dir)
    }

    fn distance(&self, p: &Point2) -> f64 {
        self.dir.perp(&(p - self.origin)).abs()
    }
}

/// Collinear segments sharing one supporting line.
struct SupportingLine {
    key: LineKey,
    /// `(t_min, t_max, source)` per member segment.
    intervals: Vec<(f64, f64, usize)>,
    /// Drawn endpoints on this line as `(t, point)`.
    breakpoints: Vec<(f64, Point2)>,
}

/// Merges collinear, overlapping and duplicated segments and nodes
/// T-junctions.
///
/// Segments whose endpoints both lie within `tol` of a common supporting
/// line are grouped. Every drawn endpoint on that line, including endpoints
/// of other segments touching the interior of an extent, becomes a
/// breakpoint, and the covered stretch between consecutive breakpoints is
/// emitted once. Overlaps and duplicates therefore collapse without losing
/// any vertex another wall attaches to.
#[must_use]
pub fn merge_collinear(segments: &[Segment], tol: f64) -> Vec<Segment> {
    let mut groups: Vec<SupportingLine> = Vec::new();

    for seg in segments {
        let Some(own_key) = LineKey::from_segment(seg) else {
            continue;
        };
        let existing = groups
            .iter()
            .position(|g| g.key.distance(&seg.start) <= tol && g.key.distance(&seg.end) <= tol);
        let idx = existing.unwrap_or_else(|| {
            groups.push(SupportingLine {
                key: own_key,
                intervals: Vec::new(),
                breakpoints: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        let (ta, tb) = (group.key.param(&seg.start), group.key.param(&seg.end));
        group.intervals.push((ta.min(tb), ta.max(tb), seg.source));
        group.breakpoints.push((ta, seg.start));
        group.breakpoints.push((tb, seg.end));
    }

    // Endpoints of any segment landing inside another line's extent split it.
    for g in &mut groups {
        for seg in segments {
            for p in [seg.start, seg.end] {
                if g.key.distance(&p) > tol {
                    continue;
                }
                let t = g.key.param(&p);
                let inside = g
                    .intervals
                    .iter()
                    .any(|&(lo, hi, _)| t > lo + tol && t < hi - tol);
                if inside {
                    g.breakpoints.push((t, p));
                }
            }
        }
    }

    let mut result = Vec::new();
    for g in &mut groups {
        g.breakpoints.sort_by(|a, b| a.0.total_cmp(&b.0));
        g.breakpoints.dedup_by(|later, earlier| later.0 - earlier.0 <= tol);

        for pair in g.breakpoints.windows(2) {
            let (t0, p0) = pair[0];
            let (t1, p1) = pair[1];
            let mid = 0.5 * (t0 + t1);
            let covering = g
                .intervals
                .iter()
                .find(|&&(lo, hi, _)| mid >= lo - tol && mid <= hi + tol);
            if let Some(&(_, _, source)) = covering {
                result.push(Segment::new(p0, p1, source));
            }
        }
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(Point2::new(x0, y0), Point2::new(x1, y1), 0)
    }

    fn total_length(segments: &[Segment]) -> f64 {
        segments.iter().map(Segment::length).sum()
    }

    #[test]
    fn duplicate_segments_collapse() {
        let out = merge_collinear(&[seg(0.0, 0.0, 5.0, 0.0), seg(5.0, 0.0, 0.0, 0.0)], 1e-3);
        assert_eq!(out.len(), 1);
        assert!((total_length(&out) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn overlapping_segments_are_noded_not_duplicated() {
        let out = merge_collinear(&[seg(0.0, 0.0, 6.0, 0.0), seg(4.0, 0.0, 10.0, 0.0)], 1e-3);
        // Breakpoints at 0, 4, 6, 10.
        assert_eq!(out.len(), 3);
        assert!((total_length(&out) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn touching_collinear_segments_keep_shared_vertex() {
        let out = merge_collinear(&[seg(0.0, 0.0, 5.0, 0.0), seg(5.0, 0.0, 10.0, 0.0)], 1e-3);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn gap_between_collinear_segments_is_not_bridged() {
        let out = merge_collinear(&[seg(0.0, 0.0, 4.0, 0.0), seg(6.0, 0.0, 10.0, 0.0)], 1e-3);
        assert_eq!(out.len(), 2);
        assert!((total_length(&out) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn t_junction_splits_the_through_wall() {
        let out = merge_collinear(&[seg(0.0, 0.0, 10.0, 0.0), seg(4.0, 0.0, 4.0, 3.0)], 1e-3);
        assert_eq!(out.len(), 3);
        let horizontal: Vec<_> = out.iter().filter(|s| (s.start.y).abs() < 1e-9 && (s.end.y).abs() < 1e-9).collect();
        assert_eq!(horizontal.len(), 2);
    }

    #[test]
    fn nearly_collinear_within_tolerance_groups() {
        let out = merge_collinear(
            &[seg(0.0, 0.0, 10.0, 0.0), seg(0.0, 0.0005, 10.0, 0.0005)],
            1e-3,
        );
        assert_eq!(out.len(), 1);
    }
}
