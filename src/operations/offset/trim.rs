use crate::math::intersect_2d::first_self_intersection;
use crate::math::polygon_2d::{clean_polygon, signed_area_2d};
use crate::math::Point2;

/// Splits a closed polygon at the crossing of edges `i` and `j` (`i < j`).
///
/// - Loop A: `[crossing, P(i+1), ..., P(j)]`
/// - Loop B: `[crossing, P(j+1), ..., P(i)]`, wrapping around.
fn split_at_intersection(
    points: &[Point2],
    seg_i: usize,
    seg_j: usize,
    crossing: Point2,
) -> (Vec<Point2>, Vec<Point2>) {
    let n = points.len();

    let mut a = Vec::with_capacity(seg_j - seg_i + 1);
    a.push(crossing);
    a.extend_from_slice(&points[(seg_i + 1)..=seg_j]);

    let mut b = Vec::with_capacity(n - (seg_j - seg_i) + 1);
    b.push(crossing);
    let mut idx = (seg_j + 1) % n;
    loop {
        b.push(points[idx]);
        if idx == seg_i {
            break;
        }
        idx = (idx + 1) % n;
    }

    (a, b)
}

/// Recursively splits a raw offset polygon at its self-intersections.
///
/// At each crossing the polygon is split in two and both halves are
/// trimmed. Loops left by collapsed features wind against `winding_sign`
/// and are discarded, as are loops with area at most `tol²`. Every other
/// loop is returned: a room pinched by a narrow passage keeps both sides.
///
/// Each split strictly reduces the vertex count, so recursion terminates.
pub(super) fn trim_closed_loops(points: &[Point2], winding_sign: f64, tol: f64) -> Vec<Vec<Point2>> {
    let pts = clean_polygon(points, tol);
    if pts.len() < 3 {
        return Vec::new();
    }
    let Some((i, j, crossing)) = first_self_intersection(&pts) else {
        return if signed_area_2d(&pts) * winding_sign > tol * tol {
            vec![pts]
        } else {
            Vec::new()
        };
    };

    let (a, b) = split_at_intersection(&pts, i, j, crossing);
    let mut loops = trim_closed_loops(&a, winding_sign, tol);
    loops.extend(trim_closed_loops(&b, winding_sign, tol));
    loops
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bow_tie_keeps_matching_lobe() {
        // CCW lower lobe, CW upper lobe.
        let bow = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(4.0, 2.0),
        ];
        let kept = trim_closed_loops(&bow, 1.0, 1e-9);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].len(), 3);
        assert_relative_eq!(signed_area_2d(&kept[0]), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn simple_polygon_is_untouched() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_eq!(trim_closed_loops(&square, 1.0, 1e-9), vec![square]);
    }

    #[test]
    fn reversed_polygon_is_dropped() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        assert!(trim_closed_loops(&square, 1.0, 1e-9).is_empty());
    }

    #[test]
    fn pinched_polygon_keeps_both_lobes() {
        // Two CCW squares joined through a reversed strip, as left by an
        // inset of a room with a narrow corridor.
        let pinched = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.2),
            Point2::new(5.0, 1.2),
            Point2::new(5.0, 0.0),
            Point2::new(7.0, 0.0),
            Point2::new(7.0, 2.0),
            Point2::new(5.0, 2.0),
            Point2::new(5.0, 0.8),
            Point2::new(2.0, 0.8),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let kept = trim_closed_loops(&pinched, 1.0, 1e-9);
        assert_eq!(kept.len(), 2);
        for lobe in &kept {
            assert_relative_eq!(signed_area_2d(lobe), 4.0, epsilon = 1e-9);
        }
    }
}
