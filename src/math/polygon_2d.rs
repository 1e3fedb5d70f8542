use serde::Serialize;

use super::{Point2, Vector2, TOLERANCE};
use crate::error::GeometryError;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    /// Extent along X.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along Y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Sum of edge lengths of a closed polygon, wrap-around edge included.
#[must_use]
pub fn perimeter_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| nalgebra::distance(&points[i], &points[(i + 1) % n]))
        .sum()
}

/// Area centroid of a closed polygon.
///
/// Falls back to the vertex average when the area vanishes.
#[must_use]
pub fn centroid_2d(points: &[Point2]) -> Option<Point2> {
    let n = points.len();
    if n == 0 {
        return None;
    }
    let area = signed_area_2d(points);
    if area.abs() < TOLERANCE {
        #[allow(clippy::cast_precision_loss)]
        let inv = 1.0 / n as f64;
        let sum = points.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords);
        return Some(Point2::from(sum * inv));
    }
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    let k = 1.0 / (6.0 * area);
    Some(Point2::new(cx * k, cy * k))
}

/// Bounding box over all vertices, or `None` for an empty slice.
#[must_use]
pub fn bounds_2d(points: &[Point2]) -> Option<Aabb> {
    let first = points.first()?;
    let init = Aabb {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    Some(points.iter().skip(1).fold(init, |b, p| Aabb {
        min_x: b.min_x.min(p.x),
        min_y: b.min_y.min(p.y),
        max_x: b.max_x.max(p.x),
        max_y: b.max_y.max(p.y),
    }))
}

/// Distance from `p` to the closed segment `a`-`b`.
#[must_use]
pub fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return nalgebra::distance(p, a);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    nalgebra::distance(p, &(a + ab * t))
}

/// Distance from `p` to the boundary of a closed polygon.
#[must_use]
pub fn distance_to_boundary(p: &Point2, polygon: &[Point2]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| distance_to_segment(p, &polygon[i], &polygon[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Even-odd point-in-polygon test. Points within `tol` of the boundary
/// count as inside.
#[must_use]
pub fn contains_point(polygon: &[Point2], p: &Point2, tol: f64) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    if distance_to_boundary(p, polygon) <= tol {
        return true;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output for tests.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Removes degenerate vertices from a closed polygon: consecutive duplicates
/// closer than `tol` and vertices lying on the line through their neighbours.
#[must_use]
pub fn clean_polygon(points: &[Point2], tol: f64) -> Vec<Point2> {
    let tol_sq = tol * tol;
    let mut deduped: Vec<Point2> = Vec::with_capacity(points.len());
    for &pt in points {
        if let Some(last) = deduped.last() {
            if (pt - last).norm_squared() <= tol_sq {
                continue;
            }
        }
        deduped.push(pt);
    }
    while deduped.len() > 1 {
        let (first, last) = (deduped[0], deduped[deduped.len() - 1]);
        if (last - first).norm_squared() <= tol_sq {
            deduped.pop();
        } else {
            break;
        }
    }
    if deduped.len() < 3 {
        return deduped;
    }

    // Collinear removal repeats until stable; removing one vertex can expose another.
    let mut current = deduped;
    loop {
        let n = current.len();
        let mut cleaned = Vec::with_capacity(n);
        for i in 0..n {
            let prev = current[if i == 0 { n - 1 } else { i - 1 }];
            let next = current[(i + 1) % n];
            let base = next - prev;
            let len = base.norm();
            let off_line = if len < TOLERANCE {
                (current[i] - prev).norm()
            } else {
                base.perp(&(current[i] - prev)).abs() / len
            };
            let backtrack = (current[i] - prev).dot(&(next - current[i])) < 0.0;
            if off_line > tol || backtrack {
                cleaned.push(current[i]);
            }
        }
        if cleaned.len() < 3 {
            return current;
        }
        if cleaned.len() == n {
            return cleaned;
        }
        current = cleaned;
    }
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroLengthSegment` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2, GeometryError> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroLengthSegment {
            x0: a.x,
            y0: a.y,
            x1: b.x,
            y1: b.y,
        });
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}
