mod trim;

use crate::error::{EstiError, OperationError, Result};
use crate::math::intersect_2d::{line_line_intersect_2d, point_at};
use crate::math::polygon_2d::{
    distance_to_boundary, left_normal, rotate_to_canonical_start, segment_direction,
    signed_area_2d,
};
use crate::math::{Point2, Vector2, TOLERANCE};

use trim::trim_closed_loops;

/// When `cos(turn angle) < this`, consecutive edges nearly reverse and a
/// flat cap replaces the miter.
const FLAT_CAP_COS: f64 = -0.98;

/// Relative slack when checking offset vertices against the source walls.
const CLEARANCE_SLACK: f64 = 1e-6;

/// Offsets a closed ring by a signed distance.
///
/// # Algorithm
///
/// 1. Each edge is shifted along its left normal by `distance`.
/// 2. Consecutive shifted edges are joined at the intersection of their
///    lines (miter). Where the shifted edges separate (convex corners of an
///    outward offset, reflex corners of an inset), a miter reaching further
///    than `miter_limit x |distance|` from the source corner is replaced by
///    a bevel. Where they overlap the intersection is exact and always
///    kept. Near-reversals get a flat cap.
/// 3. Self-intersection loops are trimmed. Every loop winding like the
///    source survives, so a ring pinched by a narrow passage can yield
///    several pieces.
///
/// # Sign Convention
///
/// Positive distance offsets to the left of the walking direction, which is
/// inward for a counter-clockwise ring. Negative distance grows the ring.
#[derive(Debug)]
pub struct RingOffset<'a> {
    points: &'a [Point2],
    distance: f64,
    miter_limit: f64,
    tolerance: f64,
}

impl<'a> RingOffset<'a> {
    #[must_use]
    pub fn new(points: &'a [Point2], distance: f64) -> Self {
        Self {
            points,
            distance,
            miter_limit: 2.0,
            tolerance: TOLERANCE * 1e3,
        }
    }

    /// Longest allowed miter as a multiple of the offset distance.
    #[must_use]
    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    /// Distance below which vertices are merged and areas count as zero.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the offset, returning the new ring.
    ///
    /// # Errors
    ///
    /// As [`execute_pieces`](Self::execute_pieces), and
    /// `OperationError::Collapsed` when the offset splits into more than one
    /// piece.
    pub fn execute(&self) -> Result<Vec<Point2>> {
        let mut pieces = self.execute_pieces()?;
        match pieces.len() {
            1 => Ok(pieces.swap_remove(0)),
            n => Err(collapsed(&format!("split into {n} pieces"))),
        }
    }

    /// Executes the offset, returning every piece that survives trimming.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` for fewer than three vertices or a
    ///   zero-length edge.
    /// - `OperationError::Collapsed` when nothing winding like the source
    ///   is left, the pieces grow under an inward offset, or a piece comes
    ///   closer to the source walls than the offset distance.
    pub fn execute_pieces(&self) -> Result<Vec<Vec<Point2>>> {
        if self.points.len() < 3 {
            return Err(OperationError::InvalidInput(
                "at least 3 points are required for a ring offset".to_owned(),
            )
            .into());
        }
        if self.distance.abs() < TOLERANCE {
            return Ok(vec![self.points.to_vec()]);
        }

        let raw = self.build_raw_offset()?;
        let source_area = signed_area_2d(self.points);
        let pieces = trim_closed_loops(&raw, source_area.signum(), self.tolerance);
        if pieces.is_empty() {
            return Err(collapsed("winding reversed or area vanished"));
        }

        let area: f64 = pieces.iter().map(|p| signed_area_2d(p).abs()).sum();
        let inward = source_area * self.distance > 0.0;
        if inward && area >= source_area.abs() {
            return Err(collapsed("passed through the centre"));
        }

        let clearance = self.distance.abs() * (1.0 - CLEARANCE_SLACK) - self.tolerance;
        if pieces
            .iter()
            .flatten()
            .any(|p| distance_to_boundary(p, self.points) < clearance)
        {
            return Err(collapsed("offset boundary crosses the source walls"));
        }

        Ok(pieces
            .iter()
            .map(|piece| rotate_to_canonical_start(piece))
            .collect())
    }

    /// Shifted edges joined corner by corner.
    fn build_raw_offset(&self) -> Result<Vec<Point2>> {
        let n = self.points.len();

        let mut shifted: Vec<(Point2, Point2)> = Vec::with_capacity(n);
        let mut directions: Vec<Vector2> = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[(i + 1) % n]);
            let dir = segment_direction(&a, &b)?;
            let shift = left_normal(dir) * self.distance;
            shifted.push((a + shift, b + shift));
            directions.push(dir);
        }

        let mut raw = Vec::with_capacity(n * 2);
        for i in 0..n {
            let prev = if i == 0 { n - 1 } else { i - 1 };
            self.push_corner(
                &mut raw,
                &shifted[prev],
                &shifted[i],
                &directions[prev],
                &directions[i],
                &self.points[i],
            );
        }
        Ok(raw)
    }

    /// Pushes the join between two shifted edges meeting at `corner`.
    ///
    /// - Near-reversals: flat cap (two points).
    /// - Separating edges with a miter beyond the limit: bevel (two points).
    /// - Otherwise: the miter point.
    fn push_corner(
        &self,
        raw: &mut Vec<Point2>,
        seg_prev: &(Point2, Point2),
        seg_next: &(Point2, Point2),
        dir_prev: &Vector2,
        dir_next: &Vector2,
        corner: &Point2,
    ) {
        if dir_prev.dot(dir_next) < FLAT_CAP_COS {
            raw.push(seg_prev.1);
            raw.push(seg_next.0);
            return;
        }

        let d_prev = seg_prev.1 - seg_prev.0;
        let d_next = seg_next.1 - seg_next.0;
        let Some((t, _)) = line_line_intersect_2d(&seg_prev.1, &d_prev, &seg_next.0, &d_next)
        else {
            // Parallel edges: the shifted endpoints coincide.
            raw.push(seg_prev.1);
            return;
        };
        let miter = point_at(&seg_prev.1, &d_prev, t);
        let separating = dir_prev.perp(dir_next) * self.distance < 0.0;
        let limit = self.miter_limit * self.distance.abs();
        if separating && (miter - corner).norm_squared() > limit * limit {
            raw.push(seg_prev.1);
            raw.push(seg_next.0);
        } else {
            raw.push(miter);
        }
    }
}

fn collapsed(reason: &str) -> EstiError {
    OperationError::Collapsed(reason.to_owned()).into()
}
