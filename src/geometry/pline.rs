use serde::{Deserialize, Serialize};

use crate::math::arc_2d::arc_from_bulge;
use crate::math::Point2;

/// Bulge-encoded polyline vertex, as stored by LWPOLYLINE / POLYLINE.
///
/// `bulge = tan(sweep_angle / 4)`:
/// - `0` = straight line to next vertex
/// - `> 0` = counter-clockwise arc to next vertex
/// - `< 0` = clockwise arc to next vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlineVertex {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub bulge: f64,
}

impl PlineVertex {
    /// Creates a new vertex with the given coordinates and bulge.
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// Creates a line vertex (bulge = 0).
    #[must_use]
    pub fn line(x: f64, y: f64) -> Self {
        Self { x, y, bulge: 0.0 }
    }

    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.bulge.is_finite()
    }
}

/// A polyline with mixed straight-line and circular-arc segments.
///
/// For closed polylines, the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Pline {
    pub vertices: Vec<PlineVertex>,
    pub closed: bool,
}

impl Pline {
    /// Returns the number of segments in this polyline.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Flattens the polyline into straight chords, one `(start, end)` pair
    /// per chord, tessellating arcs so that no chord deviates from its arc
    /// by more than `tolerance`.
    #[must_use]
    pub fn to_chords(&self, tolerance: f64) -> Vec<(Point2, Point2)> {
        let n = self.vertices.len();
        let mut chords = Vec::with_capacity(self.segment_count());

        for i in 0..self.segment_count() {
            let v0 = &self.vertices[i];
            let v1 = &self.vertices[(i + 1) % n];

            let Some(arc) = arc_from_bulge(v0.x, v0.y, v1.x, v1.y, v0.bulge) else {
                chords.push((v0.point(), v1.point()));
                continue;
            };

            let n_sub = arc.chord_count(tolerance);
            let mut prev = v0.point();
            for j in 1..n_sub {
                let (px, py) = arc.point_at(f64::from(j) / f64::from(n_sub));
                let next = Point2::new(px, py);
                chords.push((prev, next));
                prev = next;
            }
            chords.push((prev, v1.point()));
        }

        chords
    }
}
