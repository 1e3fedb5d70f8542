use serde::Serialize;

use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;

/// How a ring relates to the other rings of the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RingRole {
    /// Outer outline of a connected component.
    Primary,
    /// Bounded face inside a component with internal walls.
    Partition,
    /// Outline enclosed by another outline and treated as a hole.
    Void,
    /// Outline enclosed by another outline and measured as its own room.
    Nested,
}

/// A closed polygon, counter-clockwise, without repeated closing vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: usize,
    /// Connected component of the segment graph the ring was traced from.
    pub component: usize,
    pub role: RingRole,
    /// Enclosing ring for voids and nested outlines.
    pub parent: Option<usize>,
    pub points: Vec<Point2>,
}

impl Ring {
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}
