use crate::math::Point2;

use super::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a snapped vertex in the plan graph.
    pub struct VertexId;
}

/// A logical vertex: every segment endpoint within tolerance maps here.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Position of the first endpoint snapped to this vertex.
    pub point: Point2,
    /// Incident edges.
    pub edges: Vec<EdgeId>,
}

impl VertexData {
    /// Creates a new vertex at the given point with no incident edges.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}
