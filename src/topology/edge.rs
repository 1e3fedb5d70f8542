use super::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the plan graph.
    pub struct EdgeId;
}

/// An undirected edge between two distinct snapped vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub start: VertexId,
    pub end: VertexId,
    /// Raw entities that contributed this edge.
    pub sources: Vec<usize>,
}

impl EdgeData {
    /// Returns the endpoint opposite `v`, or `None` if `v` is not on this edge.
    #[must_use]
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if v == self.start {
            Some(self.end)
        } else if v == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    #[must_use]
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }
}
