pub mod components;
pub mod edge;
pub mod snap;
pub mod vertex;

pub use components::DisjointSet;
pub use edge::{EdgeData, EdgeId};
pub use snap::SnapGrid;
pub use vertex::{VertexData, VertexId};

use slotmap::SlotMap;

use crate::math::Point2;

/// Arena that owns the snapped vertices and edges of a drawing.
///
/// Every endpoint is stored once as a vertex; edges refer to vertices by
/// typed IDs (generational indices), so snapping by tolerance is a grid
/// lookup rather than a pointer search.
#[derive(Debug)]
pub struct PlanGraph {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    grid: SnapGrid,
    tolerance: f64,
}

impl PlanGraph {
    /// Creates an empty graph snapping endpoints closer than `tolerance`.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            grid: SnapGrid::new(tolerance),
            tolerance,
        }
    }

    // --- Vertex operations ---

    /// Returns the vertex within tolerance of `p`, creating one if none exists.
    pub fn snap_vertex(&mut self, p: Point2) -> VertexId {
        let tol_sq = self.tolerance * self.tolerance;
        let nearest = self
            .grid
            .candidates(&p)
            .filter_map(|id| {
                let d = (self.vertices.get(id)?.point - p).norm_squared();
                (d <= tol_sq).then_some((id, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((id, _)) = nearest {
            return id;
        }
        let id = self.vertices.insert(VertexData::new(p));
        self.grid.insert(&p, id);
        id
    }

    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&VertexData> {
        self.vertices.get(id)
    }

    #[must_use]
    pub fn point(&self, id: VertexId) -> Option<Point2> {
        self.vertices.get(id).map(|v| v.point)
    }

    #[must_use]
    pub fn degree(&self, id: VertexId) -> usize {
        self.vertices.get(id).map_or(0, VertexData::degree)
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge operations ---

    /// Connects the vertices snapped from `a` and `b`.
    ///
    /// Returns `None` when both ends snap to the same vertex. A segment
    /// between an already connected pair is folded into the existing edge.
    pub fn add_segment(&mut self, a: Point2, b: Point2, source: usize) -> Option<EdgeId> {
        let start = self.snap_vertex(a);
        let end = self.snap_vertex(b);
        if start == end {
            return None;
        }
        let existing = self.vertices.get(start).and_then(|v| {
            v.edges
                .iter()
                .copied()
                .find(|&e| self.edges.get(e).is_some_and(|d| d.connects(start, end)))
        });
        if let Some(e) = existing {
            if let Some(data) = self.edges.get_mut(e) {
                if !data.sources.contains(&source) {
                    data.sources.push(source);
                }
            }
            return Some(e);
        }
        let id = self.edges.insert(EdgeData {
            start,
            end,
            sources: vec![source],
        });
        for v in [start, end] {
            if let Some(data) = self.vertices.get_mut(v) {
                data.edges.push(id);
            }
        }
        Some(id)
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&EdgeData> {
        self.edges.get(id)
    }

    /// Removes an edge and detaches it from both endpoints.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<EdgeData> {
        let data = self.edges.remove(id)?;
        for v in [data.start, data.end] {
            if let Some(vd) = self.vertices.get_mut(v) {
                vd.edges.retain(|&e| e != id);
            }
        }
        Some(data)
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Queries ---

    /// Groups vertices that have at least one edge into connected components,
    /// ordered by their earliest vertex.
    #[must_use]
    pub fn components(&self) -> Vec<Vec<VertexId>> {
        let mut sets = DisjointSet::new();
        for e in self.edges.values() {
            sets.union(e.start, e.end);
        }
        let mut order: Vec<VertexId> = Vec::new();
        let mut groups: slotmap::SecondaryMap<VertexId, Vec<VertexId>> =
            slotmap::SecondaryMap::new();
        for (id, data) in &self.vertices {
            if data.edges.is_empty() {
                continue;
            }
            let root = sets.find(id);
            if let Some(group) = groups.get_mut(root) {
                group.push(id);
            } else {
                order.push(root);
                groups.insert(root, vec![id]);
            }
        }
        order
            .into_iter()
            .filter_map(|root| groups.remove(root))
            .collect()
    }
}
