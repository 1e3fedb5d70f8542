mod decompose;
mod faces;

pub use decompose::merge_collinear;
pub use faces::{junctions, prune_dangling, trace_faces, ComponentFaces};

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::geometry::{Ring, RingRole, Segment};
use crate::math::intersect_2d::is_simple_polygon;
use crate::math::polygon_2d::{clean_polygon, rotate_to_canonical_start, signed_area_2d};
use crate::math::Point2;
use crate::report::{Condition, RingDefect, TopologyIssue};
use crate::topology::{PlanGraph, VertexId};

/// Rings assembled from a drawing's segments.
#[derive(Debug, Clone, Default)]
pub struct Polygonization {
    /// Every traced ring; `rings[i].id == i`, which the pipeline relies on
    /// to index per-ring results.
    pub rings: Vec<Ring>,
    /// Ids of rings that must not contribute to totals because of a
    /// topology or ring defect.
    pub rejected: BTreeSet<usize>,
    pub conditions: Vec<Condition>,
}

impl Polygonization {
    #[must_use]
    pub fn is_rejected(&self, ring: usize) -> bool {
        self.rejected.contains(&ring)
    }
}

/// Reconstructs closed rings from an unordered set of segments.
///
/// # Algorithm
///
/// 1. Collinear overlaps are merged and T-junctions noded.
/// 2. Endpoints are snapped into a vertex arena within `tolerance`.
/// 3. Each connected component is pruned of dangling chains.
/// 4. Faces are traced on the planar embedding: the unbounded face gives
///    the primary ring, bounded faces of a partitioned component give
///    partition rings.
/// 5. Rings are normalized (counter-clockwise, collinear vertices removed,
///    canonical start) and checked for simplicity.
///
/// Dangling ends, disallowed junctions and self-intersections are reported
/// as conditions; the affected rings are kept but marked rejected.
#[derive(Debug)]
pub struct PolygonBuilder<'a> {
    segments: &'a [Segment],
    config: &'a PipelineConfig,
}

impl<'a> PolygonBuilder<'a> {
    #[must_use]
    pub fn new(segments: &'a [Segment], config: &'a PipelineConfig) -> Self {
        Self { segments, config }
    }

    /// Runs the builder. Never fails; problems become conditions.
    #[must_use]
    pub fn execute(&self) -> Polygonization {
        let tol = self.config.tolerance;
        let merged = merge_collinear(self.segments, tol);

        let mut graph = PlanGraph::new(tol);
        for seg in &merged {
            graph.add_segment(seg.start, seg.end, seg.source);
        }
        let components = graph.components();
        debug!(
            segments = self.segments.len(),
            merged = merged.len(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            components = components.len(),
            "built plan graph"
        );

        let mut out = Polygonization::default();
        for (index, component) in components.iter().enumerate() {
            self.build_component(&mut graph, index, component, &mut out);
        }

        debug!(
            rings = out.rings.len(),
            rejected = out.rejected.len(),
            "polygonized"
        );
        out
    }

    fn build_component(
        &self,
        graph: &mut PlanGraph,
        index: usize,
        component: &[VertexId],
        out: &mut Polygonization,
    ) {
        let tol = self.config.tolerance;
        let mut excluded = false;

        let dead_ends = prune_dangling(graph, component);
        if !dead_ends.is_empty() {
            excluded = true;
            out.conditions.push(raise(Condition::DegenerateTopology {
                component: index,
                issue: TopologyIssue::DanglingEnd,
                vertices: points_of(graph, &dead_ends),
            }));
        }

        let joints = junctions(graph, component);
        if !joints.is_empty() && !self.config.allow_junctions {
            excluded = true;
            out.conditions.push(raise(Condition::DegenerateTopology {
                component: index,
                issue: TopologyIssue::Junction,
                vertices: points_of(graph, &joints),
            }));
        }

        let faces = trace_faces(graph, component);
        let traced = faces
            .outer
            .into_iter()
            .map(|points| (RingRole::Primary, points))
            .chain(
                faces
                    .inner
                    .into_iter()
                    .map(|points| (RingRole::Partition, points)),
            );

        let mut primary = None;
        for (role, points) in traced {
            let id = out.rings.len();
            let parent = match role {
                RingRole::Primary => {
                    primary = Some(id);
                    None
                }
                _ => primary,
            };
            let points = normalize_ring(&points, tol);
            if points.len() >= 3 && !is_simple_polygon(&points, tol) {
                out.rejected.insert(id);
                out.conditions.push(raise(Condition::DegenerateRing {
                    ring: id,
                    defect: RingDefect::SelfIntersecting,
                    area: signed_area_2d(&points).abs(),
                    vertices: points.clone(),
                }));
            }
            if excluded {
                out.rejected.insert(id);
            }
            out.rings.push(Ring {
                id,
                component: index,
                role,
                parent,
                points,
            });
        }
    }
}

/// Counter-clockwise, without duplicate or collinear vertices, starting at
/// the leftmost-lowest vertex.
#[must_use]
pub fn normalize_ring(points: &[Point2], tol: f64) -> Vec<Point2> {
    let mut cleaned = clean_polygon(points, tol);
    if signed_area_2d(&cleaned) < 0.0 {
        cleaned.reverse();
    }
    rotate_to_canonical_start(&cleaned)
}

fn points_of(graph: &PlanGraph, ids: &[VertexId]) -> Vec<Point2> {
    ids.iter().filter_map(|&v| graph.point(v)).collect()
}

fn raise(condition: Condition) -> Condition {
    warn!(%condition, "polygon builder");
    condition
}
