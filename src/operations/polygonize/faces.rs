use std::collections::HashSet;

use slotmap::SecondaryMap;

use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;
use crate::topology::{EdgeId, PlanGraph, VertexId};

/// Faces traced from one connected component.
#[derive(Debug, Default)]
pub struct ComponentFaces {
    /// Boundary of the unbounded face, counter-clockwise.
    pub outer: Option<Vec<Point2>>,
    /// Bounded faces, counter-clockwise. Empty when the component is a
    /// single loop (its only bounded face equals the outer boundary).
    pub inner: Vec<Vec<Point2>>,
}

/// Repeatedly strips degree-1 vertices from `component`, removing the
/// dangling chains they terminate.
///
/// Returns the dead ends present before pruning.
pub fn prune_dangling(graph: &mut PlanGraph, component: &[VertexId]) -> Vec<VertexId> {
    let dead_ends: Vec<VertexId> = component
        .iter()
        .copied()
        .filter(|&v| graph.degree(v) == 1)
        .collect();

    let mut stack = dead_ends.clone();
    while let Some(v) = stack.pop() {
        if graph.degree(v) != 1 {
            continue;
        }
        let Some(edge) = graph.vertex(v).and_then(|d| d.edges.first().copied()) else {
            continue;
        };
        let Some(data) = graph.remove_edge(edge) else {
            continue;
        };
        if let Some(other) = data.other(v) {
            if graph.degree(other) == 1 {
                stack.push(other);
            }
        }
    }
    dead_ends
}

/// Vertices of `component` where more than two edges meet.
#[must_use]
pub fn junctions(graph: &PlanGraph, component: &[VertexId]) -> Vec<VertexId> {
    component
        .iter()
        .copied()
        .filter(|&v| graph.degree(v) > 2)
        .collect()
}

/// Traces every face of a connected planar component.
///
/// Half-edges around each vertex are ordered by angle; leaving a vertex,
/// the walk takes the half-edge immediately clockwise from the one it
/// arrived on, which keeps the face on its left. Bounded faces come out
/// counter-clockwise and the unbounded face clockwise.
#[must_use]
pub fn trace_faces(graph: &PlanGraph, component: &[VertexId]) -> ComponentFaces {
    let fan = angular_fans(graph, component);

    let mut visited: HashSet<(VertexId, VertexId)> = HashSet::new();
    let mut faces: Vec<Vec<Point2>> = Vec::new();

    for &start in component {
        let Some(neighbours) = fan.get(start) else {
            continue;
        };
        for &(_, first) in neighbours {
            if visited.contains(&(start, first)) {
                continue;
            }
            if let Some(face) = walk_face(graph, &fan, &mut visited, start, first) {
                faces.push(face);
            }
        }
    }

    let mut areas: Vec<(usize, f64)> = faces
        .iter()
        .enumerate()
        .map(|(i, f)| (i, signed_area_2d(f)))
        .collect();
    areas.sort_by(|a, b| a.1.total_cmp(&b.1));

    let Some(&(outer_idx, outer_area)) = areas.first() else {
        return ComponentFaces::default();
    };
    if outer_area >= 0.0 {
        // No clockwise face: nothing encloses area.
        return ComponentFaces::default();
    }

    let mut outer = faces[outer_idx].clone();
    outer.reverse();

    let inner: Vec<Vec<Point2>> = areas
        .iter()
        .filter(|&&(_, a)| a > 0.0)
        .map(|&(i, _)| faces[i].clone())
        .collect();
    let single_loop = inner.len() == 1;

    ComponentFaces {
        outer: Some(outer),
        inner: if single_loop { Vec::new() } else { inner },
    }
}

/// Neighbours of every vertex sorted counter-clockwise by direction angle.
fn angular_fans(
    graph: &PlanGraph,
    component: &[VertexId],
) -> SecondaryMap<VertexId, Vec<(f64, VertexId)>> {
    let mut fan = SecondaryMap::new();
    for &v in component {
        let Some(data) = graph.vertex(v) else {
            continue;
        };
        let mut around: Vec<(f64, VertexId)> = data
            .edges
            .iter()
            .filter_map(|&e: &EdgeId| {
                let w = graph.edge(e)?.other(v)?;
                let d = graph.point(w)? - data.point;
                Some((d.y.atan2(d.x), w))
            })
            .collect();
        if around.is_empty() {
            continue;
        }
        around.sort_by(|a, b| a.0.total_cmp(&b.0));
        fan.insert(v, around);
    }
    fan
}

fn walk_face(
    graph: &PlanGraph,
    fan: &SecondaryMap<VertexId, Vec<(f64, VertexId)>>,
    visited: &mut HashSet<(VertexId, VertexId)>,
    start: VertexId,
    first: VertexId,
) -> Option<Vec<Point2>> {
    let mut face = Vec::new();
    let (mut from, mut to) = (start, first);
    loop {
        if !visited.insert((from, to)) {
            // Closed back on the starting half-edge, or on a walk that was
            // already traced (non-planar input).
            return (from == start && to == first).then_some(face);
        }
        face.push(graph.point(from)?);

        let around = fan.get(to)?;
        let arrived = around.iter().position(|&(_, w)| w == from)?;
        let next = if arrived == 0 {
            around.len() - 1
        } else {
            arrived - 1
        };
        from = to;
        to = around[next].1;
    }
}
