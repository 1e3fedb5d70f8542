use std::collections::HashMap;

use crate::math::Point2;

use super::VertexId;

/// Uniform grid keyed by rounded coordinates, cell size = snapping tolerance.
///
/// A point within tolerance of a stored vertex always lies in one of the
/// 3x3 cells around its own cell, so a lookup is a bounded scan.
#[derive(Debug)]
pub struct SnapGrid {
    cell: f64,
    cells: HashMap<(i64, i64), Vec<VertexId>>,
}

impl SnapGrid {
    #[must_use]
    pub fn new(cell: f64) -> Self {
        Self {
            cell,
            cells: HashMap::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn key(&self, p: &Point2) -> (i64, i64) {
        (
            (p.x / self.cell).round() as i64,
            (p.y / self.cell).round() as i64,
        )
    }

    /// Registers `id` at position `p`.
    pub fn insert(&mut self, p: &Point2, id: VertexId) {
        let key = self.key(p);
        self.cells.entry(key).or_default().push(id);
    }

    /// Candidate vertices in the 3x3 neighbourhood of `p`, in insertion order
    /// per cell.
    pub fn candidates(&self, p: &Point2) -> impl Iterator<Item = VertexId> + '_ {
        let (kx, ky) = self.key(p);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (kx + dx, ky + dy)))
            .filter_map(|k| self.cells.get(&k))
            .flatten()
            .copied()
    }
}
