use tracing::debug;

use crate::config::NestedRingPolicy;
use crate::geometry::{Ring, RingRole};
use crate::math::polygon_2d::contains_point;

/// Where a ring sits in the containment hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Containment {
    pub ring: usize,
    /// Smallest ring enclosing this one.
    pub parent: Option<usize>,
    /// Number of rings enclosing this one.
    pub depth: usize,
}

impl Containment {
    /// Odd depth: the ring lies inside an outline rather than beside one.
    #[must_use]
    pub fn is_inner(&self) -> bool {
        self.depth % 2 == 1
    }

    /// Role under `policy`, for a ring traced as a primary outline.
    #[must_use]
    pub fn role(&self, policy: NestedRingPolicy) -> RingRole {
        match (self.is_inner(), policy) {
            (false, _) => RingRole::Primary,
            (true, NestedRingPolicy::SubtractVoid) => RingRole::Void,
            (true, NestedRingPolicy::SeparateRoom) => RingRole::Nested,
        }
    }
}

/// Finds, for each outline, the outlines that enclose it.
///
/// Ring A encloses ring B when every vertex of B lies inside or on A
/// (within `tolerance`) and A is strictly larger.
#[derive(Debug)]
pub struct RingNesting<'a> {
    rings: &'a [&'a Ring],
    tolerance: f64,
}

impl<'a> RingNesting<'a> {
    #[must_use]
    pub fn new(rings: &'a [&'a Ring], tolerance: f64) -> Self {
        Self { rings, tolerance }
    }

    /// One entry per input ring, in input order.
    #[must_use]
    pub fn execute(&self) -> Vec<Containment> {
        let areas: Vec<f64> = self.rings.iter().map(|r| r.area()).collect();

        let result: Vec<Containment> = self
            .rings
            .iter()
            .enumerate()
            .map(|(i, inner)| {
                let containers: Vec<usize> = (0..self.rings.len())
                    .filter(|&j| j != i && areas[j] > areas[i])
                    .filter(|&j| self.encloses(self.rings[j], inner))
                    .collect();
                let parent = containers
                    .iter()
                    .copied()
                    .min_by(|&a, &b| areas[a].total_cmp(&areas[b]))
                    .map(|j| self.rings[j].id);
                Containment {
                    ring: inner.id,
                    parent,
                    depth: containers.len(),
                }
            })
            .collect();

        debug!(
            rings = self.rings.len(),
            nested = result.iter().filter(|c| c.parent.is_some()).count(),
            "resolved ring nesting"
        );
        result
    }

    fn encloses(&self, outer: &Ring, inner: &Ring) -> bool {
        inner
            .points
            .iter()
            .all(|p| contains_point(&outer.points, p, self.tolerance))
    }
}
