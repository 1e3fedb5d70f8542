use serde::Serialize;
use thiserror::Error;

use crate::geometry::RingRole;
use crate::math::polygon_2d::Aabb;
use crate::math::Point2;

/// Why a component's topology was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyIssue {
    /// Lines ending in a vertex touched by nothing else.
    DanglingEnd,
    /// Vertices where three or more lines meet.
    Junction,
}

impl std::fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingEnd => f.write_str("dangling line ends"),
            Self::Junction => f.write_str("junctions of three or more lines"),
        }
    }
}

/// Why a traced ring was set aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RingDefect {
    /// Enclosed area below the configured minimum.
    TooSmall,
    /// Edges cross or a vertex is visited twice.
    SelfIntersecting,
}

impl std::fmt::Display for RingDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooSmall => f.write_str("area below minimum"),
            Self::SelfIntersecting => f.write_str("self-intersecting"),
        }
    }
}

/// A non-fatal finding collected during a run.
///
/// Every condition is returned to the caller; none aborts the pipeline.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    #[error("entity #{entity} ({entity_kind}) on layer {layer:?} is not a line or polyline; skipped")]
    UnsupportedEntity {
        entity: usize,
        entity_kind: String,
        layer: String,
    },

    #[error("entity #{entity} ({entity_kind}) is malformed: {reason}; skipped")]
    MalformedEntity {
        entity: usize,
        entity_kind: String,
        reason: String,
    },

    #[error("component {component} has {issue} at {} vertices; its rings are excluded from totals", .vertices.len())]
    DegenerateTopology {
        component: usize,
        issue: TopologyIssue,
        vertices: Vec<Point2>,
    },

    #[error("ring {ring} is degenerate ({defect}, area {area:.6}); excluded from totals")]
    DegenerateRing {
        ring: usize,
        defect: RingDefect,
        area: f64,
        vertices: Vec<Point2>,
    },

    #[error("inward offset of ring {ring} by {distance} collapsed ({reason}); carpet area = built-up area x {fallback_factor}")]
    CollapsedOffset {
        ring: usize,
        distance: f64,
        fallback_factor: f64,
        reason: String,
    },

    #[error("wall thickness {wall_thickness} exceeds extent {width} x {height} of ring {ring}; wall lengths use outer dimensions")]
    InvalidWallGeometry {
        ring: usize,
        width: f64,
        height: f64,
        wall_thickness: f64,
    },
}

/// Scalar results for one ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementResult {
    pub ring: usize,
    pub component: usize,
    pub role: RingRole,
    pub parent: Option<usize>,
    /// Whether this ring contributes to [`Totals`].
    pub counted: bool,
    /// Enclosed area, less any voids.
    pub built_up_area: f64,
    pub carpet_area: f64,
    /// `true` when `carpet_area` came from the fallback factor.
    pub carpet_is_fallback: bool,
    pub perimeter: f64,
    pub long_wall_length: f64,
    pub short_wall_length: f64,
    pub bounds: Aabb,
    pub centroid: Point2,
    pub vertices: Vec<Point2>,
}

/// Sums over counted rings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub built_up_area: f64,
    pub carpet_area: f64,
    pub perimeter: f64,
    pub long_wall_length: f64,
    pub short_wall_length: f64,
    pub room_count: usize,
}

impl Totals {
    /// Accumulates the counted entries of `results`.
    #[must_use]
    pub fn from_results(results: &[MeasurementResult]) -> Self {
        results
            .iter()
            .filter(|r| r.counted)
            .fold(Self::default(), |t, r| Self {
                built_up_area: t.built_up_area + r.built_up_area,
                carpet_area: t.carpet_area + r.carpet_area,
                perimeter: t.perimeter + r.perimeter,
                long_wall_length: t.long_wall_length + r.long_wall_length,
                short_wall_length: t.short_wall_length + r.short_wall_length,
                room_count: t.room_count + 1,
            })
    }
}

/// Everything one run produces: per-ring results, totals and conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub units: String,
    pub wall_thickness: f64,
    pub offset_distance: f64,
    pub rings: Vec<MeasurementResult>,
    pub totals: Totals,
    pub conditions: Vec<Condition>,
}

impl Report {
    /// Conditions that bear on `ring`: those naming it, plus topology
    /// findings for the component it was traced from.
    pub fn conditions_for_ring(&self, ring: usize) -> impl Iterator<Item = &Condition> {
        let component = self.rings.iter().find(|r| r.ring == ring).map(|r| r.component);
        self.conditions.iter().filter(move |c| match c {
            Condition::DegenerateRing { ring: r, .. }
            | Condition::CollapsedOffset { ring: r, .. }
            | Condition::InvalidWallGeometry { ring: r, .. } => *r == ring,
            Condition::DegenerateTopology { component: k, .. } => component == Some(*k),
            _ => false,
        })
    }

    /// Rings that contribute to totals.
    pub fn counted_rings(&self) -> impl Iterator<Item = &MeasurementResult> {
        self.rings.iter().filter(|r| r.counted)
    }
}
