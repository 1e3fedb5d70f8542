use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{NestedRingPolicy, PipelineConfig};
use crate::dxf;
use crate::error::Result;
use crate::geometry::{RawEntity, Ring, RingRole};
use crate::math::polygon_2d::signed_area_2d;
use crate::operations::{
    ExtractSegments, PolygonBuilder, RingMeasure, RingNesting, RingOffset, WallLengthApprox,
};
use crate::report::{Condition, MeasurementResult, Report, RingDefect, Totals};

/// Per-ring output of the parallel measuring stage.
struct RingOutcome {
    result: MeasurementResult,
    /// Area of the inward offset, when it succeeded.
    inset_area: Option<f64>,
    /// Area of the outward offset; used when the ring is a void.
    outset_area: f64,
    conditions: Vec<Condition>,
}

/// Runs the whole chain: extraction, polygon building, nesting,
/// per-ring measurement and totals.
///
/// Rings are measured in parallel; output order follows ring ids.
#[derive(Debug)]
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Measures a drawing given as raw entities.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid. Problems with
    /// individual entities or rooms never fail the run; they are returned
    /// as [`Condition`]s in the report.
    pub fn run(&self, entities: &[RawEntity]) -> Result<Report> {
        let config = self.config;
        config.validate()?;
        info!(entities = entities.len(), "measuring drawing");

        let extraction = ExtractSegments::new(entities, config).execute();
        let mut conditions = extraction.conditions;
        for condition in &conditions {
            warn!(%condition, "segment extractor");
        }

        let built = PolygonBuilder::new(&extraction.segments, config).execute();
        let rejected = built.rejected;
        let mut rings = built.rings;
        conditions.extend(built.conditions);
        self.assign_nesting(&mut rings, |id| rejected.contains(&id));

        let outcomes: Vec<RingOutcome> = rings
            .par_iter()
            .map(|ring| self.measure_ring(ring, rejected.contains(&ring.id)))
            .collect::<Result<_>>()?;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut inset_areas = Vec::with_capacity(outcomes.len());
        let mut outset_areas = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            for condition in &outcome.conditions {
                warn!(%condition, "ring measurement");
            }
            conditions.extend(outcome.conditions);
            results.push(outcome.result);
            inset_areas.push(outcome.inset_area);
            outset_areas.push(outcome.outset_area);
        }

        if config.nested_rings == NestedRingPolicy::SubtractVoid {
            let extra = self.subtract_voids(&mut results, &inset_areas, &outset_areas);
            for condition in &extra {
                warn!(%condition, "void subtraction");
            }
            conditions.extend(extra);
        }

        let totals = Totals::from_results(&results);
        info!(
            rings = results.len(),
            rooms = totals.room_count,
            built_up_area = totals.built_up_area,
            carpet_area = totals.carpet_area,
            conditions = conditions.len(),
            "measured drawing"
        );

        Ok(Report {
            units: config.units.clone(),
            wall_thickness: config.wall_thickness,
            offset_distance: config.effective_offset(),
            rings: results,
            totals,
            conditions,
        })
    }

    /// Reads a DXF file and measures it.
    ///
    /// # Errors
    ///
    /// Returns `DxfError` for unreadable input, otherwise as [`run`](Self::run).
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<Report> {
        let entities = dxf::read_file(path)?;
        self.run(&entities)
    }

    /// Sets parent and role of accepted primary outlines by containment.
    fn assign_nesting(&self, rings: &mut [Ring], is_rejected: impl Fn(usize) -> bool) {
        let outlines: Vec<&Ring> = rings
            .iter()
            .filter(|r| r.role == RingRole::Primary && !is_rejected(r.id))
            .collect();
        let nesting = RingNesting::new(&outlines, self.config.tolerance).execute();

        for c in nesting {
            if let Some(ring) = rings.get_mut(c.ring) {
                ring.parent = c.parent;
                ring.role = c.role(self.config.nested_rings);
            }
        }
    }

    fn measure_ring(&self, ring: &Ring, rejected: bool) -> Result<RingOutcome> {
        let config = self.config;
        let metrics = RingMeasure::new(&ring.points).execute()?;
        let mut conditions = Vec::new();

        let too_small = metrics.is_degenerate(config.effective_min_ring_area());
        if too_small {
            conditions.push(Condition::DegenerateRing {
                ring: ring.id,
                defect: RingDefect::TooSmall,
                area: metrics.area,
                vertices: ring.points.clone(),
            });
        }

        let distance = config.effective_offset();
        let fallback = metrics.area * config.carpet_fallback_factor;
        let inset_area = if too_small {
            None
        } else {
            match self.offset_area(ring, distance) {
                Ok(inset) => Some(inset),
                Err(err) => {
                    conditions.push(Condition::CollapsedOffset {
                        ring: ring.id,
                        distance,
                        fallback_factor: config.carpet_fallback_factor,
                        reason: err.to_string(),
                    });
                    None
                }
            }
        };

        let outset_area = if ring.role == RingRole::Void {
            self.offset_area(ring, -distance)
                .unwrap_or(metrics.area)
        } else {
            metrics.area
        };

        let wall_approx = WallLengthApprox::from_bounds(&metrics.bounds, config.wall_thickness);
        let walls = if too_small {
            wall_approx.uncorrected()
        } else {
            wall_approx.execute().unwrap_or_else(|_| {
                conditions.push(Condition::InvalidWallGeometry {
                    ring: ring.id,
                    width: metrics.bounds.width(),
                    height: metrics.bounds.height(),
                    wall_thickness: config.wall_thickness,
                });
                wall_approx.uncorrected()
            })
        };

        let counted = ring.role == RingRole::Primary && !rejected && !too_small;
        debug!(
            ring = ring.id,
            role = ?ring.role,
            counted,
            area = metrics.area,
            "measured ring"
        );

        Ok(RingOutcome {
            result: MeasurementResult {
                ring: ring.id,
                component: ring.component,
                role: ring.role,
                parent: ring.parent,
                counted,
                built_up_area: metrics.area,
                carpet_area: inset_area.unwrap_or(fallback),
                carpet_is_fallback: inset_area.is_none(),
                perimeter: metrics.perimeter,
                long_wall_length: walls.long,
                short_wall_length: walls.short,
                bounds: metrics.bounds,
                centroid: metrics.centroid,
                vertices: ring.points.clone(),
            },
            inset_area,
            outset_area,
            conditions,
        })
    }

    /// Total area of the offset pieces; a pinched room keeps every piece.
    fn offset_area(&self, ring: &Ring, distance: f64) -> Result<f64> {
        let pieces = RingOffset::new(&ring.points, distance)
            .with_miter_limit(self.config.miter_limit)
            .with_tolerance(self.config.tolerance)
            .execute_pieces()?;
        Ok(pieces.iter().map(|p| signed_area_2d(p).abs()).sum())
    }

    /// Takes each void's area out of its parent outline.
    ///
    /// The parent's built-up area loses the void's area; its carpet area
    /// loses the void grown by the offset distance (the courtyard walls).
    fn subtract_voids(
        &self,
        results: &mut [MeasurementResult],
        inset_areas: &[Option<f64>],
        outset_areas: &[f64],
    ) -> Vec<Condition> {
        let mut voids: BTreeMap<usize, (f64, f64)> = BTreeMap::new();
        for r in results.iter().filter(|r| r.role == RingRole::Void) {
            if let Some(parent) = r.parent {
                let entry = voids.entry(parent).or_insert((0.0, 0.0));
                entry.0 += r.built_up_area;
                entry.1 += outset_areas.get(r.ring).copied().unwrap_or(r.built_up_area);
            }
        }

        let factor = self.config.carpet_fallback_factor;
        let distance = self.config.effective_offset();
        let mut conditions = Vec::new();
        for (parent, (void_area, void_outset)) in voids {
            let Some(result) = results.get_mut(parent) else {
                continue;
            };
            result.built_up_area = (result.built_up_area - void_area).max(0.0);
            let carpet = inset_areas
                .get(parent)
                .copied()
                .flatten()
                .map(|inset| inset - void_outset);
            match carpet {
                Some(c) if c > 0.0 => result.carpet_area = c,
                Some(_) => {
                    conditions.push(Condition::CollapsedOffset {
                        ring: parent,
                        distance,
                        fallback_factor: factor,
                        reason: "courtyard walls leave no floor".to_owned(),
                    });
                    result.carpet_area = result.built_up_area * factor;
                    result.carpet_is_fallback = true;
                }
                None => result.carpet_area = result.built_up_area * factor,
            }
        }
        conditions
    }
}
