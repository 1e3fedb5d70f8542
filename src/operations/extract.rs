use tracing::debug;

use crate::config::PipelineConfig;
use crate::geometry::{EntityKind, RawEntity, Segment};
use crate::report::Condition;

/// Segments pulled from a drawing plus the entities that were skipped.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub segments: Vec<Segment>,
    pub conditions: Vec<Condition>,
}

/// Flattens LINE and (LW)POLYLINE entities into straight segments.
///
/// - LINE: exactly one segment.
/// - Open polyline of N vertices: N-1 segments; closed: N (last to first).
/// - Bulged polyline segments are tessellated within `arc_tolerance`.
/// - Entities on ignored layers are dropped without a condition.
/// - Any other entity kind is reported as `UnsupportedEntity` and skipped.
/// - Segments shorter than the snapping tolerance carry no geometry and
///   are dropped.
#[derive(Debug)]
pub struct ExtractSegments<'a> {
    entities: &'a [RawEntity],
    config: &'a PipelineConfig,
}

impl<'a> ExtractSegments<'a> {
    #[must_use]
    pub fn new(entities: &'a [RawEntity], config: &'a PipelineConfig) -> Self {
        Self { entities, config }
    }

    /// Runs the extraction. Never fails; problems become conditions.
    #[must_use]
    pub fn execute(&self) -> Extraction {
        let mut out = Extraction::default();
        let mut ignored = 0_usize;

        for (index, entity) in self.entities.iter().enumerate() {
            if self.config.is_ignored_layer(&entity.layer) {
                ignored += 1;
                continue;
            }
            if let Err(condition) = self.extract_one(index, entity, &mut out.segments) {
                out.conditions.push(condition);
            }
        }

        debug!(
            entities = self.entities.len(),
            ignored,
            segments = out.segments.len(),
            skipped = out.conditions.len(),
            "extracted segments"
        );
        out
    }

    fn extract_one(
        &self,
        index: usize,
        entity: &RawEntity,
        segments: &mut Vec<Segment>,
    ) -> Result<(), Condition> {
        let malformed = |reason: &str| Condition::MalformedEntity {
            entity: index,
            entity_kind: entity.kind.name().to_owned(),
            reason: reason.to_owned(),
        };

        match &entity.kind {
            EntityKind::Other(name) => {
                return Err(Condition::UnsupportedEntity {
                    entity: index,
                    entity_kind: name.clone(),
                    layer: entity.layer.clone(),
                })
            }
            EntityKind::Line if entity.vertices.len() != 2 => {
                return Err(malformed("a line needs exactly two endpoints"));
            }
            EntityKind::Polyline | EntityKind::LwPolyline if entity.vertices.len() < 2 => {
                return Err(malformed("a polyline needs at least two vertices"));
            }
            _ => {}
        }
        if !entity.vertices.iter().all(|v| v.is_finite()) {
            return Err(malformed("non-finite coordinate"));
        }

        let mut pline = entity.to_pline();
        if entity.kind == EntityKind::Line {
            // A LINE is never an arc and never closed.
            pline.closed = false;
            for v in &mut pline.vertices {
                v.bulge = 0.0;
            }
        }

        let min_len = self.config.tolerance;
        segments.extend(
            pline
                .to_chords(self.config.arc_tolerance)
                .into_iter()
                .map(|(a, b)| Segment::new(a, b, index))
                .filter(|s| s.length() > min_len),
        );
        Ok(())
    }
}
