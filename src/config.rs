use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::operations::boq::BoqAssumptions;

/// What to do with an outline found inside another outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedRingPolicy {
    /// Inner outlines are courtyards/voids and are subtracted from the
    /// enclosing outline.
    #[default]
    SubtractVoid,
    /// Inner outlines are rooms in their own right; the enclosing outline
    /// keeps its full area.
    SeparateRoom,
}

/// Settings shared by every stage of one pipeline run.
///
/// Read-only once built; operations receive it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Endpoint snapping distance ε in drawing units.
    pub tolerance: f64,
    pub wall_thickness: f64,
    /// Inward offset for carpet area; half the wall thickness when unset.
    pub offset_distance: Option<f64>,
    /// Longest allowed miter, as a multiple of the offset distance.
    pub miter_limit: f64,
    /// Carpet/built-up ratio used when the inward offset collapses.
    pub carpet_fallback_factor: f64,
    /// Rings smaller than this are degenerate; ε² when unset.
    pub min_ring_area: Option<f64>,
    /// Maximum chord deviation when flattening bulged polyline segments.
    pub arc_tolerance: f64,
    /// Layer names whose entities are ignored (case-insensitive).
    pub ignored_layers: BTreeSet<String>,
    /// Accept components whose walls meet in T or cross junctions.
    pub allow_junctions: bool,
    pub nested_rings: NestedRingPolicy,
    /// Unit label carried into reports. No conversion is applied.
    pub units: String,
    pub boq: BoqAssumptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            wall_thickness: 0.2,
            offset_distance: None,
            miter_limit: 2.0,
            carpet_fallback_factor: 0.88,
            min_ring_area: None,
            arc_tolerance: 1e-2,
            ignored_layers: ["TEXT", "DIMENSIONS", "DIM", "HATCH", "DEFPOINTS"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            allow_junctions: false,
            nested_rings: NestedRingPolicy::default(),
            units: "m".to_owned(),
            boq: BoqAssumptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys, or
    /// any error from [`validate`](Self::validate).
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Checks every numeric setting for a usable value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("tolerance", "finite and > 0", self.tolerance, |v| v > 0.0)?;
        check("wall_thickness", "finite and >= 0", self.wall_thickness, |v| {
            v >= 0.0
        })?;
        // A derived offset is reported against the wall thickness.
        let offset_field = if self.offset_distance.is_some() {
            "offset_distance"
        } else {
            "wall_thickness"
        };
        check(offset_field, "finite and > 0", self.effective_offset(), |v| {
            v > 0.0
        })?;
        check("miter_limit", "finite and >= 1", self.miter_limit, |v| v >= 1.0)?;
        check(
            "carpet_fallback_factor",
            "in (0, 1]",
            self.carpet_fallback_factor,
            |v| v > 0.0 && v <= 1.0,
        )?;
        if let Some(a) = self.min_ring_area {
            check("min_ring_area", "finite and >= 0", a, |v| v >= 0.0)?;
        }
        check("arc_tolerance", "finite and > 0", self.arc_tolerance, |v| v > 0.0)?;
        self.boq.validate()
    }

    /// Inward offset distance used for carpet area.
    #[must_use]
    pub fn effective_offset(&self) -> f64 {
        self.offset_distance.unwrap_or(self.wall_thickness * 0.5)
    }

    #[must_use]
    pub fn effective_min_ring_area(&self) -> f64 {
        self.min_ring_area
            .unwrap_or(self.tolerance * self.tolerance)
    }

    /// Whether entities on `layer` are skipped.
    #[must_use]
    pub fn is_ignored_layer(&self, layer: &str) -> bool {
        self.ignored_layers
            .iter()
            .any(|l| l.eq_ignore_ascii_case(layer))
    }
}

pub(crate) fn check(
    field: &'static str,
    requirement: &'static str,
    value: f64,
    ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            requirement,
            value,
        })
    }
}
