use serde::{Deserialize, Serialize};

use super::pline::{Pline, PlineVertex};

/// Kind of a raw drawing entity as reported by the DXF reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Line,
    Polyline,
    LwPolyline,
    /// Any other DXF entity type, kept by name so it can be reported.
    Other(String),
}

impl EntityKind {
    /// DXF type name of this kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Line => "LINE",
            Self::Polyline => "POLYLINE",
            Self::LwPolyline => "LWPOLYLINE",
            Self::Other(name) => name,
        }
    }
}

/// A raw line or polyline record handed over by the drawing reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    pub kind: EntityKind,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub vertices: Vec<PlineVertex>,
    #[serde(default)]
    pub closed: bool,
}

impl RawEntity {
    /// A LINE from `(x0, y0)` to `(x1, y1)` on `layer`.
    #[must_use]
    pub fn line(layer: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            kind: EntityKind::Line,
            layer: layer.to_owned(),
            vertices: vec![PlineVertex::line(x0, y0), PlineVertex::line(x1, y1)],
            closed: false,
        }
    }

    /// An LWPOLYLINE through straight-edged `points` on `layer`.
    #[must_use]
    pub fn polyline(layer: &str, points: &[(f64, f64)], closed: bool) -> Self {
        Self {
            kind: EntityKind::LwPolyline,
            layer: layer.to_owned(),
            vertices: points.iter().map(|&(x, y)| PlineVertex::line(x, y)).collect(),
            closed,
        }
    }

    /// Vertex list viewed as a polyline.
    #[must_use]
    pub fn to_pline(&self) -> Pline {
        Pline {
            vertices: self.vertices.clone(),
            closed: self.closed,
        }
    }
}
