use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the estimation pipeline.
///
/// Only failures that make a whole run meaningless end up here. Problems
/// with individual entities or rooms are collected as
/// [`Condition`](crate::report::Condition)s instead.
#[derive(Debug, Error)]
pub enum EstiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dxf(#[from] DxfError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors in a [`PipelineConfig`](crate::config::PipelineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be {requirement} (got {value})")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised while reading a DXF drawing.
#[derive(Debug, Error)]
pub enum DxfError {
    #[error("DXF I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("binary DXF is not supported")]
    Binary,

    #[error("DXF parse error: expected an even number of lines (code/value pairs)")]
    OddNumberOfLines,

    #[error("DXF parse error: invalid group code {raw:?} at line {line}")]
    InvalidGroupCode { raw: String, line: usize },

    #[error("DXF parse error: missing ENTITIES section")]
    MissingEntitiesSection,

    #[error("DXF parse error: unexpected end of file while parsing {context}")]
    UnexpectedEof { context: &'static str },

    #[error("DXF parse error: invalid float {raw:?} for group code {code} in entity {entity}")]
    InvalidFloat {
        entity: &'static str,
        code: i32,
        raw: String,
    },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length segment between ({x0}, {y0}) and ({x1}, {y1})")]
    ZeroLengthSegment { x0: f64, y0: f64, x1: f64, y1: f64 },
}

/// Errors related to ring operations (offset, wall approximation).
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("offset collapsed: {0}")]
    Collapsed(String),

    #[error("wall thickness {thickness} exceeds room extent {width} x {height}")]
    WallExceedsExtent {
        width: f64,
        height: f64,
        thickness: f64,
    },
}

/// Convenience type alias for results using [`EstiError`].
pub type Result<T> = std::result::Result<T, EstiError>;
