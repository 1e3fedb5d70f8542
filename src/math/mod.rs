pub mod arc_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type in drawing units.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Numerical floor for floating-point comparisons.
///
/// Distinct from the user-facing snapping tolerance in
/// [`PipelineConfig`](crate::config::PipelineConfig), which is in drawing units.
pub const TOLERANCE: f64 = 1e-10;
