use serde::Serialize;

use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{bounds_2d, centroid_2d, perimeter_2d, signed_area_2d, Aabb};
use crate::math::Point2;

/// Shoelace area, perimeter, bounding box and centroid of one ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingMetrics {
    /// Positive for counter-clockwise rings.
    pub signed_area: f64,
    pub area: f64,
    pub perimeter: f64,
    pub bounds: Aabb,
    pub centroid: Point2,
}

impl RingMetrics {
    /// Whether the ring encloses less than `min_area`.
    #[must_use]
    pub fn is_degenerate(&self, min_area: f64) -> bool {
        self.area < min_area
    }
}

/// Measures a closed ring given as its vertices, closing edge implied.
#[derive(Debug)]
pub struct RingMeasure<'a> {
    points: &'a [Point2],
}

impl<'a> RingMeasure<'a> {
    #[must_use]
    pub fn new(points: &'a [Point2]) -> Self {
        Self { points }
    }

    /// Executes the measurement.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the ring has no vertices.
    pub fn execute(&self) -> Result<RingMetrics> {
        let (Some(bounds), Some(centroid)) = (bounds_2d(self.points), centroid_2d(self.points))
        else {
            return Err(GeometryError::Degenerate("ring has no vertices".to_owned()).into());
        };
        let signed_area = signed_area_2d(self.points);
        Ok(RingMetrics {
            signed_area,
            area: signed_area.abs(),
            perimeter: perimeter_2d(self.points),
            bounds,
            centroid,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn unit_square() {
        let m = RingMeasure::new(&pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]))
            .execute()
            .unwrap();
        assert_relative_eq!(m.area, 1.0);
        assert_relative_eq!(m.perimeter, 4.0);
        assert_relative_eq!(m.centroid.x, 0.5);
        assert_relative_eq!(m.centroid.y, 0.5);
    }

    #[test]
    fn clockwise_rectangle_has_positive_area() {
        let m = RingMeasure::new(&pts(&[(0.0, 0.0), (0.0, 3.0), (7.0, 3.0), (7.0, 0.0)]))
            .execute()
            .unwrap();
        assert_relative_eq!(m.signed_area, -21.0);
        assert_relative_eq!(m.area, 21.0);
        assert_relative_eq!(m.bounds.width(), 7.0);
        assert_relative_eq!(m.bounds.height(), 3.0);
    }

    #[test]
    fn l_shape_area_and_perimeter() {
        let m = RingMeasure::new(&pts(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 4.0),
            (0.0, 4.0),
        ]))
        .execute()
        .unwrap();
        assert_relative_eq!(m.area, 12.0);
        assert_relative_eq!(m.perimeter, 16.0);
    }

    #[test]
    fn sliver_is_degenerate() {
        let m = RingMeasure::new(&pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1e-7)]))
            .execute()
            .unwrap();
        assert!(m.is_degenerate(1e-6));
        assert!(!m.is_degenerate(1e-9));
    }

    #[test]
    fn empty_ring_is_an_error() {
        assert!(RingMeasure::new(&[]).execute().is_err());
    }
}
