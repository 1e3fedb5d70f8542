use crate::math::Point2;

/// One drawn straight line, produced by the segment extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
    /// Index of the raw entity this segment came from.
    pub source: usize,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point2, end: Point2, source: usize) -> Self {
        Self { start, end, source }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.start, &self.end)
    }
}
