use serde::Serialize;

use crate::error::{OperationError, Result};
use crate::math::polygon_2d::Aabb;

/// Wall run totals for the long-wall/short-wall method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallLengths {
    /// Both walls along the longer bounding dimension.
    pub long: f64,
    /// Both walls along the shorter bounding dimension.
    pub short: f64,
}

/// Derives wall lengths from a room's bounding box and wall thickness.
///
/// `long = 2 (max(w, h) - t)` and `short = 2 (min(w, h) - t)`: the outer
/// dimensions corrected to wall centerlines. Non-rectangular footprints are
/// approximated by their bounding box.
#[derive(Debug, Clone, Copy)]
pub struct WallLengthApprox {
    width: f64,
    height: f64,
    thickness: f64,
}

impl WallLengthApprox {
    #[must_use]
    pub fn new(width: f64, height: f64, thickness: f64) -> Self {
        Self {
            width,
            height,
            thickness,
        }
    }

    #[must_use]
    pub fn from_bounds(bounds: &Aabb, thickness: f64) -> Self {
        Self::new(bounds.width(), bounds.height(), thickness)
    }

    /// Executes the approximation.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::WallExceedsExtent` if either dimension is no
    /// larger than the wall thickness.
    pub fn execute(&self) -> Result<WallLengths> {
        if self.width <= self.thickness || self.height <= self.thickness {
            return Err(OperationError::WallExceedsExtent {
                width: self.width,
                height: self.height,
                thickness: self.thickness,
            }
            .into());
        }
        let (long, short) = self.extents();
        Ok(WallLengths {
            long: 2.0 * (long - self.thickness),
            short: 2.0 * (short - self.thickness),
        })
    }

    /// Outer-dimension lengths without the thickness correction.
    #[must_use]
    pub fn uncorrected(&self) -> WallLengths {
        let (long, short) = self.extents();
        WallLengths {
            long: 2.0 * long,
            short: 2.0 * short,
        }
    }

    fn extents(&self) -> (f64, f64) {
        (self.width.max(self.height), self.width.min(self.height))
    }
}
