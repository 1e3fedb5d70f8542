pub mod boq;
pub mod extract;
pub mod measure;
pub mod nesting;
pub mod offset;
pub mod polygonize;
pub mod walls;

pub use boq::{estimate, BoqAssumptions, MaterialEstimate};
pub use extract::{ExtractSegments, Extraction};
pub use measure::{RingMeasure, RingMetrics};
pub use nesting::{Containment, RingNesting};
pub use offset::RingOffset;
pub use polygonize::{PolygonBuilder, Polygonization};
pub use walls::{WallLengthApprox, WallLengths};
