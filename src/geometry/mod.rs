pub mod entity;
pub mod pline;
pub mod ring;
pub mod segment;

pub use entity::{EntityKind, RawEntity};
pub use pline::{Pline, PlineVertex};
pub use ring::{Ring, RingRole};
pub use segment::Segment;
