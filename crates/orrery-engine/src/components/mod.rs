pub mod body;

pub use body::{BodyKind, CelestialBody};
