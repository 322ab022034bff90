pub mod clock;
pub mod scaling;
pub mod packing;
pub mod satellite;
pub mod transform;
pub mod motion;
pub mod scene;
