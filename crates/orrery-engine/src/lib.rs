pub mod api;
pub mod core;
pub mod components;
pub mod ephemeris;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, OrreryConfig};
pub use api::types::{BodyId, OrreryEvent};
pub use assets::catalog::{BodyCatalog, CatalogError};
pub use assets::events::{AstronomicalEvent, ASTRONOMICAL_EVENTS};
pub use components::body::{BodyKind, CelestialBody};
pub use core::clock::SimulationClock;
pub use core::motion::{MotionSimulator, TickReport};
pub use core::packing::{OrbitBand, OrbitBands, OrbitPacker};
pub use core::satellite::SatelliteLayoutEngine;
pub use core::scaling::ScalingEngine;
pub use core::scene::{BodyFrame, OrbitRing, Orrery, SceneError};
pub use ephemeris::{EphemerisError, EphemerisProvider, KeplerEphemeris, StaticEphemeris};
pub use renderer::camera::{CameraRig, CameraTransitionController, TransitionEnd, TransitionState};
pub use renderer::instance::{BodyInstance, FrameBuffer, RingInstance};
pub use input::queue::{InputQueue, OrreryInput};
pub use bridge::protocol::{FrameHeader, ProtocolLayout};
pub use systems::render::build_frame_buffer;
pub use systems::events::collect_events;
