pub mod instance;
pub mod camera;

// Re-export key types for convenient access
pub use camera::{
    view_offset, CameraRig, CameraTransitionController, TargetSample, TransitionEnd,
    TransitionState,
};
pub use instance::{BodyInstance, FrameBuffer, RingInstance};
