// extensions/mod.rs
//
// Smoothing helpers for the camera controller.

pub mod damping;

pub use damping::{damp_vec3, damping_factor};
