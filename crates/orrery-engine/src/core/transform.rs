use glam::{DAffine3, DVec3};

/// Explicit per-body transform chain, composed top-down each tick:
/// `world = parent_world × orbit × tilt × spin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    /// Frame the body orbits in. Identity for the star and planets.
    pub parent_world: DAffine3,
    /// Placement on the orbit, including any orbit-plane inclination.
    pub orbit: DAffine3,
    /// Static axial tilt about Z.
    pub tilt: DAffine3,
    /// Rotation about the body's own (tilted) Y axis.
    pub spin: DAffine3,
}

impl Default for BodyTransform {
    fn default() -> Self {
        Self {
            parent_world: DAffine3::IDENTITY,
            orbit: DAffine3::IDENTITY,
            tilt: DAffine3::IDENTITY,
            spin: DAffine3::IDENTITY,
        }
    }
}

impl BodyTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent_world(mut self, parent_world: DAffine3) -> Self {
        self.parent_world = parent_world;
        self
    }

    /// Place the body at `position` in the parent frame.
    pub fn with_position(mut self, position: DVec3) -> Self {
        self.orbit = DAffine3::from_translation(position);
        self
    }

    /// Place the body at `ring_offset` on a ring inclined by `inclination` about X.
    pub fn with_inclined_orbit(mut self, inclination: f64, ring_offset: DVec3) -> Self {
        self.orbit = DAffine3::from_rotation_x(inclination) * DAffine3::from_translation(ring_offset);
        self
    }

    pub fn with_axial_tilt(mut self, tilt: f64) -> Self {
        self.tilt = DAffine3::from_rotation_z(tilt);
        self
    }

    pub fn with_spin(mut self, angle: f64) -> Self {
        self.spin = DAffine3::from_rotation_y(angle);
        self
    }

    pub fn world(&self) -> DAffine3 {
        self.parent_world * self.orbit * self.tilt * self.spin
    }

    /// World-space origin of the body.
    pub fn world_position(&self) -> DVec3 {
        self.world().translation
    }
}
