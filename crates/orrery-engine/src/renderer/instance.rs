use bytemuck::{Pod, Zeroable};

/// Body kind codes written into `BodyInstance::kind`.
pub const KIND_STAR: f32 = 0.0;
pub const KIND_PLANET: f32 = 1.0;
pub const KIND_SATELLITE: f32 = 2.0;

/// Per-body render data written to SharedArrayBuffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
///
/// Positions are scene units (Y up). The renderer composes the body matrix as
/// `translate(x, y, z) × rotZ(axial_tilt) × rotY(spin)`; `orbit_tilt` is only
/// meaningful for satellites and tilts their ring about X.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Visual radius in scene units.
    pub radius: f32,
    /// Spin angle about the body's own axis, radians.
    pub spin: f32,
    pub axial_tilt: f32,
    pub orbit_tilt: f32,
    pub body_id: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// One of `KIND_STAR`, `KIND_PLANET`, `KIND_SATELLITE`.
    pub kind: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// An orbit ring: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RingInstance {
    pub cx: f32,
    pub cy: f32,
    pub cz: f32,
    pub radius: f32,
    /// Rotation of the ring plane about X, radians.
    pub tilt: f32,
    pub body_id: f32,
    pub _pad: [f32; 2],
}

impl RingInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Render buffer containing all body and ring instances for one frame.
pub struct FrameBuffer {
    /// Star first, then planets and satellites in catalog order.
    pub instances: Vec<BodyInstance>,
    pub rings: Vec<RingInstance>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
            rings: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.rings.clear();
    }

    pub fn push(&mut self, instance: BodyInstance) {
        self.instances.push(instance);
    }

    pub fn push_ring(&mut self, ring: RingInstance) {
        self.rings.push(ring);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn ring_count(&self) -> u32 {
        self.rings.len() as u32
    }

    /// Raw pointer to instance data for SharedArrayBuffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn rings_ptr(&self) -> *const f32 {
        self.rings.as_ptr() as *const f32
    }

    /// Instance data as a flat float slice.
    pub fn instance_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn ring_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.rings)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_protocol() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), BodyInstance::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<RingInstance>(), RingInstance::STRIDE_BYTES);
    }

    #[test]
    fn floats_are_laid_out_in_field_order() {
        let mut buffer = FrameBuffer::new();
        buffer.push(BodyInstance {
            x: 1.0,
            radius: 4.0,
            body_id: 7.0,
            kind: KIND_SATELLITE,
            ..Default::default()
        });
        let floats = buffer.instance_floats();
        assert_eq!(floats.len(), BodyInstance::FLOATS);
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[3], 4.0);
        assert_eq!(floats[7], 7.0);
        assert_eq!(floats[11], KIND_SATELLITE);
    }

    #[test]
    fn clear_empties_both_sections() {
        let mut buffer = FrameBuffer::new();
        buffer.push(BodyInstance::default());
        buffer.push_ring(RingInstance::default());
        buffer.clear();
        assert_eq!(buffer.instance_count(), 0);
        assert_eq!(buffer.ring_count(), 0);
    }
}
