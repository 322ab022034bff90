/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Bodies: max_instances × 12 floats]
/// [Rings:  max_rings × 8 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::renderer::camera::CameraRig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_RINGS: usize = 4;
pub const HEADER_RING_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_PROTOCOL_VERSION: usize = 8;
pub const HEADER_CAMERA_X: usize = 9;
pub const HEADER_CAMERA_Y: usize = 10;
pub const HEADER_CAMERA_Z: usize = 11;
pub const HEADER_FOCUS_X: usize = 12;
pub const HEADER_FOCUS_Y: usize = 13;
pub const HEADER_FOCUS_Z: usize = 14;
pub const HEADER_TRANSITIONING: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per body instance (wire format, fixed).
pub const INSTANCE_FLOATS: usize = 12;

/// Floats per orbit ring (wire format, fixed).
pub const RING_FLOATS: usize = 8;

/// Floats per UI event: kind, a, b, c (wire format, fixed).
pub const EVENT_FLOATS: usize = 4;

pub const DEFAULT_MAX_INSTANCES: usize = 256;
pub const DEFAULT_MAX_RINGS: usize = 256;
pub const DEFAULT_MAX_EVENTS: usize = 16;

/// Per-frame counters and camera pose written into the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHeader {
    pub frame_counter: u32,
    pub instance_count: usize,
    pub ring_count: usize,
    pub event_count: usize,
    pub camera: CameraRig,
    pub transitioning: bool,
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_rings: usize,
    pub max_events: usize,

    /// Size of body instance section in floats.
    pub instance_data_floats: usize,
    pub ring_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where body instance data begins.
    pub instance_data_offset: usize,
    pub ring_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_rings: usize, max_events: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let ring_data_floats = max_rings * RING_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let ring_data_offset = instance_data_offset + instance_data_floats;
        let event_data_offset = ring_data_offset + ring_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_instances,
            max_rings,
            max_events,
            instance_data_floats,
            ring_data_floats,
            event_data_floats,
            instance_data_offset,
            ring_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Write capacities, counts and the camera pose into `buffer[..HEADER_FLOATS]`.
    /// Counts are clamped to capacity. The lock slot is left untouched.
    pub fn write_header(&self, buffer: &mut [f32], frame: &FrameHeader) {
        if buffer.len() < HEADER_FLOATS {
            return;
        }
        buffer[HEADER_FRAME_COUNTER] = frame.frame_counter as f32;
        buffer[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        buffer[HEADER_INSTANCE_COUNT] = frame.instance_count.min(self.max_instances) as f32;
        buffer[HEADER_MAX_RINGS] = self.max_rings as f32;
        buffer[HEADER_RING_COUNT] = frame.ring_count.min(self.max_rings) as f32;
        buffer[HEADER_MAX_EVENTS] = self.max_events as f32;
        buffer[HEADER_EVENT_COUNT] = frame.event_count.min(self.max_events) as f32;
        buffer[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;

        let camera = frame.camera.position.as_vec3();
        let focus = frame.camera.focus.as_vec3();
        buffer[HEADER_CAMERA_X] = camera.x;
        buffer[HEADER_CAMERA_Y] = camera.y;
        buffer[HEADER_CAMERA_Z] = camera.z;
        buffer[HEADER_FOCUS_X] = focus.x;
        buffer[HEADER_FOCUS_Y] = focus.y;
        buffer[HEADER_FOCUS_Z] = focus.z;
        buffer[HEADER_TRANSITIONING] = if frame.transitioning { 1.0 } else { 0.0 };
    }

    /// Copy a whole frame into a buffer of at least `buffer_total_floats`.
    /// Sections that overflow their capacity are truncated.
    pub fn write_into(
        &self,
        buffer: &mut [f32],
        frame: &FrameHeader,
        instances: &[f32],
        rings: &[f32],
        events: &[f32],
    ) {
        if buffer.len() < self.buffer_total_floats {
            log::warn!(
                "protocol buffer too small: {} < {} floats",
                buffer.len(),
                self.buffer_total_floats
            );
            return;
        }
        self.write_header(buffer, frame);
        copy_section(buffer, self.instance_data_offset, self.instance_data_floats, instances);
        copy_section(buffer, self.ring_data_offset, self.ring_data_floats, rings);
        copy_section(buffer, self.event_data_offset, self.event_data_floats, events);
    }
}

impl Default for ProtocolLayout {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INSTANCES, DEFAULT_MAX_RINGS, DEFAULT_MAX_EVENTS)
    }
}

fn copy_section(buffer: &mut [f32], offset: usize, capacity: usize, data: &[f32]) {
    let len = data.len().min(capacity);
    buffer[offset..offset + len].copy_from_slice(&data[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn header() -> FrameHeader {
        FrameHeader {
            frame_counter: 3,
            instance_count: 2,
            ring_count: 1,
            event_count: 0,
            camera: CameraRig::new(DVec3::new(1.0, 2.0, 3.0), DVec3::ZERO),
            transitioning: true,
        }
    }

    #[test]
    fn custom_capacities_compute_correctly() {
        let layout = ProtocolLayout::new(100, 50, 8);

        assert_eq!(layout.instance_data_floats, 100 * 12);
        assert_eq!(layout.ring_data_floats, 50 * 8);
        assert_eq!(layout.event_data_floats, 8 * 4);

        let expected_total = HEADER_FLOATS + 100 * 12 + 50 * 8 + 8 * 4;
        assert_eq!(layout.buffer_total_floats, expected_total);
        assert_eq!(layout.buffer_total_bytes, expected_total * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::default();

        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(layout.ring_data_offset, layout.instance_data_offset + layout.instance_data_floats);
        assert_eq!(layout.event_data_offset, layout.ring_data_offset + layout.ring_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn header_carries_camera_and_counts() {
        let layout = ProtocolLayout::new(4, 4, 4);
        let mut buffer = vec![0.0; layout.buffer_total_floats];
        layout.write_header(&mut buffer, &header());

        assert_eq!(buffer[HEADER_FRAME_COUNTER], 3.0);
        assert_eq!(buffer[HEADER_INSTANCE_COUNT], 2.0);
        assert_eq!(buffer[HEADER_MAX_RINGS], 4.0);
        assert_eq!(buffer[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(
            &buffer[HEADER_CAMERA_X..=HEADER_CAMERA_Z],
            &[1.0, 2.0, 3.0]
        );
        assert_eq!(buffer[HEADER_TRANSITIONING], 1.0);
    }

    #[test]
    fn overflowing_sections_are_truncated() {
        let layout = ProtocolLayout::new(1, 1, 1);
        let mut buffer = vec![0.0; layout.buffer_total_floats];
        let instances = vec![5.0; INSTANCE_FLOATS * 3];
        let mut frame = header();
        frame.instance_count = 3;
        layout.write_into(&mut buffer, &frame, &instances, &[], &[]);

        assert_eq!(buffer[HEADER_INSTANCE_COUNT], 1.0);
        assert_eq!(buffer[layout.ring_data_offset], 0.0);
        assert_eq!(buffer[layout.instance_data_offset + INSTANCE_FLOATS - 1], 5.0);
    }
}
