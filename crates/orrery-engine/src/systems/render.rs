use crate::components::body::{BodyKind, DEFAULT_COLOR};
use crate::core::scene::Orrery;
use crate::ephemeris::EphemerisProvider;
use crate::renderer::instance::{
    BodyInstance, FrameBuffer, RingInstance, KIND_PLANET, KIND_SATELLITE, KIND_STAR,
};

fn kind_code(kind: BodyKind) -> f32 {
    match kind {
        BodyKind::Star => KIND_STAR,
        BodyKind::Planet => KIND_PLANET,
        BodyKind::Satellite => KIND_SATELLITE,
    }
}

/// Build the frame buffer from the scene's current body frames and orbit rings.
/// Positions are narrowed to f32 here and nowhere earlier.
pub fn build_frame_buffer<E: EphemerisProvider>(orrery: &Orrery<E>, buffer: &mut FrameBuffer) {
    buffer.clear();

    for frame in orrery.frames() {
        let [r, g, b] = orrery
            .catalog()
            .get(frame.id)
            .map(|body| body.color)
            .unwrap_or(DEFAULT_COLOR);
        let position = frame.position.as_vec3();

        buffer.push(BodyInstance {
            x: position.x,
            y: position.y,
            z: position.z,
            radius: frame.visual_radius as f32,
            spin: frame.spin_angle as f32,
            axial_tilt: frame.axial_tilt as f32,
            orbit_tilt: frame.orbit_plane_tilt.unwrap_or(0.0) as f32,
            body_id: frame.id.0 as f32,
            r,
            g,
            b,
            kind: kind_code(frame.kind),
        });
    }

    for ring in orrery.rings() {
        let center = ring.center.as_vec3();
        buffer.push_ring(RingInstance {
            cx: center.x,
            cy: center.y,
            cz: center.z,
            radius: ring.radius as f32,
            tilt: ring.tilt as f32,
            body_id: ring.body.0 as f32,
            _pad: [0.0; 2],
        });
    }
}
