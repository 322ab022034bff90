use log::{info, warn};
use orrery_engine::bridge::protocol::{FrameHeader, ProtocolLayout};
use orrery_engine::systems::events::event_floats;
use orrery_engine::{
    build_frame_buffer, collect_events, EphemerisProvider, FrameBuffer, InputQueue, Orrery,
    OrreryConfig, OrreryEvent, OrreryInput, SceneError,
};

/// Longest render step fed to the scene. Larger gaps (a backgrounded tab,
/// a debugger pause) are clamped so the camera does not jump.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Wires an [`Orrery`] to the browser frame loop.
///
/// Each concrete app creates a `thread_local!` OrreryRunner through
/// [`export_orrery!`](crate::export_orrery), because wasm-bindgen cannot
/// export generic structs directly.
pub struct OrreryRunner<E: EphemerisProvider> {
    orrery: Orrery<E>,
    input: InputQueue,
    frame: FrameBuffer,
    events: Vec<OrreryEvent>,
    layout: ProtocolLayout,
    /// Flat copy of the whole frame in protocol layout, for SharedArrayBuffer reads.
    shared: Vec<f32>,
    frame_counter: u32,
}

impl<E: EphemerisProvider> OrreryRunner<E> {
    pub fn new(orrery: Orrery<E>) -> Self {
        Self::with_layout(orrery, ProtocolLayout::default())
    }

    pub fn with_layout(orrery: Orrery<E>, layout: ProtocolLayout) -> Self {
        let shared = vec![0.0; layout.buffer_total_floats];
        let mut runner = Self {
            orrery,
            input: InputQueue::new(),
            frame: FrameBuffer::new(),
            events: Vec::with_capacity(layout.max_events),
            layout,
            shared,
            frame_counter: 0,
        };
        runner.publish();
        runner
    }

    /// Push an input command into the queue.
    pub fn push_input(&mut self, event: OrreryInput) {
        self.input.push(event);
    }

    /// Decode and queue a generic `(kind, a, b, c)` event from the UI.
    pub fn push_custom(&mut self, kind: u32, a: f32, b: f32, c: f32) {
        match OrreryInput::from_custom(kind, a, b, c) {
            Some(event) => self.input.push(event),
            None => warn!("ignoring unknown custom event kind {kind}"),
        }
    }

    /// Jump the simulation clock to the host's current time.
    pub fn jump_to_now(&mut self, now_unix_ms: f64) {
        if now_unix_ms.is_finite() {
            self.input.push(OrreryInput::JumpTo {
                unix_ms: now_unix_ms as i64,
            });
        }
    }

    /// Run one frame: apply queued input, advance the scene, rebuild buffers.
    pub fn tick(&mut self, dt: f32) {
        let dt = clamp_frame_dt(dt);

        for event in self.input.drain() {
            self.orrery.apply_input(event);
        }

        self.orrery.tick(dt);
        self.publish();
    }

    /// Swap in a new configuration, keeping date and selection.
    pub fn reconfigure(&mut self, config: OrreryConfig) -> Result<(), SceneError> {
        self.orrery.reconfigure(config)?;
        info!("orrery reconfigured");
        self.publish();
        Ok(())
    }

    fn publish(&mut self) {
        build_frame_buffer(&self.orrery, &mut self.frame);
        collect_events(&mut self.orrery, &mut self.events);
        self.frame_counter = self.frame_counter.wrapping_add(1);

        if self.frame.instances.len() > self.layout.max_instances {
            warn!(
                "{} bodies exceed the {} instance slots; extras are dropped",
                self.frame.instances.len(),
                self.layout.max_instances
            );
        }

        let header = FrameHeader {
            frame_counter: self.frame_counter,
            instance_count: self.frame.instances.len(),
            ring_count: self.frame.rings.len(),
            event_count: self.events.len(),
            camera: self.orrery.camera().rig(),
            transitioning: self.orrery.camera().is_transitioning(),
        };
        self.layout.write_into(
            &mut self.shared,
            &header,
            self.frame.instance_floats(),
            self.frame.ring_floats(),
            event_floats(&self.events),
        );
    }

    pub fn orrery(&self) -> &Orrery<E> {
        &self.orrery
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn shared_ptr(&self) -> *const f32 {
        self.shared.as_ptr()
    }

    pub fn shared(&self) -> &[f32] {
        &self.shared
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.frame.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.frame.instance_count()
    }

    pub fn rings_ptr(&self) -> *const f32 {
        self.frame.rings_ptr()
    }

    pub fn ring_count(&self) -> u32 {
        self.frame.ring_count()
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_rings(&self) -> u32 {
        self.layout.max_rings as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

/// Negative or non-finite frame times become zero; long ones are capped.
pub fn clamp_frame_dt(dt: f32) -> f64 {
    let dt = f64::from(dt);
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DT)
    } else {
        0.0
    }
}
