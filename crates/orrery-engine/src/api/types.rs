use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for a body in the catalog.
/// Ids are dense: the root star is always `BodyId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Index into the catalog arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Time info: `a` = simulated days since J2000, `b` = speed multiplier, `c` = paused flag.
pub const EVENT_TIME_INFO: f32 = 1.0;
/// Calendar date of the simulation: `a` = year, `b` = month, `c` = day.
pub const EVENT_DATE_INFO: f32 = 2.0;
/// Selection: `a` = body id (or -1), `b` = true distance in AU, `c` = transitioning flag.
pub const EVENT_SELECTION: f32 = 3.0;
/// Camera transition ended: `a` = body id, `b` = reason code (see `TransitionEnd::code`).
pub const EVENT_TRANSITION_END: f32 = 4.0;

/// A UI event communicated from Rust to TypeScript via SharedArrayBuffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrreryEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl OrreryEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
