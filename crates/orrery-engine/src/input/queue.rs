use crate::api::types::BodyId;

/// Custom-event kinds sent by the UI layer through the generic `custom_event` export.
pub const INPUT_SELECT_BODY: u32 = 1;
pub const INPUT_CLEAR_SELECTION: u32 = 2;
pub const INPUT_SET_SPEED: u32 = 3;
pub const INPUT_JUMP_TO: u32 = 4;
pub const INPUT_JUMP_TO_EVENT: u32 = 5;
pub const INPUT_TOGGLE_PAUSE: u32 = 6;

/// Commands the scene understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrreryInput {
    /// Fly the camera to a body.
    SelectBody { id: BodyId },
    ClearSelection,
    /// Simulated seconds per render second.
    SetSpeed { multiplier: f64 },
    /// Jump the simulation date (Unix milliseconds, UTC).
    JumpTo { unix_ms: i64 },
    /// Jump to a preset astronomical event.
    JumpToEvent { index: usize },
    TogglePause,
}

impl OrreryInput {
    /// Decode a `(kind, a, b, c)` custom event from the UI.
    /// `JumpTo` carries the timestamp split as `a × 1e6 + b` ms so it
    /// survives f32 transport. Unknown kinds decode to `None`.
    pub fn from_custom(kind: u32, a: f32, b: f32, _c: f32) -> Option<Self> {
        match kind {
            INPUT_SELECT_BODY if a >= 0.0 => Some(OrreryInput::SelectBody { id: BodyId(a as u32) }),
            INPUT_SELECT_BODY | INPUT_CLEAR_SELECTION => Some(OrreryInput::ClearSelection),
            INPUT_SET_SPEED => Some(OrreryInput::SetSpeed { multiplier: a as f64 }),
            INPUT_JUMP_TO => Some(OrreryInput::JumpTo {
                unix_ms: (a as f64 * 1e6 + b as f64) as i64,
            }),
            INPUT_JUMP_TO_EVENT if a >= 0.0 => Some(OrreryInput::JumpToEvent { index: a as usize }),
            INPUT_TOGGLE_PAUSE => Some(OrreryInput::TogglePause),
            _ => None,
        }
    }
}

/// A queue of input commands.
/// JS pushes commands between frames; the runner drains them each tick.
pub struct InputQueue {
    events: Vec<OrreryInput>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: OrreryInput) {
        self.events.push(event);
    }

    /// Drain all pending commands in arrival order.
    pub fn drain(&mut self) -> Vec<OrreryInput> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(OrreryInput::SelectBody { id: BodyId(4) });
        q.push(OrreryInput::TogglePause);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events[0], OrreryInput::SelectBody { id: BodyId(4) });
        assert!(q.is_empty());
    }

    #[test]
    fn decodes_custom_events() {
        assert_eq!(
            OrreryInput::from_custom(INPUT_SELECT_BODY, 3.0, 0.0, 0.0),
            Some(OrreryInput::SelectBody { id: BodyId(3) })
        );
        assert_eq!(
            OrreryInput::from_custom(INPUT_SELECT_BODY, -1.0, 0.0, 0.0),
            Some(OrreryInput::ClearSelection)
        );
        assert_eq!(
            OrreryInput::from_custom(INPUT_SET_SPEED, 3600.0, 0.0, 0.0),
            Some(OrreryInput::SetSpeed { multiplier: 3600.0 })
        );
        assert_eq!(OrreryInput::from_custom(99, 0.0, 0.0, 0.0), None);
    }

    #[test]
    fn jump_timestamp_survives_f32_split() {
        // 2020-12-21T18:00:00Z
        let ms: i64 = 1_608_573_600_000;
        let a = (ms / 1_000_000) as f32;
        let b = (ms % 1_000_000) as f32;
        assert_eq!(
            OrreryInput::from_custom(INPUT_JUMP_TO, a, b, 0.0),
            Some(OrreryInput::JumpTo { unix_ms: ms })
        );
    }
}
