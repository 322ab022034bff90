use chrono::{DateTime, Utc};

/// A named date the UI can jump the simulation clock to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstronomicalEvent {
    pub name: &'static str,
    /// Unix seconds, UTC.
    pub unix_seconds: i64,
}

impl AstronomicalEvent {
    pub fn date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.unix_seconds, 0)
    }
}

/// Preset jump targets. "Now" is not listed; the web runner reads the host clock for that.
pub const ASTRONOMICAL_EVENTS: &[AstronomicalEvent] = &[
    AstronomicalEvent {
        name: "Great Conjunction (Jupiter/Saturn)",
        unix_seconds: 1_608_573_600,
    },
    AstronomicalEvent {
        name: "Halley's Comet Perihelion (Next)",
        unix_seconds: 2_889_734_400,
    },
    AstronomicalEvent {
        name: "Mars Opposition 2025",
        unix_seconds: 1_736_985_600,
    },
    AstronomicalEvent {
        name: "Apollo 11 Moon Landing",
        unix_seconds: -14_182_980,
    },
];

/// Look up a preset by index, as sent by the UI.
pub fn event_by_index(index: usize) -> Option<&'static AstronomicalEvent> {
    ASTRONOMICAL_EVENTS.get(index)
}
