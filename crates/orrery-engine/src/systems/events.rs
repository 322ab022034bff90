use crate::api::types::{
    OrreryEvent, EVENT_DATE_INFO, EVENT_SELECTION, EVENT_TIME_INFO, EVENT_TRANSITION_END,
};
use crate::core::scene::Orrery;
use crate::ephemeris::EphemerisProvider;

/// Selection payload meaning "nothing selected".
pub const NO_SELECTION: f32 = -1.0;

/// Emit the per-frame UI events: time info, calendar date, selection and,
/// once per transition, how the last camera fly-to ended.
pub fn collect_events<E: EphemerisProvider>(orrery: &mut Orrery<E>, events: &mut Vec<OrreryEvent>) {
    events.clear();

    let clock = orrery.clock();
    events.push(OrreryEvent::new(
        EVENT_TIME_INFO,
        clock.days_since_j2000() as f32,
        clock.speed_multiplier() as f32,
        if clock.is_paused() { 1.0 } else { 0.0 },
    ));

    let (year, month, day) = clock.calendar_date();
    events.push(OrreryEvent::new(
        EVENT_DATE_INFO,
        year as f32,
        month as f32,
        day as f32,
    ));

    let transitioning = if orrery.camera().is_transitioning() { 1.0 } else { 0.0 };
    let selection = match orrery.selected() {
        Some(id) => OrreryEvent::new(
            EVENT_SELECTION,
            id.0 as f32,
            orrery.true_distance_au(id).unwrap_or(0.0) as f32,
            transitioning,
        ),
        None => OrreryEvent::new(EVENT_SELECTION, NO_SELECTION, 0.0, transitioning),
    };
    events.push(selection);

    if let Some((id, end)) = orrery.take_transition_end() {
        events.push(OrreryEvent::new(EVENT_TRANSITION_END, id.0 as f32, end.code(), 0.0));
    }
}

/// Event data as a flat float slice.
pub fn event_floats(events: &[OrreryEvent]) -> &[f32] {
    bytemuck::cast_slice(events)
}
