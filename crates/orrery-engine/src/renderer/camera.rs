use glam::DVec3;
use log::{info, warn};

use crate::api::config::OrreryConfig;
use crate::api::types::BodyId;
use crate::extensions::damping::damp_vec3;

/// Where the camera sits relative to a body of visual radius `r`: above and behind.
pub fn view_offset(visual_radius: f64) -> DVec3 {
    DVec3::new(0.0, 2.0 * visual_radius, 6.0 * visual_radius)
}

/// Perspective camera pose in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: DVec3,
    /// Point the camera looks at.
    pub focus: DVec3,
}

impl CameraRig {
    pub fn new(position: DVec3, focus: DVec3) -> Self {
        Self { position, focus }
    }

    /// Looking down at the origin from 45° above the ecliptic, far enough
    /// out to frame a system of radius `outer_radius`.
    pub fn overview(outer_radius: f64) -> Self {
        Self {
            position: DVec3::new(0.0, outer_radius, outer_radius),
            focus: DVec3::ZERO,
        }
    }

    /// The pose the camera settles into when focused on a target.
    pub fn ideal_for(target: TargetSample) -> Self {
        Self {
            position: target.position + view_offset(target.visual_radius),
            focus: target.position,
        }
    }
}

/// Current world position and size of a selectable body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSample {
    pub position: DVec3,
    pub visual_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Transitioning { target: BodyId, ticks: u32 },
}

/// Why a fly-to ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEnd {
    /// Camera came within `transitionEpsilon` of its goal.
    Arrived,
    /// `transitionMaxTicks` elapsed first.
    TickLimit,
    /// The target left the scene mid-flight.
    TargetLost,
}

impl TransitionEnd {
    /// Wire code used in UI events.
    pub fn code(self) -> f32 {
        match self {
            TransitionEnd::Arrived => 0.0,
            TransitionEnd::TickLimit => 1.0,
            TransitionEnd::TargetLost => 2.0,
        }
    }
}

/// Damped fly-to state machine.
///
/// Selecting a body starts (or retargets) a transition. Each tick the rig is
/// first carried along by the target's own movement since the last tick, then
/// damped toward `target + view_offset(radius)`. Once a transition ends the
/// rig keeps riding along with the last target until the selection is cleared.
#[derive(Debug, Clone)]
pub struct CameraTransitionController {
    rig: CameraRig,
    state: TransitionState,
    tau: f64,
    epsilon: f64,
    max_ticks: u32,
    /// Body the rig is riding with, and its position at the previous tick.
    anchor: Option<(BodyId, DVec3)>,
}

impl CameraTransitionController {
    pub fn new(config: &OrreryConfig, rig: CameraRig) -> Self {
        Self {
            rig,
            state: TransitionState::Idle,
            tau: config.transition_damping_tau,
            epsilon: config.transition_epsilon,
            max_ticks: config.transition_max_ticks,
            anchor: None,
        }
    }

    /// Start flying toward `target`. Replaces any transition in flight.
    pub fn select_body(&mut self, target: BodyId) {
        if let TransitionState::Transitioning { target: previous, .. } = self.state {
            if previous != target {
                info!("camera: retargeting from {previous:?} to {target:?}");
            }
        } else {
            info!("camera: flying to {target:?}");
        }
        self.state = TransitionState::Transitioning { target, ticks: 0 };
    }

    /// Stop any transition and stop riding along with the last target.
    pub fn cancel(&mut self) {
        self.state = TransitionState::Idle;
        self.anchor = None;
    }

    /// Advance one frame. `lookup` resolves a body's current world position.
    /// Returns how the transition ended, if it ended this tick.
    pub fn tick(
        &mut self,
        dt: f64,
        lookup: impl Fn(BodyId) -> Option<TargetSample>,
    ) -> Option<TransitionEnd> {
        self.carry(&lookup);

        let TransitionState::Transitioning { target, ticks } = self.state else {
            return None;
        };

        let Some(sample) = lookup(target) else {
            warn!("camera: target {target:?} is no longer in the scene");
            self.cancel();
            return Some(TransitionEnd::TargetLost);
        };

        let ideal = CameraRig::ideal_for(sample);
        self.rig.position = damp_vec3(self.rig.position, ideal.position, dt, self.tau);
        self.rig.focus = damp_vec3(self.rig.focus, ideal.focus, dt, self.tau);

        if self.rig.position.distance(ideal.position) < self.epsilon {
            info!("camera: arrived at {target:?} after {} ticks", ticks + 1);
            self.state = TransitionState::Idle;
            return Some(TransitionEnd::Arrived);
        }

        let ticks = ticks + 1;
        if ticks >= self.max_ticks {
            warn!("camera: gave up on {target:?} after {ticks} ticks");
            self.state = TransitionState::Idle;
            return Some(TransitionEnd::TickLimit);
        }

        self.state = TransitionState::Transitioning { target, ticks };
        None
    }

    /// Shift the rig by the anchor body's movement since the previous tick and
    /// re-anchor onto the current target.
    fn carry(&mut self, lookup: &impl Fn(BodyId) -> Option<TargetSample>) {
        if let Some((id, last)) = self.anchor {
            match lookup(id) {
                Some(sample) => {
                    let delta = sample.position - last;
                    self.rig.position += delta;
                    self.rig.focus += delta;
                }
                None => self.anchor = None,
            }
        }

        let followed = match self.state {
            TransitionState::Transitioning { target, .. } => Some(target),
            TransitionState::Idle => self.anchor.map(|(id, _)| id),
        };
        self.anchor = followed.and_then(|id| lookup(id).map(|sample| (id, sample.position)));
    }

    pub fn rig(&self) -> CameraRig {
        self.rig
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, TransitionState::Transitioning { .. })
    }

    /// The body the camera is flying to or riding with.
    pub fn followed(&self) -> Option<BodyId> {
        match self.state {
            TransitionState::Transitioning { target, .. } => Some(target),
            TransitionState::Idle => self.anchor.map(|(id, _)| id),
        }
    }
}
