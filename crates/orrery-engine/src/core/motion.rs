use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use chrono::{DateTime, Utc};
use glam::{DAffine3, DVec3};
use log::{debug, warn};

use crate::api::types::BodyId;
use crate::core::clock::SimulationClock;
use crate::core::satellite::{advance_phase, ring_offset, tidal_spin, SatelliteLayout};
use crate::core::transform::BodyTransform;
use crate::ephemeris::{EphemerisError, EphemerisProvider};

/// Mutable per-body simulation state. One record per tracked body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySimState {
    pub position: DVec3,
    /// Rotation about the body's own axis, in radians, wrapped to [0, 2π).
    pub spin_angle: f64,
    /// Satellites only: accumulated orbital phase in radians.
    pub orbital_phase: Option<f64>,
}

impl BodySimState {
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            spin_angle: 0.0,
            orbital_phase: None,
        }
    }

    /// Satellites start tidally locked at their seeded phase.
    pub fn orbiting(phase: f64) -> Self {
        Self {
            position: DVec3::ZERO,
            spin_angle: tidal_spin(phase),
            orbital_phase: Some(phase),
        }
    }

    pub fn with_position(self, position: DVec3) -> Self {
        Self { position, ..self }
    }

    /// Free rotation step.
    pub fn spun(self, rotation_period_days: f64, time_scale: f64, dt: f64) -> Self {
        Self {
            spin_angle: spin_step(self.spin_angle, rotation_period_days, time_scale, dt),
            ..self
        }
    }

    /// Orbital step for a tidally locked satellite: advances the phase and
    /// derives the spin from it.
    pub fn orbited(self, period_days: f64, time_scale: f64, dt: f64) -> Self {
        let phase = advance_phase(self.orbital_phase.unwrap_or(0.0), period_days, time_scale, dt);
        Self {
            spin_angle: tidal_spin(phase),
            orbital_phase: Some(phase),
            ..self
        }
    }
}

/// `angle + dt × 2π × timeScale / rotationPeriodDays`, wrapped. A zero or
/// non-finite period leaves the angle unchanged.
pub fn spin_step(angle: f64, rotation_period_days: f64, time_scale: f64, dt: f64) -> f64 {
    if rotation_period_days == 0.0 || !rotation_period_days.is_finite() {
        return angle;
    }
    let next = angle + dt * TAU * time_scale / rotation_period_days;
    if next.is_finite() {
        next.rem_euclid(TAU)
    } else {
        angle
    }
}

/// Unit direction in scene space (Y-up) for an ecliptic vector. The
/// ecliptic (x, y, z) becomes (x, z, y). Zero or non-finite input maps to zero.
pub fn scene_direction(ecliptic: DVec3) -> DVec3 {
    DVec3::new(ecliptic.x, ecliptic.z, ecliptic.y).normalize_or_zero()
}

#[derive(Debug, Clone)]
pub struct StarTrack {
    pub id: BodyId,
    pub rotation_period_days: f64,
}

#[derive(Debug, Clone)]
pub struct PlanetTrack {
    pub id: BodyId,
    /// Ephemeris lookup key.
    pub name: String,
    pub band_radius: f64,
    pub rotation_period_days: f64,
}

#[derive(Debug, Clone)]
pub struct SatelliteTrack {
    pub parent: BodyId,
    pub layout: SatelliteLayout,
}

impl SatelliteTrack {
    /// `parent_world × inclined orbit` at `phase`, before the moon's own tilt and spin.
    pub fn orbit_transform(&self, parent_position: DVec3, phase: f64) -> BodyTransform {
        BodyTransform::new()
            .with_parent_world(DAffine3::from_translation(parent_position))
            .with_inclined_orbit(
                self.layout.inclination_rad,
                ring_offset(self.layout.orbit_radius, phase),
            )
    }
}

/// Result of one [`MotionSimulator::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub simulation_date: DateTime<Utc>,
    /// Render seconds that advanced the simulation (zero while paused).
    pub simulated_dt: f64,
    /// Bodies whose ephemeris lookup failed this tick. They keep their last position.
    pub failures: Vec<(BodyId, EphemerisError)>,
}

/// Advances every tracked body from the simulation clock.
///
/// Planets are placed at `direction × band radius` from the ephemeris; the
/// star spins in place; satellites integrate their phase around the parent's
/// freshly resolved position.
#[derive(Debug, Clone)]
pub struct MotionSimulator {
    clock: SimulationClock,
    star: Option<StarTrack>,
    planets: Vec<PlanetTrack>,
    satellites: Vec<SatelliteTrack>,
    states: HashMap<BodyId, BodySimState>,
    failing: HashSet<BodyId>,
}

impl MotionSimulator {
    pub fn new(clock: SimulationClock) -> Self {
        Self {
            clock,
            star: None,
            planets: Vec::new(),
            satellites: Vec::new(),
            states: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    pub fn track_star(&mut self, track: StarTrack) {
        self.states.insert(track.id, BodySimState::at(DVec3::ZERO));
        self.star = Some(track);
    }

    pub fn track_planet(&mut self, track: PlanetTrack, initial_position: DVec3) {
        self.states.insert(track.id, BodySimState::at(initial_position));
        self.planets.push(track);
    }

    /// The parent must already be tracked for the satellite to move with it.
    pub fn track_satellite(&mut self, track: SatelliteTrack) {
        self.states
            .insert(track.layout.id, BodySimState::orbiting(track.layout.start_phase));
        self.satellites.push(track);
    }

    pub fn tick<E: EphemerisProvider>(&mut self, dt: f64, ephemeris: &E) -> TickReport {
        let simulated_dt = self.clock.advance(dt);
        let time_scale = self.clock.time_scale();
        let date = self.clock.simulation_date();
        let mut failures = Vec::new();

        if let Some(star) = &self.star {
            if let Some(state) = self.states.get_mut(&star.id) {
                *state = state.spun(star.rotation_period_days, time_scale, simulated_dt);
            }
        }

        for planet in &self.planets {
            let Some(state) = self.states.get_mut(&planet.id) else {
                continue;
            };
            let mut next = state.spun(planet.rotation_period_days, time_scale, simulated_dt);
            match ephemeris.vector(&planet.name, date) {
                Ok(vector) => {
                    next = next.with_position(scene_direction(vector) * planet.band_radius);
                    if self.failing.remove(&planet.id) {
                        debug!("{}: ephemeris recovered", planet.name);
                    }
                }
                Err(err) => {
                    if self.failing.insert(planet.id) {
                        warn!("{}: {err}; holding last position", planet.name);
                    }
                    failures.push((planet.id, err));
                }
            }
            *state = next;
        }

        for moon in &self.satellites {
            let parent_position = match self.states.get(&moon.parent) {
                Some(parent) => parent.position,
                None => continue,
            };
            let Some(state) = self.states.get_mut(&moon.layout.id) else {
                continue;
            };
            let next = state.orbited(moon.layout.period_days, time_scale, simulated_dt);
            let phase = next.orbital_phase.unwrap_or(moon.layout.start_phase);
            let position = moon.orbit_transform(parent_position, phase).world_position();
            *state = next.with_position(position);
        }

        TickReport {
            simulation_date: date,
            simulated_dt,
            failures,
        }
    }

    pub fn state(&self, id: BodyId) -> Option<&BodySimState> {
        self.states.get(&id)
    }

    pub fn position(&self, id: BodyId) -> Option<DVec3> {
        self.states.get(&id).map(|state| state.position)
    }

    pub fn is_tracked(&self, id: BodyId) -> bool {
        self.states.contains_key(&id)
    }

    pub fn planets(&self) -> &[PlanetTrack] {
        &self.planets
    }

    pub fn satellites(&self) -> &[SatelliteTrack] {
        &self.satellites
    }

    pub fn satellite(&self, id: BodyId) -> Option<&SatelliteTrack> {
        self.satellites.iter().find(|moon| moon.layout.id == id)
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::SECONDS_PER_DAY;
    use crate::ephemeris::StaticEphemeris;
    use std::f64::consts::PI;

    fn clock() -> SimulationClock {
        SimulationClock::new(DateTime::from_timestamp(1_704_067_200, 0).unwrap(), SECONDS_PER_DAY)
    }

    fn moon_layout(id: u32, orbit_radius: f64, period_days: f64) -> SatelliteLayout {
        SatelliteLayout {
            id: BodyId(id),
            visual_radius: 5.0,
            orbit_radius,
            start_phase: 0.0,
            inclination_rad: 0.0,
            period_days,
        }
    }

    #[test]
    fn spin_step_completes_one_turn_per_period() {
        let mut angle = 0.5;
        for _ in 0..10 {
            angle = spin_step(angle, 2.0, 1.0, 0.2);
        }
        assert!((angle - 0.5).abs() < 1e-9, "angle {angle}");
    }

    #[test]
    fn retrograde_spin_goes_backwards() {
        let angle = spin_step(1.0, -4.0, 1.0, 1.0);
        assert!((angle - (1.0 - PI / 2.0).rem_euclid(TAU)).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_maps_to_origin() {
        assert_eq!(scene_direction(DVec3::ZERO), DVec3::ZERO);
        assert_eq!(scene_direction(DVec3::splat(f64::NAN)), DVec3::ZERO);
    }

    #[test]
    fn ecliptic_north_becomes_scene_up() {
        assert_eq!(scene_direction(DVec3::new(0.0, 0.0, 3.0)), DVec3::Y);
        assert_eq!(scene_direction(DVec3::new(0.0, 2.0, 0.0)), DVec3::Z);
    }

    #[test]
    fn planet_sits_on_its_band() {
        let eph = StaticEphemeris::new().with_body("Earth", DVec3::new(0.6, 0.8, 0.0));
        let mut sim = MotionSimulator::new(clock());
        sim.track_planet(
            PlanetTrack {
                id: BodyId(1),
                name: "Earth".into(),
                band_radius: 1000.0,
                rotation_period_days: 1.0,
            },
            DVec3::ZERO,
        );
        let report = sim.tick(0.0, &eph);
        assert!(report.failures.is_empty());
        let p = sim.position(BodyId(1)).unwrap();
        assert!((p - DVec3::new(600.0, 0.0, 800.0)).length() < 1e-9);
    }

    #[test]
    fn failed_lookup_keeps_last_position() {
        let mut sim = MotionSimulator::new(clock());
        let start = DVec3::new(10.0, 0.0, 0.0);
        sim.track_planet(
            PlanetTrack {
                id: BodyId(1),
                name: "Vulcan".into(),
                band_radius: 1000.0,
                rotation_period_days: 1.0,
            },
            start,
        );
        let report = sim.tick(0.5, &StaticEphemeris::new());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(sim.position(BodyId(1)), Some(start));
        // Spin still advances.
        assert!((sim.state(BodyId(1)).unwrap().spin_angle - PI).abs() < 1e-12);
    }

    #[test]
    fn satellite_orbits_around_parent_and_stays_locked() {
        let eph = StaticEphemeris::new().with_body("P", DVec3::X);
        let mut sim = MotionSimulator::new(clock());
        sim.track_planet(
            PlanetTrack {
                id: BodyId(1),
                name: "P".into(),
                band_radius: 500.0,
                rotation_period_days: 1.0,
            },
            DVec3::ZERO,
        );
        sim.track_satellite(SatelliteTrack {
            parent: BodyId(1),
            layout: moon_layout(2, 40.0, 4.0),
        });

        sim.tick(1.0, &eph);
        let parent = sim.position(BodyId(1)).unwrap();
        let moon = sim.state(BodyId(2)).unwrap();
        assert!(((moon.position - parent).length() - 40.0).abs() < 1e-9);

        let phase = moon.orbital_phase.unwrap();
        assert!((phase - PI / 2.0).abs() < 1e-12, "quarter period -> quarter turn");
        assert!((moon.spin_angle - tidal_spin(phase)).abs() < 1e-12);
    }

    #[test]
    fn orbit_transform_tilts_the_ring_about_x() {
        let track = SatelliteTrack {
            parent: BodyId(1),
            layout: SatelliteLayout {
                inclination_rad: PI / 2.0,
                ..moon_layout(2, 10.0, 1.0)
            },
        };
        let parent = DVec3::new(100.0, 0.0, 0.0);
        let p = track.orbit_transform(parent, PI / 2.0).world_position();
        assert!((p - DVec3::new(100.0, -10.0, 0.0)).length() < 1e-9, "p = {p}");
        let flat = track.orbit_transform(parent, 0.0).world_position();
        assert!((flat - DVec3::new(110.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn paused_clock_freezes_spin_and_phase() {
        let eph = StaticEphemeris::new().with_body("P", DVec3::X);
        let mut sim = MotionSimulator::new(clock());
        sim.track_planet(
            PlanetTrack {
                id: BodyId(1),
                name: "P".into(),
                band_radius: 500.0,
                rotation_period_days: 1.0,
            },
            DVec3::ZERO,
        );
        sim.clock_mut().toggle_pause();
        let report = sim.tick(1.0, &eph);
        assert_eq!(report.simulated_dt, 0.0);
        assert_eq!(sim.state(BodyId(1)).unwrap().spin_angle, 0.0);
    }
}
