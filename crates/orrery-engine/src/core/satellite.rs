use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec3;

use crate::api::config::OrreryConfig;
use crate::api::types::BodyId;
use crate::components::body::{CelestialBody, EARTH_RADIUS_KM};
use crate::core::scaling::ScalingEngine;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// What a moon needs to know about its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentFrame {
    pub visual_radius: f64,
    /// Physical radius; non-positive values fall back to Earth's.
    pub radius_km: f64,
}

/// Fixed placement of one moon, computed once per scene build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteLayout {
    pub id: BodyId,
    pub visual_radius: f64,
    /// Distance from the parent's centre, in visual units.
    pub orbit_radius: f64,
    /// Initial orbital phase in radians, seeded from the name.
    pub start_phase: f64,
    /// Tilt of the moon's orbit plane about the parent's X axis.
    pub inclination_rad: f64,
    pub period_days: f64,
}

/// Sizes and places moons inside their parent's bubble.
#[derive(Debug, Clone, Copy)]
pub struct SatelliteLayoutEngine {
    scaling: ScalingEngine,
    min_ratio: f64,
    max_ratio: f64,
    surface_gap: f64,
    bubble: f64,
}

impl SatelliteLayoutEngine {
    pub fn new(config: &OrreryConfig) -> Self {
        Self {
            scaling: ScalingEngine::new(config),
            min_ratio: config.moon_min_ratio,
            max_ratio: config.moon_max_ratio,
            surface_gap: config.moon_surface_gap_multiplier,
            bubble: config.moon_max_bubble_multiplier,
        }
    }

    /// The scaled physical radius (half the diameter), clamped to
    /// `[parent × minRatio, parent × maxRatio]`.
    pub fn moon_visual_radius(&self, diameter_km: f64, parent_visual_radius: f64) -> f64 {
        let lower = parent_visual_radius * self.min_ratio;
        let upper = parent_visual_radius * self.max_ratio;
        self.scaling.visual_radius(diameter_km / 2.0).min(upper).max(lower)
    }

    /// Orbit radius from the real distance ratio, pushed out to clear the
    /// parent's surface and pulled in to the bubble. The lower bound wins
    /// when the two cross.
    pub fn moon_orbit_radius(
        &self,
        distance_km: f64,
        moon_visual_radius: f64,
        parent: ParentFrame,
    ) -> f64 {
        let parent_radius_km = if parent.radius_km > 0.0 && parent.radius_km.is_finite() {
            parent.radius_km
        } else {
            EARTH_RADIUS_KM
        };
        let lower = self.surface_bound(moon_visual_radius, parent.visual_radius);
        let upper = parent.visual_radius * self.bubble;

        let real = distance_km / parent_radius_km * parent.visual_radius;
        if !real.is_finite() {
            return lower;
        }
        real.min(upper).max(lower)
    }

    /// Closest orbit that clears the parent's surface.
    pub fn surface_bound(&self, moon_visual_radius: f64, parent_visual_radius: f64) -> f64 {
        parent_visual_radius + moon_visual_radius + parent_visual_radius * self.surface_gap
    }

    /// Lay out all moons of one parent, innermost (by real distance) first.
    ///
    /// Each moon starts from its clamped orbit. An inward pass then pulls
    /// moons below their outer neighbour so the set fits under the bubble,
    /// and an outward pass pushes them back above the surface bound and
    /// their inner neighbour. Consecutive rings end up at least
    /// [`ring_clearance`] apart; when the bubble is too small for that the
    /// outermost rings spill past it.
    pub fn layout_siblings<'a>(
        &self,
        moons: impl IntoIterator<Item = &'a CelestialBody>,
        parent: ParentFrame,
    ) -> Vec<SatelliteLayout> {
        let mut placed: Vec<(f64, SatelliteLayout)> = moons
            .into_iter()
            .map(|moon| {
                let distance = moon.distance_from_parent_km.unwrap_or(0.0);
                (distance, self.layout(moon, parent))
            })
            .collect();
        placed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        let mut layouts: Vec<SatelliteLayout> = placed.into_iter().map(|(_, layout)| layout).collect();

        for i in (1..layouts.len()).rev() {
            let outer = layouts[i];
            let inner = &mut layouts[i - 1];
            let ceiling = outer.orbit_radius - ring_clearance(inner.visual_radius, outer.visual_radius);
            inner.orbit_radius = inner.orbit_radius.min(ceiling);
        }

        let mut previous: Option<SatelliteLayout> = None;
        for layout in &mut layouts {
            let mut radius = layout
                .orbit_radius
                .max(self.surface_bound(layout.visual_radius, parent.visual_radius));
            if let Some(inner) = previous {
                radius = radius
                    .max(inner.orbit_radius + ring_clearance(inner.visual_radius, layout.visual_radius));
            }
            layout.orbit_radius = radius;
            previous = Some(*layout);
        }
        layouts
    }

    pub fn layout(&self, moon: &CelestialBody, parent: ParentFrame) -> SatelliteLayout {
        let visual_radius = self.moon_visual_radius(moon.diameter_km, parent.visual_radius);
        let distance_km = moon.distance_from_parent_km.unwrap_or(0.0);
        SatelliteLayout {
            id: moon.id,
            visual_radius,
            orbit_radius: self.moon_orbit_radius(distance_km, visual_radius, parent),
            start_phase: start_phase(&moon.name),
            inclination_rad: moon.inclination_rad(),
            period_days: moon.orbital_period_days,
        }
    }
}

/// Minimum centre-to-centre spacing of two neighbouring moon rings: their
/// radii plus one diameter of the larger moon.
pub fn ring_clearance(inner_visual_radius: f64, outer_visual_radius: f64) -> f64 {
    inner_visual_radius + outer_visual_radius + 2.0 * inner_visual_radius.max(outer_visual_radius)
}

/// 32-bit FNV-1a over the UTF-8 bytes of `data`.
pub fn fnv1a_32(data: &[u8]) -> u32 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Initial phase in radians: `fnv1a_32(name) % 360` degrees.
pub fn start_phase(name: &str) -> f64 {
    f64::from(fnv1a_32(name.as_bytes()) % 360).to_radians()
}

/// One integration step of orbital phase, wrapped to [0, 2π).
/// `time_scale` is simulated days per render second. A zero or non-finite
/// period leaves the phase unchanged.
pub fn advance_phase(phase: f64, period_days: f64, time_scale: f64, dt: f64) -> f64 {
    if period_days == 0.0 || !period_days.is_finite() {
        return phase;
    }
    let next = phase + TAU / period_days * time_scale * dt;
    if next.is_finite() {
        next.rem_euclid(TAU)
    } else {
        phase
    }
}

/// Spin that keeps the same face toward the parent.
pub fn tidal_spin(phase: f64) -> f64 {
    -phase + FRAC_PI_2
}

/// Position on the moon's ring before the inclination tilt.
pub fn ring_offset(orbit_radius: f64, phase: f64) -> DVec3 {
    let (sin, cos) = phase.sin_cos();
    DVec3::new(cos * orbit_radius, 0.0, sin * orbit_radius)
}
