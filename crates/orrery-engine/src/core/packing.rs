use std::f64::consts::TAU;

use glam::DVec3;
use log::debug;

use crate::api::config::OrreryConfig;
use crate::api::types::BodyId;
use crate::core::scaling::ScalingEngine;

/// One body to place: its true distance at the reference epoch and its visual radius.
#[derive(Debug, Clone, PartialEq)]
pub struct PackInput {
    pub id: BodyId,
    pub name: String,
    pub true_distance_km: f64,
    pub visual_radius: f64,
}

/// A fixed orbit radius assigned to one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitBand {
    pub id: BodyId,
    pub radius: f64,
    pub visual_radius: f64,
    pub true_distance_km: f64,
    /// Clearance reserved either side of the ring, in visual radii.
    pub padding_factor: f64,
}

impl OrbitBand {
    /// Innermost extent of the occupied interval.
    pub fn inner_edge(&self) -> f64 {
        self.radius - self.visual_radius * self.padding_factor
    }

    /// Outermost extent of the occupied interval.
    pub fn outer_edge(&self) -> f64 {
        self.radius + self.visual_radius * self.padding_factor
    }
}

/// Bands in ascending true-distance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrbitBands {
    bands: Vec<OrbitBand>,
}

impl OrbitBands {
    pub fn get(&self, id: BodyId) -> Option<&OrbitBand> {
        self.bands.iter().find(|band| band.id == id)
    }

    pub fn radius(&self, id: BodyId) -> Option<f64> {
        self.get(id).map(|band| band.radius)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrbitBand> {
        self.bands.iter()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Outer edge of the last band, or 0 when empty.
    pub fn outer_extent(&self) -> f64 {
        self.bands.last().map_or(0.0, OrbitBand::outer_edge)
    }
}

/// Assign collision-free band radii.
///
/// Bodies are sorted by true distance (ties by name, then id). Each band is
/// pushed out far enough that its padded interval clears the previous one by
/// at least `orbitSafeGap`.
pub fn pack_orbit_bands(inputs: &[PackInput], config: &OrreryConfig) -> OrbitBands {
    let scaling = ScalingEngine::new(config);
    let padding = config.orbit_padding_factor;

    let mut sorted: Vec<&PackInput> = inputs.iter().collect();
    sorted.sort_by(|a, b| {
        a.true_distance_km
            .total_cmp(&b.true_distance_km)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut bands = Vec::with_capacity(sorted.len());
    let mut last_radius = 0.0;
    let mut last_visual_radius = 0.0;

    for input in sorted {
        let base = scaling.visual_distance(input.true_distance_km);
        let desired = base * config.orbit_radius_multiplier + input.visual_radius * padding;
        let min_allowed = last_radius
            + (last_visual_radius + input.visual_radius) * padding
            + config.orbit_safe_gap;
        let radius = desired.max(min_allowed);

        bands.push(OrbitBand {
            id: input.id,
            radius,
            visual_radius: input.visual_radius,
            true_distance_km: input.true_distance_km,
            padding_factor: padding,
        });
        last_radius = radius;
        last_visual_radius = input.visual_radius;
    }

    OrbitBands { bands }
}

/// The coefficients that affect packing. A change in any of them forces a repack.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PackKey {
    distance_log_scale: f64,
    orbit_radius_multiplier: f64,
    orbit_padding_factor: f64,
    orbit_safe_gap: f64,
}

impl PackKey {
    fn of(config: &OrreryConfig) -> Self {
        Self {
            distance_log_scale: config.distance_log_scale,
            orbit_radius_multiplier: config.orbit_radius_multiplier,
            orbit_padding_factor: config.orbit_padding_factor,
            orbit_safe_gap: config.orbit_safe_gap,
        }
    }
}

/// Memoizes [`pack_orbit_bands`] per (body set, config) pair.
#[derive(Debug, Default)]
pub struct OrbitPacker {
    cached: Option<(Vec<PackInput>, PackKey, OrbitBands)>,
}

impl OrbitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pack(&mut self, inputs: &[PackInput], config: &OrreryConfig) -> &OrbitBands {
        let key = PackKey::of(config);
        let stale = !matches!(
            &self.cached,
            Some((cached_inputs, cached_key, _)) if cached_inputs == inputs && *cached_key == key
        );
        if stale {
            self.cached = None;
        }
        let (_, _, bands) = self.cached.get_or_insert_with(|| {
            debug!("packing {} orbit bands", inputs.len());
            (inputs.to_vec(), key, pack_orbit_bands(inputs, config))
        });
        bands
    }
}

/// Closed ring polyline in the scene's XZ plane. The first point is repeated
/// at the end. Fewer than 3 segments yields an empty ring.
pub fn orbit_ring_points(radius: f64, segments: usize) -> Vec<DVec3> {
    if segments < 3 || !radius.is_finite() {
        return Vec::new();
    }
    (0..=segments)
        .map(|i| {
            let theta = TAU * (i % segments) as f64 / segments as f64;
            DVec3::new(theta.cos() * radius, 0.0, theta.sin() * radius)
        })
        .collect()
}
