use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::BodyId;
use crate::components::body::{
    parse_hex_color, BodyKind, CelestialBody, DEFAULT_COLOR, DEFAULT_DIAMETER_KM,
    DEFAULT_DISTANCE_FROM_PARENT_KM, DEFAULT_INCLINATION_DEG, DEFAULT_PLANET_PERIOD_DAYS,
    DEFAULT_ROTATION_PERIOD_DAYS, DEFAULT_SATELLITE_PERIOD_DAYS,
};

const SOLAR_SYSTEM_JSON: &str = include_str!("solar_system.json");

/// Catalog file: one root star and its planets, each with optional satellites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDescriptor {
    /// The root star.
    pub parent: BodyDescriptor,
    /// Planets in display order.
    #[serde(default)]
    pub planets: Vec<BodyDescriptor>,
}

/// Raw body record. Every physical attribute is optional; missing values
/// fall back to the named defaults in `components::body`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyDescriptor {
    pub name: String,
    #[serde(default)]
    pub diameter: Option<f64>,
    #[serde(default)]
    pub orbital_period: Option<f64>,
    #[serde(default)]
    pub rotation_period: Option<f64>,
    #[serde(default)]
    pub axial_tilt: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    /// Satellites only.
    #[serde(default)]
    pub distance_from_parent: Option<f64>,
    /// Satellites only.
    #[serde(default)]
    pub orbital_inclination: Option<f64>,
    #[serde(default)]
    pub satellites: Vec<BodyDescriptor>,
}

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("body name `{name}` appears more than once")]
    DuplicateName { name: String },
    #[error("body name must not be empty")]
    EmptyName,
    #[error("satellite `{name}` has satellites of its own; only one level of nesting is supported")]
    NestedSatellite { name: String },
}

/// Arena of resolved bodies. Parent/child links are `BodyId` indices, so
/// the tree has no reference cycles and ids stay stable for the session.
#[derive(Debug, Clone)]
pub struct BodyCatalog {
    bodies: Vec<CelestialBody>,
    by_name: HashMap<String, BodyId>,
}

impl BodyCatalog {
    /// Parse a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let descriptor: CatalogDescriptor = serde_json::from_str(json)?;
        Self::from_descriptor(&descriptor)
    }

    /// The embedded solar-system catalog: the Sun, nine planets and notable moons.
    pub fn solar_system() -> Result<Self, CatalogError> {
        Self::from_json(SOLAR_SYSTEM_JSON)
    }

    /// Resolve a descriptor tree into the arena.
    pub fn from_descriptor(descriptor: &CatalogDescriptor) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            bodies: Vec::new(),
            by_name: HashMap::new(),
        };

        let root = catalog.push(&descriptor.parent, BodyKind::Star, None)?;
        for planet in &descriptor.planets {
            let planet_id = catalog.push(planet, BodyKind::Planet, Some(root))?;
            for moon in &planet.satellites {
                if !moon.satellites.is_empty() {
                    return Err(CatalogError::NestedSatellite { name: moon.name.clone() });
                }
                catalog.push(moon, BodyKind::Satellite, Some(planet_id))?;
            }
        }

        Ok(catalog)
    }

    fn push(
        &mut self,
        desc: &BodyDescriptor,
        kind: BodyKind,
        parent: Option<BodyId>,
    ) -> Result<BodyId, CatalogError> {
        if desc.name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.by_name.contains_key(&desc.name) {
            return Err(CatalogError::DuplicateName { name: desc.name.clone() });
        }

        let id = BodyId(self.bodies.len() as u32);
        let name = desc.name.as_str();
        let is_satellite = kind == BodyKind::Satellite;

        let default_period = if is_satellite {
            DEFAULT_SATELLITE_PERIOD_DAYS
        } else {
            DEFAULT_PLANET_PERIOD_DAYS
        };

        let body = CelestialBody {
            id,
            name: desc.name.clone(),
            kind,
            diameter_km: resolve(name, "diameter", desc.diameter, DEFAULT_DIAMETER_KM),
            orbital_period_days: resolve_period(
                name,
                "orbitalPeriod",
                desc.orbital_period,
                default_period,
            ),
            rotation_period_days: resolve_period(
                name,
                "rotationPeriod",
                desc.rotation_period,
                DEFAULT_ROTATION_PERIOD_DAYS,
            ),
            axial_tilt_deg: desc.axial_tilt.unwrap_or(0.0),
            color: desc
                .color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(DEFAULT_COLOR),
            distance_from_parent_km: is_satellite.then(|| {
                resolve(
                    name,
                    "distanceFromParent",
                    desc.distance_from_parent,
                    DEFAULT_DISTANCE_FROM_PARENT_KM,
                )
            }),
            orbital_inclination_deg: is_satellite
                .then(|| desc.orbital_inclination.unwrap_or(DEFAULT_INCLINATION_DEG)),
            satellites: Vec::new(),
            parent,
        };

        if let Some(parent_id) = parent {
            self.bodies[parent_id.index()].satellites.push(id);
        }
        self.by_name.insert(body.name.clone(), id);
        self.bodies.push(body);
        Ok(id)
    }

    /// The root star.
    pub fn root(&self) -> &CelestialBody {
        &self.bodies[0]
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<&CelestialBody> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    /// Planets in catalog order.
    pub fn planets(&self) -> impl Iterator<Item = &CelestialBody> {
        self.children(self.root().id)
    }

    /// Direct children of `id` in catalog order.
    pub fn children(&self, id: BodyId) -> impl Iterator<Item = &CelestialBody> {
        self.get(id)
            .map(|body| body.satellites.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|child| self.get(*child))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Always false for a loaded catalog (the root star is mandatory).
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

fn resolve(name: &str, field: &str, value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => {
            debug!("{name}: `{field}` missing, using default {default}");
            default
        }
    }
}

/// Periods divide angular speeds, so zero counts as missing.
fn resolve_period(name: &str, field: &str, value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => {
            debug!("{name}: `{field}` missing or zero, using default {default}");
            default
        }
    }
}
