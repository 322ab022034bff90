pub mod kepler;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use glam::DVec3;
use thiserror::Error;

pub use kepler::{KeplerEphemeris, OrbitalElements};

/// One astronomical unit in kilometres.
pub const AU_KM: f64 = 149_597_870.7;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EphemerisError {
    #[error("no ephemeris for body `{name}`")]
    UnknownBody { name: String },
}

/// Source of heliocentric ecliptic positions, in AU.
///
/// Implementations must be pure: the same `(body, date)` always yields the
/// same vector.
pub trait EphemerisProvider {
    fn vector(&self, body: &str, date: DateTime<Utc>) -> Result<DVec3, EphemerisError>;
}

/// Fixed positions that ignore the date. Used for deterministic scenes and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEphemeris {
    positions: HashMap<String, DVec3>,
}

impl StaticEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, name: impl Into<String>, position_au: DVec3) -> Self {
        self.insert(name, position_au);
        self
    }

    /// Register or replace a body's fixed position.
    pub fn insert(&mut self, name: impl Into<String>, position_au: DVec3) {
        self.positions.insert(name.into(), position_au);
    }
}

impl EphemerisProvider for StaticEphemeris {
    fn vector(&self, body: &str, _date: DateTime<Utc>) -> Result<DVec3, EphemerisError> {
        self.positions
            .get(body)
            .copied()
            .ok_or_else(|| EphemerisError::UnknownBody { name: body.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_provider_returns_registered_vectors() {
        let eph = StaticEphemeris::new().with_body("Earth", DVec3::X);
        assert_eq!(eph.vector("Earth", DateTime::UNIX_EPOCH).unwrap(), DVec3::X);
    }

    #[test]
    fn insert_replaces_an_existing_position() {
        let mut eph = StaticEphemeris::new().with_body("Mars", DVec3::X);
        eph.insert("Mars", DVec3::Y);
        assert_eq!(eph.vector("Mars", DateTime::UNIX_EPOCH).unwrap(), DVec3::Y);
    }

    #[test]
    fn unknown_body_is_an_error() {
        let eph = StaticEphemeris::new();
        let err = eph.vector("Planet9", DateTime::UNIX_EPOCH).unwrap_err();
        assert_eq!(err, EphemerisError::UnknownBody { name: "Planet9".into() });
        assert_eq!(err.to_string(), "no ephemeris for body `Planet9`");
    }
}
