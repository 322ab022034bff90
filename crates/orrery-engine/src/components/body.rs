use crate::api::types::BodyId;

/// Fallbacks used when the catalog omits a physical attribute.
pub const DEFAULT_DIAMETER_KM: f64 = 1000.0;
pub const DEFAULT_PLANET_PERIOD_DAYS: f64 = 365.0;
pub const DEFAULT_SATELLITE_PERIOD_DAYS: f64 = 30.0;
pub const DEFAULT_ROTATION_PERIOD_DAYS: f64 = 1.0;
pub const DEFAULT_DISTANCE_FROM_PARENT_KM: f64 = 100_000.0;
pub const DEFAULT_INCLINATION_DEG: f64 = 0.0;
pub const DEFAULT_COLOR: [f32; 3] = [0.33, 0.33, 0.33];

/// Mean Earth equatorial radius, used when a parent has no usable diameter.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Role of a body in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// The root star. Sits at the origin.
    Star,
    /// Orbits the star; placed on a packed orbit band.
    Planet,
    /// Orbits a planet; laid out inside the parent's bubble.
    Satellite,
}

/// A body with every physical attribute resolved. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub diameter_km: f64,
    /// Sidereal orbital period. Negative means retrograde.
    pub orbital_period_days: f64,
    /// Sidereal rotation period. Negative means retrograde.
    pub rotation_period_days: f64,
    pub axial_tilt_deg: f64,
    /// Linear RGB in [0, 1].
    pub color: [f32; 3],
    /// Satellites only.
    pub distance_from_parent_km: Option<f64>,
    /// Satellites only.
    pub orbital_inclination_deg: Option<f64>,
    /// Children in catalog order.
    pub satellites: Vec<BodyId>,
    /// `None` for the root star.
    pub parent: Option<BodyId>,
}

impl CelestialBody {
    pub fn radius_km(&self) -> f64 {
        self.diameter_km / 2.0
    }

    pub fn axial_tilt_rad(&self) -> f64 {
        self.axial_tilt_deg.to_radians()
    }

    pub fn inclination_rad(&self) -> f64 {
        self.orbital_inclination_deg
            .unwrap_or(DEFAULT_INCLINATION_DEG)
            .to_radians()
    }
}

/// Parse a `#RRGGBB` (or `RRGGBB`) string into linear RGB.
/// Anything else yields `None`.
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#FF0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(parse_hex_color("00ff00"), Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
        assert_eq!(parse_hex_color("red"), None);
    }

    #[test]
    fn satellite_inclination_converts_to_radians() {
        let moon = CelestialBody {
            id: BodyId(4),
            name: "Moon".into(),
            kind: BodyKind::Satellite,
            diameter_km: 3474.8,
            orbital_period_days: 27.32,
            rotation_period_days: 27.32,
            axial_tilt_deg: 6.68,
            color: DEFAULT_COLOR,
            distance_from_parent_km: Some(384_400.0),
            orbital_inclination_deg: Some(180.0),
            satellites: Vec::new(),
            parent: Some(BodyId(3)),
        };
        assert!((moon.inclination_rad() - std::f64::consts::PI).abs() < 1e-12);
        assert!((moon.radius_km() - 1737.4).abs() < 1e-9);
    }
}
