//! Keplerian reference ephemeris: pure math, no scene dependencies.
//!
//! Mean elements at J2000 with secular rates per Julian century, from
//! Standish (1992), "Keplerian Elements for Approximate Positions of the
//! Major Planets" (valid 1800–2050 AD). Positions are heliocentric ecliptic,
//! in AU, using f64 throughout.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use glam::DVec3;

use super::{EphemerisError, EphemerisProvider};
use crate::core::clock::days_since_j2000;

const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Mean orbital elements at J2000 with rates per Julian century.
/// Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis (AU).
    pub a: f64,
    pub a_dot: f64,
    /// Eccentricity.
    pub e: f64,
    pub e_dot: f64,
    /// Inclination to the ecliptic.
    pub i: f64,
    pub i_dot: f64,
    /// Mean longitude.
    pub l: f64,
    pub l_dot: f64,
    /// Longitude of perihelion (ϖ).
    pub w: f64,
    pub w_dot: f64,
    /// Longitude of the ascending node (Ω).
    pub node: f64,
    pub node_dot: f64,
}

impl OrbitalElements {
    /// Heliocentric ecliptic position (AU) at `t` Julian centuries from J2000.
    pub fn position(&self, t: f64) -> DVec3 {
        let a = self.a + self.a_dot * t;
        let e = self.e + self.e_dot * t;
        let i = (self.i + self.i_dot * t).to_radians();
        let l = self.l + self.l_dot * t;
        let w = self.w + self.w_dot * t;
        let node = self.node + self.node_dot * t;

        let arg_perihelion = (w - node).to_radians();
        let node = node.to_radians();
        let mean_anomaly = normalize_degrees(l - w).to_radians();

        let ea = solve_kepler(mean_anomaly, e);

        // Position in the orbital plane, x toward perihelion.
        let xp = a * (ea.cos() - e);
        let yp = a * (1.0 - e * e).sqrt() * ea.sin();

        let (sw, cw) = arg_perihelion.sin_cos();
        let (sn, cn) = node.sin_cos();
        let (si, ci) = i.sin_cos();

        DVec3::new(
            (cw * cn - sw * sn * ci) * xp + (-sw * cn - cw * sn * ci) * yp,
            (cw * sn + sw * cn * ci) * xp + (-sw * sn + cw * cn * ci) * yp,
            (sw * si) * xp + (cw * si) * yp,
        )
    }
}

/// Wrap an angle in degrees into [-180, 180).
fn normalize_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

pub fn days_to_centuries(days_from_j2000: f64) -> f64 {
    days_from_j2000 / DAYS_PER_CENTURY
}

/// Solve Kepler's equation `E - e·sin(E) = M` by Newton-Raphson.
/// `mean_anomaly` in radians, returns the eccentric anomaly in radians.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ea = mean_anomaly + eccentricity * mean_anomaly.sin();
    for _ in 0..15 {
        let delta = ea - eccentricity * ea.sin() - mean_anomaly;
        let derivative = 1.0 - eccentricity * ea.cos();
        ea -= delta / derivative;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Analytic two-body ephemeris over a table of named element sets.
#[derive(Debug, Clone, Default)]
pub struct KeplerEphemeris {
    elements: HashMap<String, OrbitalElements>,
}

impl KeplerEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, name: impl Into<String>, elements: OrbitalElements) -> Self {
        self.elements.insert(name.into(), elements);
        self
    }

    pub fn elements(&self, name: &str) -> Option<&OrbitalElements> {
        self.elements.get(name)
    }

    /// The nine classical planets. Earth uses the Earth-Moon barycentre.
    pub fn solar_system() -> Self {
        #[rustfmt::skip]
        let table: [(&str, [f64; 12]); 9] = [
            //            a            a_dot        e           e_dot        I             I_dot        L              L_dot             ϖ              ϖ_dot        Ω              Ω_dot
            ("Mercury", [0.38709927,  0.00000037, 0.20563593,  0.00001906, 7.00497902,  -0.00594749, 252.25032350, 149472.67411175,  77.45779628,  0.16047689,  48.33076593, -0.12534081]),
            ("Venus",   [0.72333566,  0.00000390, 0.00677672, -0.00004107, 3.39467605,  -0.00078890, 181.97909950,  58517.81538729, 131.60246718,  0.00268329,  76.67984255, -0.27769418]),
            ("Earth",   [1.00000261,  0.00000562, 0.01671123, -0.00004392, -0.00001531, -0.01294668, 100.46457166,  35999.37244981, 102.93768193,  0.32327364,   0.0,          0.0]),
            ("Mars",    [1.52371034,  0.00001847, 0.09339410,  0.00007882, 1.84969142,  -0.00813131,  -4.55343205,  19140.30268499, -23.94362959,  0.44441088,  49.55953891, -0.29257343]),
            ("Jupiter", [5.20288700, -0.00011607, 0.04838624, -0.00013253, 1.30439695,  -0.00183714,  34.39644051,   3034.74612775,  14.72847983,  0.21252668, 100.47390909,  0.20469106]),
            ("Saturn",  [9.53667594, -0.00125060, 0.05386179, -0.00050991, 2.48599187,   0.00193609,  49.95424423,   1222.49362201,  92.59887831, -0.41897216, 113.66242448, -0.28867794]),
            ("Uranus",  [19.18916464, -0.00196176, 0.04725744, -0.00004397, 0.77263783, -0.00242939, 313.23810451,    428.48202785, 170.95427630,  0.40805281,  74.01692503,  0.04240589]),
            ("Neptune", [30.06992276,  0.00026291, 0.00859048,  0.00005105, 1.77004347,  0.00035372, -55.12002969,    218.45945325,  44.96476227, -0.32241464, 131.78422574, -0.00508664]),
            ("Pluto",   [39.48211675, -0.00031596, 0.24882730,  0.00005170, 17.14001206, 0.00004818, 238.92903833,    145.20780515, 224.06891629, -0.04062942, 110.30393684, -0.01183482]),
        ];

        table.into_iter().fold(Self::new(), |eph, (name, v)| {
            eph.with_body(
                name,
                OrbitalElements {
                    a: v[0],
                    a_dot: v[1],
                    e: v[2],
                    e_dot: v[3],
                    i: v[4],
                    i_dot: v[5],
                    l: v[6],
                    l_dot: v[7],
                    w: v[8],
                    w_dot: v[9],
                    node: v[10],
                    node_dot: v[11],
                },
            )
        })
    }
}

impl EphemerisProvider for KeplerEphemeris {
    fn vector(&self, body: &str, date: DateTime<Utc>) -> Result<DVec3, EphemerisError> {
        let elements = self
            .elements
            .get(body)
            .ok_or_else(|| EphemerisError::UnknownBody { name: body.to_string() })?;
        Ok(elements.position(days_to_centuries(days_since_j2000(date))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn j2000() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(crate::core::clock::J2000_UNIX_MS).unwrap()
    }

    #[test]
    fn kepler_circular_orbit() {
        // For e=0, eccentric anomaly = mean anomaly
        let ea = solve_kepler(1.0, 0.0);
        assert!((ea - 1.0).abs() < 1e-10);
    }

    #[test]
    fn kepler_converges_for_pluto_eccentricity() {
        let m = 2.8;
        let ea = solve_kepler(m, 0.2488);
        let residual = ea - 0.2488 * ea.sin() - m;
        assert!(residual.abs() < 1e-12, "residual = {residual}");
    }

    #[test]
    fn earth_is_about_one_au_at_j2000() {
        let eph = KeplerEphemeris::solar_system();
        let dist = eph.vector("Earth", j2000()).unwrap().length();
        assert!((dist - 1.0).abs() < 0.02, "Earth distance = {dist} AU");
    }

    #[test]
    fn planet_distances_stay_near_semi_major_axis() {
        let eph = KeplerEphemeris::solar_system();
        let date = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        for (name, lo, hi) in [
            ("Mercury", 0.30, 0.47),
            ("Mars", 1.38, 1.67),
            ("Jupiter", 4.9, 5.5),
            ("Neptune", 29.7, 30.4),
            ("Pluto", 29.6, 49.4),
        ] {
            let d = eph.vector(name, date).unwrap().length();
            assert!(d > lo && d < hi, "{name} at {d} AU outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn inclined_orbits_leave_the_ecliptic() {
        let eph = KeplerEphemeris::solar_system();
        let date = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let earth = eph.vector("Earth", date).unwrap();
        assert!(earth.z.abs() < 1e-3, "Earth z = {}", earth.z);

        // Pluto's 17° inclination puts it well off the plane somewhere on its orbit.
        let pluto = eph.elements("Pluto").unwrap();
        let max_z = (0..36)
            .map(|k| pluto.position(k as f64 * 2.48 / 36.0).z.abs())
            .fold(0.0, f64::max);
        assert!(max_z > 5.0, "Pluto max |z| = {max_z}");
    }

    #[test]
    fn unknown_planet_is_rejected() {
        let eph = KeplerEphemeris::solar_system();
        assert!(matches!(
            eph.vector("Planet9", j2000()),
            Err(EphemerisError::UnknownBody { name }) if name == "Planet9"
        ));
    }
}
