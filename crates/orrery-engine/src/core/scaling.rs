use crate::api::config::OrreryConfig;
use crate::ephemeris::AU_KM;

/// Physical magnitudes to visual units.
///
/// Distances are compressed logarithmically; diameters by a power law with a
/// floor so the smallest moons stay visible. Both mappings are monotonic and
/// never return NaN or a negative value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingEngine {
    distance_log_scale: f64,
    diameter_exponent: f64,
    diameter_multiplier: f64,
    min_visual_radius: f64,
}

impl ScalingEngine {
    pub fn new(config: &OrreryConfig) -> Self {
        Self {
            distance_log_scale: config.distance_log_scale,
            diameter_exponent: config.diameter_exponent,
            diameter_multiplier: config.diameter_multiplier,
            min_visual_radius: config.min_visual_radius,
        }
    }

    /// `log10(|km| + 1) × distanceLogScale`. Non-finite input maps to 0.
    pub fn visual_distance(&self, distance_km: f64) -> f64 {
        if !distance_km.is_finite() {
            return 0.0;
        }
        (distance_km.abs() + 1.0).log10() * self.distance_log_scale
    }

    pub fn visual_distance_au(&self, distance_au: f64) -> f64 {
        self.visual_distance(distance_au * AU_KM)
    }

    /// `diameter^exponent × multiplier`, floored at `minVisualRadius`.
    pub fn visual_radius(&self, diameter_km: f64) -> f64 {
        if !(diameter_km.is_finite() && diameter_km > 0.0) {
            return self.min_visual_radius;
        }
        let scaled = diameter_km.powf(self.diameter_exponent) * self.diameter_multiplier;
        if scaled.is_finite() {
            scaled.max(self.min_visual_radius)
        } else {
            self.min_visual_radius
        }
    }
}
