use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unix timestamp of 2024-01-01T00:00:00Z, the default simulation start.
const DEFAULT_BASE_DATE_UNIX: i64 = 1_704_067_200;
/// Unix timestamp of 2000-01-01T00:00:00Z, the epoch at which orbit bands are sampled.
const DEFAULT_REFERENCE_EPOCH_UNIX: i64 = 946_684_800;

/// Session configuration: every coefficient the scaling, packing, satellite,
/// motion and camera stages read. One immutable value per session, passed
/// explicitly into each component.
///
/// Keys are camelCase in JSON; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrreryConfig {
    /// Multiplier applied to `log10(km + 1)` for distances.
    pub distance_log_scale: f64,
    /// Exponent applied to the physical diameter.
    pub diameter_exponent: f64,
    /// Multiplier applied after the diameter exponent.
    pub diameter_multiplier: f64,
    /// Floor for every visual radius, so tiny bodies stay visible.
    pub min_visual_radius: f64,
    /// Multiplier on the scaled reference distance when packing bands.
    pub orbit_radius_multiplier: f64,
    /// How many visual radii of clearance each band reserves on either side.
    pub orbit_padding_factor: f64,
    /// Extra empty space between consecutive occupied bands.
    pub orbit_safe_gap: f64,
    /// Smallest moon, as a fraction of the parent's visual radius.
    pub moon_min_ratio: f64,
    /// Largest moon, as a fraction of the parent's visual radius.
    pub moon_max_ratio: f64,
    /// Clearance between parent surface and moon, in parent radii.
    pub moon_surface_gap_multiplier: f64,
    /// Outermost moon orbit, in parent radii.
    pub moon_max_bubble_multiplier: f64,
    /// Time constant (seconds) of the camera's exponential damping.
    pub transition_damping_tau: f64,
    /// Camera-to-goal distance under which a fly-to is considered done.
    pub transition_epsilon: f64,
    /// Hard cap on fly-to ticks before the controller gives up.
    pub transition_max_ticks: u32,
    /// Simulated seconds per render second.
    pub time_speed_multiplier: f64,
    /// Simulation date at render time zero.
    pub base_simulation_date: DateTime<Utc>,
    /// Date at which true distances are sampled for band packing.
    pub reference_epoch: DateTime<Utc>,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            distance_log_scale: 1000.0,
            diameter_exponent: 0.41,
            diameter_multiplier: 25.0,
            min_visual_radius: 20.0,
            orbit_radius_multiplier: 2.0,
            orbit_padding_factor: 5.5,
            orbit_safe_gap: 5000.0,
            moon_min_ratio: 0.06,
            moon_max_ratio: 0.4,
            moon_surface_gap_multiplier: 0.5,
            moon_max_bubble_multiplier: 5.0,
            transition_damping_tau: 0.3,
            transition_epsilon: 1.0,
            transition_max_ticks: 1200,
            // One simulated day per render second.
            time_speed_multiplier: 86_400.0,
            base_simulation_date: DateTime::from_timestamp(DEFAULT_BASE_DATE_UNIX, 0)
                .unwrap_or_default(),
            reference_epoch: DateTime::from_timestamp(DEFAULT_REFERENCE_EPOCH_UNIX, 0)
                .unwrap_or_default(),
        }
    }
}

/// Errors raised while loading or validating an [`OrreryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be a finite, non-negative number (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("`{field}` must be strictly positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`moonMinRatio` ({min}) exceeds `moonMaxRatio` ({max})")]
    InvertedMoonRatios { min: f64, max: f64 },
    #[error("`moonMaxBubbleMultiplier` ({bubble}) is below the parent surface bound ({floor})")]
    BubbleBelowSurface { bubble: f64, floor: f64 },
    #[error(
        "satellites may reach {reach} parent radii but `orbitPaddingFactor` only reserves {padding}"
    )]
    SatellitesExceedBand { reach: f64, padding: f64 },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl OrreryConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject negative or non-finite coefficients and inconsistent ranges.
    /// Values are never clamped silently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("distanceLogScale", self.distance_log_scale),
            ("diameterExponent", self.diameter_exponent),
            ("diameterMultiplier", self.diameter_multiplier),
            ("minVisualRadius", self.min_visual_radius),
            ("orbitRadiusMultiplier", self.orbit_radius_multiplier),
            ("orbitPaddingFactor", self.orbit_padding_factor),
            ("orbitSafeGap", self.orbit_safe_gap),
            ("moonMinRatio", self.moon_min_ratio),
            ("moonMaxRatio", self.moon_max_ratio),
            ("moonSurfaceGapMultiplier", self.moon_surface_gap_multiplier),
            ("moonMaxBubbleMultiplier", self.moon_max_bubble_multiplier),
            ("timeSpeedMultiplier", self.time_speed_multiplier),
        ];
        for (field, value) in non_negative {
            check_non_negative(field, value)?;
        }

        let positive = [
            ("transitionDampingTau", self.transition_damping_tau),
            ("transitionEpsilon", self.transition_epsilon),
            ("transitionMaxTicks", self.transition_max_ticks as f64),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.moon_min_ratio > self.moon_max_ratio {
            return Err(ConfigError::InvertedMoonRatios {
                min: self.moon_min_ratio,
                max: self.moon_max_ratio,
            });
        }

        let floor = 1.0 + self.moon_max_ratio + self.moon_surface_gap_multiplier;
        if self.moon_max_bubble_multiplier < floor {
            return Err(ConfigError::BubbleBelowSurface {
                bubble: self.moon_max_bubble_multiplier,
                floor,
            });
        }

        // A moon system spans at most (bubble + max ratio) parent radii; the
        // parent's band must reserve that much so neighbours never collide.
        let reach = self.moon_max_bubble_multiplier + self.moon_max_ratio;
        if reach > self.orbit_padding_factor {
            return Err(ConfigError::SatellitesExceedBand {
                reach,
                padding: self.orbit_padding_factor,
            });
        }

        Ok(())
    }

    /// Simulated days per render second, used by spin and moon integration.
    pub fn time_scale(&self) -> f64 {
        self.time_speed_multiplier / crate::core::clock::SECONDS_PER_DAY
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
