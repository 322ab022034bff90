use chrono::{DateTime, Datelike, TimeDelta, Utc};

use crate::api::config::{ConfigError, OrreryConfig};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// J2000.0 (2000-01-01T12:00:00Z) in Unix milliseconds.
pub const J2000_UNIX_MS: i64 = 946_728_000_000;

const MICROS_PER_MILLI: f64 = 1000.0;

/// Maps render time to simulation time.
///
/// `simulation_date = base_date + elapsed_render_time × 1000 × speed_multiplier` ms.
/// Changing speed or jumping rebases the clock so the mapping stays linear
/// from the new base.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    base_date: DateTime<Utc>,
    speed_multiplier: f64,
    /// Render seconds since `base_date` was set.
    elapsed_render_time: f64,
    paused: bool,
}

impl SimulationClock {
    pub fn new(base_date: DateTime<Utc>, speed_multiplier: f64) -> Self {
        Self {
            base_date,
            speed_multiplier,
            elapsed_render_time: 0.0,
            paused: false,
        }
    }

    pub fn from_config(config: &OrreryConfig) -> Self {
        Self::new(config.base_simulation_date, config.time_speed_multiplier)
    }

    /// Advance by `dt` render seconds. Returns the render seconds that
    /// actually elapsed in simulation terms: zero while paused, and zero for
    /// negative or non-finite input.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.paused || !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        self.elapsed_render_time += dt;
        dt
    }

    pub fn simulation_date(&self) -> DateTime<Utc> {
        let millis = self.elapsed_render_time * 1000.0 * self.speed_multiplier;
        // f64 -> i64 casts saturate; TimeDelta::microseconds accepts the full i64 range.
        let delta = TimeDelta::microseconds((millis * MICROS_PER_MILLI) as i64);
        self.base_date
            .checked_add_signed(delta)
            .unwrap_or(if millis >= 0.0 {
                DateTime::<Utc>::MAX_UTC
            } else {
                DateTime::<Utc>::MIN_UTC
            })
    }

    /// Simulated days per render second.
    pub fn time_scale(&self) -> f64 {
        self.speed_multiplier / SECONDS_PER_DAY
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Change speed without moving the current simulation date.
    pub fn set_speed(&mut self, speed_multiplier: f64) -> Result<(), ConfigError> {
        if !(speed_multiplier.is_finite() && speed_multiplier >= 0.0) {
            return Err(ConfigError::Negative {
                field: "timeSpeedMultiplier",
                value: speed_multiplier,
            });
        }
        self.rebase(self.simulation_date());
        self.speed_multiplier = speed_multiplier;
        Ok(())
    }

    /// Move the simulation to `date`, keeping the current speed.
    pub fn jump_to(&mut self, date: DateTime<Utc>) {
        self.rebase(date);
    }

    fn rebase(&mut self, date: DateTime<Utc>) {
        self.base_date = date;
        self.elapsed_render_time = 0.0;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn days_since_j2000(&self) -> f64 {
        days_since_j2000(self.simulation_date())
    }

    /// (year, month, day) of the current simulation date.
    pub fn calendar_date(&self) -> (i32, u32, u32) {
        let date = self.simulation_date();
        (date.year(), date.month(), date.day())
    }
}

/// Fractional days elapsed since J2000.0. Negative before the epoch.
pub fn days_since_j2000(date: DateTime<Utc>) -> f64 {
    (date.timestamp_millis() - J2000_UNIX_MS) as f64 / (SECONDS_PER_DAY * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DateTime<Utc> {
        DateTime::from_timestamp(1_704_067_200, 0).unwrap()
    }

    #[test]
    fn one_render_second_is_one_day_at_default_speed() {
        let mut clock = SimulationClock::new(base(), SECONDS_PER_DAY);
        clock.advance(1.0);
        let elapsed = clock.simulation_date() - base();
        assert_eq!(elapsed.num_seconds(), 86_400);
        assert!((clock.time_scale() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_and_nan_dt_are_ignored() {
        let mut clock = SimulationClock::new(base(), 1.0);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
        assert_eq!(clock.simulation_date(), base());
    }

    #[test]
    fn paused_clock_does_not_advance() {
        let mut clock = SimulationClock::new(base(), 1.0);
        clock.toggle_pause();
        assert_eq!(clock.advance(10.0), 0.0);
        assert_eq!(clock.simulation_date(), base());
        clock.toggle_pause();
        assert_eq!(clock.advance(10.0), 10.0);
    }

    #[test]
    fn set_speed_preserves_current_date() {
        let mut clock = SimulationClock::new(base(), 3600.0);
        clock.advance(2.0);
        let before = clock.simulation_date();
        clock.set_speed(60.0).unwrap();
        assert_eq!(clock.simulation_date(), before);
        clock.advance(1.0);
        assert_eq!((clock.simulation_date() - before).num_seconds(), 60);
    }

    #[test]
    fn set_speed_rejects_negative() {
        let mut clock = SimulationClock::new(base(), 1.0);
        assert!(clock.set_speed(-5.0).is_err());
        assert_eq!(clock.speed_multiplier(), 1.0);
    }

    #[test]
    fn jump_to_moves_date() {
        let mut clock = SimulationClock::new(base(), SECONDS_PER_DAY);
        clock.advance(5.0);
        let target = DateTime::from_timestamp(1_608_573_600, 0).unwrap();
        clock.jump_to(target);
        assert_eq!(clock.simulation_date(), target);
        assert_eq!(clock.calendar_date(), (2020, 12, 21));
    }

    #[test]
    fn huge_elapsed_saturates_instead_of_panicking() {
        let mut clock = SimulationClock::new(base(), 1e30);
        clock.advance(1e10);
        assert_eq!(clock.simulation_date(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn j2000_is_day_zero() {
        let j2000 = DateTime::from_timestamp_millis(J2000_UNIX_MS).unwrap();
        assert_eq!(days_since_j2000(j2000), 0.0);
        let later = DateTime::from_timestamp_millis(J2000_UNIX_MS + 86_400_000).unwrap();
        assert!((days_since_j2000(later) - 1.0).abs() < 1e-12);
    }
}
