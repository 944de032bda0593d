//! Exponential decay curves
//!
//! Velocity decays as `v(t) = v0 * rate^(1000 t)`, i.e. the rate is the
//! fraction of velocity kept per millisecond. Integrating gives the position
//! in closed form, so a glide can be sampled at any time without stepping:
//!
//! ```text
//! d        = 1000 * ln(rate)                      (negative for rate in (0, 1))
//! x(t)     = x0 + (rate^(1000 t) - 1) / d * v0
//! duration = ln(-d * threshold / |v0|) / d
//! ```
//!
//! `duration` is the time at which the curve speed falls to `-d * threshold`,
//! which puts `x(duration)` exactly `threshold` short of the asymptotic stop
//! point `x0 - v0 / d`.

use std::time::Duration;

use glide_core::{Point, Vec2};

/// A closed-form deceleration curve
///
/// Immutable once built. A rate outside the open interval (0, 1) or a zero
/// velocity makes the curve degenerate: zero duration, and every sample is the
/// initial position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayCurve {
    initial_position: Point,
    initial_velocity: Vec2,
    decay_rate: f64,
    threshold: f64,
}

impl DecayCurve {
    pub fn new(
        initial_position: Point,
        initial_velocity: Vec2,
        decay_rate: f64,
        threshold: f64,
    ) -> Self {
        Self {
            initial_position,
            initial_velocity,
            decay_rate,
            threshold,
        }
    }

    pub fn initial_position(&self) -> Point {
        self.initial_position
    }

    pub fn initial_velocity(&self) -> Vec2 {
        self.initial_velocity
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether the curve describes no motion at all
    pub fn is_degenerate(&self) -> bool {
        !(self.decay_rate > 0.0 && self.decay_rate < 1.0) || self.initial_velocity.is_zero()
    }

    /// `1000 * ln(rate)`, the exponent scale of the decay (per second)
    fn decay_coefficient(&self) -> f64 {
        1000.0 * self.decay_rate.ln()
    }

    /// Raw curve duration in seconds
    ///
    /// Negative when the initial speed is already below the stop speed; use
    /// [`DecayCurve::duration`] when a playable duration is needed.
    pub fn duration_secs(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }

        let d = self.decay_coefficient();
        (-d * self.threshold / self.initial_velocity.length()).ln() / d
    }

    /// Playable duration, clamped to zero for degenerate or already-stopped curves
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs()).unwrap_or(Duration::ZERO)
    }

    /// Position on the curve `time` seconds after release
    pub fn position_at(&self, time: f64) -> Point {
        if self.is_degenerate() {
            return self.initial_position;
        }

        let d = self.decay_coefficient();
        let factor = (self.decay_rate.powf(1000.0 * time) - 1.0) / d;
        self.initial_position + factor * self.initial_velocity
    }

    /// Curve velocity `time` seconds after release
    pub fn velocity_at(&self, time: f64) -> Vec2 {
        if self.is_degenerate() {
            return Vec2::ZERO;
        }

        self.decay_rate.powf(1000.0 * time) * self.initial_velocity
    }

    /// Asymptotic resting position (`t -> inf`)
    pub fn stop_position(&self) -> Point {
        if self.is_degenerate() {
            return self.initial_position;
        }

        self.initial_position + (-1.0 / self.decay_coefficient()) * self.initial_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORMAL: f64 = 0.998;
    const THRESHOLD: f64 = 0.1;

    fn distance(a: Point, b: Point) -> f64 {
        (a - b).length()
    }

    #[test]
    fn test_degenerate_rates_do_not_move() {
        let start = Point::new(3.0, 50.0);
        for rate in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
            let curve = DecayCurve::new(start, Vec2::new(0.0, -1200.0), rate, THRESHOLD);
            assert!(curve.is_degenerate());
            assert_eq!(curve.duration_secs(), 0.0);
            assert_eq!(curve.duration(), Duration::ZERO);
            for t in [0.0, 0.1, 1.0, 10.0] {
                assert_eq!(curve.position_at(t), start);
            }
        }
    }

    #[test]
    fn test_zero_velocity_does_not_move() {
        let start = Point::new(0.0, 120.0);
        let curve = DecayCurve::new(start, Vec2::ZERO, NORMAL, THRESHOLD);

        assert_eq!(curve.duration(), Duration::ZERO);
        assert_eq!(curve.position_at(0.5), start);
        assert_eq!(curve.stop_position(), start);
        assert_eq!(curve.velocity_at(0.5), Vec2::ZERO);
    }

    #[test]
    fn test_duration_matches_closed_form() {
        let velocity = Vec2::new(0.0, -1200.0);
        let curve = DecayCurve::new(Point::new(0.0, 50.0), velocity, NORMAL, THRESHOLD);

        let d = 1000.0 * NORMAL.ln();
        let expected = (-d * THRESHOLD / 1200.0).ln() / d;
        assert!((curve.duration_secs() - expected).abs() < 1e-12);
        assert!(curve.duration_secs() > 0.0);
        assert!((curve.duration().as_secs_f64() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_starts_exactly_at_initial_position() {
        let start = Point::new(12.5, 340.25);
        let curve = DecayCurve::new(start, Vec2::new(80.0, -2400.0), NORMAL, THRESHOLD);
        assert_eq!(curve.position_at(0.0), start);
    }

    #[test]
    fn test_ends_within_threshold_of_stop_position() {
        let curve = DecayCurve::new(
            Point::new(0.0, 50.0),
            Vec2::new(0.0, -120_000.0),
            NORMAL,
            THRESHOLD,
        );

        let end = curve.position_at(curve.duration_secs());
        assert!(distance(end, curve.stop_position()) <= THRESHOLD + 1e-9);

        let d = 1000.0 * NORMAL.ln();
        let expected_stop = 50.0 + -120_000.0 / -d;
        assert!((curve.stop_position().y - expected_stop).abs() < 1e-9);
    }

    #[test]
    fn test_position_is_monotonic_along_velocity() {
        let velocity = Vec2::new(30.0, -900.0);
        let curve = DecayCurve::new(Point::new(0.0, 400.0), velocity, 0.99, THRESHOLD);
        let duration = curve.duration_secs();

        let mut previous = curve.position_at(0.0);
        for i in 1..=200 {
            let t = duration * i as f64 / 200.0;
            let current = curve.position_at(t);
            // Progress along the release direction never goes backwards
            assert!((current - previous).dot(velocity) >= 0.0, "overshoot at t={t}");
            previous = current;
        }
    }

    #[test]
    fn test_velocity_is_derivative_of_position() {
        let curve = DecayCurve::new(Point::ZERO, Vec2::new(0.0, 1500.0), NORMAL, THRESHOLD);
        let h = 1e-6;

        for t in [0.01, 0.2, 1.0] {
            let numeric = (curve.position_at(t + h).y - curve.position_at(t - h).y) / (2.0 * h);
            let analytic = curve.velocity_at(t).y;
            assert!((numeric - analytic).abs() / analytic.abs() < 1e-4);
        }
    }

    #[test]
    fn test_slow_release_has_no_playable_duration() {
        // Speed below -d * threshold (~0.2) is already "stopped"
        let curve = DecayCurve::new(Point::ZERO, Vec2::new(0.0, 0.05), NORMAL, THRESHOLD);
        assert!(curve.duration_secs() < 0.0);
        assert_eq!(curve.duration(), Duration::ZERO);
    }
}
