// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The spring timing shared by every transition and spring-back.
//!
//! Motion is driven by a damped harmonic oscillator integrated in fixed
//! sub-steps, so the real duration falls out of the spring parameters. The
//! nominal duration on [`SpringTiming`] is informational only.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Integration sub-step in seconds.
const SUB_STEP: f64 = 1.0 / 240.0;
/// Position and velocity tolerance for considering the spring at rest.
const REST_EPSILON: f64 = 1e-3;
/// Hard cap on simulated time; the spring snaps to its target afterwards.
const MAX_DURATION: f64 = 4.0;

/// Parameters of a damped spring with unit mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringTiming {
    /// Stiffness (`k`).
    pub stiffness: f64,
    /// Damping coefficient (`c`).
    pub damping: f64,
    /// Nominal duration in seconds. Not used by the solver.
    pub nominal_duration: f64,
}

impl SpringTiming {
    /// Build a spring from a response (period, seconds) and damping ratio.
    pub fn new(response: f64, damping_ratio: f64) -> Self {
        debug_assert!(response > 0.0, "spring response must be positive");
        let omega = core::f64::consts::TAU / response;
        Self {
            stiffness: omega * omega,
            damping: 2.0 * damping_ratio * omega,
            nominal_duration: response,
        }
    }

    /// The timing used for show and dismiss transitions.
    pub fn standard() -> Self {
        Self::new(0.35, 0.86).with_nominal_duration(0.3)
    }

    /// A softer timing used to settle a released drag back into place.
    pub fn spring_back() -> Self {
        Self::new(0.3, 0.75).with_nominal_duration(0.3)
    }

    /// Replace the nominal duration.
    pub fn with_nominal_duration(mut self, seconds: f64) -> Self {
        self.nominal_duration = seconds;
        self
    }

    /// Damping ratio (`ζ`); `1.0` is critically damped.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * self.stiffness.sqrt())
    }
}

impl Default for SpringTiming {
    fn default() -> Self {
        Self::standard()
    }
}

/// A running spring moving a scalar progress from its start towards `1.0`.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    timing: SpringTiming,
    position: f64,
    velocity: f64,
    elapsed: f64,
    settled: bool,
}

impl Spring {
    /// A spring at rest at `0.0`, heading for `1.0`.
    pub fn new(timing: SpringTiming) -> Self {
        Self {
            timing,
            position: 0.0,
            velocity: 0.0,
            elapsed: 0.0,
            settled: false,
        }
    }

    /// Current progress. May overshoot `1.0` while underdamped.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// `true` once the spring came to rest at `1.0`.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Move the spring to `position` with zero velocity.
    pub fn jump_to(&mut self, position: f64) {
        self.position = position;
        self.velocity = 0.0;
        self.settled = false;
    }

    /// Advance by `dt` seconds. Returns `true` once settled.
    ///
    /// Negative `dt` is treated as zero.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.settled {
            return true;
        }
        let mut remaining = dt.max(0.0);
        while remaining > 0.0 {
            let h = remaining.min(SUB_STEP);
            let accel =
                -self.timing.stiffness * (self.position - 1.0) - self.timing.damping * self.velocity;
            self.velocity += accel * h;
            self.position += self.velocity * h;
            self.elapsed += h;
            remaining -= h;

            let at_rest =
                (self.position - 1.0).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON;
            if at_rest || self.elapsed >= MAX_DURATION {
                self.position = 1.0;
                self.velocity = 0.0;
                self.settled = true;
                break;
            }
        }
        self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_spring_is_slightly_underdamped() {
        let t = SpringTiming::standard();
        assert!((t.damping_ratio() - 0.86).abs() < 1e-9);
        assert_eq!(t.nominal_duration, 0.3);
    }

    #[test]
    fn spring_settles_at_one() {
        let mut s = Spring::new(SpringTiming::standard());
        assert!(!s.step(0.05));
        assert!(s.position() > 0.0 && s.position() < 1.0);
        let mut frames = 0;
        while !s.step(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 600, "spring never settled");
        }
        assert_eq!(s.position(), 1.0);
        assert!(s.is_settled());
    }

    #[test]
    fn negative_dt_does_not_move() {
        let mut s = Spring::new(SpringTiming::standard());
        s.step(-1.0);
        assert_eq!(s.position(), 0.0);
    }

    #[test]
    fn jump_resumes_from_new_position() {
        let mut s = Spring::new(SpringTiming::standard());
        s.step(0.1);
        s.jump_to(0.8);
        assert_eq!(s.position(), 0.8);
        s.step(1.0 / 240.0);
        assert!(s.position() > 0.8);
    }

    #[test]
    fn large_dt_completes_within_the_cap() {
        let mut s = Spring::new(SpringTiming::spring_back());
        assert!(s.step(10.0));
        assert_eq!(s.position(), 1.0);
    }
}
