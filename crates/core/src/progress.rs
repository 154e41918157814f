// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress trackers for duration- and count-driven entities
//!
//! Targets of zero mean "no target": such a tracker never reports elapsed.

/// Rounding allowance per accumulated delta, in units of the target's relative epsilon
const ULPS_PER_STEP: f64 = 4.0;

fn non_negative(value: f64) -> f64 {
    // f64::max ignores NaN, so NaN clamps to 0 as well
    value.max(0.0)
}

/// Scaled wall-time accumulated toward a target, in seconds
///
/// `is_elapsed` compares against the target with a rounding allowance of a
/// few ULPs per accumulated delta, so `n` steps of `target / n` land on the
/// target while any real shortfall does not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeProgress {
    elapsed: f64,
    target: f64,
    scale: f64,
    /// Deltas summed into `elapsed` since the last reset
    steps: u32,
}

impl TimeProgress {
    pub fn new(target: f64) -> Self {
        Self {
            elapsed: 0.0,
            target: non_negative(target),
            scale: 1.0,
            steps: 0,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the time scale; negative values clamp to 0 (frozen)
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = non_negative(scale);
    }

    /// Accumulate `dt * scale`
    pub fn advance(&mut self, dt: f64) {
        self.advance_summed(dt, 1);
    }

    /// Accumulate `dt * scale`, where `dt` is itself a sum of `summands` deltas
    pub fn advance_summed(&mut self, dt: f64, summands: u32) {
        self.elapsed += non_negative(dt) * self.scale;
        self.steps = self.steps.saturating_add(summands.max(1));
    }

    fn slack(&self) -> f64 {
        ULPS_PER_STEP * f64::EPSILON * self.target * f64::from(self.steps.max(1))
    }

    pub fn is_elapsed(&self) -> bool {
        self.target > 0.0 && self.elapsed + self.slack() >= self.target
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.steps = 0;
    }

    /// Start the next period, carrying the overshoot modulo one period
    pub fn rollover(&mut self) {
        let carry = non_negative(self.elapsed - self.target);
        self.elapsed = if self.target > 0.0 {
            carry % self.target
        } else {
            0.0
        };
        self.steps = u32::from(self.elapsed > 0.0);
        if self.is_elapsed() {
            self.reset();
        }
    }

    /// Unscaled time left until the target, or `None` without a target
    pub fn remaining(&self) -> Option<f64> {
        (self.target > 0.0).then(|| non_negative(self.target - self.elapsed))
    }
}

impl Default for TimeProgress {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Number of advancements accumulated toward a target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountProgress {
    elapsed: i32,
    target: i32,
}

impl CountProgress {
    pub fn new(target: i32) -> Self {
        Self {
            elapsed: 0,
            target: target.max(0),
        }
    }

    pub fn elapsed(&self) -> i32 {
        self.elapsed
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn advance(&mut self) {
        self.elapsed = self.elapsed.saturating_add(1);
    }

    pub fn is_elapsed(&self) -> bool {
        self.target > 0 && self.elapsed >= self.target
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

/// The tracker bound to one entity, chosen by its run mode
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Progress {
    /// Perpetual entities track nothing
    #[default]
    None,
    Time(TimeProgress),
    Count(CountProgress),
}

impl Progress {
    pub fn is_elapsed(&self) -> bool {
        match self {
            Progress::None => false,
            Progress::Time(time) => time.is_elapsed(),
            Progress::Count(count) => count.is_elapsed(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Progress::None => {}
            Progress::Time(time) => time.reset(),
            Progress::Count(count) => count.reset(),
        }
    }

    /// Reset for a repeating restart. Time carries less than one period, counts restart at zero.
    pub fn rollover(&mut self) {
        match self {
            Progress::None => {}
            Progress::Time(time) => time.rollover(),
            Progress::Count(count) => count.reset(),
        }
    }

    pub fn as_time(&self) -> Option<&TimeProgress> {
        match self {
            Progress::Time(time) => Some(time),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<&CountProgress> {
        match self {
            Progress::Count(count) => Some(count),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
