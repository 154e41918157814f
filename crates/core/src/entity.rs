// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled entity state machine
//!
//! One entity is one timer, counter or per-tick coroutine. Run modes share a
//! single type; the bound [`Progress`] tracker is switched on when advancing.
//!
//! ```text
//!            start                pause
//!  Stopped ─────────▶ Running ─────────▶ Paused
//!     ▲                │  ▲                │
//!     │   stop/elapse  │  └────── resume ──┘
//!     └────────────────┘
//! ```
//!
//! Control operations return `true` only when they fired their transition payload.

use crate::config::{ConfigError, EntityConfig};
use crate::payload::PayloadSet;
use crate::progress::{CountProgress, Progress, TimeProgress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique name of an entity within one scheduler
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The current state of an entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntityState {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityState::Stopped => write!(f, "stopped"),
            EntityState::Running => write!(f, "running"),
            EntityState::Paused => write!(f, "paused"),
        }
    }
}

impl std::str::FromStr for EntityState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopped" => Ok(EntityState::Stopped),
            "running" => Ok(EntityState::Running),
            "paused" => Ok(EntityState::Paused),
            _ => Err(format!("unknown entity state: {}", s)),
        }
    }
}

/// How an entity makes progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Runs its tick payload forever, never elapses
    Perpetual,
    /// Elapses after a scaled wall-time duration
    Duration,
    /// Elapses after a number of ticks
    Count,
    /// Runs only on ticks where `(t - offset) mod interval == 0`
    TimeSliced,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Perpetual => write!(f, "perpetual"),
            RunMode::Duration => write!(f, "duration"),
            RunMode::Count => write!(f, "count"),
            RunMode::TimeSliced => write!(f, "time_sliced"),
        }
    }
}

/// What an entity does once its target is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    /// Stop after elapsing once
    #[default]
    Finite,
    /// Restart and keep running
    Repeating,
}

/// Which tick source drives an entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessAffinity {
    #[default]
    FrameUpdate,
    Heartbeat,
    Always,
}

impl fmt::Display for ProcessAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessAffinity::FrameUpdate => write!(f, "frame"),
            ProcessAffinity::Heartbeat => write!(f, "heartbeat"),
            ProcessAffinity::Always => write!(f, "always"),
        }
    }
}

/// Phase-aligned periodic execution: every `interval` ticks, shifted by `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlice {
    pub interval: i32,
    #[serde(default)]
    pub offset: i32,
}

impl TimeSlice {
    /// Create a time slice; the interval clamps to at least 1 and the offset to at least 0
    pub fn new(interval: i32, offset: i32) -> Self {
        Self {
            interval: interval.max(1),
            offset: offset.max(0),
        }
    }

    /// Whether the slice runs on 1-based tick `tick`
    pub fn is_due(&self, tick: u64) -> bool {
        let interval = i128::from(self.interval.max(1));
        (i128::from(tick) - i128::from(self.offset)).rem_euclid(interval) == 0
    }
}

/// Result of advancing an entity by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NotElapsed,
    Elapsed,
}

/// One schedulable timer, counter or per-tick coroutine
#[derive(Debug, Clone)]
pub struct ScheduledEntity {
    id: EntityId,
    state: EntityState,
    run_mode: RunMode,
    continuation: Continuation,
    affinity: ProcessAffinity,
    time_slice: Option<TimeSlice>,
    progress: Progress,
    paused_by_disable: bool,
    /// Delta carried over from skipped time-slice ticks
    deferred: f64,
    deferred_ticks: u32,
    elapsed_count: u64,
    payloads: PayloadSet,
}

impl ScheduledEntity {
    /// Construct a stopped entity from a validated configuration
    pub fn from_config(config: &EntityConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let run_mode = config.run_mode();
        let mut progress = if config.count > 0 {
            Progress::Count(CountProgress::new(config.count))
        } else if config.duration_secs() > 0.0 {
            Progress::Time(TimeProgress::new(config.duration_secs()))
        } else {
            Progress::None
        };
        if let Progress::Time(time) = &mut progress {
            time.set_scale(config.time_scale);
        }

        Ok(Self {
            id: EntityId::new(config.name.clone()),
            state: EntityState::Stopped,
            run_mode,
            continuation: config.continuation,
            affinity: config.affinity(),
            time_slice: config.slice.map(|s| TimeSlice::new(s.interval, s.offset)),
            progress,
            paused_by_disable: false,
            deferred: 0.0,
            deferred_ticks: 0,
            elapsed_count: 0,
            payloads: config.payloads.clone(),
        })
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    pub fn continuation(&self) -> Continuation {
        self.continuation
    }

    pub fn affinity(&self) -> ProcessAffinity {
        self.affinity
    }

    pub fn time_slice(&self) -> Option<TimeSlice> {
        self.time_slice
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn payloads(&self) -> &PayloadSet {
        &self.payloads
    }

    pub fn paused_by_disable(&self) -> bool {
        self.paused_by_disable
    }

    /// How many times this entity has elapsed since creation
    pub fn elapsed_count(&self) -> u64 {
        self.elapsed_count
    }

    pub fn is_running(&self) -> bool {
        self.state == EntityState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == EntityState::Paused
    }

    /// Current time scale, for time-driven entities
    pub fn time_scale(&self) -> Option<f64> {
        self.progress.as_time().map(TimeProgress::scale)
    }

    /// Set the time scale (clamped to >= 0). Returns `false` for entities without a duration.
    pub fn set_time_scale(&mut self, scale: f64) -> bool {
        match &mut self.progress {
            Progress::Time(time) => {
                time.set_scale(scale);
                true
            }
            _ => false,
        }
    }

    fn rewind(&mut self) {
        self.progress.reset();
        self.deferred = 0.0;
        self.deferred_ticks = 0;
        self.paused_by_disable = false;
    }

    /// Start or restart from zero progress. Fires only from `Stopped`.
    pub fn start(&mut self) -> bool {
        let fresh = self.state == EntityState::Stopped;
        self.state = EntityState::Running;
        self.rewind();
        fresh
    }

    /// Stop and discard progress
    pub fn stop(&mut self) -> bool {
        if self.state == EntityState::Stopped {
            return false;
        }
        self.state = EntityState::Stopped;
        self.rewind();
        true
    }

    /// Pause, keeping progress. Pausing an entity that a disable paused makes the pause explicit.
    pub fn pause(&mut self) -> bool {
        if self.state == EntityState::Paused {
            self.paused_by_disable = false;
            return false;
        }
        if self.state != EntityState::Running {
            return false;
        }
        self.state = EntityState::Paused;
        true
    }

    /// Resume a paused entity, keeping progress
    pub fn resume(&mut self) -> bool {
        if self.state != EntityState::Paused {
            return false;
        }
        self.state = EntityState::Running;
        self.paused_by_disable = false;
        true
    }

    /// Pause because the owning object was disabled
    pub fn pause_by_disable(&mut self) -> bool {
        if self.state != EntityState::Running {
            return false;
        }
        self.state = EntityState::Paused;
        self.paused_by_disable = true;
        true
    }

    /// Resume only if the pause came from a disable; explicit pauses stick
    pub fn resume_by_enable(&mut self) -> bool {
        if !(self.state == EntityState::Paused && self.paused_by_disable) {
            return false;
        }
        self.resume()
    }

    /// Carry a tick delta over to the next time-slice execution
    pub fn defer(&mut self, delta: f64) {
        if self.is_running() && matches!(self.progress, Progress::Time(_)) {
            self.deferred += delta.max(0.0);
            self.deferred_ticks = self.deferred_ticks.saturating_add(1);
        }
    }

    /// Accumulate scaled time. No-op unless running with a duration.
    pub fn advance_time(&mut self, delta: f64) -> Advance {
        if !self.is_running() {
            return Advance::NotElapsed;
        }
        let Progress::Time(time) = &mut self.progress else {
            return Advance::NotElapsed;
        };
        let delta = delta + std::mem::take(&mut self.deferred);
        let summands = std::mem::take(&mut self.deferred_ticks).saturating_add(1);
        time.advance_summed(delta, summands);
        self.settle()
    }

    /// Count one tick. No-op unless running with a target count.
    pub fn advance_count(&mut self) -> Advance {
        if !self.is_running() {
            return Advance::NotElapsed;
        }
        let Progress::Count(count) = &mut self.progress else {
            return Advance::NotElapsed;
        };
        count.advance();
        self.settle()
    }

    /// Advance with whichever tracker this entity is bound to
    pub fn advance(&mut self, delta: f64) -> Advance {
        match self.progress {
            Progress::Count(_) => self.advance_count(),
            Progress::Time(_) => self.advance_time(delta),
            Progress::None => Advance::NotElapsed,
        }
    }

    fn settle(&mut self) -> Advance {
        if !self.progress.is_elapsed() {
            return Advance::NotElapsed;
        }
        self.elapsed_count += 1;
        match self.continuation {
            Continuation::Repeating => self.progress.rollover(),
            Continuation::Finite => {
                self.state = EntityState::Stopped;
                self.rewind();
            }
        }
        Advance::Elapsed
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
