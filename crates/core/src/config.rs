// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity configuration and schedule files
//!
//! An [`EntityConfig`] is the immutable description an entity is built from.
//! Schedules can also be declared in TOML:
//!
//! ```toml
//! [[entity]]
//! name = "regen"
//! duration = "2s"
//! continuation = "repeating"
//! affinity = "heartbeat"
//! on_elapsed = "regen.tick"
//! ```

use crate::entity::{Continuation, ProcessAffinity, RunMode, TimeSlice};
use crate::payload::{Payload, PayloadSet, PayloadSlot};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors detected while validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("entity name must not be empty")]
    EmptyName,
    #[error("{name}: duration must not be negative ({value})")]
    NegativeDuration { name: String, value: f64 },
    #[error("{name}: duration is not a finite number of seconds ({value})")]
    InvalidDuration { name: String, value: f64 },
    #[error("{name}: count must not be negative ({value})")]
    NegativeCount { name: String, value: i32 },
    #[error("{name}: time-slice interval must be at least 1 ({value})")]
    InvalidInterval { name: String, value: i32 },
    #[error("{name}: time-slice offset must not be negative ({value})")]
    NegativeOffset { name: String, value: i32 },
    #[error("{name}: frame and heartbeat tick payloads require the `always` affinity")]
    MixedTickPayloads { name: String },
    #[error("{name}: {slot} never runs with the `{affinity}` affinity")]
    TickPayloadMismatch {
        name: String,
        slot: PayloadSlot,
        affinity: ProcessAffinity,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn default_time_scale() -> f64 {
    1.0
}

/// Configuration for creating a scheduled entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    #[serde(default, with = "humantime_serde::option")]
    pub duration: Option<Duration>,
    #[serde(default)]
    pub count: i32,
    #[serde(default)]
    pub continuation: Continuation,
    #[serde(default)]
    pub slice: Option<TimeSlice>,
    /// Explicit tick source; derived from the tick payloads when absent
    #[serde(default)]
    pub affinity: Option<ProcessAffinity>,
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Start as soon as the entity is registered with an owner
    #[serde(default)]
    pub autostart: bool,
    #[serde(flatten)]
    pub payloads: PayloadSet,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            duration: None,
            count: 0,
            continuation: Continuation::Finite,
            slice: None,
            affinity: None,
            time_scale: default_time_scale(),
            autostart: false,
            payloads: PayloadSet::default(),
        }
    }
}

impl EntityConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_count(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.continuation = Continuation::Repeating;
        self
    }

    pub fn with_slice(mut self, interval: i32, offset: i32) -> Self {
        self.slice = Some(TimeSlice { interval, offset });
        self
    }

    pub fn with_affinity(mut self, affinity: ProcessAffinity) -> Self {
        self.affinity = Some(affinity);
        self
    }

    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }

    pub fn autostart(mut self) -> Self {
        self.autostart = true;
        self
    }

    pub fn with_payload(mut self, slot: PayloadSlot, payload: impl Into<Payload>) -> Self {
        self.payloads.set(slot, payload.into());
        self
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration.map_or(0.0, |d| d.as_secs_f64())
    }

    /// Derive the run mode; the first matching rule wins
    pub fn run_mode(&self) -> RunMode {
        if self.slice.is_some_and(|s| s.interval > 0) {
            RunMode::TimeSliced
        } else if self.count > 0 {
            RunMode::Count
        } else if self.duration_secs() > 0.0 {
            RunMode::Duration
        } else {
            RunMode::Perpetual
        }
    }

    /// The explicit affinity, or the one implied by the tick payloads
    pub fn affinity(&self) -> ProcessAffinity {
        if let Some(affinity) = self.affinity {
            return affinity;
        }
        match (
            &self.payloads.on_tick_frame,
            &self.payloads.on_tick_heartbeat,
        ) {
            (Some(_), Some(_)) => ProcessAffinity::Always,
            (None, Some(_)) => ProcessAffinity::Heartbeat,
            _ => ProcessAffinity::FrameUpdate,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let name = || self.name.clone();

        if self.count < 0 {
            return Err(ConfigError::NegativeCount {
                name: name(),
                value: self.count,
            });
        }
        if let Some(slice) = self.slice {
            if slice.interval < 1 {
                return Err(ConfigError::InvalidInterval {
                    name: name(),
                    value: slice.interval,
                });
            }
            if slice.offset < 0 {
                return Err(ConfigError::NegativeOffset {
                    name: name(),
                    value: slice.offset,
                });
            }
        }

        let frame = self.payloads.on_tick_frame.is_some();
        let heartbeat = self.payloads.on_tick_heartbeat.is_some();
        match self.affinity {
            Some(ProcessAffinity::Always) => Ok(()),
            _ if frame && heartbeat => Err(ConfigError::MixedTickPayloads { name: name() }),
            None => Ok(()),
            Some(affinity @ ProcessAffinity::FrameUpdate) if heartbeat => {
                Err(ConfigError::TickPayloadMismatch {
                    name: name(),
                    slot: PayloadSlot::TickHeartbeat,
                    affinity,
                })
            }
            Some(affinity @ ProcessAffinity::Heartbeat) if frame => {
                Err(ConfigError::TickPayloadMismatch {
                    name: name(),
                    slot: PayloadSlot::TickFrame,
                    affinity,
                })
            }
            Some(_) => Ok(()),
        }
    }
}

/// A TOML file declaring entities as an `[[entity]]` array
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScheduleFile {
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityConfig>,
}

impl ScheduleFile {
    /// Parse and validate a schedule; configs keep file order
    pub fn parse(content: &str) -> Result<Vec<EntityConfig>, ConfigError> {
        let file: ScheduleFile = toml::from_str(content)?;
        for config in &file.entities {
            config.validate()?;
        }
        Ok(file.entities)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
