// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fluent entity builder and build-phase token bookkeeping
//!
//! Every builder holds a [`BuildToken`] borrowed from its owner. `build()` and
//! `start()` return the token; a builder dropped without either leaves it open
//! and logs the call site where the builder was created. The owner reports any
//! still-open tokens from [`Owner::finish_build`](crate::Owner::finish_build).

use crate::error::OwnerError;
use crate::owner::Owner;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;
use std::time::Duration;
use tempo_core::{
    ConfigError, Continuation, EntityConfig, EntityId, Payload, PayloadExecutor, PayloadSlot,
    ProcessAffinity, TimeSlice,
};

/// Handle for one open builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildToken(u64);

/// A builder that was never finalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfinishedBuilder {
    pub name: String,
    pub location: &'static Location<'static>,
}

impl fmt::Display for UnfinishedBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (created at {})", self.name, self.location)
    }
}

/// Registry of open build tokens, in creation order
#[derive(Debug, Default)]
pub struct BuildTokens {
    next: u64,
    open: BTreeMap<BuildToken, UnfinishedBuilder>,
}

impl BuildTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a token, capturing the caller's location
    #[track_caller]
    pub fn open(&mut self, name: impl Into<String>) -> BuildToken {
        let location = Location::caller();
        let token = BuildToken(self.next);
        self.next += 1;
        self.open.insert(
            token,
            UnfinishedBuilder {
                name: name.into(),
                location,
            },
        );
        token
    }

    /// Release a token; `false` if it was not open
    pub fn close(&mut self, token: BuildToken) -> bool {
        self.open.remove(&token).is_some()
    }

    pub fn get(&self, token: BuildToken) -> Option<&UnfinishedBuilder> {
        self.open.get(&token)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Remove and return every open token
    pub fn drain(&mut self) -> Vec<UnfinishedBuilder> {
        std::mem::take(&mut self.open).into_values().collect()
    }
}

/// Fluent construction of one entity on an [`Owner`]
///
/// Values are checked as they are set; the first invalid one is reported by
/// `build()`.
#[must_use = "an entity builder does nothing until build() or start() is called"]
pub struct EntityBuilder<'o, E: PayloadExecutor> {
    owner: &'o mut Owner<E>,
    config: EntityConfig,
    token: Option<BuildToken>,
    error: Option<ConfigError>,
}

impl<'o, E: PayloadExecutor> EntityBuilder<'o, E> {
    pub(crate) fn new(owner: &'o mut Owner<E>, config: EntityConfig, token: BuildToken) -> Self {
        Self {
            owner,
            config,
            token: Some(token),
            error: None,
        }
    }

    fn reject(&mut self, error: ConfigError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Run for `secs` seconds of scaled time
    pub fn seconds(mut self, secs: f64) -> Self {
        if secs < 0.0 {
            let name = self.config.name.clone();
            self.reject(ConfigError::NegativeDuration { name, value: secs });
            return self;
        }
        match Duration::try_from_secs_f64(secs) {
            Ok(duration) => self.config.duration = Some(duration),
            Err(_) => {
                let name = self.config.name.clone();
                self.reject(ConfigError::InvalidDuration { name, value: secs });
            }
        }
        self
    }

    pub fn millis(self, ms: f64) -> Self {
        self.seconds(ms / 1000.0)
    }

    pub fn minutes(self, minutes: f64) -> Self {
        self.seconds(minutes * 60.0)
    }

    /// Elapse after `count` ticks
    pub fn ticks(mut self, count: i32) -> Self {
        if count < 0 {
            let name = self.config.name.clone();
            self.reject(ConfigError::NegativeCount { name, value: count });
            return self;
        }
        self.config.count = count;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.config.continuation = Continuation::Repeating;
        self
    }

    /// Run only every `interval` ticks, shifted by `offset`
    pub fn every(mut self, interval: i32, offset: i32) -> Self {
        let name = self.config.name.clone();
        if interval < 1 {
            self.reject(ConfigError::InvalidInterval {
                name,
                value: interval,
            });
            return self;
        }
        if offset < 0 {
            self.reject(ConfigError::NegativeOffset {
                name,
                value: offset,
            });
            return self;
        }
        self.config.slice = Some(TimeSlice { interval, offset });
        self
    }

    pub fn affinity(mut self, affinity: ProcessAffinity) -> Self {
        self.config.affinity = Some(affinity);
        self
    }

    pub fn time_scale(mut self, scale: f64) -> Self {
        self.config.time_scale = scale;
        self
    }

    fn payload(mut self, slot: PayloadSlot, payload: impl Into<Payload>) -> Self {
        self.config.payloads.set(slot, payload.into());
        self
    }

    pub fn on_started(self, payload: impl Into<Payload>) -> Self {
        self.payload(PayloadSlot::Started, payload)
    }

    pub fn on_stopped(self, payload: impl Into<Payload>) -> Self {
        self.payload(PayloadSlot::Stopped, payload)
    }

    pub fn on_paused(self, payload: impl Into<Payload>) -> Self {
        self.payload(PayloadSlot::Paused, payload)
    }

    pub fn on_resumed(self, payload: impl Into<Payload>) -> Self {
        self.payload(PayloadSlot::Resumed, payload)
    }

    pub fn on_tick_frame(self, payload: impl Into<Payload>) -> Self {
        self.payload(PayloadSlot::TickFrame, payload)
    }

    pub fn on_tick_heartbeat(self, payload: impl Into<Payload>) -> Self {
        self.payload(PayloadSlot::TickHeartbeat, payload)
    }

    pub fn on_elapsed(self, payload: impl Into<Payload>) -> Self {
        self.payload(PayloadSlot::Elapsed, payload)
    }

    /// The configuration built so far
    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    /// Register the entity, stopped
    pub fn build(mut self) -> Result<EntityId, OwnerError> {
        self.finish()
    }

    /// Register the entity and start it
    pub fn start(mut self) -> Result<EntityId, OwnerError> {
        self.config.autostart = true;
        self.finish()
    }

    fn finish(&mut self) -> Result<EntityId, OwnerError> {
        if let Some(token) = self.token.take() {
            self.owner.tokens_mut().close(token);
        }
        if let Some(error) = self.error.take() {
            return Err(error.into());
        }
        let config = std::mem::take(&mut self.config);
        self.owner.register(&config)
    }
}

impl<E: PayloadExecutor> Drop for EntityBuilder<'_, E> {
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        if let Some(open) = self.owner.tokens().get(token) {
            tracing::warn!(
                owner = self.owner.name(),
                entity = %open.name,
                location = %open.location,
                "entity builder dropped without build()"
            );
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
