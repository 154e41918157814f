// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payload references and the execution seam
//!
//! A payload is an opaque reference to an action sequence owned by the host.
//! The scheduler never interprets it; it hands it to a [`PayloadExecutor`]
//! together with the owning object's [`OwnerContext`].

use crate::reentrancy::{Lifecycle, LifecycleError, ReentrancyGuard};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Opaque reference to an externally executed action sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(pub String);

impl Payload {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The events an entity can bind a payload to, in firing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadSlot {
    Started,
    Stopped,
    Paused,
    Resumed,
    TickFrame,
    TickHeartbeat,
    Elapsed,
}

impl fmt::Display for PayloadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadSlot::Started => write!(f, "on_started"),
            PayloadSlot::Stopped => write!(f, "on_stopped"),
            PayloadSlot::Paused => write!(f, "on_paused"),
            PayloadSlot::Resumed => write!(f, "on_resumed"),
            PayloadSlot::TickFrame => write!(f, "on_tick_frame"),
            PayloadSlot::TickHeartbeat => write!(f, "on_tick_heartbeat"),
            PayloadSlot::Elapsed => write!(f, "on_elapsed"),
        }
    }
}

/// The seven optional payload bindings of one entity
///
/// An absent slot is a no-op, never an empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_started: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_stopped: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_paused: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_resumed: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_tick_frame: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_tick_heartbeat: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_elapsed: Option<Payload>,
}

impl PayloadSet {
    pub fn get(&self, slot: PayloadSlot) -> Option<&Payload> {
        match slot {
            PayloadSlot::Started => self.on_started.as_ref(),
            PayloadSlot::Stopped => self.on_stopped.as_ref(),
            PayloadSlot::Paused => self.on_paused.as_ref(),
            PayloadSlot::Resumed => self.on_resumed.as_ref(),
            PayloadSlot::TickFrame => self.on_tick_frame.as_ref(),
            PayloadSlot::TickHeartbeat => self.on_tick_heartbeat.as_ref(),
            PayloadSlot::Elapsed => self.on_elapsed.as_ref(),
        }
    }

    pub fn set(&mut self, slot: PayloadSlot, payload: Payload) {
        let target = match slot {
            PayloadSlot::Started => &mut self.on_started,
            PayloadSlot::Stopped => &mut self.on_stopped,
            PayloadSlot::Paused => &mut self.on_paused,
            PayloadSlot::Resumed => &mut self.on_resumed,
            PayloadSlot::TickFrame => &mut self.on_tick_frame,
            PayloadSlot::TickHeartbeat => &mut self.on_tick_heartbeat,
            PayloadSlot::Elapsed => &mut self.on_elapsed,
        };
        *target = Some(payload);
    }

    pub fn with(mut self, slot: PayloadSlot, payload: impl Into<Payload>) -> Self {
        self.set(slot, payload.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Error returned by an executor for one payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// The owning host object, as seen by executing payloads
///
/// Payloads may ask for the owner to be enabled or disabled; the request is
/// applied once the current dispatch finishes. Asking for the complement of
/// the transition currently being dispatched is a reentrancy violation.
#[derive(Debug, Clone, Default)]
pub struct OwnerContext {
    owner: String,
    guard: ReentrancyGuard,
    pending: Option<bool>,
    violation: Option<LifecycleError>,
}

impl OwnerContext {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Self::default()
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    pub fn guard_mut(&mut self) -> &mut ReentrancyGuard {
        &mut self.guard
    }

    /// Ask the host to enable or disable the owner after the current dispatch
    pub fn request_enabled(&mut self, enabled: bool) -> Result<(), LifecycleError> {
        let requested = if enabled {
            Lifecycle::Enabled
        } else {
            Lifecycle::Disabled
        };
        if let Err(e) = self.guard.check(requested) {
            self.violation = Some(e.clone());
            return Err(e);
        }
        self.pending = Some(enabled);
        Ok(())
    }

    /// The enable/disable request waiting for the current dispatch to finish
    pub fn pending(&self) -> Option<bool> {
        self.pending
    }

    pub fn take_pending(&mut self) -> Option<bool> {
        self.pending.take()
    }

    pub fn take_violation(&mut self) -> Option<LifecycleError> {
        self.violation.take()
    }
}

/// Runs payloads on behalf of the scheduler
///
/// Implementations must not block or suspend.
pub trait PayloadExecutor {
    fn execute(&mut self, payload: &Payload, ctx: &mut OwnerContext) -> Result<(), PayloadError>;
}

/// Executor that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpExecutor;

impl PayloadExecutor for NoOpExecutor {
    fn execute(&mut self, _payload: &Payload, _ctx: &mut OwnerContext) -> Result<(), PayloadError> {
        Ok(())
    }
}

/// Executor that records every payload it runs, for tests and tooling
///
/// Payloads can be scripted to fail or to request an enable/disable of the owner.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    executed: Vec<Payload>,
    failing: HashSet<Payload>,
    requests: HashMap<Payload, bool>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `payload` return an error every time it runs
    pub fn fail_on(mut self, payload: impl Into<Payload>) -> Self {
        self.failing.insert(payload.into());
        self
    }

    /// Make `payload` request the owner be enabled (`true`) or disabled (`false`)
    pub fn request_on(mut self, payload: impl Into<Payload>, enabled: bool) -> Self {
        self.requests.insert(payload.into(), enabled);
        self
    }

    pub fn executed(&self) -> &[Payload] {
        &self.executed
    }

    /// Executed payload keys, in order
    pub fn trace(&self) -> Vec<&str> {
        self.executed.iter().map(Payload::as_str).collect()
    }

    /// Number of times `payload` ran
    pub fn count(&self, payload: &str) -> usize {
        self.executed.iter().filter(|p| p.as_str() == payload).count()
    }

    pub fn clear(&mut self) {
        self.executed.clear();
    }
}

impl PayloadExecutor for RecordingExecutor {
    fn execute(&mut self, payload: &Payload, ctx: &mut OwnerContext) -> Result<(), PayloadError> {
        self.executed.push(payload.clone());
        if let Some(enabled) = self.requests.get(payload) {
            ctx.request_enabled(*enabled)?;
        }
        if self.failing.contains(payload) {
            return Err(PayloadError::Failed(format!("{} is scripted to fail", payload)));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
