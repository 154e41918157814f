//! Shared harness for tempo specs
//!
//! A [`Host`] plays the part of a game object: it owns one scheduler owner,
//! records every payload that runs, and exposes fluent helpers for driving
//! frames and heartbeats.

pub use tempo_core::{EntityId, EntityState, Lifecycle, RecordingExecutor};
pub use tempo_engine::{Owner, OwnerError};

pub const FRAME: f64 = 1.0 / 60.0;
pub const STEP: f64 = 0.02;

pub struct Host {
    pub owner: Owner<RecordingExecutor>,
}

impl Host {
    pub fn new() -> Self {
        Self::with(RecordingExecutor::new())
    }

    pub fn with(exec: RecordingExecutor) -> Self {
        Self {
            owner: Owner::new("host", exec),
        }
    }

    /// Deliver `n` frames of `dt` seconds each
    pub fn frames(&mut self, n: usize, dt: f64) -> &mut Self {
        for _ in 0..n {
            self.owner.frame(dt).unwrap();
        }
        self
    }

    /// Deliver `n` heartbeats of [`STEP`] seconds each
    pub fn heartbeats(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.owner.heartbeat(STEP).unwrap();
        }
        self
    }

    pub fn notify(&mut self, event: Lifecycle) -> &mut Self {
        self.owner.notify(event).unwrap();
        self
    }

    pub fn trace(&self) -> Vec<String> {
        self.owner
            .executor()
            .trace()
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn count(&self, payload: &str) -> usize {
        self.owner.executor().count(payload)
    }

    pub fn state(&self, id: &EntityId) -> EntityState {
        self.owner.state(id).unwrap()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.owner.executor_mut().clear();
        self
    }
}

/// Build an expected trace from string literals
pub fn trace(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
