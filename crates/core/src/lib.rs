// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tempo-core: Cooperative tick scheduling for host run loops
//!
//! This crate provides:
//! - Pure state machines for timers, counters and per-tick coroutines
//! - A per-owner scheduler that drives them from frame and heartbeat ticks
//! - Payload executor traits for running the work bound to each transition
//! - TOML schedule files

pub mod config;
pub mod id;
pub mod payload;
pub mod progress;
pub mod reentrancy;

// State machines and runner (order matters for dependencies)
pub mod entity;
pub mod scheduler;
pub mod traced;

// Re-exports
pub use config::{ConfigError, EntityConfig, ScheduleFile};
pub use entity::{
    Advance, Continuation, EntityId, EntityState, ProcessAffinity, RunMode, ScheduledEntity,
    TimeSlice,
};
pub use id::{NameGen, SequentialNameGen};
pub use payload::{
    NoOpExecutor, OwnerContext, Payload, PayloadError, PayloadExecutor, PayloadSet, PayloadSlot,
    RecordingExecutor,
};
pub use progress::{CountProgress, Progress, TimeProgress};
pub use reentrancy::{Lifecycle, LifecycleError, ReentrancyGuard};
pub use scheduler::{
    DispatchReport, PayloadFailure, Scheduler, SchedulerError, SchedulerStats, Tick, TickSource,
};
pub use traced::TracedExecutor;
