// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for scheduler owners

use tempo_core::{ConfigError, LifecycleError, SchedulerError};
use thiserror::Error;

/// Errors that can occur while driving an owner
#[derive(Debug, Error)]
pub enum OwnerError {
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("invalid entity config: {0}")]
    Config(#[from] ConfigError),
    #[error("owner {0} has been destroyed")]
    Destroyed(String),
}
