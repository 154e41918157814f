// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle bridge - maps host notifications onto the scheduler
//!
//! | Notification | Effect                                            |
//! |--------------|---------------------------------------------------|
//! | `Created`    | none                                              |
//! | `Disabled`   | pause every running entity (auto-resumable)       |
//! | `Enabled`    | resume only entities paused by a disable          |
//! | `Destroyed`  | stop every entity and clear the registry          |
//!
//! `Enabled` and `Disabled` are dispatched inside the owner's reentrancy
//! guard. A payload that asks for the complementary transition while the
//! guard is held turns the whole notification into an error.

use tempo_core::{
    DispatchReport, Lifecycle, LifecycleError, OwnerContext, PayloadExecutor, Scheduler,
};

/// Enabled/destroyed bookkeeping for one owner
#[derive(Debug, Clone)]
pub struct LifecycleBridge {
    enabled: bool,
    destroyed: bool,
}

impl Default for LifecycleBridge {
    fn default() -> Self {
        Self {
            enabled: true,
            destroyed: false,
        }
    }
}

impl LifecycleBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.destroyed
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Apply one notification to `scheduler`
    pub fn dispatch<E: PayloadExecutor>(
        &mut self,
        event: Lifecycle,
        scheduler: &mut Scheduler,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> Result<DispatchReport, LifecycleError> {
        if self.destroyed {
            return Ok(DispatchReport::default());
        }
        tracing::info!(owner = ctx.owner(), %event, "lifecycle");

        match event {
            Lifecycle::Created => Ok(DispatchReport::default()),
            Lifecycle::Enabled | Lifecycle::Disabled => {
                self.guarded(event, scheduler, exec, ctx)
            }
            Lifecycle::Destroyed => {
                self.destroyed = true;
                self.enabled = false;
                Ok(scheduler.shutdown(exec, ctx))
            }
        }
    }

    fn guarded<E: PayloadExecutor>(
        &mut self,
        event: Lifecycle,
        scheduler: &mut Scheduler,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> Result<DispatchReport, LifecycleError> {
        if let Err(e) = ctx.guard_mut().enter(event) {
            tracing::error!(owner = ctx.owner(), error = %e, "reentrant lifecycle dispatch");
            return Err(e);
        }

        let report = if event == Lifecycle::Disabled {
            self.enabled = false;
            scheduler.pause_all_by_disable(exec, ctx)
        } else {
            self.enabled = true;
            scheduler.resume_all_by_enable(exec, ctx)
        };
        ctx.guard_mut().exit();

        if let Some(violation) = ctx.take_violation() {
            tracing::error!(owner = ctx.owner(), error = %violation, "reentrant lifecycle request");
            return Err(violation);
        }
        tracing::debug!(
            owner = ctx.owner(),
            %event,
            transitioned = report.transitioned,
            "lifecycle dispatched"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
