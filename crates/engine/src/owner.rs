// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner - one host object's scheduler, executor and lifecycle
//!
//! The host calls [`Owner::frame`] once per rendered frame,
//! [`Owner::heartbeat`] once per fixed simulation step and [`Owner::notify`]
//! for object lifecycle changes. Ticks are not dispatched while the owner
//! is disabled or destroyed; a disabled owner still counts them.
//!
//! Enable/disable requests made by payloads are applied once the call that
//! ran them returns.

use crate::builder::{BuildTokens, EntityBuilder, UnfinishedBuilder};
use crate::error::OwnerError;
use crate::lifecycle::LifecycleBridge;
use tempo_core::{
    DispatchReport, EntityConfig, EntityId, EntityState, Lifecycle, NameGen, OwnerContext,
    PayloadExecutor, ProcessAffinity, ScheduleFile, ScheduledEntity, Scheduler, SchedulerError,
    SchedulerStats, SequentialNameGen, Tick, TickSource, TimeSlice,
};

/// Scheduling state for one host object
pub struct Owner<E> {
    name: String,
    scheduler: Scheduler,
    executor: E,
    context: OwnerContext,
    lifecycle: LifecycleBridge,
    tokens: BuildTokens,
    names: SequentialNameGen,
    frames: u64,
    heartbeats: u64,
}

impl<E: PayloadExecutor> Owner<E> {
    pub fn new(name: impl Into<String>, executor: E) -> Self {
        let name = name.into();
        Self {
            context: OwnerContext::new(name.clone()),
            name,
            scheduler: Scheduler::new(),
            executor,
            lifecycle: LifecycleBridge::new(),
            tokens: BuildTokens::new(),
            names: SequentialNameGen::default(),
            frames: 0,
            heartbeats: 0,
        }
    }

    /// Use `names` for anonymous time-sliced entities
    pub fn with_names(mut self, names: SequentialNameGen) -> Self {
        self.names = names;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn is_enabled(&self) -> bool {
        self.lifecycle.is_enabled()
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// Frames delivered since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Heartbeats delivered since creation
    pub fn heartbeat_count(&self) -> u64 {
        self.heartbeats
    }

    pub fn get(&self, id: &EntityId) -> Option<&ScheduledEntity> {
        self.scheduler.get(id)
    }

    pub fn state(&self, id: &EntityId) -> Option<EntityState> {
        self.scheduler.get(id).map(ScheduledEntity::state)
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub(crate) fn tokens(&self) -> &BuildTokens {
        &self.tokens
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut BuildTokens {
        &mut self.tokens
    }

    fn ensure_alive(&self) -> Result<(), OwnerError> {
        if self.lifecycle.is_destroyed() {
            return Err(OwnerError::Destroyed(self.name.clone()));
        }
        Ok(())
    }

    // ==================== Ticks ====================

    /// Deliver one rendered frame covering `dt` seconds
    pub fn frame(&mut self, dt: f64) -> Result<DispatchReport, OwnerError> {
        self.tick(TickSource::Frame, dt)
    }

    /// Deliver one fixed simulation step of `step` seconds
    pub fn heartbeat(&mut self, step: f64) -> Result<DispatchReport, OwnerError> {
        self.tick(TickSource::Heartbeat, step)
    }

    fn tick(&mut self, source: TickSource, delta: f64) -> Result<DispatchReport, OwnerError> {
        if self.lifecycle.is_destroyed() {
            return Ok(DispatchReport::default());
        }
        // Counters keep the host's tick phase across disabled stretches
        let count = match source {
            TickSource::Frame => {
                self.frames += 1;
                self.frames
            }
            TickSource::Heartbeat => {
                self.heartbeats += 1;
                self.heartbeats
            }
        };
        if !self.lifecycle.is_enabled() {
            return Ok(DispatchReport::default());
        }
        let tick = Tick::new(count, delta);
        let mut report = match source {
            TickSource::Frame => {
                self.scheduler
                    .on_frame_update(tick, &mut self.executor, &mut self.context)
            }
            TickSource::Heartbeat => {
                self.scheduler
                    .on_heartbeat(tick, &mut self.executor, &mut self.context)
            }
        };
        self.apply_pending(&mut report)?;
        Ok(report)
    }

    // ==================== Lifecycle ====================

    /// Forward a host lifecycle notification
    pub fn notify(&mut self, event: Lifecycle) -> Result<DispatchReport, OwnerError> {
        self.ensure_alive()?;
        if event == Lifecycle::Destroyed && !self.tokens.is_empty() {
            for open in self.tokens.drain() {
                tracing::warn!(owner = %self.name, builder = %open, "owner destroyed with open builder");
            }
        }
        let mut report = self.dispatch(event)?;
        self.apply_pending(&mut report)?;
        Ok(report)
    }

    fn dispatch(&mut self, event: Lifecycle) -> Result<DispatchReport, OwnerError> {
        let result = self.lifecycle.dispatch(
            event,
            &mut self.scheduler,
            &mut self.executor,
            &mut self.context,
        );
        if result.is_err() {
            self.context.take_pending();
        }
        result.map_err(OwnerError::from)
    }

    /// Apply enable/disable requests made by payloads during the last call
    ///
    /// A request can only repeat the transition being applied, which is then
    /// a no-op, so this settles after at most two rounds.
    fn apply_pending(&mut self, report: &mut DispatchReport) -> Result<(), OwnerError> {
        while let Some(enabled) = self.context.take_pending() {
            if self.lifecycle.is_destroyed() || enabled == self.lifecycle.is_enabled() {
                continue;
            }
            let event = if enabled {
                Lifecycle::Enabled
            } else {
                Lifecycle::Disabled
            };
            tracing::debug!(owner = %self.name, %event, "applying requested lifecycle");
            report.absorb(self.dispatch(event)?);
        }
        Ok(())
    }

    // ==================== Entities ====================

    /// Start building a named entity
    #[track_caller]
    pub fn entity(&mut self, name: impl Into<String>) -> EntityBuilder<'_, E> {
        let name = name.into();
        let token = self.tokens.open(name.clone());
        EntityBuilder::new(self, EntityConfig::new(name), token)
    }

    /// Start building an anonymous entity that runs every `interval` frames
    #[track_caller]
    pub fn every_frames(&mut self, interval: i32, offset: i32) -> EntityBuilder<'_, E> {
        self.every(interval, offset, ProcessAffinity::FrameUpdate)
    }

    /// Start building an anonymous entity that runs every `interval` heartbeats
    #[track_caller]
    pub fn every_heartbeats(&mut self, interval: i32, offset: i32) -> EntityBuilder<'_, E> {
        self.every(interval, offset, ProcessAffinity::Heartbeat)
    }

    #[track_caller]
    fn every(
        &mut self,
        interval: i32,
        offset: i32,
        affinity: ProcessAffinity,
    ) -> EntityBuilder<'_, E> {
        let name = self.names.next(TimeSlice::new(interval, offset), affinity);
        let token = self.tokens.open(name.as_str());
        EntityBuilder::new(self, EntityConfig::new(name.0), token)
            .affinity(affinity)
            .every(interval, offset)
    }

    /// Register an entity, starting it when the config asks for it
    pub fn register(&mut self, config: &EntityConfig) -> Result<EntityId, OwnerError> {
        self.ensure_alive()?;
        let id = self.scheduler.register(config)?;
        if config.autostart {
            self.start(&id)?;
        }
        Ok(id)
    }

    /// Register every entity declared in a TOML schedule, in file order
    ///
    /// Registration stops at the first error; entities registered before it stay.
    pub fn load_schedule(&mut self, content: &str) -> Result<Vec<EntityId>, OwnerError> {
        self.ensure_alive()?;
        let configs = ScheduleFile::parse(content)?;
        configs.iter().map(|config| self.register(config)).collect()
    }

    /// Stop and unregister an entity
    pub fn remove(&mut self, id: &EntityId) -> Result<ScheduledEntity, OwnerError> {
        self.ensure_alive()?;
        let entity = self
            .scheduler
            .remove(id, &mut self.executor, &mut self.context)?;
        self.apply_pending(&mut DispatchReport::default())?;
        Ok(entity)
    }

    pub fn start(&mut self, id: &EntityId) -> Result<bool, OwnerError> {
        self.control(id, Scheduler::start)
    }

    pub fn stop(&mut self, id: &EntityId) -> Result<bool, OwnerError> {
        self.control(id, Scheduler::stop)
    }

    pub fn pause(&mut self, id: &EntityId) -> Result<bool, OwnerError> {
        self.control(id, Scheduler::pause)
    }

    pub fn resume(&mut self, id: &EntityId) -> Result<bool, OwnerError> {
        self.control(id, Scheduler::resume)
    }

    pub fn set_time_scale(&mut self, id: &EntityId, scale: f64) -> Result<bool, OwnerError> {
        self.ensure_alive()?;
        Ok(self.scheduler.set_time_scale(id, scale)?)
    }

    fn control(
        &mut self,
        id: &EntityId,
        op: fn(
            &mut Scheduler,
            &EntityId,
            &mut E,
            &mut OwnerContext,
        ) -> Result<bool, SchedulerError>,
    ) -> Result<bool, OwnerError> {
        self.ensure_alive()?;
        let fired = op(
            &mut self.scheduler,
            id,
            &mut self.executor,
            &mut self.context,
        )?;
        self.apply_pending(&mut DispatchReport::default())?;
        Ok(fired)
    }

    // ==================== Build phase ====================

    /// End the build phase, reporting builders that were never finalized
    pub fn finish_build(&mut self) -> Vec<UnfinishedBuilder> {
        let open = self.tokens.drain();
        for builder in &open {
            tracing::warn!(owner = %self.name, %builder, "unfinished entity builder");
        }
        open
    }
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
