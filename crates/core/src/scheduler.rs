// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler - per-owner registry and runner for scheduled entities
//!
//! Entities are kept in registration order and partitioned into lanes by
//! process affinity. Each tick visits the lane for its source merged with the
//! `always` lane, still in registration order.
//!
//! Payload failures are caught per entity, logged, and collected in the
//! returned [`DispatchReport`]; they never stop other entities from advancing.

use crate::config::{ConfigError, EntityConfig};
use crate::entity::{Advance, EntityId, EntityState, ProcessAffinity, ScheduledEntity};
use crate::payload::{OwnerContext, PayloadError, PayloadExecutor, PayloadSlot};
use std::collections::HashMap;
use thiserror::Error;

/// Errors returned by scheduler operations
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("entity already registered: {0}")]
    DuplicateName(EntityId),
    #[error("entity not found: {0}")]
    UnknownEntity(EntityId),
    #[error("invalid entity config: {0}")]
    Config(#[from] ConfigError),
}

/// Which host run-loop callback delivered a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    Frame,
    Heartbeat,
}

impl TickSource {
    fn tick_slot(self) -> PayloadSlot {
        match self {
            TickSource::Frame => PayloadSlot::TickFrame,
            TickSource::Heartbeat => PayloadSlot::TickHeartbeat,
        }
    }
}

/// One delivered tick: the 1-based running count of its source and the time it covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub count: u64,
    pub delta: f64,
}

impl Tick {
    pub fn new(count: u64, delta: f64) -> Self {
        Self { count, delta }
    }
}

/// A payload that returned an error
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadFailure {
    pub entity: EntityId,
    pub slot: PayloadSlot,
    pub error: PayloadError,
}

/// What happened during one tick or bulk transition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Payloads handed to the executor
    pub executed: usize,
    /// Entities that reached their target
    pub elapsed: usize,
    /// Entities whose state changed in a bulk transition
    pub transitioned: usize,
    pub failures: Vec<PayloadFailure>,
}

impl DispatchReport {
    pub fn absorb(&mut self, other: DispatchReport) {
        self.executed += other.executed;
        self.elapsed += other.elapsed;
        self.transitioned += other.transitioned;
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Counts of registered entities, for debugging overlays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub total: usize,
    pub running: usize,
    pub paused: usize,
    pub stopped: usize,
    pub frame: usize,
    pub heartbeat: usize,
    pub always: usize,
}

/// Registry of one owner's scheduled entities
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entities: Vec<ScheduledEntity>,
    index: HashMap<EntityId, usize>,
    frame_lane: Vec<usize>,
    heartbeat_lane: Vec<usize>,
    always_lane: Vec<usize>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Registry ====================

    /// Build an entity from `config` and register it under its name
    pub fn register(&mut self, config: &EntityConfig) -> Result<EntityId, SchedulerError> {
        let entity = ScheduledEntity::from_config(config)?;
        let id = entity.id().clone();
        if self.index.contains_key(&id) {
            return Err(SchedulerError::DuplicateName(id));
        }

        let pos = self.entities.len();
        self.lane_mut(entity.affinity()).push(pos);
        self.index.insert(id.clone(), pos);
        tracing::debug!(
            entity = %id,
            mode = %entity.run_mode(),
            affinity = %entity.affinity(),
            "registered"
        );
        self.entities.push(entity);
        Ok(id)
    }

    /// Stop (firing `on_stopped` if it was active) and unregister one entity
    pub fn remove<E: PayloadExecutor>(
        &mut self,
        id: &EntityId,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> Result<ScheduledEntity, SchedulerError> {
        let pos = self.position(id)?;
        let mut entity = self.entities.remove(pos);
        self.reindex();

        if entity.stop() {
            fire(&entity, PayloadSlot::Stopped, exec, ctx, &mut DispatchReport::default());
        }
        tracing::debug!(entity = %id, "removed");
        Ok(entity)
    }

    pub fn get(&self, id: &EntityId) -> Option<&ScheduledEntity> {
        self.index.get(id).and_then(|&pos| self.entities.get(pos))
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over entities in registration order
    pub fn entities(&self) -> impl Iterator<Item = &ScheduledEntity> {
        self.entities.iter()
    }

    pub fn stats(&self) -> SchedulerStats {
        let count = |state: EntityState| self.entities.iter().filter(|e| e.state() == state).count();
        SchedulerStats {
            total: self.entities.len(),
            running: count(EntityState::Running),
            paused: count(EntityState::Paused),
            stopped: count(EntityState::Stopped),
            frame: self.frame_lane.len(),
            heartbeat: self.heartbeat_lane.len(),
            always: self.always_lane.len(),
        }
    }

    // ==================== Control ====================

    /// Start or restart an entity; fires `on_started` only from `Stopped`
    pub fn start<E: PayloadExecutor>(
        &mut self,
        id: &EntityId,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> Result<bool, SchedulerError> {
        self.control(id, ScheduledEntity::start, PayloadSlot::Started, exec, ctx)
    }

    pub fn stop<E: PayloadExecutor>(
        &mut self,
        id: &EntityId,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> Result<bool, SchedulerError> {
        self.control(id, ScheduledEntity::stop, PayloadSlot::Stopped, exec, ctx)
    }

    pub fn pause<E: PayloadExecutor>(
        &mut self,
        id: &EntityId,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> Result<bool, SchedulerError> {
        self.control(id, ScheduledEntity::pause, PayloadSlot::Paused, exec, ctx)
    }

    pub fn resume<E: PayloadExecutor>(
        &mut self,
        id: &EntityId,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> Result<bool, SchedulerError> {
        self.control(id, ScheduledEntity::resume, PayloadSlot::Resumed, exec, ctx)
    }

    /// Set an entity's time scale; `Ok(false)` if it has no duration
    pub fn set_time_scale(&mut self, id: &EntityId, scale: f64) -> Result<bool, SchedulerError> {
        let pos = self.position(id)?;
        Ok(self
            .entities
            .get_mut(pos)
            .is_some_and(|entity| entity.set_time_scale(scale)))
    }

    /// Pause every running entity on behalf of a disabled owner
    pub fn pause_all_by_disable<E: PayloadExecutor>(
        &mut self,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> DispatchReport {
        self.each(ScheduledEntity::pause_by_disable, PayloadSlot::Paused, exec, ctx)
    }

    /// Resume every entity paused by a disable; explicit pauses stay
    pub fn resume_all_by_enable<E: PayloadExecutor>(
        &mut self,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> DispatchReport {
        self.each(ScheduledEntity::resume_by_enable, PayloadSlot::Resumed, exec, ctx)
    }

    /// Stop every entity and clear the registry
    pub fn shutdown<E: PayloadExecutor>(
        &mut self,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> DispatchReport {
        let report = self.each(ScheduledEntity::stop, PayloadSlot::Stopped, exec, ctx);
        tracing::info!(
            owner = ctx.owner(),
            entities = self.entities.len(),
            stopped = report.transitioned,
            "scheduler shut down"
        );
        self.entities.clear();
        self.reindex();
        report
    }

    // ==================== Ticks ====================

    /// Drive frame-update and always entities for one rendered frame
    pub fn on_frame_update<E: PayloadExecutor>(
        &mut self,
        tick: Tick,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> DispatchReport {
        self.run(TickSource::Frame, tick, exec, ctx)
    }

    /// Drive heartbeat and always entities for one fixed simulation step
    pub fn on_heartbeat<E: PayloadExecutor>(
        &mut self,
        tick: Tick,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> DispatchReport {
        self.run(TickSource::Heartbeat, tick, exec, ctx)
    }

    fn run<E: PayloadExecutor>(
        &mut self,
        source: TickSource,
        tick: Tick,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let lane = match source {
            TickSource::Frame => &self.frame_lane,
            TickSource::Heartbeat => &self.heartbeat_lane,
        };
        for pos in Merged::new(lane, &self.always_lane) {
            if let Some(entity) = self.entities.get_mut(pos) {
                drive(entity, source, tick, exec, ctx, &mut report);
            }
        }
        report
    }

    // ==================== Internals ====================

    fn position(&self, id: &EntityId) -> Result<usize, SchedulerError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| SchedulerError::UnknownEntity(id.clone()))
    }

    fn lane_mut(&mut self, affinity: ProcessAffinity) -> &mut Vec<usize> {
        match affinity {
            ProcessAffinity::FrameUpdate => &mut self.frame_lane,
            ProcessAffinity::Heartbeat => &mut self.heartbeat_lane,
            ProcessAffinity::Always => &mut self.always_lane,
        }
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.frame_lane.clear();
        self.heartbeat_lane.clear();
        self.always_lane.clear();
        for pos in 0..self.entities.len() {
            let Some(entity) = self.entities.get(pos) else {
                continue;
            };
            let (id, affinity) = (entity.id().clone(), entity.affinity());
            self.index.insert(id, pos);
            self.lane_mut(affinity).push(pos);
        }
    }

    fn control<E: PayloadExecutor>(
        &mut self,
        id: &EntityId,
        op: fn(&mut ScheduledEntity) -> bool,
        slot: PayloadSlot,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> Result<bool, SchedulerError> {
        let pos = self.position(id)?;
        let Some(entity) = self.entities.get_mut(pos) else {
            return Err(SchedulerError::UnknownEntity(id.clone()));
        };
        let fired = op(entity);
        if fired {
            tracing::debug!(entity = %id, state = %entity.state(), "transition");
            fire(entity, slot, exec, ctx, &mut DispatchReport::default());
        }
        Ok(fired)
    }

    fn each<E: PayloadExecutor>(
        &mut self,
        op: fn(&mut ScheduledEntity) -> bool,
        slot: PayloadSlot,
        exec: &mut E,
        ctx: &mut OwnerContext,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        for entity in &mut self.entities {
            if op(entity) {
                report.transitioned += 1;
                fire(entity, slot, exec, ctx, &mut report);
            }
        }
        report
    }
}

/// Advance one entity for one tick of `source`
fn drive<E: PayloadExecutor>(
    entity: &mut ScheduledEntity,
    source: TickSource,
    tick: Tick,
    exec: &mut E,
    ctx: &mut OwnerContext,
    report: &mut DispatchReport,
) {
    if !entity.is_running() {
        return;
    }
    // Always entities keep a single time base: frames advance, heartbeats only tick
    let advances = source == TickSource::Frame || entity.affinity() != ProcessAffinity::Always;

    if let Some(slice) = entity.time_slice() {
        if !slice.is_due(tick.count) {
            if advances {
                entity.defer(tick.delta);
            }
            return;
        }
    }

    fire(entity, source.tick_slot(), exec, ctx, report);

    if advances && entity.advance(tick.delta) == Advance::Elapsed {
        report.elapsed += 1;
        tracing::debug!(
            entity = %entity.id(),
            count = entity.elapsed_count(),
            state = %entity.state(),
            "elapsed"
        );
        fire(entity, PayloadSlot::Elapsed, exec, ctx, report);
    }
}

/// Execute the payload bound to `slot`, if any, recording failures
fn fire<E: PayloadExecutor>(
    entity: &ScheduledEntity,
    slot: PayloadSlot,
    exec: &mut E,
    ctx: &mut OwnerContext,
    report: &mut DispatchReport,
) {
    let Some(payload) = entity.payloads().get(slot) else {
        return;
    };
    report.executed += 1;
    if let Err(error) = exec.execute(payload, ctx) {
        tracing::warn!(entity = %entity.id(), %slot, %payload, %error, "payload failed");
        report.failures.push(PayloadFailure {
            entity: entity.id().clone(),
            slot,
            error,
        });
    }
}

/// Ascending merge of two ascending position lanes
struct Merged<'a> {
    a: &'a [usize],
    b: &'a [usize],
}

impl<'a> Merged<'a> {
    fn new(a: &'a [usize], b: &'a [usize]) -> Self {
        Self { a, b }
    }
}

fn pop_front(lane: &mut &[usize]) -> Option<usize> {
    let (&first, rest) = lane.split_first()?;
    *lane = rest;
    Some(first)
}

impl Iterator for Merged<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match (self.a.first(), self.b.first()) {
            (Some(x), Some(y)) if x <= y => pop_front(&mut self.a),
            (_, Some(_)) => pop_front(&mut self.b),
            _ => pop_front(&mut self.a),
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
