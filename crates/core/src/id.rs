// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generated names for anonymous time-sliced entities

use crate::entity::{EntityId, ProcessAffinity, TimeSlice};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates registry-unique names for entities the caller did not name
pub trait NameGen: Clone + Send + Sync {
    fn next(&self, slice: TimeSlice, affinity: ProcessAffinity) -> EntityId;
}

/// Counter-based generator; clones share the counter
#[derive(Clone)]
pub struct SequentialNameGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialNameGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialNameGen {
    fn default() -> Self {
        Self::new("every")
    }
}

impl NameGen for SequentialNameGen {
    fn next(&self, slice: TimeSlice, affinity: ProcessAffinity) -> EntityId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        EntityId(format!(
            "{}-{}:{}+{}@{}",
            self.prefix, n, slice.interval, slice.offset, affinity
        ))
    }
}
