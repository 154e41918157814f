// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced executor wrapper for consistent observability

use crate::payload::{OwnerContext, Payload, PayloadError, PayloadExecutor};

/// Wrapper that adds tracing to any PayloadExecutor
#[derive(Debug, Clone, Default)]
pub struct TracedExecutor<E> {
    inner: E,
}

impl<E> TracedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: PayloadExecutor> PayloadExecutor for TracedExecutor<E> {
    fn execute(&mut self, payload: &Payload, ctx: &mut OwnerContext) -> Result<(), PayloadError> {
        let span = tracing::debug_span!("payload.execute", owner = ctx.owner(), %payload);
        let _guard = span.enter();

        let result = self.inner.execute(payload, ctx);
        match &result {
            Ok(()) => tracing::debug!("executed"),
            Err(e) => tracing::debug!(error = %e, "payload failed"),
        }
        if let Some(enabled) = ctx.pending() {
            tracing::trace!(enabled, "owner lifecycle requested");
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
