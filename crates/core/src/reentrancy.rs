// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host lifecycle notifications and the per-owner reentrancy guard
//!
//! While an owner dispatches `Disabled` (or `Enabled`), payloads must not
//! synchronously trigger the complementary transition. The guard records the
//! transition being dispatched and rejects the complement.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Notifications delivered by the host object model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Created,
    Enabled,
    Disabled,
    Destroyed,
}

impl Lifecycle {
    /// The transition that undoes this one, if any
    pub fn complement(self) -> Option<Lifecycle> {
        match self {
            Lifecycle::Enabled => Some(Lifecycle::Disabled),
            Lifecycle::Disabled => Some(Lifecycle::Enabled),
            Lifecycle::Created | Lifecycle::Destroyed => None,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Created => write!(f, "created"),
            Lifecycle::Enabled => write!(f, "enabled"),
            Lifecycle::Disabled => write!(f, "disabled"),
            Lifecycle::Destroyed => write!(f, "destroyed"),
        }
    }
}

/// Errors raised by the reentrancy guard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{requested} requested while dispatching {dispatching}")]
    Reentrancy {
        dispatching: Lifecycle,
        requested: Lifecycle,
    },
}

/// Tracks which lifecycle transition an owner is currently dispatching
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    dispatching: Option<Lifecycle>,
    depth: u32,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outermost transition being dispatched
    pub fn dispatching(&self) -> Option<Lifecycle> {
        self.dispatching
    }

    pub fn is_dispatching(&self) -> bool {
        self.depth > 0
    }

    /// Check whether `requested` may run now without entering the guard
    pub fn check(&self, requested: Lifecycle) -> Result<(), LifecycleError> {
        match self.dispatching {
            Some(dispatching) if dispatching.complement() == Some(requested) => {
                Err(LifecycleError::Reentrancy {
                    dispatching,
                    requested,
                })
            }
            _ => Ok(()),
        }
    }

    /// Begin dispatching `transition`. Every successful `enter` must be paired with `exit`.
    pub fn enter(&mut self, transition: Lifecycle) -> Result<(), LifecycleError> {
        self.check(transition)?;
        if self.dispatching.is_none() {
            self.dispatching = Some(transition);
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.dispatching = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_guard_allows_everything() {
        let guard = ReentrancyGuard::new();
        assert!(guard.check(Lifecycle::Enabled).is_ok());
        assert!(guard.check(Lifecycle::Disabled).is_ok());
        assert!(!guard.is_dispatching());
    }

    #[test]
    fn complement_is_rejected_while_dispatching() {
        let mut guard = ReentrancyGuard::new();
        guard.enter(Lifecycle::Disabled).unwrap();

        let err = guard.enter(Lifecycle::Enabled).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Reentrancy {
                dispatching: Lifecycle::Disabled,
                requested: Lifecycle::Enabled,
            }
        );
        // The failed enter must not leave extra depth behind
        guard.exit();
        assert!(!guard.is_dispatching());
    }

    #[test]
    fn same_transition_nests() {
        let mut guard = ReentrancyGuard::new();
        guard.enter(Lifecycle::Enabled).unwrap();
        guard.enter(Lifecycle::Enabled).unwrap();

        guard.exit();
        assert_eq!(guard.dispatching(), Some(Lifecycle::Enabled));
        guard.exit();
        assert_eq!(guard.dispatching(), None);
    }

    #[test]
    fn destroy_is_allowed_during_disable() {
        let mut guard = ReentrancyGuard::new();
        guard.enter(Lifecycle::Disabled).unwrap();
        assert!(guard.check(Lifecycle::Destroyed).is_ok());
    }

    #[test]
    fn lifecycle_display() {
        assert_eq!(Lifecycle::Disabled.to_string(), "disabled");
        assert_eq!(Lifecycle::Created.complement(), None);
    }
}
