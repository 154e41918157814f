// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Tempo host integration: owners, builders and lifecycle

mod builder;
mod error;
mod lifecycle;
mod owner;

pub use builder::{BuildToken, BuildTokens, EntityBuilder, UnfinishedBuilder};
pub use error::OwnerError;
pub use lifecycle::LifecycleBridge;
pub use owner::Owner;
