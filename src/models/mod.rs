// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the engine.

pub mod activity;
pub mod caller;

pub use activity::{ActivityKind, ActivityRecord, IdentityKey, RecordId};
pub use caller::CallerIdentity;
