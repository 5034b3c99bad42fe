// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - reconciliation, sync, streak, cleanup.

pub mod cleanup;
pub mod reconcile;
pub mod streak;
pub mod sync;

pub use cleanup::{CascadeCoordinator, CascadeReport, ClearReport, DeferredCleanup, RemoteCleanup};
pub use reconcile::{merge, MergedView, Reconciler, Summary};
pub use streak::compute_streak;
pub use sync::{SyncAgent, SyncReport};
