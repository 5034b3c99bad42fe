// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Pulse: activity reconciliation & streak engine for a personal
//! goal/routine tracker.
//!
//! Keeps a local, possibly-offline record of completions consistent with
//! the remote activity authority: optimistic local writes, idempotent
//! push, deterministic remote-wins merge, and a contiguous-day streak
//! derived from the merged result.

pub mod authority;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;

use std::sync::Arc;

use authority::Authority;
use config::Config;
use services::{CascadeCoordinator, Reconciler, SyncAgent};
use store::{ActivityStore, KeyValueStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<ActivityStore>,
    pub reconciler: Reconciler,
    pub sync_agent: SyncAgent,
    pub cleanup: CascadeCoordinator,
}

impl AppState {
    /// Wire the engine over a key-value backend and an authority.
    pub fn new(config: Config, kv: Arc<dyn KeyValueStore>, authority: Arc<dyn Authority>) -> Self {
        let store = Arc::new(ActivityStore::new(kv));
        Self {
            config,
            reconciler: Reconciler::new(store.clone(), authority.clone()),
            sync_agent: SyncAgent::new(store.clone(), authority.clone()),
            cleanup: CascadeCoordinator::new(store.clone(), authority),
            store,
        }
    }
}
