// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cascade removal of activity records when an owner entity is deleted,
//! and bulk history clearing.
//!
//! The user-visible action ("delete this goal") must not hang or fail
//! because the authority is unreachable: local removal is the blocking
//! step, remote removal is best-effort and eventually consistent.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use futures_util::{stream, StreamExt};

use crate::authority::Authority;
use crate::error::Result;
use crate::models::ActivityKind;
use crate::store::ActivityStore;

const MAX_CONCURRENT_DELETES: usize = 8;

/// Result of a cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Records removed from the local store (step 1, guaranteed).
    pub removed_local: usize,
    /// Records removed from the authority (step 2, best-effort).
    pub removed_remote: u32,
    /// Remote deletes that failed; they are not retried here.
    pub remote_failures: u32,
}

/// Result of the remote half of a cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteCleanup {
    pub removed: u32,
    pub failed: u32,
}

/// Result of a bulk clear-history operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Remote records deleted.
    pub deleted: u32,
    /// Remote deletes that failed.
    pub failed: u32,
}

/// Completion signal for a deferred remote cleanup.
///
/// The spawned task runs to completion whether or not anyone is still
/// observing it; `join` is optional.
pub struct DeferredCleanup {
    handle: tokio::task::JoinHandle<RemoteCleanup>,
}

impl DeferredCleanup {
    /// Wait for the remote cleanup to finish and return its counts.
    pub async fn join(self) -> RemoteCleanup {
        match self.handle.await {
            Ok(cleanup) => cleanup,
            Err(e) => {
                tracing::warn!(error = %e, "Deferred cleanup task aborted");
                RemoteCleanup::default()
            }
        }
    }

    /// Let the cleanup finish on its own.
    pub fn detach(self) {}
}

/// Removes an owner's activity records from both stores.
#[derive(Clone)]
pub struct CascadeCoordinator {
    store: Arc<ActivityStore>,
    authority: Arc<dyn Authority>,
}

impl CascadeCoordinator {
    pub fn new(store: Arc<ActivityStore>, authority: Arc<dyn Authority>) -> Self {
        Self { store, authority }
    }

    /// Remove all records tied to the deleted owner.
    ///
    /// Step 1 (local) must succeed; its error fails the owner deletion.
    /// Step 2 (remote) is best-effort: each delete failure is counted
    /// and logged but never rolls back step 1.
    pub async fn cascade_delete(
        &self,
        kind: ActivityKind,
        owner_ref: &str,
    ) -> Result<CascadeReport> {
        let removed_local = self.store.remove_owned(kind, owner_ref)?;
        let remote = self.remote_cleanup_owned(kind, owner_ref.to_string()).await;

        tracing::info!(
            kind = %kind,
            owner_ref,
            removed_local,
            removed_remote = remote.removed,
            remote_failures = remote.failed,
            "Cascade delete finished"
        );

        Ok(CascadeReport {
            removed_local,
            removed_remote: remote.removed,
            remote_failures: remote.failed,
        })
    }

    /// Like [`cascade_delete`](Self::cascade_delete), but the remote half
    /// runs as a deferred task so the caller returns as soon as the local
    /// removal (the user-visible part) is done. The returned handle can
    /// be joined for the remote counts or detached.
    pub fn cascade_delete_deferred(
        &self,
        kind: ActivityKind,
        owner_ref: &str,
    ) -> Result<(usize, DeferredCleanup)> {
        let removed_local = self.store.remove_owned(kind, owner_ref)?;

        let coordinator = self.clone();
        let owner = owner_ref.to_string();
        let handle = tokio::spawn(async move { coordinator.remote_cleanup_owned(kind, owner).await });

        Ok((removed_local, DeferredCleanup { handle }))
    }

    /// Clear all history: local unconditionally, remote best-effort.
    pub async fn clear_history(&self) -> Result<ClearReport> {
        self.store.clear()?;

        let records = match self.authority.list().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch remote records for cleanup");
                return Ok(ClearReport::default());
            }
        };

        let ids = records.into_iter().map(|r| r.id).collect();
        let cleanup = self.delete_batch(ids).await;

        tracing::info!(
            deleted = cleanup.removed,
            failed = cleanup.failed,
            "History cleared"
        );
        Ok(ClearReport {
            deleted: cleanup.removed,
            failed: cleanup.failed,
        })
    }

    /// Delete every remote record matching `(kind, owner_ref)`.
    async fn remote_cleanup_owned(&self, kind: ActivityKind, owner_ref: String) -> RemoteCleanup {
        let records = match self.authority.list().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch remote records for cascade");
                return RemoteCleanup::default();
            }
        };

        let ids = records
            .into_iter()
            .filter(|r| r.kind == kind && r.ref_id.as_deref() == Some(owner_ref.as_str()))
            .map(|r| r.id)
            .collect();

        self.delete_batch(ids).await
    }

    /// Issue one delete per id with bounded concurrency, accumulating
    /// removed/failed counts. A failed item never aborts the batch.
    async fn delete_batch(&self, ids: Vec<String>) -> RemoteCleanup {
        let removed = AtomicU32::new(0);
        let failed = AtomicU32::new(0);

        stream::iter(ids)
            .for_each_concurrent(MAX_CONCURRENT_DELETES, |id| {
                let removed = &removed;
                let failed = &failed;
                async move {
                    match self.authority.remove(&id).await {
                        Ok(()) => {
                            removed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            tracing::warn!(id = %id, error = %e, "Failed to delete remote record");
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
            .await;

        RemoteCleanup {
            removed: removed.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
        }
    }
}
