// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push of unconfirmed local records to the authority.
//!
//! The agent works on a snapshot of placeholder records taken at
//! invocation time, so completions recorded while a pass is running are
//! simply picked up by the next pass. It relies on the authority's
//! idempotent create and does no pre-check of its own: a duplicate push
//! of the same logical fact comes back as the existing canonical record
//! and is treated as success.

use std::sync::Arc;

use crate::authority::{Authority, CreateActivity};
use crate::models::RecordId;
use crate::store::ActivityStore;

/// Result of one sync pass.
///
/// Best-effort operations report counts, never a binary pass/fail, so
/// the caller can judge whether a manual retry is warranted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Placeholders promoted to canonical records.
    pub pushed: u32,
    /// Transient failures; the placeholders stay and are retried on the
    /// next pass.
    pub failed: u32,
    /// Permanent rejections; the placeholders were dropped from the
    /// retry set.
    pub rejected: u32,
}

impl SyncReport {
    /// Returns true if every candidate was pushed.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0 && self.rejected == 0
    }

    /// Returns true if some candidates succeeded and some did not.
    pub fn is_partial_failure(&self) -> bool {
        self.pushed > 0 && (self.failed > 0 || self.rejected > 0)
    }

    /// Total candidates attempted in this pass.
    pub fn attempted(&self) -> u32 {
        self.pushed + self.failed + self.rejected
    }
}

/// Pushes pending local records to the authority.
#[derive(Clone)]
pub struct SyncAgent {
    store: Arc<ActivityStore>,
    authority: Arc<dyn Authority>,
}

impl SyncAgent {
    pub fn new(store: Arc<ActivityStore>, authority: Arc<dyn Authority>) -> Self {
        Self { store, authority }
    }

    /// Push every placeholder record in the current snapshot.
    ///
    /// A failed candidate never aborts the batch; the pass continues to
    /// the next one. Retry is bounded by construction: each candidate is
    /// attempted once per pass, deferred items wait for the next
    /// invocation.
    pub async fn sync_pending(&self) -> SyncReport {
        let candidates = self.store.pending();
        if candidates.is_empty() {
            return SyncReport::default();
        }

        let mut report = SyncReport::default();

        for record in candidates {
            let seq = match record.id {
                RecordId::Placeholder(seq) => seq,
                // The pending snapshot only ever holds placeholders.
                RecordId::Canonical(_) => continue,
            };

            match self.authority.create(CreateActivity::from_record(&record)).await {
                Ok(outcome) => {
                    tracing::debug!(
                        seq,
                        canonical = %outcome.record.id,
                        created = outcome.created,
                        "Placeholder confirmed by authority"
                    );
                    match self
                        .store
                        .resolve_placeholder(seq, outcome.record.into_record())
                    {
                        Ok(()) => report.pushed += 1,
                        Err(e) => {
                            tracing::warn!(seq, error = %e, "Failed promoting pushed record");
                            report.failed += 1;
                        }
                    }
                }
                Err(e) if e.is_rejection() => {
                    tracing::warn!(
                        seq,
                        error = %e,
                        "Authority rejected record permanently, dropping from retry set"
                    );
                    if let Err(store_err) = self.store.discard_placeholder(seq) {
                        tracing::warn!(seq, error = %store_err, "Failed dropping rejected record");
                    }
                    report.rejected += 1;
                }
                Err(e) => {
                    tracing::warn!(seq, error = %e, "Push failed, will retry next pass");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            pushed = report.pushed,
            failed = report.failed,
            rejected = report.rejected,
            "Sync pass finished"
        );
        report
    }
}
