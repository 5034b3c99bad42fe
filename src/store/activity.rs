// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity record collection over a key-value backend.
//!
//! All records live as one ordered JSON array under a single namespaced
//! key. Completions are optimistic: the record is inserted the instant
//! the action occurs, carrying a placeholder identity until the sync
//! agent confirms it with the authority. Mutations are append/remove at
//! record granularity; identity fields are never edited in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{ActivityKind, ActivityRecord, RecordId};
use crate::store::{keys, KeyValueStore};

/// Local activity record store.
pub struct ActivityStore {
    kv: Arc<dyn KeyValueStore>,
    /// Next placeholder sequence number.
    seq: AtomicU64,
    /// Serializes load-modify-save cycles on the record collection.
    write_lock: Mutex<()>,
}

impl ActivityStore {
    /// Open the store over a key-value backend.
    ///
    /// The placeholder sequence resumes past the highest persisted value
    /// so a reload can never mint a colliding placeholder identity.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let store = Self {
            kv,
            seq: AtomicU64::new(1),
            write_lock: Mutex::new(()),
        };

        let max_seq = store
            .load()
            .iter()
            .filter_map(|r| match r.id {
                RecordId::Placeholder(seq) => Some(seq),
                RecordId::Canonical(_) => None,
            })
            .max()
            .unwrap_or(0);
        store.seq.store(max_seq + 1, Ordering::SeqCst);

        store
    }

    /// Load all records. Unreadable or corrupt data degrades to an empty
    /// collection; the read path never fails on a bad local payload.
    pub fn load(&self) -> Vec<ActivityRecord> {
        let raw = match self.kv.get(keys::ACTIVITIES) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed reading activity store, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Corrupt activity payload, treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[ActivityRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)
            .map_err(|e| crate::error::AppError::Internal(anyhow::anyhow!("serialize records: {}", e)))?;
        self.kv.set(keys::ACTIVITIES, &raw)
    }

    /// Record a completion that just happened (optimistic write).
    pub fn record_completion(
        &self,
        kind: ActivityKind,
        owner_ref: Option<String>,
        label: impl Into<String>,
    ) -> Result<ActivityRecord> {
        self.record_completion_at(kind, owner_ref, label, Utc::now())
    }

    /// Record a completion observed at a given instant.
    pub fn record_completion_at(
        &self,
        kind: ActivityKind,
        owner_ref: Option<String>,
        label: impl Into<String>,
        completed_at: DateTime<Utc>,
    ) -> Result<ActivityRecord> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let record = ActivityRecord::placeholder(seq, kind, owner_ref, label, completed_at);

        let _guard = self.write_lock.lock().unwrap();
        let mut records = self.load();
        records.insert(0, record.clone());
        self.save(&records)?;

        tracing::debug!(
            id = %record.id,
            kind = %record.kind,
            day_key = %record.day_key,
            "Completion recorded locally"
        );
        Ok(record)
    }

    /// Snapshot of records still awaiting confirmation by the authority.
    pub fn pending(&self) -> Vec<ActivityRecord> {
        self.load()
            .into_iter()
            .filter(|r| r.id.is_placeholder())
            .collect()
    }

    /// Swap a placeholder for the canonical record the authority returned.
    ///
    /// The canonical record takes the placeholder's position so the merged
    /// view never flashes a missing entry. If a record with the same
    /// canonical identity is already present (two concurrent completions
    /// collapsed server-side), the placeholder is simply dropped.
    pub fn resolve_placeholder(&self, seq: u64, canonical: ActivityRecord) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap();
        let mut records = self.load();

        let duplicate = records.iter().any(|r| r.id == canonical.id);
        match records
            .iter()
            .position(|r| r.id == RecordId::Placeholder(seq))
        {
            Some(pos) if duplicate => {
                records.remove(pos);
            }
            Some(pos) => records[pos] = canonical,
            // Placeholder vanished (cleared mid-sync); keep the canonical
            // copy unless it is already there.
            None if !duplicate => records.insert(0, canonical),
            None => {}
        }

        self.save(&records)
    }

    /// Drop a placeholder the authority permanently rejected.
    pub fn discard_placeholder(&self, seq: u64) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap();
        let mut records = self.load();
        records.retain(|r| r.id != RecordId::Placeholder(seq));
        self.save(&records)
    }

    /// Remove every record owned by the given entity. Returns how many
    /// records were removed.
    pub fn remove_owned(&self, kind: ActivityKind, owner_ref: &str) -> Result<usize> {
        let _guard = self.write_lock.lock().unwrap();
        let mut records = self.load();
        let before = records.len();
        records.retain(|r| !r.owned_by(kind, owner_ref));
        let removed = before - records.len();
        self.save(&records)?;
        Ok(removed)
    }

    /// Remove all records.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap();
        self.save(&[])
    }
}
