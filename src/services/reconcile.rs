// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reconciliation of local and remote record sets.
//!
//! The merge policy is "remote is authoritative; local fills gaps only":
//! remote records are indexed first under their identity key, then local
//! records are inserted only where the key is not already taken. The
//! merged view is derived on demand and never persisted.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::authority::{Authority, RemoteRecord};
use crate::models::{ActivityKind, ActivityRecord, IdentityKey};
use crate::store::ActivityStore;

/// Merge local and remote records into one deduplicated view.
///
/// Pure function: no I/O, no side effects. Output order is completion
/// time descending with ties kept in insertion order (remote before
/// local).
pub fn merge(local: Vec<ActivityRecord>, remote: Vec<ActivityRecord>) -> MergedView {
    let mut seen: HashSet<IdentityKey> = HashSet::new();
    let mut records: Vec<ActivityRecord> = Vec::with_capacity(local.len() + remote.len());

    for record in remote.into_iter().chain(local) {
        if seen.insert(record.identity()) {
            records.push(record);
        }
    }

    // Stable sort keeps insertion order for equal timestamps.
    records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    MergedView { records }
}

/// The read-only union of local and remote records, remote precedence.
#[derive(Debug, Clone, Default)]
pub struct MergedView {
    records: Vec<ActivityRecord>,
}

/// One timeline bucket: every merged record for a calendar day.
#[derive(Debug)]
pub struct DayGroup<'a> {
    pub day_key: &'a str,
    pub records: Vec<&'a ActivityRecord>,
}

/// Per-kind totals for the merged view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub goals: usize,
    pub routines: usize,
}

impl MergedView {
    /// Records in presentation order (completion time descending).
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct day keys present in the view (streak math input).
    pub fn day_keys(&self) -> HashSet<&str> {
        self.records.iter().map(|r| r.day_key.as_str()).collect()
    }

    /// Timeline buckets, day key descending.
    pub fn grouped_by_day(&self) -> Vec<DayGroup<'_>> {
        let mut groups: BTreeMap<&str, Vec<&ActivityRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.day_key.as_str()).or_default().push(record);
        }

        groups
            .into_iter()
            .rev()
            .map(|(day_key, records)| DayGroup { day_key, records })
            .collect()
    }

    /// Records completed on a given day.
    pub fn completed_on<'a>(&'a self, day_key: &'a str) -> impl Iterator<Item = &'a ActivityRecord> {
        self.records.iter().filter(move |r| r.day_key == day_key)
    }

    /// Per-kind totals.
    pub fn summary(&self) -> Summary {
        let goals = self
            .records
            .iter()
            .filter(|r| r.kind == ActivityKind::Goal)
            .count();
        let routines = self
            .records
            .iter()
            .filter(|r| r.kind == ActivityKind::Routine)
            .count();
        Summary {
            total: self.records.len(),
            goals,
            routines,
        }
    }
}

/// Produces merged views from the local store and the authority.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<ActivityStore>,
    authority: Arc<dyn Authority>,
}

impl Reconciler {
    pub fn new(store: Arc<ActivityStore>, authority: Arc<dyn Authority>) -> Self {
        Self { store, authority }
    }

    /// Build the merged view. Remote unavailability degrades to the
    /// local-only view; this never fails the read path.
    pub async fn merged_view(&self) -> MergedView {
        let remote: Vec<ActivityRecord> = match self.authority.list().await {
            Ok(records) => records.into_iter().map(RemoteRecord::into_record).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Remote fetch failed, merging local-only");
                Vec::new()
            }
        };

        let local = self.store.load();
        merge(local, remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn local(seq: u64, owner: &str, day: u32, hour: u32) -> ActivityRecord {
        ActivityRecord::placeholder(
            seq,
            ActivityKind::Routine,
            Some(owner.to_string()),
            format!("Local {}", owner),
            ts(day, hour),
        )
    }

    fn remote(id: &str, owner: &str, day: u32, hour: u32) -> ActivityRecord {
        ActivityRecord {
            id: RecordId::Canonical(id.to_string()),
            kind: ActivityKind::Routine,
            owner_ref: Some(owner.to_string()),
            label: format!("Remote {}", owner),
            completed_at: ts(day, hour),
            day_key: format!("2024-01-{:02}", day),
        }
    }

    #[test]
    fn remote_wins_on_identity_collision() {
        let merged = merge(
            vec![local(1, "r_1", 5, 8)],
            vec![remote("srv_1", "r_1", 5, 9)],
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged.records()[0].id,
            RecordId::Canonical("srv_1".to_string())
        );
    }

    #[test]
    fn local_fills_gaps_remote_does_not_cover() {
        let merged = merge(
            vec![local(1, "r_1", 5, 8), local(2, "r_2", 6, 8)],
            vec![remote("srv_1", "r_1", 5, 9)],
        );

        assert_eq!(merged.len(), 2);
        let has_local_r2 = merged
            .records()
            .iter()
            .any(|r| r.id == RecordId::Placeholder(2));
        assert!(has_local_r2);
    }

    #[test]
    fn one_record_per_identity_key_in_union() {
        let locals = vec![local(1, "r_1", 5, 8), local(2, "r_2", 6, 8)];
        let remotes = vec![
            remote("srv_1", "r_1", 5, 9),
            remote("srv_2", "r_3", 7, 9),
        ];

        let merged = merge(locals, remotes);

        let keys: Vec<_> = merged.records().iter().map(|r| r.identity()).collect();
        let unique: HashSet<_> = keys.iter().cloned().collect();
        assert_eq!(unique.len(), keys.len());
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn presentation_order_is_completed_at_desc() {
        let merged = merge(
            vec![local(1, "r_1", 3, 8)],
            vec![remote("srv_1", "r_2", 5, 9), remote("srv_2", "r_3", 4, 9)],
        );

        let days: Vec<&str> = merged.records().iter().map(|r| r.day_key.as_str()).collect();
        assert_eq!(days, vec!["2024-01-05", "2024-01-04", "2024-01-03"]);
    }

    #[test]
    fn equal_timestamps_keep_remote_first() {
        // Same instant, different identity keys.
        let merged = merge(
            vec![local(1, "r_1", 5, 9)],
            vec![remote("srv_1", "r_2", 5, 9)],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.records()[0].id,
            RecordId::Canonical("srv_1".to_string())
        );
        assert_eq!(merged.records()[1].id, RecordId::Placeholder(1));
    }

    #[test]
    fn grouping_is_day_key_descending() {
        let merged = merge(
            vec![local(1, "r_1", 3, 8), local(2, "r_2", 5, 7)],
            vec![remote("srv_1", "r_3", 5, 9)],
        );

        let groups = merged.grouped_by_day();
        let days: Vec<&str> = groups.iter().map(|g| g.day_key).collect();
        assert_eq!(days, vec!["2024-01-05", "2024-01-03"]);
        assert_eq!(groups[0].records.len(), 2);
        assert_eq!(groups[1].records.len(), 1);
    }

    #[test]
    fn summary_counts_per_kind() {
        let mut goal = local(1, "g_1", 5, 8);
        goal.kind = ActivityKind::Goal;
        goal.day_key = "2024-01-05".to_string();

        let merged = merge(vec![goal, local(2, "r_1", 5, 9)], vec![]);
        let summary = merged.summary();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.goals, 1);
        assert_eq!(summary.routines, 1);
    }

    #[test]
    fn empty_inputs_merge_to_empty_view() {
        let merged = merge(vec![], vec![]);
        assert!(merged.is_empty());
        assert!(merged.grouped_by_day().is_empty());
        assert_eq!(merged.summary(), Summary::default());
    }
}
