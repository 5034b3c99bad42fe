// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory reference implementation of the authority contract.
//!
//! Implements the same semantics the production API does: idempotent
//! create per `(kind, refId, dayKey)` per caller, list scoped to the
//! caller unless elevated, ownership check on delete. Also carries
//! failure hooks (offline mode, per-id delete failures, create
//! rejection) so tests can exercise partial-failure paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::authority::{Authority, CreateActivity, CreateOutcome, RemoteRecord, LIST_CAP};
use crate::error::{AppError, Result};
use crate::models::CallerIdentity;

#[derive(Default)]
struct AuthorityState {
    records: Mutex<Vec<RemoteRecord>>,
    next_id: AtomicU64,
    offline: AtomicBool,
    reject_creates: AtomicBool,
    fail_delete_ids: Mutex<HashSet<String>>,
}

/// In-memory authority scoped to one caller. Clones made with
/// [`for_caller`](InMemoryAuthority::for_caller) share the record set.
#[derive(Clone)]
pub struct InMemoryAuthority {
    state: Arc<AuthorityState>,
    caller: CallerIdentity,
}

impl InMemoryAuthority {
    pub fn new(caller: CallerIdentity) -> Self {
        Self {
            state: Arc::new(AuthorityState::default()),
            caller,
        }
    }

    /// A handle over the same record set, scoped to a different caller.
    pub fn for_caller(&self, caller: CallerIdentity) -> Self {
        Self {
            state: Arc::clone(&self.state),
            caller,
        }
    }

    // ─── Failure hooks ───────────────────────────────────────────

    /// Simulate the authority being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    /// Reject every create with a validation error.
    pub fn set_reject_creates(&self, reject: bool) {
        self.state.reject_creates.store(reject, Ordering::SeqCst);
    }

    /// Record ids whose delete should fail transiently.
    pub fn fail_delete_ids(&self, ids: impl IntoIterator<Item = String>) {
        let mut guard = self.state.fail_delete_ids.lock().unwrap();
        guard.clear();
        guard.extend(ids);
    }

    /// Every stored record, regardless of caller scoping (assert helper).
    pub fn records_snapshot(&self) -> Vec<RemoteRecord> {
        self.state.records.lock().unwrap().clone()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.state.offline.load(Ordering::SeqCst) {
            return Err(AppError::RemoteUnavailable("authority offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Authority for InMemoryAuthority {
    async fn create(&self, activity: CreateActivity) -> Result<CreateOutcome> {
        self.ensure_online()?;

        if self.state.reject_creates.load(Ordering::SeqCst) {
            return Err(AppError::RemoteRejected("create rejected".to_string()));
        }
        if activity.label.is_empty() || activity.day_key.is_empty() {
            return Err(AppError::RemoteRejected(
                "Missing required fields".to_string(),
            ));
        }

        let mut records = self.state.records.lock().unwrap();

        // Idempotency: same logical fact for the same caller returns the
        // existing record instead of creating a second one.
        if activity.ref_id.is_some() {
            if let Some(existing) = records.iter().find(|r| {
                r.user.as_deref() == Some(self.caller.user_id.as_str())
                    && r.kind == activity.kind
                    && r.ref_id == activity.ref_id
                    && r.day_key == activity.day_key
            }) {
                return Ok(CreateOutcome {
                    record: existing.clone(),
                    created: false,
                });
            }
        }

        let id = format!("srv_{}", self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = RemoteRecord {
            id,
            user: Some(self.caller.user_id.clone()),
            kind: activity.kind,
            ref_id: activity.ref_id,
            label: activity.label,
            completed_at: activity.completed_at,
            day_key: activity.day_key,
        };
        records.push(record.clone());

        Ok(CreateOutcome {
            record,
            created: true,
        })
    }

    async fn list(&self) -> Result<Vec<RemoteRecord>> {
        self.ensure_online()?;

        let records = self.state.records.lock().unwrap();
        let mut visible: Vec<RemoteRecord> = records
            .iter()
            .filter(|r| {
                self.caller.elevated || r.user.as_deref() == Some(self.caller.user_id.as_str())
            })
            .cloned()
            .collect();

        visible.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        visible.truncate(LIST_CAP);
        Ok(visible)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.ensure_online()?;

        if self.state.fail_delete_ids.lock().unwrap().contains(id) {
            return Err(AppError::RemoteUnavailable(format!(
                "injected delete failure for {}",
                id
            )));
        }

        let mut records = self.state.records.lock().unwrap();
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {}", id)))?;

        let record = &records[pos];
        if record.user.as_deref() != Some(self.caller.user_id.as_str()) && !self.caller.elevated {
            return Err(AppError::Forbidden(format!(
                "Caller does not own activity {}",
                id
            )));
        }

        records.remove(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityKind;
    use chrono::{TimeZone, Utc};

    fn create_req(ref_id: &str, day: u32) -> CreateActivity {
        CreateActivity {
            kind: ActivityKind::Routine,
            ref_id: Some(ref_id.to_string()),
            label: "Morning run".to_string(),
            completed_at: Utc.with_ymd_and_hms(2024, 1, day, 7, 0, 0).unwrap(),
            day_key: format!("2024-01-{:02}", day),
        }
    }

    #[tokio::test]
    async fn create_is_idempotent_per_identity_key() {
        let authority = InMemoryAuthority::new(CallerIdentity::user("uid_1"));

        let first = authority.create(create_req("r_1", 5)).await.unwrap();
        let second = authority.create(create_req("r_1", 5)).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.record.id, second.record.id);
        assert_eq!(authority.records_snapshot().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_missing_label() {
        let authority = InMemoryAuthority::new(CallerIdentity::user("uid_1"));
        let mut req = create_req("r_1", 5);
        req.label = String::new();

        let err = authority.create(req).await.unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn list_scopes_to_caller_unless_elevated() {
        let authority = InMemoryAuthority::new(CallerIdentity::user("uid_1"));
        authority.create(create_req("r_1", 5)).await.unwrap();

        let other = authority.for_caller(CallerIdentity::user("uid_2"));
        other.create(create_req("r_2", 6)).await.unwrap();

        assert_eq!(authority.list().await.unwrap().len(), 1);
        assert_eq!(other.list().await.unwrap().len(), 1);

        let admin = authority.for_caller(CallerIdentity::elevated("admin"));
        assert_eq!(admin.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_orders_by_completion_desc() {
        let authority = InMemoryAuthority::new(CallerIdentity::user("uid_1"));
        authority.create(create_req("r_1", 5)).await.unwrap();
        authority.create(create_req("r_2", 8)).await.unwrap();
        authority.create(create_req("r_3", 6)).await.unwrap();

        let listed = authority.list().await.unwrap();
        let days: Vec<&str> = listed.iter().map(|r| r.day_key.as_str()).collect();
        assert_eq!(days, vec!["2024-01-08", "2024-01-06", "2024-01-05"]);
    }

    #[tokio::test]
    async fn remove_distinguishes_not_found_from_forbidden() {
        let authority = InMemoryAuthority::new(CallerIdentity::user("uid_1"));
        let outcome = authority.create(create_req("r_1", 5)).await.unwrap();

        let err = authority.remove("srv_999").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let stranger = authority.for_caller(CallerIdentity::user("uid_2"));
        let err = stranger.remove(&outcome.record.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // Elevated caller overrides ownership.
        let admin = authority.for_caller(CallerIdentity::elevated("admin"));
        admin.remove(&outcome.record.id).await.unwrap();
        assert!(authority.records_snapshot().is_empty());
    }

    #[tokio::test]
    async fn offline_mode_fails_transiently() {
        let authority = InMemoryAuthority::new(CallerIdentity::user("uid_1"));
        authority.set_offline(true);

        let err = authority.list().await.unwrap_err();
        assert!(err.is_transient());

        authority.set_offline(false);
        assert!(authority.list().await.is_ok());
    }
}
