// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity authority boundary: the remote system of record.
//!
//! The engine only consumes the query/mutation contract: idempotent
//! create, list, delete. Access control lives behind this boundary; every
//! `Authority` value is already scoped to the current caller (the HTTP
//! client by its bearer token, the in-memory one by an explicit
//! `CallerIdentity`).

pub mod http;
pub mod memory;

pub use http::HttpAuthority;
pub use memory::InMemoryAuthority;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ActivityKind, ActivityRecord, IdentityKey, RecordId};

/// Upper bound on list results; protects the client from unbounded
/// histories.
pub const LIST_CAP: usize = 2000;

/// Fields sent when pushing a completion. The placeholder identity never
/// goes over the wire; the authority issues the canonical one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(rename = "title")]
    pub label: String,
    pub completed_at: DateTime<Utc>,
    #[serde(rename = "dateString")]
    pub day_key: String,
}

impl CreateActivity {
    /// Extract the semantic fields of a local record for pushing.
    pub fn from_record(record: &ActivityRecord) -> Self {
        Self {
            kind: record.kind,
            ref_id: record.owner_ref.clone(),
            label: record.label.clone(),
            completed_at: record.completed_at,
            day_key: record.day_key.clone(),
        }
    }
}

/// A record as the authority stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    /// Canonical identity issued by the authority
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning caller; present when a privileged caller lists all records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(rename = "title")]
    pub label: String,
    pub completed_at: DateTime<Utc>,
    #[serde(rename = "dateString")]
    pub day_key: String,
}

impl RemoteRecord {
    /// The deduplication key for this record.
    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            kind: self.kind,
            owner_ref: self.ref_id.clone(),
            day_key: self.day_key.clone(),
        }
    }

    /// Convert into a local record carrying the canonical identity.
    pub fn into_record(self) -> ActivityRecord {
        ActivityRecord {
            id: RecordId::Canonical(self.id),
            kind: self.kind,
            owner_ref: self.ref_id,
            label: self.label,
            completed_at: self.completed_at,
            day_key: self.day_key,
        }
    }
}

/// Outcome of an idempotent create.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub record: RemoteRecord,
    /// True if the authority created a new record, false if it returned
    /// an existing one for the same `(kind, refId, dayKey)`.
    pub created: bool,
}

/// The authority's query/mutation contract.
#[async_trait]
pub trait Authority: Send + Sync {
    /// Idempotent create keyed on `(kind, refId, dayKey)` for the acting
    /// caller: a duplicate push returns the existing canonical record.
    async fn create(&self, activity: CreateActivity) -> Result<CreateOutcome>;

    /// All records visible to the caller, completion time descending,
    /// capped at [`LIST_CAP`].
    async fn list(&self) -> Result<Vec<RemoteRecord>>;

    /// Remove a record by canonical identity. Fails with `NotFound` if
    /// absent and `Forbidden` if the caller neither owns the record nor
    /// holds the elevated capability.
    async fn remove(&self, id: &str) -> Result<()>;
}
