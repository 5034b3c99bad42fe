// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completion record model shared by the local store and the merge path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time_utils;

/// Record identity.
///
/// `Placeholder` is assigned locally at completion time and means the
/// record has not been confirmed by the authority yet; "needs sync" is a
/// type-level fact, not a string-prefix convention. `Canonical` is the
/// identity the authority issued once the record was durably stored there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum RecordId {
    /// Identity issued by the authority.
    Canonical(String),
    /// Local sequence number, unique per device.
    Placeholder(u64),
}

impl RecordId {
    /// True if this record still needs to be pushed to the authority.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, RecordId::Placeholder(_))
    }

    /// The canonical id, if the authority has issued one.
    pub fn canonical(&self) -> Option<&str> {
        match self {
            RecordId::Canonical(id) => Some(id),
            RecordId::Placeholder(_) => None,
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Canonical(id) => write!(f, "{}", id),
            RecordId::Placeholder(seq) => write!(f, "local#{}", seq),
        }
    }
}

/// Category of the completed thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Goal,
    Routine,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Goal => "goal",
            ActivityKind::Routine => "routine",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplication key: one logical fact is "this owner was completed on
/// this day". The local store and the authority may each hold one physical
/// row for it; the merged view collapses them to one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub kind: ActivityKind,
    pub owner_ref: Option<String>,
    pub day_key: String,
}

/// A completion record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Canonical or placeholder identity
    pub id: RecordId,
    /// Category of the completed thing (goal, routine)
    pub kind: ActivityKind,
    /// Id of the owning goal/routine; None for kinds with no owner
    pub owner_ref: Option<String>,
    /// Display title, denormalized at creation time
    pub label: String,
    /// Precise completion timestamp (UTC)
    pub completed_at: DateTime<Utc>,
    /// Calendar-day bucket, computed once at creation
    pub day_key: String,
}

impl ActivityRecord {
    /// Build a not-yet-confirmed record for a completion that just
    /// happened. The day key is derived here, exactly once.
    pub fn placeholder(
        seq: u64,
        kind: ActivityKind,
        owner_ref: Option<String>,
        label: impl Into<String>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::Placeholder(seq),
            kind,
            owner_ref,
            label: label.into(),
            completed_at,
            day_key: time_utils::day_key(completed_at),
        }
    }

    /// The deduplication key for this record.
    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            kind: self.kind,
            owner_ref: self.owner_ref.clone(),
            day_key: self.day_key.clone(),
        }
    }

    /// True if this record belongs to the given owner.
    pub fn owned_by(&self, kind: ActivityKind, owner_ref: &str) -> bool {
        self.kind == kind && self.owner_ref.as_deref() == Some(owner_ref)
    }
}
