// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Caller identity supplied by the (external) auth collaborator.

/// Identity every authority call is scoped to.
///
/// The engine never branches on concrete roles; the only capability it
/// knows about is `elevated` (may see and remove other callers' records).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
    pub elevated: bool,
}

impl CallerIdentity {
    /// A regular caller scoped to its own records.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            elevated: false,
        }
    }

    /// A caller holding the elevated capability.
    pub fn elevated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            elevated: true,
        }
    }
}
