// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types for the reconciliation engine.
//!
//! The taxonomy matters more than the messages: the sync and cleanup
//! paths decide retry-vs-drop based on which variant they get back.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Transient remote failure (network, timeout, 429, 5xx).
    /// Reads degrade to local-only; writes are retried on the next pass.
    #[error("Authority unavailable: {0}")]
    RemoteUnavailable(String),

    /// Permanent remote rejection (validation failure, 400).
    /// The candidate is dropped from the retry set.
    #[error("Authority rejected request: {0}")]
    RemoteRejected(String),

    /// The record does not exist on the authority.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The caller does not own the record and lacks elevated capability.
    /// Distinct from NotFound so callers can explain *why* a delete failed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Local store I/O failure.
    #[error("Local store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures worth retrying on a later sync pass.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::RemoteUnavailable(_))
    }

    /// True for permanent rejections: pushing the same candidate again
    /// can never succeed, so the sync agent drops it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AppError::RemoteRejected(_) | AppError::Forbidden(_))
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_matches_unavailable_only() {
        assert!(AppError::RemoteUnavailable("timeout".to_string()).is_transient());
        assert!(!AppError::RemoteRejected("missing title".to_string()).is_transient());
        assert!(!AppError::NotFound("record".to_string()).is_transient());
    }

    #[test]
    fn rejection_matches_rejected_and_forbidden() {
        assert!(AppError::RemoteRejected("missing dateString".to_string()).is_rejection());
        assert!(AppError::Forbidden("not the owner".to_string()).is_rejection());
        assert!(!AppError::RemoteUnavailable("503".to_string()).is_rejection());
        assert!(!AppError::Store("write failed".to_string()).is_rejection());
    }
}
