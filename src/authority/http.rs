// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the activity authority API.
//!
//! Maps transport and status failures onto the engine's error taxonomy:
//! 429/5xx/transport problems are transient, 400 is a permanent
//! rejection, 401/403 is forbidden, 404 is not-found.

use serde::Deserialize;

use crate::authority::{Authority, CreateActivity, CreateOutcome, RemoteRecord};
use crate::error::{AppError, Result};

/// Authority API client.
#[derive(Clone)]
pub struct HttpAuthority {
    http: reqwest::Client,
    base_url: String,
    /// Opaque bearer token; session handling is the auth collaborator's
    /// concern.
    token: String,
}

/// Error body shape used by the authority.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpAuthority {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn activities_url(&self) -> String {
        format!("{}/activities", self.base_url)
    }

    /// Map a non-success response onto the error taxonomy.
    async fn response_error(&self, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(body);

        match status.as_u16() {
            400 => AppError::RemoteRejected(message),
            401 | 403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            429 => {
                tracing::warn!("Authority rate limit hit (429)");
                AppError::RemoteUnavailable("rate limited".to_string())
            }
            _ => AppError::RemoteUnavailable(format!("HTTP {}: {}", status, message)),
        }
    }
}

#[async_trait::async_trait]
impl Authority for HttpAuthority {
    async fn create(&self, activity: CreateActivity) -> Result<CreateOutcome> {
        let response = self
            .http
            .post(self.activities_url())
            .bearer_auth(&self.token)
            .json(&activity)
            .send()
            .await
            .map_err(|e| AppError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.response_error(response).await);
        }

        let record: RemoteRecord = response
            .json()
            .await
            .map_err(|e| AppError::RemoteUnavailable(format!("JSON parse error: {}", e)))?;

        Ok(CreateOutcome {
            record,
            // 201 = created, 200 = idempotent hit on an existing record
            created: status.as_u16() == 201,
        })
    }

    async fn list(&self) -> Result<Vec<RemoteRecord>> {
        let response = self
            .http
            .get(self.activities_url())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AppError::RemoteUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.response_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::RemoteUnavailable(format!("JSON parse error: {}", e)))
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let url = format!("{}/{}", self.activities_url(), id);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| AppError::RemoteUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.response_error(response).await);
        }
        Ok(())
    }
}
