// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pulse_tracker::authority::InMemoryAuthority;
use pulse_tracker::config::Config;
use pulse_tracker::models::{ActivityKind, CallerIdentity};
use pulse_tracker::store::MemoryKv;
use pulse_tracker::AppState;

/// Engine over in-memory backends, plus the authority handle for
/// injecting failures and inspecting remote state.
#[allow(dead_code)]
pub fn create_test_engine() -> (AppState, InMemoryAuthority) {
    let authority = InMemoryAuthority::new(CallerIdentity::user("uid_1"));
    let state = AppState::new(
        Config::default(),
        Arc::new(MemoryKv::new()),
        Arc::new(authority.clone()),
    );
    (state, authority)
}

/// Timestamp inside January 2024, keyed by day and hour.
#[allow(dead_code)]
pub fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

/// Record a routine completion for `owner` on the given January day.
#[allow(dead_code)]
pub fn complete_routine(state: &AppState, owner: &str, day: u32) {
    state
        .store
        .record_completion_at(
            ActivityKind::Routine,
            Some(owner.to_string()),
            format!("Routine {}", owner),
            ts(day, 9),
        )
        .expect("local write should succeed");
}
