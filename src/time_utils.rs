// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and day-key math.
//!
//! The day key is the canonical `YYYY-MM-DD` bucket a completion falls
//! into. It is computed once (in UTC) when a record is created and stored
//! with the record; it is never re-derived at read time, so a client in a
//! different timezone cannot shift history by a day.

use chrono::{DateTime, NaiveDate, Utc};

/// Day-key format: calendar day in UTC.
const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Derive the canonical day key for a completion timestamp.
pub fn day_key(completed_at: DateTime<Utc>) -> String {
    completed_at.format(DAY_KEY_FORMAT).to_string()
}

/// Day key for a plain calendar date (used by the streak walk).
pub fn day_key_for(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a stored day key back into a calendar date.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}
