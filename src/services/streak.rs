// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contiguous-day streak derivation.

use chrono::NaiveDate;

use crate::services::reconcile::MergedView;
use crate::time_utils;

/// Number of consecutive days with at least one completion, anchored at
/// `today` and walking backward. A gap breaks the streak regardless of
/// older activity; a day with no completion yet means streak 0.
///
/// Always computed over the merged view, never over raw local or raw
/// remote records, and with the same day-key canonicalization used at
/// record creation.
pub fn compute_streak(view: &MergedView, today: NaiveDate) -> u32 {
    let days = view.day_keys();

    let mut count = 0;
    let mut day = today;
    while days.contains(time_utils::day_key_for(day).as_str()) {
        count += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityKind, ActivityRecord};
    use crate::services::reconcile::merge;
    use chrono::{TimeZone, Utc};

    fn view_with_days(days: &[(i32, u32, u32)]) -> MergedView {
        let records = days
            .iter()
            .enumerate()
            .map(|(i, &(y, m, d))| {
                ActivityRecord::placeholder(
                    i as u64 + 1,
                    ActivityKind::Routine,
                    Some("r_1".to_string()),
                    "Run",
                    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap(),
                )
            })
            .collect();
        merge(records, vec![])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn gap_at_today_means_zero() {
        let view = view_with_days(&[(2024, 1, 1), (2024, 1, 2)]);
        assert_eq!(compute_streak(&view, date(2024, 1, 3)), 0);
    }

    #[test]
    fn anchored_at_today_counts_back() {
        let view = view_with_days(&[(2024, 1, 1), (2024, 1, 2)]);
        assert_eq!(compute_streak(&view, date(2024, 1, 2)), 2);
    }

    #[test]
    fn gap_in_the_middle_stops_the_walk() {
        let view = view_with_days(&[(2024, 1, 1), (2024, 1, 3)]);
        assert_eq!(compute_streak(&view, date(2024, 1, 3)), 1);
    }

    #[test]
    fn empty_view_is_zero() {
        let view = view_with_days(&[]);
        assert_eq!(compute_streak(&view, date(2024, 1, 3)), 0);
    }

    #[test]
    fn multiple_completions_per_day_count_once() {
        let view = view_with_days(&[(2024, 1, 2), (2024, 1, 2), (2024, 1, 1)]);
        assert_eq!(compute_streak(&view, date(2024, 1, 2)), 2);
    }

    #[test]
    fn walks_across_month_and_leap_boundaries() {
        let view = view_with_days(&[(2024, 2, 28), (2024, 2, 29), (2024, 3, 1)]);
        assert_eq!(compute_streak(&view, date(2024, 3, 1)), 3);
    }
}
