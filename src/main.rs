// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pulse sync runner.
//!
//! One engine pass: push pending completions to the authority, rebuild
//! the merged view, and log the dashboard numbers (streak, today's
//! per-kind counts).

use std::sync::Arc;

use pulse_tracker::{
    authority::HttpAuthority, config::Config, services::compute_streak, store::FileKv,
    time_utils, AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        authority = %config.authority_url,
        store = %config.store_path,
        "Starting Pulse sync runner"
    );

    let kv = Arc::new(FileKv::new(&config.store_path));
    let authority = Arc::new(HttpAuthority::new(
        config.authority_url.clone(),
        config.authority_token.clone(),
    ));
    let state = AppState::new(config, kv, authority);

    // Push anything still unconfirmed.
    let report = state.sync_agent.sync_pending().await;
    if !report.is_complete_success() {
        tracing::warn!(
            failed = report.failed,
            rejected = report.rejected,
            "Some records were not pushed; transient failures retry next run"
        );
    }

    // Dashboard numbers from the merged view.
    let view = state.reconciler.merged_view().await;
    let today = chrono::Utc::now().date_naive();
    let today_key = time_utils::day_key_for(today);

    let streak = compute_streak(&view, today);
    let summary = view.summary();
    let done_today = view.completed_on(&today_key).count();

    tracing::info!(
        streak_days = streak,
        completed_today = done_today,
        total = summary.total,
        goals = summary.goals,
        routines = summary.routines,
        "Merged view ready"
    );

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pulse_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
