use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pulse_tracker::models::{ActivityKind, ActivityRecord, RecordId};
use pulse_tracker::services::merge;

fn remote_records(n: usize) -> Vec<ActivityRecord> {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let completed_at = start + Duration::days(i as i64 / 4) + Duration::hours(i as i64 % 4);
            ActivityRecord {
                id: RecordId::Canonical(format!("srv_{}", i)),
                kind: ActivityKind::Routine,
                owner_ref: Some(format!("r_{}", i % 4)),
                label: format!("Routine {}", i % 4),
                completed_at,
                day_key: pulse_tracker::time_utils::day_key(completed_at),
            }
        })
        .collect()
}

fn local_records(n: usize) -> Vec<ActivityRecord> {
    let start = Utc.with_ymd_and_hms(2021, 6, 1, 9, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let completed_at = start + Duration::days(i as i64 / 2) + Duration::hours(i as i64 % 2);
            ActivityRecord::placeholder(
                i as u64 + 1,
                ActivityKind::Goal,
                Some(format!("g_{}", i % 8)),
                format!("Goal {}", i % 8),
                completed_at,
            )
        })
        .collect()
}

fn benchmark_merge(c: &mut Criterion) {
    // Authority list cap worth of remote records plus a realistic local
    // backlog, with identity-key overlap between the two.
    let remote = remote_records(2000);
    let local = local_records(500);

    let mut group = c.benchmark_group("merge");

    group.bench_function("capped_remote_with_local_backlog", |b| {
        b.iter(|| merge(black_box(local.clone()), black_box(remote.clone())))
    });

    let view = merge(local.clone(), remote.clone());
    group.bench_function("grouped_by_day", |b| {
        b.iter(|| black_box(&view).grouped_by_day())
    });

    group.finish();
}

criterion_group!(benches, benchmark_merge);
criterion_main!(benches);
