// ABOUTME: Criterion benchmarks for cursor pagination over the SQLite metric store
// ABOUTME: Measures first-page and deep-cursor list latency on a seeded in-memory table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! Criterion benchmarks for list pagination.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;
use vitals_api::config::DatabaseConfig;
use vitals_api::database::Database;
use vitals_api::models::{HeartRateValues, RowId};
use vitals_api::opaque_id::{IdCodec, IdCodecConfig};
use vitals_api::pagination::{CursorPaginator, PageRequest};

const DAYS: i64 = 2_000;

async fn seeded_database() -> Database {
    let database = Database::new(&DatabaseConfig::in_memory()).await.unwrap();
    let store = database.metric_store::<HeartRateValues>();
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();

    for day in 0..DAYS {
        store
            .upsert(
                start + Duration::days(day),
                HeartRateValues {
                    low: 50,
                    high: 150,
                    average: 60 + day % 20,
                },
            )
            .await
            .unwrap();
    }
    database
}

fn bench_list(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let database = rt.block_on(seeded_database());
    let store = database.metric_store::<HeartRateValues>();
    let codec = Arc::new(IdCodec::new(&IdCodecConfig::default()).unwrap());
    let paginator = CursorPaginator::new(Arc::clone(&codec), 100);

    let mut group = c.benchmark_group("list_page");

    for size in [10_usize, 50, 100] {
        group.bench_with_input(BenchmarkId::new("first", size), &size, |b, &size| {
            b.to_async(&rt).iter(|| async {
                paginator
                    .paginate(&store, black_box(&PageRequest::first(size)))
                    .await
                    .unwrap()
            });
        });
    }

    let deep = codec
        .encode_row_id(RowId::try_from(DAYS / 4).unwrap())
        .unwrap()
        .into_inner();
    group.bench_function("deep_cursor", |b| {
        b.to_async(&rt).iter(|| async {
            paginator
                .paginate(&store, black_box(&PageRequest::next(20, deep.as_str())))
                .await
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_list);
criterion_main!(benches);
