// ABOUTME: Cursor pagination over the SQLite metric stores
// ABOUTME: Walks seeded tables forward and backward and checks anchors, tokens and error cases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod helpers;

use std::collections::HashSet;

use helpers::test_utils::{create_test_resources, first_day, seed_consecutive_days};
use vitals_api::errors::PaginationError;
use vitals_api::models::{HeartRateValues, MetricEntry, RowId, SleepValues, StressValues};
use vitals_api::pagination::{PageQuery, PageRequest, PageStore, PaginationDirection};

fn ids<V>(items: &[MetricEntry<V>]) -> Vec<i64> {
    items.iter().map(|e| e.id.get()).collect()
}

#[tokio::test]
async fn test_twelve_days_in_pages_of_five() {
    let resources = create_test_resources().await;
    seed_consecutive_days(&resources.database, 12).await;
    let store = resources.database.metric_store::<SleepValues>();
    let paginator = &resources.paginator;
    let codec = &resources.codec;

    let page1 = paginator
        .paginate(&store, &PageRequest::first(5))
        .await
        .unwrap();
    assert_eq!(ids(&page1.items), [12, 11, 10, 9, 8]);
    assert!(page1.previous_cursor.is_none());
    let next = page1.next_cursor.unwrap();
    assert_eq!(next.as_str(), "wMkFG6XO5k");
    assert_eq!(codec.decode_row_id(next.as_str()).unwrap().get(), 7);

    let page2 = paginator
        .paginate(&store, &PageRequest::next(5, next.as_str()))
        .await
        .unwrap();
    assert_eq!(ids(&page2.items), [7, 6, 5, 4, 3]);
    let next = page2.next_cursor.clone().unwrap();
    assert_eq!(codec.decode_row_id(next.as_str()).unwrap().get(), 2);
    let previous = page2.previous_cursor.clone().unwrap();
    assert_eq!(codec.decode_row_id(previous.as_str()).unwrap().get(), 8);

    let page3 = paginator
        .paginate(&store, &PageRequest::next(5, next.as_str()))
        .await
        .unwrap();
    assert_eq!(ids(&page3.items), [2, 1]);
    assert!(page3.next_cursor.is_none());
    assert!(page3.previous_cursor.is_some());
}

#[tokio::test]
async fn test_items_are_newest_first_by_date() {
    let resources = create_test_resources().await;
    let dates = seed_consecutive_days(&resources.database, 4).await;
    let store = resources.database.metric_store::<HeartRateValues>();

    let page = resources
        .paginator
        .paginate(&store, &PageRequest::first(5))
        .await
        .unwrap();

    let listed: Vec<_> = page.items.iter().map(|e| e.date).collect();
    let expected: Vec<_> = dates.into_iter().rev().collect();
    assert_eq!(listed, expected);
    assert!(page.next_cursor.is_none());
    assert!(page.previous_cursor.is_none());
}

#[tokio::test]
async fn test_previous_token_returns_the_newer_page() {
    let resources = create_test_resources().await;
    seed_consecutive_days(&resources.database, 12).await;
    let store = resources.database.metric_store::<SleepValues>();
    let paginator = &resources.paginator;

    let page1 = paginator
        .paginate(&store, &PageRequest::first(5))
        .await
        .unwrap();
    let page2 = paginator
        .paginate(
            &store,
            &PageRequest::next(5, page1.next_cursor.clone().unwrap().as_str()),
        )
        .await
        .unwrap();

    let back = paginator
        .paginate(
            &store,
            &PageRequest::previous(5, page2.previous_cursor.unwrap().as_str()),
        )
        .await
        .unwrap();

    assert_eq!(back.items, page1.items);
    assert!(back.previous_cursor.is_none());
    assert_eq!(back.next_cursor, page1.next_cursor);
}

#[tokio::test]
async fn test_forward_walk_visits_every_record_once() {
    let resources = create_test_resources().await;
    seed_consecutive_days(&resources.database, 23).await;
    let store = resources.database.metric_store::<StressValues>();

    let mut seen = HashSet::new();
    let mut request = PageRequest::first(4);
    let mut pages = 0;
    loop {
        let page = resources.paginator.paginate(&store, &request).await.unwrap();
        pages += 1;
        for entry in &page.items {
            assert!(seen.insert(entry.id), "record {} listed twice", entry.id);
        }
        match page.next_cursor {
            Some(token) => request = PageRequest::next(4, token.as_str()),
            None => break,
        }
    }

    assert_eq!(seen.len(), 23);
    assert_eq!(pages, 6);
}

#[tokio::test]
async fn test_empty_table_first_page_is_empty() {
    let resources = create_test_resources().await;
    let store = resources.database.metric_store::<SleepValues>();

    let page = resources
        .paginator
        .paginate(&store, &PageRequest::first(5))
        .await
        .unwrap();

    assert!(page.is_empty());
    assert!(page.next_cursor.is_none());
    assert!(page.previous_cursor.is_none());
}

#[tokio::test]
async fn test_anchor_to_missing_row_is_not_found() {
    let resources = create_test_resources().await;
    seed_consecutive_days(&resources.database, 3).await;
    let store = resources.database.metric_store::<SleepValues>();

    let missing = resources
        .codec
        .encode_row_id(RowId::try_from(99_i64).unwrap())
        .unwrap();
    let err = resources
        .paginator
        .paginate(&store, &PageRequest::next(5, missing.as_str()))
        .await
        .unwrap_err();

    assert!(matches!(err, PaginationError::NotFound));
    assert_eq!(err.to_string(), "no results found");
}

#[tokio::test]
async fn test_malformed_token_is_invalid_cursor() {
    let resources = create_test_resources().await;
    seed_consecutive_days(&resources.database, 3).await;
    let store = resources.database.metric_store::<SleepValues>();

    let err = resources
        .paginator
        .paginate(&store, &PageRequest::next(5, "not-a-real-token!!"))
        .await
        .unwrap_err();

    assert!(matches!(err, PaginationError::InvalidCursor { .. }));
}

#[tokio::test]
async fn test_store_reports_edge_neighbours() {
    let resources = create_test_resources().await;
    seed_consecutive_days(&resources.database, 6).await;
    let store = resources.database.metric_store::<SleepValues>();

    let page = store
        .fetch_page(PageQuery {
            anchor: Some(RowId::try_from(4_i64).unwrap()),
            limit: 2,
            direction: PaginationDirection::Forward,
        })
        .await
        .unwrap();
    assert_eq!(ids(&page.items), [4, 3]);
    assert_eq!(page.forward_anchor.map(RowId::get), Some(2));
    assert_eq!(page.backward_anchor.map(RowId::get), Some(5));

    let page = store
        .fetch_page(PageQuery {
            anchor: Some(RowId::try_from(4_i64).unwrap()),
            limit: 2,
            direction: PaginationDirection::Backward,
        })
        .await
        .unwrap();
    assert_eq!(ids(&page.items), [5, 4]);
    assert_eq!(page.forward_anchor.map(RowId::get), Some(3));
    assert_eq!(page.backward_anchor.map(RowId::get), Some(6));
}

#[tokio::test]
async fn test_upsert_keeps_row_id_and_date_order() {
    let resources = create_test_resources().await;
    seed_consecutive_days(&resources.database, 3).await;
    let store = resources.database.metric_store::<StressValues>();

    let updated = store
        .upsert(
            first_day(),
            StressValues {
                high_stress_duration: 42,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id.get(), 1);
    assert_eq!(updated.values.high_stress_duration, 42);
    assert_eq!(store.count().await.unwrap(), 3);
    assert!(updated.updated_timestamp >= updated.created_timestamp);
}
