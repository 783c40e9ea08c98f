// ABOUTME: HTTP tests for the liveness and readiness probes
// ABOUTME: Both answer without credentials; readiness reflects the database pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use helpers::test_utils::create_test_resources;
use serde_json::Value;
use vitals_api::server::build_router;

#[tokio::test]
async fn test_health_needs_no_auth() {
    let resources = create_test_resources().await;

    let body: Value = AxumTestRequest::get("/health")
        .send(build_router(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "vitals-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_when_database_answers() {
    let resources = create_test_resources().await;

    let body: Value = AxumTestRequest::get("/ready")
        .send(build_router(&resources))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_not_ready_once_pool_is_closed() {
    let resources = create_test_resources().await;
    resources.database.pool().close().await;

    let body: Value = AxumTestRequest::get("/ready")
        .send(build_router(&resources))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .json();

    assert_eq!(body["status"], "not_ready");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let resources = create_test_resources().await;

    let response = AxumTestRequest::get("/sleep/everything")
        .send(build_router(&resources))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_cors_preflight() {
    let resources = create_test_resources().await;

    let response = AxumTestRequest::options("/sleep/list")
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "authorization")
        .send(build_router(&resources))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
}
