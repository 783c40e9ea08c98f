// ABOUTME: In-memory server fixtures for integration tests
// ABOUTME: Builds test configuration and resources, seeds consecutive days, and signs bearer tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use vitals_api::auth::{Claims, JwtVerifier};
use vitals_api::config::{AuthConfig, DatabaseConfig, Environment, HttpConfig, ServerConfig};
use vitals_api::database::Database;
use vitals_api::models::{HeartRateValues, SleepValues, Spo2Values, StressValues};
use vitals_api::opaque_id::IdCodecConfig;
use vitals_api::resources::ServerResources;

/// Signing secret shared by the fixtures
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Page size configured for the fixtures
pub const TEST_PAGE_SIZE: usize = 5;

/// First seeded day
#[must_use]
pub fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// Auth settings with every optional claim pinned
#[must_use]
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        audience: Some("vitals-tests".to_owned()),
        issuer: Some("auth.vitals.test".to_owned()),
        unique_id: Some("test-device".to_owned()),
    }
}

/// Configuration backed by an in-memory database
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        environment: Environment::Testing,
        http: HttpConfig {
            port: 0,
            request_timeout_secs: 30,
            cors_allowed_origins: vec!["*".to_owned()],
        },
        database: DatabaseConfig::in_memory(),
        list_row_limit: TEST_PAGE_SIZE,
        tokens: IdCodecConfig::default(),
        auth: test_auth_config(),
    }
}

/// Resources over a fresh, empty in-memory database
pub async fn create_test_resources() -> Arc<ServerResources> {
    let config = test_config();
    let database = Database::new(&config.database).await.unwrap();
    Arc::new(ServerResources::new(config, database).unwrap())
}

/// Seed `days` consecutive days of every metric, oldest first
///
/// Row ids therefore run 1..=days in date order in every table.
pub async fn seed_consecutive_days(database: &Database, days: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    for offset in 0..days {
        let n = i64::from(offset);
        let date = first_day() + Duration::days(n);

        database
            .metric_store::<SleepValues>()
            .upsert(
                date,
                SleepValues {
                    rating: 70 + n,
                    total_sleep: 25_200 + n,
                    deep_sleep: 5_400,
                    light_sleep: 14_400,
                    rem_sleep: 5_400 + n,
                },
            )
            .await
            .unwrap();
        database
            .metric_store::<HeartRateValues>()
            .upsert(
                date,
                HeartRateValues {
                    low: 50,
                    high: 140 + n,
                    average: 65,
                },
            )
            .await
            .unwrap();
        database
            .metric_store::<Spo2Values>()
            .upsert(date, Spo2Values { average_spo2: 97.5 })
            .await
            .unwrap();
        database
            .metric_store::<StressValues>()
            .upsert(
                date,
                StressValues {
                    high_stress_duration: 600 * n,
                },
            )
            .await
            .unwrap();

        dates.push(date);
    }
    dates
}

/// Bearer token accepted by the fixture resources
#[must_use]
pub fn bearer_token(resources: &ServerResources) -> String {
    let claims = Claims {
        sub: Some("integration-test".to_owned()),
        ..Claims::for_config(&resources.config.auth, Utc::now() + Duration::hours(1))
    };
    JwtVerifier::new(&resources.config.auth)
        .issue(&claims)
        .unwrap()
}

/// `Authorization` header value for [`bearer_token`]
#[must_use]
pub fn auth_header(resources: &ServerResources) -> String {
    format!("Bearer {}", bearer_token(resources))
}
