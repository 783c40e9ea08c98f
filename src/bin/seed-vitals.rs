// ABOUTME: Synthetic health-metric seeder for local development and demos
// ABOUTME: Upserts one record per day for every metric and can print a matching bearer token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! Synthetic record seeder for the Vitals API.
//!
//! Usage:
//! ```bash
//! # Seed the last 30 days into the configured database
//! cargo run --bin seed-vitals
//!
//! # Seed a year into a specific file, reproducibly
//! cargo run --bin seed-vitals -- --days 365 --seed 7 --database-url sqlite:./data/demo.db
//!
//! # Also print a bearer token accepted by the server's JWT settings
//! cargo run --bin seed-vitals -- --print-token
//! ```

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use vitals_api::auth::{Claims, JwtVerifier};
use vitals_api::config::{AuthConfig, DatabaseConfig, DatabaseUrl};
use vitals_api::constants::database::DEFAULT_DATABASE_URL;
use vitals_api::constants::env_config;
use vitals_api::database::{Database, MetricValues};
use vitals_api::models::{HeartRateValues, SleepValues, Spo2Values, StressValues};

#[derive(Parser)]
#[command(
    name = "seed-vitals",
    about = "Vitals API synthetic data seeder",
    long_about = "Populate the metric tables with one synthetic record per day"
)]
struct SeedArgs {
    /// Number of days to seed, ending today
    #[arg(long, default_value = "30")]
    days: u32,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Random seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Print a bearer token signed with `JWT_SECRET_KEY`
    #[arg(long)]
    print_token: bool,

    /// Lifetime of the printed token
    #[arg(long, default_value = "24")]
    token_hours: i64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let url = args
        .database_url
        .clone()
        .or_else(|| env::var(env_config::DATABASE_URL).ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());
    let config = DatabaseConfig {
        url: DatabaseUrl::parse_url(&url)?,
        ..DatabaseConfig::default()
    };

    info!("Vitals seeder");
    info!("   Database: {}", config.url);
    info!("   Days: {}", args.days);

    let database = Database::new(&config).await?;

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(12345, |d| d.as_secs())
    });
    let mut rng = StdRng::seed_from_u64(seed);
    info!("   Random seed: {seed}");

    let today = Utc::now().date_naive();
    for offset in (0..args.days).rev() {
        let date = today - Duration::days(i64::from(offset));
        seed_day(&database, &mut rng, date).await?;
    }

    report::<SleepValues>(&database).await?;
    report::<HeartRateValues>(&database).await?;
    report::<Spo2Values>(&database).await?;
    report::<StressValues>(&database).await?;

    if args.print_token {
        print_token(args.token_hours)?;
    }

    Ok(())
}

async fn seed_day(database: &Database, rng: &mut StdRng, date: NaiveDate) -> Result<()> {
    let deep = rng.gen_range(3_600..7_200);
    let light = rng.gen_range(10_800..16_200);
    let rem = rng.gen_range(3_600..6_300);
    let sleep = SleepValues {
        rating: rng.gen_range(55..98),
        total_sleep: deep + light + rem,
        deep_sleep: deep,
        light_sleep: light,
        rem_sleep: rem,
    };

    let low = rng.gen_range(42..60);
    let high = rng.gen_range(110..175);
    let heart_rate = HeartRateValues {
        low,
        high,
        average: rng.gen_range(low + 10..low + 30),
    };

    let spo2 = Spo2Values {
        average_spo2: (rng.gen_range(93.0..99.5_f64) * 10.0).round() / 10.0,
    };

    let stress = StressValues {
        high_stress_duration: rng.gen_range(0..10_800),
    };

    upsert(database, date, sleep).await?;
    upsert(database, date, heart_rate).await?;
    upsert(database, date, spo2).await?;
    upsert(database, date, stress).await
}

async fn upsert<V: MetricValues>(database: &Database, date: NaiveDate, values: V) -> Result<()> {
    database
        .metric_store::<V>()
        .upsert(date, values)
        .await
        .with_context(|| format!("Failed to upsert {} for {date}", V::KIND))?;
    Ok(())
}

async fn report<V: MetricValues>(database: &Database) -> Result<()> {
    let count = database.metric_store::<V>().count().await?;
    info!("   {}: {count} records", V::KIND.table_name());
    Ok(())
}

fn print_token(hours: i64) -> Result<()> {
    let jwt_secret = env::var(env_config::JWT_SECRET_KEY)
        .with_context(|| format!("{} must be set to sign a token", env_config::JWT_SECRET_KEY))?;
    let optional = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());

    let auth = AuthConfig {
        jwt_secret,
        audience: optional(env_config::JWT_AUDIENCE),
        issuer: optional(env_config::JWT_ISSUER),
        unique_id: optional(env_config::JWT_UNIQUE_ID),
    };
    let claims = Claims {
        sub: Some("seed-vitals".to_owned()),
        ..Claims::for_config(&auth, Utc::now() + Duration::hours(hours))
    };

    let token = JwtVerifier::new(&auth).issue(&claims)?;
    println!("{token}");
    Ok(())
}
