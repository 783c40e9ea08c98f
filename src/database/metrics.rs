// ABOUTME: Typed SQLite store for one metric table, implementing the pagination PageStore
// ABOUTME: Single-statement window-function page reads plus lookups by id and by date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use tracing::debug;

use crate::errors::StoreError;
use crate::models::{
    HeartRateValues, MetricEntry, MetricKind, RowId, SleepValues, Spo2Values, StressValues,
};
use crate::pagination::{PageQuery, PageStore, PaginationDirection, StorePage};

/// Query builder type used when binding value columns
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Value columns of one metric table
pub trait MetricValues: Copy + Serialize + Send + Sync + Unpin + 'static {
    /// Which metric these values belong to
    const KIND: MetricKind;

    /// `(column, SQL type)` pairs in bind order
    const COLUMNS: &'static [(&'static str, &'static str)];

    /// Read the value columns from a row
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or has the wrong type
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;

    /// Bind the value columns, in `COLUMNS` order
    fn bind_values(self, query: SqliteQuery<'_>) -> SqliteQuery<'_>;
}

impl MetricValues for SleepValues {
    const KIND: MetricKind = MetricKind::Sleep;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("rating", "INTEGER"),
        ("total_sleep", "INTEGER"),
        ("deep_sleep", "INTEGER"),
        ("light_sleep", "INTEGER"),
        ("rem_sleep", "INTEGER"),
    ];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            rating: row.try_get("rating")?,
            total_sleep: row.try_get("total_sleep")?,
            deep_sleep: row.try_get("deep_sleep")?,
            light_sleep: row.try_get("light_sleep")?,
            rem_sleep: row.try_get("rem_sleep")?,
        })
    }

    fn bind_values(self, query: SqliteQuery<'_>) -> SqliteQuery<'_> {
        query
            .bind(self.rating)
            .bind(self.total_sleep)
            .bind(self.deep_sleep)
            .bind(self.light_sleep)
            .bind(self.rem_sleep)
    }
}

impl MetricValues for HeartRateValues {
    const KIND: MetricKind = MetricKind::HeartRate;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("low", "INTEGER"),
        ("high", "INTEGER"),
        ("average", "INTEGER"),
    ];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            low: row.try_get("low")?,
            high: row.try_get("high")?,
            average: row.try_get("average")?,
        })
    }

    fn bind_values(self, query: SqliteQuery<'_>) -> SqliteQuery<'_> {
        query.bind(self.low).bind(self.high).bind(self.average)
    }
}

impl MetricValues for Spo2Values {
    const KIND: MetricKind = MetricKind::Spo2;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[("average_spo2", "REAL")];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            average_spo2: row.try_get("average_spo2")?,
        })
    }

    fn bind_values(self, query: SqliteQuery<'_>) -> SqliteQuery<'_> {
        query.bind(self.average_spo2)
    }
}

impl MetricValues for StressValues {
    const KIND: MetricKind = MetricKind::Stress;
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("high_stress_duration", "INTEGER")];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            high_stress_duration: row.try_get("high_stress_duration")?,
        })
    }

    fn bind_values(self, query: SqliteQuery<'_>) -> SqliteQuery<'_> {
        query.bind(self.high_stress_duration)
    }
}

/// Value column definitions for a metric table
pub(super) const fn column_definitions(kind: MetricKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        MetricKind::Sleep => SleepValues::COLUMNS,
        MetricKind::HeartRate => HeartRateValues::COLUMNS,
        MetricKind::Spo2 => Spo2Values::COLUMNS,
        MetricKind::Stress => StressValues::COLUMNS,
    }
}

/// Store for the records of one metric table
pub struct MetricStore<V> {
    pool: SqlitePool,
    query_timeout: Duration,
    values: PhantomData<fn() -> V>,
}

impl<V> Clone for MetricStore<V> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            query_timeout: self.query_timeout,
            values: PhantomData,
        }
    }
}

impl<V: MetricValues> MetricStore<V> {
    /// Create a store over `pool`; every statement is bounded by `query_timeout`
    #[must_use]
    pub const fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
            values: PhantomData,
        }
    }

    fn table() -> &'static str {
        V::KIND.table_name()
    }

    fn value_columns() -> String {
        V::COLUMNS
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_columns() -> String {
        format!(
            "id, date, {}, created_timestamp, updated_timestamp",
            Self::value_columns()
        )
    }

    /// Fetch one record by row id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or times out
    pub async fn get_by_id(&self, id: RowId) -> Result<Option<MetricEntry<V>>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            Self::select_columns(),
            Self::table()
        );
        let context = format!("Failed to get {} by id", Self::table());

        let row = self
            .bounded(&context, sqlx::query(&sql).bind(id.get()).fetch_optional(&self.pool))
            .await?;
        row.map(|r| row_to_entry(&r))
            .transpose()
            .map_err(|e| StoreError::new(context, e))
    }

    /// Fetch the record for a calendar day
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or times out
    pub async fn get_by_date(&self, date: NaiveDate) -> Result<Option<MetricEntry<V>>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE date = ?1",
            Self::select_columns(),
            Self::table()
        );
        let context = format!("Failed to get {} by date", Self::table());

        let row = self
            .bounded(
                &context,
                sqlx::query(&sql)
                    .bind(format_date(date))
                    .fetch_optional(&self.pool),
            )
            .await?;
        row.map(|r| row_to_entry(&r))
            .transpose()
            .map_err(|e| StoreError::new(context, e))
    }

    /// Insert the record for `date`, replacing the values of an existing one
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or times out
    pub async fn upsert(&self, date: NaiveDate, values: V) -> Result<MetricEntry<V>, StoreError> {
        let columns = Self::value_columns();
        let placeholders = vec!["?"; V::COLUMNS.len()].join(", ");
        let updates = V::COLUMNS
            .iter()
            .map(|(name, _)| format!("{name} = excluded.{name}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r"
            INSERT INTO {table} (date, {columns}, created_timestamp, updated_timestamp)
            VALUES (?, {placeholders}, ?, ?)
            ON CONFLICT(date) DO UPDATE SET {updates}, updated_timestamp = excluded.updated_timestamp
            RETURNING {select}
            ",
            table = Self::table(),
            select = Self::select_columns(),
        );
        let context = format!("Failed to store {} record", Self::table());
        let now = Utc::now().to_rfc3339();

        let query = values
            .bind_values(sqlx::query(&sql).bind(format_date(date)))
            .bind(now.as_str())
            .bind(now.as_str());
        let row = self.bounded(&context, query.fetch_one(&self.pool)).await?;
        row_to_entry(&row).map_err(|e| StoreError::new(context, e))
    }

    /// Number of stored records
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or times out
    pub async fn count(&self) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", Self::table());
        let context = format!("Failed to count {} records", Self::table());
        let row = self
            .bounded(&context, sqlx::query(&sql).fetch_one(&self.pool))
            .await?;
        row.try_get(0).map_err(|e| StoreError::new(context, e))
    }

    fn page_sql(query: &PageQuery) -> String {
        let ordered = format!(
            r"
            WITH ordered AS (
                SELECT {select},
                       LAG(id) OVER win AS newer_id,
                       LEAD(id) OVER win AS older_id,
                       ROW_NUMBER() OVER win AS position
                FROM {table}
                WINDOW win AS (ORDER BY date DESC, id DESC)
            )",
            select = Self::select_columns(),
            table = Self::table(),
        );

        match (query.anchor, query.direction) {
            (None, _) => format!("{ordered} SELECT * FROM ordered ORDER BY position LIMIT ?2"),
            (Some(_), PaginationDirection::Backward) => format!(
                "{ordered} SELECT * FROM ordered \
                 WHERE position <= (SELECT position FROM ordered WHERE id = ?1) \
                 ORDER BY position DESC LIMIT ?2"
            ),
            (Some(_), _) => format!(
                "{ordered} SELECT * FROM ordered \
                 WHERE position >= (SELECT position FROM ordered WHERE id = ?1) \
                 ORDER BY position LIMIT ?2"
            ),
        }
    }

    /// Run a statement under the store's query deadline
    async fn bounded<T, F>(&self, context: &str, statement: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.query_timeout, statement).await {
            Ok(result) => result.map_err(|e| StoreError::new(context.to_owned(), e)),
            Err(_) => Err(StoreError::message(format!(
                "{context}: timed out after {}s",
                self.query_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl<V: MetricValues> PageStore<MetricEntry<V>> for MetricStore<V> {
    async fn fetch_page(
        &self,
        query: PageQuery,
    ) -> Result<StorePage<MetricEntry<V>>, StoreError> {
        let sql = Self::page_sql(&query);
        let context = format!("Failed to fetch {} page", Self::table());
        let anchor = query.anchor.map_or(0, RowId::get);
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let mut rows = self
            .bounded(
                &context,
                sqlx::query(&sql)
                    .bind(anchor)
                    .bind(limit)
                    .fetch_all(&self.pool),
            )
            .await?;
        // Backward reads walk from the anchor towards newer rows
        if query.anchor.is_some() && query.direction == PaginationDirection::Backward {
            rows.reverse();
        }

        let page = rows_to_page(&rows).map_err(|e| StoreError::new(context, e))?;

        debug!(
            table = Self::table(),
            rows = page.items.len(),
            "Fetched page"
        );
        Ok(page)
    }
}

/// Build a page from newest-first rows, taking the neighbour ids from the edge rows
fn rows_to_page<V: MetricValues>(
    rows: &[SqliteRow],
) -> Result<StorePage<MetricEntry<V>>, sqlx::Error> {
    let items = rows
        .iter()
        .map(row_to_entry)
        .collect::<Result<Vec<MetricEntry<V>>, _>>()?;

    let neighbour = |row: Option<&SqliteRow>, column: &str| -> Result<Option<RowId>, sqlx::Error> {
        row.map(|r| r.try_get::<Option<i64>, _>(column))
            .transpose()
            .map(Option::flatten)?
            .map(to_row_id)
            .transpose()
    };

    Ok(StorePage {
        forward_anchor: neighbour(rows.last(), "older_id")?,
        backward_anchor: neighbour(rows.first(), "newer_id")?,
        items,
    })
}

fn row_to_entry<V: MetricValues>(row: &SqliteRow) -> Result<MetricEntry<V>, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let date: String = row.try_get("date")?;
    let created: String = row.try_get("created_timestamp")?;
    let updated: String = row.try_get("updated_timestamp")?;

    Ok(MetricEntry {
        id: to_row_id(id)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        values: V::from_row(row)?,
        created_timestamp: parse_timestamp(&created)?,
        updated_timestamp: parse_timestamp(&updated)?,
    })
}

fn to_row_id(id: i64) -> Result<RowId, sqlx::Error> {
    RowId::try_from(id).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
