// ABOUTME: Metric record route handlers: paginated list, lookup by opaque id, lookup by date
// ABOUTME: One generic handler set registered for sleep, heart rate, SpO2 and stress
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! Metric record routes
//!
//! For each metric `M`:
//!
//! - `GET /M/list?next_token=..|previous_token=..&limit=..`
//! - `GET /M/id/{token}`
//! - `GET /M/date/{YYYY-MM-DD}`
//!
//! All of them sit behind bearer authentication. Records are serialized with
//! their opaque token as `id`; raw row ids never leave the server.

use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::database::MetricValues;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::middleware::auth::require_bearer_auth;
use crate::middleware::tracing::request_id;
use crate::models::{HeartRateValues, MetricEntry, SleepValues, Spo2Values, StressValues};
use crate::opaque_id::{IdCodec, OpaqueToken};
use crate::pagination::{PageCursor, PageRequest};
use crate::resources::ServerResources;

/// Query parameters of a list request
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    /// Continue toward older records
    pub next_token: Option<String>,
    /// Go back toward newer records
    pub previous_token: Option<String>,
    /// Lower the page size below the configured maximum
    pub limit: Option<usize>,
}

/// One record as returned to API consumers
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse<V> {
    /// Opaque record id
    pub id: OpaqueToken,
    /// Calendar day, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Metric-specific fields
    #[serde(flatten)]
    pub values: V,
    /// When the record was first stored
    pub created_timestamp: DateTime<Utc>,
    /// When the record was last changed
    pub updated_timestamp: DateTime<Utc>,
}

impl<V: MetricValues> EntryResponse<V> {
    /// Replace the row id with its opaque token
    ///
    /// # Errors
    ///
    /// Returns an internal error if the row id cannot be encoded
    pub fn from_entry(entry: MetricEntry<V>, codec: &IdCodec) -> AppResult<Self> {
        Ok(Self {
            id: codec.encode_row_id(entry.id)?,
            date: entry.date,
            values: entry.values,
            created_timestamp: entry.created_timestamp,
            updated_timestamp: entry.updated_timestamp,
        })
    }
}

/// Body of a list response
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<V> {
    /// Records, newest first
    pub data: Vec<EntryResponse<V>>,
    /// Token for the next (older) page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<OpaqueToken>,
    /// Token for the previous (newer) page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_token: Option<OpaqueToken>,
}

/// Metric record routes
pub struct MetricRoutes;

impl MetricRoutes {
    /// Create the authenticated routes for every metric
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .merge(Self::metric_routes::<SleepValues>())
            .merge(Self::metric_routes::<HeartRateValues>())
            .merge(Self::metric_routes::<Spo2Values>())
            .merge(Self::metric_routes::<StressValues>())
            .route_layer(middleware::from_fn_with_state(
                Arc::clone(&resources),
                require_bearer_auth,
            ))
            .with_state(resources)
    }

    fn metric_routes<V: MetricValues>() -> Router<Arc<ServerResources>> {
        let base = V::KIND.path_segment();
        Router::new()
            .route(&format!("/{base}/list"), get(Self::handle_list::<V>))
            .route(&format!("/{base}/id/:token"), get(Self::handle_get_by_id::<V>))
            .route(&format!("/{base}/date/:date"), get(Self::handle_get_by_date::<V>))
    }

    async fn handle_list<V: MetricValues>(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<ListQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        Self::list::<V>(&resources, query)
            .await
            .map_err(|e| tag_request(e, &headers))
    }

    async fn list<V: MetricValues>(
        resources: &ServerResources,
        query: Result<Query<ListQuery>, QueryRejection>,
    ) -> AppResult<Response> {
        let Query(params) = query
            .map_err(|e| AppError::invalid_input(format!("Invalid list parameters: {e}")))?;

        let max = resources.paginator.max_page_size();
        let request = PageRequest {
            page_size: params.limit.map_or(max, |limit| limit.min(max)),
            cursor: PageCursor::from_tokens(params.next_token, params.previous_token)?,
        };

        let store = resources.database.metric_store::<V>();
        let page = resources.paginator.paginate(&store, &request).await?;

        let data = page
            .items
            .into_iter()
            .map(|entry| EntryResponse::from_entry(entry, &resources.codec))
            .collect::<AppResult<Vec<_>>>()?;

        info!(
            metric = %V::KIND,
            count = data.len(),
            "Listed records"
        );

        Ok(Json(ListResponse {
            data,
            next_token: page.next_cursor,
            previous_token: page.previous_cursor,
        })
        .into_response())
    }

    async fn handle_get_by_id<V: MetricValues>(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        token: Result<Path<String>, PathRejection>,
    ) -> Result<Response, AppError> {
        Self::get_by_id::<V>(&resources, token)
            .await
            .map_err(|e| tag_request(e, &headers))
    }

    async fn get_by_id<V: MetricValues>(
        resources: &ServerResources,
        token: Result<Path<String>, PathRejection>,
    ) -> AppResult<Response> {
        let Path(token) =
            token.map_err(|e| AppError::invalid_input(format!("Invalid record id: {e}")))?;

        let id = resources.codec.decode_row_id(&token).map_err(|e| {
            AppError::new(ErrorCode::InvalidInput, format!("Invalid record id '{token}': {e}"))
                .with_source(e)
        })?;
        debug!(metric = %V::KIND, "Looking up record by id");

        let entry = resources
            .database
            .metric_store::<V>()
            .get_by_id(id)
            .await?
            .ok_or_else(|| {
                info!(metric = %V::KIND, "Record id not found");
                AppError::new(
                    ErrorCode::ResourceNotFound,
                    format!("{} not found with id {token}", V::KIND.display_name()),
                )
            })?;

        Ok(Json(EntryResponse::from_entry(entry, &resources.codec)?).into_response())
    }

    async fn handle_get_by_date<V: MetricValues>(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        date: Result<Path<String>, PathRejection>,
    ) -> Result<Response, AppError> {
        Self::get_by_date::<V>(&resources, date)
            .await
            .map_err(|e| tag_request(e, &headers))
    }

    async fn get_by_date<V: MetricValues>(
        resources: &ServerResources,
        date: Result<Path<String>, PathRejection>,
    ) -> AppResult<Response> {
        let Path(raw) =
            date.map_err(|e| AppError::invalid_input(format!("Invalid date: {e}")))?;

        let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
            AppError::new(
                ErrorCode::InvalidFormat,
                format!("Invalid date '{raw}', expected YYYY-MM-DD: {e}"),
            )
        })?;

        let entry = resources
            .database
            .metric_store::<V>()
            .get_by_date(date)
            .await?
            .ok_or_else(|| {
                info!(metric = %V::KIND, %date, "No record for date");
                AppError::new(
                    ErrorCode::ResourceNotFound,
                    format!("{} not found with date {raw}", V::KIND.display_name()),
                )
            })?;

        Ok(Json(EntryResponse::from_entry(entry, &resources.codec)?).into_response())
    }
}

fn tag_request(error: AppError, headers: &HeaderMap) -> AppError {
    match request_id(headers) {
        Some(id) => error.with_request_id(id),
        None => error,
    }
}
