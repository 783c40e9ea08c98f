// ABOUTME: Cursor pagination engine resolving opaque list tokens into anchored store reads
// ABOUTME: Defines page requests and results, the record store contract, and the paginator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! # Cursor Pagination
//!
//! Lists are ordered newest first (`date DESC, id DESC`). A cursor is the
//! opaque token of an *anchor* row:
//!
//! - a forward page starts at its anchor (inclusive) and extends toward older
//!   rows;
//! - a backward page ends at its anchor (inclusive) and extends toward newer
//!   rows, but is still returned newest first.
//!
//! The store reports the row just beyond each edge of the page it returned.
//! Those become `next_token` and `previous_token`, so following a cursor
//! always lands on the first row of the adjacent page. Anchors are row
//! identifiers rather than offsets, which keeps pages stable while new
//! records are inserted.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::errors::{PaginationError, StoreError};
use crate::models::RowId;
use crate::opaque_id::{IdCodec, OpaqueToken};

/// Direction a page extends from its anchor
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaginationDirection {
    /// Toward older records (`next_token`)
    #[default]
    Forward,
    /// Toward newer records (`previous_token`)
    Backward,
}

/// A client-supplied cursor, still undecoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// Continue toward older records
    Next(String),
    /// Go back toward newer records
    Previous(String),
}

impl PageCursor {
    /// Build a cursor from the two optional list query parameters
    ///
    /// # Errors
    ///
    /// Returns `PaginationError::ConflictingCursors` when both are present.
    pub fn from_tokens(
        next_token: Option<String>,
        previous_token: Option<String>,
    ) -> Result<Option<Self>, PaginationError> {
        match (next_token, previous_token) {
            (Some(_), Some(_)) => Err(PaginationError::ConflictingCursors),
            (Some(next), None) => Ok(Some(Self::Next(next))),
            (None, Some(previous)) => Ok(Some(Self::Previous(previous))),
            (None, None) => Ok(None),
        }
    }

    /// Raw token text
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Next(token) | Self::Previous(token) => token,
        }
    }

    /// Direction the cursor moves in
    #[must_use]
    pub const fn direction(&self) -> PaginationDirection {
        match self {
            Self::Next(_) => PaginationDirection::Forward,
            Self::Previous(_) => PaginationDirection::Backward,
        }
    }
}

/// A single list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of records to return, must be positive
    pub page_size: usize,
    /// Position to resume from; `None` starts at the most recent record
    pub cursor: Option<PageCursor>,
}

impl PageRequest {
    /// First page, starting at the most recent record
    #[must_use]
    pub const fn first(page_size: usize) -> Self {
        Self {
            page_size,
            cursor: None,
        }
    }

    /// Page that follows a `next_token`
    #[must_use]
    pub fn next(page_size: usize, token: impl Into<String>) -> Self {
        Self {
            page_size,
            cursor: Some(PageCursor::Next(token.into())),
        }
    }

    /// Page that follows a `previous_token`
    #[must_use]
    pub fn previous(page_size: usize, token: impl Into<String>) -> Self {
        Self {
            page_size,
            cursor: Some(PageCursor::Previous(token.into())),
        }
    }

    /// True for a request without a cursor
    #[must_use]
    pub const fn is_initial(&self) -> bool {
        self.cursor.is_none()
    }
}

/// Range read the engine issues against a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Row the page is anchored on; `None` means the most recent record
    pub anchor: Option<RowId>,
    /// Maximum number of rows to return
    pub limit: usize,
    /// Which way the page extends from the anchor
    pub direction: PaginationDirection,
}

/// Rows returned by a store for one `PageQuery`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePage<T> {
    /// Rows ordered newest first
    pub items: Vec<T>,
    /// Row immediately older than the last item, if any
    pub forward_anchor: Option<RowId>,
    /// Row immediately newer than the first item, if any
    pub backward_anchor: Option<RowId>,
}

impl<T> StorePage<T> {
    /// A page with no rows and no neighbours
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            forward_anchor: None,
            backward_anchor: None,
        }
    }
}

/// Backing record store for one record type
#[async_trait]
pub trait PageStore<T>: Send + Sync {
    /// Read one page of rows
    ///
    /// An anchor that names no existing row yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the read fails or times out.
    async fn fetch_page(&self, query: PageQuery) -> Result<StorePage<T>, StoreError>;
}

/// One page of results plus continuation cursors
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Records ordered newest first
    pub items: Vec<T>,
    /// Token for the adjacent older page; absent at the end of the list
    pub next_cursor: Option<OpaqueToken>,
    /// Token for the adjacent newer page; absent at the start of the list
    pub previous_cursor: Option<OpaqueToken>,
}

impl<T> PageResult<T> {
    /// A page with no records and no cursors
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            previous_cursor: None,
        }
    }

    /// Number of records on this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the page holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Stateless cursor pagination engine.
///
/// Holds only the shared codec and the page-size ceiling, so one instance
/// serves every concurrent list request.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    codec: Arc<IdCodec>,
    max_page_size: usize,
}

impl CursorPaginator {
    /// Create a paginator issuing tokens with `codec`
    #[must_use]
    pub const fn new(codec: Arc<IdCodec>, max_page_size: usize) -> Self {
        Self {
            codec,
            max_page_size,
        }
    }

    /// Codec used for cursor tokens
    #[must_use]
    pub fn codec(&self) -> &IdCodec {
        &self.codec
    }

    /// Largest page size a request may ask for
    #[must_use]
    pub const fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Turn a request into the store read it needs
    ///
    /// # Errors
    ///
    /// Returns `PaginationError::InvalidPageSize` for a page size of zero or
    /// above the ceiling, and `PaginationError::InvalidCursor` when the cursor
    /// does not decode to a single non-sentinel row identifier.
    pub fn resolve(&self, request: &PageRequest) -> Result<PageQuery, PaginationError> {
        if request.page_size == 0 || request.page_size > self.max_page_size {
            return Err(PaginationError::InvalidPageSize {
                requested: request.page_size,
                max: self.max_page_size,
            });
        }

        let Some(cursor) = &request.cursor else {
            return Ok(PageQuery {
                anchor: None,
                limit: request.page_size,
                direction: PaginationDirection::Forward,
            });
        };

        let anchor = self
            .codec
            .decode_row_id(cursor.token())
            .map_err(PaginationError::from_token)?;
        if anchor.is_sentinel() {
            return Err(PaginationError::unusable_anchor(
                "token does not reference a record",
            ));
        }

        Ok(PageQuery {
            anchor: Some(anchor),
            limit: request.page_size,
            direction: cursor.direction(),
        })
    }

    /// Fetch one page from `store`, issuing exactly one store read
    ///
    /// # Errors
    ///
    /// Returns the `resolve` errors for a bad request,
    /// `PaginationError::NotFound` when a cursor points past the data,
    /// `PaginationError::Store` when the store fails, and
    /// `PaginationError::Encoding` when a continuation token cannot be built.
    pub async fn paginate<T, S>(
        &self,
        store: &S,
        request: &PageRequest,
    ) -> Result<PageResult<T>, PaginationError>
    where
        S: PageStore<T> + ?Sized,
    {
        let query = self.resolve(request).inspect_err(|e| {
            warn!(error = %e, "Rejected list cursor");
        })?;
        debug!(
            anchor = ?query.anchor.map(RowId::get),
            limit = query.limit,
            direction = ?query.direction,
            "Resolved page query"
        );

        let page = store.fetch_page(query).await.inspect_err(|e| {
            error!(error = %e, "Page fetch failed");
        })?;

        self.finish(request, page)
    }

    fn finish<T>(
        &self,
        request: &PageRequest,
        page: StorePage<T>,
    ) -> Result<PageResult<T>, PaginationError> {
        if page.items.is_empty() {
            if request.is_initial() {
                info!("List is empty");
                return Ok(PageResult::empty());
            }
            warn!("No records at cursor position");
            return Err(PaginationError::NotFound);
        }

        let next_cursor = self.cursor_for(page.forward_anchor)?;
        let previous_cursor = self.cursor_for(page.backward_anchor)?;

        info!(
            count = page.items.len(),
            has_next = next_cursor.is_some(),
            has_previous = previous_cursor.is_some(),
            "Page assembled"
        );

        Ok(PageResult {
            items: page.items,
            next_cursor,
            previous_cursor,
        })
    }

    fn cursor_for(&self, anchor: Option<RowId>) -> Result<Option<OpaqueToken>, PaginationError> {
        anchor
            .filter(|id| !id.is_sentinel())
            .map(|id| self.codec.encode_row_id(id))
            .transpose()
            .map_err(PaginationError::Encoding)
    }
}
