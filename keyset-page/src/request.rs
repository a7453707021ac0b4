//! Caller-facing page request.

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::error::PaginationError;
use crate::page::PageCursor;
use crate::state::{CursorState, Direction, SortColumn, SortType};
use crate::value::WireValue;

/// Sort requested for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort<C> {
    /// Sort key.
    pub column: SortColumn<C>,
    /// Natural order of the key.
    #[serde(default)]
    pub sort_type: SortType,
}

impl<C> Sort<C> {
    /// Ascending sort on `column`.
    pub const fn ascending(column: SortColumn<C>) -> Self {
        Self {
            column,
            sort_type: SortType::Ascending,
        }
    }

    /// Descending sort on `column`.
    pub const fn descending(column: SortColumn<C>) -> Self {
        Self {
            column,
            sort_type: SortType::Descending,
        }
    }
}

impl<C> Default for Sort<C> {
    fn default() -> Self {
        Self::ascending(SortColumn::Id)
    }
}

/// Pagination block of an incoming request.
///
/// All fields are optional on the wire; an absent `limit` takes the
/// configured default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Id of the boundary record.
    pub id: Option<i64>,
    /// Sort value of the boundary record.
    pub value: Option<WireValue>,
    /// Paging direction.
    pub direction: Direction,
    /// Page size.
    pub limit: Option<i64>,
}

impl PageRequest {
    /// Request the page after `cursor`.
    pub const fn after(cursor: PageCursor) -> Self {
        Self {
            id: Some(cursor.id),
            value: cursor.value,
            direction: Direction::Next,
            limit: None,
        }
    }

    /// Request the page before `cursor`.
    pub const fn before(cursor: PageCursor) -> Self {
        Self {
            id: Some(cursor.id),
            value: cursor.value,
            direction: Direction::Previous,
            limit: None,
        }
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the cursor state for this request under `sort`.
    pub fn into_state<C>(
        self,
        sort: Sort<C>,
        config: &PaginationConfig,
    ) -> Result<CursorState<C>, PaginationError> {
        let limit = match self.limit {
            None => config.default_limit,
            Some(limit) => usize::try_from(limit)
                .ok()
                .filter(|l| *l > 0)
                .ok_or_else(|| {
                    PaginationError::InvalidRequest(format!("limit must be positive (got {limit})"))
                })?,
        };

        CursorState::new(
            sort.column,
            sort.sort_type,
            self.direction,
            self.value,
            self.id,
            limit,
        )
    }

    /// Build the cursor state for an optional pagination block.
    ///
    /// A request without one gets the first page with the default limit.
    pub fn resolve<C>(
        request: Option<Self>,
        sort: Sort<C>,
        config: &PaginationConfig,
    ) -> Result<CursorState<C>, PaginationError> {
        request.unwrap_or_default().into_state(sort, config)
    }
}
