//! Error types for page requests and fetches.

use crate::state::{Direction, SortType};
use crate::value::ColumnType;

/// Boxed error returned by a [`Fetcher`](crate::Fetcher).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building or running a page request.
///
/// Request errors are reported before anything is fetched. Fetch errors are
/// passed through unmodified; nothing here retries.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PaginationError {
    /// A first page (no cursor) was requested in a direction other than forward.
    #[error(
        "first page can only be requested with direction Next (got {sort_type:?}/{direction:?})"
    )]
    UnsupportedFirstPage {
        /// Configured sort type of the column.
        sort_type: SortType,
        /// Requested navigation direction.
        direction: Direction,
    },

    /// The cursor value variant does not convert to the column type.
    #[error("cursor value {found} cannot be used for a {expected} column")]
    TypeMismatch {
        /// Declared type of the sort column.
        expected: ColumnType,
        /// Tag of the supplied cursor value.
        found: &'static str,
    },

    /// The sort column has no ordering usable for a cursor.
    #[error("column type {0} does not support cursor ordering")]
    UnsupportedColumnType(ColumnType),

    /// A fetched record has no value for the sort column, so no cursor can
    /// be positioned on it.
    #[error("record {id} has no value for sort column {column}")]
    MissingSortValue {
        /// Name of the sort column.
        column: String,
        /// Id of the offending record.
        id: i64,
    },

    /// The request is malformed (limit, missing cursor half, ...).
    #[error("invalid page request: {0}")]
    InvalidRequest(String),

    /// The fetch was cancelled before it completed.
    #[error("page fetch cancelled")]
    Cancelled,

    /// The fetcher failed.
    #[error(transparent)]
    Fetch(BoxError),
}

impl PaginationError {
    /// Returns `true` if the request was rejected before fetching.
    #[inline]
    #[must_use]
    pub const fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFirstPage { .. }
                | Self::TypeMismatch { .. }
                | Self::UnsupportedColumnType(_)
                | Self::InvalidRequest(_)
        )
    }

    /// Returns `true` if the error came from the fetch itself.
    ///
    /// Includes `Cancelled`, `Fetch` and fetched rows lacking a sort value.
    #[inline]
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Fetch(_) | Self::MissingSortValue { .. }
        )
    }
}
