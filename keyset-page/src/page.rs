//! Page assembly and the pagination driver.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::PaginationError;
use crate::fetch::{FetchQuery, Fetcher};
use crate::filter::build_filter;
use crate::order::PhysicalOrder;
use crate::record::Record;
use crate::state::{CursorState, Direction, SortColumn};
use crate::value::{WireValue, encode};

/// Position of a record, handed back to callers for the next request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Value of the sort column, absent for an id-only sort.
    pub value: Option<WireValue>,
    /// Record id.
    pub id: i64,
}

impl PageCursor {
    /// Cursor of `record` under `column`.
    ///
    /// Fails when the record has no value for a field column, since such a
    /// cursor could not be decoded on the next request.
    pub fn of<R: Record>(
        record: &R,
        column: &SortColumn<R::Column>,
    ) -> Result<Self, PaginationError> {
        let value = match column {
            SortColumn::Id => None,
            SortColumn::Field(c) => {
                let value = record.value(*c).ok_or_else(|| PaginationError::MissingSortValue {
                    column: c.to_string(),
                    id: record.id(),
                })?;
                Some(encode(&value))
            },
        };
        Ok(Self {
            value,
            id: record.id(),
        })
    }
}

/// One page of results, in caller order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Page items.
    pub items: Vec<T>,
    /// Whether more rows exist beyond this page in the queried direction.
    pub has_next: bool,
    /// Cursor of the last item; request `Next` from it to continue forward.
    pub next_cursor: Option<PageCursor>,
    /// Cursor of the first item; request `Previous` from it to go back.
    pub prev_cursor: Option<PageCursor>,
}

impl<T> Page<T> {
    /// Project every item, keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_next: self.has_next,
            next_cursor: self.next_cursor,
            prev_cursor: self.prev_cursor,
        }
    }

    /// Number of items on the page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Turn a `limit + 1` fetch into caller-visible items and `has_next`.
///
/// Rows must be in physical fetch order. The extra row only signals that a
/// further page exists and is dropped. Backward pages are fetched walking
/// away from the cursor and are reversed into caller order.
pub fn assemble<T>(mut rows: Vec<T>, limit: usize, direction: Direction) -> (Vec<T>, bool) {
    let has_next = rows.len() > limit;
    rows.truncate(limit);

    if direction == Direction::Previous {
        rows.reverse();
    }
    (rows, has_next)
}

/// Fetch the page described by `state`.
///
/// Builds the keyset filter and physical order, fetches `limit + 1` rows and
/// assembles them. Cancelling `cancel` aborts the fetch with
/// [`PaginationError::Cancelled`]; fetcher errors are returned as
/// [`PaginationError::Fetch`].
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(column = %state.column(), sort_type = ?state.sort_type(), direction = ?state.direction())
)]
pub async fn paginate<R, F>(
    fetcher: &F,
    state: &CursorState<R::Column>,
    cancel: &CancellationToken,
) -> Result<Page<R>, PaginationError>
where
    R: Record + Send + Sync + 'static,
    F: Fetcher<R> + ?Sized,
{
    let filter = build_filter::<R>(state)?;
    let order = PhysicalOrder::resolve(state);
    let limit = state.limit();
    let fetch_limit = limit.checked_add(1).ok_or_else(|| {
        PaginationError::InvalidRequest(format!("limit {limit} leaves no room for a lookahead row"))
    })?;

    debug!(%filter, %order, limit, "fetching page");

    let predicate = filter.clone().compile::<R>();
    let query = FetchQuery {
        filter,
        order,
        limit: fetch_limit,
    };

    let rows = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            warn!("page fetch cancelled");
            return Err(PaginationError::Cancelled);
        },
        rows = fetcher.fetch(&query, &predicate, cancel) => rows,
    };

    let rows = rows.map_err(|err| {
        if cancel.is_cancelled() {
            warn!("page fetch cancelled");
            PaginationError::Cancelled
        } else {
            PaginationError::Fetch(err)
        }
    })?;

    let fetched = rows.len();
    if fetched > query.limit {
        warn!(fetched, limit = query.limit, "fetcher returned more rows than requested");
    }

    // Every row, the lookahead included, must carry a value: it may bound
    // this page or start the next one.
    let column = state.column();
    for row in &rows {
        PageCursor::of(row, column)?;
    }

    let (items, has_next) = assemble(rows, limit, state.direction());
    debug!(fetched, has_next, reversed = state.is_need_reverse(), "assembled page");

    Ok(Page {
        next_cursor: items.last().map(|r| PageCursor::of(r, column)).transpose()?,
        prev_cursor: items.first().map(|r| PageCursor::of(r, column)).transpose()?,
        items,
        has_next,
    })
}
