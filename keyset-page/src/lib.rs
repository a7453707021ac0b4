// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::return_self_not_must_use)] // Builder methods return Self
#![allow(clippy::cast_possible_wrap)] // Sub-second nanos always fit in i32
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing))]

//! # keyset-page - Keyset Pagination with Id Tie-Break
//!
//! Pages through an ordered collection by remembering the boundary record
//! (its sort value and unique id) instead of an offset. Each request moves
//! `Next` or `Previous` from that boundary over a column sorted `Ascending`
//! or `Descending`.
//!
//! ## How a page is fetched
//!
//! | Sort       | Direction  | Value filter | Id tie-break | Physical order     | Reversed |
//! |------------|------------|--------------|--------------|--------------------|----------|
//! | Ascending  | Next       | `c > v`      | `id > i`     | `c ASC, id ASC`    | no       |
//! | Ascending  | Previous   | `c < v`      | `id < i`     | `c DESC, id DESC`  | yes      |
//! | Descending | Next       | `c < v`      | `id > i`     | `c DESC, id ASC`   | no       |
//! | Descending | Previous   | `c > v`      | `id < i`     | `c ASC, id DESC`   | yes      |
//!
//! The filter is `c ⋛ v OR (c = v AND id ⋛ i)`. One row more than the page
//! size is fetched; its presence sets `has_next`.
//!
//! ## Quick Start
//!
//! ```
//! # use keyset_page::prelude::*;
//! # use std::fmt;
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! struct Price;
//!
//! impl fmt::Display for Price {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         f.write_str("price")
//!     }
//! }
//!
//! #[derive(Debug, Clone)]
//! struct Item {
//!     id: i64,
//!     price: i64,
//! }
//!
//! impl Record for Item {
//!     type Column = Price;
//!     fn id(&self) -> i64 { self.id }
//!     fn column_type(_: Price) -> ColumnType { ColumnType::Int }
//!     fn value(&self, _: Price) -> Option<SortValue> { Some(SortValue::Int(self.price)) }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let rows = vec![
//!     Item { id: 1, price: 10 },
//!     Item { id: 2, price: 10 },
//!     Item { id: 3, price: 20 },
//! ];
//! let fetcher = MemoryFetcher::new(rows);
//! let sort = Sort::ascending(SortColumn::Field(Price));
//! let config = PaginationConfig::default();
//! let cancel = CancellationToken::new();
//!
//! let state = PageRequest::default().with_limit(2).into_state(sort, &config)?;
//! let page = paginate(&fetcher, &state, &cancel).await?;
//! assert_eq!(page.items.iter().map(|i| i.id).collect::<Vec<_>>(), [1, 2]);
//! assert!(page.has_next);
//!
//! let cursor = page.next_cursor.unwrap();
//! let state = PageRequest::after(cursor).with_limit(2).into_state(sort, &config)?;
//! let page = paginate(&fetcher, &state, &cancel).await?;
//! assert_eq!(page.items.iter().map(|i| i.id).collect::<Vec<_>>(), [3]);
//! assert!(!page.has_next);
//! # Ok::<(), PaginationError>(())
//! # }).unwrap();
//! ```

mod config;
mod error;
mod fetch;
mod filter;
mod order;
mod page;
mod record;
mod request;
mod state;
mod value;

pub use config::{ConfigError, DEFAULT_LIMIT, DEFAULT_LIMIT_ENV, PaginationConfig};
pub use error::{BoxError, PaginationError};
pub use fetch::{FetchCancelled, FetchQuery, Fetcher, MemoryFetcher};
pub use filter::{
    CompoundFilter, Condition, FilterExpr, LogicalOp, Operator, Predicate, build_filter,
};
pub use order::PhysicalOrder;
pub use page::{Page, PageCursor, assemble, paginate};
pub use record::Record;
pub use request::{PageRequest, Sort};
pub use state::{
    CursorState, Direction, SortColumn, SortDir, SortType, need_reverse, need_reverse_long_form,
    same_direction_and_sort,
};
pub use value::{ColumnType, SortValue, Timestamp, WireValue, decode, encode};

/// Re-exported so fetchers and callers share one cancellation type.
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports.
///
/// ```
/// use keyset_page::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CancellationToken, ColumnType, CursorState, Direction, Fetcher, MemoryFetcher, Page,
        PageCursor, PageRequest, PaginationConfig, PaginationError, Record, Sort, SortColumn,
        SortType, SortValue, WireValue, paginate,
    };
}
