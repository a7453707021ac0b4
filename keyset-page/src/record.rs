//! The shape of a paginated record.

use std::fmt;

use crate::value::{ColumnType, SortValue};

/// An entity that can be paged by keyset.
///
/// Records expose a unique, monotonically assigned id and typed access to
/// their sortable columns. Nothing else about the record is assumed.
///
/// # Example
///
/// ```
/// use keyset_page::{ColumnType, Record, SortValue};
/// use std::fmt;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum OrderColumn {
///     Price,
/// }
///
/// impl fmt::Display for OrderColumn {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("price")
///     }
/// }
///
/// struct Order {
///     id: i64,
///     price: f64,
/// }
///
/// impl Record for Order {
///     type Column = OrderColumn;
///
///     fn id(&self) -> i64 {
///         self.id
///     }
///
///     fn column_type(_column: OrderColumn) -> ColumnType {
///         ColumnType::Float
///     }
///
///     fn value(&self, _column: OrderColumn) -> Option<SortValue> {
///         Some(SortValue::Float(self.price))
///     }
/// }
/// ```
pub trait Record {
    /// Identifier of a sortable column.
    type Column: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Unique, strictly increasing identifier.
    fn id(&self) -> i64;

    /// Declared type of a column.
    fn column_type(column: Self::Column) -> ColumnType;

    /// Current value of a column.
    ///
    /// `None` only for columns that are never paged on, such as text. A
    /// fetched row returning `None` for the sort column fails the page with
    /// [`PaginationError::MissingSortValue`](crate::PaginationError::MissingSortValue).
    fn value(&self, column: Self::Column) -> Option<SortValue>;
}
