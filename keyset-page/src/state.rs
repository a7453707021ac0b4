//! Page request state: column, sort type, direction and cursor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PaginationError;
use crate::record::Record;
use crate::value::{SortValue, WireValue};

/// Configured natural order of the sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}

/// Which way the caller pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Page after the cursor.
    #[default]
    Next,
    /// Page before the cursor.
    Previous,
}

/// Physical sort direction applied to a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDir {
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,
}

impl SortDir {
    /// `Asc` when `ascending` holds, `Desc` otherwise.
    #[inline]
    #[must_use]
    pub const fn ascending_if(ascending: bool) -> Self {
        if ascending { Self::Asc } else { Self::Desc }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

/// Sort key of a page request: a record column, or the id alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn<C> {
    /// Sort by record id only.
    Id,
    /// Sort by a record column, ties broken by id.
    Field(C),
}

impl<C> SortColumn<C> {
    /// Returns `true` for the id-only sentinel.
    #[inline]
    #[must_use]
    pub const fn is_id(&self) -> bool {
        matches!(self, Self::Id)
    }
}

impl<C: Copy> SortColumn<C> {
    /// Read the sort value of `record` for this column.
    pub fn read<R: Record<Column = C>>(&self, record: &R) -> Option<SortValue> {
        match self {
            Self::Id => Some(SortValue::Int(record.id())),
            Self::Field(column) => record.value(*column),
        }
    }
}

impl<C: fmt::Display> fmt::Display for SortColumn<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Field(column) => column.fmt(f),
        }
    }
}

/// Immutable description of one page request.
///
/// Built once per request and dropped after the fetch. The invariants below
/// hold for every constructed value:
///
/// - `0 < limit < usize::MAX`, so `limit + 1` rows can always be requested
/// - `value` and `id` are either both present or both absent, except for
///   [`SortColumn::Id`], where only `id` is used
/// - a request without a cursor pages `Next`
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState<C> {
    column: SortColumn<C>,
    sort_type: SortType,
    direction: Direction,
    value: Option<WireValue>,
    id: Option<i64>,
    limit: usize,
}

impl<C> CursorState<C> {
    /// State for the first page of a listing.
    pub fn first_page(
        column: SortColumn<C>,
        sort_type: SortType,
        limit: usize,
    ) -> Result<Self, PaginationError> {
        Self::new(column, sort_type, Direction::Next, None, None, limit)
    }

    /// Validate and build a cursor state.
    pub fn new(
        column: SortColumn<C>,
        sort_type: SortType,
        direction: Direction,
        value: Option<WireValue>,
        id: Option<i64>,
        limit: usize,
    ) -> Result<Self, PaginationError> {
        if limit == 0 {
            return Err(PaginationError::InvalidRequest(
                "limit must be positive".to_string(),
            ));
        }
        if limit == usize::MAX {
            return Err(PaginationError::InvalidRequest(format!(
                "limit must be below {}",
                usize::MAX
            )));
        }

        let value = if column.is_id() { None } else { value };
        if !column.is_id() && value.is_some() != id.is_some() {
            return Err(PaginationError::InvalidRequest(
                "cursor value and id must be supplied together".to_string(),
            ));
        }

        if id.is_none() && direction == Direction::Previous {
            return Err(PaginationError::UnsupportedFirstPage {
                sort_type,
                direction,
            });
        }

        Ok(Self {
            column,
            sort_type,
            direction,
            value,
            id,
            limit,
        })
    }

    /// Sort key.
    pub const fn column(&self) -> &SortColumn<C> {
        &self.column
    }

    /// Configured sort type of the column.
    pub const fn sort_type(&self) -> SortType {
        self.sort_type
    }

    /// Navigation direction.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Last-seen value of the column, if any.
    pub const fn value(&self) -> Option<&WireValue> {
        self.value.as_ref()
    }

    /// Last-seen id, if any.
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    /// Page size.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` when no cursor was supplied.
    pub const fn is_first_page(&self) -> bool {
        self.id.is_none()
    }

    /// Whether an ascending physical walk already moves the way the caller pages.
    ///
    /// Decides the comparison on the value column and the primary physical
    /// order. The id comparison and the tie-break order follow `direction`
    /// alone.
    pub fn is_same_direction_and_sort(&self) -> bool {
        same_direction_and_sort(self.sort_type, self.direction)
    }

    /// Whether the fetched rows are the mirror image of the caller's order.
    pub fn is_need_reverse(&self) -> bool {
        need_reverse(self.sort_type, self.direction)
    }
}

/// `(Ascending, Next)` or `(Descending, Previous)`.
#[inline]
#[must_use]
pub fn same_direction_and_sort(sort_type: SortType, direction: Direction) -> bool {
    matches!(
        (sort_type, direction),
        (SortType::Ascending, Direction::Next) | (SortType::Descending, Direction::Previous)
    )
}

/// Whether a page fetched in physical order must be reversed for the caller.
///
/// Equal to `direction == Previous` for every sort type; see
/// [`need_reverse_long_form`] for the derivation from the physical order.
#[inline]
#[must_use]
pub fn need_reverse(_sort_type: SortType, direction: Direction) -> bool {
    direction == Direction::Previous
}

/// Reverse condition stated over the physical primary order.
///
/// An ascending fetch of a descending column, or a descending fetch of an
/// ascending column, comes back mirrored.
#[inline]
#[must_use]
pub fn need_reverse_long_form(sort_type: SortType, direction: Direction) -> bool {
    let same = same_direction_and_sort(sort_type, direction);
    (same && sort_type == SortType::Descending) || (!same && sort_type == SortType::Ascending)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [(SortType, Direction); 4] = [
        (SortType::Ascending, Direction::Next),
        (SortType::Ascending, Direction::Previous),
        (SortType::Descending, Direction::Next),
        (SortType::Descending, Direction::Previous),
    ];

    #[test]
    fn test_same_direction_and_sort_table() {
        let expected = [true, false, false, true];
        for ((sort_type, direction), want) in ALL.into_iter().zip(expected) {
            assert_eq!(
                same_direction_and_sort(sort_type, direction),
                want,
                "{sort_type:?}/{direction:?}"
            );
        }
    }

    #[test]
    fn test_need_reverse_matches_long_form() {
        for (sort_type, direction) in ALL {
            let long = need_reverse_long_form(sort_type, direction);
            assert_eq!(long, need_reverse(sort_type, direction));
            assert_eq!(long, direction == Direction::Previous);
        }
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err =
            CursorState::<()>::first_page(SortColumn::Id, SortType::Ascending, 0).unwrap_err();
        assert!(matches!(err, PaginationError::InvalidRequest(_)));
    }

    #[test]
    fn test_limit_leaves_room_for_extra_row() {
        let column = SortColumn::Field(());
        let err = CursorState::first_page(column, SortType::Ascending, usize::MAX).unwrap_err();
        assert!(matches!(err, PaginationError::InvalidRequest(_)));

        let state = CursorState::first_page(column, SortType::Ascending, usize::MAX - 1).unwrap();
        assert_eq!(state.limit().checked_add(1), Some(usize::MAX));
    }

    #[test]
    fn test_half_cursor_rejected() {
        let err = CursorState::new(
            SortColumn::Field(()),
            SortType::Ascending,
            Direction::Next,
            Some(WireValue::Int(10)),
            None,
            10,
        )
        .unwrap_err();
        assert!(matches!(err, PaginationError::InvalidRequest(_)));

        let err = CursorState::new(
            SortColumn::Field(()),
            SortType::Ascending,
            Direction::Next,
            None,
            Some(3),
            10,
        )
        .unwrap_err();
        assert!(matches!(err, PaginationError::InvalidRequest(_)));
    }

    #[test]
    fn test_id_column_ignores_value() {
        let state = CursorState::new(
            SortColumn::<()>::Id,
            SortType::Descending,
            Direction::Previous,
            Some(WireValue::Float(2.0)),
            Some(9),
            5,
        )
        .unwrap();
        assert_eq!(state.value(), None);
        assert_eq!(state.id(), Some(9));
        assert!(!state.is_first_page());
    }

    #[test]
    fn test_first_page_previous_rejected() {
        let err = CursorState::new(
            SortColumn::<()>::Id,
            SortType::Ascending,
            Direction::Previous,
            None,
            None,
            5,
        )
        .unwrap_err();
        assert!(matches!(err, PaginationError::UnsupportedFirstPage { .. }));
    }
}
