//! Physical fetch order for a page request.

use std::cmp::Ordering;
use std::fmt;

use crate::record::Record;
use crate::state::{CursorState, Direction, SortColumn, SortDir};

/// Order in which rows must be fetched so that `LIMIT` keeps the rows
/// nearest to the cursor.
///
/// The primary key walks away from the cursor boundary; ties on the primary
/// key are broken by id, ascending for `Next` and descending for `Previous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalOrder<C> {
    /// Sort key and its direction.
    pub primary: (SortColumn<C>, SortDir),
    /// Direction of the id tie-break.
    pub secondary: SortDir,
}

impl<C: Copy> PhysicalOrder<C> {
    /// Resolve the physical order of `state`.
    pub fn resolve(state: &CursorState<C>) -> Self {
        Self {
            primary: (
                *state.column(),
                SortDir::ascending_if(state.is_same_direction_and_sort()),
            ),
            secondary: SortDir::ascending_if(state.direction() == Direction::Next),
        }
    }

    /// Compare two records in fetch order.
    pub fn compare<R: Record<Column = C>>(&self, a: &R, b: &R) -> Ordering {
        let (column, dir) = self.primary;
        let primary = match (column.read(a), column.read(b)) {
            (Some(x), Some(y)) => x.total_compare(&y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        apply(primary, dir).then_with(|| apply(a.id().cmp(&b.id()), self.secondary))
    }
}

fn apply(ordering: Ordering, dir: SortDir) -> Ordering {
    match dir {
        SortDir::Asc => ordering,
        SortDir::Desc => ordering.reverse(),
    }
}

impl<C: fmt::Display> fmt::Display for PhysicalOrder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (column, dir) = &self.primary;
        write!(f, "{column} {dir}, id {}", self.secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SortType;
    use crate::value::WireValue;

    fn order(sort_type: SortType, direction: Direction) -> PhysicalOrder<&'static str> {
        let state = CursorState::new(
            SortColumn::Field("price"),
            sort_type,
            direction,
            Some(WireValue::Int(1)),
            Some(1),
            10,
        )
        .unwrap();
        PhysicalOrder::resolve(&state)
    }

    #[test]
    fn test_resolve_all_combinations() {
        assert_eq!(
            order(SortType::Ascending, Direction::Next).to_string(),
            "price ASC, id ASC"
        );
        assert_eq!(
            order(SortType::Ascending, Direction::Previous).to_string(),
            "price DESC, id DESC"
        );
        assert_eq!(
            order(SortType::Descending, Direction::Next).to_string(),
            "price DESC, id ASC"
        );
        assert_eq!(
            order(SortType::Descending, Direction::Previous).to_string(),
            "price ASC, id DESC"
        );
    }

    #[test]
    fn test_resolve_id_column() {
        let state =
            CursorState::<&str>::first_page(SortColumn::Id, SortType::Descending, 10).unwrap();
        assert_eq!(PhysicalOrder::resolve(&state).to_string(), "id DESC, id ASC");
    }
}
