//! Keyset filter construction.
//!
//! The filter is built once per request as a small expression tree so it can
//! be logged, inspected by a storage layer, or compiled into a [`Predicate`]
//! for in-memory evaluation.
//!
//! For a value column `c` with cursor `(v, id)` the filter is the standard
//! keyset tie-break:
//!
//! ```text
//! c ⋛ v OR (c = v AND id ⋛ cursor_id)
//! ```
//!
//! The operator on `c` is `>` when an ascending walk matches the paging
//! direction (see [`CursorState::is_same_direction_and_sort`]) and `<`
//! otherwise. The operator on `id` is `>` for `Next` and `<` for `Previous`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::PaginationError;
use crate::record::Record;
use crate::state::{CursorState, Direction, SortColumn};
use crate::value::{self, ColumnType, SortValue};

/// Comparison operators used by keyset filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal: `=`
    Eq,
    /// Greater than: `>`
    Gt,
    /// Less than: `<`
    Lt,
}

impl Operator {
    /// `Gt` when `greater` holds, `Lt` otherwise.
    #[inline]
    #[must_use]
    pub const fn greater_if(greater: bool) -> Self {
        if greater { Self::Gt } else { Self::Lt }
    }

    /// Whether an ordering of `record` against `bound` satisfies the operator.
    #[inline]
    #[must_use]
    pub const fn accepts(self, ordering: Ordering) -> bool {
        matches!(
            (self, ordering),
            (Self::Eq, Ordering::Equal) | (Self::Gt, Ordering::Greater) | (Self::Lt, Ordering::Less)
        )
    }

    /// SQL spelling of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

/// Logical operators for compound filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// All conditions must match: `AND`
    And,
    /// At least one condition must match: `OR`
    Or,
}

/// A single comparison against a cursor bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<C> {
    /// Compared column, or the id.
    pub column: SortColumn<C>,
    pub op: Operator,
    /// Cursor value the column is compared to.
    pub bound: SortValue,
}

/// A compound filter combining multiple expressions with a logical operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundFilter<C> {
    pub op: LogicalOp,
    pub filters: Vec<FilterExpr<C>>,
}

/// Keyset filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr<C> {
    /// No bound: matches every record.
    Always,
    /// A single comparison.
    Simple(Condition<C>),
    /// A compound filter.
    Compound(CompoundFilter<C>),
}

impl<C> FilterExpr<C> {
    fn simple(column: SortColumn<C>, op: Operator, bound: SortValue) -> Self {
        Self::Simple(Condition { column, op, bound })
    }

    fn and(filters: Vec<Self>) -> Self {
        Self::Compound(CompoundFilter {
            op: LogicalOp::And,
            filters,
        })
    }

    fn or(filters: Vec<Self>) -> Self {
        Self::Compound(CompoundFilter {
            op: LogicalOp::Or,
            filters,
        })
    }

    /// Returns `true` if the filter places no bound on records.
    pub const fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }

    /// Evaluate the filter against a record.
    ///
    /// A record without a value for a compared column, or with a value of
    /// another kind than the bound, does not match that comparison.
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Record<Column = C>,
        C: Copy,
    {
        match self {
            Self::Always => true,
            Self::Simple(cond) => cond
                .column
                .read(record)
                .and_then(|v| v.partial_compare(&cond.bound))
                .is_some_and(|ord| cond.op.accepts(ord)),
            Self::Compound(compound) => match compound.op {
                LogicalOp::And => compound.filters.iter().all(|f| f.matches(record)),
                LogicalOp::Or => compound.filters.iter().any(|f| f.matches(record)),
            },
        }
    }
}

impl<C: Copy + Send + Sync + 'static> FilterExpr<C> {
    /// Compile the filter into a predicate closure.
    pub fn compile<R>(self) -> Predicate<R>
    where
        R: Record<Column = C> + 'static,
    {
        if self.is_always() {
            return Predicate::always();
        }
        Predicate::new(move |record: &R| self.matches(record))
    }
}

impl<C: fmt::Display> fmt::Display for FilterExpr<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("TRUE"),
            Self::Simple(cond) => {
                write!(f, "{} {} {}", cond.column, cond.op.symbol(), cond.bound)
            },
            Self::Compound(compound) => {
                let joiner = match compound.op {
                    LogicalOp::And => " AND ",
                    LogicalOp::Or => " OR ",
                };
                for (i, filter) in compound.filters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(joiner)?;
                    }
                    if matches!(filter, Self::Compound(_)) {
                        write!(f, "({filter})")?;
                    } else {
                        write!(f, "{filter}")?;
                    }
                }
                Ok(())
            },
        }
    }
}

/// Build the keyset filter selecting the page described by `state`.
///
/// On an id-only sort the filter bounds the id alone; a first page uses the
/// extremal integer for the sort type. On a value column, a first page has no
/// bound at all.
pub fn build_filter<R: Record>(
    state: &CursorState<R::Column>,
) -> Result<FilterExpr<R::Column>, PaginationError> {
    let same = state.is_same_direction_and_sort();

    let column = match state.column() {
        SortColumn::Id => {
            let bound = match state.id() {
                Some(id) => SortValue::Int(id),
                None => value::decode(None, ColumnType::Int, state.sort_type(), state.direction())?,
            };
            return Ok(FilterExpr::simple(
                SortColumn::Id,
                Operator::greater_if(same),
                bound,
            ));
        },
        SortColumn::Field(column) => *column,
    };

    let column_type = R::column_type(column).ensure_orderable()?;
    let bound = value::decode(
        state.value(),
        column_type,
        state.sort_type(),
        state.direction(),
    )?;

    let Some(id) = state.id() else {
        return Ok(FilterExpr::Always);
    };

    let compare_value =
        FilterExpr::simple(SortColumn::Field(column), Operator::greater_if(same), bound);
    let equal_value = FilterExpr::simple(SortColumn::Field(column), Operator::Eq, bound);
    let compare_id = FilterExpr::simple(
        SortColumn::Id,
        Operator::greater_if(state.direction() == Direction::Next),
        SortValue::Int(id),
    );

    Ok(FilterExpr::or(vec![
        compare_value,
        FilterExpr::and(vec![equal_value, compare_id]),
    ]))
}

/// A boolean predicate over records.
///
/// Cheap to clone; combine with [`Predicate::and`] and [`Predicate::or`].
pub struct Predicate<R> {
    test: Arc<dyn Fn(&R) -> bool + Send + Sync>,
}

impl<R> Predicate<R> {
    /// Wrap a closure.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
        }
    }

    /// Predicate matching every record.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Evaluate the predicate.
    #[inline]
    pub fn test(&self, record: &R) -> bool {
        (self.test)(record)
    }
}

impl<R: 'static> Predicate<R> {
    /// Both predicates must hold.
    pub fn and(self, other: Self) -> Self {
        Self::new(move |r| self.test(r) && other.test(r))
    }

    /// At least one predicate must hold.
    pub fn or(self, other: Self) -> Self {
        Self::new(move |r| self.test(r) || other.test(r))
    }
}

impl<R> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
        }
    }
}

impl<R> fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}
