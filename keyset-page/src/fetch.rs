//! The fetch capability consumed by the paginator.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::BoxError;
use crate::filter::{FilterExpr, Predicate};
use crate::order::PhysicalOrder;
use crate::record::Record;

/// What a fetcher must return: rows matching `filter`, in `order`, at most
/// `limit` of them.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchQuery<C> {
    /// Keyset filter, in structural form.
    pub filter: FilterExpr<C>,
    /// Physical order of the returned rows.
    pub order: PhysicalOrder<C>,
    /// Maximum number of rows, one more than the page size.
    pub limit: usize,
}

/// Asynchronous row source behind a paginated listing.
///
/// Implementations translate the query into their storage engine (or
/// evaluate `predicate`, the compiled form of `query.filter`) and must honor
/// the order and the limit exactly. `cancel` is signalled when the caller
/// gives up; a fetcher should abort its in-flight work when it fires.
#[async_trait]
pub trait Fetcher<R>: Send + Sync
where
    R: Record + Send + Sync + 'static,
{
    /// Fetch one window of rows.
    async fn fetch(
        &self,
        query: &FetchQuery<R::Column>,
        predicate: &Predicate<R>,
        cancel: &CancellationToken,
    ) -> Result<Vec<R>, BoxError>;
}

/// Returned by [`MemoryFetcher`] when the fetch was cancelled before it ran.
#[derive(Debug, thiserror::Error)]
#[error("fetch cancelled")]
pub struct FetchCancelled;

/// Fetcher over records held in memory.
///
/// Useful for tests and for paging collections that were already loaded.
/// An optional scope predicate restricts the rows visible to every page.
#[derive(Debug, Clone)]
pub struct MemoryFetcher<R> {
    rows: Arc<[R]>,
    scope: Predicate<R>,
}

impl<R> MemoryFetcher<R> {
    /// Page over all `rows`.
    pub fn new(rows: impl Into<Arc<[R]>>) -> Self {
        Self {
            rows: rows.into(),
            scope: Predicate::always(),
        }
    }

    /// Restrict every page to rows matching `scope`.
    pub fn with_scope(mut self, scope: Predicate<R>) -> Self {
        self.scope = scope;
        self
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no rows are held.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl<R> Fetcher<R> for MemoryFetcher<R>
where
    R: Record + Clone + Send + Sync + 'static,
{
    async fn fetch(
        &self,
        query: &FetchQuery<R::Column>,
        predicate: &Predicate<R>,
        cancel: &CancellationToken,
    ) -> Result<Vec<R>, BoxError> {
        if cancel.is_cancelled() {
            return Err(Box::new(FetchCancelled));
        }

        let filter = self.scope.clone().and(predicate.clone());
        let mut matched: Vec<&R> = self.rows.iter().filter(|r| filter.test(r)).collect();
        matched.sort_by(|a, b| query.order.compare(*a, *b));

        Ok(matched.into_iter().take(query.limit).cloned().collect())
    }
}
