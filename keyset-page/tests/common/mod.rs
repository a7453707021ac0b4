//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use keyset_page::prelude::*;
use tracing_subscriber::EnvFilter;

/// Send library logs to the test writer; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sortable columns of [`Ticket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketColumn {
    Price,
    Weight,
    Created,
    Title,
}

impl fmt::Display for TicketColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price => f.write_str("price"),
            Self::Weight => f.write_str("weight"),
            Self::Created => f.write_str("created"),
            Self::Title => f.write_str("title"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: i64,
    pub price: i64,
    pub weight: f64,
    pub created: DateTime<Utc>,
    pub title: String,
}

impl Record for Ticket {
    type Column = TicketColumn;

    fn id(&self) -> i64 {
        self.id
    }

    fn column_type(column: TicketColumn) -> ColumnType {
        match column {
            TicketColumn::Price => ColumnType::Int,
            TicketColumn::Weight => ColumnType::Float,
            TicketColumn::Created => ColumnType::DateTime,
            TicketColumn::Title => ColumnType::Text,
        }
    }

    fn value(&self, column: TicketColumn) -> Option<SortValue> {
        match column {
            TicketColumn::Price => Some(SortValue::Int(self.price)),
            TicketColumn::Weight => Some(SortValue::Float(self.weight)),
            TicketColumn::Created => Some(SortValue::DateTime(self.created)),
            TicketColumn::Title => None,
        }
    }
}

pub fn ticket(price: i64, id: i64) -> Ticket {
    Ticket {
        id,
        price,
        weight: price as f64 / 4.0,
        created: Utc.timestamp_opt(1_700_000_000 + price * 60, 0).unwrap(),
        title: format!("ticket-{id}"),
    }
}

/// Records `(10,1), (10,2), (20,3), (20,4), (30,5)`.
pub fn sample() -> Vec<Ticket> {
    vec![
        ticket(10, 1),
        ticket(10, 2),
        ticket(20, 3),
        ticket(20, 4),
        ticket(30, 5),
    ]
}

pub fn pairs(page: &Page<Ticket>) -> Vec<(i64, i64)> {
    page.items.iter().map(|t| (t.price, t.id)).collect()
}

pub fn state(
    sort: Sort<TicketColumn>,
    request: PageRequest,
) -> CursorState<TicketColumn> {
    request
        .into_state(sort, &PaginationConfig::default())
        .unwrap()
}

pub async fn fetch_page(
    fetcher: &MemoryFetcher<Ticket>,
    sort: Sort<TicketColumn>,
    request: PageRequest,
) -> Page<Ticket> {
    init_tracing();
    paginate(fetcher, &state(sort, request), &CancellationToken::new())
        .await
        .unwrap()
}
