//! Cursor value decoding and first-page defaults.
//!
//! Raw cursor values arrive as a [`WireValue`] (the tagged variant a transport
//! layer produces) and are decoded into a [`SortValue`] matching the declared
//! [`ColumnType`] of the sort column. The set of orderable column types is
//! closed; each one has an explicit minimum and maximum used as the bound of a
//! first page.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PaginationError;
use crate::state::{Direction, SortType};

/// Declared type of a record column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// UTC date/time.
    DateTime,
    /// Boolean. Not usable as a cursor sort key.
    Bool,
    /// Free text. Not usable as a cursor sort key.
    Text,
}

impl ColumnType {
    /// Returns `true` if a cursor can be positioned on a column of this type.
    #[inline]
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::DateTime)
    }

    /// Fails with `UnsupportedColumnType` unless the type is orderable.
    pub const fn ensure_orderable(self) -> Result<Self, PaginationError> {
        if self.is_orderable() {
            Ok(self)
        } else {
            Err(PaginationError::UnsupportedColumnType(self))
        }
    }

    /// Smallest value of the type, used for an ascending first page.
    fn minimum(self) -> Result<SortValue, PaginationError> {
        match self {
            Self::Int => Ok(SortValue::Int(0)),
            Self::Float => Ok(SortValue::Float(0.0)),
            Self::DateTime => Ok(SortValue::DateTime(DateTime::<Utc>::MIN_UTC)),
            Self::Bool | Self::Text => Err(PaginationError::UnsupportedColumnType(self)),
        }
    }

    /// Largest representable value, used for a descending first page.
    fn maximum(self) -> Result<SortValue, PaginationError> {
        match self {
            Self::Int => Ok(SortValue::Int(i64::MAX)),
            Self::Float => Ok(SortValue::Float(f64::MAX)),
            Self::DateTime => Ok(SortValue::DateTime(DateTime::<Utc>::MAX_UTC)),
            Self::Bool | Self::Text => Err(PaginationError::UnsupportedColumnType(self)),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::DateTime => "datetime",
            Self::Bool => "bool",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// Wire timestamp: seconds since the Unix epoch plus non-negative nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since 1970-01-01T00:00:00Z.
    pub seconds: i64,
    /// Nanoseconds within the second, `0..1_000_000_000`.
    pub nanos: i32,
}

/// Raw cursor value as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireValue {
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Date/time in wire representation.
    Timestamp(Timestamp),
}

impl WireValue {
    /// Tag name used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

/// Typed comparison value of a sort column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue {
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// UTC date/time.
    DateTime(DateTime<Utc>),
}

impl SortValue {
    /// Column type this value belongs to.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::Int(_) => ColumnType::Int,
            Self::Float(_) => ColumnType::Float,
            Self::DateTime(_) => ColumnType::DateTime,
        }
    }

    /// Compare two values of the same kind.
    ///
    /// Returns `None` for values of different kinds and for NaN floats, so a
    /// comparison filter never matches them.
    #[must_use]
    pub fn partial_compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used when sorting rows in memory.
    ///
    /// Floats use `total_cmp`; mixed kinds order by kind.
    #[must_use]
    pub fn total_compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            _ => self
                .partial_compare(other)
                .unwrap_or_else(|| self.rank().cmp(&other.rank())),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Float(_) => 1,
            Self::DateTime(_) => 2,
        }
    }
}

impl fmt::Display for SortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "'{}'", v.to_rfc3339()),
        }
    }
}

/// Decode a raw cursor value into the comparison value for `target`.
///
/// With no raw value (first page) the result is the deterministic bound for
/// the request: the minimum for `Ascending`/`Next`, the maximum for
/// `Descending`/`Next`. A first page in the `Previous` direction is rejected.
pub fn decode(
    raw: Option<&WireValue>,
    target: ColumnType,
    sort_type: SortType,
    direction: Direction,
) -> Result<SortValue, PaginationError> {
    let target = target.ensure_orderable()?;

    let Some(raw) = raw else {
        return match (sort_type, direction) {
            (SortType::Ascending, Direction::Next) => target.minimum(),
            (SortType::Descending, Direction::Next) => target.maximum(),
            (_, Direction::Previous) => Err(PaginationError::UnsupportedFirstPage {
                sort_type,
                direction,
            }),
        };
    };

    let mismatch = || PaginationError::TypeMismatch {
        expected: target,
        found: raw.kind(),
    };

    match (raw, target) {
        (WireValue::Int(v), ColumnType::Int) => Ok(SortValue::Int(*v)),
        (WireValue::Float(v), ColumnType::Float) => Ok(SortValue::Float(*v)),
        (WireValue::Timestamp(ts), ColumnType::DateTime) => {
            let nanos = u32::try_from(ts.nanos)
                .ok()
                .filter(|n| *n < NANOS_PER_SEC)
                .ok_or_else(mismatch)?;
            DateTime::<Utc>::from_timestamp(ts.seconds, nanos)
                .map(SortValue::DateTime)
                .ok_or_else(mismatch)
        },
        _ => Err(mismatch()),
    }
}

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Encode a comparison value back into its wire representation.
///
/// A leap second carries its extra second into `seconds`, keeping `nanos`
/// within the range [`decode`] accepts.
#[must_use]
pub fn encode(value: &SortValue) -> WireValue {
    match value {
        SortValue::Int(v) => WireValue::Int(*v),
        SortValue::Float(v) => WireValue::Float(*v),
        SortValue::DateTime(dt) => {
            let nanos = dt.timestamp_subsec_nanos();
            WireValue::Timestamp(Timestamp {
                seconds: dt.timestamp() + i64::from(nanos / NANOS_PER_SEC),
                nanos: (nanos % NANOS_PER_SEC) as i32,
            })
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_matching_kinds() {
        let v = decode(
            Some(&WireValue::Int(42)),
            ColumnType::Int,
            SortType::Ascending,
            Direction::Next,
        )
        .unwrap();
        assert_eq!(v, SortValue::Int(42));

        let v = decode(
            Some(&WireValue::Float(1.5)),
            ColumnType::Float,
            SortType::Descending,
            Direction::Previous,
        )
        .unwrap();
        assert_eq!(v, SortValue::Float(1.5));
    }

    #[test]
    fn test_decode_timestamp_normalizes_to_datetime() {
        let raw = WireValue::Timestamp(Timestamp {
            seconds: 1_700_000_000,
            nanos: 250_000_000,
        });
        let v = decode(
            Some(&raw),
            ColumnType::DateTime,
            SortType::Ascending,
            Direction::Next,
        )
        .unwrap();

        let SortValue::DateTime(dt) = v else {
            panic!("expected datetime, got {v:?}");
        };
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert_eq!(dt.timestamp_subsec_millis(), 250);
        assert_eq!(encode(&v), raw);
    }

    #[test]
    fn test_decode_rejects_mismatch() {
        let err = decode(
            Some(&WireValue::Int(1)),
            ColumnType::DateTime,
            SortType::Ascending,
            Direction::Next,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PaginationError::TypeMismatch {
                expected: ColumnType::DateTime,
                found: "int"
            }
        ));

        // No implicit widening from int to float.
        let err = decode(
            Some(&WireValue::Int(1)),
            ColumnType::Float,
            SortType::Ascending,
            Direction::Next,
        )
        .unwrap_err();
        assert!(matches!(err, PaginationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_encode_leap_second_stays_decodable() {
        let leap = chrono::NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 1_500_000_000)
            .unwrap()
            .and_utc();
        assert_eq!(leap.timestamp_subsec_nanos(), 1_500_000_000);

        let wire = encode(&SortValue::DateTime(leap));
        assert_eq!(
            wire,
            WireValue::Timestamp(Timestamp {
                seconds: 1_483_228_800,
                nanos: 500_000_000,
            })
        );

        let decoded = decode(
            Some(&wire),
            ColumnType::DateTime,
            SortType::Ascending,
            Direction::Next,
        )
        .unwrap();
        let SortValue::DateTime(dt) = decoded else {
            panic!("expected datetime, got {decoded:?}");
        };
        assert_eq!(dt.to_rfc3339(), "2017-01-01T00:00:00.500+00:00");
    }

    #[test]
    fn test_decode_rejects_bad_nanos() {
        let raw = WireValue::Timestamp(Timestamp {
            seconds: 0,
            nanos: -1,
        });
        let err = decode(
            Some(&raw),
            ColumnType::DateTime,
            SortType::Ascending,
            Direction::Next,
        )
        .unwrap_err();
        assert!(matches!(err, PaginationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_first_page_defaults() {
        let asc = |t| decode(None, t, SortType::Ascending, Direction::Next).unwrap();
        let desc = |t| decode(None, t, SortType::Descending, Direction::Next).unwrap();

        assert_eq!(asc(ColumnType::Int), SortValue::Int(0));
        assert_eq!(asc(ColumnType::Float), SortValue::Float(0.0));
        assert_eq!(
            asc(ColumnType::DateTime),
            SortValue::DateTime(DateTime::<Utc>::MIN_UTC)
        );

        assert_eq!(desc(ColumnType::Int), SortValue::Int(i64::MAX));
        assert_eq!(desc(ColumnType::Float), SortValue::Float(f64::MAX));
        assert_eq!(
            desc(ColumnType::DateTime),
            SortValue::DateTime(DateTime::<Utc>::MAX_UTC)
        );
    }

    #[test]
    fn test_first_page_previous_is_rejected() {
        for sort_type in [SortType::Ascending, SortType::Descending] {
            let err = decode(None, ColumnType::Int, sort_type, Direction::Previous).unwrap_err();
            assert!(matches!(err, PaginationError::UnsupportedFirstPage { .. }));
        }
    }

    #[test]
    fn test_unorderable_column_types() {
        for t in [ColumnType::Bool, ColumnType::Text] {
            let err = decode(None, t, SortType::Ascending, Direction::Next).unwrap_err();
            assert!(matches!(err, PaginationError::UnsupportedColumnType(_)));
        }
    }

    #[test]
    fn test_partial_compare_across_kinds() {
        assert_eq!(
            SortValue::Int(1).partial_compare(&SortValue::Float(1.0)),
            None
        );
        assert_eq!(
            SortValue::Float(f64::NAN).partial_compare(&SortValue::Float(1.0)),
            None
        );
        assert_eq!(
            SortValue::Float(f64::NAN).total_compare(&SortValue::Float(1.0)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_wire_value_serde_shape() {
        let json = serde_json::to_string(&WireValue::Int(7)).unwrap();
        assert_eq!(json, r#"{"int":7}"#);

        let parsed: WireValue =
            serde_json::from_str(r#"{"timestamp":{"seconds":10,"nanos":0}}"#).unwrap();
        assert_eq!(
            parsed,
            WireValue::Timestamp(Timestamp {
                seconds: 10,
                nanos: 0
            })
        );
    }
}
