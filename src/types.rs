//! Common types used throughout warehouse-bench
//!
//! The central piece is [`CellValue`], the tagged union every driver value is
//! converted into before it reaches the CSV writer. Each variant has one
//! fixed display rule so the output does not depend on driver formatting.

use base64::Engine as _;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Ordered column names of a result set
pub type ColumnList = Vec<String>;

/// One row of values, positionally aligned with a [`ColumnList`]
pub type Record = Vec<CellValue>;

// ============================================================================
// Cell Values
// ============================================================================

/// A single value read from a result set
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Unsigned(u64),
    HugeInt(i128),
    Float(f32),
    Double(f64),
    /// Exact decimal text as produced by the driver
    Decimal(String),
    Text(String),
    Blob(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    /// UTC timestamp without offset
    Timestamp(NaiveDateTime),
    Interval {
        months: i32,
        days: i32,
        nanos: i64,
    },
    List(Vec<CellValue>),
    Struct(Vec<(String, CellValue)>),
    Map(Vec<(CellValue, CellValue)>),
}

impl CellValue {
    /// Check if the value is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Render the value as a CSV field before escaping
    ///
    /// NULL becomes the empty string; everything else uses its display rule.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Unsigned(u) => write!(f, "{u}"),
            CellValue::HugeInt(i) => write!(f, "{i}"),
            // Display is the shortest round-trip form and never uses an exponent
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Double(x) => write!(f, "{x}"),
            CellValue::Decimal(d) => f.write_str(d),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Blob(b) => {
                f.write_str(&base64::engine::general_purpose::STANDARD.encode(b))
            }
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            CellValue::Interval {
                months,
                days,
                nanos,
            } => fmt_interval(f, *months, *days, *nanos),
            CellValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            CellValue::Struct(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
            CellValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// ISO 8601 duration: `P{months}M{days}DT{seconds}S`
fn fmt_interval(f: &mut fmt::Formatter<'_>, months: i32, days: i32, nanos: i64) -> fmt::Result {
    let sign = if nanos < 0 { "-" } else { "" };
    let abs = nanos.unsigned_abs();
    let secs = abs / 1_000_000_000;
    let frac = abs % 1_000_000_000;
    if frac == 0 {
        write!(f, "P{months}M{days}DT{sign}{secs}S")
    } else {
        let frac = format!("{frac:09}");
        write!(
            f,
            "P{months}M{days}DT{sign}{secs}.{}S",
            frac.trim_end_matches('0')
        )
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Double(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}
