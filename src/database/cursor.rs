//! DuckDB result cursor and value conversion

use crate::error::{Error, Result};
use crate::output::ResultCursor;
use crate::types::{CellValue, ColumnList, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use duckdb::types::{TimeUnit, Value};
use duckdb::Rows;

/// Forward-only cursor over the rows of an executed DuckDB statement
///
/// Borrowed from [`DatabaseEngine::with_cursor`](super::DatabaseEngine::with_cursor);
/// the statement is released when that call returns.
pub struct DuckDbCursor<'stmt> {
    rows: Rows<'stmt>,
    columns: Option<ColumnList>,
    position: usize,
}

impl<'stmt> DuckDbCursor<'stmt> {
    pub(crate) fn new(rows: Rows<'stmt>) -> Self {
        let columns = rows.as_ref().map(duckdb::Statement::column_names);
        Self {
            rows,
            columns,
            position: 0,
        }
    }

    /// Number of records read so far
    pub fn position(&self) -> usize {
        self.position
    }
}

impl ResultCursor for DuckDbCursor<'_> {
    fn columns(&self) -> Result<ColumnList> {
        self.columns
            .clone()
            .ok_or_else(|| Error::schema("statement was not executed"))
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        let row_number = self.position + 1;
        let width = self.columns.as_ref().map_or(0, Vec::len);

        let row = match self.rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(Error::row_decode(row_number, e.to_string())),
        };

        let mut record = Vec::with_capacity(width);
        for idx in 0..width {
            let value: Value = row
                .get(idx)
                .map_err(|e| Error::row_decode(row_number, format!("column {idx}: {e}")))?;
            let cell = cell_from_duckdb(value)
                .map_err(|e| Error::row_decode(row_number, format!("column {idx}: {e}")))?;
            record.push(cell);
        }

        self.position = row_number;
        Ok(Some(record))
    }
}

/// DuckDB encodes `infinity` and `-infinity` as the extreme values of the
/// underlying integer
const DATE_INFINITY: i32 = i32::MAX;
const TIMESTAMP_INFINITY: i64 = i64::MAX;

/// 24:00:00, the upper bound of DuckDB's TIME type
const END_OF_DAY_NANOS: i128 = 86_400 * 1_000_000_000;

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a DuckDB value into a [`CellValue`]
///
/// Fails for values with no text rendering (out-of-range temporals, types
/// this crate does not know about). The error is the reason, without row
/// context.
pub fn cell_from_duckdb(value: Value) -> std::result::Result<CellValue, String> {
    let cell = match value {
        Value::Null => CellValue::Null,
        Value::Boolean(b) => CellValue::Boolean(b),
        Value::TinyInt(i) => CellValue::Integer(i.into()),
        Value::SmallInt(i) => CellValue::Integer(i.into()),
        Value::Int(i) => CellValue::Integer(i.into()),
        Value::BigInt(i) => CellValue::Integer(i),
        Value::HugeInt(i) => CellValue::HugeInt(i),
        Value::UTinyInt(i) => CellValue::Unsigned(i.into()),
        Value::USmallInt(i) => CellValue::Unsigned(i.into()),
        Value::UInt(i) => CellValue::Unsigned(i.into()),
        Value::UBigInt(i) => CellValue::Unsigned(i),
        Value::Float(f) => CellValue::Float(f),
        Value::Double(f) => CellValue::Double(f),
        Value::Decimal(d) => CellValue::Decimal(d.to_string()),
        Value::Text(s) | Value::Enum(s) => CellValue::Text(s),
        Value::Blob(b) => CellValue::Blob(b),
        Value::Timestamp(_, TIMESTAMP_INFINITY) => infinity(false),
        Value::Timestamp(_, t) if t == -TIMESTAMP_INFINITY => infinity(true),
        Value::Timestamp(unit, t) => timestamp_from_nanos(to_nanos(unit, t))
            .map(CellValue::Timestamp)
            .ok_or_else(|| format!("timestamp {t} out of range"))?,
        Value::Date32(DATE_INFINITY) => infinity(false),
        Value::Date32(d) if d == -DATE_INFINITY => infinity(true),
        Value::Date32(d) => d
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(CellValue::Date)
            .ok_or_else(|| format!("date {d} days from epoch out of range"))?,
        Value::Time64(unit, t) => {
            let nanos = to_nanos(unit, t);
            match time_from_nanos(nanos) {
                Some(time) => CellValue::Time(time),
                None if nanos == END_OF_DAY_NANOS => CellValue::Text("24:00:00".to_string()),
                None => return Err(format!("time {t} out of range")),
            }
        }
        Value::Interval {
            months,
            days,
            nanos,
        } => CellValue::Interval {
            months,
            days,
            nanos,
        },
        Value::List(items) | Value::Array(items) => CellValue::List(
            items
                .into_iter()
                .map(cell_from_duckdb)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Value::Struct(fields) => CellValue::Struct(
            fields
                .iter()
                .map(|(name, v)| -> std::result::Result<_, String> {
                    Ok((name.clone(), cell_from_duckdb(v.clone())?))
                })
                .collect::<std::result::Result<_, _>>()?,
        ),
        Value::Map(entries) => CellValue::Map(
            entries
                .iter()
                .map(|(k, v)| -> std::result::Result<_, String> {
                    Ok((cell_from_duckdb(k.clone())?, cell_from_duckdb(v.clone())?))
                })
                .collect::<std::result::Result<_, _>>()?,
        ),
        Value::Union(inner) => cell_from_duckdb(*inner)?,
        #[allow(unreachable_patterns)]
        _ => return Err("unsupported value type".to_string()),
    };
    Ok(cell)
}

fn infinity(negative: bool) -> CellValue {
    let text = if negative { "-infinity" } else { "infinity" };
    CellValue::Text(text.to_string())
}

fn to_nanos(unit: TimeUnit, value: i64) -> i128 {
    let value = i128::from(value);
    match unit {
        TimeUnit::Second => value * 1_000_000_000,
        TimeUnit::Millisecond => value * 1_000_000,
        TimeUnit::Microsecond => value * 1_000,
        TimeUnit::Nanosecond => value,
    }
}

fn timestamp_from_nanos(nanos: i128) -> Option<NaiveDateTime> {
    let secs = i64::try_from(nanos.div_euclid(1_000_000_000)).ok()?;
    let sub = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, sub).map(|dt| dt.naive_utc())
}

fn time_from_nanos(nanos: i128) -> Option<NaiveTime> {
    let secs = u32::try_from(nanos.div_euclid(1_000_000_000)).ok()?;
    let sub = nanos.rem_euclid(1_000_000_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, sub)
}
