//! Result cursor abstraction
//!
//! A cursor is a forward-only, single-consumption sequence of records. The
//! column list must be available before the first record is read, including
//! for an empty result set.
//!
//! Cursors are owned by the caller. An exporter borrows one for the length of
//! a single export; handing the same cursor to a second export observes an
//! exhausted cursor and is a caller error.

use crate::error::Result;
use crate::types::{ColumnList, Record};
use std::collections::VecDeque;

/// Forward-only cursor over a relational result set
///
/// Implementations may return any [`Error`](crate::Error); the exporter
/// reports a failing `columns` as `SchemaUnavailable` and a failing
/// `next_record` as `RowDecodeFailure` for the row being fetched.
pub trait ResultCursor {
    /// Ordered column names for every record this cursor yields
    fn columns(&self) -> Result<ColumnList>;

    /// Advance and materialize the next record
    ///
    /// Returns `Ok(None)` once the cursor is exhausted.
    fn next_record(&mut self) -> Result<Option<Record>>;
}

impl<C: ResultCursor + ?Sized> ResultCursor for Box<C> {
    fn columns(&self) -> Result<ColumnList> {
        (**self).columns()
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        (**self).next_record()
    }
}

/// Cursor over records already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: ColumnList,
    records: VecDeque<Record>,
}

impl MemoryCursor {
    /// Create a cursor from column names and rows
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        records: impl IntoIterator<Item = Record>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            records: records.into_iter().collect(),
        }
    }

    /// Number of records not yet consumed
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl ResultCursor for MemoryCursor {
    fn columns(&self) -> Result<ColumnList> {
        Ok(self.columns.clone())
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        Ok(self.records.pop_front())
    }
}
