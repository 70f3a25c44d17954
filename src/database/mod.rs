//! Database connector support via DuckDB
//!
//! This module provides database connectivity using DuckDB as the query engine.
//! DuckDB can connect to PostgreSQL, MySQL, SQLite, and other databases.

mod cursor;
mod engine;

pub use cursor::{cell_from_duckdb, DuckDbCursor};
pub use engine::DatabaseEngine;
