//! Schema version history.
//!
//! Applied versions are recorded in a table (`dbm_schema_versions` by
//! default) created through the same DDL builders as user changesets, so
//! it gets the right column types on every dialect. Statements touching
//! it are rendered with the dialect's quoter.

use chrono::{DateTime, FixedOffset, Utc};
use dbm_core::buffer::{format_timestamp, Buffer};
use dbm_core::schema::Table;
use dbm_core::{Dialect, Result};

/// Default name of the history table.
pub const DEFAULT_HISTORY_TABLE: &str = "dbm_schema_versions";

/// Layout of timestamps written to the history table.
pub const HISTORY_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// A row of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Surrogate id assigned by the database.
    pub id: i64,
    /// Applied version number.
    pub version: i64,
    /// When the version was applied.
    pub created_at: DateTime<Utc>,
    /// Last time the row was touched.
    pub updated_at: DateTime<Utc>,
}

/// Describes the history table.
#[must_use]
pub fn table(name: &str) -> Table {
    let mut table = Table::create(name);
    table.optional();
    table.id("id");
    table.big_int("version").unsigned().unique();
    table.datetime("created_at");
    table.datetime("updated_at");
    table
}

/// `CREATE TABLE IF NOT EXISTS` for the history table.
///
/// # Errors
///
/// Propagates DDL rendering errors.
pub fn create(dialect: &dyn Dialect, name: &str) -> Result<String> {
    dialect.build_table(&table(name))
}

/// Selects every history row in ascending version order.
#[must_use]
pub fn select(dialect: &dyn Dialect, name: &str) -> String {
    let mut buffer = Buffer::new(dialect);
    buffer.push_str("SELECT ");
    buffer.push_identifiers(&columns(&["id", "version", "created_at", "updated_at"]));
    buffer.push_str(" FROM ");
    buffer.push_identifier(name);
    buffer.push_str(" ORDER BY ");
    buffer.push_identifier("version");
    buffer.finish()
}

/// Records `version` as applied at `at`.
#[must_use]
pub fn insert(dialect: &dyn Dialect, name: &str, version: i64, at: DateTime<Utc>) -> String {
    let at: DateTime<FixedOffset> = at.fixed_offset();
    let stamp = format_timestamp(&at, HISTORY_TIME_LAYOUT);

    let mut buffer = Buffer::new(dialect);
    buffer.push_str("INSERT INTO ");
    buffer.push_identifier(name);
    buffer.push_str(" (");
    buffer.push_identifiers(&columns(&["version", "created_at", "updated_at"]));
    buffer.push_str(") VALUES (");
    buffer.push_str(&version.to_string());
    buffer.push_str(", ");
    buffer.push_literal(&stamp);
    buffer.push_str(", ");
    buffer.push_literal(&stamp);
    buffer.push_str(");");
    buffer.finish()
}

/// Removes the record of `version`.
#[must_use]
pub fn delete(dialect: &dyn Dialect, name: &str, version: i64) -> String {
    let mut buffer = Buffer::new(dialect);
    buffer.push_str("DELETE FROM ");
    buffer.push_identifier(name);
    buffer.push_str(" WHERE ");
    buffer.push_identifier("version");
    buffer.push_str(" = ");
    buffer.push_str(&version.to_string());
    buffer.push(';');
    buffer.finish()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}
