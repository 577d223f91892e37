//! Dialect adapters.
//!
//! A dialect is a bundle of independent strategies: quoting ([`Quoter`]),
//! column type mapping ([`ColumnMapper`]), DDL capabilities ([`DdlPolicy`])
//! and error classification ([`ErrorClassifier`]). The table and index
//! builders only ever talk to these traits.

mod generic;
mod mssql;
mod mysql;
mod postgres;
mod sqlite;

pub use generic::{map_generic, Generic};
pub use mssql::MsSql;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use crate::builder::{IndexBuilder, TableBuilder};
use crate::classify::ErrorClassifier;
use crate::error::{DdlError, Result};
use crate::quote::Quoter;
use crate::schema::{Column, Definition, Index, KeyKind, Table};

/// Native column type produced by a [`ColumnMapper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    /// Type name, e.g. `VARCHAR`.
    pub name: String,
    /// Length or precision, rendered as `(size)`.
    pub size: Option<u32>,
    /// Scale, rendered as `(size,scale)`.
    pub scale: Option<u32>,
}

impl ColumnType {
    /// A type without size arguments.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            scale: None,
        }
    }

    /// A type with an optional size argument. Zero counts as unset.
    #[must_use]
    pub fn sized(name: impl Into<String>, size: Option<u32>) -> Self {
        Self {
            name: name.into(),
            size: size.filter(|s| *s > 0),
            scale: None,
        }
    }

    /// Adds a scale argument. Zero counts as unset.
    #[must_use]
    pub fn with_scale(mut self, scale: Option<u32>) -> Self {
        self.scale = scale.filter(|s| *s > 0);
        self
    }
}

/// Maps an abstract column to a native type.
pub trait ColumnMapper {
    /// Maps `column`, normalizing its default and flags for this dialect
    /// before the caller renders them.
    fn map_column(&self, column: &mut Column) -> ColumnType;
}

/// DDL capabilities that differ between dialects.
pub trait DdlPolicy {
    /// Keyword used by `ALTER TABLE .. DROP <keyword> name`.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedDropKey`] when the dialect cannot drop
    /// keys of this kind.
    fn drop_key_keyword(&self, kind: KeyKind) -> Result<&'static str>;

    /// Whether `definition` can be rendered for `table`. Excluded
    /// definitions are logged and skipped.
    fn keep_definition(&self, _table: &Table, _definition: &Definition) -> bool {
        true
    }

    /// Whether `DROP INDEX` needs a trailing `ON table`.
    fn drop_index_on_table(&self) -> bool {
        false
    }

    /// Statement prefix used instead of `IF NOT EXISTS` for an optional
    /// CREATE TABLE, for dialects that lack that clause.
    fn create_table_guard(&self, _name: &str) -> Option<String> {
        None
    }
}

/// A complete SQL dialect.
pub trait Dialect: Quoter + ColumnMapper + DdlPolicy + ErrorClassifier + Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Renders a table description.
    fn build_table(&self, table: &Table) -> Result<String> {
        TableBuilder::new(self).build(table)
    }

    /// Renders an index description.
    fn build_index(&self, index: &Index) -> Result<String> {
        IndexBuilder::new(self).build(index)
    }
}

static MYSQL: MySql = MySql;
static POSTGRES: Postgres = Postgres;
static MSSQL: MsSql = MsSql;
static SQLITE: Sqlite = Sqlite;

/// Selects a built-in dialect by driver name.
///
/// # Errors
///
/// Returns [`DdlError::UnsupportedDialect`] for unknown names.
///
/// # Example
///
/// ```rust
/// use dbm_core::dialect;
///
/// assert_eq!(dialect::from_name("pgx").unwrap().name(), "postgres");
/// assert!(dialect::from_name("oracle").is_err());
/// ```
pub fn from_name(name: &str) -> Result<&'static dyn Dialect> {
    match name.to_ascii_lowercase().as_str() {
        "mysql" => Ok(&MYSQL),
        "postgres" | "postgresql" | "pgx" => Ok(&POSTGRES),
        "mssql" | "sqlserver" => Ok(&MSSQL),
        "sqlite" | "sqlite3" => Ok(&SQLITE),
        _ => Err(DdlError::UnsupportedDialect(name.to_string())),
    }
}
