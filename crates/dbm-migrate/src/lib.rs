//! Versioned schema migrations.
//!
//! `dbm-migrate` runs numbered versions of changesets against a database
//! and records which ones are applied in a history table. DDL is rendered
//! by [`dbm_core`] for the dialect in use; statements are executed through
//! sqlx.
//!
//! # Example
//!
//! ```rust,no_run
//! use dbm_migrate::Migrator;
//! use sqlx::{Connection, SqliteConnection};
//!
//! # async fn run() -> dbm_migrate::Result<()> {
//! let conn = SqliteConnection::connect("sqlite:app.db").await?;
//! let mut migrator = Migrator::for_driver("sqlite3", conn)?;
//!
//! migrator.register(
//!     20230722120000,
//!     |schema| {
//!         schema.create_table("todos", |t| {
//!             t.id("id");
//!             t.string("title").required();
//!         });
//!     },
//!     |schema| schema.drop_table("todos"),
//! );
//!
//! migrator.migrate().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Transactions
//!
//! Each version step (history row plus changesets) runs in one
//! transaction when [`MigratorConfig::transactional`] is set and the
//! database returns one from [`Database::begin`]. Backends without
//! transactions run steps directly; a failure in the middle of such a step
//! can leave the history row and the schema out of sync.

pub mod changeset;
pub mod config;
pub mod database;
pub mod error;
pub mod history;
pub mod migrator;
pub mod value;
pub mod version;

pub use changeset::{Changeset, Schema};
pub use config::MigratorConfig;
pub use database::{Database, Executor, Transaction};
pub use error::{ConstraintError, MigrateError, Result};
pub use history::HistoryRecord;
pub use migrator::Migrator;
pub use value::{Row, Value};
pub use version::Version;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::changeset::{Changeset, Schema};
    pub use crate::config::MigratorConfig;
    pub use crate::database::{Database, Executor};
    pub use crate::error::{MigrateError, Result};
    pub use crate::migrator::Migrator;
    pub use crate::value::{Row, Value};
    pub use dbm_core::classify::ConstraintKind;
    pub use dbm_core::schema::{ColumnKind, KeyKind, ReferentialAction, Table};
}
