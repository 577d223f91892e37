//! # dbm-core
//!
//! Dialect-neutral schema descriptions rendered as DDL for MySQL,
//! PostgreSQL, SQL Server and SQLite.
//!
//! This crate provides:
//! - A schema vocabulary: [`schema::Table`], [`schema::Column`],
//!   [`schema::Key`] and [`schema::Index`]
//! - Per-dialect quoting, column type mapping and error classification
//! - Generic table and index builders driven by those dialect strategies
//!
//! It never talks to a database; see `dbm-migrate` for that.
//!
//! ## Rendering
//!
//! ```rust
//! use dbm_core::dialect::{self, Dialect};
//! use dbm_core::schema::Table;
//!
//! let mut table = Table::create("todos");
//! table.id("id");
//! table.string("title").required();
//!
//! let sqlite = dialect::from_name("sqlite").unwrap();
//! assert_eq!(
//!     sqlite.build_table(&table).unwrap(),
//!     r#"CREATE TABLE "todos" ("id" INTEGER PRIMARY KEY, "title" VARCHAR(255) NOT NULL);"#
//! );
//! ```
//!
//! ## Escaping
//!
//! Identifiers and literals always go through the dialect's quoter:
//!
//! ```rust
//! use dbm_core::dialect::MySql;
//! use dbm_core::quote::Quoter;
//!
//! assert_eq!(MySql.quote_identifier("na`me"), "`na``me`");
//! assert_eq!(MySql.quote_value("'; DROP TABLE users; --"), r"'\'; DROP TABLE users; --'");
//! ```
//!
//! ## Error classification
//!
//! ```rust
//! use dbm_core::classify::{ConstraintKind, ErrorClassifier};
//! use dbm_core::dialect::Postgres;
//!
//! let violation = Postgres
//!     .classify(r#"duplicate key value violates unique constraint "users_email_key""#)
//!     .unwrap();
//! assert_eq!(violation.kind, ConstraintKind::Unique);
//! assert_eq!(violation.key, "users_email_key");
//! ```

pub mod buffer;
pub mod builder;
pub mod classify;
pub mod dialect;
pub mod error;
pub mod quote;
pub mod schema;

pub use classify::{ConstraintKind, ErrorClassifier, Violation};
pub use dialect::Dialect;
pub use error::{DdlError, Result};
