//! Rendering errors.

use thiserror::Error;

use crate::schema::{KeyKind, SchemaOp};

/// Errors raised while turning a schema description into SQL.
///
/// These indicate a programming error in the description; no partial SQL
/// is ever returned alongside one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DdlError {
    /// Unknown dialect name.
    #[error("unsupported dialect `{0}`")]
    UnsupportedDialect(String),

    /// The dialect cannot drop this kind of key.
    #[error("{dialect}: dropping a {kind} is not supported")]
    UnsupportedDropKey {
        /// Dialect name.
        dialect: &'static str,
        /// Key kind.
        kind: KeyKind,
    },

    /// Modifying a column in place has no rendering.
    #[error("table `{table}`: altering column `{column}` in place is not supported")]
    AlterColumnInPlace {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// A float default that is NaN or infinite has no SQL literal.
    #[error("table `{table}`: column `{column}` has a non-finite default")]
    NonFiniteDefault {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// The operation is not valid for this object.
    #[error("{object}: operation `{op}` is not supported")]
    UnsupportedOperation {
        /// Object description, e.g. `index idx_users_email`.
        object: String,
        /// Offending operation.
        op: SchemaOp,
    },

    /// A key without columns.
    #[error("table `{table}`: key has no columns")]
    EmptyKeyColumns {
        /// Table name.
        table: String,
    },

    /// A foreign key without a reference table.
    #[error("table `{table}`: foreign key has no reference table")]
    MissingReference {
        /// Table name.
        table: String,
    },

    /// A dropped key without a name.
    #[error("table `{table}`: cannot drop an unnamed key")]
    MissingKeyName {
        /// Table name.
        table: String,
    },

    /// A rename without a target name.
    #[error("{object}: rename target is missing")]
    MissingRename {
        /// Object description.
        object: String,
    },
}

/// Result type for rendering.
pub type Result<T> = std::result::Result<T, DdlError>;
