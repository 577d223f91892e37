//! Dialect-neutral schema description.
//!
//! These values describe *what* should change; the [`crate::dialect`]
//! adapters decide *how* each engine spells it.

mod column;
mod index;
mod key;
mod table;

use std::fmt;

pub use column::{Column, ColumnKind, DefaultValue};
pub use index::Index;
pub use key::{Key, KeyKind, Reference, ReferentialAction};
pub use table::{Definition, Table};

/// Operation tag for tables, indexes and ALTER TABLE definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaOp {
    /// Create the object.
    Create,
    /// Modify the object in place.
    Alter,
    /// Rename the object.
    Rename,
    /// Drop the object.
    Drop,
}

impl fmt::Display for SchemaOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Alter => "alter",
            Self::Rename => "rename",
            Self::Drop => "drop",
        })
    }
}
