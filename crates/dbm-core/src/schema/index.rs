//! Index descriptions.

use super::SchemaOp;

/// An index description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table: String,
    /// Operation; only create and drop are supported.
    pub op: SchemaOp,
    /// UNIQUE index.
    pub unique: bool,
    /// IF NOT EXISTS (create) / IF EXISTS (drop).
    pub optional: bool,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Trailing options appended verbatim.
    pub options: Option<String>,
}

impl Index {
    /// Describes a CREATE INDEX.
    #[must_use]
    pub fn create<I, S>(table: impl Into<String>, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            table: table.into(),
            op: SchemaOp::Create,
            unique: false,
            optional: false,
            columns: columns.into_iter().map(Into::into).collect(),
            options: None,
        }
    }

    /// Describes a DROP INDEX.
    #[must_use]
    pub fn drop(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            op: SchemaOp::Drop,
            unique: false,
            optional: false,
            columns: Vec::new(),
            options: None,
        }
    }

    /// Makes the index UNIQUE.
    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Adds IF NOT EXISTS / IF EXISTS semantics.
    pub fn optional(&mut self) -> &mut Self {
        self.optional = true;
        self
    }

    /// Sets trailing options.
    pub fn options(&mut self, options: impl Into<String>) -> &mut Self {
        self.options = Some(options.into());
        self
    }
}
