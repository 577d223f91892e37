//! Table keys: primary, unique and foreign.

use std::fmt;

use super::SchemaOp;

/// Kind of table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// PRIMARY KEY.
    Primary,
    /// UNIQUE.
    Unique,
    /// FOREIGN KEY.
    Foreign,
}

impl KeyKind {
    /// Returns the SQL keyword for this key kind.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
            Self::Foreign => "FOREIGN KEY",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferentialAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to the column default.
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reference {
    /// Referenced table.
    pub table: String,
    /// Referenced columns.
    pub columns: Vec<String>,
    /// ON DELETE action.
    pub on_delete: Option<ReferentialAction>,
    /// ON UPDATE action.
    pub on_update: Option<ReferentialAction>,
}

/// A table key.
///
/// The column list must not be empty, and foreign keys need a
/// reference table. Both are checked when the key is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Key kind.
    pub kind: KeyKind,
    /// Optional constraint name.
    pub name: Option<String>,
    /// Key columns, in order.
    pub columns: Vec<String>,
    /// Reference, for foreign keys.
    pub reference: Option<Reference>,
    /// Operation when used inside an ALTER TABLE.
    pub op: SchemaOp,
    /// Trailing options appended verbatim.
    pub options: Option<String>,
}

impl Key {
    /// Creates a key over the given columns.
    #[must_use]
    pub fn new<I, S>(kind: KeyKind, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
            reference: None,
            op: SchemaOp::Create,
            options: None,
        }
    }

    /// Creates a foreign key referencing `table (ref_columns)`.
    #[must_use]
    pub fn foreign<I, S, J, T>(columns: I, table: impl Into<String>, ref_columns: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut key = Self::new(KeyKind::Foreign, columns);
        key.reference = Some(Reference {
            table: table.into(),
            columns: ref_columns.into_iter().map(Into::into).collect(),
            on_delete: None,
            on_update: None,
        });
        key
    }

    /// Sets the constraint name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the ON DELETE action of a foreign key.
    pub fn on_delete(&mut self, action: ReferentialAction) -> &mut Self {
        self.reference.get_or_insert_with(Reference::default).on_delete = Some(action);
        self
    }

    /// Sets the ON UPDATE action of a foreign key.
    pub fn on_update(&mut self, action: ReferentialAction) -> &mut Self {
        self.reference.get_or_insert_with(Reference::default).on_update = Some(action);
        self
    }

    /// Sets trailing options.
    pub fn options(&mut self, options: impl Into<String>) -> &mut Self {
        self.options = Some(options.into());
        self
    }
}
