//! Table descriptions.

use super::column::{Column, ColumnKind};
use super::key::{Key, KeyKind};
use super::SchemaOp;

/// One entry in a table's definition list.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// A column.
    Column(Column),
    /// A key.
    Key(Key),
    /// Raw SQL spliced in unmodified.
    Raw(String),
}

impl Definition {
    /// Short name of the definition kind, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Column(_) => "column",
            Self::Key(_) => "key",
            Self::Raw(_) => "raw",
        }
    }
}

/// A table description.
///
/// The definition order is preserved verbatim when rendering. For ALTER
/// operations every definition carries its own operation tag and renders
/// as its own statement.
///
/// # Example
///
/// ```rust
/// use dbm_core::schema::Table;
///
/// let mut table = Table::create("todos");
/// table.id("id");
/// table.string("title").required().limit(255);
/// table.bool("completed").required().default(false);
///
/// assert_eq!(table.definitions.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Operation.
    pub op: SchemaOp,
    /// IF NOT EXISTS (create) / IF EXISTS (drop).
    pub optional: bool,
    /// New name for rename operations.
    pub rename: Option<String>,
    /// Columns, keys and raw fragments, in declared order.
    pub definitions: Vec<Definition>,
    /// Trailing options appended verbatim.
    pub options: Option<String>,
}

impl Table {
    fn with_op(name: impl Into<String>, op: SchemaOp) -> Self {
        Self {
            name: name.into(),
            op,
            optional: false,
            rename: None,
            definitions: Vec::new(),
            options: None,
        }
    }

    /// Describes a CREATE TABLE.
    #[must_use]
    pub fn create(name: impl Into<String>) -> Self {
        Self::with_op(name, SchemaOp::Create)
    }

    /// Describes an ALTER TABLE.
    #[must_use]
    pub fn alter(name: impl Into<String>) -> Self {
        Self::with_op(name, SchemaOp::Alter)
    }

    /// Describes a table rename.
    #[must_use]
    pub fn rename(name: impl Into<String>, new_name: impl Into<String>) -> Self {
        let mut table = Self::with_op(name, SchemaOp::Rename);
        table.rename = Some(new_name.into());
        table
    }

    /// Describes a DROP TABLE.
    #[must_use]
    pub fn drop(name: impl Into<String>) -> Self {
        Self::with_op(name, SchemaOp::Drop)
    }

    /// Adds IF NOT EXISTS / IF EXISTS semantics.
    pub fn optional(&mut self) -> &mut Self {
        self.optional = true;
        self
    }

    /// Sets trailing table options (e.g. `ENGINE=InnoDB`).
    pub fn options(&mut self, options: impl Into<String>) -> &mut Self {
        self.options = Some(options.into());
        self
    }

    /// Adds a column of any kind and returns it for further options.
    pub fn column(&mut self, name: impl Into<String>, kind: ColumnKind) -> &mut Column {
        self.push_column(Column::new(name, kind))
    }

    /// Adds a primary identity column.
    pub fn id(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Id).primary()
    }

    /// Adds a primary 64-bit identity column.
    pub fn big_id(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::BigId).primary()
    }

    /// Adds a boolean column.
    pub fn bool(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Bool)
    }

    /// Adds an integer column.
    pub fn int(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Int)
    }

    /// Adds a 64-bit integer column.
    pub fn big_int(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::BigInt)
    }

    /// Adds a float column.
    pub fn float(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Float)
    }

    /// Adds a decimal column.
    pub fn decimal(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Decimal)
    }

    /// Adds a string column.
    pub fn string(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::String)
    }

    /// Adds a text column.
    pub fn text(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Text)
    }

    /// Adds a JSON column.
    pub fn json(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Json)
    }

    /// Adds a date column.
    pub fn date(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Date)
    }

    /// Adds a datetime column.
    pub fn datetime(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::DateTime)
    }

    /// Adds a time column.
    pub fn time(&mut self, name: impl Into<String>) -> &mut Column {
        self.column(name, ColumnKind::Time)
    }

    /// Adds a composite primary key.
    pub fn primary_key<I, S>(&mut self, columns: I) -> &mut Key
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_key(Key::new(KeyKind::Primary, columns))
    }

    /// Adds a unique key.
    pub fn unique_key<I, S>(&mut self, columns: I) -> &mut Key
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_key(Key::new(KeyKind::Unique, columns))
    }

    /// Adds a single-column foreign key referencing `table (ref_column)`.
    pub fn foreign_key(
        &mut self,
        column: impl Into<String>,
        table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> &mut Key {
        self.push_key(Key::foreign([column.into()], table, [ref_column.into()]))
    }

    /// Adds a fully built key.
    pub fn key(&mut self, key: Key) -> &mut Key {
        self.push_key(key)
    }

    /// Adds a raw SQL definition.
    pub fn fragment(&mut self, sql: impl Into<String>) -> &mut Self {
        self.definitions.push(Definition::Raw(sql.into()));
        self
    }

    /// Renames a column (ALTER TABLE only).
    pub fn rename_column(&mut self, name: impl Into<String>, new_name: impl Into<String>) {
        let mut column = Column::new(name, ColumnKind::Raw(String::new()));
        column.op = SchemaOp::Rename;
        column.rename = Some(new_name.into());
        self.push_column(column);
    }

    /// Drops a column (ALTER TABLE only).
    pub fn drop_column(&mut self, name: impl Into<String>) {
        let mut column = Column::new(name, ColumnKind::Raw(String::new()));
        column.op = SchemaOp::Drop;
        self.push_column(column);
    }

    /// Modifies a column in place (ALTER TABLE only).
    ///
    /// No dialect renders this yet; building the table fails.
    pub fn alter_column(&mut self, name: impl Into<String>, kind: ColumnKind) -> &mut Column {
        let mut column = Column::new(name, kind);
        column.op = SchemaOp::Alter;
        self.push_column(column)
    }

    /// Drops a named key (ALTER TABLE only).
    pub fn drop_key(&mut self, kind: KeyKind, name: impl Into<String>) {
        let mut key = Key::new(kind, Vec::<String>::new());
        key.name = Some(name.into());
        key.op = SchemaOp::Drop;
        self.push_key(key);
    }

    fn push_column(&mut self, column: Column) -> &mut Column {
        self.definitions.push(Definition::Column(column));
        match self.definitions.last_mut() {
            Some(Definition::Column(column)) => column,
            _ => unreachable!("a column was just pushed"),
        }
    }

    fn push_key(&mut self, key: Key) -> &mut Key {
        self.definitions.push(Definition::Key(key));
        match self.definitions.last_mut() {
            Some(Definition::Key(key)) => key,
            _ => unreachable!("a key was just pushed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_keep_declared_order() {
        let mut table = Table::create("products");
        table.id("id");
        table.unique_key(["name"]);
        table.string("name");
        table.fragment("`raw` BOOL");

        let kinds: Vec<_> = table.definitions.iter().map(Definition::kind_name).collect();
        assert_eq!(kinds, ["column", "key", "column", "raw"]);
    }

    #[test]
    fn test_alter_helpers_tag_operations() {
        let mut table = Table::alter("users");
        table.string("nickname");
        table.rename_column("name", "full_name");
        table.drop_column("legacy");
        table.drop_key(KeyKind::Foreign, "fk_users_team");

        let ops: Vec<_> = table
            .definitions
            .iter()
            .map(|def| match def {
                Definition::Column(column) => column.op,
                Definition::Key(key) => key.op,
                Definition::Raw(_) => SchemaOp::Create,
            })
            .collect();
        assert_eq!(
            ops,
            [
                SchemaOp::Create,
                SchemaOp::Rename,
                SchemaOp::Drop,
                SchemaOp::Drop
            ]
        );
    }

    #[test]
    fn test_id_is_primary() {
        let mut table = Table::create("t");
        assert!(table.id("id").primary);
        assert!(table.big_id("big").primary);
    }
}
