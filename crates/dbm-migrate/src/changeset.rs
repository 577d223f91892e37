//! Changesets and the authoring surface that collects them.

use std::fmt;
use std::sync::Arc;

use dbm_core::schema::{Index, Table};
use dbm_core::Dialect;
use futures::future::BoxFuture;

use crate::database::Executor;
use crate::error::Result;

/// An executable changeset body.
pub type RunFn =
    dyn for<'a> Fn(&'a mut dyn Executor) -> BoxFuture<'a, Result<()>> + Send + Sync;

/// One unit of schema or data change.
#[derive(Clone)]
pub enum Changeset {
    /// A table create/alter/rename/drop.
    Table(Table),
    /// An index create/drop.
    Index(Index),
    /// SQL executed verbatim.
    Raw(String),
    /// A callback run against the database; may do anything, not only DDL.
    Run(Arc<RunFn>),
}

impl Changeset {
    /// Renders the changeset as SQL. Callbacks have no SQL form.
    ///
    /// # Errors
    ///
    /// Propagates DDL rendering errors.
    pub fn render(&self, dialect: &dyn Dialect) -> dbm_core::Result<Option<String>> {
        match self {
            Self::Table(table) => dialect.build_table(table).map(Some),
            Self::Index(index) => dialect.build_index(index).map(Some),
            Self::Raw(sql) => Ok(Some(sql.clone())),
            Self::Run(_) => Ok(None),
        }
    }
}

impl fmt::Debug for Changeset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => f.debug_tuple("Table").field(table).finish(),
            Self::Index(index) => f.debug_tuple("Index").field(index).finish(),
            Self::Raw(sql) => f.debug_tuple("Raw").field(sql).finish(),
            Self::Run(_) => f.write_str("Run(..)"),
        }
    }
}

impl From<Table> for Changeset {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<Index> for Changeset {
    fn from(index: Index) -> Self {
        Self::Index(index)
    }
}

/// Collects the changesets of one migration direction.
///
/// ```rust
/// use dbm_migrate::changeset::Schema;
///
/// let mut schema = Schema::default();
/// schema.create_table("todos", |t| {
///     t.id("id");
///     t.string("title").required();
/// });
/// schema.create_index("todos", "todos_title", ["title"]);
/// assert_eq!(schema.changesets().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    changesets: Vec<Changeset>,
}

impl Schema {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a CREATE TABLE.
    pub fn create_table(&mut self, name: &str, define: impl FnOnce(&mut Table)) {
        let mut table = Table::create(name);
        define(&mut table);
        self.push(table);
    }

    /// Queues a CREATE TABLE IF NOT EXISTS.
    pub fn create_table_if_not_exists(&mut self, name: &str, define: impl FnOnce(&mut Table)) {
        let mut table = Table::create(name);
        table.optional();
        define(&mut table);
        self.push(table);
    }

    /// Queues an ALTER TABLE.
    pub fn alter_table(&mut self, name: &str, define: impl FnOnce(&mut Table)) {
        let mut table = Table::alter(name);
        define(&mut table);
        self.push(table);
    }

    /// Queues a table rename.
    pub fn rename_table(&mut self, name: &str, new_name: &str) {
        self.push(Table::rename(name, new_name));
    }

    /// Queues a DROP TABLE.
    pub fn drop_table(&mut self, name: &str) {
        self.push(Table::drop(name));
    }

    /// Queues a DROP TABLE IF EXISTS.
    pub fn drop_table_if_exists(&mut self, name: &str) {
        let mut table = Table::drop(name);
        table.optional();
        self.push(table);
    }

    /// Queues a CREATE INDEX and returns it for further options.
    pub fn create_index<I, S>(&mut self, table: &str, name: &str, columns: I) -> &mut Index
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_index(Index::create(table, name, columns))
    }

    /// Queues a CREATE UNIQUE INDEX and returns it for further options.
    pub fn create_unique_index<I, S>(&mut self, table: &str, name: &str, columns: I) -> &mut Index
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.create_index(table, name, columns);
        index.unique();
        index
    }

    /// Queues a DROP INDEX and returns it for further options.
    pub fn drop_index(&mut self, table: &str, name: &str) -> &mut Index {
        self.push_index(Index::drop(table, name))
    }

    /// Queues SQL executed verbatim.
    pub fn exec(&mut self, sql: impl Into<String>) {
        self.changesets.push(Changeset::Raw(sql.into()));
    }

    /// Queues a callback run against the database.
    ///
    /// The callback shares the step's transaction, if any. Values should be
    /// bound rather than formatted into the SQL.
    ///
    /// ```rust
    /// use dbm_migrate::changeset::Schema;
    /// use dbm_migrate::database::Executor;
    /// use dbm_migrate::value::Value;
    ///
    /// let mut schema = Schema::new();
    /// schema.run(|db| {
    ///     Box::pin(async move {
    ///         for row in db.fetch_all("SELECT id FROM todos", &[]).await? {
    ///             db.execute_with("UPDATE todos SET title = ? WHERE id = ?", &[
    ///                 Value::from("seed"),
    ///                 row[0].clone(),
    ///             ])
    ///             .await?;
    ///         }
    ///         Ok(())
    ///     })
    /// });
    /// ```
    pub fn run<F>(&mut self, f: F)
    where
        F: for<'a> Fn(&'a mut dyn Executor) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        self.changesets.push(Changeset::Run(Arc::new(f)));
    }

    /// Queues an already built changeset.
    pub fn push(&mut self, changeset: impl Into<Changeset>) {
        self.changesets.push(changeset.into());
    }

    /// The queued changesets, in declaration order.
    #[must_use]
    pub fn changesets(&self) -> &[Changeset] {
        &self.changesets
    }

    /// Consumes the collector.
    #[must_use]
    pub fn into_changesets(self) -> Vec<Changeset> {
        self.changesets
    }

    fn push_index(&mut self, index: Index) -> &mut Index {
        self.changesets.push(Changeset::Index(index));
        match self.changesets.last_mut() {
            Some(Changeset::Index(index)) => index,
            _ => unreachable!("an index was just pushed"),
        }
    }
}
