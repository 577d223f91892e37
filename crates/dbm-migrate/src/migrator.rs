//! Version reconciliation.
//!
//! A [`Migrator`] owns one database handle and the registered versions.
//! Every run first makes sure the history table exists, loads it, and
//! aligns it with the registered versions; only then are versions applied
//! (ascending) or rolled back (one step, highest applied first).
//!
//! Runs are strictly sequential: one statement at a time on one handle.
//! Dropping a `migrate`/`rollback` future (for example through
//! `tokio::time::timeout`) abandons the in-flight statement. Steps already
//! committed stay committed; an open step transaction is rolled back when
//! it is dropped.

use chrono::{DateTime, Utc};
use dbm_core::dialect;
use dbm_core::Dialect;
use tracing::{debug, info};

use crate::changeset::{Changeset, RunFn, Schema};
use crate::config::MigratorConfig;
use crate::database::{Database, Executor};
use crate::error::{classify, MigrateError, Result};
use crate::history::{self, HistoryRecord};
use crate::version::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Applies and rolls back registered versions against one database.
pub struct Migrator<D: Database> {
    db: D,
    dialect: &'static dyn Dialect,
    versions: Vec<Version>,
    config: MigratorConfig,
    history_ready: bool,
}

impl<D: Database> Migrator<D> {
    /// Creates a migrator with the default configuration.
    #[must_use]
    pub fn new(dialect: &'static dyn Dialect, db: D) -> Self {
        Self {
            db,
            dialect,
            versions: Vec::new(),
            config: MigratorConfig::default(),
            history_ready: false,
        }
    }

    /// Creates a migrator for a driver name such as `postgres` or `sqlite3`.
    ///
    /// # Errors
    ///
    /// Fails when no dialect matches `driver`.
    pub fn for_driver(driver: &str, db: D) -> Result<Self> {
        Ok(Self::new(dialect::from_name(driver)?, db))
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: MigratorConfig) -> Self {
        if config.history_table != self.config.history_table {
            self.history_ready = false;
        }
        self.config = config;
        self
    }

    /// Registers a version with its up and down changesets.
    pub fn register(
        &mut self,
        version: i64,
        up: impl FnOnce(&mut Schema),
        down: impl FnOnce(&mut Schema),
    ) -> &mut Self {
        let mut up_schema = Schema::new();
        let mut down_schema = Schema::new();
        up(&mut up_schema);
        down(&mut down_schema);

        self.versions.push(Version::new(
            version,
            up_schema.into_changesets(),
            down_schema.into_changesets(),
        ));
        self
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &MigratorConfig {
        &self.config
    }

    /// Returns the database handle.
    pub fn database_mut(&mut self) -> &mut D {
        &mut self.db
    }

    /// Consumes the migrator, returning the database handle.
    #[must_use]
    pub fn into_inner(self) -> D {
        self.db
    }

    /// Creates the history table if this migrator has not done so yet.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or a database error.
    pub async fn init(&mut self) -> Result<()> {
        if self.history_ready {
            return Ok(());
        }
        self.config.validate()?;

        let sql = history::create(self.dialect, &self.config.history_table)?;
        run_sql(self.dialect, &mut self.db, &sql).await?;
        self.history_ready = true;

        debug!(table = %self.config.history_table, "History table ready");
        Ok(())
    }

    /// Returns the persisted history rows in ascending version order.
    ///
    /// # Errors
    ///
    /// Fails on a database error.
    pub async fn history(&mut self) -> Result<Vec<HistoryRecord>> {
        self.init().await?;

        let dialect = self.dialect;
        let sql = history::select(dialect, &self.config.history_table);
        debug!(sql = %sql, "Loading history");
        self.db
            .fetch_history(&sql)
            .await
            .map_err(|err| classify(dialect, err))
    }

    /// Reconciles the registered versions with the history table and
    /// returns them in ascending order with their applied flags.
    ///
    /// # Errors
    ///
    /// Fails on a database error or a misaligned history.
    pub async fn status(&mut self) -> Result<&[Version]> {
        self.sync().await?;
        Ok(&self.versions)
    }

    /// Applies every pending version in ascending order.
    ///
    /// The first failure stops the run; versions applied before it stay
    /// applied.
    ///
    /// # Errors
    ///
    /// Fails on a misaligned history, a rendering error, or a database
    /// error (constraint violations are classified).
    pub async fn migrate(&mut self) -> Result<()> {
        self.sync().await?;

        let mut applied = 0_usize;
        for index in 0..self.versions.len() {
            if self.versions[index].applied() {
                continue;
            }
            self.run_step(index, Direction::Up).await?;
            applied += 1;
        }

        if applied == 0 {
            debug!("No pending migrations");
        } else {
            info!(count = applied, "Migrations applied");
        }
        Ok(())
    }

    /// Rolls back the highest applied version, and only that one.
    ///
    /// # Errors
    ///
    /// Same as [`Migrator::migrate`].
    pub async fn rollback(&mut self) -> Result<()> {
        self.sync().await?;

        match self.versions.iter().rposition(Version::applied) {
            Some(index) => self.run_step(index, Direction::Down).await,
            None => {
                info!("No applied migration to roll back");
                Ok(())
            }
        }
    }

    async fn sync(&mut self) -> Result<()> {
        let records = self.history().await?;
        align(&mut self.versions, &records)
    }

    async fn run_step(&mut self, index: usize, direction: Direction) -> Result<()> {
        let dialect = self.dialect;
        let version = &self.versions[index];
        let number = version.version();
        let now = Utc::now();

        let (record_sql, changesets) = match direction {
            Direction::Up => {
                info!(version = number, "Applying migration");
                (
                    history::insert(dialect, &self.config.history_table, number, now),
                    version.up(),
                )
            }
            Direction::Down => {
                info!(version = number, "Rolling back migration");
                (
                    history::delete(dialect, &self.config.history_table, number),
                    version.down(),
                )
            }
        };

        if self.config.transactional {
            if let Some(mut tx) = self
                .db
                .begin()
                .await
                .map_err(|err| classify(dialect, err))?
            {
                run_sql(dialect, tx.as_executor(), &record_sql).await?;
                run_changesets(dialect, tx.as_executor(), changesets).await?;
                tx.commit().await.map_err(|err| classify(dialect, err))?;

                settle(&mut self.versions[index], direction, now);
                return Ok(());
            }
            debug!(
                version = number,
                "Database has no transaction support, running step without one"
            );
        }

        run_sql(dialect, &mut self.db, &record_sql).await?;
        run_changesets(dialect, &mut self.db, changesets).await?;

        settle(&mut self.versions[index], direction, now);
        Ok(())
    }
}

fn settle(version: &mut Version, direction: Direction, at: DateTime<Utc>) {
    match direction {
        Direction::Up => version.mark_recorded(at),
        Direction::Down => version.mark_pending(),
    }
}

async fn run_sql(dialect: &dyn Dialect, exec: &mut dyn Executor, sql: &str) -> Result<()> {
    if sql.trim().is_empty() {
        debug!("Skipping empty statement");
        return Ok(());
    }

    debug!(sql = %sql, "Executing SQL");
    exec.execute(sql)
        .await
        .map_err(|err| classify(dialect, err))?;
    Ok(())
}

async fn run_changesets(
    dialect: &dyn Dialect,
    exec: &mut dyn Executor,
    changesets: &[Changeset],
) -> Result<()> {
    for changeset in changesets {
        if let Changeset::Run(callback) = changeset {
            debug!("Running callback changeset");
            let callback: &RunFn = &**callback;
            callback(&mut *exec).await?;
        } else if let Some(sql) = changeset.render(dialect)? {
            run_sql(dialect, exec, &sql).await?;
        }
    }
    Ok(())
}

/// Marks each registered version applied or pending against the persisted
/// history.
///
/// `versions` is sorted in place; `records` must be in ascending version
/// order, as [`history::select`] returns them.
///
/// # Errors
///
/// Returns [`MigrateError::DuplicateVersion`] when two registered versions
/// share a number, and [`MigrateError::MissingLocalVersion`] when a
/// persisted version has no registered counterpart.
pub fn align(versions: &mut [Version], records: &[HistoryRecord]) -> Result<()> {
    versions.sort_by_key(Version::version);

    if let Some(pair) = versions
        .windows(2)
        .find(|pair| pair[0].version() == pair[1].version())
    {
        return Err(MigrateError::DuplicateVersion(pair[0].version()));
    }

    let mut persisted = records.iter().peekable();
    for version in versions.iter_mut() {
        match persisted.peek() {
            Some(record) if record.version == version.version() => {
                version.mark_applied(record);
                persisted.next();
            }
            _ => version.mark_pending(),
        }
    }

    match persisted.next() {
        Some(record) => Err(MigrateError::MissingLocalVersion(record.version)),
        None => Ok(()),
    }
}
