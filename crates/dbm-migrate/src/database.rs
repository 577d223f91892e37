//! Execution backends.
//!
//! The engine only needs three things from a database: run a statement,
//! read the history table, and optionally open a transaction. These are
//! expressed as object-safe traits so callback changesets can receive a
//! `&mut dyn Executor` whatever the backend is. Callbacks additionally get
//! parameterized statements and untyped row reads through [`Value`].
//!
//! Implementations are provided for sqlx connections and transactions:
//! SQLite always, PostgreSQL and MySQL behind the `postgres` / `mysql`
//! features.

use chrono::{DateTime, NaiveDateTime, Utc};
use futures::future::BoxFuture;

use crate::history::HistoryRecord;
use crate::value::{Row, Value};

/// Runs SQL against a connection or transaction.
pub trait Executor: Send {
    /// Executes `sql`, which may hold several `;`-separated statements,
    /// returning the number of affected rows.
    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<u64, sqlx::Error>>;

    /// Executes one statement with bound arguments, returning the number
    /// of affected rows. Placeholders use the driver's syntax (`?` or `$1`).
    fn execute_with<'a>(
        &'a mut self,
        sql: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, Result<u64, sqlx::Error>>;

    /// Runs one query with bound arguments and decodes every row.
    fn fetch_all<'a>(
        &'a mut self,
        sql: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, Result<Vec<Row>, sqlx::Error>>;

    /// Runs the history select and decodes its rows.
    fn fetch_history<'a>(
        &'a mut self,
        sql: &'a str,
    ) -> BoxFuture<'a, Result<Vec<HistoryRecord>, sqlx::Error>>;
}

/// An open transaction. Dropping it without [`Transaction::commit`] rolls
/// it back.
pub trait Transaction<'c>: Executor {
    /// Borrows the transaction as a plain executor.
    fn as_executor(&mut self) -> &mut dyn Executor;

    /// Commits the transaction.
    fn commit(self: Box<Self>) -> BoxFuture<'c, Result<(), sqlx::Error>>;
}

/// A migration target.
pub trait Database: Executor {
    /// Opens a transaction, or returns `None` when the backend has no
    /// transaction support.
    fn begin<'a>(
        &'a mut self,
    ) -> BoxFuture<'a, Result<Option<Box<dyn Transaction<'a> + 'a>>, sqlx::Error>> {
        Box::pin(async { Ok(None) })
    }
}

impl<T: Executor + ?Sized> Executor for &mut T {
    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
        (**self).execute(sql)
    }

    fn execute_with<'a>(
        &'a mut self,
        sql: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
        (**self).execute_with(sql, args)
    }

    fn fetch_all<'a>(
        &'a mut self,
        sql: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, Result<Vec<Row>, sqlx::Error>> {
        (**self).fetch_all(sql, args)
    }

    fn fetch_history<'a>(
        &'a mut self,
        sql: &'a str,
    ) -> BoxFuture<'a, Result<Vec<HistoryRecord>, sqlx::Error>> {
        (**self).fetch_history(sql)
    }
}

impl<T: Database + ?Sized> Database for &mut T {
    fn begin<'a>(
        &'a mut self,
    ) -> BoxFuture<'a, Result<Option<Box<dyn Transaction<'a> + 'a>>, sqlx::Error>> {
        (**self).begin()
    }
}

fn decode_error(column: &str, err: impl Into<sqlx::error::BoxDynError>) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: err.into(),
    }
}

/// Parses a timestamp stored as text.
///
/// Accepts the layout the history insert writes (`2006-01-02 15:04:05+07:00`),
/// RFC 3339, and SQLite's own `datetime('now')` form, which is taken as UTC.
pub(crate) fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    if let Ok(at) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|at| at.and_utc())
        .map_err(|err| decode_error(column, err))
}

fn decode_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryRecord, sqlx::Error> {
    use sqlx::Row;

    let created_at: String = row.try_get(2)?;
    let updated_at: String = row.try_get(3)?;
    Ok(HistoryRecord {
        id: row.try_get(0)?,
        version: row.try_get(1)?,
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}

#[cfg(feature = "postgres")]
fn decode_postgres(row: &sqlx::postgres::PgRow) -> Result<HistoryRecord, sqlx::Error> {
    use sqlx::Row;

    Ok(HistoryRecord {
        id: i64::from(row.try_get::<i32, _>(0)?),
        version: row.try_get(1)?,
        created_at: row.try_get(2)?,
        updated_at: row.try_get(3)?,
    })
}

#[cfg(feature = "mysql")]
fn decode_mysql(row: &sqlx::mysql::MySqlRow) -> Result<HistoryRecord, sqlx::Error> {
    use sqlx::Row;

    let version: u64 = row.try_get(1)?;
    Ok(HistoryRecord {
        id: i64::from(row.try_get::<u32, _>(0)?),
        version: i64::try_from(version).map_err(|err| decode_error("version", err))?,
        created_at: row.try_get::<NaiveDateTime, _>(2)?.and_utc(),
        updated_at: row.try_get::<NaiveDateTime, _>(3)?.and_utc(),
    })
}

/// Decodes every column of `row` into the first [`Value`] type the driver
/// accepts for it.
fn decode_row<'r, R>(row: &'r R) -> Result<Row, sqlx::Error>
where
    R: sqlx::Row,
    usize: sqlx::ColumnIndex<R>,
    i64: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    i32: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    f64: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    f32: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    bool: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    String: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    DateTime<Utc>: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    NaiveDateTime: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    use sqlx::ValueRef;

    let mut values = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        let value = if row.try_get_raw(index)?.is_null() {
            Value::Null
        } else if let Ok(n) = row.try_get::<i64, _>(index) {
            Value::Int(n)
        } else if let Ok(n) = row.try_get::<i32, _>(index) {
            Value::Int(i64::from(n))
        } else if let Ok(f) = row.try_get::<f64, _>(index) {
            Value::Float(f)
        } else if let Ok(f) = row.try_get::<f32, _>(index) {
            Value::Float(f64::from(f))
        } else if let Ok(b) = row.try_get::<bool, _>(index) {
            Value::Bool(b)
        } else if let Ok(s) = row.try_get::<String, _>(index) {
            Value::Text(s)
        } else if let Ok(at) = row.try_get::<DateTime<Utc>, _>(index) {
            Value::Timestamp(at)
        } else if let Ok(at) = row.try_get::<NaiveDateTime, _>(index) {
            Value::Timestamp(at.and_utc())
        } else {
            return Err(decode_error(
                &index.to_string(),
                "column type has no dynamic representation",
            ));
        };
        values.push(value);
    }
    Ok(values)
}

/// Builds a prepared query with `args` bound in order.
macro_rules! bind_all {
    ($db:ty, $sql:expr, $args:expr) => {{
        let mut query = sqlx::query::<$db>($sql);
        for arg in $args {
            query = match arg {
                Value::Null => query.bind(None::<String>),
                Value::Bool(b) => query.bind(*b),
                Value::Int(n) => query.bind(*n),
                Value::Float(f) => query.bind(*f),
                Value::Text(s) => query.bind(s.as_str()),
                Value::Timestamp(at) => query.bind(*at),
            };
        }
        query
    }};
}

/// Implements the execution traits for one sqlx driver.
macro_rules! impl_database {
    ($db:ty, $conn:ty, $decode:path) => {
        impl Executor for $conn {
            fn execute<'a>(
                &'a mut self,
                sql: &'a str,
            ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
                Box::pin(async move {
                    let result = sqlx::Executor::execute(&mut *self, sqlx::raw_sql(sql)).await?;
                    Ok(result.rows_affected())
                })
            }

            fn execute_with<'a>(
                &'a mut self,
                sql: &'a str,
                args: &'a [Value],
            ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
                Box::pin(async move {
                    let result = bind_all!($db, sql, args).execute(&mut *self).await?;
                    Ok(result.rows_affected())
                })
            }

            fn fetch_all<'a>(
                &'a mut self,
                sql: &'a str,
                args: &'a [Value],
            ) -> BoxFuture<'a, Result<Vec<Row>, sqlx::Error>> {
                Box::pin(async move {
                    let rows = bind_all!($db, sql, args).fetch_all(&mut *self).await?;
                    rows.iter().map(|row| decode_row(row)).collect()
                })
            }

            fn fetch_history<'a>(
                &'a mut self,
                sql: &'a str,
            ) -> BoxFuture<'a, Result<Vec<HistoryRecord>, sqlx::Error>> {
                Box::pin(async move {
                    let rows = sqlx::Executor::fetch_all(&mut *self, sqlx::raw_sql(sql)).await?;
                    rows.iter().map($decode).collect()
                })
            }
        }

        impl Executor for sqlx::Transaction<'_, $db> {
            fn execute<'a>(
                &'a mut self,
                sql: &'a str,
            ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
                Box::pin(async move {
                    let result = sqlx::Executor::execute(&mut **self, sqlx::raw_sql(sql)).await?;
                    Ok(result.rows_affected())
                })
            }

            fn execute_with<'a>(
                &'a mut self,
                sql: &'a str,
                args: &'a [Value],
            ) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
                Box::pin(async move {
                    let result = bind_all!($db, sql, args).execute(&mut **self).await?;
                    Ok(result.rows_affected())
                })
            }

            fn fetch_all<'a>(
                &'a mut self,
                sql: &'a str,
                args: &'a [Value],
            ) -> BoxFuture<'a, Result<Vec<Row>, sqlx::Error>> {
                Box::pin(async move {
                    let rows = bind_all!($db, sql, args).fetch_all(&mut **self).await?;
                    rows.iter().map(|row| decode_row(row)).collect()
                })
            }

            fn fetch_history<'a>(
                &'a mut self,
                sql: &'a str,
            ) -> BoxFuture<'a, Result<Vec<HistoryRecord>, sqlx::Error>> {
                Box::pin(async move {
                    let rows = sqlx::Executor::fetch_all(&mut **self, sqlx::raw_sql(sql)).await?;
                    rows.iter().map($decode).collect()
                })
            }
        }

        impl<'c> Transaction<'c> for sqlx::Transaction<'c, $db> {
            fn as_executor(&mut self) -> &mut dyn Executor {
                self
            }

            fn commit(self: Box<Self>) -> BoxFuture<'c, Result<(), sqlx::Error>> {
                Box::pin((*self).commit())
            }
        }

        impl Database for $conn {
            fn begin<'a>(
                &'a mut self,
            ) -> BoxFuture<'a, Result<Option<Box<dyn Transaction<'a> + 'a>>, sqlx::Error>> {
                Box::pin(async move {
                    let tx = sqlx::Connection::begin(self).await?;
                    Ok(Some(Box::new(tx) as Box<dyn Transaction<'a> + 'a>))
                })
            }
        }
    };
}

impl_database!(sqlx::Sqlite, sqlx::SqliteConnection, decode_sqlite);

#[cfg(feature = "postgres")]
impl_database!(sqlx::Postgres, sqlx::PgConnection, decode_postgres);

#[cfg(feature = "mysql")]
impl_database!(sqlx::MySql, sqlx::MySqlConnection, decode_mysql);
