//! Migrator runs against in-memory SQLite.

use dbm_core::classify::ConstraintKind;
use dbm_core::DdlError;
use dbm_migrate::history::HistoryRecord;
use dbm_migrate::prelude::*;
use dbm_migrate::Transaction;
use futures::future::BoxFuture;
use sqlx::{Connection, SqliteConnection};

type DbResult<T> = std::result::Result<T, sqlx::Error>;

async fn connect() -> SqliteConnection {
    SqliteConnection::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite")
}

fn register_todos<D: Database>(migrator: &mut Migrator<D>) {
    migrator
        .register(
            1,
            |schema| {
                schema.create_table("todos", |t| {
                    t.id("id");
                    t.string("title").required();
                });
            },
            |schema| schema.drop_table("todos"),
        )
        .register(
            2,
            |schema| {
                schema.alter_table("todos", |t| {
                    t.bool("completed").required().default(false);
                });
            },
            |schema| {
                schema.alter_table("todos", |t| t.drop_column("completed"));
            },
        );
}

fn versions(history: &[HistoryRecord]) -> Vec<i64> {
    history.iter().map(|record| record.version).collect()
}

async fn column_count(conn: &mut SqliteConnection, table: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?)")
        .bind(table)
        .fetch_one(conn)
        .await
        .unwrap()
}

async fn table_exists(conn: &mut SqliteConnection, table: &str) -> bool {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name=?")
            .bind(table)
            .fetch_optional(conn)
            .await
            .unwrap();
    row.is_some()
}

/// Counts statements and transactions issued through the wrapped database.
struct Counting<D> {
    inner: D,
    executed: usize,
    begun: usize,
}

impl<D> Counting<D> {
    const fn new(inner: D) -> Self {
        Self {
            inner,
            executed: 0,
            begun: 0,
        }
    }
}

impl<D: Executor> Executor for Counting<D> {
    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, DbResult<u64>> {
        self.executed += 1;
        self.inner.execute(sql)
    }

    fn execute_with<'a>(
        &'a mut self,
        sql: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, DbResult<u64>> {
        self.executed += 1;
        self.inner.execute_with(sql, args)
    }

    fn fetch_all<'a>(
        &'a mut self,
        sql: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, DbResult<Vec<Row>>> {
        self.inner.fetch_all(sql, args)
    }

    fn fetch_history<'a>(
        &'a mut self,
        sql: &'a str,
    ) -> BoxFuture<'a, DbResult<Vec<HistoryRecord>>> {
        self.inner.fetch_history(sql)
    }
}

impl<D: Database> Database for Counting<D> {
    fn begin<'a>(
        &'a mut self,
    ) -> BoxFuture<'a, DbResult<Option<Box<dyn Transaction<'a> + 'a>>>> {
        self.begun += 1;
        self.inner.begin()
    }
}

/// A backend without transaction support.
struct NoTransactions(SqliteConnection);

impl Executor for NoTransactions {
    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, DbResult<u64>> {
        Executor::execute(&mut self.0, sql)
    }

    fn execute_with<'a>(
        &'a mut self,
        sql: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, DbResult<u64>> {
        self.0.execute_with(sql, args)
    }

    fn fetch_all<'a>(
        &'a mut self,
        sql: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, DbResult<Vec<Row>>> {
        Executor::fetch_all(&mut self.0, sql, args)
    }

    fn fetch_history<'a>(
        &'a mut self,
        sql: &'a str,
    ) -> BoxFuture<'a, DbResult<Vec<HistoryRecord>>> {
        self.0.fetch_history(sql)
    }
}

impl Database for NoTransactions {}

#[tokio::test]
async fn test_todos_migrate_then_rollback() {
    let mut migrator = Migrator::for_driver("sqlite3", connect().await).unwrap();
    register_todos(&mut migrator);

    migrator.migrate().await.unwrap();

    assert_eq!(versions(&migrator.history().await.unwrap()), [1, 2]);
    assert_eq!(column_count(migrator.database_mut(), "todos").await, 3);

    migrator.rollback().await.unwrap();

    assert_eq!(versions(&migrator.history().await.unwrap()), [1]);
    assert_eq!(column_count(migrator.database_mut(), "todos").await, 2);

    let status: Vec<_> = migrator
        .status()
        .await
        .unwrap()
        .iter()
        .map(|v| (v.version(), v.applied()))
        .collect();
    assert_eq!(status, [(1, true), (2, false)]);
}

#[tokio::test]
async fn test_second_migrate_executes_nothing() {
    let mut migrator = Migrator::for_driver("sqlite", Counting::new(connect().await)).unwrap();
    register_todos(&mut migrator);

    migrator.migrate().await.unwrap();
    let db = migrator.database_mut();
    assert_eq!(db.begun, 2);
    // history table only; version steps run on the transactions
    assert_eq!(db.executed, 1);
    db.executed = 0;
    db.begun = 0;

    migrator.migrate().await.unwrap();
    let db = migrator.database_mut();
    assert_eq!(db.executed, 0);
    assert_eq!(db.begun, 0);
}

#[tokio::test]
async fn test_rollback_removes_only_highest_version() {
    let mut migrator = Migrator::for_driver("sqlite", connect().await).unwrap();
    for (version, table) in [(3, "c"), (1, "a"), (2, "b")] {
        migrator.register(
            version,
            |schema| schema.create_table(table, |t| {
                t.id("id");
            }),
            |schema| schema.drop_table(table),
        );
    }

    migrator.migrate().await.unwrap();
    assert_eq!(versions(&migrator.history().await.unwrap()), [1, 2, 3]);

    migrator.rollback().await.unwrap();

    assert_eq!(versions(&migrator.history().await.unwrap()), [1, 2]);
    assert!(table_exists(migrator.database_mut(), "b").await);
    assert!(!table_exists(migrator.database_mut(), "c").await);
}

#[tokio::test]
async fn test_rollback_without_applied_versions_is_noop() {
    let mut migrator = Migrator::for_driver("sqlite", Counting::new(connect().await)).unwrap();
    register_todos(&mut migrator);

    migrator.rollback().await.unwrap();

    assert!(migrator.history().await.unwrap().is_empty());
    assert_eq!(migrator.database_mut().begun, 0);
}

#[tokio::test]
async fn test_missing_local_version_fails() {
    let mut migrator = Migrator::for_driver("sqlite", connect().await).unwrap();
    for version in [1, 2, 3] {
        migrator.register(version, |_| {}, |_| {});
    }
    migrator.migrate().await.unwrap();

    let mut migrator = Migrator::for_driver("sqlite", migrator.into_inner()).unwrap();
    for version in [1, 3] {
        migrator.register(version, |_| {}, |_| {});
    }

    let err = migrator.migrate().await.unwrap_err();
    assert!(matches!(err, MigrateError::MissingLocalVersion(2)), "{err}");
}

#[tokio::test]
async fn test_callback_changeset_runs_against_database() {
    let mut migrator = Migrator::for_driver("sqlite", connect().await).unwrap();
    migrator.register(
        1,
        |schema| {
            schema.create_table("todos", |t| {
                t.id("id");
                t.string("title").required();
            });
            schema.run(|db| {
                Box::pin(async move {
                    db.execute("INSERT INTO todos (title) VALUES ('Do Homework')")
                        .await?;
                    Ok(())
                })
            });
        },
        |schema| schema.drop_table("todos"),
    );

    migrator.migrate().await.unwrap();

    let titles: Vec<String> = sqlx::query_scalar("SELECT title FROM todos")
        .fetch_all(migrator.database_mut())
        .await
        .unwrap();
    assert_eq!(titles, ["Do Homework"]);
}

#[tokio::test]
async fn test_callback_reads_rows_and_binds_values() {
    let mut migrator = Migrator::for_driver("sqlite", connect().await).unwrap();
    migrator.register(
        1,
        |schema| {
            schema.create_table("todos", |t| {
                t.id("id");
                t.string("title").required();
                t.int("estimate");
            });
            schema.create_table("todo_labels", |t| {
                t.id("id");
                t.int("todo_id").required();
                t.string("label").required();
                t.float("weight");
            });
            schema.exec(
                "INSERT INTO todos (title, estimate) VALUES ('Do Homework', 3), ('O''Neil call', NULL)",
            );
            schema.run(|db| {
                Box::pin(async move {
                    let todos = db
                        .fetch_all("SELECT id, title, estimate FROM todos ORDER BY id", &[])
                        .await?;
                    for todo in todos {
                        let label = todo[1].as_str().unwrap_or_default().to_uppercase();
                        let weight = todo[2].as_i64().map(|n| n as f64 / 2.0);
                        db.execute_with(
                            "INSERT INTO todo_labels (todo_id, label, weight) VALUES (?, ?, ?)",
                            &[todo[0].clone(), Value::from(label), Value::from(weight)],
                        )
                        .await?;
                    }
                    Ok(())
                })
            });
        },
        |schema| {
            schema.drop_table("todo_labels");
            schema.drop_table("todos");
        },
    );

    migrator.migrate().await.unwrap();

    let labels = migrator
        .database_mut()
        .fetch_all(
            "SELECT todo_id, label, weight FROM todo_labels WHERE label LIKE ? ORDER BY todo_id",
            &[Value::from("%O%")],
        )
        .await
        .unwrap();
    assert_eq!(
        labels,
        [
            vec![
                Value::Int(1),
                Value::from("DO HOMEWORK"),
                Value::Float(1.5)
            ],
            vec![Value::Int(2), Value::from("O'NEIL CALL"), Value::Null],
        ]
    );
}

#[tokio::test]
async fn test_unique_violation_is_classified_and_step_rolled_back() {
    let mut migrator = Migrator::for_driver("sqlite", connect().await).unwrap();
    migrator
        .register(
            1,
            |schema| {
                schema.create_table("users", |t| {
                    t.id("id");
                    t.string("email").unique();
                });
            },
            |schema| schema.drop_table("users"),
        )
        .register(
            2,
            |schema| {
                schema.exec("INSERT INTO users (email) VALUES ('a@b.c')");
                schema.exec("INSERT INTO users (email) VALUES ('a@b.c')");
            },
            |schema| schema.exec("DELETE FROM users"),
        );

    let err = migrator.migrate().await.unwrap_err();

    let constraint = err.as_constraint().expect("constraint violation");
    assert_eq!(constraint.kind, ConstraintKind::Unique);
    assert_eq!(constraint.key, "users.email");

    assert_eq!(versions(&migrator.history().await.unwrap()), [1]);
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(migrator.database_mut())
        .await
        .unwrap();
    assert_eq!(users, 0);
}

#[tokio::test]
async fn test_failure_without_transactions_keeps_history_row() {
    let mut migrator =
        Migrator::for_driver("sqlite", NoTransactions(connect().await)).unwrap();
    migrator.register(
        1,
        |schema| schema.exec("THIS IS NOT SQL"),
        |_| {},
    );

    let err = migrator.migrate().await.unwrap_err();
    assert!(matches!(err, MigrateError::Database(_)), "{err}");

    assert_eq!(versions(&migrator.history().await.unwrap()), [1]);
}

#[tokio::test]
async fn test_non_transactional_config() {
    let config = MigratorConfig {
        history_table: "schema_history".to_string(),
        transactional: false,
    };
    let mut migrator = Migrator::for_driver("sqlite", Counting::new(connect().await))
        .unwrap()
        .with_config(config);
    register_todos(&mut migrator);

    migrator.migrate().await.unwrap();

    let db = migrator.database_mut();
    assert_eq!(db.begun, 0);
    // history table, then a history row and a changeset per version
    assert_eq!(db.executed, 5);
    assert!(table_exists(&mut db.inner, "schema_history").await);
    assert!(!table_exists(&mut db.inner, "dbm_schema_versions").await);
}

#[tokio::test]
async fn test_rendering_error_stops_run() {
    let mut migrator = Migrator::for_driver("sqlite", connect().await).unwrap();
    migrator
        .register(
            1,
            |schema| {
                schema.create_table("todos", |t| {
                    t.id("id");
                });
            },
            |_| {},
        )
        .register(
            2,
            |schema| {
                schema.alter_table("todos", |t| {
                    t.alter_column("id", ColumnKind::BigInt);
                });
            },
            |_| {},
        );

    let err = migrator.migrate().await.unwrap_err();
    assert!(
        matches!(err, MigrateError::Ddl(DdlError::AlterColumnInPlace { .. })),
        "{err}"
    );
    assert_eq!(versions(&migrator.history().await.unwrap()), [1]);
}

#[tokio::test]
async fn test_duplicate_registration_fails() {
    let mut migrator = Migrator::for_driver("sqlite", connect().await).unwrap();
    migrator.register(7, |_| {}, |_| {});
    migrator.register(7, |_| {}, |_| {});

    assert!(matches!(
        migrator.migrate().await,
        Err(MigrateError::DuplicateVersion(7))
    ));
}

#[tokio::test]
async fn test_unknown_driver_fails_fast() {
    let result = Migrator::for_driver("oracle", connect().await);

    assert!(matches!(
        result,
        Err(MigrateError::Ddl(DdlError::UnsupportedDialect(ref name))) if name == "oracle"
    ));
}
