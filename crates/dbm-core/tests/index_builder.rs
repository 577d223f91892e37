//! Golden tests for the index builder.

use dbm_core::dialect::{Dialect, MsSql, MySql, Postgres, Sqlite};
use dbm_core::schema::{Index, SchemaOp};
use dbm_core::DdlError;

fn index(columns: &[&str]) -> Index {
    Index::create("table", "index", columns.iter().copied())
}

#[test]
fn test_create_index() {
    assert_eq!(
        MySql.build_index(&index(&["column1"])).unwrap(),
        "CREATE INDEX `index` ON `table` (`column1`);"
    );
}

#[test]
fn test_create_unique_index() {
    let mut idx = index(&["column1"]);
    idx.unique();
    assert_eq!(
        MySql.build_index(&idx).unwrap(),
        "CREATE UNIQUE INDEX `index` ON `table` (`column1`);"
    );
}

#[test]
fn test_create_index_multiple_columns() {
    assert_eq!(
        MySql.build_index(&index(&["column1", "column2"])).unwrap(),
        "CREATE INDEX `index` ON `table` (`column1`, `column2`);"
    );
}

#[test]
fn test_create_index_if_not_exists_with_options() {
    let mut idx = index(&["column1"]);
    idx.optional();
    assert_eq!(
        MySql.build_index(&idx).unwrap(),
        "CREATE INDEX IF NOT EXISTS `index` ON `table` (`column1`);"
    );

    idx.options("COMMENT 'comment'");
    assert_eq!(
        MySql.build_index(&idx).unwrap(),
        "CREATE INDEX IF NOT EXISTS `index` ON `table` (`column1`) COMMENT 'comment';"
    );
}

#[test]
fn test_drop_index_on_table_is_dialect_capability() {
    let mut idx = Index::drop("table", "index");
    assert_eq!(
        MySql.build_index(&idx).unwrap(),
        "DROP INDEX `index` ON `table`;"
    );
    assert_eq!(
        Postgres.build_index(&idx).unwrap(),
        r#"DROP INDEX "index";"#
    );
    assert_eq!(Sqlite.build_index(&idx).unwrap(), r#"DROP INDEX "index";"#);
    assert_eq!(
        MsSql.build_index(&idx).unwrap(),
        "DROP INDEX [index] ON [table];"
    );

    idx.optional();
    assert_eq!(
        MySql.build_index(&idx).unwrap(),
        "DROP INDEX IF EXISTS `index` ON `table`;"
    );
    assert_eq!(
        Postgres.build_index(&idx).unwrap(),
        r#"DROP INDEX IF EXISTS "index";"#
    );
}

#[test]
fn test_rename_index_fails() {
    let mut idx = index(&["column1"]);
    idx.op = SchemaOp::Rename;

    assert_eq!(
        Postgres.build_index(&idx),
        Err(DdlError::UnsupportedOperation {
            object: "index `index`".to_string(),
            op: SchemaOp::Rename,
        })
    );
}
