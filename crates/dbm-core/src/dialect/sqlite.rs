//! SQLite dialect.

use super::{map_generic, ColumnMapper, ColumnType, DdlPolicy, Dialect};
use crate::classify::{ConstraintKind, ErrorClassifier, Violation};
use crate::error::{DdlError, Result};
use crate::quote::{single_quoted, Quote, Quoter};
use crate::schema::{Column, ColumnKind, Definition, KeyKind, SchemaOp, Table};

/// SQLite 3.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Quoter for Sqlite {
    fn quote_identifier(&self, name: &str) -> String {
        Quote::DOUBLE.identifier(name)
    }

    fn quote_value(&self, value: &str) -> String {
        single_quoted(value)
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }
}

impl ColumnMapper for Sqlite {
    fn map_column(&self, column: &mut Column) -> ColumnType {
        let unsigned = std::mem::take(&mut column.unsigned);

        let mut ty = match column.kind {
            ColumnKind::Id => ColumnType::bare("INTEGER"),
            ColumnKind::BigId => ColumnType::bare("BIGINT"),
            ColumnKind::Int => ColumnType::sized("INTEGER", column.limit),
            _ => map_generic(column),
        };

        if unsigned {
            ty.name = format!("UNSIGNED {}", ty.name);
        }
        ty
    }
}

impl DdlPolicy for Sqlite {
    fn drop_key_keyword(&self, kind: KeyKind) -> Result<&'static str> {
        Err(DdlError::UnsupportedDropKey {
            dialect: self.name(),
            kind,
        })
    }

    // ALTER TABLE only supports RENAME TABLE, ADD/RENAME/DROP COLUMN.
    fn keep_definition(&self, table: &Table, definition: &Definition) -> bool {
        !(table.op == SchemaOp::Alter && matches!(definition, Definition::Key(_)))
    }
}

impl ErrorClassifier for Sqlite {
    fn classify(&self, message: &str) -> Option<Violation> {
        const FAILED: &str = " failed: ";

        let index = message.find(FAILED)?;
        let head = &message[..index];
        let key = &message[index + FAILED.len()..];

        // sqlx prefixes the message with "(code: NNNN) ".
        if head.ends_with("UNIQUE constraint") {
            Some(Violation::new(ConstraintKind::Unique, key))
        } else if head.ends_with("CHECK constraint") {
            Some(Violation::new(ConstraintKind::Check, key))
        } else {
            None
        }
    }
}

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }
}
