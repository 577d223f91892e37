//! PostgreSQL dialect.

use super::generic::format_default;
use super::{map_generic, ColumnMapper, ColumnType, DdlPolicy, Dialect};
use crate::buffer::OFFSET_DATETIME_LAYOUT;
use crate::classify::{extract_between, ConstraintKind, ErrorClassifier, Violation};
use crate::error::Result;
use crate::quote::{Quote, Quoter};
use crate::schema::{Column, ColumnKind, DefaultValue, KeyKind};

/// PostgreSQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Quoter for Postgres {
    fn quote_identifier(&self, name: &str) -> String {
        Quote::DOUBLE.cut_at_nul().identifier(name)
    }

    /// Doubles single quotes; a value containing a backslash becomes an
    /// `E'...'` literal with backslashes doubled.
    fn quote_value(&self, value: &str) -> String {
        let value = value.replace('\'', "''");
        if value.contains('\\') {
            format!("E'{}'", value.replace('\\', "\\\\"))
        } else {
            format!("'{value}'")
        }
    }
}

impl ColumnMapper for Postgres {
    fn map_column(&self, column: &mut Column) -> ColumnType {
        column.unsigned = false;
        if matches!(&column.default, Some(DefaultValue::String(s)) if s.is_empty()) {
            column.default = None;
        }

        match column.kind {
            ColumnKind::Id => ColumnType::bare("SERIAL NOT NULL"),
            ColumnKind::BigId => ColumnType::bare("BIGSERIAL NOT NULL"),
            ColumnKind::DateTime => {
                format_default(column, OFFSET_DATETIME_LAYOUT);
                ColumnType::bare("TIMESTAMPTZ")
            }
            ColumnKind::Int | ColumnKind::BigInt | ColumnKind::Text => {
                column.limit = None;
                map_generic(column)
            }
            ColumnKind::Json => ColumnType::bare("JSONB"),
            _ => map_generic(column),
        }
    }
}

impl DdlPolicy for Postgres {
    fn drop_key_keyword(&self, _kind: KeyKind) -> Result<&'static str> {
        Ok("CONSTRAINT")
    }
}

impl ErrorClassifier for Postgres {
    fn classify(&self, message: &str) -> Option<Violation> {
        let kind = match extract_between(message, "violates ", " constraint") {
            "unique" => ConstraintKind::Unique,
            "foreign key" => ConstraintKind::ForeignKey,
            "check" => ConstraintKind::Check,
            _ => return None,
        };
        Some(Violation::new(
            kind,
            extract_between(message, "constraint \"", "\""),
        ))
    }
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_postgres_quote_value() {
        assert_eq!(Postgres.quote_value("it's"), "'it''s'");
        assert_eq!(Postgres.quote_value("C:\\dir"), "E'C:\\\\dir'");
        assert_eq!(Postgres.quote_value("o'\\"), "E'o''\\\\'");
    }

    #[test]
    fn test_postgres_quote_identifier() {
        assert_eq!(Postgres.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(Postgres.quote_identifier("a\0b"), "\"a\"");
    }

    #[test]
    fn test_postgres_column_normalization() {
        let mut id = Column::new("id", ColumnKind::Id);
        id.unsigned();
        assert_eq!(Postgres.map_column(&mut id), ColumnType::bare("SERIAL NOT NULL"));
        assert!(!id.unsigned);

        let mut big = Column::new("n", ColumnKind::BigInt);
        big.limit(20).default("");
        assert_eq!(Postgres.map_column(&mut big), ColumnType::bare("BIGINT"));
        assert_eq!(big.default, None);

        let mut doc = Column::new("doc", ColumnKind::Json);
        assert_eq!(Postgres.map_column(&mut doc), ColumnType::bare("JSONB"));

        let mut name = Column::new("name", ColumnKind::String);
        assert_eq!(
            Postgres.map_column(&mut name),
            ColumnType::sized("VARCHAR", Some(255))
        );
    }

    #[test]
    fn test_postgres_datetime_default_keeps_offset() {
        let at = DateTime::parse_from_rfc3339("2020-01-01T01:00:00+07:00").unwrap();
        let mut column = Column::new("at", ColumnKind::DateTime);
        column.default(at);
        assert_eq!(
            Postgres.map_column(&mut column),
            ColumnType::bare("TIMESTAMPTZ")
        );
        assert_eq!(
            column.default,
            Some(DefaultValue::from("2020-01-01 01:00:00+07:00"))
        );
    }

    #[test]
    fn test_postgres_classify() {
        let violation = Postgres
            .classify(
                "error returned from database: duplicate key value violates unique constraint \"idx_x\"",
            )
            .unwrap();
        assert_eq!(violation, Violation::new(ConstraintKind::Unique, "idx_x"));

        let violation = Postgres
            .classify(
                "insert or update on table \"todos\" violates foreign key constraint \"todos_user_id_fkey\"",
            )
            .unwrap();
        assert_eq!(
            violation,
            Violation::new(ConstraintKind::ForeignKey, "todos_user_id_fkey")
        );

        let violation = Postgres
            .classify("new row for relation \"t\" violates check constraint \"positive\"")
            .unwrap();
        assert_eq!(violation.kind, ConstraintKind::Check);
        assert_eq!(violation.key, "positive");
    }

    #[test]
    fn test_postgres_classify_unknown() {
        assert_eq!(Postgres.classify("relation \"t\" does not exist"), None);
        assert_eq!(
            Postgres.classify("null value violates not-null constraint"),
            None
        );
    }
}
