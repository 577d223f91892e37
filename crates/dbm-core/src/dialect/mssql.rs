//! Microsoft SQL Server dialect.

use super::generic::format_default;
use super::{ColumnMapper, ColumnType, DdlPolicy, Dialect};
use crate::buffer::{DATETIME_LAYOUT, DATE_LAYOUT, TIME_LAYOUT};
use crate::classify::{extract_between, ConstraintKind, ErrorClassifier, Violation};
use crate::error::Result;
use crate::quote::{single_quoted, Quote, Quoter};
use crate::schema::{Column, ColumnKind, KeyKind};

/// Largest bounded `NVARCHAR` length.
const MAX_NVARCHAR: u32 = 4000;

/// Microsoft SQL Server.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSql;

impl Quoter for MsSql {
    fn quote_identifier(&self, name: &str) -> String {
        Quote::BRACKET.identifier(name)
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

impl ColumnMapper for MsSql {
    fn map_column(&self, column: &mut Column) -> ColumnType {
        // No unsigned integer types.
        column.unsigned = false;

        let mut layout = DATETIME_LAYOUT;
        let ty = match &column.kind {
            ColumnKind::Id => ColumnType::bare("INT NOT NULL IDENTITY(1,1)"),
            ColumnKind::BigId => ColumnType::bare("BIGINT NOT NULL IDENTITY(1,1)"),
            ColumnKind::Bool => ColumnType::bare("BIT"),
            ColumnKind::Int => ColumnType::bare("INT"),
            ColumnKind::BigInt => ColumnType::bare("BIGINT"),
            ColumnKind::Float => ColumnType::sized("FLOAT", column.precision),
            ColumnKind::Decimal => {
                ColumnType::sized("DECIMAL", column.precision).with_scale(column.scale)
            }
            ColumnKind::String => {
                let limit = column
                    .limit
                    .filter(|l| *l > 0)
                    .map_or(255, |l| l.min(MAX_NVARCHAR));
                ColumnType::sized("NVARCHAR", Some(limit))
            }
            ColumnKind::Text | ColumnKind::Json => ColumnType::bare("NVARCHAR(MAX)"),
            ColumnKind::Date => {
                layout = DATE_LAYOUT;
                ColumnType::bare("DATE")
            }
            ColumnKind::DateTime => ColumnType::bare("DATETIMEOFFSET"),
            ColumnKind::Time => {
                layout = TIME_LAYOUT;
                ColumnType::bare("TIME")
            }
            ColumnKind::Raw(name) => ColumnType::bare(name.clone()),
        };

        format_default(column, layout);
        ty
    }
}

impl DdlPolicy for MsSql {
    fn drop_key_keyword(&self, _kind: KeyKind) -> Result<&'static str> {
        Ok("CONSTRAINT")
    }

    fn drop_index_on_table(&self) -> bool {
        true
    }

    fn create_table_guard(&self, name: &str) -> Option<String> {
        Some(format!(
            "IF OBJECT_ID({}, 'U') IS NULL ",
            single_quoted(name)
        ))
    }
}

impl ErrorClassifier for MsSql {
    fn classify(&self, message: &str) -> Option<Violation> {
        let text = message.strip_prefix("mssql: ").unwrap_or(message);

        if text.starts_with("Violation of PRIMARY KEY") || text.starts_with("Violation of UNIQUE KEY")
        {
            return Some(Violation::new(
                ConstraintKind::Unique,
                extract_between(message, "constraint '", "'"),
            ));
        }

        if text.starts_with("The ") && text.contains(" statement conflicted with the FOREIGN KEY") {
            return Some(Violation::new(
                ConstraintKind::ForeignKey,
                extract_between(message, "FOREIGN KEY constraint \"", "\""),
            ));
        }

        if text.starts_with("The ") && text.contains(" statement conflicted with the CHECK") {
            return Some(Violation::new(
                ConstraintKind::Check,
                extract_between(message, "CHECK constraint \"", "\""),
            ));
        }

        None
    }
}

impl Dialect for MsSql {
    fn name(&self) -> &'static str {
        "mssql"
    }
}
