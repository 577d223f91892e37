//! Generic SQL dialect and the shared column mapping.

use super::{ColumnMapper, ColumnType, DdlPolicy, Dialect};
use crate::buffer::{format_timestamp, DATETIME_LAYOUT, DATE_LAYOUT, TIME_LAYOUT};
use crate::classify::{ErrorClassifier, Violation};
use crate::error::Result;
use crate::quote::{single_quoted, Quote, Quoter};
use crate::schema::{Column, ColumnKind, DefaultValue, KeyKind};

/// Maps a column with the generic SQL type table.
///
/// Timestamp defaults are rewritten as strings formatted with the layout
/// of the column kind. Dialects fall back to this for kinds they do not
/// override.
pub fn map_generic(column: &mut Column) -> ColumnType {
    let mut layout = DATETIME_LAYOUT;

    let ty = match &column.kind {
        ColumnKind::Id => ColumnType::bare("INT UNSIGNED AUTO_INCREMENT"),
        ColumnKind::BigId => ColumnType::bare("BIGINT UNSIGNED AUTO_INCREMENT"),
        ColumnKind::Bool => ColumnType::bare("BOOL"),
        ColumnKind::Int => ColumnType::sized("INT", column.limit),
        ColumnKind::BigInt => ColumnType::sized("BIGINT", column.limit),
        ColumnKind::Float => ColumnType::sized("FLOAT", column.precision),
        ColumnKind::Decimal => {
            ColumnType::sized("DECIMAL", column.precision).with_scale(column.scale)
        }
        ColumnKind::String => ColumnType::sized("VARCHAR", column.limit.or(Some(255))),
        ColumnKind::Text => ColumnType::sized("TEXT", column.limit),
        ColumnKind::Json => ColumnType::bare("TEXT"),
        ColumnKind::Date => {
            layout = DATE_LAYOUT;
            ColumnType::bare("DATE")
        }
        ColumnKind::DateTime => ColumnType::bare("DATETIME"),
        ColumnKind::Time => {
            layout = TIME_LAYOUT;
            ColumnType::bare("TIME")
        }
        ColumnKind::Raw(name) => ColumnType::bare(name.clone()),
    };

    format_default(column, layout);
    ty
}

/// Rewrites a timestamp default as a string formatted with `layout`.
pub(crate) fn format_default(column: &mut Column, layout: &str) {
    if let Some(DefaultValue::Timestamp(at)) = &column.default {
        column.default = Some(DefaultValue::String(format_timestamp(at, layout)));
    }
}

/// Generic SQL: backtick identifiers, standard string literals and the
/// generic type table. Not selectable by driver name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl Quoter for Generic {
    fn quote_identifier(&self, name: &str) -> String {
        Quote::BACKTICK.identifier(name)
    }

    fn quote_value(&self, value: &str) -> String {
        single_quoted(value)
    }
}

impl ColumnMapper for Generic {
    fn map_column(&self, column: &mut Column) -> ColumnType {
        map_generic(column)
    }
}

impl DdlPolicy for Generic {
    fn drop_key_keyword(&self, _kind: KeyKind) -> Result<&'static str> {
        Ok("CONSTRAINT")
    }
}

impl ErrorClassifier for Generic {
    fn classify(&self, _message: &str) -> Option<Violation> {
        None
    }
}

impl Dialect for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }
}
