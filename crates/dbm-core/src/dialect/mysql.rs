//! MySQL dialect.

use super::generic::format_default;
use super::{map_generic, ColumnMapper, ColumnType, DdlPolicy, Dialect};
use crate::buffer::DATETIME_LAYOUT;
use crate::classify::{extract_between, ConstraintKind, ErrorClassifier, Violation};
use crate::error::{DdlError, Result};
use crate::quote::{Quote, Quoter};
use crate::schema::{Column, ColumnKind, KeyKind};

/// MySQL / MariaDB.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Quoter for MySql {
    fn quote_identifier(&self, name: &str) -> String {
        Quote::BACKTICK.cut_at_nul().identifier(name)
    }

    // Assumes NO_BACKSLASH_ESCAPES is off.
    fn quote_value(&self, value: &str) -> String {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for c in value.chars() {
            match c {
                '\0' => quoted.push_str("\\0"),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                '\x1a' => quoted.push_str("\\Z"),
                '\'' => quoted.push_str("\\'"),
                '"' => quoted.push_str("\\\""),
                '\\' => quoted.push_str("\\\\"),
                c => quoted.push(c),
            }
        }
        quoted.push('\'');
        quoted
    }
}

impl ColumnMapper for MySql {
    fn map_column(&self, column: &mut Column) -> ColumnType {
        match column.kind {
            ColumnKind::Json => ColumnType::bare("JSON"),
            ColumnKind::DateTime => {
                let ty = ColumnType::sized("DATETIME", column.precision);
                format_default(column, DATETIME_LAYOUT);
                ty
            }
            _ => map_generic(column),
        }
    }
}

impl DdlPolicy for MySql {
    fn drop_key_keyword(&self, kind: KeyKind) -> Result<&'static str> {
        match kind {
            KeyKind::Foreign => Ok("FOREIGN KEY"),
            kind => Err(DdlError::UnsupportedDropKey {
                dialect: self.name(),
                kind,
            }),
        }
    }

    fn drop_index_on_table(&self) -> bool {
        true
    }
}

impl ErrorClassifier for MySql {
    fn classify(&self, message: &str) -> Option<Violation> {
        // go-sql-driver style "Error 1062: ..." and sqlx style "1062 (23000): ...".
        let code = message.split(':').next().unwrap_or_default();
        let code = code.strip_prefix("Error ").unwrap_or(code);
        let code = code.split_whitespace().next().unwrap_or_default();

        match code {
            "1062" => Some(Violation::new(
                ConstraintKind::Unique,
                extract_between(message, "key '", "'"),
            )),
            "1452" => Some(Violation::new(
                ConstraintKind::ForeignKey,
                extract_between(message, "CONSTRAINT `", "`"),
            )),
            _ => None,
        }
    }
}

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DefaultValue;
    use chrono::DateTime;

    #[test]
    fn test_mysql_quote_value_escapes() {
        assert_eq!(MySql.quote_value("it's"), "'it\\'s'");
        assert_eq!(
            MySql.quote_value("a\0b\nc\rd\x1ae\"f\\g"),
            "'a\\0b\\nc\\rd\\Ze\\\"f\\\\g'"
        );
    }

    #[test]
    fn test_mysql_quote_identifier() {
        assert_eq!(MySql.quote_identifier("my`table"), "`my``table`");
        assert_eq!(MySql.quote_identifier("users\0x"), "`users`");
    }

    #[test]
    fn test_mysql_column_types() {
        let mut json = Column::new("doc", ColumnKind::Json);
        assert_eq!(MySql.map_column(&mut json), ColumnType::bare("JSON"));

        let at = DateTime::parse_from_rfc3339("2020-01-01T01:00:00+00:00").unwrap();
        let mut datetime = Column::new("at", ColumnKind::DateTime);
        datetime.precision(3).default(at);
        assert_eq!(
            MySql.map_column(&mut datetime),
            ColumnType::sized("DATETIME", Some(3))
        );
        assert_eq!(
            datetime.default,
            Some(DefaultValue::from("2020-01-01 01:00:00"))
        );

        let mut id = Column::new("id", ColumnKind::Id);
        assert_eq!(
            MySql.map_column(&mut id),
            ColumnType::bare("INT UNSIGNED AUTO_INCREMENT")
        );
    }

    #[test]
    fn test_mysql_drop_key_keyword() {
        assert_eq!(MySql.drop_key_keyword(KeyKind::Foreign), Ok("FOREIGN KEY"));
        assert_eq!(
            MySql.drop_key_keyword(KeyKind::Unique),
            Err(DdlError::UnsupportedDropKey {
                dialect: "mysql",
                kind: KeyKind::Unique,
            })
        );
    }

    #[test]
    fn test_mysql_classify_unique() {
        let violation = MySql
            .classify("Error 1062: Duplicate entry 'a@b.c' for key 'users_email_unique'")
            .unwrap();
        assert_eq!(violation.kind, ConstraintKind::Unique);
        assert_eq!(violation.key, "users_email_unique");

        let violation = MySql
            .classify("1062 (23000): Duplicate entry 'x' for key 'users.users_email_unique'")
            .unwrap();
        assert_eq!(violation.key, "users.users_email_unique");
    }

    #[test]
    fn test_mysql_classify_foreign_key() {
        let violation = MySql
            .classify("Error 1452: a foreign key constraint fails (CONSTRAINT `todos_user_fk`)")
            .unwrap();
        assert_eq!(violation.kind, ConstraintKind::ForeignKey);
        assert_eq!(violation.key, "todos_user_fk");
    }

    #[test]
    fn test_mysql_classify_unknown() {
        assert_eq!(MySql.classify("Error 1146: Table 'x' doesn't exist"), None);
        assert_eq!(MySql.classify("connection refused"), None);
    }
}
