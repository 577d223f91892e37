//! Column definitions.
//!
//! A [`Column`] carries an abstract [`ColumnKind`] plus constraints. The
//! concrete native type is only decided when a dialect renders it.

use chrono::{DateTime, FixedOffset, Utc};

use super::SchemaOp;

/// Abstract column kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Auto-incrementing 32-bit identity.
    Id,
    /// Auto-incrementing 64-bit identity.
    BigId,
    /// Boolean.
    Bool,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// Floating point.
    Float,
    /// Fixed-point decimal.
    Decimal,
    /// Bounded string.
    String,
    /// Unbounded text.
    Text,
    /// JSON document.
    Json,
    /// Date only.
    Date,
    /// Date and time.
    DateTime,
    /// Time only.
    Time,
    /// Native type name passed through verbatim.
    Raw(String),
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default, rendered with the dialect's boolean literals.
    Bool(bool),
    /// Integer default.
    Int(i64),
    /// Float default.
    Float(f64),
    /// String default, escaped by the dialect.
    String(String),
    /// Timestamp default, formatted with the dialect's time layout.
    Timestamp(DateTime<FixedOffset>),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`), never escaped.
    Expression(String),
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<FixedOffset>> for DefaultValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for DefaultValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value.fixed_offset())
    }
}

/// A column definition.
///
/// Inside an ALTER TABLE, `op` selects what happens to the column:
/// [`SchemaOp::Create`] adds it, [`SchemaOp::Rename`] renames it to
/// `rename`, [`SchemaOp::Drop`] drops it.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Abstract kind.
    pub kind: ColumnKind,
    /// Operation when used inside an ALTER TABLE.
    pub op: SchemaOp,
    /// New name for rename operations.
    pub rename: Option<String>,
    /// Maximum length for string/text/integer columns.
    pub limit: Option<u32>,
    /// Total number of digits for float/decimal columns, or datetime precision.
    pub precision: Option<u32>,
    /// Digits after the decimal point.
    pub scale: Option<u32>,
    /// Inline PRIMARY KEY.
    pub primary: bool,
    /// Inline UNIQUE.
    pub unique: bool,
    /// NOT NULL.
    pub required: bool,
    /// UNSIGNED (dropped by dialects that lack it).
    pub unsigned: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Trailing options appended verbatim.
    pub options: Option<String>,
}

impl Column {
    /// Creates a column of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            op: SchemaOp::Create,
            rename: None,
            limit: None,
            precision: None,
            scale: None,
            primary: false,
            unique: false,
            required: false,
            unsigned: false,
            default: None,
            options: None,
        }
    }

    /// Marks the column as PRIMARY KEY.
    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    /// Marks the column as UNIQUE.
    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Disallows NULL values.
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Marks an integer column as unsigned.
    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    /// Sets the maximum length.
    pub fn limit(&mut self, limit: u32) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the precision.
    pub fn precision(&mut self, precision: u32) -> &mut Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the scale.
    pub fn scale(&mut self, scale: u32) -> &mut Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the default value.
    pub fn default(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    /// Sets a raw SQL default expression.
    pub fn default_expr(&mut self, expr: impl Into<String>) -> &mut Self {
        self.default = Some(DefaultValue::Expression(expr.into()));
        self
    }

    /// Sets trailing options.
    pub fn options(&mut self, options: impl Into<String>) -> &mut Self {
        self.options = Some(options.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_options_chain() {
        let mut column = Column::new("title", ColumnKind::String);
        column.required().limit(144).default("untitled");

        assert!(column.required);
        assert_eq!(column.limit, Some(144));
        assert_eq!(
            column.default,
            Some(DefaultValue::String("untitled".to_string()))
        );
        assert_eq!(column.op, SchemaOp::Create);
    }

    #[test]
    fn test_utc_default_keeps_instant() {
        let at = DateTime::parse_from_rfc3339("2020-01-01T01:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let value = DefaultValue::from(at);
        assert_eq!(
            value,
            DefaultValue::Timestamp(DateTime::parse_from_rfc3339("2020-01-01T01:00:00+00:00").unwrap())
        );
    }
}
