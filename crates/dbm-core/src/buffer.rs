//! Single-statement SQL accumulator.

use chrono::{DateTime, FixedOffset, SubsecRound};

use crate::quote::Quoter;
use crate::schema::DefaultValue;

/// Datetime layout used for column defaults.
pub const DATETIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";
/// Date layout used for column defaults.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";
/// Time layout used for column defaults.
pub const TIME_LAYOUT: &str = "%H:%M:%S";
/// Datetime layout with fractional seconds and UTC offset.
pub const OFFSET_DATETIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Formats a timestamp with `layout` after truncating it to microseconds.
#[must_use]
pub fn format_timestamp(at: &DateTime<FixedOffset>, layout: &str) -> String {
    at.trunc_subsecs(6).format(layout).to_string()
}

/// Accumulates one SQL statement, routing identifiers and literals through
/// the dialect's [`Quoter`].
pub struct Buffer<'d, Q: Quoter + ?Sized> {
    quoter: &'d Q,
    sql: String,
}

impl<'d, Q: Quoter + ?Sized> Buffer<'d, Q> {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new(quoter: &'d Q) -> Self {
        Self {
            quoter,
            sql: String::new(),
        }
    }

    /// Appends raw SQL text.
    pub fn push_str(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Appends a single character.
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Appends a quoted identifier.
    pub fn push_identifier(&mut self, name: &str) {
        let quoted = self.quoter.quote_identifier(name);
        self.sql.push_str(&quoted);
    }

    /// Appends a comma-separated list of quoted identifiers.
    pub fn push_identifiers(&mut self, names: &[String]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_identifier(name);
        }
    }

    /// Appends a quoted and escaped string literal.
    pub fn push_literal(&mut self, value: &str) {
        let quoted = self.quoter.quote_value(value);
        self.sql.push_str(&quoted);
    }

    /// Appends a value literal.
    pub fn push_value(&mut self, value: &DefaultValue) {
        match value {
            DefaultValue::Null => self.sql.push_str("NULL"),
            DefaultValue::Bool(b) => self.sql.push_str(self.quoter.bool_literal(*b)),
            DefaultValue::Int(n) => self.sql.push_str(&n.to_string()),
            DefaultValue::Float(f) => self.sql.push_str(&f.to_string()),
            DefaultValue::String(s) => self.push_literal(s),
            DefaultValue::Timestamp(at) => {
                self.push_literal(&format_timestamp(at, OFFSET_DATETIME_LAYOUT));
            }
            DefaultValue::Expression(expr) => self.sql.push_str(expr),
        }
    }

    /// Appends ` options` when options are set.
    pub fn push_options(&mut self, options: Option<&str>) {
        if let Some(options) = options.filter(|o| !o.is_empty()) {
            self.sql.push(' ');
            self.sql.push_str(options);
        }
    }

    /// Returns the accumulated statement.
    #[must_use]
    pub fn finish(self) -> String {
        self.sql
    }
}
