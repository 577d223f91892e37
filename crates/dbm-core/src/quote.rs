//! Identifier quoting and literal escaping.
//!
//! Every identifier and literal that ends up in rendered SQL goes through a
//! [`Quoter`]. Builders never format a literal by hand.

/// Quoting and escaping policy of a dialect.
pub trait Quoter {
    /// Quotes an identifier (table, column, index or constraint name).
    fn quote_identifier(&self, name: &str) -> String;

    /// Quotes and escapes a string literal.
    fn quote_value(&self, value: &str) -> String;

    /// Returns the boolean literal for `value`.
    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "true"
        } else {
            "false"
        }
    }
}

/// Delimiter-based quoting: identifiers are wrapped in `open`/`close` with
/// `close` doubled inside, values are wrapped in single quotes with single
/// quotes doubled inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    open: char,
    close: char,
    cut_at_nul: bool,
}

impl Quote {
    /// Double-quote identifiers (`"name"`).
    pub const DOUBLE: Self = Self::new('"', '"');
    /// Backtick identifiers (`` `name` ``).
    pub const BACKTICK: Self = Self::new('`', '`');
    /// Bracket identifiers (`[name]`).
    pub const BRACKET: Self = Self::new('[', ']');

    /// Creates a quote policy with the given identifier delimiters.
    #[must_use]
    pub const fn new(open: char, close: char) -> Self {
        Self {
            open,
            close,
            cut_at_nul: false,
        }
    }

    /// Truncates identifiers at the first NUL character before quoting.
    #[must_use]
    pub const fn cut_at_nul(mut self) -> Self {
        self.cut_at_nul = true;
        self
    }

    /// Quotes an identifier.
    #[must_use]
    pub fn identifier(&self, name: &str) -> String {
        let name = if self.cut_at_nul {
            name.split('\0').next().unwrap_or_default()
        } else {
            name
        };

        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(self.open);
        for c in name.chars() {
            if c == self.close {
                quoted.push(c);
            }
            quoted.push(c);
        }
        quoted.push(self.close);
        quoted
    }
}

/// Wraps `value` in single quotes, doubling any single quote inside.
#[must_use]
pub fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_doubles_closing_delimiter() {
        assert_eq!(Quote::BACKTICK.identifier("a`b"), "`a``b`");
        assert_eq!(Quote::DOUBLE.identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(Quote::BRACKET.identifier("a]b[c"), "[a]]b[c]");
    }

    #[test]
    fn test_identifier_cut_at_nul() {
        let quote = Quote::DOUBLE.cut_at_nul();
        assert_eq!(quote.identifier("users\0; DROP TABLE x"), "\"users\"");
        assert_eq!(Quote::DOUBLE.identifier("a\0b"), "\"a\0b\"");
    }

    #[test]
    fn test_identifier_is_deterministic() {
        let quote = Quote::BACKTICK;
        assert_eq!(quote.identifier("order"), quote.identifier("order"));
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(single_quoted("it's"), "'it''s'");
        assert_eq!(single_quoted(""), "''");
    }
}
