//! Textual classification of driver errors into constraint violations.
//!
//! Classification is a best-effort match on the driver's message wording.
//! It only ever enriches an error; an unrecognized message yields `None`.

use std::fmt;

/// Kind of violated constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Unique or primary key.
    Unique,
    /// Foreign key.
    ForeignKey,
    /// Check constraint.
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::Check => "check",
        })
    }
}

/// A recognized constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Kind of constraint.
    pub kind: ConstraintKind,
    /// Offending constraint or key name, or the whole message when it could
    /// not be extracted.
    pub key: String,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(kind: ConstraintKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

/// Recognizes constraint violations in a driver error message.
pub trait ErrorClassifier {
    /// Classifies `message`, or returns `None` when it is not a recognized
    /// constraint violation.
    fn classify(&self, message: &str) -> Option<Violation>;
}

/// Returns the text between the first `left` and the last `right`.
///
/// Falls back to the whole input when either delimiter is missing or they
/// are out of order.
#[must_use]
pub fn extract_between<'a>(s: &'a str, left: &str, right: &str) -> &'a str {
    let (Some(start), Some(end)) = (s.find(left), s.rfind(right)) else {
        return s;
    };
    let start = start + left.len();
    if start >= end {
        return s;
    }
    &s[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_between() {
        assert_eq!(
            extract_between("Duplicate entry 'a' for key 'users_email'", "key '", "'"),
            "users_email"
        );
        assert_eq!(extract_between("a [b] [c] d", "[", "]"), "b] [c");
    }

    #[test]
    fn test_extract_between_falls_back_to_input() {
        assert_eq!(extract_between("no delimiters", "<", ">"), "no delimiters");
        assert_eq!(extract_between("> reversed <", "<", ">"), "> reversed <");
        assert_eq!(extract_between("empty <>", "<", ">"), "empty <>");
    }

    #[test]
    fn test_constraint_kind_display() {
        assert_eq!(ConstraintKind::ForeignKey.to_string(), "foreign key");
    }
}
