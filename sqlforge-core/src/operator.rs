//! Comparison operators used by predicates

use std::fmt::{self, Display};

/// A binary comparison operator between a column and a bound value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator(&'static str);

impl Operator {
    pub const EQ: Self = Operator("=");
    pub const NEQ: Self = Operator("<>");
    pub const GT: Self = Operator(">");
    pub const LT: Self = Operator("<");
    pub const GTE: Self = Operator(">=");
    pub const LTE: Self = Operator("<=");
    pub const LIKE: Self = Operator("LIKE");
    pub const NOT_LIKE: Self = Operator("NOT LIKE");
    pub const ILIKE: Self = Operator("ILIKE");

    /// Create a custom operator for database-specific operations
    ///
    /// # Examples
    /// ```
    /// use sqlforge_core::Operator;
    ///
    /// // PostgreSQL full-text search
    /// let fts_op = Operator::custom("@@");
    /// assert_eq!(fts_op.as_str(), "@@");
    /// ```
    pub const fn custom(op: &'static str) -> Self {
        Operator(op)
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Whether the operator is a keyword (`LIKE`) rather than a symbol (`>=`)
    ///
    /// Keyword operators are rendered with surrounding spaces, symbols without.
    pub fn is_keyword(&self) -> bool {
        self.0.chars().any(|c| c.is_ascii_alphabetic())
    }

    /// Render `lhs OP rhs` with the spacing the operator needs
    pub fn render(&self, lhs: &str, rhs: &str) -> String {
        if self.is_keyword() {
            format!("{} {} {}", lhs, self.0, rhs)
        } else {
            format!("{}{}{}", lhs, self.0, rhs)
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for types that can be converted to SQL operators
pub trait IntoOperator {
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

/// String literals map onto the predefined operators; anything else is
/// passed through as a custom operator
impl IntoOperator for &'static str {
    fn into_operator(self) -> Operator {
        match self {
            ">" => Operator::GT,
            "<" => Operator::LT,
            "=" => Operator::EQ,
            "!=" | "<>" => Operator::NEQ,
            ">=" => Operator::GTE,
            "<=" => Operator::LTE,
            "LIKE" | "like" => Operator::LIKE,
            "NOT LIKE" | "not like" => Operator::NOT_LIKE,
            "ILIKE" | "ilike" => Operator::ILIKE,
            _ => Operator::custom(self),
        }
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::EQ;
    pub const NEQ: Operator = Operator::NEQ;
    pub const GT: Operator = Operator::GT;
    pub const LT: Operator = Operator::LT;
    pub const GTE: Operator = Operator::GTE;
    pub const LTE: Operator = Operator::LTE;
    pub const LIKE: Operator = Operator::LIKE;
    pub const NOT_LIKE: Operator = Operator::NOT_LIKE;
    pub const ILIKE: Operator = Operator::ILIKE;
}
