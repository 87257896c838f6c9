//! Boolean predicates for WHERE clauses

use crate::args::ArgsBuilder;
use crate::operator::{IntoOperator, Operator};
use crate::Value;

/// A predicate node
///
/// Nodes are immutable once built. [`Condition::build`] renders the node,
/// quoting columns through the accumulator's dialect and binding every value
/// through the accumulator so placeholders stay aligned with arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column OP value`
    Compare {
        column: String,
        operator: Operator,
        value: Value,
    },
    /// `column IN (...)` or `column NOT IN (...)`
    In {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// `column IS NULL` or `column IS NOT NULL`
    Null { column: String, negated: bool },
    /// `column BETWEEN lower AND upper`
    Between {
        column: String,
        lower: Value,
        upper: Value,
    },
    /// All children must hold
    And(Vec<Condition>),
    /// Any child must hold
    Or(Vec<Condition>),
}

impl Condition {
    /// Create a comparison between a column and a bound value
    pub fn compare<O, V>(column: &str, operator: O, value: V) -> Self
    where
        O: IntoOperator,
        V: Into<Value>,
    {
        Self::Compare {
            column: column.to_string(),
            operator: operator.into_operator(),
            value: value.into(),
        }
    }

    /// Render the predicate, appending its bound values to `ab`
    pub fn build(&self, ab: &mut ArgsBuilder<'_>) -> String {
        match self {
            Condition::Compare {
                column,
                operator,
                value,
            } => {
                let column = ab.quote(column);
                let placeholder = ab.add(value.clone());
                operator.render(&column, &placeholder)
            }
            Condition::In {
                column,
                values,
                negated,
            } => {
                // An empty set matches nothing, and excluding it matches everything.
                if values.is_empty() {
                    return if *negated { "1=1" } else { "1=0" }.to_string();
                }

                let column = ab.quote(column);
                let placeholders: Vec<String> =
                    values.iter().map(|v| ab.add(v.clone())).collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", column, keyword, placeholders.join(", "))
            }
            Condition::Null { column, negated } => {
                let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
                format!("{} {}", ab.quote(column), keyword)
            }
            Condition::Between {
                column,
                lower,
                upper,
            } => {
                let column = ab.quote(column);
                let lower = ab.add(lower.clone());
                let upper = ab.add(upper.clone());
                format!("{} BETWEEN {} AND {}", column, lower, upper)
            }
            Condition::And(children) => build_group(children, " AND ", "1=1", ab),
            Condition::Or(children) => build_group(children, " OR ", "1=0", ab),
        }
    }
}

/// Render `children` joined by `separator`, parenthesized when there is more than one
pub(crate) fn build_group(
    children: &[Condition],
    separator: &str,
    empty: &str,
    ab: &mut ArgsBuilder<'_>,
) -> String {
    match children {
        [] => empty.to_string(),
        [only] => only.build(ab),
        _ => {
            let parts: Vec<String> = children.iter().map(|c| c.build(ab)).collect();
            format!("({})", parts.join(separator))
        }
    }
}

/// Trait for values that can be used as WHERE conditions
pub trait IntoCondition {
    fn into_condition(self) -> Condition;
}

impl IntoCondition for Condition {
    fn into_condition(self) -> Condition {
        self
    }
}

// Shorthand equality: where_(("age", 18))
impl<T> IntoCondition for (&str, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> Condition {
        Condition::compare(self.0, Operator::EQ, self.1)
    }
}

// Explicit operators: where_(("age", op::GT, 18)) or where_(("age", ">", 18))
impl<T, O> IntoCondition for (&str, O, T)
where
    T: Into<Value>,
    O: IntoOperator,
{
    fn into_condition(self) -> Condition {
        Condition::compare(self.0, self.1, self.2)
    }
}

/// `column = value`
pub fn equal(column: &str, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::EQ, value)
}

/// `column <> value`
pub fn not_equal(column: &str, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::NEQ, value)
}

/// `column < value`
pub fn less(column: &str, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::LT, value)
}

/// `column <= value`
pub fn less_equal(column: &str, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::LTE, value)
}

/// `column > value`
pub fn greater(column: &str, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::GT, value)
}

/// `column >= value`
pub fn greater_equal(column: &str, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::GTE, value)
}

/// `column LIKE value`
pub fn like(column: &str, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::LIKE, value)
}

/// `column NOT LIKE value`
pub fn not_like(column: &str, value: impl Into<Value>) -> Condition {
    Condition::compare(column, Operator::NOT_LIKE, value)
}

/// `column IN (values...)`
pub fn in_<I, V>(column: &str, values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::In {
        column: column.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        negated: false,
    }
}

/// `column NOT IN (values...)`
pub fn not_in<I, V>(column: &str, values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::In {
        column: column.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        negated: true,
    }
}

/// `column IS NULL`
pub fn is_null(column: &str) -> Condition {
    Condition::Null {
        column: column.to_string(),
        negated: false,
    }
}

/// `column IS NOT NULL`
pub fn is_not_null(column: &str) -> Condition {
    Condition::Null {
        column: column.to_string(),
        negated: true,
    }
}

/// `column BETWEEN lower AND upper`
pub fn between(column: &str, lower: impl Into<Value>, upper: impl Into<Value>) -> Condition {
    Condition::Between {
        column: column.to_string(),
        lower: lower.into(),
        upper: upper.into(),
    }
}

/// `(c1 AND c2 AND ...)`
pub fn and<I, C>(conditions: I) -> Condition
where
    I: IntoIterator<Item = C>,
    C: IntoCondition,
{
    Condition::And(conditions.into_iter().map(|c| c.into_condition()).collect())
}

/// `(c1 OR c2 OR ...)`
pub fn or<I, C>(conditions: I) -> Condition
where
    I: IntoIterator<Item = C>,
    C: IntoCondition,
{
    Condition::Or(conditions.into_iter().map(|c| c.into_condition()).collect())
}
