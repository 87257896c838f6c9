//! Common types and traits shared across all query builders

use crate::args::ArgsBuilder;
use crate::condition::{build_group, Condition};
use crate::dialect::{default_dialect, Dialect, IntoDialect};
use crate::interceptor::{intercept, Interceptor};
use crate::{Result, Value};
use std::sync::Arc;

/// Default capacity reserved for a statement's SQL text
pub const BUFFER_DEFAULT_CAP: usize = 64;

/// Core trait for all query builders
pub trait QueryBuilder {
    /// Render the statement into SQL text and its bound arguments
    ///
    /// Rendering only reads the builder, so it can be repeated.
    fn build(&self) -> Result<(String, Vec<Value>)>;

    /// The SQL text alone, for display and logging
    ///
    /// Never execute this text: without the arguments the placeholders are
    /// unbound.
    fn to_sql(&self) -> Result<String> {
        self.build().map(|(sql, _)| sql)
    }
}

/// Dialect and interceptor carried by every builder
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    dialect: Option<Arc<dyn Dialect>>,
    interceptor: Option<Interceptor>,
}

impl BuildOptions {
    pub fn set_dialect<D>(&mut self, dialect: D)
    where
        D: IntoDialect,
    {
        self.dialect = Some(dialect.into_dialect());
    }

    pub fn set_interceptor(&mut self, interceptor: Option<Interceptor>) {
        self.interceptor = interceptor;
    }

    /// The builder's own dialect, or the process-wide default
    pub fn dialect(&self) -> Arc<dyn Dialect> {
        self.dialect.clone().unwrap_or_else(default_dialect)
    }

    /// Hand the rendered statement to the interceptor, if any
    pub fn finish(&self, sql: String, args: Vec<Value>) -> (String, Vec<Value>) {
        intercept(self.interceptor.as_ref(), sql, args)
    }
}

/// Append ` WHERE ...` for `wheres`, AND-combined, binding through `ab`
pub(crate) fn push_where(sql: &mut String, wheres: &[Condition], ab: &mut ArgsBuilder<'_>) {
    if wheres.is_empty() {
        return;
    }

    sql.push_str(" WHERE ");
    sql.push_str(&build_group(wheres, " AND ", "1=1", ab));
}

/// OR `condition` with everything added to `wheres` so far
pub(crate) fn push_or(wheres: &mut Vec<Condition>, condition: Condition) {
    let mut existing = std::mem::take(wheres);
    let combined = match existing.len() {
        0 => condition,
        1 => Condition::Or(vec![existing.remove(0), condition]),
        _ => Condition::Or(vec![Condition::And(existing), condition]),
    };
    wheres.push(combined);
}

/// Trait to convert various types into columns
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

// For tuples
impl IntoColumns for (&str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string(), self.2.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.to_string(),
        ]
    }
}

impl IntoColumns for (&str, &str, &str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.to_string(),
            self.4.to_string(),
        ]
    }
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Bare `JOIN`
    Plain,
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    FullOuter,
}

impl JoinType {
    /// The keyword placed before `JOIN`, empty for a bare join
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Plain => "",
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::LeftOuter => "LEFT OUTER",
            JoinType::Right => "RIGHT",
            JoinType::RightOuter => "RIGHT OUTER",
            JoinType::Full => "FULL",
            JoinType::FullOuter => "FULL OUTER",
        }
    }
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `left=right` equality in a JOIN ON clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOn {
    pub left: String,
    pub right: String,
}

/// Create a `left=right` JOIN condition
pub fn on(left: &str, right: &str) -> JoinOn {
    JoinOn {
        left: left.to_string(),
        right: right.to_string(),
    }
}

/// A complete JOIN clause with table and conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub alias: String,
    pub ons: Vec<JoinOn>,
}

impl JoinClause {
    pub(crate) fn push_sql(&self, sql: &mut String, dialect: &dyn Dialect) {
        if self.join_type != JoinType::Plain {
            sql.push(' ');
            sql.push_str(self.join_type.as_str());
        }

        sql.push_str(" JOIN ");
        sql.push_str(&dialect.quote(&self.table));
        if !self.alias.is_empty() {
            sql.push_str(" AS ");
            sql.push_str(&dialect.quote(&self.alias));
        }

        if !self.ons.is_empty() {
            sql.push_str(" ON ");
            for (i, on) in self.ons.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                sql.push_str(&dialect.quote(&on.left));
                sql.push('=');
                sql.push_str(&dialect.quote(&on.right));
            }
        }
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// An ORDER BY clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByClause {
    pub column: String,
    pub direction: Option<SortDirection>,
}
