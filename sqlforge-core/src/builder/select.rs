//! SELECT query builder implementation

use super::common::{
    push_or, push_where, BuildOptions, IntoColumns, JoinClause, JoinOn, JoinType, OrderByClause,
    QueryBuilder, SortDirection, BUFFER_DEFAULT_CAP,
};
use crate::args::ArgsBuilder;
use crate::condition::{equal, IntoCondition};
use crate::dialect::{Dialect, IntoDialect};
use crate::interceptor::Interceptor;
use crate::record::{select_columns, Record};
use crate::{Condition, Error, Result, Value};

/// A column or table reference with its alias, empty when there is none
#[derive(Debug, Clone, PartialEq, Eq)]
struct Aliased {
    name: String,
    alias: String,
}

impl Aliased {
    fn new(name: &str, alias: Option<&str>) -> Self {
        let alias = match alias {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => infer_alias(name),
        };

        Self {
            name: name.to_string(),
            alias,
        }
    }

    fn push_sql(&self, sql: &mut String, dialect: &dyn Dialect) {
        sql.push_str(&dialect.quote(&self.name));
        if !self.alias.is_empty() {
            sql.push_str(" AS ");
            sql.push_str(&dialect.quote(&self.alias));
        }
    }
}

/// `t.c` is aliased as `c`, and `COUNT(t.c)` as `c`
///
/// Only a bare trailing identifier is inferred. Raw expressions such as
/// `t.a + 1` or `u.name AS n` get no alias.
fn infer_alias(name: &str) -> String {
    if name.contains(' ') {
        return String::new();
    }
    let Some(dot) = name.find('.') else {
        return String::new();
    };

    let rest = &name[dot + 1..];
    let alias = match rest.find(')') {
        Some(close) => &rest[..close],
        None => rest,
    };

    if is_plain_identifier(alias) {
        alias.to_string()
    } else {
        String::new()
    }
}

fn is_plain_identifier(s: &str) -> bool {
    let bare = s.trim_matches(|c| c == '`' || c == '"');
    !bare.is_empty() && bare.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// SELECT query builder
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    options: BuildOptions,
    distinct: bool,
    columns: Vec<Aliased>,
    tables: Vec<Aliased>,
    joins: Vec<JoinClause>,
    wheres: Vec<Condition>,
    group_by: Vec<String>,
    having: Vec<String>,
    order_by: Vec<OrderByClause>,
    limit: i64,
    offset: i64,
}

impl SelectBuilder {
    /// Create a new SELECT query builder with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Render with `dialect` instead of the default dialect
    pub fn dialect<D>(mut self, dialect: D) -> Self
    where
        D: IntoDialect,
    {
        self.options.set_dialect(dialect);
        self
    }

    /// Pass the rendered statement through `interceptor`
    pub fn interceptor<I>(mut self, interceptor: I) -> Self
    where
        I: Into<Interceptor>,
    {
        self.options.set_interceptor(Some(interceptor.into()));
        self
    }

    /// `SELECT DISTINCT`
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Append a selected column
    ///
    /// A qualified column such as `u.name` is aliased as `name`. Empty
    /// column names are ignored.
    pub fn select(self, column: &str) -> Self {
        self.push_column(column, None)
    }

    /// Append a selected column with an explicit alias
    pub fn select_as(self, column: &str, alias: &str) -> Self {
        self.push_column(column, Some(alias))
    }

    /// Append several selected columns
    pub fn selects<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        for column in columns.into_columns() {
            self = self.push_column(&column, None);
        }
        self
    }

    /// Select the mapped fields of `R`, qualified with `table` when it is not empty
    pub fn select_record<R>(self, table: &str) -> Self
    where
        R: Record,
    {
        let table = Some(table).filter(|t| !t.is_empty());
        let columns = select_columns::<R>(table);
        self.selects(columns)
    }

    fn push_column(mut self, column: &str, alias: Option<&str>) -> Self {
        if !column.is_empty() {
            self.columns.push(Aliased::new(column, alias));
        }
        self
    }

    /// The selected column names, with the alias in place of the column when there is one
    pub fn selected_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| {
                if c.alias.is_empty() {
                    c.name.clone()
                } else {
                    c.alias.clone()
                }
            })
            .collect()
    }

    /// Append a source table
    pub fn from(mut self, table: &str) -> Self {
        self.tables.push(Aliased::new(table, None));
        self
    }

    /// Append a source table with an explicit alias
    pub fn from_as(mut self, table: &str, alias: &str) -> Self {
        self.tables.push(Aliased::new(table, Some(alias)));
        self
    }

    /// Append a JOIN clause of any kind
    ///
    /// # Examples
    /// ```
    /// use sqlforge_core::{on, select, JoinType, MySql, QueryBuilder};
    ///
    /// let sql = select("u.name")
    ///     .dialect(MySql)
    ///     .from_as("users", "u")
    ///     .join_with(JoinType::Inner, "profiles", "p", [on("u.id", "p.user_id")])
    ///     .to_sql()?;
    ///
    /// assert_eq!(
    ///     sql,
    ///     "SELECT `u`.`name` AS `name` FROM `users` AS `u` \
    ///      INNER JOIN `profiles` AS `p` ON `u`.`id`=`p`.`user_id`"
    /// );
    /// # Ok::<(), sqlforge_core::Error>(())
    /// ```
    pub fn join_with<I>(mut self, join_type: JoinType, table: &str, alias: &str, ons: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.joins.push(JoinClause {
            join_type,
            table: table.to_string(),
            alias: alias.to_string(),
            ons: ons.into_iter().collect(),
        });
        self
    }

    /// `JOIN table AS alias ON ...`
    pub fn join<I>(self, table: &str, alias: &str, ons: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.join_with(JoinType::Plain, table, alias, ons)
    }

    /// `LEFT JOIN table AS alias ON ...`
    pub fn join_left<I>(self, table: &str, alias: &str, ons: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.join_with(JoinType::Left, table, alias, ons)
    }

    /// `LEFT OUTER JOIN table AS alias ON ...`
    pub fn join_left_outer<I>(self, table: &str, alias: &str, ons: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.join_with(JoinType::LeftOuter, table, alias, ons)
    }

    /// `RIGHT JOIN table AS alias ON ...`
    pub fn join_right<I>(self, table: &str, alias: &str, ons: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.join_with(JoinType::Right, table, alias, ons)
    }

    /// `RIGHT OUTER JOIN table AS alias ON ...`
    pub fn join_right_outer<I>(self, table: &str, alias: &str, ons: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.join_with(JoinType::RightOuter, table, alias, ons)
    }

    /// `FULL JOIN table AS alias ON ...`
    pub fn join_full<I>(self, table: &str, alias: &str, ons: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.join_with(JoinType::Full, table, alias, ons)
    }

    /// `FULL OUTER JOIN table AS alias ON ...`
    pub fn join_full_outer<I>(self, table: &str, alias: &str, ons: I) -> Self
    where
        I: IntoIterator<Item = JoinOn>,
    {
        self.join_with(JoinType::FullOuter, table, alias, ons)
    }

    /// Add a WHERE condition, AND-combined with the others
    pub fn where_<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.wheres.push(condition.into_condition());
        self
    }

    /// Add several WHERE conditions
    pub fn wheres<I, C>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoCondition,
    {
        self.wheres
            .extend(conditions.into_iter().map(|c| c.into_condition()));
        self
    }

    /// Add an AND WHERE condition (same as where_)
    pub fn and_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_(condition)
    }

    /// OR a condition with all the conditions added so far
    pub fn or_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        push_or(&mut self.wheres, condition.into_condition());
        self
    }

    /// Add a `column=value` condition per pair
    pub fn where_named<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (column, value) in pairs {
            self.wheres.push(equal(column.as_ref(), value));
        }
        self
    }

    /// Set the GROUP BY columns, replacing any set before
    pub fn group_by<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.group_by = columns.into_columns();
        self
    }

    /// Append a raw HAVING expression; several are AND-combined
    ///
    /// HAVING is only rendered together with GROUP BY. The expression is
    /// emitted verbatim and binds nothing.
    pub fn having(mut self, expr: &str) -> Self {
        self.having.push(expr.to_string());
        self
    }

    /// Append an ORDER BY column with the database's default direction
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push(OrderByClause {
            column: column.to_string(),
            direction: None,
        });
        self
    }

    /// Append an ORDER BY column in ascending order
    pub fn order_by_asc(mut self, column: &str) -> Self {
        self.order_by.push(OrderByClause {
            column: column.to_string(),
            direction: Some(SortDirection::Asc),
        });
        self
    }

    /// Append an ORDER BY column in descending order
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push(OrderByClause {
            column: column.to_string(),
            direction: Some(SortDirection::Desc),
        });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// `limit(page_size).offset(page_num * page_size)`, with pages counted from 0
    pub fn paginate(self, page_num: i64, page_size: i64) -> Self {
        self.limit(page_size).offset(page_num.saturating_mul(page_size))
    }

    fn push_group_by(&self, sql: &mut String, dialect: &dyn Dialect) {
        if self.group_by.is_empty() {
            return;
        }

        let columns: Vec<String> = self.group_by.iter().map(|c| dialect.quote(c)).collect();
        sql.push_str(" GROUP BY ");
        sql.push_str(&columns.join(", "));

        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.join(" AND "));
        }
    }

    fn push_order_by(&self, sql: &mut String, dialect: &dyn Dialect) {
        if self.order_by.is_empty() {
            return;
        }

        sql.push_str(" ORDER BY ");
        for (i, order) in self.order_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&dialect.quote(&order.column));
            if let Some(direction) = order.direction {
                sql.push(' ');
                sql.push_str(&direction.to_string());
            }
        }
    }
}

impl QueryBuilder for SelectBuilder {
    fn build(&self) -> Result<(String, Vec<Value>)> {
        if self.tables.is_empty() {
            return Err(Error::invalid_query("SelectBuilder: no table names"));
        }
        if self.columns.is_empty() {
            return Err(Error::invalid_query("SelectBuilder: no selected columns"));
        }

        let dialect = self.options.dialect();
        let dialect = dialect.as_ref();
        let mut sql = String::with_capacity(BUFFER_DEFAULT_CAP);

        sql.push_str("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            column.push_sql(&mut sql, dialect);
        }

        sql.push_str(" FROM ");
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            table.push_sql(&mut sql, dialect);
        }

        for join in &self.joins {
            join.push_sql(&mut sql, dialect);
        }

        let mut ab = ArgsBuilder::new(dialect);
        push_where(&mut sql, &self.wheres, &mut ab);

        self.push_group_by(&mut sql, dialect);
        self.push_order_by(&mut sql, dialect);

        if self.limit != 0 || self.offset != 0 {
            sql.push(' ');
            sql.push_str(&dialect.limit_offset(self.limit, self.offset)?);
        }

        let args = ab.into_values();
        Ok(self.options.finish(sql, args))
    }
}
