//! DELETE query builder module

use super::common::{push_or, push_where, BuildOptions, QueryBuilder, BUFFER_DEFAULT_CAP};
use crate::args::ArgsBuilder;
use crate::condition::IntoCondition;
use crate::dialect::IntoDialect;
use crate::interceptor::Interceptor;
use crate::{Condition, Error, Result, Value};

/// DELETE query builder
///
/// Without conditions the statement deletes every row of the table.
#[derive(Debug, Clone, Default)]
pub struct DeleteBuilder {
    options: BuildOptions,
    table: String,
    wheres: Vec<Condition>,
}

impl DeleteBuilder {
    /// Create a new DELETE query builder
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

    /// Set the table to delete from
    pub fn from(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
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
}

impl QueryBuilder for DeleteBuilder {
    fn build(&self) -> Result<(String, Vec<Value>)> {
        if self.table.is_empty() {
            return Err(Error::invalid_query("DeleteBuilder: no table name"));
        }

        let dialect = self.options.dialect();
        let mut sql = String::with_capacity(BUFFER_DEFAULT_CAP);
        sql.push_str("DELETE FROM ");
        sql.push_str(&dialect.quote(&self.table));

        let mut ab = ArgsBuilder::new(dialect.as_ref());
        push_where(&mut sql, &self.wheres, &mut ab);

        let args = ab.into_values();
        Ok(self.options.finish(sql, args))
    }
}
