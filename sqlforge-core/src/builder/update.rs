//! UPDATE query builder module

use super::common::{push_or, push_where, BuildOptions, QueryBuilder, BUFFER_DEFAULT_CAP};
use crate::args::ArgsBuilder;
use crate::assign::{Assignment, IntoAssignments};
use crate::condition::IntoCondition;
use crate::dialect::IntoDialect;
use crate::interceptor::Interceptor;
use crate::{Condition, Error, Result, Value};

/// UPDATE query builder
///
/// SET and WHERE bind through one argument list, so placeholder numbering
/// continues from the last assignment into the conditions.
#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
    options: BuildOptions,
    table: String,
    assignments: Vec<Assignment>,
    wheres: Vec<Condition>,
}

impl UpdateBuilder {
    /// Create a new UPDATE query builder
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

    /// Set the table to update
    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// Append column assignments
    ///
    /// # Examples
    /// ```
    /// use sqlforge_core::{add, assign, incr, update, MySql, QueryBuilder};
    ///
    /// let (sql, args) = update()
    ///     .dialect(MySql)
    ///     .table("table")
    ///     .set([assign("c1", "v1"), incr("c2"), assign("c3", 123), add("c4", 456)])
    ///     .build()?;
    ///
    /// assert_eq!(sql, "UPDATE `table` SET `c1`=?, `c2`=`c2`+1, `c3`=?, `c4`=`c4`+?");
    /// assert_eq!(args.len(), 3);
    /// # Ok::<(), sqlforge_core::Error>(())
    /// ```
    pub fn set<A>(mut self, assignments: A) -> Self
    where
        A: IntoAssignments,
    {
        self.assignments.extend(assignments.into_assignments());
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

impl QueryBuilder for UpdateBuilder {
    fn build(&self) -> Result<(String, Vec<Value>)> {
        if self.table.is_empty() {
            return Err(Error::invalid_query("UpdateBuilder: no table name"));
        }
        if self.assignments.is_empty() {
            return Err(Error::invalid_query("UpdateBuilder: no set values"));
        }

        let dialect = self.options.dialect();
        let mut ab = ArgsBuilder::new(dialect.as_ref());
        let mut sql = String::with_capacity(BUFFER_DEFAULT_CAP);

        sql.push_str("UPDATE ");
        sql.push_str(&dialect.quote(&self.table));

        sql.push_str(" SET ");
        for (i, assignment) in self.assignments.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&assignment.build(&mut ab));
        }

        push_where(&mut sql, &self.wheres, &mut ab);

        let args = ab.into_values();
        Ok(self.options.finish(sql, args))
    }
}
