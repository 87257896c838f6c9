//! Entry point tying a dialect, an executor and an interceptor together

use crate::builder::common::BuildOptions;
use crate::builder::{
    DeleteBuilder, InsertBuilder, IntoColumns, QueryBuilder, SelectBuilder, UpdateBuilder,
};
use crate::config::Config;
use crate::dialect::{Dialect, DialectRegistry, IntoDialect};
use crate::executor::Executor;
use crate::interceptor::Interceptor;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A database handle
///
/// Builders handed out by a `Db` render with its dialect and pass through
/// its interceptor.
#[derive(Debug, Clone)]
pub struct Db<E> {
    dialect: Arc<dyn Dialect>,
    executor: E,
    interceptor: Option<Interceptor>,
}

impl<E> Db<E>
where
    E: Executor,
{
    pub fn new<D>(dialect: D, executor: E) -> Self
    where
        D: IntoDialect,
    {
        Self {
            dialect: dialect.into_dialect(),
            executor,
            interceptor: None,
        }
    }

    /// Look the dialect up by name in `registry`
    pub fn open(dialect: &str, executor: E, registry: &DialectRegistry) -> Result<Self> {
        let dialect = registry
            .get(dialect)
            .ok_or_else(|| Error::unknown_dialect(dialect))?;
        Ok(Self::new(dialect, executor))
    }

    /// Resolve the configured dialect and install the statement logger if enabled
    pub fn from_config(config: &Config, executor: E, registry: &DialectRegistry) -> Result<Self> {
        config.validate()?;
        let db = Self::open(&config.dialect, executor, registry)?;
        tracing::debug!(dialect = %config.dialect, log_sql = config.log_sql, "opened sqlforge db");

        Ok(match config.tracing_interceptor()? {
            Some(hook) => db.with_interceptor(hook),
            None => db,
        })
    }

    pub fn with_interceptor<I>(mut self, interceptor: I) -> Self
    where
        I: Into<Interceptor>,
    {
        self.interceptor = Some(interceptor.into());
        self
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn options(&self) -> BuildOptions {
        let mut options = BuildOptions::default();
        options.set_dialect(Arc::clone(&self.dialect));
        options.set_interceptor(self.interceptor.clone());
        options
    }

    /// An INSERT builder
    pub fn insert(&self) -> InsertBuilder {
        InsertBuilder::with_options(self.options())
    }

    /// A SELECT builder with `column` selected
    pub fn select(&self, column: &str) -> SelectBuilder {
        SelectBuilder::with_options(self.options()).select(column)
    }

    /// A SELECT builder with `columns` selected
    pub fn selects<C>(&self, columns: C) -> SelectBuilder
    where
        C: IntoColumns,
    {
        SelectBuilder::with_options(self.options()).selects(columns)
    }

    /// An UPDATE builder
    pub fn update(&self) -> UpdateBuilder {
        UpdateBuilder::with_options(self.options())
    }

    /// A DELETE builder
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::with_options(self.options())
    }

    /// Render `query` and run it as a modification
    pub async fn execute<Q>(&self, query: &Q) -> Result<u64>
    where
        Q: QueryBuilder,
    {
        let (sql, args) = query.build()?;
        tracing::trace!(target: "sqlforge.db", arg_count = args.len(), sql = %sql, "execute");
        self.executor.execute(&sql, &args).await
    }

    /// Render `query` and fetch every row
    pub async fn fetch_all<T>(&self, query: &SelectBuilder) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        let (sql, args) = query.build()?;
        tracing::trace!(target: "sqlforge.db", arg_count = args.len(), sql = %sql, "fetch_all");
        self.executor.fetch_all(&sql, &args).await
    }

    /// Render `query` and fetch exactly one row
    pub async fn fetch_one<T>(&self, query: &SelectBuilder) -> Result<T>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        let (sql, args) = query.build()?;
        tracing::trace!(target: "sqlforge.db", arg_count = args.len(), sql = %sql, "fetch_one");
        self.executor.fetch_one(&sql, &args).await
    }

    /// Render `query` and fetch at most one row
    pub async fn fetch_optional<T>(&self, query: &SelectBuilder) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        let (sql, args) = query.build()?;
        tracing::trace!(target: "sqlforge.db", arg_count = args.len(), sql = %sql, "fetch_optional");
        self.executor.fetch_optional(&sql, &args).await
    }
}
