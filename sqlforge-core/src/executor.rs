//! Statement execution interface
//!
//! Builders only render `(sql, args)`. An [`Executor`] is the collaborator
//! that sends the pair to a database; the extension traits below connect the
//! two.

use crate::builder::{DeleteBuilder, InsertBuilder, QueryBuilder, SelectBuilder, UpdateBuilder};
use crate::{Result, Value};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Something that can run a rendered statement
pub trait Executor: Send + Sync {
    /// Execute a statement that returns no rows (INSERT, UPDATE, DELETE)
    fn execute(&self, sql: &str, args: &[Value]) -> impl Future<Output = Result<u64>> + Send;

    /// Execute a query that returns multiple rows
    fn fetch_all<T>(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a query that returns exactly one row
    fn fetch_one<T>(&self, sql: &str, args: &[Value]) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a query that returns at most one row
    fn fetch_optional<T>(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;
}

/// Extension trait for SELECT builders to add execution methods
pub trait ExecutableQuery<T>: QueryBuilder {
    /// Execute the query and return all results
    fn fetch_all<E>(self, executor: &E) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        E: Executor,
        T: DeserializeOwned + Send + Unpin;

    /// Execute the query and return the first result
    fn fetch_one<E>(self, executor: &E) -> impl Future<Output = Result<T>> + Send
    where
        E: Executor,
        T: DeserializeOwned + Send + Unpin;

    /// Execute the query and return an optional result
    fn fetch_optional<E>(self, executor: &E) -> impl Future<Output = Result<Option<T>>> + Send
    where
        E: Executor,
        T: DeserializeOwned + Send + Unpin;
}

/// Extension trait for modification statements (INSERT, UPDATE, DELETE)
pub trait ExecutableModification: QueryBuilder {
    /// Execute the statement and return the number of affected rows
    fn execute<E>(self, executor: &E) -> impl Future<Output = Result<u64>> + Send
    where
        E: Executor;
}

impl<T> ExecutableQuery<T> for SelectBuilder
where
    T: DeserializeOwned + Send + Unpin,
{
    async fn fetch_all<E>(self, executor: &E) -> Result<Vec<T>>
    where
        E: Executor,
    {
        let (sql, args) = self.build()?;
        executor.fetch_all(&sql, &args).await
    }

    async fn fetch_one<E>(self, executor: &E) -> Result<T>
    where
        E: Executor,
    {
        let (sql, args) = self.build()?;
        executor.fetch_one(&sql, &args).await
    }

    async fn fetch_optional<E>(self, executor: &E) -> Result<Option<T>>
    where
        E: Executor,
    {
        let (sql, args) = self.build()?;
        executor.fetch_optional(&sql, &args).await
    }
}

macro_rules! impl_executable_modification {
    ($($builder:ty),+ $(,)?) => {
        $(
            impl ExecutableModification for $builder {
                async fn execute<E>(self, executor: &E) -> Result<u64>
                where
                    E: Executor,
                {
                    let (sql, args) = self.build()?;
                    executor.execute(&sql, &args).await
                }
            }
        )+
    };
}

impl_executable_modification!(InsertBuilder, UpdateBuilder, DeleteBuilder);

/// SQLx PostgreSQL backend
#[cfg(feature = "postgres")]
pub mod postgres {
    use super::*;
    use sqlx::postgres::{PgArguments, PgPool, PgRow};
    use sqlx::query::Query;
    use sqlx::Row;

    /// Executes statements on a PostgreSQL connection pool
    ///
    /// Builders used with it must render with the `postgres` dialect so the
    /// placeholders are `$n`. Rows are decoded by wrapping the query in
    /// `row_to_json` and deserializing the JSON object.
    #[derive(Debug, Clone)]
    pub struct PostgresExecutor {
        inner: PgPool,
    }

    impl PostgresExecutor {
        /// Create a new executor from a connection string
        pub async fn connect(database_url: &str) -> Result<Self> {
            let pool = PgPool::connect(database_url).await?;
            Ok(Self { inner: pool })
        }

        /// Create from an existing PgPool
        pub fn from_pool(pool: PgPool) -> Self {
            Self { inner: pool }
        }

        pub fn pool(&self) -> &PgPool {
            &self.inner
        }
    }

    fn wrap_as_json(sql: &str) -> String {
        format!("SELECT row_to_json(q) FROM ({}) q", sql)
    }

    fn decode_row<T>(row: &PgRow) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let json: serde_json::Value = row.try_get(0)?;
        Ok(serde_json::from_value(json)?)
    }

    impl Executor for PostgresExecutor {
        async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
            let query = bind_values(sqlx::query(sql), args);
            let result = query.execute(&self.inner).await?;
            Ok(result.rows_affected())
        }

        async fn fetch_all<T>(&self, sql: &str, args: &[Value]) -> Result<Vec<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let wrapped = wrap_as_json(sql);
            let rows = bind_values(sqlx::query(&wrapped), args)
                .fetch_all(&self.inner)
                .await?;

            rows.iter().map(decode_row).collect()
        }

        async fn fetch_one<T>(&self, sql: &str, args: &[Value]) -> Result<T>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let wrapped = wrap_as_json(sql);
            let row = bind_values(sqlx::query(&wrapped), args)
                .fetch_one(&self.inner)
                .await?;

            decode_row(&row)
        }

        async fn fetch_optional<T>(&self, sql: &str, args: &[Value]) -> Result<Option<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let wrapped = wrap_as_json(sql);
            let row = bind_values(sqlx::query(&wrapped), args)
                .fetch_optional(&self.inner)
                .await?;

            row.as_ref().map(decode_row).transpose()
        }
    }

    /// Bind `args` positionally, in the order the builder emitted them
    fn bind_values<'q>(
        mut query: Query<'q, sqlx::Postgres, PgArguments>,
        args: &'q [Value],
    ) -> Query<'q, sqlx::Postgres, PgArguments> {
        for arg in args {
            query = match arg {
                Value::Null => query.bind(None::<i32>),
                Value::Bool(b) => query.bind(*b),
                Value::I32(i) => query.bind(*i),
                Value::I64(i) => query.bind(*i),
                Value::F32(f) => query.bind(*f),
                Value::F64(f) => query.bind(*f),
                Value::String(s) => query.bind(s.as_str()),
                Value::Bytes(b) => query.bind(b.as_slice()),
                Value::Json(j) => query.bind(j),
                // Arrays travel as JSON arrays
                Value::Array(items) => {
                    query.bind(serde_json::Value::Array(items.iter().map(value_to_json).collect()))
                }
            };
        }
        query
    }

    /// Convert a Value to serde_json::Value
    pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::I32(i) => serde_json::Value::from(*i),
            Value::I64(i) => serde_json::Value::from(*i),
            Value::F32(f) => serde_json::Number::from_f64(f64::from(*f))
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::F64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::from(b.clone()),
            Value::Json(j) => j.clone(),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        }
    }

}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::condition::{equal, less};
    use crate::dialect::Postgres;
    use crate::assign::assign;
    use crate::Error;
    use serde::Deserialize;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct User {
        id: i32,
        name: String,
        email: String,
    }

    /// Records every statement it receives and answers with canned rows
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MockExecutor {
        pub should_fail: bool,
        pub rows: Vec<serde_json::Value>,
        pub seen: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
    }

    impl MockExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_rows(rows: Vec<serde_json::Value>) -> Self {
            Self {
                rows,
                ..Self::default()
            }
        }

        pub fn with_failure() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
            self.seen.lock().unwrap().clone()
        }

        fn record(&self, sql: &str, args: &[Value]) -> Result<()> {
            self.seen.lock().unwrap().push((sql.to_string(), args.to_vec()));
            if self.should_fail {
                Err(Error::execution("mock executor failure"))
            } else {
                Ok(())
            }
        }
    }

    impl Executor for MockExecutor {
        async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
            self.record(sql, args)?;
            Ok(1)
        }

        async fn fetch_all<T>(&self, sql: &str, args: &[Value]) -> Result<Vec<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            self.record(sql, args)?;
            self.rows
                .iter()
                .map(|row| serde_json::from_value(row.clone()).map_err(Error::from))
                .collect()
        }

        async fn fetch_one<T>(&self, sql: &str, args: &[Value]) -> Result<T>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            self.fetch_optional(sql, args)
                .await?
                .ok_or_else(|| Error::execution("no rows returned"))
        }

        async fn fetch_optional<T>(&self, sql: &str, args: &[Value]) -> Result<Option<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            self.record(sql, args)?;
            match self.rows.first() {
                Some(row) => Ok(Some(serde_json::from_value(row.clone())?)),
                None => Ok(None),
            }
        }
    }

    fn users() -> Vec<serde_json::Value> {
        vec![
            serde_json::json!({"id": 1, "name": "John", "email": "john@example.com"}),
            serde_json::json!({"id": 2, "name": "Jane", "email": "jane@example.com"}),
        ]
    }

    #[tokio::test]
    async fn test_select_fetch_all() {
        let executor = MockExecutor::with_rows(users());
        let query = SelectBuilder::new()
            .dialect(Postgres)
            .selects(("id", "name", "email"))
            .from("users")
            .where_(("age", crate::op::GT, 18));

        let users: Vec<User> = query.fetch_all(&executor).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "Jane");

        let statements = executor.statements();
        assert_eq!(
            statements[0].0,
            "SELECT \"id\", \"name\", \"email\" FROM \"users\" WHERE \"age\">$1"
        );
        assert_eq!(statements[0].1, vec![Value::I32(18)]);
    }

    #[tokio::test]
    async fn test_select_fetch_one_and_optional() {
        let executor = MockExecutor::with_rows(users());
        let query = SelectBuilder::new().select("*").from("users").where_(equal("id", 1));

        let user: User = query.clone().fetch_one(&executor).await.unwrap();
        assert_eq!(user.email, "john@example.com");

        let empty = MockExecutor::new();
        let user: Option<User> = query.clone().fetch_optional(&empty).await.unwrap();
        assert!(user.is_none());

        let result: Result<User> = query.fetch_one(&empty).await;
        assert!(matches!(result, Err(Error::Execution { .. })));
    }

    #[tokio::test]
    async fn test_modifications_execute() {
        let executor = MockExecutor::new();

        let insert = InsertBuilder::new()
            .dialect(Postgres)
            .into_table("users")
            .named_values([("name", "Test"), ("email", "test@example.com")])
            .unwrap();
        assert_eq!(insert.execute(&executor).await.unwrap(), 1);

        let update = UpdateBuilder::new()
            .dialect(Postgres)
            .table("users")
            .set(assign("name", "Updated"))
            .where_(equal("id", 1));
        assert_eq!(update.execute(&executor).await.unwrap(), 1);

        let delete = DeleteBuilder::new()
            .dialect(Postgres)
            .from("users")
            .where_(less("age", 13));
        assert_eq!(delete.execute(&executor).await.unwrap(), 1);

        let statements = executor.statements();
        assert_eq!(statements.len(), 3);
        assert_eq!(
            statements[0].0,
            "INSERT INTO \"users\" (\"name\", \"email\") VALUES ($1, $2)"
        );
        assert_eq!(
            statements[1].0,
            "UPDATE \"users\" SET \"name\"=$1 WHERE \"id\"=$2"
        );
        assert_eq!(statements[2].0, "DELETE FROM \"users\" WHERE \"age\"<$1");
    }

    #[tokio::test]
    async fn test_invalid_builder_never_reaches_executor() {
        let executor = MockExecutor::new();
        let result = UpdateBuilder::new().table("users").execute(&executor).await;
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
        assert!(executor.statements().is_empty());
    }

    #[tokio::test]
    async fn test_executor_failure() {
        let executor = MockExecutor::with_failure();
        let result: Result<Vec<User>> = SelectBuilder::new()
            .select("*")
            .from("users")
            .fetch_all(&executor)
            .await;
        assert!(result.is_err());

        let result = DeleteBuilder::new().from("users").execute(&executor).await;
        assert!(matches!(result, Err(Error::Execution { .. })));
    }
}
