//! sqlforge core - a dialect-aware SQL statement composer
//!
//! Statements are assembled from typed fragments through chained builder
//! calls and rendered into SQL text plus the ordered list of bound values,
//! ready to hand to a database driver.
//!
//! ```
//! use sqlforge_core::{add, assign, equal, incr, update, Postgres, QueryBuilder, Value};
//!
//! let (sql, args) = update()
//!     .dialect(Postgres)
//!     .table("accounts")
//!     .set([assign("owner", "jane"), incr("version"), add("balance", 100)])
//!     .where_(equal("id", 42))
//!     .build()?;
//!
//! assert_eq!(
//!     sql,
//!     r#"UPDATE "accounts" SET "owner"=$1, "version"="version"+1, "balance"="balance"+$2 WHERE "id"=$3"#
//! );
//! assert_eq!(args, vec![Value::from("jane"), Value::from(100), Value::from(42)]);
//! # Ok::<(), sqlforge_core::Error>(())
//! ```

pub mod args;
pub mod assign;
pub mod builder;
pub mod condition;
pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod interceptor;
pub mod operator;
pub mod record;
pub mod value;

// Re-export main types
pub use args::ArgsBuilder;
pub use assign::{add, assign, decr, decr_by, incr, incr_by, raw, sub, Assignment, IntoAssignments};
pub use builder::{
    on, DeleteBuilder, InsertBuilder, InsertVerb, IntoColumns, JoinOn, JoinType, QueryBuilder,
    SelectBuilder, SortDirection, UpdateBuilder,
};
pub use condition::{
    and, between, equal, greater, greater_equal, in_, is_not_null, is_null, less, less_equal,
    like, not_equal, not_in, not_like, or, Condition, IntoCondition,
};
pub use config::Config;
pub use db::Db;
pub use dialect::{
    default_dialect, set_default_dialect, Dialect, DialectRegistry, IntoDialect, MySql, Postgres,
    Sqlite3,
};
pub use error::{Error, Result};
pub use executor::{ExecutableModification, ExecutableQuery, Executor};
pub use interceptor::{Intercept, Interceptor, TracingInterceptor};
pub use operator::{op, IntoOperator, Operator};
pub use record::{Field, Record};
pub use value::Value;

/// Create a new INSERT builder
pub fn insert() -> InsertBuilder {
    InsertBuilder::new()
}

/// Create a new SELECT builder with `column` selected
pub fn select(column: &str) -> SelectBuilder {
    SelectBuilder::new().select(column)
}

/// Create a new SELECT builder with `columns` selected
pub fn selects<C>(columns: C) -> SelectBuilder
where
    C: IntoColumns,
{
    SelectBuilder::new().selects(columns)
}

/// Create a new UPDATE builder
pub fn update() -> UpdateBuilder {
    UpdateBuilder::new()
}

/// Create a new DELETE builder
pub fn delete() -> DeleteBuilder {
    DeleteBuilder::new()
}
