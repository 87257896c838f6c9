//! SQL dialects and the dialect registry
//!
//! A [`Dialect`] describes the surface syntax of one SQL variant: how
//! identifiers are quoted, what a bind placeholder looks like and how the
//! pagination clause is spelled. Dialects are stateless and shared behind
//! `Arc<dyn Dialect>`.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Surface syntax of one SQL variant
pub trait Dialect: Send + Sync + Debug {
    /// The registry name of the dialect, such as `"mysql"`
    fn name(&self) -> &str;

    /// The placeholder for the `ordinal`th bound value, starting at 1
    ///
    /// `?` for MySQL and SQLite, `$1`, `$2`, ... for PostgreSQL.
    fn placeholder(&self, ordinal: usize) -> String;

    /// Quote an identifier, such as `` `s` `` for MySQL and `"s"` for PostgreSQL
    fn quote(&self, identifier: &str) -> String;

    /// The `LIMIT`/`OFFSET` clause
    ///
    /// Fails when `limit` or `offset` is negative.
    fn limit_offset(&self, limit: i64, offset: i64) -> Result<String> {
        standard_limit_offset(limit, offset)
    }
}

/// `LIMIT n` or `LIMIT n OFFSET m`, shared by the built-in dialects
pub fn standard_limit_offset(limit: i64, offset: i64) -> Result<String> {
    if limit < 0 {
        return Err(Error::invalid_argument(
            "the limit must be a positive integer",
        ));
    }
    if offset < 0 {
        return Err(Error::invalid_argument(
            "the offset must not be negative",
        ));
    }

    if offset == 0 {
        Ok(format!("LIMIT {}", limit))
    } else {
        Ok(format!("LIMIT {} OFFSET {}", limit, offset))
    }
}

/// Quote `identifier` with `quote_char`
///
/// - anything containing a space is treated as a raw expression and returned as-is
/// - `name(expr)` quotes only `expr`, unless `expr` itself contains `(`
/// - `a.b` quotes each part separately
/// - a part that is `*` or already contains `quote_char` is kept as-is
pub fn quote_identifier(identifier: &str, quote_char: char) -> String {
    if identifier.contains(' ') {
        return identifier.to_string();
    }

    if let Some(open) = identifier.find('(') {
        let rest = &identifier[open + 1..];
        if rest.contains('(') {
            return identifier.to_string();
        }

        return match rest.find(')') {
            Some(close) => format!(
                "{}({}){}",
                &identifier[..open],
                quote_identifier(&rest[..close], quote_char),
                &rest[close + 1..]
            ),
            None => identifier.to_string(),
        };
    }

    identifier
        .split('.')
        .map(|part| quote_part(part, quote_char))
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_part(part: &str, quote_char: char) -> String {
    if part.is_empty() || part == "*" || part.contains(quote_char) {
        part.to_string()
    } else {
        format!("{quote_char}{part}{quote_char}")
    }
}

/// MySQL: backtick quoting and `?` placeholders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &str {
        "mysql"
    }

    fn placeholder(&self, _ordinal: usize) -> String {
        "?".to_string()
    }

    fn quote(&self, identifier: &str) -> String {
        quote_identifier(identifier, '`')
    }
}

/// PostgreSQL: double-quote quoting and `$n` placeholders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &str {
        "postgres"
    }

    fn placeholder(&self, ordinal: usize) -> String {
        format!("${}", ordinal)
    }

    fn quote(&self, identifier: &str) -> String {
        quote_identifier(identifier, '"')
    }
}

/// SQLite: double-quote quoting and `?` placeholders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sqlite3;

impl Dialect for Sqlite3 {
    fn name(&self) -> &str {
        "sqlite3"
    }

    fn placeholder(&self, _ordinal: usize) -> String {
        "?".to_string()
    }

    fn quote(&self, identifier: &str) -> String {
        quote_identifier(identifier, '"')
    }
}

/// Trait for types that can be used as a builder's dialect
pub trait IntoDialect {
    fn into_dialect(self) -> Arc<dyn Dialect>;
}

impl<D> IntoDialect for D
where
    D: Dialect + 'static,
{
    fn into_dialect(self) -> Arc<dyn Dialect> {
        Arc::new(self)
    }
}

impl IntoDialect for Arc<dyn Dialect> {
    fn into_dialect(self) -> Arc<dyn Dialect> {
        self
    }
}

/// Name-addressable set of dialects
///
/// Lookups return `None` for unknown names and leave the fallback decision to
/// the caller. Most code should receive a registry explicitly; the shared
/// [`DialectRegistry::global`] instance is meant for the outermost layer.
#[derive(Debug, Default)]
pub struct DialectRegistry {
    dialects: RwLock<HashMap<String, Arc<dyn Dialect>>>,
}

impl DialectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `mysql`, `postgres` and `sqlite3`
    pub fn with_builtins() -> Self {
        let mut dialects: HashMap<String, Arc<dyn Dialect>> = HashMap::with_capacity(4);
        for dialect in [MySql.into_dialect(), Postgres.into_dialect(), Sqlite3.into_dialect()] {
            dialects.insert(dialect.name().to_string(), dialect);
        }

        Self {
            dialects: RwLock::new(dialects),
        }
    }

    /// The process-wide registry, populated with the built-in dialects
    pub fn global() -> &'static DialectRegistry {
        static GLOBAL: OnceLock<DialectRegistry> = OnceLock::new();
        GLOBAL.get_or_init(DialectRegistry::with_builtins)
    }

    /// Register a dialect under its own name
    ///
    /// Fails if the name is taken, unless `force` is set, in which case the
    /// existing entry is replaced.
    pub fn register<D>(&self, dialect: D, force: bool) -> Result<()>
    where
        D: IntoDialect,
    {
        let dialect = dialect.into_dialect();
        let name = dialect.name().to_string();
        let mut dialects = self.dialects.write().unwrap_or_else(PoisonError::into_inner);

        if dialects.contains_key(&name) {
            if !force {
                return Err(Error::dialect_already_registered(name));
            }
            tracing::warn!(dialect = %name, "overwriting registered sql dialect");
        } else {
            tracing::debug!(dialect = %name, "registering sql dialect");
        }

        dialects.insert(name, dialect);
        Ok(())
    }

    /// Look up a dialect by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Names of all registered dialects, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dialects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

fn default_slot() -> &'static RwLock<Arc<dyn Dialect>> {
    static DEFAULT: OnceLock<RwLock<Arc<dyn Dialect>>> = OnceLock::new();
    DEFAULT.get_or_init(|| RwLock::new(MySql.into_dialect()))
}

/// The dialect used by builders that were not given one (MySQL unless changed)
pub fn default_dialect() -> Arc<dyn Dialect> {
    default_slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process-wide default dialect
pub fn set_default_dialect<D>(dialect: D)
where
    D: IntoDialect,
{
    let dialect = dialect.into_dialect();
    tracing::debug!(dialect = %dialect.name(), "setting default sql dialect");
    *default_slot().write().unwrap_or_else(PoisonError::into_inner) = dialect;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Oracle;

    impl Dialect for Oracle {
        fn name(&self) -> &str {
            "oracle"
        }

        fn placeholder(&self, ordinal: usize) -> String {
            format!(":{}", ordinal)
        }

        fn quote(&self, identifier: &str) -> String {
            quote_identifier(identifier, '"')
        }
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(MySql.placeholder(1), "?");
        assert_eq!(MySql.placeholder(7), "?");
        assert_eq!(Sqlite3.placeholder(3), "?");
        assert_eq!(Postgres.placeholder(1), "$1");
        assert_eq!(Postgres.placeholder(12), "$12");
    }

    #[test]
    fn test_quote_plain_identifier() {
        assert_eq!(MySql.quote("users"), "`users`");
        assert_eq!(Postgres.quote("users"), "\"users\"");
        assert_eq!(Sqlite3.quote("users"), "\"users\"");
    }

    #[test]
    fn test_quote_qualified_identifier() {
        assert_eq!(MySql.quote("t.c"), "`t`.`c`");
        assert_eq!(Postgres.quote("t.c"), "\"t\".\"c\"");
        assert_eq!(MySql.quote("db.t.c"), "`db`.`t`.`c`");
        assert_eq!(MySql.quote("t.*"), "`t`.*");
    }

    #[test]
    fn test_quote_is_idempotent() {
        assert_eq!(MySql.quote("`x`"), "`x`");
        assert_eq!(Postgres.quote("\"x\""), "\"x\"");
        assert_eq!(MySql.quote(&MySql.quote("t.c")), "`t`.`c`");
        assert_eq!(MySql.quote("`t`.`c`"), "`t`.`c`");
        // A double quote is not MySQL's quote character.
        assert_eq!(MySql.quote("\"x\""), "`\"x\"`");
    }

    #[test]
    fn test_quote_partly_quoted_reference() {
        assert_eq!(MySql.quote("t.`c`"), "`t`.`c`");
        assert_eq!(MySql.quote("`t`.c"), "`t`.`c`");
        assert_eq!(Postgres.quote("s.t.\"c\""), "\"s\".\"t\".\"c\"");
        assert_eq!(MySql.quote("COUNT(t.`c`)"), "COUNT(`t`.`c`)");
    }

    #[test]
    fn test_quote_passthrough() {
        assert_eq!(MySql.quote("*"), "*");
        assert_eq!(MySql.quote("count(*) AS n"), "count(*) AS n");
        assert_eq!(MySql.quote("a + b"), "a + b");
        assert_eq!(MySql.quote(""), "");
    }

    #[test]
    fn test_quote_function_call() {
        assert_eq!(MySql.quote("COUNT(t.c)"), "COUNT(`t`.`c`)");
        assert_eq!(MySql.quote("COUNT(c)"), "COUNT(`c`)");
        assert_eq!(Postgres.quote("MAX(age)"), "MAX(\"age\")");
        assert_eq!(MySql.quote("COUNT(*)"), "COUNT(*)");
        assert_eq!(MySql.quote("NOW()"), "NOW()");
        assert_eq!(MySql.quote("SUM(n)+1"), "SUM(`n`)+1");
    }

    #[test]
    fn test_quote_nested_or_unclosed_call() {
        assert_eq!(MySql.quote("MAX(ABS(c))"), "MAX(ABS(c))");
        assert_eq!(MySql.quote("MAX(c"), "MAX(c");
    }

    #[test]
    fn test_limit_offset() {
        assert_eq!(MySql.limit_offset(10, 0).unwrap(), "LIMIT 10");
        assert_eq!(MySql.limit_offset(10, 20).unwrap(), "LIMIT 10 OFFSET 20");
        assert_eq!(Postgres.limit_offset(0, 5).unwrap(), "LIMIT 0 OFFSET 5");

        let err = Sqlite3.limit_offset(-1, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = MySql.limit_offset(5, -3).unwrap_err();
        assert!(err.to_string().contains("offset"));
    }

    #[test]
    fn test_registry_builtins() {
        let registry = DialectRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["mysql", "postgres", "sqlite3"]);
        assert_eq!(registry.get("postgres").unwrap().placeholder(2), "$2");
        assert!(registry.get("oracle").is_none());
    }

    #[test]
    fn test_registry_duplicate_registration() {
        let registry = DialectRegistry::with_builtins();
        let err = registry.register(MySql, false).unwrap_err();
        assert!(matches!(err, Error::DialectAlreadyRegistered { ref name } if name == "mysql"));

        registry.register(MySql, true).unwrap();
        assert_eq!(registry.get("mysql").unwrap().name(), "mysql");
    }

    #[test]
    fn test_registry_custom_dialect() {
        let registry = DialectRegistry::new();
        assert!(registry.get("oracle").is_none());

        registry.register(Oracle, false).unwrap();
        let oracle = registry.get("oracle").unwrap();
        assert_eq!(oracle.placeholder(3), ":3");
        assert_eq!(oracle.limit_offset(5, 0).unwrap(), "LIMIT 5");
    }

    #[test]
    fn test_global_registry_and_default() {
        assert!(DialectRegistry::global().get("sqlite3").is_some());
        assert_eq!(default_dialect().name(), "mysql");
    }
}
