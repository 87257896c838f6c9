//! INSERT query builder module

use super::common::{BuildOptions, IntoColumns, QueryBuilder, BUFFER_DEFAULT_CAP};
use crate::args::ArgsBuilder;
use crate::dialect::{Dialect, IntoDialect};
use crate::interceptor::Interceptor;
use crate::record::{insert_pairs, Record};
use crate::{Error, Result, Value};

/// The statement verb placed before `INTO`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertVerb {
    #[default]
    Insert,
    InsertIgnore,
    Replace,
}

impl InsertVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertVerb::Insert => "INSERT",
            InsertVerb::InsertIgnore => "INSERT IGNORE",
            InsertVerb::Replace => "REPLACE",
        }
    }
}

/// INSERT query builder
///
/// Every row has the width of the first row. With columns but no rows, the
/// builder renders a single group of positional placeholders, suitable as a
/// prepared statement template.
#[derive(Debug, Clone, Default)]
pub struct InsertBuilder {
    options: BuildOptions,
    verb: InsertVerb,
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl InsertBuilder {
    /// Create a new INSERT query builder
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

    /// `INSERT INTO table`
    pub fn into_table(mut self, table: &str) -> Self {
        self.verb = InsertVerb::Insert;
        self.table = table.to_string();
        self
    }

    /// `INSERT IGNORE INTO table`
    pub fn ignore_into(mut self, table: &str) -> Self {
        self.verb = InsertVerb::InsertIgnore;
        self.table = table.to_string();
        self
    }

    /// `REPLACE INTO table`
    pub fn replace_into(mut self, table: &str) -> Self {
        self.verb = InsertVerb::Replace;
        self.table = table.to_string();
        self
    }

    /// Set the inserted columns, replacing any set before
    pub fn columns<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.columns = columns.into_columns();
        self
    }

    /// Append a row of values
    ///
    /// # Examples
    /// ```
    /// use sqlforge_core::{insert, MySql, QueryBuilder, Value};
    ///
    /// let query = insert()
    ///     .dialect(MySql)
    ///     .into_table("users")
    ///     .columns(("name", "age"))
    ///     .values(vec![Value::from("John"), Value::from(30)])?;
    ///
    /// let (sql, args) = query.build()?;
    /// assert_eq!(sql, "INSERT INTO `users` (`name`, `age`) VALUES (?, ?)");
    /// assert_eq!(args.len(), 2);
    /// # Ok::<(), sqlforge_core::Error>(())
    /// ```
    ///
    /// Fails if the row is empty or its width differs from the first row or
    /// from the column list.
    pub fn values<I, V>(mut self, row: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row: Vec<Value> = row.into_iter().map(Into::into).collect();
        self.check_row_width(row.len())?;
        self.rows.push(row);
        Ok(self)
    }

    /// Append a row given as `(column, value)` pairs
    ///
    /// The names become the column list if none has been set, otherwise they
    /// must match it in order.
    pub fn named_values<I, K, V>(mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, row): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .unzip();

        if !self.rows.is_empty() && self.rows[0].len() != row.len() {
            return Err(inconsistent_rows(self.rows[0].len(), row.len()));
        }
        if row.is_empty() {
            return Err(Error::invalid_query("InsertBuilder: empty row"));
        }

        if self.columns.is_empty() {
            self.columns = columns;
        } else if self.columns.len() != row.len() {
            return Err(mismatched_columns(self.columns.len(), row.len()));
        } else if self.columns != columns {
            return Err(Error::invalid_query(format!(
                "InsertBuilder: row columns ({}) differ from ({})",
                columns.join(", "),
                self.columns.join(", ")
            )));
        }

        self.rows.push(row);
        Ok(self)
    }

    /// Append a row built from the mapped fields of `record`
    pub fn record<R>(self, record: &R) -> Result<Self>
    where
        R: Record,
    {
        let pairs = insert_pairs(record)?;
        self.named_values(pairs)
    }

    fn check_row_width(&self, width: usize) -> Result<()> {
        if width == 0 {
            return Err(Error::invalid_query("InsertBuilder: empty row"));
        }
        if let Some(first) = self.rows.first() {
            if first.len() != width {
                return Err(inconsistent_rows(first.len(), width));
            }
        }
        if !self.columns.is_empty() && self.columns.len() != width {
            return Err(mismatched_columns(self.columns.len(), width));
        }
        Ok(())
    }

    fn push_row(sql: &mut String, row: &[Value], ab: &mut ArgsBuilder<'_>) {
        sql.push('(');
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&ab.add(value.clone()));
        }
        sql.push(')');
    }

    fn push_template(sql: &mut String, width: usize, dialect: &dyn Dialect) {
        sql.push('(');
        for ordinal in 1..=width {
            if ordinal > 1 {
                sql.push_str(", ");
            }
            sql.push_str(&dialect.placeholder(ordinal));
        }
        sql.push(')');
    }
}

fn inconsistent_rows(expected: usize, got: usize) -> Error {
    Error::invalid_query(format!(
        "InsertBuilder: the numbers of the values are not consistent, expected {} but got {}",
        expected, got
    ))
}

fn mismatched_columns(columns: usize, values: usize) -> Error {
    Error::invalid_query(format!(
        "InsertBuilder: {} columns but {} values",
        columns, values
    ))
}

impl QueryBuilder for InsertBuilder {
    fn build(&self) -> Result<(String, Vec<Value>)> {
        let width = match (self.columns.len(), self.rows.first().map(Vec::len)) {
            (0, None) => return Err(Error::invalid_query("InsertBuilder: no columns or values")),
            (columns, None) => columns,
            (0, Some(values)) => values,
            (columns, Some(values)) if columns != values => {
                return Err(mismatched_columns(columns, values))
            }
            (columns, Some(_)) => columns,
        };

        if self.table.is_empty() {
            return Err(Error::invalid_query("InsertBuilder: no table name"));
        }

        let dialect = self.options.dialect();
        let mut sql = String::with_capacity(BUFFER_DEFAULT_CAP);
        sql.push_str(self.verb.as_str());
        sql.push_str(" INTO ");
        sql.push_str(&dialect.quote(&self.table));

        if !self.columns.is_empty() {
            let quoted: Vec<String> = self.columns.iter().map(|c| dialect.quote(c)).collect();
            sql.push_str(" (");
            sql.push_str(&quoted.join(", "));
            sql.push(')');
        }

        sql.push_str(" VALUES ");
        let mut ab = ArgsBuilder::new(dialect.as_ref());
        if self.rows.is_empty() {
            Self::push_template(&mut sql, width, dialect.as_ref());
        } else {
            for (i, row) in self.rows.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                Self::push_row(&mut sql, row, &mut ab);
            }
        }

        let args = ab.into_values();
        Ok(self.options.finish(sql, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySql, Postgres, Sqlite3};
    use crate::record::tests::User;

    #[test]
    fn test_insert_with_columns_and_values() {
        let query = InsertBuilder::new()
            .dialect(MySql)
            .into_table("table")
            .columns(("c1", "c2"))
            .values(vec![Value::from("a"), Value::from(1)])
            .unwrap();

        let (sql, args) = query.build().unwrap();
        assert_eq!(sql, "INSERT INTO `table` (`c1`, `c2`) VALUES (?, ?)");
        assert_eq!(args, vec![Value::from("a"), Value::I32(1)]);
    }

    #[test]
    fn test_insert_multiple_rows_postgres() {
        let query = InsertBuilder::new()
            .dialect(Postgres)
            .into_table("users")
            .columns(("name", "age"))
            .values(vec![Value::from("John"), Value::from(30)])
            .unwrap()
            .values(vec![Value::from("Jane"), Value::from(25)])
            .unwrap();

        let (sql, args) = query.build().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"name\", \"age\") VALUES ($1, $2), ($3, $4)"
        );
        assert_eq!(args.len(), 4);
        assert_eq!(args[2], Value::from("Jane"));
    }

    #[test]
    fn test_insert_without_columns() {
        let query = InsertBuilder::new()
            .dialect(Sqlite3)
            .into_table("t")
            .values([1, 2, 3])
            .unwrap();

        let (sql, args) = query.build().unwrap();
        assert_eq!(sql, "INSERT INTO \"t\" VALUES (?, ?, ?)");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_insert_template_without_rows() {
        let query = InsertBuilder::new()
            .dialect(Postgres)
            .into_table("users")
            .columns(["id", "name", "email"]);

        let (sql, args) = query.build().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"id\", \"name\", \"email\") VALUES ($1, $2, $3)"
        );
        assert!(args.is_empty());
    }

    #[test]
    fn test_insert_verbs() {
        let ignore = InsertBuilder::new()
            .dialect(MySql)
            .ignore_into("t")
            .columns("a")
            .to_sql()
            .unwrap();
        assert_eq!(ignore, "INSERT IGNORE INTO `t` (`a`) VALUES (?)");

        let replace = InsertBuilder::new()
            .dialect(MySql)
            .replace_into("t")
            .columns("a")
            .to_sql()
            .unwrap();
        assert_eq!(replace, "REPLACE INTO `t` (`a`) VALUES (?)");
    }

    #[test]
    fn test_inconsistent_row_width_fails_at_call() {
        let result = InsertBuilder::new()
            .into_table("t")
            .values([1, 2])
            .unwrap()
            .values([1, 2, 3]);
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));

        let result = InsertBuilder::new()
            .into_table("t")
            .columns(("a", "b"))
            .values([1]);
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));

        let result = InsertBuilder::new().into_table("t").values(Vec::<i32>::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_columns_set_after_rows_checked_at_build() {
        let query = InsertBuilder::new()
            .into_table("t")
            .values([1, 2])
            .unwrap()
            .columns(("a", "b", "c"));
        assert!(matches!(query.build(), Err(Error::InvalidQuery { .. })));
    }

    #[test]
    fn test_missing_fragments() {
        let err = InsertBuilder::new().columns("a").build().unwrap_err();
        assert!(err.to_string().contains("no table name"));

        let err = InsertBuilder::new().into_table("t").build().unwrap_err();
        assert!(err.to_string().contains("no columns or values"));
    }

    #[test]
    fn test_named_values_sets_columns() {
        let query = InsertBuilder::new()
            .dialect(MySql)
            .into_table("users")
            .named_values([("name", Value::from("John")), ("age", Value::from(30))])
            .unwrap()
            .named_values([("name", Value::from("Jane")), ("age", Value::from(25))])
            .unwrap();

        let (sql, args) = query.build().unwrap();
        assert_eq!(sql, "INSERT INTO `users` (`name`, `age`) VALUES (?, ?), (?, ?)");
        assert_eq!(args.len(), 4);

        let result = query.named_values([("name", "Solo")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_record() {
        let user = User {
            id: 0,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret".to_string(),
        };

        let (sql, args) = InsertBuilder::new()
            .dialect(MySql)
            .into_table("users")
            .record(&user)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(sql, "INSERT INTO `users` (`name`, `email_address`) VALUES (?, ?)");
        assert_eq!(args, vec![Value::from("Jane"), Value::from("jane@example.com")]);
    }

    #[test]
    fn test_rows_with_different_columns_are_rejected() {
        let user = |id: i64, name: &str, email: &str| User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password: String::new(),
        };

        let result = InsertBuilder::new()
            .dialect(MySql)
            .into_table("users")
            .record(&user(5, "A", ""))
            .unwrap()
            .record(&user(0, "B", "b@x"));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
        assert!(err.to_string().contains("(name, email_address) differ from (id, name)"));

        let result = InsertBuilder::new()
            .into_table("t")
            .columns(("a", "b"))
            .named_values([("b", 1), ("a", 2)]);
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));

        let (_, args) = InsertBuilder::new()
            .dialect(MySql)
            .into_table("users")
            .record(&user(5, "A", ""))
            .unwrap()
            .record(&user(6, "B", ""))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            args,
            vec![Value::I64(5), Value::from("A"), Value::I64(6), Value::from("B")]
        );
    }

    #[test]
    fn test_interceptor_runs_last() {
        let hook = Interceptor::new(|sql: String, args: Vec<Value>| {
            (format!("{} RETURNING `id`", sql), args)
        });

        let sql = InsertBuilder::new()
            .dialect(MySql)
            .into_table("t")
            .columns("a")
            .interceptor(hook)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO `t` (`a`) VALUES (?) RETURNING `id`");
    }

    #[test]
    fn test_build_is_repeatable() {
        let query = InsertBuilder::new()
            .dialect(Postgres)
            .into_table("t")
            .values(["x"])
            .unwrap();
        assert_eq!(query.build().unwrap(), query.build().unwrap());
    }
}
