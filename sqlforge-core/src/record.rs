//! Explicit field-to-column mapping for user types
//!
//! A [`Record`] describes its own fields once, as a static table, instead of
//! being inspected at runtime. The insert and select builders use the table
//! to derive column lists and row values.
//!
//! ```
//! use sqlforge_core::record::{Field, Record};
//! use sqlforge_core::Value;
//!
//! struct User {
//!     id: i64,
//!     name: String,
//!     cache: Vec<u8>,
//! }
//!
//! impl Record for User {
//!     fn fields() -> &'static [Field] {
//!         const FIELDS: &[Field] = &[
//!             Field::new("id").omit_empty(),
//!             Field::new("name").column("user_name"),
//!             Field::new("cache").skip(),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn values(&self) -> Vec<Value> {
//!         vec![self.id.into(), self.name.as_str().into(), self.cache.clone().into()]
//!     }
//! }
//!
//! let columns: Vec<&str> = User::fields().iter().map(|f| f.column_name()).collect();
//! assert_eq!(columns, vec!["id", "user_name", "cache"]);
//! ```

use crate::{Error, Result, Value};

/// Mapping metadata for one field of a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The field name, used as the column name unless overridden
    pub name: &'static str,
    /// Column name override
    pub column: Option<&'static str>,
    /// Never mapped to a column
    pub skip: bool,
    /// Left out of inserts when the value is empty
    pub omit_empty: bool,
    /// Table qualifier used when selecting the field
    pub table: Option<&'static str>,
}

impl Field {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            skip: false,
            omit_empty: false,
            table: None,
        }
    }

    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub const fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    pub const fn table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    /// The override if there is one, else the field name
    pub fn column_name(&self) -> &'static str {
        self.column.unwrap_or(self.name)
    }
}

/// A type that maps onto a table row
pub trait Record {
    /// One entry per field, skipped ones included
    fn fields() -> &'static [Field];

    /// The field values, in the same order as [`Record::fields`]
    fn values(&self) -> Vec<Value>;
}

/// The `(column, value)` pairs to insert for `record`
///
/// Skipped fields are dropped, as are `omit_empty` fields holding an empty
/// value.
pub fn insert_pairs<R>(record: &R) -> Result<Vec<(String, Value)>>
where
    R: Record,
{
    let fields = R::fields();
    let values = record.values();
    if fields.len() != values.len() {
        return Err(Error::invalid_argument(format!(
            "record has {} fields but {} values",
            fields.len(),
            values.len()
        )));
    }

    Ok(fields
        .iter()
        .zip(values)
        .filter(|(field, value)| !field.skip && !(field.omit_empty && value.is_empty()))
        .map(|(field, value)| (field.column_name().to_string(), value))
        .collect())
}

/// The columns to select for `R`, qualified with `table` or each field's own table
pub fn select_columns<R>(table: Option<&str>) -> Vec<String>
where
    R: Record,
{
    R::fields()
        .iter()
        .filter(|field| !field.skip)
        .map(|field| match table.or(field.table) {
            Some(table) if !table.is_empty() => format!("{}.{}", table, field.column_name()),
            _ => field.column_name().to_string(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct User {
        pub id: i64,
        pub name: String,
        pub email: String,
        pub password: String,
    }

    impl Record for User {
        fn fields() -> &'static [Field] {
            const FIELDS: &[Field] = &[
                Field::new("id").omit_empty(),
                Field::new("name"),
                Field::new("email").column("email_address").omit_empty(),
                Field::new("password").skip(),
            ];
            FIELDS
        }

        fn values(&self) -> Vec<Value> {
            vec![
                self.id.into(),
                self.name.as_str().into(),
                self.email.as_str().into(),
                self.password.as_str().into(),
            ]
        }
    }

    #[derive(Debug)]
    struct Order;

    impl Record for Order {
        fn fields() -> &'static [Field] {
            const FIELDS: &[Field] = &[Field::new("id"), Field::new("total").table("o")];
            FIELDS
        }

        fn values(&self) -> Vec<Value> {
            vec![Value::I64(1)]
        }
    }

    #[test]
    fn test_insert_pairs_drops_skipped_and_empty() {
        let user = User {
            name: "Jane".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        };

        let pairs = insert_pairs(&user).unwrap();
        assert_eq!(pairs, vec![("name".to_string(), Value::from("Jane"))]);
    }

    #[test]
    fn test_insert_pairs_keeps_filled_fields() {
        let user = User {
            id: 7,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: String::new(),
        };

        let columns: Vec<String> = insert_pairs(&user)
            .unwrap()
            .into_iter()
            .map(|(column, _)| column)
            .collect();
        assert_eq!(columns, vec!["id", "name", "email_address"]);
    }

    #[test]
    fn test_insert_pairs_rejects_short_values() {
        let err = insert_pairs(&Order).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_select_columns() {
        assert_eq!(select_columns::<User>(None), vec!["id", "name", "email_address"]);
        assert_eq!(
            select_columns::<User>(Some("u")),
            vec!["u.id", "u.name", "u.email_address"]
        );
        assert_eq!(select_columns::<Order>(None), vec!["id", "o.total"]);
        assert_eq!(select_columns::<Order>(Some("x")), vec!["x.id", "x.total"]);
    }
}
