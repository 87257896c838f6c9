//! Column assignments for UPDATE ... SET

use crate::args::ArgsBuilder;
use crate::Value;

/// How a column is updated
///
/// [`Assignment::Incr`] and [`Assignment::Decr`] inline their step as SQL
/// text, while [`Assignment::Add`] and [`Assignment::Sub`] bind the delta as
/// an argument. The two forms produce different SQL and argument counts.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// `column=?`
    Value { column: String, value: Value },
    /// `column=column+step`
    Incr { column: String, step: u64 },
    /// `column=column-step`
    Decr { column: String, step: u64 },
    /// `column=column+?`
    Add { column: String, value: Value },
    /// `column=column-?`
    Sub { column: String, value: Value },
    /// `column=expr`, with `expr` emitted verbatim
    Raw { column: String, expr: String },
}

impl Assignment {
    /// The target column
    pub fn column(&self) -> &str {
        match self {
            Assignment::Value { column, .. }
            | Assignment::Incr { column, .. }
            | Assignment::Decr { column, .. }
            | Assignment::Add { column, .. }
            | Assignment::Sub { column, .. }
            | Assignment::Raw { column, .. } => column,
        }
    }

    /// Render the assignment, appending any bound value to `ab`
    pub fn build(&self, ab: &mut ArgsBuilder<'_>) -> String {
        let column = ab.quote(self.column());
        match self {
            Assignment::Value { value, .. } => {
                format!("{}={}", column, ab.add(value.clone()))
            }
            Assignment::Incr { step, .. } => format!("{0}={0}+{1}", column, step),
            Assignment::Decr { step, .. } => format!("{0}={0}-{1}", column, step),
            Assignment::Add { value, .. } => {
                format!("{0}={0}+{1}", column, ab.add(value.clone()))
            }
            Assignment::Sub { value, .. } => {
                format!("{0}={0}-{1}", column, ab.add(value.clone()))
            }
            Assignment::Raw { expr, .. } => format!("{}={}", column, expr),
        }
    }
}

/// Trait for types that can be converted to UPDATE assignments
pub trait IntoAssignments {
    fn into_assignments(self) -> Vec<Assignment>;
}

impl IntoAssignments for Assignment {
    fn into_assignments(self) -> Vec<Assignment> {
        vec![self]
    }
}

impl IntoAssignments for Vec<Assignment> {
    fn into_assignments(self) -> Vec<Assignment> {
        self
    }
}

impl<const N: usize> IntoAssignments for [Assignment; N] {
    fn into_assignments(self) -> Vec<Assignment> {
        self.into_iter().collect()
    }
}

/// Shorthand direct assignment: set(("name", "Jane"))
impl<T> IntoAssignments for (&str, T)
where
    T: Into<Value>,
{
    fn into_assignments(self) -> Vec<Assignment> {
        vec![assign(self.0, self.1)]
    }
}

/// Direct assignments in iteration order
impl IntoAssignments for Vec<(String, Value)> {
    fn into_assignments(self) -> Vec<Assignment> {
        self.into_iter()
            .map(|(column, value)| Assignment::Value { column, value })
            .collect()
    }
}

/// Direct assignments in key order
impl IntoAssignments for std::collections::BTreeMap<String, Value> {
    fn into_assignments(self) -> Vec<Assignment> {
        self.into_iter()
            .map(|(column, value)| Assignment::Value { column, value })
            .collect()
    }
}

/// `column=?`
pub fn assign(column: &str, value: impl Into<Value>) -> Assignment {
    Assignment::Value {
        column: column.to_string(),
        value: value.into(),
    }
}

/// `column=column+1`
pub fn incr(column: &str) -> Assignment {
    incr_by(column, 1)
}

/// `column=column+step`, with `step` inlined
pub fn incr_by(column: &str, step: u64) -> Assignment {
    Assignment::Incr {
        column: column.to_string(),
        step,
    }
}

/// `column=column-1`
pub fn decr(column: &str) -> Assignment {
    decr_by(column, 1)
}

/// `column=column-step`, with `step` inlined
pub fn decr_by(column: &str, step: u64) -> Assignment {
    Assignment::Decr {
        column: column.to_string(),
        step,
    }
}

/// `column=column+?`
pub fn add(column: &str, value: impl Into<Value>) -> Assignment {
    Assignment::Add {
        column: column.to_string(),
        value: value.into(),
    }
}

/// `column=column-?`
pub fn sub(column: &str, value: impl Into<Value>) -> Assignment {
    Assignment::Sub {
        column: column.to_string(),
        value: value.into(),
    }
}

/// `column=expr`, for expressions such as `NOW()` that bind nothing
pub fn raw(column: &str, expr: &str) -> Assignment {
    Assignment::Raw {
        column: column.to_string(),
        expr: expr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySql, Postgres};

    #[test]
    fn test_direct_assignment_binds() {
        let mut ab = ArgsBuilder::new(&MySql);
        assert_eq!(assign("c1", "v1").build(&mut ab), "`c1`=?");
        assert_eq!(ab.values(), &[Value::from("v1")]);
    }

    #[test]
    fn test_incr_decr_inline_step() {
        let mut ab = ArgsBuilder::new(&MySql);
        assert_eq!(incr("c2").build(&mut ab), "`c2`=`c2`+1");
        assert_eq!(decr("c2").build(&mut ab), "`c2`=`c2`-1");
        assert_eq!(incr_by("hits", 5).build(&mut ab), "`hits`=`hits`+5");
        assert_eq!(decr_by("stock", 3).build(&mut ab), "`stock`=`stock`-3");
        assert!(ab.is_empty());
    }

    #[test]
    fn test_add_sub_bind_delta() {
        let mut ab = ArgsBuilder::new(&Postgres);
        assert_eq!(add("c4", 456).build(&mut ab), "\"c4\"=\"c4\"+$1");
        assert_eq!(sub("c5", 7).build(&mut ab), "\"c5\"=\"c5\"-$2");
        assert_eq!(ab.values(), &[Value::I32(456), Value::I32(7)]);
    }

    #[test]
    fn test_raw_assignment() {
        let mut ab = ArgsBuilder::new(&MySql);
        assert_eq!(raw("updated_at", "NOW()").build(&mut ab), "`updated_at`=NOW()");
        assert!(ab.is_empty());
    }

    #[test]
    fn test_into_assignments() {
        assert_eq!(("name", "Jane").into_assignments(), vec![assign("name", "Jane")]);
        assert_eq!([incr("a"), add("b", 1)].into_assignments().len(), 2);

        let mut map = std::collections::BTreeMap::new();
        map.insert("b".to_string(), Value::I32(2));
        map.insert("a".to_string(), Value::I32(1));
        let columns: Vec<String> = map
            .into_assignments()
            .iter()
            .map(|a| a.column().to_string())
            .collect();
        assert_eq!(columns, vec!["a", "b"]);
    }
}
