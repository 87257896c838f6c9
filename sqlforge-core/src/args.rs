//! Argument accumulation for a single render pass

use crate::dialect::Dialect;
use crate::Value;

/// Default capacity reserved for the argument list of one statement
pub const ARGS_DEFAULT_CAP: usize = 8;

/// Collects bound values and hands out the matching placeholders
///
/// The Nth call to [`ArgsBuilder::add`] returns the placeholder for the Nth
/// value, so placeholders appear in the SQL text in the same order as the
/// values in [`ArgsBuilder::values`]. One builder lives for exactly one
/// render pass.
#[derive(Debug)]
pub struct ArgsBuilder<'d> {
    dialect: &'d dyn Dialect,
    values: Vec<Value>,
}

impl<'d> ArgsBuilder<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            values: Vec::with_capacity(ARGS_DEFAULT_CAP),
        }
    }

    /// Append a value and return its placeholder
    pub fn add(&mut self, value: impl Into<Value>) -> String {
        self.values.push(value.into());
        self.dialect.placeholder(self.values.len())
    }

    /// The dialect placeholders are produced for
    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Shortcut for `self.dialect().quote(identifier)`
    pub fn quote(&self, identifier: &str) -> String {
        self.dialect.quote(identifier)
    }

    /// The accumulated values, in insertion order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
