//! Condition templates for WHERE / HAVING / JOIN ... ON.
//!
//! A [`Condition`] is a SQL fragment with `?` markers plus the values bound to
//! them, in order. Builders expand it into literal SQL at the moment the
//! clause is added.
//!
//! # Example
//! ```ignore
//! use rowsql::{Condition, cond};
//!
//! let a = Condition::new("a = ? AND b IN ?").bind(1234).bind(vec!["x", "y"]);
//! let b = cond!("(a = ? OR b > ?)", "alice", 34);
//! ```

use crate::value::Value;

/// A condition template and its positional values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    template: String,
    values: Vec<Value>,
}

impl Condition {
    /// Create a condition without bound values.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            values: Vec::new(),
        }
    }

    /// Bind the next positional value.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Bind several values of the same type.
    pub fn bind_all<T: Into<Value>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl From<&str> for Condition {
    fn from(template: &str) -> Self {
        Condition::new(template)
    }
}

impl From<String> for Condition {
    fn from(template: String) -> Self {
        Condition::new(template)
    }
}

impl From<&String> for Condition {
    fn from(template: &String) -> Self {
        Condition::new(template.clone())
    }
}

/// Build a [`Condition`] from a template and values of mixed types.
///
/// ```ignore
/// let c = rowsql::cond!("g.id = u.group_id AND a.uid = ? AND g.name = ?", 1000, "admin");
/// ```
#[macro_export]
macro_rules! cond {
    ($template:expr $(,)?) => {
        $crate::Condition::new($template)
    };
    ($template:expr, $($value:expr),+ $(,)?) => {
        $crate::Condition::new($template)$(.bind($value))+
    };
}
