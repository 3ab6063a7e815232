//! Row access capability and the default record type.
//!
//! The CRUD layer never looks inside a concrete record type. It only needs
//! the [`RowSource`] triad: `has`, `get` and an ordered leaf walk.

use crate::flatten::ValueSet;
use crate::value::Value;
use indexmap::IndexMap;

/// Read access to a structured row.
pub trait RowSource {
    /// Whether the row carries `field` at its top level.
    fn has(&self, field: &str) -> bool;

    /// The scalar value of `field`, if present.
    fn get(&self, field: &str) -> Option<Value>;

    /// Visit every leaf as `(path, value)`, in row order.
    fn walk(&self, visit: &mut dyn FnMut(&[&str], &Value));
}

/// Builds a caller row type from a fetched column map.
pub type RowFactory<R> = std::sync::Arc<dyn Fn(ValueSet) -> R + Send + Sync>;

/// A field of a [`Row`]: a scalar or a nested row.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Value(Value),
    Nested(Row),
}

/// An ordered, possibly nested record.
///
/// # Example
/// ```ignore
/// use rowsql::Row;
///
/// let row = Row::new()
///     .with("users_id", 1234)
///     .with("name", "alice")
///     .with_nested("address", Row::new().with("city", "Graz"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: IndexMap<String, Field>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a flat row from a column map (the default row factory).
    pub fn from_map(map: ValueSet) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, Field::Value(v)))
                .collect(),
        }
    }

    /// Set a scalar field; an existing field keeps its position.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), Field::Value(value.into()));
        self
    }

    /// Set a nested row.
    pub fn with_nested(mut self, field: impl Into<String>, row: Row) -> Self {
        self.fields.insert(field.into(), Field::Nested(row));
        self
    }

    /// Remove a field.
    pub fn without(mut self, field: &str) -> Self {
        self.fields.shift_remove(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn walk_prefixed<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        visit: &mut dyn FnMut(&[&str], &Value),
    ) {
        for (name, field) in &self.fields {
            path.push(name);
            match field {
                Field::Value(value) => visit(path, value),
                Field::Nested(row) => row.walk_prefixed(path, visit),
            }
            path.pop();
        }
    }
}

impl RowSource for Row {
    fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match self.fields.get(field)? {
            Field::Value(value) => Some(value.clone()),
            Field::Nested(_) => None,
        }
    }

    fn walk(&self, visit: &mut dyn FnMut(&[&str], &Value)) {
        let mut path = Vec::new();
        self.walk_prefixed(&mut path, visit);
    }
}

impl RowSource for ValueSet {
    fn has(&self, field: &str) -> bool {
        self.contains_key(field)
    }

    fn get(&self, field: &str) -> Option<Value> {
        IndexMap::get(self, field).cloned()
    }

    fn walk(&self, visit: &mut dyn FnMut(&[&str], &Value)) {
        for (name, value) in self {
            visit(&[name.as_str()], value);
        }
    }
}

fn walk_json<'a>(
    object: &'a serde_json::Map<String, serde_json::Value>,
    path: &mut Vec<&'a str>,
    visit: &mut dyn FnMut(&[&str], &Value),
) {
    for (name, value) in object {
        path.push(name);
        match value {
            serde_json::Value::Object(nested) => walk_json(nested, path, visit),
            leaf => visit(path, &Value::from(leaf.clone())),
        }
        path.pop();
    }
}

/// JSON objects are rows; any other JSON value is an empty row.
///
/// `serde_json::Value::get` shadows [`RowSource::get`] on method calls; use
/// `RowSource::get(&json, field)` to read a scalar.
impl RowSource for serde_json::Value {
    fn has(&self, field: &str) -> bool {
        self.as_object().is_some_and(|o| o.contains_key(field))
    }

    fn get(&self, field: &str) -> Option<Value> {
        match self.as_object()?.get(field)? {
            serde_json::Value::Object(_) => None,
            value => Some(Value::from(value.clone())),
        }
    }

    fn walk(&self, visit: &mut dyn FnMut(&[&str], &Value)) {
        if let Some(object) = self.as_object() {
            let mut path = Vec::new();
            walk_json(object, &mut path, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(row: &dyn RowSource) -> Vec<(String, Value)> {
        let mut out = Vec::new();
        row.walk(&mut |path, value| out.push((path.join("."), value.clone())));
        out
    }

    #[test]
    fn row_has_and_get() {
        let row = Row::new()
            .with("id", 1)
            .with_nested("address", Row::new().with("city", "Graz"));
        assert!(row.has("id"));
        assert!(row.has("address"));
        assert!(!row.has("city"));
        assert_eq!(row.get("id"), Some(Value::Int(1)));
        assert_eq!(row.get("address"), None);
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn row_walk_is_ordered_and_nested() {
        let row = Row::new()
            .with("b", 1)
            .with_nested("n", Row::new().with("x", "y").with("z", 2))
            .with("a", 3);
        assert_eq!(
            leaves(&row),
            vec![
                ("b".to_string(), Value::Int(1)),
                ("n.x".to_string(), Value::from("y")),
                ("n.z".to_string(), Value::Int(2)),
                ("a".to_string(), Value::Int(3)),
            ]
        );
    }

    #[test]
    fn with_keeps_position_of_existing_field() {
        let row = Row::new().with("a", 1).with("b", 2).with("a", 3);
        let names: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(Value::Int(3)));
    }

    #[test]
    fn json_rows() {
        let row = serde_json::json!({
            "users_id": 5,
            "profile": { "name": "bob", "tags": ["a", "b"] },
            "deleted": null
        });
        assert!(row.has("users_id"));
        assert_eq!(RowSource::get(&row, "users_id"), Some(Value::Int(5)));
        assert_eq!(RowSource::get(&row, "profile"), None);
        assert_eq!(
            leaves(&row),
            vec![
                ("users_id".to_string(), Value::Int(5)),
                ("profile.name".to_string(), Value::from("bob")),
                (
                    "profile.tags".to_string(),
                    Value::List(vec![Value::from("a"), Value::from("b")])
                ),
                ("deleted".to_string(), Value::Null),
            ]
        );
    }

    #[test]
    fn non_object_json_is_empty() {
        let row = serde_json::json!([1, 2]);
        assert!(!row.has("0"));
        assert!(leaves(&row).is_empty());
    }
}
