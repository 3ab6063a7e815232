//! Value-set flattening: row leaves to an ordered column map.

use crate::row::RowSource;
use crate::value::Value;
use indexmap::IndexMap;

/// Ordered column name -> value mapping.
pub type ValueSet = IndexMap<String, Value>;

/// Flatten `row` into a [`ValueSet`].
///
/// Nested paths are joined with `.`, date-times become
/// `YYYY-MM-DD HH:MM:SS` strings. A later leaf with an already seen column
/// name replaces the value but keeps the original position. Leaf order
/// decides column order of INSERT statements.
pub fn build_value_set(row: &(impl RowSource + ?Sized)) -> ValueSet {
    let mut values = ValueSet::new();
    row.walk(&mut |path, value| {
        values.insert(path.join("."), value.clone().normalize_temporal());
    });
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use chrono::NaiveDate;

    #[test]
    fn flat_row_keeps_order() {
        let row = Row::new().with("id", 1234).with("foo", "bar");
        let values = build_value_set(&row);
        let keys: Vec<&str> = values.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "foo"]);
        assert_eq!(values["id"], Value::Int(1234));
        assert_eq!(values["foo"], Value::from("bar"));
    }

    #[test]
    fn nested_paths_are_dotted() {
        let row = Row::new()
            .with("id", 1)
            .with_nested("meta", Row::new().with_nested("geo", Row::new().with("lat", 1.5)));
        let values = build_value_set(&row);
        assert_eq!(values.get("meta.geo.lat"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn date_times_are_formatted() {
        let created = NaiveDate::from_ymd_opt(2020, 2, 14)
            .unwrap()
            .and_hms_opt(23, 32, 18)
            .unwrap();
        let row = Row::new().with("created", created);
        assert_eq!(
            build_value_set(&row)["created"],
            Value::String("2020-02-14 23:32:18".into())
        );
    }

    #[test]
    fn duplicate_columns_overwrite_in_place() {
        let row = Row::new()
            .with("a.b", 1)
            .with("c", 2)
            .with_nested("a", Row::new().with("b", 3));
        let values = build_value_set(&row);
        let keys: Vec<&str> = values.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a.b", "c"]);
        assert_eq!(values["a.b"], Value::Int(3));
    }

    #[test]
    fn no_other_coercion() {
        let row = Row::new().with("flag", true).with("none", None::<i64>);
        let values = build_value_set(&row);
        assert_eq!(values["flag"], Value::Bool(true));
        assert_eq!(values["none"], Value::Null);
    }
}
