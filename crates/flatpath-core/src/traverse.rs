//! The flattening walk
//!
//! [`Traverser`] performs one top-level flattening call: a depth-first walk
//! over a nested value that writes one entry per reachable field into the
//! flat store. Records contribute an entry for every field at the field's
//! full key, then are descended into. Arrays contribute nothing themselves;
//! when their elements are records, each element field is appended to a
//! per-field column list at `prefix + field`. Scalars end the descent.
//!
//! Cycle suppression is identity based and scoped to the current
//! root-to-node chain ([`Lineage`]): the same record reached through two
//! sibling fields is flattened twice, a record reached again through its
//! own descendants is not. Nothing is remembered between calls.
//!
//! The initial value of a map is flattened only when it is a record; merged
//! values follow the nested rules, so a merged array of records becomes
//! columns at the top level.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::key::KeyPath;
use crate::lineage::Lineage;
use crate::options::FlattenOptions;
use crate::value::{Array, Kind, Record, Value};

/// State of a single top-level flattening call
pub(crate) struct Traverser<'s> {
    entries: &'s mut IndexMap<String, Value>,
    options: &'s FlattenOptions,
    /// Keys whose column list was started by this call
    columns: HashSet<String>,
    written: usize,
}

impl<'s> Traverser<'s> {
    pub(crate) fn new(entries: &'s mut IndexMap<String, Value>, options: &'s FlattenOptions) -> Self {
        Self {
            entries,
            options,
            columns: HashSet::new(),
            written: 0,
        }
    }

    /// Flatten the initial value of a map
    ///
    /// Only records are flattened here. Anything else, arrays included,
    /// contributes no entries. Returns the number of writes made.
    pub(crate) fn flatten(mut self, value: &Value) -> usize {
        match value.kind() {
            Kind::Record(record) => {
                self.visit_record(record, &KeyPath::root(), &Lineage::root());
                debug!(
                    written = self.written,
                    entries = self.entries.len(),
                    "flattened record"
                );
            }
            Kind::Array(_) | Kind::Scalar => {
                debug!("initial value is not a record, nothing to flatten");
            }
        }
        self.written
    }

    /// Flatten a merged value with the rules used below the top level
    ///
    /// A record is flattened as in [`Traverser::flatten`]; an array of
    /// records is split into columns keyed by the bare field names.
    /// Returns the number of writes made.
    pub(crate) fn merge(mut self, value: &Value) -> usize {
        self.visit(value, &KeyPath::root(), &Lineage::root());
        debug!(
            written = self.written,
            entries = self.entries.len(),
            "merged value"
        );
        self.written
    }

    fn visit(&mut self, value: &Value, path: &KeyPath, lineage: &Lineage<'_>) {
        match value.kind() {
            Kind::Record(record) => self.visit_record(record, path, lineage),
            Kind::Array(array) if self.options.columnize_arrays => {
                self.visit_array(array, path, lineage)
            }
            Kind::Array(_) | Kind::Scalar => {}
        }
    }

    fn visit_record(&mut self, record: &Record, path: &KeyPath, lineage: &Lineage<'_>) {
        if lineage.contains(record.id()) {
            trace!(path = %path, "cyclic record reference, not descending");
            return;
        }
        let lineage = lineage.with(record.id());

        for (field, value) in record.fields() {
            let child = path.child(field);
            let key = child.join(&self.options.separator);
            self.columns.remove(&key);
            self.entries.insert(key, value.clone());
            self.written += 1;
            self.visit(&value, &child, &lineage);
        }
    }

    fn visit_array(&mut self, array: &Array, path: &KeyPath, lineage: &Lineage<'_>) {
        if lineage.contains(array.id()) {
            trace!(path = %path, "cyclic array reference, not descending");
            return;
        }
        let lineage = lineage.with(array.id());

        for element in array.to_vec() {
            // Only records are split into columns
            let Kind::Record(record) = element.kind() else {
                continue;
            };
            if lineage.contains(record.id()) {
                trace!(path = %path, "cyclic array element, skipping");
                continue;
            }
            let lineage = lineage.with(record.id());

            for (field, value) in record.fields() {
                let child = path.child(field);
                self.append_to_column(child.join(&self.options.separator), value.clone());
                self.visit(&value, &child, &lineage);
            }
        }
    }

    fn append_to_column(&mut self, key: String, value: Value) {
        if self.columns.contains(&key) {
            if let Some(Value::Array(column)) = self.entries.get(&key) {
                column.push(value);
                self.written += 1;
                return;
            }
        }

        trace!(key = %key, "starting column");
        self.entries
            .insert(key.clone(), Value::Array(Array::from(vec![value])));
        self.columns.insert(key);
        self.written += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten(value: serde_json::Value) -> IndexMap<String, Value> {
        let mut entries = IndexMap::new();
        let options = FlattenOptions::default();
        Traverser::new(&mut entries, &options).flatten(&Value::from(value));
        entries
    }

    fn keys(entries: &IndexMap<String, Value>) -> Vec<&str> {
        entries.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_record_entries_in_walk_order() {
        let entries = flatten(json!({"a": 1, "c": {"ca": "test", "cb": false}, "d": null}));
        assert_eq!(keys(&entries), ["a", "c", "c.ca", "c.cb", "d"]);
        assert!(entries["d"].is_null());
    }

    #[test]
    fn test_scalar_arrays_stay_opaque() {
        let entries = flatten(json!({"a": {"b": [1, 2, 3]}}));
        assert_eq!(keys(&entries), ["a", "a.b"]);
        assert_eq!(entries["a.b"], Value::from(json!([1, 2, 3])));
    }

    #[test]
    fn test_arrays_of_arrays_stay_opaque() {
        let entries = flatten(json!({"m": [[1, 2], [3]]}));
        assert_eq!(keys(&entries), ["m"]);
    }

    #[test]
    fn test_columns_from_array_of_records() {
        let entries = flatten(json!({
            "a": [
                {"b": 1, "c": [{"d": 1}]},
                {"b": 2, "c": [{"d": 2}]}
            ]
        }));

        assert_eq!(keys(&entries), ["a", "a.b", "a.c", "a.c.d"]);
        assert_eq!(entries["a.b"], Value::from(json!([1, 2])));
        assert_eq!(entries["a.c"], Value::from(json!([[{"d": 1}], [{"d": 2}]])));
        assert_eq!(entries["a.c.d"], Value::from(json!([1, 2])));
    }

    #[test]
    fn test_heterogeneous_columns_have_no_placeholders() {
        let entries = flatten(json!({"rows": [{"x": 1}, {"y": 2}, {"x": 3}, 4, "skip"]}));
        assert_eq!(entries["rows.x"], Value::from(json!([1, 3])));
        assert_eq!(entries["rows.y"], Value::from(json!([2])));
    }

    #[test]
    fn test_records_inside_columns_are_flattened_last_write_wins() {
        let entries = flatten(json!({"a": [{"b": {"x": 1}}, {"b": {"x": 2}}]}));
        assert_eq!(entries["a.b"], Value::from(json!([{"x": 1}, {"x": 2}])));
        assert_eq!(entries["a.b.x"], Value::from(2));
    }

    #[test]
    fn test_column_replaces_value_from_previous_call() {
        let mut entries = IndexMap::new();
        let options = FlattenOptions::default();
        entries.insert("a.b".to_string(), Value::from("stale"));

        let value = Value::from(json!({"a": [{"b": 1}, {"b": 2}]}));
        Traverser::new(&mut entries, &options).flatten(&value);
        assert_eq!(entries["a.b"], Value::from(json!([1, 2])));

        // A second call starts the column over instead of appending
        Traverser::new(&mut entries, &options).flatten(&value);
        assert_eq!(entries["a.b"], Value::from(json!([1, 2])));
    }

    #[test]
    fn test_column_does_not_append_to_record_written_array() {
        // "x.a.b" is first a column, then overwritten by a record field
        // holding a caller's array, then appended to again.
        let user_array = Array::from(vec![Value::from("mine")]);
        let first = Record::new()
            .with("a.b", 1)
            .with("a", Record::new().with("b", user_array.clone()));
        let second = Record::new().with("a.b", 2);
        let root = Record::new().with("x", Array::from(vec![Value::from(first), Value::from(second)]));

        let mut entries = IndexMap::new();
        let options = FlattenOptions::default();
        Traverser::new(&mut entries, &options).flatten(&Value::from(root));

        assert_eq!(user_array.len(), 1);
        assert_eq!(entries["x.a.b"], Value::from(json!([2])));
    }

    #[test]
    fn test_columnization_disabled() {
        let mut entries = IndexMap::new();
        let options = FlattenOptions::new().with_columnize_arrays(false);
        let value = Value::from(json!({"a": [{"b": 1}, {"b": 2}]}));

        Traverser::new(&mut entries, &options).flatten(&value);
        assert_eq!(keys(&entries), ["a"]);
    }

    #[test]
    fn test_custom_separator() {
        let mut entries = IndexMap::new();
        let options = FlattenOptions::new().with_separator("/");
        let value = Value::from(json!({"a": {"b": [{"c": 1}]}}));

        Traverser::new(&mut entries, &options).flatten(&value);
        assert_eq!(keys(&entries), ["a", "a/b", "a/b/c"]);
    }

    #[test]
    fn test_self_reference_is_suppressed() {
        let root = Record::new().with("name", "root");
        root.insert("ref", root.clone());

        let mut entries = IndexMap::new();
        let options = FlattenOptions::default();
        let written = Traverser::new(&mut entries, &options).flatten(&Value::from(root.clone()));

        assert_eq!(written, 2);
        assert_eq!(keys(&entries), ["name", "ref"]);
        assert!(entries["ref"].as_record().unwrap().ptr_eq(&root));

        root.remove("ref");
    }

    #[test]
    fn test_indirect_cycle_is_suppressed() {
        let a = Record::new();
        let b = Record::new().with("back", a.clone());
        a.insert("b", b.clone());
        let root = Record::new().with("a", a.clone());

        let mut entries = IndexMap::new();
        let options = FlattenOptions::default();
        Traverser::new(&mut entries, &options).flatten(&Value::from(root));

        assert_eq!(keys(&entries), ["a", "a.b", "a.b.back"]);

        a.remove("b");
    }

    #[test]
    fn test_array_containing_itself_terminates() {
        let element = Record::new();
        let list = Array::from(vec![Value::from(element.clone())]);
        element.insert("list", list.clone());
        let root = Record::new().with("items", list.clone());

        let mut entries = IndexMap::new();
        let options = FlattenOptions::default();
        Traverser::new(&mut entries, &options).flatten(&Value::from(root));

        assert_eq!(keys(&entries), ["items", "items.list"]);
        let column = entries["items.list"].as_array().unwrap();
        assert_eq!(column.len(), 1);
        assert!(column.get(0).unwrap().as_array().unwrap().ptr_eq(&list));

        element.remove("list");
    }

    #[test]
    fn test_shared_reference_is_traversed_per_branch() {
        let shared = Record::new().with("field", 42);
        let root = Record::new()
            .with("a", Record::new().with("ref", shared.clone()))
            .with("b", Record::new().with("ref", shared));

        let entries = {
            let mut entries = IndexMap::new();
            let options = FlattenOptions::default();
            Traverser::new(&mut entries, &options).flatten(&Value::from(root));
            entries
        };

        assert_eq!(entries["a.ref.field"], Value::from(42));
        assert_eq!(entries["b.ref.field"], Value::from(42));
    }

    #[test]
    fn test_non_record_top_level_contributes_nothing() {
        let inputs = [
            json!(null),
            json!(0),
            json!(1),
            json!(false),
            json!(true),
            json!("s"),
            json!(["asd"]),
            json!([{"a": 1}]),
        ];
        for value in inputs {
            assert!(
                flatten(value.clone()).is_empty(),
                "expected no entries for {value}"
            );
        }
    }

    #[test]
    fn test_merged_array_of_records_becomes_columns() {
        let mut entries = IndexMap::new();
        let options = FlattenOptions::default();
        let value = Value::from(json!([{"b": 1, "c": {"d": "x"}}, {"b": 2}, "skip"]));

        let written = Traverser::new(&mut entries, &options).merge(&value);

        assert_eq!(keys(&entries), ["b", "c", "c.d"]);
        assert_eq!(entries["b"], Value::from(json!([1, 2])));
        assert_eq!(entries["c"], Value::from(json!([{"d": "x"}])));
        assert_eq!(entries["c.d"], Value::from("x"));
        assert_eq!(written, 4);
    }

    #[test]
    fn test_merged_scalars_and_plain_arrays_contribute_nothing() {
        let options = FlattenOptions::default();
        for value in [json!(null), json!(0), json!("s"), json!(["asd"]), json!([[1]])] {
            let mut entries = IndexMap::new();
            Traverser::new(&mut entries, &options).merge(&Value::from(value.clone()));
            assert!(entries.is_empty(), "expected no entries for {value}");
        }
    }

    #[test]
    fn test_merged_array_with_columns_disabled_contributes_nothing() {
        let mut entries = IndexMap::new();
        let options = FlattenOptions::new().with_columnize_arrays(false);
        Traverser::new(&mut entries, &options).merge(&Value::from(json!([{"b": 1}])));
        assert!(entries.is_empty());
    }
}
