//! Conversion of a nested document tree into a flat, dot-delimited namespace.

use std::collections::BTreeMap;

use crate::value::Value;

/// A flat mapping of dot-delimited key paths to values.
///
/// Every intermediate map node is recorded alongside the leaves, holding its
/// whole sub-tree as the value, so a consumer can fetch either a scalar leaf
/// or a whole sub-object by path.
pub type FlatNamespace = BTreeMap<String, Value>;

/// Flatten a document tree into a [`FlatNamespace`].
///
/// Depth-first pre-order traversal: a map entry `(k, v)` visited at prefix
/// `p` is recorded under `p.k` (or `k` at the root), and maps are recursed
/// into after being recorded. Leaves, lists included, are recorded without
/// further decomposition. A non-map root flattens to an empty namespace.
///
/// Re-flattening a namespace whose values contain no nested maps is a no-op.
///
/// # Examples
///
/// ```rust
/// use strata_config::{Value, flatten};
///
/// let tree = Value::from_entries([(
///     "server",
///     Value::from_entries([("port", Value::from(8080))]),
/// )]);
/// let flat = flatten(&tree);
/// assert_eq!(flat.get("server.port"), Some(&Value::from(8080)));
/// assert!(matches!(flat.get("server"), Some(Value::Map(_))));
/// ```
#[must_use]
pub fn flatten(tree: &Value) -> FlatNamespace {
    let mut namespace = FlatNamespace::new();
    if let Value::Map(map) = tree {
        flatten_into(map, "", &mut namespace);
    }
    namespace
}

fn flatten_into(map: &BTreeMap<String, Value>, prefix: &str, namespace: &mut FlatNamespace) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        namespace.insert(full_key.clone(), value.clone());
        if let Value::Map(child) = value {
            flatten_into(child, &full_key, namespace);
        }
    }
}
