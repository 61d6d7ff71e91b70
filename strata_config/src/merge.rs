//! Deterministic override merging of flat configuration layers.

use tracing::debug;

use crate::flatten::FlatNamespace;

/// Merge `override_layer` over `base`, returning the combined namespace.
///
/// The result starts as a copy of `base`; every key in `override_layer` is
/// then written into it, replacing any existing value for that key. With an
/// empty `base` the result equals `override_layer`.
///
/// # Examples
///
/// ```rust
/// use strata_config::{FlatNamespace, Value, merge};
///
/// let mut base = FlatNamespace::new();
/// base.insert("name".into(), Value::from("base"));
/// let mut winner = FlatNamespace::new();
/// winner.insert("name".into(), Value::from("override"));
///
/// let merged = merge(winner, base);
/// assert_eq!(merged.get("name"), Some(&Value::from("override")));
/// ```
#[must_use]
pub fn merge(override_layer: FlatNamespace, base: FlatNamespace) -> FlatNamespace {
    let mut result = base;
    for (key, value) in override_layer {
        result.insert(key, value);
    }
    result
}

/// Fold an ordered sequence of layers left-to-right.
///
/// The i-th layer's keys override every layer before it, so the net effect is
/// "last layer wins" for any key defined by several layers.
#[must_use]
pub fn merge_layers<I>(layers: I) -> FlatNamespace
where
    I: IntoIterator<Item = FlatNamespace>,
{
    layers.into_iter().fold(FlatNamespace::new(), |acc, layer| {
        debug!(keys = layer.len(), "merging configuration layer");
        merge(layer, acc)
    })
}
