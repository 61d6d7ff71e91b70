//! Single-pass resolution of `${path}` placeholder references.
//!
//! Expansion rewrites every string leaf in the namespace, substituting each
//! `${a.b.c}` token with the stringified value found at that path in the
//! pre-expansion namespace. Resolution failures are fail-open: the literal
//! placeholder text is retained and one diagnostic is emitted per failure.
//!
//! Exactly one pass is performed. A placeholder whose replacement text itself
//! contains another placeholder is substituted literally, not re-expanded;
//! transitive resolution is a documented non-feature.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use crate::flatten::FlatNamespace;
use crate::value::Value;

/// Matches `${inner}` where `inner` contains no braces, so nested tokens
/// resolve innermost-first within the single pass.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(placeholder_pattern);

#[expect(clippy::unwrap_used, reason = "the pattern is a compile-time constant")]
fn placeholder_pattern() -> Regex {
    Regex::new(r"\$\{([^{}]*)\}").unwrap()
}

/// Expand placeholder references across a namespace.
///
/// Every entry is rewritten recursively, so strings nested inside list and
/// sub-tree entries are expanded too. All lookups read the original,
/// unexpanded namespace; partially-expanded output is never observed.
///
/// # Examples
///
/// ```rust
/// use strata_config::{Value, expand, flatten};
///
/// let tree = Value::from_entries([
///     ("alpha", Value::from_entries([("ip", Value::from("10.0.0.1"))])),
///     ("beta", Value::from_entries([("ip", Value::from("${alpha.ip}"))])),
/// ]);
/// let expanded = expand(flatten(&tree));
/// assert_eq!(expanded.get("beta.ip"), Some(&Value::from("10.0.0.1")));
/// ```
#[must_use]
pub fn expand(namespace: FlatNamespace) -> FlatNamespace {
    let original = namespace.clone();
    namespace
        .into_iter()
        .map(|(key, value)| (key, rewrite(value, &original)))
        .collect()
}

fn rewrite(value: Value, original: &FlatNamespace) -> Value {
    match value {
        Value::Str(text) => Value::Str(substitute(&text, original)),
        Value::List(items) => Value::List(
            items
                .into_iter()
                .map(|item| rewrite(item, original))
                .collect(),
        ),
        Value::Map(map) => Value::Map(
            map.into_iter()
                .map(|(key, item)| (key, rewrite(item, original)))
                .collect(),
        ),
        other => other,
    }
}

fn substitute(text: &str, original: &FlatNamespace) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            let literal = caps.get(0).map_or("", |m| m.as_str());
            let path = caps.get(1).map_or("", |m| m.as_str());
            match resolve(original, path) {
                Some(value) => match render_scalar(value) {
                    Some(rendered) => rendered,
                    None => {
                        warn!(
                            reference = path,
                            kind = value.kind(),
                            "placeholder references an unsupported value type; left unexpanded"
                        );
                        literal.to_owned()
                    }
                },
                None => {
                    warn!(reference = path, "unresolved placeholder; left unexpanded");
                    literal.to_owned()
                }
            }
        })
        .into_owned()
}

/// Look up a dot-delimited reference path in the namespace.
///
/// A direct flat-key hit wins, so an override of a dotted leaf takes
/// precedence over a stale parent sub-tree. Otherwise the path is walked from
/// its root segment, descending into maps by key and into lists by
/// integer-parsed index.
fn resolve<'a>(namespace: &'a FlatNamespace, path: &str) -> Option<&'a Value> {
    if let Some(value) = namespace.get(path) {
        return Some(value);
    }
    let mut segments = path.split('.');
    let mut current = namespace.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Map(map) => map.get(segment)?,
            Value::List(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Stringify a referenced terminal for substitution.
///
/// Null, timestamp, list and map terminals are not substitutable and yield
/// `None`.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(format!("{f:E}")),
        Value::Str(s) => Some(s.clone()),
        Value::Null | Value::Timestamp(_) | Value::List(_) | Value::Map(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;

    fn namespace() -> FlatNamespace {
        let tree = Value::from_entries([
            (
                "alpha",
                Value::from_entries([
                    ("ip", Value::from("10.0.0.1")),
                    ("port", Value::from(8080)),
                ]),
            ),
            (
                "servers",
                Value::from(vec![
                    Value::from_entries([("host", Value::from("s0.example"))]),
                    Value::from_entries([("host", Value::from("s1.example"))]),
                ]),
            ),
        ]);
        flatten(&tree)
    }

    #[test]
    fn substitutes_string_and_numeric_references() {
        let mut ns = namespace();
        ns.insert("beta.ip".to_owned(), Value::from("${alpha.ip}:${alpha.port}"));
        let expanded = expand(ns);
        assert_eq!(expanded.get("beta.ip"), Some(&Value::from("10.0.0.1:8080")));
    }

    #[test]
    fn resolves_list_indices() {
        let mut ns = namespace();
        ns.insert("pinned".to_owned(), Value::from("${servers.1.host}"));
        let expanded = expand(ns);
        assert_eq!(expanded.get("pinned"), Some(&Value::from("s1.example")));
    }

    #[test]
    fn unresolved_reference_is_left_verbatim() {
        let mut ns = namespace();
        ns.insert("broken".to_owned(), Value::from("${missing.key}"));
        let expanded = expand(ns);
        assert_eq!(expanded.get("broken"), Some(&Value::from("${missing.key}")));
    }

    #[test]
    fn map_terminal_is_left_verbatim() {
        let mut ns = namespace();
        ns.insert("whole".to_owned(), Value::from("${alpha}"));
        let expanded = expand(ns);
        assert_eq!(expanded.get("whole"), Some(&Value::from("${alpha}")));
    }

    #[test]
    fn expansion_is_single_pass() {
        let mut ns = namespace();
        ns.insert("indirect".to_owned(), Value::from("${alpha.ip}"));
        ns.insert("outer".to_owned(), Value::from("${inner}"));
        ns.insert("inner".to_owned(), Value::from("${alpha.ip}"));
        let expanded = expand(ns);
        // The replacement text still contains a placeholder; it is not
        // resolved a second time.
        assert_eq!(expanded.get("outer"), Some(&Value::from("${alpha.ip}")));
        assert_eq!(expanded.get("inner"), Some(&Value::from("10.0.0.1")));
    }

    #[test]
    fn float_references_render_in_exponent_notation() {
        let mut ns = FlatNamespace::new();
        ns.insert("ratio".to_owned(), Value::from(0.5));
        ns.insert("text".to_owned(), Value::from("${ratio}"));
        let expanded = expand(ns);
        assert_eq!(expanded.get("text"), Some(&Value::from("5E-1")));
    }
}
