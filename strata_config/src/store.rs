//! The typed, read-only façade over a finalised namespace.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::error::{StrataError, StrataResult};
use crate::flatten::FlatNamespace;
use crate::value::{Value, to_binding_json};

/// An immutable snapshot of merged, expanded configuration.
///
/// Reads never mutate the namespace and the scalar getters never fail: an
/// absent or incoercible key yields the zero value of the requested type.
/// That silent degradation is a deliberate ergonomic trade-off; callers that
/// need loud failures use [`PropertyStore::require`] or
/// [`PropertyStore::unmarshal_key`], and presence can be checked with
/// [`PropertyStore::contains_key`].
///
/// A built store is safe for unsynchronised concurrent reads.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    namespace: FlatNamespace,
}

impl PropertyStore {
    /// Wrap a finalised namespace.
    #[must_use]
    pub const fn new(namespace: FlatNamespace) -> Self {
        Self { namespace }
    }

    /// Raw value at `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.namespace.get(key)
    }

    /// Whether `key` is present in the namespace.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.namespace.contains_key(key)
    }

    /// Iterate over all keys in the namespace in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.namespace.keys().map(String::as_str)
    }

    /// Raw value at `key`, failing loudly when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::MissingKey`] when the key is not present.
    pub fn require(&self, key: &str) -> StrataResult<&Value> {
        self.namespace
            .get(key)
            .ok_or_else(|| StrataError::MissingKey {
                key: key.to_owned(),
            })
    }

    /// String at `key`; empty when absent or not a string.
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.namespace
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    }

    /// Integer at `key`; zero when absent or incoercible.
    ///
    /// Floats truncate and numeric strings parse; anything else is zero.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> i64 {
        match self.namespace.get(key) {
            Some(Value::Int(i)) => *i,
            #[expect(
                clippy::cast_possible_truncation,
                reason = "truncating coercion is the documented getter contract"
            )]
            Some(Value::Float(f)) => *f as i64,
            Some(Value::Bool(b)) => i64::from(*b),
            Some(Value::Str(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        }
    }

    /// Boolean at `key`; false when absent or incoercible.
    ///
    /// Accepts `true`/`false`/`1`/`0` strings (case-insensitive) and treats
    /// nonzero integers as true.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        match self.namespace.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Int(i)) => *i != 0,
            Some(Value::Str(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1")
            }
            _ => false,
        }
    }

    /// Float at `key`; zero when absent or incoercible.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> f64 {
        match self.namespace.get(key) {
            Some(Value::Float(f)) => *f,
            #[expect(
                clippy::cast_precision_loss,
                reason = "widening coercion is the documented getter contract"
            )]
            Some(Value::Int(i)) => *i as f64,
            Some(Value::Str(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0.0,
        }
    }

    /// Timestamp at `key`; the Unix epoch when absent or incoercible.
    ///
    /// Accepts RFC 3339 strings alongside native timestamps.
    #[must_use]
    pub fn get_time(&self, key: &str) -> DateTime<Utc> {
        match self.namespace.get(key) {
            Some(Value::Timestamp(t)) => *t,
            Some(Value::Str(s)) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or(DateTime::UNIX_EPOCH),
            _ => DateTime::UNIX_EPOCH,
        }
    }

    /// Bind the sub-tree at `key` onto a caller-provided shape.
    ///
    /// The sub-tree (a map or list) is matched field-by-field against `T`.
    /// Keys are normalised to lowercase with hyphens as underscores before
    /// matching, so field matching is case-insensitive; a declared
    /// `#[serde(alias = "...")]` takes precedence over the lowercased field
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::ShapeMismatch`] when the key is absent or the
    /// sub-tree's structure is incompatible with `T`. Never panics.
    pub fn unmarshal_key<T: DeserializeOwned>(&self, key: &str) -> StrataResult<T> {
        let value = self
            .namespace
            .get(key)
            .ok_or_else(|| StrataError::ShapeMismatch {
                key: key.to_owned(),
                message: "key is not present".to_owned(),
            })?;
        serde_json::from_value(to_binding_json(value)).map_err(|e| StrataError::ShapeMismatch {
            key: key.to_owned(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> PropertyStore {
        let mut namespace = FlatNamespace::new();
        namespace.insert("name".to_owned(), Value::from("app"));
        namespace.insert("port".to_owned(), Value::from(8080));
        namespace.insert("ratio".to_owned(), Value::from(0.5));
        namespace.insert("debug".to_owned(), Value::from("true"));
        namespace.insert(
            "started".to_owned(),
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid")),
        );
        PropertyStore::new(namespace)
    }

    #[test]
    fn getters_coerce_where_sensible() {
        let store = store();
        assert_eq!(store.get_string("name"), "app");
        assert_eq!(store.get_i64("port"), 8080);
        assert_eq!(store.get_f64("port"), 8080.0);
        assert!(store.get_bool("debug"));
        assert_eq!(store.get_time("started").timestamp(), 1_709_294_400);
    }

    #[test]
    fn getters_degrade_to_zero_values() {
        let store = store();
        assert_eq!(store.get_string("missing"), "");
        assert_eq!(store.get_string("port"), "");
        assert_eq!(store.get_i64("name"), 0);
        assert!(!store.get_bool("missing"));
        assert_eq!(store.get_f64("missing"), 0.0);
        assert_eq!(store.get_time("missing"), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn require_fails_loudly() {
        let err = store().require("missing").expect_err("absent key");
        assert!(matches!(err, StrataError::MissingKey { key } if key == "missing"));
    }
}
