//! The dynamically-typed document tree produced by configuration sources.
//!
//! Every source parser hands the engine a [`Value`] tree; the flattener,
//! merger and expander all traverse this one representation. Conversions from
//! the `toml`, `serde_yaml` and `serde_json` document types live here so the
//! rest of the crate never touches a foreign value enum.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A single configuration value.
///
/// Values are immutable once produced by a source. Maps use [`BTreeMap`] so
/// traversal order, and therefore logging and error output, is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A UTF-8 string.
    Str(String),
    /// An instant in time, normalised to UTC.
    Timestamp(DateTime<Utc>),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A nested mapping of string keys to values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Build a [`Value::Map`] from an ordered sequence of entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strata_config::Value;
    ///
    /// let tree = Value::from_entries([("port", Value::from(8080))]);
    /// assert!(matches!(tree, Value::Map(_)));
    /// ```
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// Short lowercase name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Borrow the string contents, if this is a [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the nested map, if this is a [`Value::Map`].
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

/// Interpret a TOML datetime, which may omit the offset or the time of day.
///
/// Offset datetimes parse as RFC 3339; local datetimes and dates are assumed
/// UTC. Anything else (a bare local time) degrades to a string so the value
/// is never lost.
fn from_toml_datetime(datetime: &toml::value::Datetime) -> Value {
    let text = datetime.to_string();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&text) {
        return Value::Timestamp(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Value::Timestamp(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        if let Some(midnight) = parsed.and_hms_opt(0, 0, 0) {
            return Value::Timestamp(midnight.and_utc());
        }
    }
    Value::Str(text)
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::Str(s),
            toml::Value::Integer(i) => Self::Int(i),
            toml::Value::Float(f) => Self::Float(f),
            toml::Value::Boolean(b) => Self::Bool(b),
            toml::Value::Datetime(dt) => from_toml_datetime(&dt),
            toml::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            toml::Value::Table(table) => Self::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or_default()), Self::Int),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Render a YAML mapping key as a string.
///
/// YAML permits non-string keys; scalar keys are stringified, anything more
/// exotic is dropped by the caller.
fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or_default()), Self::Int),
            serde_yaml::Value::String(s) => Self::Str(s),
            serde_yaml::Value::Sequence(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => Self::Map(
                mapping
                    .into_iter()
                    .filter_map(|(k, v)| yaml_key(&k).map(|key| (key, Self::from(v))))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

/// Normalise a map key for shape binding: lowercase, hyphens to underscores.
pub(crate) fn normalise_key(key: &str) -> String {
    key.to_ascii_lowercase().replace('-', "_")
}

/// Convert a [`Value`] into a `serde_json::Value` with normalised map keys.
///
/// Timestamps become RFC 3339 strings, which serde-aware datetime types
/// accept directly. Non-finite floats have no JSON representation and map to
/// null.
pub(crate) fn to_binding_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_binding_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (normalise_key(k), to_binding_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_datetimes_become_timestamps() {
        let doc: toml::Value = toml::from_str("when = 1979-05-27T07:32:00Z")
            .expect("valid toml");
        let tree = Value::from(doc);
        let Value::Map(map) = tree else {
            panic!("expected a table");
        };
        assert!(matches!(map.get("when"), Some(Value::Timestamp(_))));
    }

    #[test]
    fn json_numbers_split_into_int_and_float() {
        let doc: serde_json::Value =
            serde_json::from_str(r#"{"a": 3, "b": 1.5}"#).expect("valid json");
        let tree = Value::from(doc);
        let Value::Map(map) = tree else {
            panic!("expected an object");
        };
        assert_eq!(map.get("a"), Some(&Value::Int(3)));
        assert_eq!(map.get("b"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn binding_json_normalises_keys() {
        let tree = Value::from_entries([("Max-Retries", Value::from(3))]);
        let json = to_binding_json(&tree);
        assert_eq!(json["max_retries"], serde_json::json!(3));
    }
}
