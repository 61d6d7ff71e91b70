//! Environment variable source with CSV list support.
//!
//! Captures variables by prefix (`env://prefix=APP`) and/or by exact name
//! (`env://envName=HOSTNAME,RUST_LOG`). Prefixed names are stripped,
//! lowercased and split on `_` into a nested tree, so `APP_DB_HOST` lands at
//! `db.host`. Values containing commas are interpreted as lists unless they
//! look like structured data (starting with `[`, `{` or a quote); wrap a
//! value in quotes or brackets to keep an embedded comma literal.

use std::collections::BTreeMap;

use uncased::UncasedStr;

use crate::descriptor::{SourceOptions, option_first};
use crate::error::StrataResult;
use crate::source::ConfigSource;
use crate::value::Value;

/// Built-in source for the `env` scheme.
#[derive(Debug, Default)]
pub struct EnvSource {
    prefix: Option<String>,
    exact_names: Vec<String>,
    /// Environment snapshot taken at init, so `load` is pure.
    captured: Vec<(String, String)>,
}

impl EnvSource {
    /// Create an uninitialised source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive check that `name` starts with `<prefix>_`, returning
    /// the remainder after the separator.
    fn strip_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
        let sep = prefix.len().checked_add(1)?;
        let head = name.get(..sep)?;
        let (head_prefix, head_sep) = (head.get(..prefix.len())?, head.get(prefix.len()..)?);
        if UncasedStr::new(head_prefix) == UncasedStr::new(prefix) && head_sep == "_" {
            name.get(sep..).filter(|rest| !rest.is_empty())
        } else {
            None
        }
    }

    /// Determine if a value should be parsed as comma-separated rather than
    /// structured data.
    fn should_parse_as_csv(value: &str) -> bool {
        value.contains(',') && !matches!(value.chars().next(), Some('[' | '{' | '"' | '\''))
    }

    /// Coerce a raw environment value into a [`Value`].
    ///
    /// Comma-separated values become lists; scalars are tried as bool, then
    /// integer, then float, falling back to a string.
    fn parse_value(raw: &str) -> Value {
        let trimmed = raw.trim();
        if Self::should_parse_as_csv(trimmed) {
            return Value::List(
                trimmed
                    .split(',')
                    .map(|item| Self::parse_scalar(item.trim()))
                    .collect(),
            );
        }
        Self::parse_scalar(trimmed)
    }

    fn parse_scalar(raw: &str) -> Value {
        if let Ok(b) = raw.parse::<bool>() {
            return Value::Bool(b);
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Str(raw.to_owned())
    }

    /// Insert `value` at the nested position named by `segments`.
    ///
    /// A scalar already sitting where a deeper entry needs a map is replaced;
    /// within one environment snapshot the deeper binding is the more
    /// specific one.
    fn insert_nested(map: &mut BTreeMap<String, Value>, segments: &[&str], value: Value) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        if rest.is_empty() {
            map.insert((*head).to_owned(), value);
            return;
        }
        let entry = map
            .entry((*head).to_owned())
            .or_insert_with(|| Value::Map(BTreeMap::new()));
        if !matches!(entry, Value::Map(_)) {
            *entry = Value::Map(BTreeMap::new());
        }
        if let Value::Map(child) = entry {
            Self::insert_nested(child, rest, value);
        }
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &'static str {
        "env"
    }

    fn init(&mut self, options: &SourceOptions) -> StrataResult<()> {
        self.prefix = option_first(options, "prefix").map(str::to_owned);
        self.exact_names = options
            .get("envName")
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|name| !name.is_empty())
            .collect();
        self.captured = std::env::vars().collect();
        Ok(())
    }

    fn load(&self) -> StrataResult<Value> {
        let mut root = BTreeMap::new();

        if let Some(prefix) = &self.prefix {
            for (name, raw) in &self.captured {
                if let Some(rest) = Self::strip_prefix(name, prefix) {
                    let lowered = rest.to_ascii_lowercase();
                    let segments: Vec<&str> =
                        lowered.split('_').filter(|s| !s.is_empty()).collect();
                    if !segments.is_empty() {
                        Self::insert_nested(&mut root, &segments, Self::parse_value(raw));
                    }
                }
            }
        }

        // Exact names are captured verbatim under their lowercased name,
        // regardless of prefix and without underscore nesting.
        for wanted in &self.exact_names {
            if let Some((_, raw)) = self
                .captured
                .iter()
                .find(|(name, _)| UncasedStr::new(name) == UncasedStr::new(wanted))
            {
                root.insert(wanted.to_ascii_lowercase(), Self::parse_value(raw));
            }
        }

        Ok(Value::Map(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching_is_case_insensitive() {
        assert_eq!(EnvSource::strip_prefix("APP_NAME", "app"), Some("NAME"));
        assert_eq!(EnvSource::strip_prefix("app_name", "APP"), Some("name"));
        assert_eq!(EnvSource::strip_prefix("APPNAME", "APP"), None);
        assert_eq!(EnvSource::strip_prefix("OTHER_NAME", "APP"), None);
        assert_eq!(EnvSource::strip_prefix("APP_", "APP"), None);
    }

    #[test]
    fn csv_values_become_lists() {
        assert_eq!(
            EnvSource::parse_value("a, b ,c"),
            Value::List(vec![
                Value::from("a"),
                Value::from("b"),
                Value::from("c"),
            ])
        );
        // Bracketed and quoted values keep their commas.
        assert_eq!(
            EnvSource::parse_value(r#""a,b""#),
            Value::from(r#""a,b""#)
        );
    }

    #[test]
    fn scalars_coerce_in_order() {
        assert_eq!(EnvSource::parse_value("true"), Value::Bool(true));
        assert_eq!(EnvSource::parse_value("8080"), Value::Int(8080));
        assert_eq!(EnvSource::parse_value("0.5"), Value::Float(0.5));
        assert_eq!(EnvSource::parse_value("easy"), Value::from("easy"));
    }

    #[test]
    fn deeper_bindings_replace_scalars() {
        let mut root = BTreeMap::new();
        EnvSource::insert_nested(&mut root, &["db"], Value::from("flat"));
        EnvSource::insert_nested(&mut root, &["db", "host"], Value::from("deep"));
        let Some(Value::Map(db)) = root.get("db") else {
            panic!("expected nested map");
        };
        assert_eq!(db.get("host"), Some(&Value::from("deep")));
    }
}
