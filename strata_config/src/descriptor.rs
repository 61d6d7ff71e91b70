//! The source descriptor mini-language.
//!
//! Sources are configured with URI-like strings of the form
//! `scheme://key1=val1;key2=val2a,val2b`. The grammar is parsed explicitly so
//! a malformed descriptor is a reportable error rather than a silently-wrong
//! option set:
//!
//! ```text
//! descriptor := scheme "://" [ option (";" option)* ]
//! option     := key "=" value ("," value)*
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{StrataError, StrataResult};

/// Options attached to a source descriptor, keyed by option name.
///
/// Every option carries a list of values because the grammar allows
/// comma-separated lists (`path=.,/etc/app`); single-valued options are a
/// one-element list.
pub type SourceOptions = BTreeMap<String, Vec<String>>;

/// A parsed source descriptor: a scheme selecting the source implementation
/// plus its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Scheme name, e.g. `env` or `file`.
    pub scheme: String,
    /// Parsed option map.
    pub options: SourceOptions,
}

impl SourceDescriptor {
    /// Parse a descriptor string.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Descriptor`] when the separator is missing, the
    /// scheme is empty, or an option lacks a key or an `=` sign.
    pub fn parse(input: &str) -> StrataResult<Self> {
        let malformed = |message: &str| StrataError::Descriptor {
            descriptor: input.to_owned(),
            message: message.to_owned(),
        };

        let (scheme, rest) = input
            .split_once("://")
            .ok_or_else(|| malformed("missing '://' separator"))?;
        if scheme.is_empty() {
            return Err(malformed("scheme must not be empty"));
        }

        let mut options = SourceOptions::new();
        for option in rest.split(';').filter(|o| !o.is_empty()) {
            let (key, value) = option
                .split_once('=')
                .ok_or_else(|| malformed("option is missing '='"))?;
            if key.is_empty() {
                return Err(malformed("option key must not be empty"));
            }
            let values = value.split(',').map(str::to_owned).collect();
            // Last occurrence of a repeated option key wins.
            options.insert(key.to_owned(), values);
        }

        Ok(Self {
            scheme: scheme.to_owned(),
            options,
        })
    }

    /// First value of an option, if present.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of an option; empty when the option is absent.
    #[must_use]
    pub fn option_values(&self, key: &str) -> &[String] {
        self.options.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

impl FromStr for SourceDescriptor {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// First value of an option in a raw option map, if present.
///
/// Sources receive bare [`SourceOptions`] in their `init` contract, so this
/// helper mirrors [`SourceDescriptor::option`] for that call site.
#[must_use]
pub fn option_first<'a>(options: &'a SourceOptions, key: &str) -> Option<&'a str> {
    options
        .get(key)
        .and_then(|values| values.first())
        .map(String::as_str)
}
