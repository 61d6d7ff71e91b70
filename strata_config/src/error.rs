//! Error types produced by the configuration engine.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias for results returned by this crate.
pub type StrataResult<T> = Result<T, StrataError>;

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// No source implementation is registered for the descriptor's scheme.
    #[error("no source registered for scheme '{scheme}'")]
    UnknownScheme {
        /// Scheme name that failed to resolve.
        scheme: String,
    },

    /// A source descriptor string did not match the descriptor grammar.
    #[error("malformed source descriptor '{descriptor}': {message}")]
    Descriptor {
        /// The descriptor string as supplied by the caller.
        descriptor: String,
        /// Human-readable explanation of the parse failure.
        message: String,
    },

    /// Error reading or parsing a configuration file.
    #[error("configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying error reported by the filesystem or parser.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A source failed during initialisation or loading.
    #[error("source '{scheme}' failed: {source}")]
    Source {
        /// Scheme of the failing source.
        scheme: String,
        /// Underlying error reported by the source.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A key required by the caller is not present in the namespace.
    #[error("configuration key '{key}' is not present")]
    MissingKey {
        /// The absent key.
        key: String,
    },

    /// The sub-tree at a key is structurally incompatible with the target
    /// shape requested by the caller.
    #[error("cannot bind configuration key '{key}' onto the requested shape: {message}")]
    ShapeMismatch {
        /// Key whose sub-tree failed to bind.
        key: String,
        /// Explanation produced by the deserializer.
        message: String,
    },
}

impl StrataError {
    /// Construct a [`StrataError::Source`] from a plain message.
    pub(crate) fn source_message(scheme: &str, message: impl Into<String>) -> Self {
        Self::Source {
            scheme: scheme.to_owned(),
            source: Box::new(std::io::Error::other(message.into())),
        }
    }
}
