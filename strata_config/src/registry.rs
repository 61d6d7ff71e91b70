//! Scheme registry mapping descriptor schemes to source factories.

use std::collections::HashMap;

use crate::descriptor::SourceDescriptor;
use crate::error::{StrataError, StrataResult};
use crate::source::{ConfigSource, env::EnvSource, file::FileSource};

type SourceFactory = Box<dyn Fn() -> Box<dyn ConfigSource> + Send + Sync>;

/// Registry of descriptor schemes and the factories that build their sources.
///
/// Each resolution builds a fresh source instance, so the same scheme can
/// appear in several descriptors without sources sharing state.
#[derive(Default)]
pub struct SourceRegistry {
    factories: HashMap<String, SourceFactory>,
}

impl SourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `env` and `file` schemes.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("env", || Box::new(EnvSource::new()));
        registry.register("file", || Box::new(FileSource::new()));
        registry
    }

    /// Register `factory` for `scheme`.
    ///
    /// Re-registering a scheme overwrites the previous binding. This is
    /// deliberate: it lets applications override a built-in source with
    /// their own implementation.
    pub fn register<F>(&mut self, scheme: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ConfigSource> + Send + Sync + 'static,
    {
        self.factories.insert(scheme.into(), Box::new(factory));
    }

    /// Whether a scheme is registered.
    #[must_use]
    pub fn contains(&self, scheme: &str) -> bool {
        self.factories.contains_key(scheme)
    }

    /// Build a fresh source for the descriptor's scheme.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::UnknownScheme`] when no factory is registered
    /// for the scheme.
    pub fn resolve(&self, descriptor: &SourceDescriptor) -> StrataResult<Box<dyn ConfigSource>> {
        self.factories
            .get(&descriptor.scheme)
            .map(|factory| factory())
            .ok_or_else(|| StrataError::UnknownScheme {
                scheme: descriptor.scheme.clone(),
            })
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("schemes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
