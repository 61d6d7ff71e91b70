//! The load pipeline and the atomically-swappable snapshot handle.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use crate::descriptor::SourceDescriptor;
use crate::error::StrataResult;
use crate::expand::expand;
use crate::flatten::flatten;
use crate::merge::merge_layers;
use crate::registry::SourceRegistry;
use crate::source::ConfigSource;
use crate::store::PropertyStore;

/// Builds a [`PropertyStore`] from an ordered list of source descriptors.
///
/// Sources are resolved, initialised and read strictly in registration
/// order; later sources override earlier ones on key collision. Loading is
/// synchronous, and any source failure aborts the whole sequence. The engine
/// defines no timeout for source I/O; callers needing a deadline layer one on
/// top.
#[derive(Debug)]
pub struct Loader {
    registry: SourceRegistry,
    descriptors: Vec<SourceDescriptor>,
}

impl Loader {
    /// Create a loader with the built-in `env` and `file` schemes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: SourceRegistry::with_defaults(),
            descriptors: Vec::new(),
        }
    }

    /// Create a loader over a custom registry.
    #[must_use]
    pub const fn with_registry(registry: SourceRegistry) -> Self {
        Self {
            registry,
            descriptors: Vec::new(),
        }
    }

    /// Register `factory` for `scheme`, overriding any existing binding.
    pub fn register<F>(&mut self, scheme: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ConfigSource> + Send + Sync + 'static,
    {
        self.registry.register(scheme, factory);
    }

    /// Append a source descriptor to the load order.
    ///
    /// The descriptor is parsed eagerly, so grammar mistakes surface here
    /// rather than at load time.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Descriptor`](crate::StrataError::Descriptor)
    /// when the string does not match the descriptor grammar.
    pub fn add_source(&mut self, descriptor: &str) -> StrataResult<&mut Self> {
        self.descriptors.push(SourceDescriptor::parse(descriptor)?);
        Ok(self)
    }

    /// Resolve, initialise and read every source, then merge, expand and wrap
    /// the result.
    ///
    /// # Errors
    ///
    /// Fails fast on the first unknown scheme or source failure; the caller
    /// receives no partially-loaded configuration.
    pub fn load(&self) -> StrataResult<PropertyStore> {
        let mut layers = Vec::with_capacity(self.descriptors.len());
        for descriptor in &self.descriptors {
            let mut source = self.registry.resolve(descriptor)?;
            source.init(&descriptor.options)?;
            let tree = source.load()?;
            let layer = flatten(&tree);
            debug!(
                scheme = %descriptor.scheme,
                keys = layer.len(),
                "loaded configuration layer"
            );
            layers.push(layer);
        }
        Ok(PropertyStore::new(expand(merge_layers(layers))))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// A published configuration snapshot that can be rebuilt and swapped.
///
/// Readers call [`ConfigHandle::current`] and keep the returned [`Arc`] for
/// as long as they need a consistent view; the read path takes no locks.
/// [`ConfigHandle::reload`] builds a brand-new snapshot from the same sources
/// and publishes it with a single atomic swap — the live namespace is never
/// mutated in place, so a reader can never observe a partially merged or
/// partially expanded state. When a reload fails the previous snapshot stays
/// published.
#[derive(Debug)]
pub struct ConfigHandle {
    loader: Loader,
    current: ArcSwap<PropertyStore>,
}

impl ConfigHandle {
    /// Perform the initial load and publish the first snapshot.
    ///
    /// # Errors
    ///
    /// Propagates any failure from [`Loader::load`].
    pub fn new(loader: Loader) -> StrataResult<Self> {
        let store = loader.load()?;
        Ok(Self {
            loader,
            current: ArcSwap::from_pointee(store),
        })
    }

    /// The currently published snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<PropertyStore> {
        self.current.load_full()
    }

    /// Rebuild from the configured sources and atomically publish the result.
    ///
    /// # Errors
    ///
    /// Propagates any failure from [`Loader::load`]; the previously published
    /// snapshot remains current.
    pub fn reload(&self) -> StrataResult<()> {
        let store = self.loader.load()?;
        self.current.store(Arc::new(store));
        Ok(())
    }
}
