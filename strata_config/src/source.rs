//! The source abstraction: anything that can produce a document tree.

use crate::descriptor::SourceOptions;
use crate::error::StrataResult;
use crate::value::Value;

pub mod env;
pub mod file;

/// A configuration source resolved from a descriptor scheme.
///
/// Sources are driven in two phases. [`ConfigSource::init`] performs
/// side-effecting setup from the descriptor options — snapshotting the
/// process environment, locating a file on disk — and
/// [`ConfigSource::load`] then produces the document tree. The engine calls
/// the phases strictly in that order, once each, on a fresh instance per
/// descriptor.
///
/// Implement this trait and register a factory with
/// [`SourceRegistry`](crate::SourceRegistry) to plug in additional schemes
/// such as remote key-value stores.
pub trait ConfigSource: std::fmt::Debug {
    /// Scheme name this source serves, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Apply descriptor options and perform side-effecting setup.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError`](crate::StrataError) when the options are
    /// invalid or the setup I/O fails; this aborts the whole load sequence.
    fn init(&mut self, options: &SourceOptions) -> StrataResult<()>;

    /// Produce the document tree.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError`](crate::StrataError) on I/O or parse failure;
    /// this aborts the whole load sequence.
    fn load(&self) -> StrataResult<Value>;
}
