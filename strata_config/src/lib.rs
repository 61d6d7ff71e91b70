//! A layered configuration resolution engine.
//!
//! `strata_config` ingests configuration fragments from heterogeneous
//! sources, reconciles them into one flat namespace with deterministic
//! override semantics, resolves `${a.b.c}` placeholder references between
//! keys, and exposes the result through a typed, read-only
//! [`PropertyStore`].
//!
//! Sources are described by URI-like descriptor strings
//! (`env://prefix=APP`, `file://name=app;type=toml;path=.,/etc/app`) and
//! resolved through an extensible [`SourceRegistry`]. Descriptor order is
//! override order: the last-added source wins on key collision.
//!
//! The engine is load-once, read-many. A built store is an immutable
//! snapshot safe for unsynchronised concurrent reads; [`ConfigHandle`]
//! republishes a fresh snapshot with an atomic swap when a reload is
//! requested.
//!
//! ```rust
//! use strata_config::{PropertyStore, Value, expand, flatten};
//!
//! let tree = Value::from_entries([
//!     ("alpha", Value::from_entries([("ip", Value::from("10.0.0.1"))])),
//!     ("beta", Value::from_entries([("ip", Value::from("${alpha.ip}"))])),
//! ]);
//! let store = PropertyStore::new(expand(flatten(&tree)));
//! assert_eq!(store.get_string("beta.ip"), "10.0.0.1");
//! ```

mod descriptor;
mod error;
mod expand;
mod flatten;
mod merge;
mod registry;
mod snapshot;
pub mod source;
mod store;
mod value;

pub use descriptor::{SourceDescriptor, SourceOptions};
pub use error::{StrataError, StrataResult};
pub use expand::expand;
pub use flatten::{FlatNamespace, flatten};
pub use merge::{merge, merge_layers};
pub use registry::SourceRegistry;
pub use snapshot::{ConfigHandle, Loader};
pub use source::ConfigSource;
pub use store::PropertyStore;
pub use value::Value;
