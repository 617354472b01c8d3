//! pose-registry: catalog of named pose presets
//!
//! Presets are keyed by a normalized form of their display name. Definitions are
//! loaded from pluggable async sources (local files, HTTP behind the `http` feature,
//! or an in-memory map behind `mock`) and a small built-in catalog seeds new registries.

mod registry;
pub use registry::{normalize_key, shared, PoseRegistry, SharedRegistry};

mod source;
pub use source::{decode_manifest, join_locator, FileSource, PoseSink, PoseSource};

mod loader;
pub use loader::{display_name_from_locator, load_from_source, load_many_from_source};

pub mod presets;

#[cfg(feature = "mock")]
mod memory;
#[cfg(feature = "mock")]
pub use memory::MemorySource;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::HttpSource;
