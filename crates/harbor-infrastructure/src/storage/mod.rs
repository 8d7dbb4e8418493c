//! Storage primitives shared by the file-backed adapters.

pub mod atomic_toml;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
