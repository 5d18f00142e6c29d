//! Bulletin Storage Library
//!
//! Blob store abstraction and the local filesystem implementation.
//!
//! # Storage keys
//!
//! Keys are flat filenames inside the store root (e.g. `{uuid}.png`). Keys
//! must not contain `..` or a leading `/`; backends reject anything that
//! would resolve outside the store root.

pub mod local;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{BlobStore, StorageError, StorageResult};
