//! A hierarchical key/value registry shared by every member of the fabric.
//!
//! Nodes are addressed by absolute `/`-separated paths. Writing a node creates
//! its missing ancestors; deleting a node removes its whole sub-tree and is
//! idempotent (it reports whether anything was there).
//!
//! # Backends
//!
//! - **[`MemoryRegistry`]**: an in-process tree guarded by a `parking_lot` lock.
//! - **[`FsRegistry`]**: a sandboxed directory tree with atomic node writes,
//!   optional LZ4 compression and cleanup of interrupted writes on open.
//!
//! Both are consumed through the [`Registry`] trait, usually as `Arc<dyn Registry>`.
//!
//! ```rust
//! use mqf_registry::{MemoryRegistry, Registry, RegistryError};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), RegistryError> {
//! let registry = MemoryRegistry::new();
//! registry.write("/fabric/configs/versions/1.0/containers/c1", "default").await?;
//! assert_eq!(registry.children("/fabric/configs/versions").await?, vec!["1.0".to_owned()]);
//! assert!(registry.delete("/fabric/configs/versions/1.0").await?);
//! assert!(!registry.exists("/fabric/configs/versions/1.0/containers/c1").await?);
//! # Ok(())
//! # }
//! ```

mod error;
mod fs;
mod memory;
mod path;

pub use error::{RegistryError, RegistryErrorExt};
pub use fs::{Compression, FsRegistry, FsRegistryBuilder};
pub use memory::MemoryRegistry;

use async_trait::async_trait;
use std::fmt::Debug;

/// Hierarchical registry client.
#[async_trait]
pub trait Registry: Debug + Send + Sync {
    /// Whether a node exists at `path` (explicitly written or an implicit ancestor).
    async fn exists(&self, path: &str) -> Result<bool, RegistryError>;

    /// Node data; `None` when the node is absent.
    async fn read(&self, path: &str) -> Result<Option<String>, RegistryError>;

    /// Creates or replaces the node data.
    async fn write(&self, path: &str, value: &str) -> Result<(), RegistryError>;

    /// Removes the node and its sub-tree. Returns `false` when nothing was there.
    async fn delete(&self, path: &str) -> Result<bool, RegistryError>;

    /// Names of the direct children of `path`, sorted. Empty when the node is absent.
    async fn children(&self, path: &str) -> Result<Vec<String>, RegistryError>;
}
