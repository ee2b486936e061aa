//! Filesystem-backed registry.
//!
//! Every node is a directory under the sandbox root; its data lives in a
//! `.data` file inside that directory, so a node's children are exactly its
//! sub-directories. Node writes use the atomic swap pattern (unique temp file,
//! `fsync`, `rename`).

mod builder;
mod maintenance;
mod security;

pub use builder::FsRegistryBuilder;

use crate::Registry;
use crate::error::{RegistryError, RegistryErrorExt};
use crate::path;
use async_trait::async_trait;
use std::borrow::Cow;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const DATA_FILE: &str = ".data";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    #[must_use]
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>, RegistryError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

/// The internal shared state of a [`FsRegistry`] instance.
#[derive(Debug)]
pub struct FsRegistryInner {
    /// Canonicalized physical root of the tree.
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    /// Used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to a registry tree persisted on disk.
///
/// Internally reference-counted; clone it freely across tasks.
///
/// # Example
///
/// ```rust
/// use mqf_registry::{Compression, FsRegistry, Registry, RegistryError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), RegistryError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let registry = FsRegistry::builder()
///         .root(tmp.path().join("registry"))
///         .compression(Compression::Lz4)
///         .connect()
///         .await?;
///
///     registry.write("/fabric/configs/default-version", "1.0").await?;
///     assert_eq!(
///         registry.read("/fabric/configs/default-version").await?.as_deref(),
///         Some("1.0")
///     );
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FsRegistry {
    pub(crate) inner: Arc<FsRegistryInner>,
}

impl Deref for FsRegistry {
    type Target = FsRegistryInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FsRegistry {
    #[must_use = "The registry is not opened until you call .connect()"]
    pub fn builder() -> FsRegistryBuilder {
        FsRegistryBuilder::new()
    }

    /// Physical directory backing the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPath`] for malformed paths and
    /// [`RegistryError::PathTraversalAttempt`] if the directory escapes the sandbox.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, RegistryError> {
        let segments = path::segments(path)?;
        security::node_dir(&self.root, &segments)
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    /// Fails with [`RegistryError::Unavailable`] once the sandbox root is gone,
    /// instead of silently recreating an empty tree.
    async fn ensure_available(&self) -> Result<(), RegistryError> {
        let unavailable = |message: Cow<'static, str>| RegistryError::Unavailable {
            message,
            context: Some(self.root.display().to_string().into()),
        };
        match fs::try_exists(&self.root).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(unavailable("Registry root is missing".into())),
            Err(err) => Err(unavailable(err.to_string().into())),
        }
    }

    async fn write_atomic(&self, dir: &Path, data: &[u8]) -> Result<(), RegistryError> {
        let target = dir.join(DATA_FILE);
        let counter = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let temp = dir.join(format!("{DATA_FILE}{}{counter}", maintenance::TMP_MARKER));

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&self.compression.compress(data)).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &target).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&target)
                    .await
                    .context(format!("Failed to replace node data: {}", target.display()))?;
                fs::rename(&temp, &target).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    target.display()
                ))?;
            } else {
                if let Err(cleanup) = fs::remove_file(&temp).await {
                    tracing::warn!(path = %temp.display(), error = %cleanup, "Temp cleanup failed");
                }
                return Err(RegistryError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), target.display())
                            .into(),
                    ),
                });
            }
        }

        sync_dir(dir).await;
        Ok(())
    }
}

#[async_trait]
impl Registry for FsRegistry {
    async fn exists(&self, path: &str) -> Result<bool, RegistryError> {
        let dir = self.resolve(path)?;
        self.ensure_available().await?;
        fs::try_exists(&dir).await.context(format!("Existence check failed: {path}"))
    }

    async fn read(&self, path: &str) -> Result<Option<String>, RegistryError> {
        let dir = self.resolve(path)?;
        self.ensure_available().await?;
        let data = match fs::read(dir.join(DATA_FILE)).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                // Implicit ancestors carry no data file.
                return if fs::try_exists(&dir).await.context("Node lookup failed")? {
                    Ok(Some(String::new()))
                } else {
                    Ok(None)
                };
            },
            Err(err) => {
                return Err(RegistryError::Io {
                    source: err,
                    context: Some(format!("Read failed: {path}").into()),
                });
            },
        };

        let raw = self.compression.decompress(data)?;
        let value = String::from_utf8(raw).context(format!("Node {path}"))?;
        debug!(path, "Registry node read");
        Ok(Some(value))
    }

    async fn write(&self, path: &str, value: &str) -> Result<(), RegistryError> {
        if path::segments(path)?.is_empty() {
            return Err(RegistryError::InvalidPath {
                message: path.to_owned().into(),
                context: Some("The root node holds no data".into()),
            });
        }
        let dir = self.resolve(path)?;
        self.ensure_available().await?;
        fs::create_dir_all(&dir)
            .await
            .context(format!("Failed to create node: {}", dir.display()))?;
        self.write_atomic(&dir, value.as_bytes()).await?;

        debug!(path, "Registry node written atomically");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<bool, RegistryError> {
        if path::segments(path)?.is_empty() {
            return Err(RegistryError::InvalidPath {
                message: path.to_owned().into(),
                context: Some("The root node cannot be deleted".into()),
            });
        }
        let dir = self.resolve(path)?;
        self.ensure_available().await?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(path, "Registry sub-tree deleted");
                Ok(true)
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(RegistryError::Io {
                source: err,
                context: Some(format!("Failed to delete: {}", dir.display()).into()),
            }),
        }
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, RegistryError> {
        let dir = self.resolve(path)?;
        self.ensure_available().await?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(RegistryError::Io {
                    source: err,
                    context: Some(format!("Failed to list: {}", dir.display()).into()),
                });
            },
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.context("Directory walk failed")? {
            let is_dir = entry.file_type().await.context("File type lookup failed")?.is_dir();
            if let (true, Some(name)) = (is_dir, entry.file_name().to_str()) {
                names.push(name.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}
