use super::{Compression, FsRegistry, FsRegistryInner};
use crate::error::{RegistryError, RegistryErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
struct FsRegistryConfig {
    compression: Compression,
    create: bool,
}

impl Default for FsRegistryConfig {
    fn default() -> Self {
        Self { compression: Compression::None, create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct FsRegistryBuilder<S: Sealed = NoRoot> {
    state: S,
    config: FsRegistryConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> FsRegistryBuilder<S> {
    #[must_use = "Sets node compression for the registry"]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    #[must_use = "Sets whether the registry root should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> FsRegistryBuilder<N> {
        FsRegistryBuilder { state, config: self.config }
    }
}

impl FsRegistryBuilder<NoRoot> {
    #[must_use = "Creates a new registry builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory of the registry tree"]
    pub fn root(self, path: impl Into<PathBuf>) -> FsRegistryBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl FsRegistryBuilder<WithRoot> {
    /// Opens the registry tree.
    ///
    /// Creates the root when `create(true)` was set, canonicalizes it, then purges
    /// node writes left behind by an interrupted process. Cleanup failures are
    /// logged and do not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the root does not exist and `create` is
    /// false, or if it cannot be created or resolved.
    pub async fn connect(self) -> Result<FsRegistry, RegistryError> {
        let root = &self.state.0;

        if self.config.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap registry root: {}", root.display()))?;
            info!(path = %root.display(), "Bootstrapped registry root directory");
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve registry root: {}", root.display()))?;

        let registry = FsRegistry {
            inner: Arc::new(FsRegistryInner {
                root: canonical,
                compression: self.config.compression,
                tmp_counter: AtomicU64::new(1),
            }),
        };

        registry.purge_tmp().await;

        Ok(registry)
    }
}
