use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumString};

/// Top-level fabric settings shared across the provisioning crates.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FabricSettingsInner {
    pub registry: RegistrySettings,
    pub fleet: FleetSettings,
    pub session: SessionSettings,
    pub orchestration: OrchestrationSettings,
    pub log: LogSettings,
}

/// Thin Arc-wrapped settings for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct FabricSettings {
    #[serde(flatten, default)]
    inner: Arc<FabricSettingsInner>,
}

impl Deref for FabricSettings {
    type Target = FabricSettingsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for FabricSettings {
    fn deref_mut(&mut self) -> &mut FabricSettingsInner {
        Arc::make_mut(&mut self.inner)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RegistryBackend {
    #[default]
    Memory,
    Fs,
}

/// Where the registry tree lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub backend: RegistryBackend,
    pub root: PathBuf,
    pub compression: bool,
}

/// Fleet-wide defaults and the credentials accepted by the local fleet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FleetSettings {
    pub default_version: String,
    pub current_container: String,
    pub provider: String,
    pub management_username: Option<String>,
    pub management_password: Option<String>,
}

/// Bounds of the in-process session credential cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub capacity: u64,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrchestrationSettings {
    pub operation_timeout_secs: u64,
    pub parallelism: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub path: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for RegistrySettings {
    fn default() -> Self {
        Self { backend: RegistryBackend::Memory, root: PathBuf::from("registry"), compression: false }
    }
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            default_version: crate::FALLBACK_VERSION.to_owned(),
            current_container: "root".to_owned(),
            provider: "child".to_owned(),
            management_username: None,
            management_password: None,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { capacity: 1_000, idle_timeout_secs: 3600 }
    }
}

impl Default for OrchestrationSettings {
    fn default() -> Self {
        Self { operation_timeout_secs: 30, parallelism: 1 }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".to_owned(), path: None, json: false }
    }
}
