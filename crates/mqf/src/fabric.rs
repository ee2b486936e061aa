use crate::error::{FabricError, FabricErrorExt};
use mqf_decommission::DecommissionOrchestrator;
use mqf_domain::config::{FabricSettings, RegistryBackend, RegistrySettings};
use mqf_domain::{ConfigModel, Credentials, DecommissionResult, ProvisioningResult, RegistryPath};
use mqf_kernel::ports::{FleetClient, Prompt};
use mqf_kernel::safe_nanoid;
use mqf_profile::{ProfileManager, RegistryProfileStore};
use mqf_provisioning::{
    ContainerProvider, ContainerRequestBuilder, LocalFleet, ProviderCatalog,
    ProvisioningOrchestrator,
};
use mqf_registry::{Compression, FsRegistry, MemoryRegistry, Registry};
use mqf_session::{SessionCache, SessionHandle};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[derive(Debug)]
pub struct FabricInner {
    settings: FabricSettings,
    registry: Arc<dyn Registry>,
    session: SessionHandle,
    profiles: ProfileManager,
    provisioning: ProvisioningOrchestrator,
    decommission: DecommissionOrchestrator,
}

/// One connected view of the fabric: a registry, a fleet and a credential session.
///
/// Cheap to clone; clones share the session.
#[derive(Debug, Clone)]
pub struct Fabric {
    inner: Arc<FabricInner>,
}

impl Deref for Fabric {
    type Target = FabricInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Fabric {
    pub fn builder() -> FabricBuilder {
        FabricBuilder::default()
    }

    #[must_use]
    pub fn settings(&self) -> &FabricSettings {
        &self.settings
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    /// Id of the credential session this handle uses.
    #[must_use]
    pub fn session_id(&self) -> &str {
        self.session.id()
    }

    /// Version used when a configuration names none.
    #[must_use]
    pub fn default_version(&self) -> &str {
        self.profiles.default_version()
    }

    /// Ensures the broker profile, then assigns and creates containers.
    ///
    /// # Errors
    /// Invalid directives and profile-phase failures; per-container failures are
    /// reported inside the [`ProvisioningResult`].
    pub async fn provision(&self, cfg: &ConfigModel) -> Result<ProvisioningResult, FabricError> {
        Ok(self.provisioning.run(cfg).await?)
    }

    /// Destroys `container_id` and removes its bindings in `versions`.
    ///
    /// # Errors
    /// Only for a blank or malformed id or version.
    pub async fn destroy<S: AsRef<str> + Sync>(
        &self,
        container_id: &str,
        versions: &[S],
    ) -> Result<DecommissionResult, FabricError> {
        Ok(self.decommission.destroy(container_id, versions).await?)
    }

    /// Like [`Fabric::destroy`], sweeping every version scope in the registry.
    ///
    /// # Errors
    /// As [`Fabric::destroy`], plus registry failures while listing versions.
    #[instrument(skip(self))]
    pub async fn destroy_everywhere(
        &self,
        container_id: &str,
    ) -> Result<DecommissionResult, FabricError> {
        let versions = self.decommission.known_versions().await?;
        debug!(?versions, "Sweeping version scopes");
        self.destroy(container_id, &versions).await
    }

    /// Creates a version scope, copying the profiles of `parent` when given.
    ///
    /// # Errors
    /// [`FabricError::Profile`] when the version exists, is malformed, or the
    /// parent is missing.
    pub async fn create_version(&self, version: &str, parent: Option<&str>) -> Result<(), FabricError> {
        Ok(self.profiles.create_version(version, parent).await?)
    }
}

/// A fluent builder for configuring and connecting a [`Fabric`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Default)]
pub struct FabricBuilder {
    settings: FabricSettings,
    registry: Option<Arc<dyn Registry>>,
    fleet: Option<Arc<dyn FleetClient>>,
    prompt: Option<Arc<dyn Prompt>>,
    sessions: Option<SessionCache>,
    session_id: Option<String>,
    providers: Vec<Arc<dyn ContainerProvider>>,
}

impl fmt::Debug for FabricBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FabricBuilder")
            .field("settings", &self.settings)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl FabricBuilder {
    pub fn settings(mut self, settings: FabricSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Uses `registry` instead of opening the configured backend.
    pub fn registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Uses `fleet` instead of the local fleet.
    pub fn fleet(mut self, fleet: Arc<dyn FleetClient>) -> Self {
        self.fleet = Some(fleet);
        self
    }

    pub fn prompt(mut self, prompt: Arc<dyn Prompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Shares a session cache between several fabrics.
    pub fn sessions(mut self, sessions: SessionCache) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Joins an existing credential session; a fresh id is generated otherwise.
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Registers an additional container provider.
    pub fn provider(mut self, provider: impl ContainerProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Opens the registry and wires every slice.
    ///
    /// The default version is the registry's `/fabric/configs/default-version`
    /// when set, the configured `fleet.default_version` otherwise.
    ///
    /// # Errors
    /// Returns [`FabricError::InvalidConfig`] without a prompt, and
    /// [`FabricError::Registry`] when the registry cannot be opened.
    pub async fn build(self) -> Result<Fabric, FabricError> {
        let settings = self.settings;
        let prompt = self.prompt.ok_or_else(|| FabricError::InvalidConfig {
            message: "No interactive prompt configured".into(),
            context: None,
        })?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => open_registry(&settings.registry).await?,
        };

        let sessions = self.sessions.unwrap_or_else(|| {
            SessionCache::builder()
                .capacity(settings.session.capacity)
                .idle_timeout(Duration::from_secs(settings.session.idle_timeout_secs))
                .build()
        });
        let session = sessions.open(self.session_id.unwrap_or_else(|| safe_nanoid!()));

        let fleet: Arc<dyn FleetClient> = match self.fleet {
            Some(fleet) => fleet,
            None => Arc::new(
                LocalFleet::new(Arc::clone(&registry), settings.fleet.current_container.clone())
                    .management_credentials(management_credentials(&settings)),
            ),
        };

        let default_version = registry
            .read(&RegistryPath::DefaultVersion.render())
            .await
            .context("Reading default version")?
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| settings.fleet.default_version.clone());

        let store = Arc::new(RegistryProfileStore::new(Arc::clone(&registry)));
        let profiles = ProfileManager::new(store, default_version);

        let catalog = self.providers.into_iter().fold(
            ProviderCatalog::with_child(fleet.current_container_name()),
            ProviderCatalog::register_shared,
        );
        let timeout = Duration::from_secs(settings.orchestration.operation_timeout_secs);

        let provisioning = ProvisioningOrchestrator::builder()
            .profiles(profiles.clone())
            .registry(Arc::clone(&registry))
            .fleet(Arc::clone(&fleet))
            .session(Arc::new(session.clone()))
            .prompt(prompt)
            .requests(ContainerRequestBuilder::new(catalog).scheme(settings.fleet.provider.clone()))
            .timeout(timeout)
            .parallelism(settings.orchestration.parallelism)
            .build()?;

        let decommission =
            DecommissionOrchestrator::new(Arc::clone(&registry), fleet).timeout(timeout);

        info!(
            session = session.id(),
            version = profiles.default_version(),
            provider = %settings.fleet.provider,
            "Fabric connected"
        );

        Ok(Fabric {
            inner: Arc::new(FabricInner {
                settings,
                registry,
                session,
                profiles,
                provisioning,
                decommission,
            }),
        })
    }
}

async fn open_registry(settings: &RegistrySettings) -> Result<Arc<dyn Registry>, FabricError> {
    match settings.backend {
        RegistryBackend::Memory => Ok(Arc::new(MemoryRegistry::new())),
        RegistryBackend::Fs => {
            let compression =
                if settings.compression { Compression::Lz4 } else { Compression::None };
            let registry = FsRegistry::builder()
                .root(&settings.root)
                .compression(compression)
                .connect()
                .await
                .context(format!("Opening registry at {}", settings.root.display()))?;
            Ok(Arc::new(registry))
        },
    }
}

fn management_credentials(settings: &FabricSettings) -> Option<Credentials> {
    match (&settings.fleet.management_username, &settings.fleet.management_password) {
        (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
        _ => None,
    }
}
