use crate::builder::ContainerRequestBuilder;
use crate::credentials::CredentialResolver;
use crate::error::ProvisioningError;
use crate::provider::ProviderCatalog;
use mqf_domain::{
    ConfigModel, ContainerCreationRequest, ErrorKind, Failure, ProfileHandle, ProvisioningResult,
    RegistryPath, is_valid_id,
};
use mqf_kernel::ports::{FleetClient, Prompt};
use mqf_profile::ProfileManager;
use mqf_registry::Registry;
use mqf_session::SessionCredentialStore;
use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

type Outcome = Result<Vec<String>, ProvisioningError>;

#[derive(Debug)]
pub struct ProvisioningOrchestratorInner {
    profiles: ProfileManager,
    registry: Arc<dyn Registry>,
    fleet: Arc<dyn FleetClient>,
    session: Arc<dyn SessionCredentialStore>,
    prompt: Arc<dyn Prompt>,
    requests: ContainerRequestBuilder,
    timeout: Duration,
    parallelism: usize,
}

/// Runs the profile, assign and create phases for one [`ConfigModel`].
///
/// Cheap to clone; clones share collaborators.
#[derive(Debug, Clone)]
pub struct ProvisioningOrchestrator {
    inner: Arc<ProvisioningOrchestratorInner>,
}

impl Deref for ProvisioningOrchestrator {
    type Target = ProvisioningOrchestratorInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl ProvisioningOrchestrator {
    pub fn builder() -> ProvisioningOrchestratorBuilder {
        ProvisioningOrchestratorBuilder::default()
    }

    /// Ensures the profile, binds it to `cfg.assign_targets()` and creates
    /// `cfg.create_targets()`.
    ///
    /// Phases run strictly in that order. Assign and create failures are
    /// collected per target in the result and never stop the remaining targets.
    ///
    /// # Errors
    /// Returns [`ProvisioningError::InvalidConfig`] for malformed directives
    /// (before any side effect) and any error of the profile phase.
    #[instrument(skip(self, cfg), fields(broker = cfg.broker_name()))]
    pub async fn run(&self, cfg: &ConfigModel) -> Result<ProvisioningResult, ProvisioningError> {
        self.validate(cfg)?;

        let profile = self.bounded("profile update", self.profiles.create_or_update(cfg)).await?;
        info!(profile = %profile, "Profile ready");

        let mut result = ProvisioningResult::new(profile.id.clone());

        for target in cfg.assign_targets() {
            match self.assign(&profile, target).await {
                Ok(()) => result.created.push(target.clone()),
                Err(e) => {
                    warn!(container = %target, error = %e, "Profile assignment failed");
                    result.failures.push(Failure::new(target, e.kind(), e.to_string()));
                },
            }
        }

        if let Some(targets) = cfg.create_targets() {
            let requests = self.requests.build(cfg, &profile, targets)?;
            let resolver = Arc::new(CredentialResolver::new(
                cfg,
                self.fleet.current_container_name(),
                Arc::clone(&self.session),
                Arc::clone(&self.prompt),
            ));

            for (target, outcome) in self.create_all(requests, resolver).await {
                match outcome {
                    Ok(ids) => result.created.extend(ids),
                    Err(e) => {
                        warn!(container = %target, error = %e, "Container creation failed");
                        result.failures.push(Failure::new(target, e.kind(), e.to_string()));
                    },
                }
            }
        }

        info!(
            created = result.created.len(),
            failed = result.failures.len(),
            "Provisioning finished"
        );
        Ok(result)
    }

    fn validate(&self, cfg: &ConfigModel) -> Result<(), ProvisioningError> {
        if let Some(targets) = cfg.create_targets() {
            self.requests.validate(targets)?;
        }
        if let Some(bad) = cfg.assign_targets().iter().find(|t| !is_valid_id(t)) {
            return Err(ProvisioningError::invalid(format!("Invalid container name '{bad}'")));
        }
        Ok(())
    }

    /// Appends the profile to the container's binding in the version it runs.
    async fn assign(&self, profile: &ProfileHandle, container: &str) -> Result<(), ProvisioningError> {
        let pointer = RegistryPath::version_pointer(container).render();
        let version = self
            .bounded(container, self.registry.read(&pointer))
            .await?
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ProvisioningError::not_found(format!("Container '{container}' does not exist"))
            })?;

        let binding = RegistryPath::version_binding(&version, container).render();
        let current = self.bounded(container, self.registry.read(&binding)).await?.unwrap_or_default();
        let mut profiles: Vec<&str> = current.split_whitespace().collect();
        if profiles.contains(&profile.id.as_str()) {
            debug!(container, profile = %profile.id, "Profile already assigned");
            return Ok(());
        }
        profiles.push(&profile.id);

        self.bounded(container, self.registry.write(&binding, &profiles.join(" "))).await?;
        info!(container, %version, profile = %profile.id, "Profile assigned");
        Ok(())
    }

    /// Dispatches every request, keeping input order in the returned outcomes.
    async fn create_all(
        &self,
        requests: Vec<ContainerCreationRequest>,
        resolver: Arc<CredentialResolver>,
    ) -> Vec<(String, Outcome)> {
        if self.parallelism <= 1 {
            let mut outcomes = Vec::with_capacity(requests.len());
            for request in requests {
                let name = request.name().to_owned();
                let outcome = self.dispatch(request, &resolver).await;
                outcomes.push((name, outcome));
            }
            return outcomes;
        }

        let names: Vec<String> = requests.iter().map(|r| r.name().to_owned()).collect();
        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let mut tasks = JoinSet::new();

        for (index, request) in requests.into_iter().enumerate() {
            let this = self.clone();
            let resolver = Arc::clone(&resolver);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => this.dispatch(request, &resolver).await,
                    Err(_) => Err(ProvisioningError::from("Creation semaphore closed")),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<Outcome>> = names.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(outcome);
                    }
                },
                Err(e) => error!(error = %e, "Creation task aborted"),
            }
        }

        names
            .into_iter()
            .zip(slots)
            .map(|(name, slot)| {
                let outcome =
                    slot.unwrap_or_else(|| Err(ProvisioningError::from("Creation task aborted")));
                (name, outcome)
            })
            .collect()
    }

    /// One creation with at most one credential retry.
    async fn dispatch(
        &self,
        mut request: ContainerCreationRequest,
        resolver: &CredentialResolver,
    ) -> Outcome {
        if request.supports_credential_retry() {
            if let Some(creds) = resolver.current().await? {
                request = request.with_credentials(creds);
            }
        }

        match self.attempt(&request).await {
            Ok(ids) => {
                if let Some(creds) = request.credentials() {
                    resolver.persist(creds).await;
                }
                Ok(ids)
            },
            Err(e)
                if e.kind() == ErrorKind::AuthenticationFailure
                    && request.supports_credential_retry() =>
            {
                warn!(container = request.name(), "Authentication failed, retrying with fresh credentials");
                let retry = request.with_credentials(resolver.acquire().await?);
                let ids = self.attempt(&retry).await?;
                if let Some(creds) = retry.credentials() {
                    resolver.persist(creds).await;
                }
                Ok(ids)
            },
            Err(e) => Err(e),
        }
    }

    async fn attempt(&self, request: &ContainerCreationRequest) -> Outcome {
        debug!(container = request.name(), scheme = request.scheme(), "Creating container");
        let metadata =
            self.bounded(request.name(), self.fleet.create_containers(request)).await?;

        if let Some(failed) = metadata.iter().find(|m| !m.is_success()) {
            return Err(ProvisioningError::Creation {
                message: format!(
                    "{}: {}",
                    failed.id,
                    failed.failure.as_deref().unwrap_or("unknown failure")
                )
                .into(),
                context: None,
            });
        }
        Ok(metadata.into_iter().map(|m| m.id).collect())
    }

    /// Runs `fut` under the configured operation timeout.
    async fn bounded<T, E>(
        &self,
        target: &str,
        fut: impl Future<Output = Result<T, E>>,
    ) -> Result<T, ProvisioningError>
    where
        ProvisioningError: From<E>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(ProvisioningError::timeout(format!(
                "{target}: no reply within {}s",
                self.timeout.as_secs_f32()
            ))),
        }
    }
}

/// A fluent builder for [`ProvisioningOrchestrator`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Default)]
pub struct ProvisioningOrchestratorBuilder {
    profiles: Option<ProfileManager>,
    registry: Option<Arc<dyn Registry>>,
    fleet: Option<Arc<dyn FleetClient>>,
    session: Option<Arc<dyn SessionCredentialStore>>,
    prompt: Option<Arc<dyn Prompt>>,
    requests: Option<ContainerRequestBuilder>,
    timeout: Option<Duration>,
    parallelism: usize,
}

impl fmt::Debug for ProvisioningOrchestratorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisioningOrchestratorBuilder")
            .field("timeout", &self.timeout)
            .field("parallelism", &self.parallelism)
            .finish_non_exhaustive()
    }
}

impl ProvisioningOrchestratorBuilder {
    pub fn profiles(mut self, profiles: ProfileManager) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn fleet(mut self, fleet: Arc<dyn FleetClient>) -> Self {
        self.fleet = Some(fleet);
        self
    }

    pub fn session(mut self, session: Arc<dyn SessionCredentialStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn prompt(mut self, prompt: Arc<dyn Prompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Defaults to child containers of the fleet's current container.
    pub fn requests(mut self, requests: ContainerRequestBuilder) -> Self {
        self.requests = Some(requests);
        self
    }

    /// Upper bound for each collaborator call.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Concurrent creations; `0` and `1` both mean sequential.
    pub const fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// # Errors
    /// Returns [`ProvisioningError::Internal`] when a collaborator is missing.
    pub fn build(self) -> Result<ProvisioningOrchestrator, ProvisioningError> {
        let fleet = self.fleet.ok_or("Fleet client not configured")?;
        let requests = self.requests.unwrap_or_else(|| {
            ContainerRequestBuilder::new(ProviderCatalog::with_child(fleet.current_container_name()))
        });
        let inner = ProvisioningOrchestratorInner {
            profiles: self.profiles.ok_or("Profile manager not configured")?,
            registry: self.registry.ok_or("Registry not configured")?,
            session: self.session.ok_or("Session store not configured")?,
            prompt: self.prompt.ok_or("Prompt not configured")?,
            fleet,
            requests,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            parallelism: self.parallelism.max(1),
        };
        Ok(ProvisioningOrchestrator { inner: Arc::new(inner) })
    }
}
