use crate::error::{DecommissionError, DecommissionErrorExt};
use mqf_domain::paths::VERSIONS_ROOT;
use mqf_domain::{DecommissionResult, ErrorKind, Failure, RegistryPath, is_valid_id};
use mqf_kernel::ports::FleetClient;
use mqf_registry::Registry;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Destroys containers and removes every registry binding that names them.
#[derive(Debug, Clone)]
pub struct DecommissionOrchestrator {
    registry: Arc<dyn Registry>,
    fleet: Arc<dyn FleetClient>,
    timeout: Duration,
}

impl DecommissionOrchestrator {
    pub fn new(registry: Arc<dyn Registry>, fleet: Arc<dyn FleetClient>) -> Self {
        Self { registry, fleet, timeout: DEFAULT_TIMEOUT }
    }

    /// Upper bound for the stop call and for each registry call.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Every version scope present in the registry.
    ///
    /// # Errors
    /// Returns [`DecommissionError::Registry`] when the version root cannot be listed.
    pub async fn known_versions(&self) -> Result<Vec<String>, DecommissionError> {
        self.registry.children(VERSIONS_ROOT).await.context("Listing version scopes")
    }

    /// Stops `container_id` and deletes its bindings in `versions` plus the
    /// container record, domain memberships, provisioning state and version pointer.
    ///
    /// The stop outcome never prevents the sweep. Each deletion is independent;
    /// an absent entry counts as removed. A final pass re-checks every path and
    /// reports any that still exist.
    ///
    /// # Errors
    /// Returns [`DecommissionError::InvalidConfig`] for a blank or malformed id,
    /// before any side effect.
    #[instrument(skip(self, versions))]
    pub async fn destroy<S: AsRef<str> + Sync>(
        &self,
        container_id: &str,
        versions: &[S],
    ) -> Result<DecommissionResult, DecommissionError> {
        let id = container_id.trim();
        if id.is_empty() {
            return Err(DecommissionError::invalid("Container id must not be blank"));
        }
        if !is_valid_id(id) {
            return Err(DecommissionError::invalid(format!("Invalid container id '{id}'")));
        }
        if let Some(bad) = versions.iter().map(AsRef::as_ref).find(|v| !is_valid_id(v)) {
            return Err(DecommissionError::invalid(format!("Invalid version '{bad}'")));
        }

        let mut result = DecommissionResult::new(id);

        match self.bounded(id, self.fleet.stop_and_remove(id)).await {
            Ok(()) => info!(container = id, "Container stopped"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(container = id, "Container was not running");
            },
            Err(e) => {
                warn!(container = id, error = %e, "Stopping container failed, sweeping registry anyway");
                result.stop_failure = Some(Failure::new(id, e.kind(), e.to_string()));
            },
        }

        let paths: Vec<String> =
            RegistryPath::container_bindings(id, versions).iter().map(RegistryPath::render).collect();
        let mut failed = BTreeSet::new();

        for path in &paths {
            match self.bounded(path, self.registry.delete(path)).await {
                Ok(true) => {
                    debug!(%path, "Removed");
                    result.removed_paths.push(path.clone());
                },
                Ok(false) => debug!(%path, "Already absent"),
                Err(e) => {
                    warn!(%path, error = %e, "Delete failed");
                    result.failures.push(Failure::new(path, e.kind(), e.to_string()));
                    failed.insert(path.as_str());
                },
            }
        }

        for path in paths.iter().filter(|p| !failed.contains(p.as_str())) {
            match self.bounded(path, self.registry.exists(path)).await {
                Ok(false) => {},
                Ok(true) => {
                    warn!(%path, "Still present after delete");
                    result.failures.push(Failure::new(
                        path,
                        ErrorKind::RegistryWriteError,
                        "entry still present after delete",
                    ));
                },
                Err(e) => result.failures.push(Failure::new(path, e.kind(), e.to_string())),
            }
        }

        info!(
            container = id,
            removed = result.removed_paths.len(),
            failed = result.failures.len(),
            "Decommission finished"
        );
        Ok(result)
    }

    async fn bounded<T, E>(
        &self,
        target: &str,
        fut: impl Future<Output = Result<T, E>>,
    ) -> Result<T, DecommissionError>
    where
        DecommissionError: From<E>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(DecommissionError::Timeout {
                message: format!("{target}: no reply within {}s", self.timeout.as_secs_f32()).into(),
                context: None,
            }),
        }
    }
}
