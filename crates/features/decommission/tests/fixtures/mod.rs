use async_trait::async_trait;
use mqf_domain::{ContainerCreationRequest, ContainerMetadata};
use mqf_kernel::ports::{FleetClient, FleetError};
use mqf_registry::{MemoryRegistry, Registry, RegistryError};
use std::sync::Mutex;
use std::time::Duration;

/// Memory registry with injected delete faults.
#[derive(Debug, Default)]
pub struct FaultyRegistry {
    pub inner: MemoryRegistry,
    /// Deletes of these paths fail.
    pub fail_delete: Vec<String>,
    /// Deletes of these paths report success but leave the node in place.
    pub sticky: Vec<String>,
}

#[async_trait]
impl Registry for FaultyRegistry {
    async fn exists(&self, path: &str) -> Result<bool, RegistryError> {
        self.inner.exists(path).await
    }

    async fn read(&self, path: &str) -> Result<Option<String>, RegistryError> {
        self.inner.read(path).await
    }

    async fn write(&self, path: &str, value: &str) -> Result<(), RegistryError> {
        self.inner.write(path, value).await
    }

    async fn delete(&self, path: &str) -> Result<bool, RegistryError> {
        if self.fail_delete.iter().any(|p| p == path) {
            return Err(RegistryError::Unavailable {
                message: "connection reset".into(),
                context: Some(path.to_owned().into()),
            });
        }
        if self.sticky.iter().any(|p| p == path) {
            return Ok(true);
        }
        self.inner.delete(path).await
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, RegistryError> {
        self.inner.children(path).await
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub enum StopOutcome {
    #[default]
    Stopped,
    NotFound,
    Fails,
    Stalls,
}

/// Fleet fake that only knows how to stop.
#[derive(Debug, Default)]
pub struct StopFleet {
    pub outcome: StopOutcome,
    stopped: Mutex<Vec<String>>,
}

impl StopFleet {
    pub fn new(outcome: StopOutcome) -> Self {
        Self { outcome, stopped: Mutex::default() }
    }

    pub fn stop_calls(&self) -> Vec<String> {
        self.stopped.lock().unwrap().clone()
    }
}

#[async_trait]
impl FleetClient for StopFleet {
    async fn create_containers(
        &self,
        _request: &ContainerCreationRequest,
    ) -> Result<Vec<ContainerMetadata>, FleetError> {
        Err(FleetError::creation("not supported by this fake"))
    }

    async fn stop_and_remove(&self, container_id: &str) -> Result<(), FleetError> {
        self.stopped.lock().unwrap().push(container_id.to_owned());
        match self.outcome {
            StopOutcome::Stopped => Ok(()),
            StopOutcome::NotFound => Err(FleetError::not_found(container_id.to_owned())),
            StopOutcome::Fails => Err(FleetError::creation("agent unreachable")),
            StopOutcome::Stalls => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            },
        }
    }

    fn current_container_name(&self) -> String {
        "root".to_owned()
    }
}

/// Writes every binding of `id` the way a provisioned container has them.
pub async fn seed_container(registry: &dyn Registry, id: &str, versions: &[&str]) {
    for version in versions {
        registry
            .write(&format!("/fabric/configs/versions/{version}/containers/{id}"), "mq-east")
            .await
            .unwrap();
    }
    registry.write(&format!("/fabric/registry/containers/config/{id}"), "{}").await.unwrap();
    registry.write(&format!("/fabric/registry/containers/domains/{id}"), "").await.unwrap();
    registry.write(&format!("/fabric/registry/containers/domains/{id}/org.apache.activemq"), "")
        .await
        .unwrap();
    registry.write(&format!("/fabric/registry/containers/provision/{id}"), "created").await.unwrap();
    registry.write(&format!("/fabric/configs/containers/{id}"), versions[0]).await.unwrap();
}
