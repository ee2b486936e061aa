//! A fleet client that records containers in the registry instead of launching them.

use async_trait::async_trait;
use mqf_domain::{ContainerCreationRequest, ContainerMetadata, Credentials, RegistryPath, RequestVariant};
use mqf_kernel::ports::{FleetClient, FleetError};
use mqf_registry::{Registry, RegistryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub const STATE_CREATED: &str = "created";
pub const STATE_STOPPED: &str = "stopped";

/// Stored container record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub profiles: Vec<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_opts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_directory: Option<String>,
}

/// [`FleetClient`] writing every provisioning side effect straight into a [`Registry`].
///
/// When management credentials are configured, child requests must carry
/// exactly that pair or they are rejected as an authentication failure.
#[derive(Debug, Clone)]
pub struct LocalFleet {
    registry: Arc<dyn Registry>,
    current: String,
    management: Option<Credentials>,
}

impl LocalFleet {
    pub fn new(registry: Arc<dyn Registry>, current_container: impl Into<String>) -> Self {
        Self { registry, current: current_container.into(), management: None }
    }

    #[must_use]
    pub fn management_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.management = credentials;
        self
    }

    fn authorize(&self, request: &ContainerCreationRequest) -> Result<(), FleetError> {
        let RequestVariant::Child(child) = &request.variant else { return Ok(()) };
        match &self.management {
            None => Ok(()),
            Some(expected) if request.credentials() == Some(expected) => Ok(()),
            Some(_) => Err(FleetError::authentication(format!(
                "Management interface of '{}' rejected the credentials",
                child.parent
            ))),
        }
    }

    async fn write(&self, path: RegistryPath, value: &str) -> Result<(), FleetError> {
        let path = path.render();
        self.registry.write(&path, value).await.map_err(|e| unavailable(&path, &e))
    }

    async fn create_one(
        &self,
        id: String,
        request: &ContainerCreationRequest,
    ) -> Result<ContainerMetadata, FleetError> {
        let record_path = RegistryPath::container(&id).render();
        if self.registry.exists(&record_path).await.map_err(|e| unavailable(&record_path, &e))? {
            return Ok(ContainerMetadata::failed(id, "container already exists"));
        }

        let (parent, host) = match &request.variant {
            RequestVariant::Child(child) => (Some(child.parent.clone()), None),
            RequestVariant::Ssh(ssh) => (None, Some(format!("{}:{}", ssh.host, ssh.port))),
        };
        let options = &request.options;
        let record = ContainerRecord {
            id: id.clone(),
            kind: request.scheme().to_owned(),
            parent,
            host,
            profiles: options.profiles.clone(),
            version: options.version.clone(),
            jvm_opts: options.jvm_opts.clone(),
            data_directory: options.data_directory.clone(),
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| FleetError::creation(format!("Encoding record of '{id}': {e}")))?;

        self.write(RegistryPath::container(&id), &json).await?;
        self.write(RegistryPath::domains(&id), "").await?;
        self.write(RegistryPath::version_pointer(&id), &options.version).await?;
        self.write(
            RegistryPath::version_binding(&options.version, &id),
            &options.profiles.join(" "),
        )
        .await?;
        self.write(RegistryPath::provision(&id), STATE_CREATED).await?;

        info!(container = %id, version = %options.version, "Container recorded");
        Ok(ContainerMetadata::created(id))
    }
}

#[async_trait]
impl FleetClient for LocalFleet {
    async fn create_containers(
        &self,
        request: &ContainerCreationRequest,
    ) -> Result<Vec<ContainerMetadata>, FleetError> {
        self.authorize(request)?;

        let number = request.options.number.max(1);
        let mut metadata = Vec::with_capacity(number as usize);
        for i in 1..=number {
            let id = if number == 1 {
                request.name().to_owned()
            } else {
                format!("{}{i}", request.name())
            };
            metadata.push(self.create_one(id, request).await?);
        }
        Ok(metadata)
    }

    async fn stop_and_remove(&self, container_id: &str) -> Result<(), FleetError> {
        let record = RegistryPath::container(container_id).render();
        if !self.registry.exists(&record).await.map_err(|e| unavailable(&record, &e))? {
            return Err(FleetError::not_found(format!("Container '{container_id}' is not running")));
        }
        self.write(RegistryPath::provision(container_id), STATE_STOPPED).await?;
        self.registry.delete(&record).await.map_err(|e| unavailable(&record, &e))?;
        debug!(container = container_id, "Container stopped");
        Ok(())
    }

    fn current_container_name(&self) -> String {
        self.current.clone()
    }
}

fn unavailable(path: &str, err: &RegistryError) -> FleetError {
    FleetError::Unavailable { message: err.to_string().into(), context: Some(path.to_owned().into()) }
}
