use crate::error::ProvisioningError;
use crate::provider::{CHILD_SCHEME, ProviderCatalog};
use mqf_domain::{ConfigModel, ContainerCreationRequest, CreateOptions, ProfileHandle, is_valid_id};

/// Expands a broker configuration into one creation request per container name.
#[derive(Debug, Clone)]
pub struct ContainerRequestBuilder {
    catalog: ProviderCatalog,
    scheme: String,
}

impl ContainerRequestBuilder {
    /// Builder creating child containers through `catalog`.
    #[must_use]
    pub fn new(catalog: ProviderCatalog) -> Self {
        Self { catalog, scheme: CHILD_SCHEME.to_owned() }
    }

    /// Selects the provider scheme used for every request.
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Checks the create directive of `cfg` without building anything.
    ///
    /// # Errors
    /// See [`ContainerRequestBuilder::build`].
    pub fn validate(&self, targets: &[String]) -> Result<(), ProvisioningError> {
        if targets.is_empty() {
            return Err(ProvisioningError::invalid("Create directive names no containers"));
        }
        if let Some(bad) = targets.iter().find(|t| !is_valid_container_name(t)) {
            return Err(ProvisioningError::invalid(format!("Invalid container name '{bad}'")));
        }
        if self.catalog.get(&self.scheme).is_none() {
            return Err(ProvisioningError::invalid(format!(
                "Unknown container provider '{}'",
                self.scheme
            )));
        }
        Ok(())
    }

    /// One request per name in `targets`, in order.
    ///
    /// # Errors
    /// [`ProvisioningError::InvalidConfig`] when `targets` is empty, a name is not
    /// a valid container name, or the selected scheme has no provider.
    pub fn build(
        &self,
        cfg: &ConfigModel,
        profile: &ProfileHandle,
        targets: &[String],
    ) -> Result<Vec<ContainerCreationRequest>, ProvisioningError> {
        self.validate(targets)?;
        let provider = self.catalog.get(&self.scheme).ok_or_else(|| {
            ProvisioningError::invalid(format!("Unknown container provider '{}'", self.scheme))
        })?;

        Ok(targets
            .iter()
            .map(|name| {
                let mut options =
                    CreateOptions::new(name.clone(), profile.id.clone(), profile.version_scope.clone());
                options.jvm_opts = cfg.jvm_opts().map(str::to_owned);
                options.data_directory = cfg.data_directory().map(str::to_owned);
                ContainerCreationRequest::new(options, provider.variant())
            })
            .collect())
    }
}

/// Container names are plain ids without dots.
fn is_valid_container_name(name: &str) -> bool {
    is_valid_id(name) && !name.contains('.')
}
