use crate::error::ProfileError;
use crate::record::{broker_attributes, broker_pid, broker_properties};
use crate::store::ProfileStore;
use mqf_domain::{ConfigModel, ProfileHandle, is_valid_id};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Creates or updates the broker profile described by a [`ConfigModel`].
#[derive(Debug, Clone)]
pub struct ProfileManager {
    store: Arc<dyn ProfileStore>,
    default_version: String,
}

impl ProfileManager {
    pub fn new(store: Arc<dyn ProfileStore>, default_version: impl Into<String>) -> Self {
        Self { store, default_version: default_version.into() }
    }

    #[must_use]
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Ensures the profile exists in its version scope and carries every field set in `cfg`.
    ///
    /// Running it twice with the same input yields the same handle and the same
    /// stored record. Keys absent from `cfg` are left untouched.
    ///
    /// # Errors
    /// [`ProfileError::InvalidConfig`] when the broker name is blank, the version
    /// scope does not exist (other than the default, which is created), or the
    /// parent profile is missing. Registry failures are returned as-is; nothing
    /// is rolled back.
    #[instrument(skip(self, cfg), fields(broker = cfg.broker_name()))]
    pub async fn create_or_update(&self, cfg: &ConfigModel) -> Result<ProfileHandle, ProfileError> {
        if cfg.broker_name().trim().is_empty() {
            return Err(ProfileError::invalid("Broker name must not be blank"));
        }
        let profile_id = cfg.profile_name();
        if !is_valid_id(profile_id) {
            return Err(ProfileError::invalid(format!(
                "Profile name '{profile_id}' is not a valid id"
            )));
        }

        let version = cfg.version_or(&self.default_version).to_owned();
        let version_exists = self.store.version_exists(&version).await?;
        if !version_exists && version != self.default_version {
            return Err(ProfileError::invalid(format!("Version '{version}' does not exist")));
        }

        if let Some(parent) = cfg.parent_profile() {
            if self.store.get_profile(&version, parent).await?.is_none() {
                return Err(ProfileError::invalid(format!(
                    "Parent profile '{parent}' does not exist in version {version}"
                )));
            }
        }

        if !version_exists {
            self.store.create_version(&version).await?;
            info!(%version, "Default version created");
        }

        let handle = ProfileHandle { id: profile_id.to_owned(), version_scope: version };

        match self.store.get_profile(&handle.version_scope, &handle.id).await? {
            None => {
                self.store
                    .create_profile(&handle.version_scope, &handle.id, cfg.parent_profile())
                    .await?;
                info!(profile = %handle, "Profile created");
            },
            Some(_) => {
                if let Some(parent) = cfg.parent_profile() {
                    self.store.add_parent(&handle, parent).await?;
                }
                debug!(profile = %handle, "Profile exists, merging settings");
            },
        }

        let pid = broker_pid(cfg.broker_name());
        self.store.set_properties(&handle, &pid, &broker_properties(cfg)).await?;

        let attributes = broker_attributes(cfg);
        if !attributes.is_empty() {
            self.store.set_attributes(&handle, &attributes).await?;
        }

        Ok(handle)
    }

    /// Creates version scope `version`, copying every profile of `parent` when given.
    ///
    /// # Errors
    /// [`ProfileError::InvalidConfig`] when `version` is not a valid id, already
    /// exists, or `parent` does not exist.
    #[instrument(skip(self))]
    pub async fn create_version(
        &self,
        version: &str,
        parent: Option<&str>,
    ) -> Result<(), ProfileError> {
        if !is_valid_id(version) {
            return Err(ProfileError::invalid(format!("Version '{version}' is not a valid id")));
        }
        if self.store.version_exists(version).await? {
            return Err(ProfileError::invalid(format!("Version '{version}' already exists")));
        }
        if let Some(parent) = parent {
            if !self.store.version_exists(parent).await? {
                return Err(ProfileError::invalid(format!(
                    "Parent version '{parent}' does not exist"
                )));
            }
        }

        self.store.create_version(version).await?;

        let Some(parent) = parent else {
            info!(%version, "Version created");
            return Ok(());
        };
        let profiles = self.store.list_profiles(parent).await?;
        for id in &profiles {
            if let Some(record) = self.store.get_profile(parent, id).await? {
                let handle = ProfileHandle { id: id.clone(), version_scope: version.to_owned() };
                self.store.put_profile(&handle, &record).await?;
            }
        }
        info!(%version, %parent, copied = profiles.len(), "Version created");
        Ok(())
    }
}
