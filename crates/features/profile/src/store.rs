use crate::error::{ProfileError, ProfileErrorExt};
use crate::record::ProfileRecord;
use async_trait::async_trait;
use mqf_domain::{ProfileHandle, RegistryPath};
use mqf_registry::Registry;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Profile persistence used by [`crate::ProfileManager`].
#[async_trait]
pub trait ProfileStore: Debug + Send + Sync {
    async fn version_exists(&self, version: &str) -> Result<bool, ProfileError>;

    async fn create_version(&self, version: &str) -> Result<(), ProfileError>;

    async fn get_profile(
        &self,
        version: &str,
        id: &str,
    ) -> Result<Option<ProfileRecord>, ProfileError>;

    /// Creates an empty profile, optionally extending `parent`.
    async fn create_profile(
        &self,
        version: &str,
        id: &str,
        parent: Option<&str>,
    ) -> Result<ProfileRecord, ProfileError>;

    /// Merges `mapping` into the `pid` configuration; other keys stay untouched.
    async fn set_properties(
        &self,
        profile: &ProfileHandle,
        pid: &str,
        mapping: &BTreeMap<String, String>,
    ) -> Result<(), ProfileError>;

    async fn set_attributes(
        &self,
        profile: &ProfileHandle,
        mapping: &BTreeMap<String, String>,
    ) -> Result<(), ProfileError>;

    /// Appends `parent` unless it is already a parent.
    async fn add_parent(&self, profile: &ProfileHandle, parent: &str) -> Result<(), ProfileError>;

    /// Profile ids of a version scope, sorted.
    async fn list_profiles(&self, version: &str) -> Result<Vec<String>, ProfileError>;

    /// Stores `record` as is, replacing any existing profile.
    async fn put_profile(
        &self,
        profile: &ProfileHandle,
        record: &ProfileRecord,
    ) -> Result<(), ProfileError>;
}

/// [`ProfileStore`] keeping JSON records under the version scopes of a [`Registry`].
#[derive(Debug, Clone)]
pub struct RegistryProfileStore {
    registry: Arc<dyn Registry>,
}

impl RegistryProfileStore {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }

    async fn load(&self, profile: &ProfileHandle) -> Result<ProfileRecord, ProfileError> {
        self.get_profile(&profile.version_scope, &profile.id).await?.ok_or_else(|| {
            ProfileError::invalid(format!("Profile {profile} does not exist"))
        })
    }

    async fn save(&self, profile: &ProfileHandle, record: &ProfileRecord) -> Result<(), ProfileError> {
        let path = RegistryPath::profile(&profile.version_scope, &profile.id).render();
        let json = serde_json::to_string(record).context(format!("Encoding {profile}"))?;
        self.registry.write(&path, &json).await.context(format!("Writing {path}"))?;
        debug!(%profile, "Profile record saved");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for RegistryProfileStore {
    async fn version_exists(&self, version: &str) -> Result<bool, ProfileError> {
        let path = RegistryPath::version(version).render();
        Ok(self.registry.exists(&path).await?)
    }

    async fn create_version(&self, version: &str) -> Result<(), ProfileError> {
        let path = RegistryPath::version(version).render();
        if !self.registry.exists(&path).await? {
            self.registry.write(&path, "").await.context(format!("Creating version {version}"))?;
        }
        Ok(())
    }

    async fn get_profile(
        &self,
        version: &str,
        id: &str,
    ) -> Result<Option<ProfileRecord>, ProfileError> {
        let path = RegistryPath::profile(version, id).render();
        match self.registry.read(&path).await? {
            None => Ok(None),
            // Bare node created by someone else; treat as an empty profile.
            Some(raw) if raw.trim().is_empty() => Ok(Some(ProfileRecord::default())),
            Some(raw) => {
                let record = serde_json::from_str(&raw).context(format!("Decoding {path}"))?;
                Ok(Some(record))
            },
        }
    }

    async fn create_profile(
        &self,
        version: &str,
        id: &str,
        parent: Option<&str>,
    ) -> Result<ProfileRecord, ProfileError> {
        let record = ProfileRecord::with_parent(parent);
        let handle = ProfileHandle { id: id.to_owned(), version_scope: version.to_owned() };
        self.save(&handle, &record).await?;
        Ok(record)
    }

    async fn set_properties(
        &self,
        profile: &ProfileHandle,
        pid: &str,
        mapping: &BTreeMap<String, String>,
    ) -> Result<(), ProfileError> {
        let mut record = self.load(profile).await?;
        let section = record.configurations.entry(pid.to_owned()).or_default();
        let before = section.clone();
        section.extend(mapping.iter().map(|(k, v)| (k.clone(), v.clone())));
        if *section != before {
            self.save(profile, &record).await?;
        }
        Ok(())
    }

    async fn set_attributes(
        &self,
        profile: &ProfileHandle,
        mapping: &BTreeMap<String, String>,
    ) -> Result<(), ProfileError> {
        let mut record = self.load(profile).await?;
        let before = record.attributes.clone();
        record.attributes.extend(mapping.iter().map(|(k, v)| (k.clone(), v.clone())));
        if record.attributes != before {
            self.save(profile, &record).await?;
        }
        Ok(())
    }

    async fn add_parent(&self, profile: &ProfileHandle, parent: &str) -> Result<(), ProfileError> {
        let mut record = self.load(profile).await?;
        if !record.parents.iter().any(|p| p == parent) {
            record.parents.push(parent.to_owned());
            self.save(profile, &record).await?;
        }
        Ok(())
    }

    async fn list_profiles(&self, version: &str) -> Result<Vec<String>, ProfileError> {
        let root = format!("{}/profiles", RegistryPath::version(version));
        self.registry.children(&root).await.context(format!("Listing {root}"))
    }

    async fn put_profile(
        &self,
        profile: &ProfileHandle,
        record: &ProfileRecord,
    ) -> Result<(), ProfileError> {
        self.save(profile, record).await
    }
}
