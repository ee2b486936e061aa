//! Declarative broker configuration and the handles derived from it.

use crate::error::DomainError;
use crate::is_valid_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A management-interface credential pair.
///
/// Wiped from memory on drop; `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reference to a profile stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileHandle {
    pub id: String,
    pub version_scope: String,
}

impl fmt::Display for ProfileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version_scope)
    }
}

/// Immutable declarative input for one provisioning run.
///
/// Built through [`ConfigModel::builder`]; every accessor returns borrowed data
/// so the model can be shared across the orchestration phases.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigModel {
    broker_name: String,
    profile_name: Option<String>,
    parent_profile: Option<String>,
    group: Option<String>,
    networks: Option<String>,
    networks_username: Option<String>,
    networks_password: Option<String>,
    version: Option<String>,
    minimum_instances: Option<u32>,
    replicas: Option<u32>,
    config_url: Option<String>,
    data_directory: Option<String>,
    jvm_opts: Option<String>,
    properties: Vec<(String, String)>,
    username: Option<String>,
    password: Option<String>,
    create_targets: Option<Vec<String>>,
    assign_targets: Vec<String>,
}

impl ConfigModel {
    #[must_use]
    pub fn builder(broker_name: impl Into<String>) -> ConfigModelBuilder {
        ConfigModelBuilder::new(broker_name)
    }

    #[must_use]
    pub fn broker_name(&self) -> &str {
        &self.broker_name
    }

    /// The explicit profile name, or the broker name when none was given.
    #[must_use]
    pub fn profile_name(&self) -> &str {
        self.profile_name.as_deref().unwrap_or(&self.broker_name)
    }

    /// The explicit version, or `default` when none was given.
    #[must_use]
    pub fn version_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.version.as_deref().unwrap_or(default)
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn parent_profile(&self) -> Option<&str> {
        self.parent_profile.as_deref()
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    #[must_use]
    pub fn networks(&self) -> Option<&str> {
        self.networks.as_deref()
    }

    #[must_use]
    pub fn networks_username(&self) -> Option<&str> {
        self.networks_username.as_deref()
    }

    #[must_use]
    pub fn networks_password(&self) -> Option<&str> {
        self.networks_password.as_deref()
    }

    #[must_use]
    pub const fn minimum_instances(&self) -> Option<u32> {
        self.minimum_instances
    }

    #[must_use]
    pub const fn replicas(&self) -> Option<u32> {
        self.replicas
    }

    #[must_use]
    pub fn config_url(&self) -> Option<&str> {
        self.config_url.as_deref()
    }

    #[must_use]
    pub fn data_directory(&self) -> Option<&str> {
        self.data_directory.as_deref()
    }

    #[must_use]
    pub fn jvm_opts(&self) -> Option<&str> {
        self.jvm_opts.as_deref()
    }

    /// Parsed `key=value` properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Both halves of the explicit credential pair, if given.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        }
    }

    /// `None` when no create directive was given; `Some(&[])` when it was given empty.
    #[must_use]
    pub fn create_targets(&self) -> Option<&[String]> {
        self.create_targets.as_deref()
    }

    #[must_use]
    pub fn assign_targets(&self) -> &[String] {
        &self.assign_targets
    }

    /// Returns a copy with the credential halves that were absent filled from `fallback`.
    ///
    /// Explicit values always win.
    #[must_use]
    pub fn with_fallback_credentials(
        &self,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        let mut next = self.clone();
        if next.username.as_deref().is_none_or(str::is_empty) {
            next.username = username.filter(|u| !u.is_empty());
        }
        if next.password.as_deref().is_none_or(str::is_empty) {
            next.password = password.filter(|p| !p.is_empty());
        }
        next
    }
}

impl fmt::Debug for ConfigModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ConfigModel")
            .field("broker_name", &self.broker_name)
            .field("profile_name", &self.profile_name)
            .field("parent_profile", &self.parent_profile)
            .field("group", &self.group)
            .field("networks", &self.networks)
            .field("networks_username", &self.networks_username)
            .field("networks_password", &redact(&self.networks_password))
            .field("version", &self.version)
            .field("minimum_instances", &self.minimum_instances)
            .field("replicas", &self.replicas)
            .field("config_url", &self.config_url)
            .field("data_directory", &self.data_directory)
            .field("jvm_opts", &self.jvm_opts)
            .field("properties", &self.properties)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("create_targets", &self.create_targets)
            .field("assign_targets", &self.assign_targets)
            .finish()
    }
}

/// Fluent builder for [`ConfigModel`].
///
/// Validation is deferred to [`ConfigModelBuilder::build`] so that every
/// problem is reported before any side effect.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ConfigModelBuilder {
    model: ConfigModel,
    raw_properties: Vec<String>,
}

impl ConfigModelBuilder {
    pub fn new(broker_name: impl Into<String>) -> Self {
        Self {
            model: ConfigModel { broker_name: broker_name.into(), ..ConfigModel::default() },
            raw_properties: Vec::new(),
        }
    }

    pub fn profile(mut self, name: impl Into<String>) -> Self {
        self.model.profile_name = non_blank(name.into());
        self
    }

    pub fn parent_profile(mut self, name: impl Into<String>) -> Self {
        self.model.parent_profile = non_blank(name.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.model.group = non_blank(group.into());
        self
    }

    pub fn networks(mut self, networks: impl Into<String>) -> Self {
        self.model.networks = non_blank(networks.into());
        self
    }

    pub fn networks_username(mut self, username: impl Into<String>) -> Self {
        self.model.networks_username = non_blank(username.into());
        self
    }

    pub fn networks_password(mut self, password: impl Into<String>) -> Self {
        self.model.networks_password = non_blank(password.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.model.version = non_blank(version.into());
        self
    }

    pub const fn minimum_instances(mut self, count: u32) -> Self {
        self.model.minimum_instances = Some(count);
        self
    }

    pub const fn replicas(mut self, count: u32) -> Self {
        self.model.replicas = Some(count);
        self
    }

    pub fn config_url(mut self, url: impl Into<String>) -> Self {
        self.model.config_url = non_blank(url.into());
        self
    }

    pub fn data_directory(mut self, dir: impl Into<String>) -> Self {
        self.model.data_directory = non_blank(dir.into());
        self
    }

    pub fn jvm_opts(mut self, opts: impl Into<String>) -> Self {
        self.model.jvm_opts = non_blank(opts.into());
        self
    }

    /// Adds one `key=value` property; parsed at build time.
    pub fn property(mut self, raw: impl Into<String>) -> Self {
        self.raw_properties.push(raw.into());
        self
    }

    pub fn properties<I, S>(mut self, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_properties.extend(raw.into_iter().map(Into::into));
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.model.username = non_blank(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.model.password = non_blank(password.into());
        self
    }

    /// Sets the create directive from a list of container names.
    pub fn create_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model.create_targets = Some(dedup(targets.into_iter().map(Into::into)));
        self
    }

    /// Sets the create directive from a comma separated list (`"c1,c2"`).
    pub fn create_csv(self, csv: &str) -> Self {
        self.create_targets(split_csv(csv))
    }

    pub fn assign_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model.assign_targets = dedup(targets.into_iter().map(Into::into));
        self
    }

    pub fn assign_csv(self, csv: &str) -> Self {
        self.assign_targets(split_csv(csv))
    }

    /// Validates and freezes the model.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidConfig`] when the broker name is blank or not
    /// a valid id, a property is not `key=value`, a count is zero, or the profile
    /// or version name is not a valid id.
    pub fn build(self) -> Result<ConfigModel, DomainError> {
        let Self { mut model, raw_properties } = self;

        model.broker_name = model.broker_name.trim().to_owned();
        if model.broker_name.is_empty() {
            return Err(invalid("Broker name must not be blank"));
        }
        if !is_valid_id(&model.broker_name) {
            return Err(invalid(format!("Broker name '{}' is not a valid id", model.broker_name)));
        }
        if let Some(profile) = model.profile_name.as_deref().filter(|p| !is_valid_id(p)) {
            return Err(invalid(format!("Profile name '{profile}' is not a valid id")));
        }
        if let Some(version) = model.version.as_deref().filter(|v| !is_valid_id(v)) {
            return Err(invalid(format!("Version '{version}' is not a valid id")));
        }
        if model.minimum_instances == Some(0) {
            return Err(invalid("minimumInstances must be greater than zero"));
        }
        if model.replicas == Some(0) {
            return Err(invalid("replicas must be greater than zero"));
        }

        model.properties = raw_properties
            .iter()
            .map(|raw| parse_property(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(model)
    }
}

/// Splits a comma separated directive, trimming names and dropping empty segments.
#[must_use]
pub fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
}

/// Parses one `key=value` property; the value may contain further `=`.
///
/// # Errors
/// Returns [`DomainError::InvalidConfig`] when there is no `=` or the key is blank.
pub fn parse_property(raw: &str) -> Result<(String, String), DomainError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| invalid(format!("Property '{raw}' is not of the form key=value")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(invalid(format!("Property '{raw}' has an empty key")));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.trim().to_owned();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> DomainError {
    DomainError::InvalidConfig { message: message.into(), context: None }
}
