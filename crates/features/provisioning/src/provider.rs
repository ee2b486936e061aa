//! Container kinds, keyed by provider scheme.
//!
//! A new kind of container is supported by registering another
//! [`ContainerProvider`] in the [`ProviderCatalog`].

use mqf_domain::{ChildOptions, Credentials, RequestVariant, SshOptions};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

pub const CHILD_SCHEME: &str = "child";
pub const SSH_SCHEME: &str = "ssh";

/// Produces the variant part of a creation request.
pub trait ContainerProvider: Debug + Send + Sync {
    fn scheme(&self) -> &'static str;

    /// A fresh variant, without management credentials.
    fn variant(&self) -> RequestVariant;
}

/// Child containers hosted by `parent`.
#[derive(Debug, Clone)]
pub struct ChildProvider {
    parent: String,
}

impl ChildProvider {
    pub fn new(parent: impl Into<String>) -> Self {
        Self { parent: parent.into() }
    }
}

impl ContainerProvider for ChildProvider {
    fn scheme(&self) -> &'static str {
        CHILD_SCHEME
    }

    fn variant(&self) -> RequestVariant {
        RequestVariant::Child(ChildOptions { parent: self.parent.clone(), credentials: None })
    }
}

/// Containers installed on an SSH host.
#[derive(Debug, Clone)]
pub struct SshProvider {
    host: String,
    port: u16,
    host_credentials: Option<Credentials>,
}

impl SshProvider {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port, host_credentials: None }
    }

    #[must_use]
    pub fn host_credentials(mut self, credentials: Credentials) -> Self {
        self.host_credentials = Some(credentials);
        self
    }
}

impl ContainerProvider for SshProvider {
    fn scheme(&self) -> &'static str {
        SSH_SCHEME
    }

    fn variant(&self) -> RequestVariant {
        RequestVariant::Ssh(SshOptions {
            host: self.host.clone(),
            port: self.port,
            host_credentials: self.host_credentials.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    providers: BTreeMap<&'static str, Arc<dyn ContainerProvider>>,
}

impl ProviderCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the child provider for `parent` registered.
    #[must_use]
    pub fn with_child(parent: impl Into<String>) -> Self {
        Self::new().register(ChildProvider::new(parent))
    }

    /// Adds `provider`, replacing any provider with the same scheme.
    #[must_use]
    pub fn register(self, provider: impl ContainerProvider + 'static) -> Self {
        self.register_shared(Arc::new(provider))
    }

    #[must_use]
    pub fn register_shared(mut self, provider: Arc<dyn ContainerProvider>) -> Self {
        self.providers.insert(provider.scheme(), provider);
        self
    }

    #[must_use]
    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn ContainerProvider>> {
        self.providers.get(scheme)
    }

    pub fn schemes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.providers.keys().copied()
    }
}
