//! # Provisioning
//!
//! Turns a [`ConfigModel`](mqf_domain::ConfigModel) into a running broker
//! deployment: the profile is created or updated, bound to existing containers
//! and new containers are requested from the fleet.
//!
//! Creation requests whose kind accepts management credentials are retried
//! exactly once after an authentication failure. The retry uses explicit
//! credentials when given, otherwise the user is prompted, at most once per
//! run. Credentials that worked are kept in the session store.
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use mqf_provisioning::{LocalFleet, ProvisioningOrchestrator};
//! # use mqf_profile::{ProfileManager, RegistryProfileStore};
//! # use mqf_registry::MemoryRegistry;
//! # use mqf_session::SessionCache;
//! # async fn demo(prompt: Arc<dyn mqf_kernel::ports::Prompt>) -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(MemoryRegistry::new());
//! let orchestrator = ProvisioningOrchestrator::builder()
//!     .profiles(ProfileManager::new(Arc::new(RegistryProfileStore::new(registry.clone())), "1.0"))
//!     .fleet(Arc::new(LocalFleet::new(registry.clone(), "root")))
//!     .registry(registry)
//!     .session(Arc::new(SessionCache::default().open("demo")))
//!     .prompt(prompt)
//!     .build()?;
//!
//! let cfg = mqf_domain::ConfigModel::builder("mq1").create_csv("c1,c2").build()?;
//! let result = orchestrator.run(&cfg).await?;
//! assert_eq!(result.created, ["c1", "c2"]);
//! # Ok(())
//! # }
//! ```

mod builder;
mod credentials;
mod error;
pub mod fleet;
mod orchestrator;
pub mod provider;

pub use builder::ContainerRequestBuilder;
pub use credentials::CredentialResolver;
pub use error::{ProvisioningError, ProvisioningErrorExt};
pub use fleet::LocalFleet;
pub use orchestrator::{ProvisioningOrchestrator, ProvisioningOrchestratorBuilder};
pub use provider::{ChildProvider, ContainerProvider, ProviderCatalog, SshProvider};
