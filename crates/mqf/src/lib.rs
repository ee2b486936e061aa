//! Facade crate for the broker provisioning fabric.
//! Re-exports domain/kernel primitives and wires the feature slices into one [`Fabric`] handle.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,no_run
//! # use std::sync::Arc;
//! # async fn demo(prompt: Arc<dyn mqf::kernel::ports::Prompt>) -> Result<(), mqf::FabricError> {
//! use mqf::Fabric;
//! use mqf::domain::ConfigModel;
//!
//! let fabric = Fabric::builder().prompt(prompt).build().await?;
//! let cfg = ConfigModel::builder("mq1").create_csv("c1").build()?;
//! let report = fabric.provision(&cfg).await?;
//! fabric.destroy_everywhere("c1").await?;
//! # let _ = report;
//! # Ok(())
//! # }
//! ```

mod error;
mod fabric;

pub use error::{FabricError, FabricErrorExt};
pub use fabric::{Fabric, FabricBuilder};
pub use mqf_domain as domain;
pub use mqf_kernel as kernel;
pub use mqf_session::{SessionCache, SessionCredentialStore, SessionHandle};

/// Feature slices, for callers that need more than the [`Fabric`] surface.
pub mod features {
    pub use mqf_decommission as decommission;
    pub use mqf_profile as profile;
    pub use mqf_provisioning as provisioning;
}

/// Registry backends.
pub mod registry {
    pub use mqf_registry::*;
}
