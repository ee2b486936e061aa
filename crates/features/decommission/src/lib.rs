//! # Decommission
//!
//! Destroys a container and leaves no registry entry behind that still names
//! it. Up to five sub-trees reference a container:
//!
//! | Sub-tree | Path |
//! |---|---|
//! | version binding (one per version) | `/fabric/configs/versions/{v}/containers/{id}` |
//! | container record | `/fabric/registry/containers/config/{id}` |
//! | domain memberships | `/fabric/registry/containers/domains/{id}` |
//! | provisioning state | `/fabric/registry/containers/provision/{id}` |
//! | version pointer | `/fabric/configs/containers/{id}` |
//!
//! Deletion failures are reported in [`DecommissionResult`](mqf_domain::DecommissionResult)
//! rather than aborting the sweep.

mod error;
mod orchestrator;

pub use error::{DecommissionError, DecommissionErrorExt};
pub use orchestrator::DecommissionOrchestrator;
