//! # Domain Models
//!
//! Value types shared by every provisioning crate: the declarative broker
//! configuration, profile handles, creation requests, orchestration results and
//! the registry path layout. Keep it lean: no I/O and no orchestration logic.

pub mod config;
mod error;
mod kind;
pub mod model;
pub mod paths;
pub mod request;
pub mod result;

pub use error::{DomainError, DomainErrorExt};
pub use kind::ErrorKind;
pub use model::{ConfigModel, ConfigModelBuilder, Credentials, ProfileHandle};
pub use paths::RegistryPath;
pub use request::{
    ChildOptions, ContainerCreationRequest, ContainerMetadata, CreateOptions, RequestVariant,
    SshOptions,
};
pub use result::{DecommissionResult, Failure, ProvisioningResult};

/// Version used when neither the request nor the registry names one.
pub const FALLBACK_VERSION: &str = "1.0";

/// Returns `true` for identifiers usable as a single registry path segment.
///
/// Container, profile and version ids share this alphabet: ASCII alphanumerics,
/// `-`, `_` and `.`. A leading `.` is rejected, as the registry reserves those
/// segments (`.`, `..`, node data files).
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
