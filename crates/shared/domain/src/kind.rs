use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Coarse failure classification reported back to callers.
///
/// Every crate's error enum maps onto one of these through its generated `kind()`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Malformed or contradictory input; aborts before any side effect.
    InvalidConfig,
    /// The remote management interface rejected the supplied credentials.
    AuthenticationFailure,
    /// Remote creation failed for any other reason.
    CreationError,
    /// A registry read, write or delete failed.
    RegistryWriteError,
    /// The addressed entry does not exist.
    NotFound,
    /// The operation did not finish within the configured timeout.
    Timeout,
}
