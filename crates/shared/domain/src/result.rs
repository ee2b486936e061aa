//! Outcomes handed back to callers of the orchestrators.

use crate::ErrorKind;
use serde::Serialize;
use std::fmt;

/// One failed target (container name or registry path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub target: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn new(target: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { target: target.into(), kind, message: message.into() }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.target, self.kind, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningResult {
    pub profile_id: String,
    /// Created and assigned container ids, in input order.
    pub created: Vec<String>,
    pub failures: Vec<Failure>,
}

impl ProvisioningResult {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self { profile_id: profile_id.into(), ..Self::default() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecommissionResult {
    pub container_id: String,
    pub removed_paths: Vec<String>,
    pub failures: Vec<Failure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_failure: Option<Failure>,
}

impl DecommissionResult {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self { container_id: container_id.into(), ..Self::default() }
    }

    /// `true` when every registry sub-tree was verified absent.
    ///
    /// A failed stop does not make the result unclean.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
