//! Container creation requests and the metadata returned for them.

use crate::model::Credentials;
use serde::Serialize;

/// Options common to every container kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    pub name: String,
    pub number: u32,
    pub profiles: Vec<String>,
    pub version: String,
    pub jvm_opts: Option<String>,
    pub data_directory: Option<String>,
}

impl CreateOptions {
    pub fn new(name: impl Into<String>, profile: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: 1,
            profiles: vec![profile.into()],
            version: version.into(),
            jvm_opts: None,
            data_directory: None,
        }
    }
}

/// A container created under an existing parent through its management interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildOptions {
    pub parent: String,
    pub credentials: Option<Credentials>,
}

/// An independent host reached over SSH with its own host credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshOptions {
    pub host: String,
    pub port: u16,
    pub host_credentials: Option<Credentials>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestVariant {
    Child(ChildOptions),
    Ssh(SshOptions),
}

/// One container to create.
///
/// Mutated at most once, when management credentials are filled in for a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCreationRequest {
    pub options: CreateOptions,
    pub variant: RequestVariant,
}

impl ContainerCreationRequest {
    #[must_use]
    pub const fn new(options: CreateOptions, variant: RequestVariant) -> Self {
        Self { options, variant }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.options.name
    }

    /// Provider scheme of the variant.
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        match self.variant {
            RequestVariant::Child(_) => "child",
            RequestVariant::Ssh(_) => "ssh",
        }
    }

    /// Whether an authentication failure may be retried with fresh management credentials.
    #[must_use]
    pub const fn supports_credential_retry(&self) -> bool {
        matches!(self.variant, RequestVariant::Child(_))
    }

    /// Management credentials currently attached, if any.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        match &self.variant {
            RequestVariant::Child(child) => child.credentials.as_ref(),
            RequestVariant::Ssh(_) => None,
        }
    }

    /// Returns the request with management credentials attached.
    ///
    /// Variants that do not accept management credentials are returned unchanged.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        if let RequestVariant::Child(child) = &mut self.variant {
            child.credentials = Some(credentials);
        }
        self
    }
}

/// Per-container reply from the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMetadata {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ContainerMetadata {
    pub fn created(id: impl Into<String>) -> Self {
        Self { id: id.into(), failure: None }
    }

    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { id: id.into(), failure: Some(reason.into()) }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child() -> ContainerCreationRequest {
        ContainerCreationRequest::new(
            CreateOptions::new("c1", "mq-a", "1.0"),
            RequestVariant::Child(ChildOptions { parent: "root".into(), credentials: None }),
        )
    }

    #[test]
    fn child_accepts_credentials_for_retry() {
        let req = child();
        assert!(req.supports_credential_retry());
        let req = req.with_credentials(Credentials::new("admin", "admin"));
        assert_eq!(req.credentials().map(Credentials::username), Some("admin"));
    }

    #[test]
    fn ssh_ignores_management_credentials() {
        let req = ContainerCreationRequest::new(
            CreateOptions::new("c1", "mq-a", "1.0"),
            RequestVariant::Ssh(SshOptions {
                host: "h".into(),
                port: 22,
                host_credentials: None,
            }),
        );
        assert!(!req.supports_credential_retry());
        assert!(req.with_credentials(Credentials::new("a", "b")).credentials().is_none());
    }
}
