use async_trait::async_trait;
use mqf_domain::{ContainerCreationRequest, ContainerMetadata, ErrorKind};
use std::borrow::Cow;
use std::fmt::Debug;

/// Failures reported by the container fleet.
#[mqf_derive::mqf_error(kind = ErrorKind)]
pub enum FleetError {
    /// The parent's management interface rejected the credentials.
    #[kind(AuthenticationFailure)]
    #[error("Authentication failed{}: {message}", format_context(.context))]
    Authentication { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(CreationError)]
    #[error("Container creation failed{}: {message}", format_context(.context))]
    Creation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(NotFound)]
    #[error("Container not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(CreationError)]
    #[error("Fleet unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl FleetError {
    pub fn authentication(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Authentication { message: message.into(), context: None }
    }

    pub fn creation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Creation { message: message.into(), context: None }
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }
}

/// Creates and stops container processes.
#[async_trait]
pub trait FleetClient: Debug + Send + Sync {
    /// Creates the containers described by `request`, one metadata entry per instance.
    ///
    /// A metadata entry may carry a failure even when the call itself succeeds.
    async fn create_containers(
        &self,
        request: &ContainerCreationRequest,
    ) -> Result<Vec<ContainerMetadata>, FleetError>;

    /// Stops the container process and removes it from the fleet.
    async fn stop_and_remove(&self, container_id: &str) -> Result<(), FleetError>;

    /// Name of the container this client is connected through.
    fn current_container_name(&self) -> String;
}
