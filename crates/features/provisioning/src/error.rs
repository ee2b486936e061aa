use mqf_domain::ErrorKind;
use mqf_kernel::ports::{FleetError, PromptError};
use mqf_profile::ProfileError;
use mqf_registry::RegistryError;
use mqf_session::SessionError;
use std::borrow::Cow;

/// Errors raised by the provisioning slice.
///
/// Per-target failures end up in [`mqf_domain::ProvisioningResult::failures`]
/// through [`ProvisioningError::kind`]; only profile-phase errors and invalid
/// directives are returned to the caller.
#[mqf_derive::mqf_error(kind = ErrorKind)]
pub enum ProvisioningError {
    #[kind(InvalidConfig)]
    #[error("Invalid provisioning request{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(NotFound)]
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(CreationError)]
    #[error("Container creation failed{}: {message}", format_context(.context))]
    Creation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(Timeout)]
    #[error("Operation timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(source)]
    #[error("{source}{}", format_context(.context))]
    Profile { source: ProfileError, context: Option<Cow<'static, str>> },

    #[kind(source)]
    #[error("{source}{}", format_context(.context))]
    Fleet { source: FleetError, context: Option<Cow<'static, str>> },

    #[kind(source)]
    #[error("{source}{}", format_context(.context))]
    Prompt { source: PromptError, context: Option<Cow<'static, str>> },

    #[kind(RegistryWriteError)]
    #[error("Registry error{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },

    #[kind(AuthenticationFailure)]
    #[error("Session store error{}: {source}", format_context(.context))]
    Session { source: SessionError, context: Option<Cow<'static, str>> },

    #[kind(CreationError)]
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ProvisioningError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConfig { message: message.into(), context: None }
    }

    pub(crate) fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    pub(crate) fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Timeout { message: message.into(), context: None }
    }
}
