use mqf_domain::ErrorKind;
use mqf_registry::RegistryError;
use std::borrow::Cow;

/// Errors raised while creating or updating a profile.
#[mqf_derive::mqf_error(kind = ErrorKind)]
pub enum ProfileError {
    #[kind(InvalidConfig)]
    #[error("Invalid profile configuration{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(RegistryWriteError)]
    #[error("Registry error{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },

    /// A stored profile record could not be encoded or decoded.
    #[kind(RegistryWriteError)]
    #[error("Profile record error{}: {source}", format_context(.context))]
    Record { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

impl ProfileError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConfig { message: message.into(), context: None }
    }
}
