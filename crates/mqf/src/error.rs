use mqf_decommission::DecommissionError;
use mqf_domain::{DomainError, ErrorKind};
use mqf_profile::ProfileError;
use mqf_provisioning::ProvisioningError;
use mqf_registry::RegistryError;
use std::borrow::Cow;

#[mqf_derive::mqf_error(kind = ErrorKind)]
pub enum FabricError {
    #[kind(InvalidConfig)]
    #[error("Invalid fabric setup{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(RegistryWriteError)]
    #[error("Registry error{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },

    #[kind(source)]
    #[error("{source}{}", format_context(.context))]
    Domain { source: DomainError, context: Option<Cow<'static, str>> },

    #[kind(source)]
    #[error("{source}{}", format_context(.context))]
    Profile { source: ProfileError, context: Option<Cow<'static, str>> },

    #[kind(source)]
    #[error("{source}{}", format_context(.context))]
    Provisioning { source: ProvisioningError, context: Option<Cow<'static, str>> },

    #[kind(source)]
    #[error("{source}{}", format_context(.context))]
    Decommission { source: DecommissionError, context: Option<Cow<'static, str>> },
}
