use mqf_domain::ErrorKind;
use mqf_kernel::ports::FleetError;
use mqf_registry::RegistryError;
use std::borrow::Cow;

#[mqf_derive::mqf_error(kind = ErrorKind)]
pub enum DecommissionError {
    #[kind(InvalidConfig)]
    #[error("Invalid decommission request{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(Timeout)]
    #[error("Operation timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(source)]
    #[error("{source}{}", format_context(.context))]
    Fleet { source: FleetError, context: Option<Cow<'static, str>> },

    #[kind(RegistryWriteError)]
    #[error("Registry error{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },
}

impl DecommissionError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConfig { message: message.into(), context: None }
    }
}
