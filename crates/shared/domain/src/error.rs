use crate::ErrorKind;
use std::borrow::Cow;

/// Errors raised while assembling domain values.
#[mqf_derive::mqf_error(kind = ErrorKind)]
pub enum DomainError {
    #[kind(InvalidConfig)]
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
