use std::borrow::Cow;

/// A specialized [`SessionError`] enum of this crate.
#[mqf_derive::mqf_error]
pub enum SessionError {
    /// The credentials cannot be kept (blank username or password).
    #[error("Session credentials rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
