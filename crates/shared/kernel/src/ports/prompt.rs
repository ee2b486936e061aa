use async_trait::async_trait;
use mqf_domain::ErrorKind;
use std::borrow::Cow;
use std::fmt::Debug;

#[mqf_derive::mqf_error(kind = ErrorKind)]
pub enum PromptError {
    /// No more input is available.
    #[kind(AuthenticationFailure)]
    #[error("Prompt closed{}: {message}", format_context(.context))]
    Closed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(AuthenticationFailure)]
    #[error("Prompt I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

/// Interactive line input.
#[async_trait]
pub trait Prompt: Debug + Send + Sync {
    /// Shows `text` and reads one line; `mask_input` hides what is typed.
    async fn read_line(&self, text: &str, mask_input: bool) -> Result<String, PromptError>;
}
