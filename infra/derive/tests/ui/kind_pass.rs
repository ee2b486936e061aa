use mqf_derive::mqf_error;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Registry,
    Creation,
}

#[mqf_error(kind = Kind)]
pub enum DemoError {
    #[kind(Registry)]
    #[error("Registry error{}: {message}", format_context(.context))]
    Registry { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[kind(Creation)]
    #[error("Creation error{}: {message}", format_context(.context))]
    Creation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err = DemoError::Creation { message: "boom".into(), context: None };
    assert_eq!(err.kind(), Kind::Creation);
}
