use dormant_derive::dormant_error;
use std::borrow::Cow;

#[dormant_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected")]
    Rejected {},

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let from_str: DemoError = "boom".into();
    assert_eq!(from_str.to_string(), "Internal error: boom");

    let io = std::io::Error::other("disk");
    let converted: DemoError = io.into();
    assert!(matches!(converted, DemoError::Io { context: None, .. }));

    let rejected = DemoError::Rejected {};
    assert_eq!(rejected.to_string(), "Rejected");
}
