use dormant_derive::dormant_error;
use std::borrow::Cow;

#[dormant_error]
pub enum ParseError {
    #[error("Number error{}: {source}", format_context(.context))]
    Number { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, ParseError> {
    raw.parse::<u32>().context("reading port")
}

fn main() {
    let err = parse("not-a-number").unwrap_err();
    assert!(err.to_string().starts_with("Number error (reading port): "));

    let rewrapped: Result<u32, ParseError> = parse("x").context("second pass");
    assert!(rewrapped.unwrap_err().to_string().contains("(second pass)"));
}
