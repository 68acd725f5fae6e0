use crate::lexer::{LexicalError, TokenKind};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got {actual}.")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected a name but got {0}.")]
    NonName(TokenKind),
    #[error("Expected an expression but got {0}.")]
    NonExpression(TokenKind),
    #[error("Expected a non-EOF token.")]
    UnexpectedEof,
    #[error("Encountered an empty form `()`.")]
    EmptyForm,
    #[error("Malformed `{form}` form: {reason}.")]
    MalformedForm {
        form: &'static str,
        reason: &'static str,
    },
    #[error("Property `{0}` is initialized more than once.")]
    DuplicateProperty(CompactString),
    #[error("Encountered a lexer error {0}.")]
    LexicalError(#[from] LexicalError),
}

#[derive(Debug, Error, Clone)]
#[error("[line {line}] {kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub line: u32,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::NonName(_) => "PA002",
            ParserErrorKind::NonExpression(_) => "PA003",
            ParserErrorKind::UnexpectedEof => "PA004",
            ParserErrorKind::EmptyForm => "PA005",
            ParserErrorKind::MalformedForm { .. } => "PA006",
            ParserErrorKind::DuplicateProperty(_) => "PA007",
            ParserErrorKind::LexicalError(_) => "LX001",
        }
    }
}
