use super::{
    token::{Token, TokenKind},
    LexicalError, LexicalErrorKind,
};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

/// One token per line as `KIND lexeme literal`.
pub struct BasicFormatter;

impl TokenFormatter for BasicFormatter {
    fn format(&self, token: &Token) -> String {
        match token.kind {
            TokenKind::LeftParenthesis => "LEFT_PAREN ( null".into(),
            TokenKind::RightParenthesis => "RIGHT_PAREN ) null".into(),
            TokenKind::Integer(v) => format!("INTEGER {v} {v}"),
            TokenKind::String(ref v) => format!("STRING \"{v}\" {v}"),
            TokenKind::Symbol(ref v) => format!("SYMBOL {v} null"),
            TokenKind::Eof => "EOF  null".into(),
        }
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = error.line;
        match error.kind {
            LexicalErrorKind::UnclosedString => {
                format!("[line {line}] Error: Unterminated string.")
            }
            LexicalErrorKind::IntegerOutOfRange(ref lexeme) => {
                format!("[line {line}] Error: Integer out of range: {lexeme}")
            }
        }
    }
}
