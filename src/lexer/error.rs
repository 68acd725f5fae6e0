use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum LexicalErrorKind {
    #[error("Unterminated string literal")]
    UnclosedString,
    #[error("Integer literal {0} does not fit in 64 bits")]
    IntegerOutOfRange(CompactString),
}

#[derive(Debug, Error, Clone)]
#[error("[line {line}] {kind}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub line: u32,
}
