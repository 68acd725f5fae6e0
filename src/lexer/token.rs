use compact_str::CompactString;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Literals
    Integer(i64),
    String(CompactString),
    // Names, keywords and operators alike
    Symbol(CompactString),
    // End of file
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "`(`"),
            TokenKind::RightParenthesis => write!(f, "`)`"),
            TokenKind::Integer(v) => write!(f, "integer `{v}`"),
            TokenKind::String(v) => write!(f, "string \"{v}\""),
            TokenKind::Symbol(v) => write!(f, "symbol `{v}`"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The 1-based line the token starts on.
    pub line: u32,
}
