mod error;
pub mod formatter;
mod token;

pub use error::{LexicalError, LexicalErrorKind};
use std::{iter::Peekable, ops::Range, rc::Rc, str::CharIndices};
pub use token::{Token, TokenKind};

/// Byte ranges of every line of a source text, used to point diagnostics at a line.
#[derive(Debug, Clone)]
pub struct LineBreaks {
    line_breaks: Rc<[Range<usize>]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let mut line_breaks = Vec::new();
        let mut cursor = 0;
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_breaks.push(cursor..offset);
                cursor = offset + 1;
            }
        }
        if !text.ends_with('\n') || text.is_empty() {
            line_breaks.push(cursor..text.len());
        }
        Self {
            line_breaks: line_breaks.into(),
        }
    }

    pub fn get_max_line(&self) -> u32 {
        self.line_breaks.len() as u32
    }

    /// The byte range of the given 1-based line, excluding its line break.
    ///
    /// Lines past the end clamp to the last line.
    pub fn get_range(&self, line: u32) -> Range<usize> {
        let index = (line.max(1) as usize - 1).min(self.line_breaks.len() - 1);
        self.line_breaks[index].clone()
    }
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    line: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    pub fn get_line_breaks(&self) -> LineBreaks {
        LineBreaks::new(self.source)
    }
}

impl<'src> Lexer<'src> {
    fn next_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, '\n')) = next {
            self.line += 1;
        }
        next
    }

    fn is_delimiter(c: char) -> bool {
        c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';')
    }

    fn skip_trivia(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else if c == ';' {
                // Comments run to the end of the line
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.next_char();
                }
            } else {
                break;
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        self.skip_trivia();
        let line = self.line;
        let Some((start, c)) = self.next_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
            });
        };

        let kind = match c {
            '(' => TokenKind::LeftParenthesis,
            ')' => TokenKind::RightParenthesis,
            '"' => self.lex_string(start, line)?,
            _ => self.lex_atom(start, line)?,
        };
        Ok(Token { kind, line })
    }

    fn lex_string(&mut self, start: usize, line: u32) -> Result<TokenKind, LexicalError> {
        let content_start = start + 1;
        loop {
            match self.next_char() {
                Some((end, '"')) => {
                    return Ok(TokenKind::String(self.source[content_start..end].into()));
                }
                Some(_) => {}
                None => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::UnclosedString,
                        line,
                    });
                }
            }
        }
    }

    fn lex_atom(&mut self, start: usize, line: u32) -> Result<TokenKind, LexicalError> {
        let mut end = self.source.len();
        while let Some(&(offset, c)) = self.chars.peek() {
            if Self::is_delimiter(c) {
                end = offset;
                break;
            }
            self.next_char();
        }
        let lexeme = &self.source[start..end];

        let digits = lexeme.strip_prefix('-').unwrap_or(lexeme);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            lexeme
                .parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| LexicalError {
                    kind: LexicalErrorKind::IntegerOutOfRange(lexeme.into()),
                    line,
                })
        } else {
            Ok(TokenKind::Symbol(lexeme.into()))
        }
    }
}
