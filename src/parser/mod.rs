mod error;
pub mod formatter;

use crate::{
    ast::{
        Block, Expr, FieldAccess, FieldAssignment, Fun, If, LocalVarAssignment, MethodCall, New,
        Return, Script,
    },
    lexer::{Lexer, Token, TokenKind},
};
use compact_str::CompactString;
pub use error::{ParserError, ParserErrorKind};
use std::rc::Rc;

/// Reads the S-expression notation of the AST.
///
/// Every special form maps to exactly one node kind; any other list is a call.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Result<Token, ParserError>>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: None,
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.lexer.get_source()
    }

    fn peek(&mut self) -> Result<Token, ParserError> {
        match self.lookahead {
            Some(ref token_or_error) => token_or_error.clone(),
            None => {
                let next_token = self.next_token();
                self.lookahead = Some(next_token.clone());
                next_token
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParserError> {
        match self.lookahead.take() {
            Some(token_or_error) => token_or_error,
            None => self.lexer.next_token().map_err(|e| ParserError {
                line: e.line,
                kind: ParserErrorKind::LexicalError(e),
            }),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let next_token = self.next_token()?;
        if next_token.kind != expected {
            Err(ParserError {
                line: next_token.line,
                kind: ParserErrorKind::UnexpectedToken {
                    actual: next_token.kind,
                    expected,
                },
            })
        } else {
            Ok(next_token)
        }
    }

    fn peek_is_close(&mut self) -> Result<bool, ParserError> {
        Ok(self.peek()?.kind == TokenKind::RightParenthesis)
    }

    /// Consumes the `)` ending a form with a fixed number of operands.
    fn expect_close(&mut self, form: &'static str) -> Result<(), ParserError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::RightParenthesis => Ok(()),
            TokenKind::Eof => Err(ParserError {
                kind: ParserErrorKind::UnexpectedEof,
                line: token.line,
            }),
            _ => Err(ParserError {
                kind: ParserErrorKind::MalformedForm {
                    form,
                    reason: "too many operands",
                },
                line: token.line,
            }),
        }
    }

    fn expect_name(&mut self) -> Result<CompactString, ParserError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Symbol(name) => Ok(name),
            TokenKind::Eof => Err(ParserError {
                kind: ParserErrorKind::UnexpectedEof,
                line: token.line,
            }),
            kind => Err(ParserError {
                kind: ParserErrorKind::NonName(kind),
                line: token.line,
            }),
        }
    }

    /// Parses expressions up to and including the closing `)` of the current form.
    fn parse_rest(&mut self) -> Result<Vec<Expr>, ParserError> {
        let mut exprs = Vec::new();
        loop {
            if self.peek_is_close()? {
                let _ = self.next_token()?;
                return Ok(exprs);
            }
            exprs.push(self.parse_expression()?);
        }
    }
}

// Programs and expressions
impl<'src> Parser<'src> {
    pub fn parse(&mut self) -> Result<Script, ParserError> {
        let mut instructions = Vec::new();
        loop {
            if self.peek()?.kind == TokenKind::Eof {
                break;
            }
            instructions.push(self.parse_expression()?);
        }
        Ok(Script {
            body: Block {
                instructions,
                line: 1,
            },
        })
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParserError> {
        let token = self.next_token()?;
        let line = token.line;
        match token.kind {
            TokenKind::Integer(v) => Ok(Expr::integer(v, line)),
            TokenKind::String(ref v) => Ok(Expr::string(v, line)),
            TokenKind::Symbol(ref name) if name == "undefined" => Ok(Expr::undefined(line)),
            TokenKind::Symbol(ref name) => Ok(Expr::access(name, line)),
            TokenKind::LeftParenthesis => self.parse_form(line),
            TokenKind::Eof => Err(ParserError {
                kind: ParserErrorKind::UnexpectedEof,
                line,
            }),
            kind => Err(ParserError {
                kind: ParserErrorKind::NonExpression(kind),
                line,
            }),
        }
    }

    fn parse_form(&mut self, line: u32) -> Result<Expr, ParserError> {
        let head = self.peek()?;
        let keyword = match head.kind {
            TokenKind::RightParenthesis => {
                return Err(ParserError {
                    kind: ParserErrorKind::EmptyForm,
                    line,
                });
            }
            TokenKind::Symbol(ref name) => name.clone(),
            _ => CompactString::default(),
        };

        let special = matches!(
            keyword.as_str(),
            "block"
                | "var"
                | "set"
                | "fun"
                | "return"
                | "if"
                | "new"
                | "field"
                | "set-field"
                | "method"
        );
        if !special {
            let qualifier = self.parse_expression()?;
            let arguments = self.parse_rest()?;
            return Ok(Expr::call(qualifier, arguments, line));
        }

        let _ = self.next_token()?;
        match keyword.as_str() {
            "block" => Ok(Expr::block(self.parse_rest()?, line)),
            "var" | "set" => self.parse_local_assignment(keyword == "var", line),
            "fun" => self.parse_fun(line),
            "return" => self.parse_return(line),
            "if" => self.parse_if(line),
            "new" => self.parse_new(line),
            "field" => {
                let receiver = Box::new(self.parse_expression()?);
                let name = self.expect_name()?;
                self.expect_close("field")?;
                Ok(Expr::FieldAccess(FieldAccess {
                    receiver,
                    name,
                    line,
                }))
            }
            "set-field" => {
                let receiver = Box::new(self.parse_expression()?);
                let name = self.expect_name()?;
                let expr = Box::new(self.parse_expression()?);
                self.expect_close("set-field")?;
                Ok(Expr::FieldAssignment(FieldAssignment {
                    receiver,
                    name,
                    expr,
                    line,
                }))
            }
            _ => {
                let receiver = Box::new(self.parse_expression()?);
                let name = self.expect_name()?;
                let arguments = self.parse_rest()?;
                Ok(Expr::MethodCall(MethodCall {
                    receiver,
                    name,
                    arguments,
                    line,
                }))
            }
        }
    }

    fn parse_local_assignment(&mut self, declaration: bool, line: u32) -> Result<Expr, ParserError> {
        let form = if declaration { "var" } else { "set" };
        if self.peek_is_close()? {
            return Err(ParserError {
                kind: ParserErrorKind::MalformedForm {
                    form,
                    reason: "expected a name and a value",
                },
                line,
            });
        }
        let name = self.expect_name()?;
        if self.peek_is_close()? {
            return Err(ParserError {
                kind: ParserErrorKind::MalformedForm {
                    form,
                    reason: "expected a value",
                },
                line,
            });
        }
        let expr = Box::new(self.parse_expression()?);
        self.expect_close(form)?;
        Ok(Expr::LocalVarAssignment(LocalVarAssignment {
            name,
            expr,
            declaration,
            line,
        }))
    }

    fn parse_fun(&mut self, line: u32) -> Result<Expr, ParserError> {
        let name = match self.peek()?.kind {
            TokenKind::Symbol(name) => {
                let _ = self.next_token()?;
                Some(name)
            }
            _ => None,
        };

        self.expect(TokenKind::LeftParenthesis)?;
        let mut parameters = Vec::new();
        while !self.peek_is_close()? {
            parameters.push(self.expect_name()?);
        }
        let _ = self.next_token()?;

        let body = Expr::block(self.parse_rest()?, line);
        Ok(Expr::Fun(Rc::new(Fun {
            name,
            parameters,
            body,
            line,
        })))
    }

    fn parse_return(&mut self, line: u32) -> Result<Expr, ParserError> {
        let expr = if self.peek_is_close()? {
            Expr::undefined(line)
        } else {
            self.parse_expression()?
        };
        self.expect_close("return")?;
        Ok(Expr::Return(Return {
            expr: Box::new(expr),
            line,
        }))
    }

    fn parse_if(&mut self, line: u32) -> Result<Expr, ParserError> {
        if self.peek_is_close()? {
            return Err(ParserError {
                kind: ParserErrorKind::MalformedForm {
                    form: "if",
                    reason: "expected a condition and a branch",
                },
                line,
            });
        }
        let condition = Box::new(self.parse_expression()?);
        if self.peek_is_close()? {
            return Err(ParserError {
                kind: ParserErrorKind::MalformedForm {
                    form: "if",
                    reason: "expected a branch",
                },
                line,
            });
        }
        let true_branch = Box::new(self.parse_expression()?);
        let false_branch = if self.peek_is_close()? {
            Box::new(Expr::block(Vec::new(), line))
        } else {
            Box::new(self.parse_expression()?)
        };
        self.expect_close("if")?;
        Ok(Expr::If(If {
            condition,
            true_branch,
            false_branch,
            line,
        }))
    }

    fn parse_new(&mut self, line: u32) -> Result<Expr, ParserError> {
        let mut initializers: Vec<(CompactString, Expr)> = Vec::new();
        while !self.peek_is_close()? {
            let open = self.expect(TokenKind::LeftParenthesis)?;
            let name = self.expect_name()?;
            if initializers.iter().any(|(existing, _)| *existing == name) {
                return Err(ParserError {
                    kind: ParserErrorKind::DuplicateProperty(name),
                    line: open.line,
                });
            }
            let init = self.parse_expression()?;
            self.expect_close("new")?;
            initializers.push((name, init));
        }
        let _ = self.next_token()?;
        Ok(Expr::New(New { initializers, line }))
    }
}
