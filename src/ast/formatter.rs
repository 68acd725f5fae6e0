use super::{Expr, LiteralValue, Script};
use crate::parser::ParserError;

pub trait ScriptFormatter {
    fn format(&self, script: &Script) -> String;
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugFormatter;

impl ScriptFormatter for DebugFormatter {
    fn format(&self, script: &Script) -> String {
        format!("{script:#?}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// Prints a script back in the notation the parser reads, one top-level form per line.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    pub fn format_expr(expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => match literal.value {
                LiteralValue::Undefined => "undefined".into(),
                LiteralValue::Integer(v) => format!("{v}"),
                LiteralValue::String(ref v) => format!("\"{v}\""),
            },
            Expr::Block(block) => Self::format_form("block", &[], &block.instructions),
            Expr::LocalVarAccess(access) => access.name.to_string(),
            Expr::LocalVarAssignment(assignment) => {
                let keyword = if assignment.declaration { "var" } else { "set" };
                format!(
                    "({keyword} {} {})",
                    assignment.name,
                    Self::format_expr(&assignment.expr)
                )
            }
            Expr::Fun(fun) => {
                let mut head = String::from("fun");
                if let Some(ref name) = fun.name {
                    head.push(' ');
                    head.push_str(name);
                }
                let parameters = fun
                    .parameters
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let body = match fun.body {
                    Expr::Block(ref block) => block
                        .instructions
                        .iter()
                        .map(|e| format!(" {}", Self::format_expr(e)))
                        .collect::<String>(),
                    ref other => format!(" {}", Self::format_expr(other)),
                };
                format!("({head} ({parameters}){body})")
            }
            Expr::FunCall(call) => {
                let qualifier = Self::format_expr(&call.qualifier);
                Self::format_form(&qualifier, &[], &call.arguments)
            }
            Expr::Return(ret) => format!("(return {})", Self::format_expr(&ret.expr)),
            Expr::If(branch) => format!(
                "(if {} {} {})",
                Self::format_expr(&branch.condition),
                Self::format_expr(&branch.true_branch),
                Self::format_expr(&branch.false_branch)
            ),
            Expr::New(new) => {
                let initializers = new
                    .initializers
                    .iter()
                    .map(|(name, init)| format!(" ({name} {})", Self::format_expr(init)))
                    .collect::<String>();
                format!("(new{initializers})")
            }
            Expr::FieldAccess(access) => format!(
                "(field {} {})",
                Self::format_expr(&access.receiver),
                access.name
            ),
            Expr::FieldAssignment(assignment) => format!(
                "(set-field {} {} {})",
                Self::format_expr(&assignment.receiver),
                assignment.name,
                Self::format_expr(&assignment.expr)
            ),
            Expr::MethodCall(call) => {
                let receiver = Self::format_expr(&call.receiver);
                Self::format_form(
                    "method",
                    &[receiver.as_str(), call.name.as_str()],
                    &call.arguments,
                )
            }
        }
    }

    fn format_form(head: &str, prefix: &[&str], rest: &[Expr]) -> String {
        let mut buffer = format!("({head}");
        for part in prefix {
            buffer.push(' ');
            buffer.push_str(part);
        }
        for expr in rest {
            buffer.push(' ');
            buffer.push_str(&Self::format_expr(expr));
        }
        buffer.push(')');
        buffer
    }
}

impl ScriptFormatter for SExpressionFormatter {
    fn format(&self, script: &Script) -> String {
        script
            .body
            .instructions
            .iter()
            .map(Self::format_expr)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error}")
    }
}
