pub mod formatter;

use compact_str::CompactString;
use std::rc::Rc;

/// A constant embedded in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Undefined,
    Integer(i64),
    String(CompactString),
}

#[derive(Debug, Clone)]
pub struct Literal {
    pub value: LiteralValue,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub instructions: Vec<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct LocalVarAccess {
    pub name: CompactString,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct LocalVarAssignment {
    pub name: CompactString,
    pub expr: Box<Expr>,
    /// `true` introduces a binding, `false` overwrites a visible one.
    pub declaration: bool,
    pub line: u32,
}

/// A function definition.
///
/// Held behind an `Rc` by [`Expr::Fun`] since every function value built from it keeps the
/// parameters and the body alive.
#[derive(Debug)]
pub struct Fun {
    pub name: Option<CompactString>,
    pub parameters: Vec<CompactString>,
    pub body: Expr,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct FunCall {
    pub qualifier: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct Return {
    pub expr: Box<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct If {
    pub condition: Box<Expr>,
    pub true_branch: Box<Expr>,
    pub false_branch: Box<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct New {
    /// Property initializers in declaration order. Names are unique.
    pub initializers: Vec<(CompactString, Expr)>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct FieldAccess {
    pub receiver: Box<Expr>,
    pub name: CompactString,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct FieldAssignment {
    pub receiver: Box<Expr>,
    pub name: CompactString,
    pub expr: Box<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct MethodCall {
    pub receiver: Box<Expr>,
    pub name: CompactString,
    pub arguments: Vec<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Block(Block),
    LocalVarAccess(LocalVarAccess),
    LocalVarAssignment(LocalVarAssignment),
    Fun(Rc<Fun>),
    FunCall(FunCall),
    Return(Return),
    If(If),
    New(New),
    FieldAccess(FieldAccess),
    FieldAssignment(FieldAssignment),
    MethodCall(MethodCall),
}

impl Expr {
    pub fn line(&self) -> u32 {
        match self {
            Expr::Literal(node) => node.line,
            Expr::Block(node) => node.line,
            Expr::LocalVarAccess(node) => node.line,
            Expr::LocalVarAssignment(node) => node.line,
            Expr::Fun(node) => node.line,
            Expr::FunCall(node) => node.line,
            Expr::Return(node) => node.line,
            Expr::If(node) => node.line,
            Expr::New(node) => node.line,
            Expr::FieldAccess(node) => node.line,
            Expr::FieldAssignment(node) => node.line,
            Expr::MethodCall(node) => node.line,
        }
    }
}

// Shorthand constructors for building trees by hand.
impl Expr {
    pub fn integer(value: i64, line: u32) -> Expr {
        Expr::Literal(Literal {
            value: LiteralValue::Integer(value),
            line,
        })
    }

    pub fn string(value: &str, line: u32) -> Expr {
        Expr::Literal(Literal {
            value: LiteralValue::String(value.into()),
            line,
        })
    }

    pub fn undefined(line: u32) -> Expr {
        Expr::Literal(Literal {
            value: LiteralValue::Undefined,
            line,
        })
    }

    pub fn block(instructions: Vec<Expr>, line: u32) -> Expr {
        Expr::Block(Block { instructions, line })
    }

    pub fn access(name: &str, line: u32) -> Expr {
        Expr::LocalVarAccess(LocalVarAccess {
            name: name.into(),
            line,
        })
    }

    pub fn declare(name: &str, expr: Expr, line: u32) -> Expr {
        Expr::LocalVarAssignment(LocalVarAssignment {
            name: name.into(),
            expr: Box::new(expr),
            declaration: true,
            line,
        })
    }

    pub fn assign(name: &str, expr: Expr, line: u32) -> Expr {
        Expr::LocalVarAssignment(LocalVarAssignment {
            name: name.into(),
            expr: Box::new(expr),
            declaration: false,
            line,
        })
    }

    pub fn fun(name: Option<&str>, parameters: &[&str], body: Expr, line: u32) -> Expr {
        Expr::Fun(Rc::new(Fun {
            name: name.map(CompactString::from),
            parameters: parameters.iter().map(|&p| p.into()).collect(),
            body,
            line,
        }))
    }

    pub fn call(qualifier: Expr, arguments: Vec<Expr>, line: u32) -> Expr {
        Expr::FunCall(FunCall {
            qualifier: Box::new(qualifier),
            arguments,
            line,
        })
    }

    /// A call to a function bound to `name`, such as a builtin operator.
    pub fn call_named(name: &str, arguments: Vec<Expr>, line: u32) -> Expr {
        Expr::call(Expr::access(name, line), arguments, line)
    }

    pub fn ret(expr: Expr, line: u32) -> Expr {
        Expr::Return(Return {
            expr: Box::new(expr),
            line,
        })
    }

    pub fn if_else(condition: Expr, true_branch: Expr, false_branch: Expr, line: u32) -> Expr {
        Expr::If(If {
            condition: Box::new(condition),
            true_branch: Box::new(true_branch),
            false_branch: Box::new(false_branch),
            line,
        })
    }

    pub fn new_object(initializers: Vec<(&str, Expr)>, line: u32) -> Expr {
        Expr::New(New {
            initializers: initializers
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
            line,
        })
    }
}

/// A whole program.
#[derive(Debug, Clone)]
pub struct Script {
    pub body: Block,
}
