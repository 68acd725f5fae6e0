use super::SystemContext;
use crate::{
    object::{Invocation, Invoker, JsObject},
    value::{
        error::{RuntimeError, RuntimeErrorKind},
        Value,
    },
};
use std::{cmp::Ordering, rc::Rc};

pub trait NativeFunction {
    fn get_name(&self) -> &'static str;
    /// Exact argument count, `None` for variadic functions.
    fn get_arity(&self) -> Option<usize>;
    fn call(
        &self,
        arguments: &[Value],
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind>;
}

/// Adapts a builtin to the invocation capability of function objects.
///
/// Builtins have no definition site, so their errors carry the line of the call.
struct NativeInvoker {
    native: Box<dyn NativeFunction>,
}

impl Invoker for NativeInvoker {
    fn invoke(
        &self,
        invocation: Invocation<'_>,
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeError> {
        let line = invocation.line;
        if let Some(expected) = self.native.get_arity() {
            let actual = invocation.arguments.len();
            if actual != expected {
                return Err(RuntimeError::new(
                    RuntimeErrorKind::ArityMismatch {
                        name: self.native.get_name().into(),
                        expected,
                        actual,
                    },
                    line,
                ));
            }
        }
        self.native
            .call(&invocation.arguments, context)
            .map_err(|kind| RuntimeError::new(kind, line))
    }
}

#[derive(Debug)]
pub struct NativePrint;

impl NativeFunction for NativePrint {
    fn get_name(&self) -> &'static str {
        "print"
    }

    fn get_arity(&self) -> Option<usize> {
        None
    }

    fn call(
        &self,
        arguments: &[Value],
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        let text = arguments
            .iter()
            .map(|argument| argument.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(arguments = arguments.len(), %text, "print");
        context.writeln(&text);
        Ok(Value::Undefined)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

#[derive(Debug)]
pub struct NativeArithmetic(pub ArithmeticOperator);

impl NativeFunction for NativeArithmetic {
    fn get_name(&self) -> &'static str {
        match self.0 {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Remainder => "%",
        }
    }

    fn get_arity(&self) -> Option<usize> {
        Some(2)
    }

    fn call(
        &self,
        arguments: &[Value],
        _context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = (&arguments[0], &arguments[1]);
        match self.0 {
            ArithmeticOperator::Add => lhs.add(rhs),
            ArithmeticOperator::Subtract => lhs.subtract(rhs),
            ArithmeticOperator::Multiply => lhs.multiply(rhs),
            ArithmeticOperator::Divide => lhs.divide(rhs),
            ArithmeticOperator::Remainder => lhs.remainder(rhs),
        }
    }
}

/// `==` and `!=`, answering 1 or 0.
#[derive(Debug)]
pub struct NativeEquality {
    pub negated: bool,
}

impl NativeFunction for NativeEquality {
    fn get_name(&self) -> &'static str {
        if self.negated {
            "!="
        } else {
            "=="
        }
    }

    fn get_arity(&self) -> Option<usize> {
        Some(2)
    }

    fn call(
        &self,
        arguments: &[Value],
        _context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = (&arguments[0], &arguments[1]);
        let result = if self.negated {
            lhs.is_not_equal(rhs)
        } else {
            lhs.is_equal(rhs)
        };
        Ok(Value::from(result))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ComparisonOperator {
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

#[derive(Debug)]
pub struct NativeComparison(pub ComparisonOperator);

impl NativeFunction for NativeComparison {
    fn get_name(&self) -> &'static str {
        match self.0 {
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanEqual => ">=",
        }
    }

    fn get_arity(&self) -> Option<usize> {
        Some(2)
    }

    fn call(
        &self,
        arguments: &[Value],
        _context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind> {
        let ordering = arguments[0].compare(&arguments[1])?;
        let result = match self.0 {
            ComparisonOperator::LessThan => ordering == Ordering::Less,
            ComparisonOperator::LessThanEqual => ordering != Ordering::Greater,
            ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
            ComparisonOperator::GreaterThanEqual => ordering != Ordering::Less,
        };
        Ok(Value::from(result))
    }
}

fn register_native(environment: &JsObject, native: impl NativeFunction + 'static) {
    let name = native.get_name();
    let invoker = NativeInvoker {
        native: Box::new(native),
    };
    let function = JsObject::new_function(name, Rc::new(invoker));
    environment.register(name, Value::Object(function));
}

/// Builds the root environment every program starts in.
pub fn create_global_environment() -> JsObject {
    let globals = JsObject::new_environment(None);
    globals.register("global", Value::Object(globals.clone()));

    // Inject native functions here
    register_native(&globals, NativePrint);
    for operator in [
        ArithmeticOperator::Add,
        ArithmeticOperator::Subtract,
        ArithmeticOperator::Divide,
        ArithmeticOperator::Multiply,
        ArithmeticOperator::Remainder,
    ] {
        register_native(&globals, NativeArithmetic(operator));
    }
    register_native(&globals, NativeEquality { negated: false });
    register_native(&globals, NativeEquality { negated: true });
    for operator in [
        ComparisonOperator::LessThan,
        ComparisonOperator::LessThanEqual,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThanEqual,
    ] {
        register_native(&globals, NativeComparison(operator));
    }

    globals
}
