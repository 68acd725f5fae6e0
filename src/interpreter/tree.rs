use std::rc::Rc;

use super::{native::create_global_environment, Completion, SystemContext};
use crate::{
    ast::{
        Block, Expr, FieldAccess, FieldAssignment, Fun, FunCall, If, LocalVarAssignment,
        MethodCall, New, Return, Script,
    },
    object::{Invocation, Invoker, JsObject},
    value::{
        error::{RuntimeError, RuntimeErrorKind},
        Value,
    },
};

/// Unwraps a normal completion, handing a `Return` straight back to the caller.
macro_rules! normal {
    ($completion:expr) => {
        match $completion {
            Completion::Normal(value) => value,
            state @ Completion::Return(_) => return Ok(state),
        }
    };
}

pub struct TreeWalkInterpreter<C: SystemContext> {
    environment: JsObject,
    context: C,
    evaluator: TreeWalkEvaluator,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self {
            environment: create_global_environment(),
            context,
            evaluator: TreeWalkEvaluator,
        }
    }

    pub fn get_environment(&self) -> &JsObject {
        &self.environment
    }

    /// Evaluates one expression in the global environment.
    ///
    /// A `return` that reaches this level has no function to leave and is an error.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match self
            .evaluator
            .evaluate(&self.environment, &mut self.context, expr)?
        {
            Completion::Normal(value) => Ok(value),
            Completion::Return(_) => Err(RuntimeError::new(
                RuntimeErrorKind::ReturnOutsideFunction,
                expr.line(),
            )),
        }
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn run(mut self, script: &Script) -> Result<C, RuntimeError> {
        for instruction in script.body.instructions.iter() {
            self.evaluate(instruction)?;
        }
        Ok(self.context)
    }
}

pub struct TreeWalkEvaluator;

impl TreeWalkEvaluator {
    pub fn evaluate(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        expr: &Expr,
    ) -> Result<Completion, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(Completion::Normal(Value::from(&literal.value))),
            Expr::Block(block) => self.evaluate_block(environment, context, block),
            Expr::LocalVarAccess(access) => Ok(Completion::Normal(environment.lookup(&access.name))),
            Expr::LocalVarAssignment(assignment) => {
                self.evaluate_local_assignment(environment, context, assignment)
            }
            Expr::Fun(fun) => Ok(Completion::Normal(self.evaluate_fun(environment, fun))),
            Expr::FunCall(call) => self.evaluate_call(environment, context, call),
            Expr::Return(ret) => self.evaluate_return(environment, context, ret),
            Expr::If(branch) => self.evaluate_if(environment, context, branch),
            Expr::New(new) => self.evaluate_new(environment, context, new),
            Expr::FieldAccess(access) => self.evaluate_field_access(environment, context, access),
            Expr::FieldAssignment(assignment) => {
                self.evaluate_field_assignment(environment, context, assignment)
            }
            Expr::MethodCall(call) => self.evaluate_method_call(environment, context, call),
        }
    }

    fn evaluate_block(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        block: &Block,
    ) -> Result<Completion, RuntimeError> {
        for instruction in block.instructions.iter() {
            normal!(self.evaluate(environment, context, instruction)?);
        }
        Ok(Completion::Normal(Value::Undefined))
    }

    fn evaluate_local_assignment(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        assignment: &LocalVarAssignment,
    ) -> Result<Completion, RuntimeError> {
        let name = &assignment.name;
        let visible = !environment.lookup(name).is_undefined();
        if !assignment.declaration && !visible {
            return Err(RuntimeError::new(
                RuntimeErrorKind::UnboundVariable(name.clone()),
                assignment.line,
            ));
        }
        if assignment.declaration && visible {
            return Err(RuntimeError::new(
                RuntimeErrorKind::AlreadyDeclared(name.clone()),
                assignment.line,
            ));
        }
        let value = normal!(self.evaluate(environment, context, &assignment.expr)?);
        environment.register(name, value);
        Ok(Completion::Normal(Value::Undefined))
    }

    fn evaluate_fun(&self, environment: &JsObject, fun: &Rc<Fun>) -> Value {
        let name = fun.name.as_deref().unwrap_or("lambda");
        let invoker = ClosureInvoker {
            declaration: fun.clone(),
            environment: environment.clone(),
        };
        let function = Value::Object(JsObject::new_function(name, Rc::new(invoker)));
        // Named functions can see themselves, which is what makes recursion work.
        if let Some(ref name) = fun.name {
            environment.register(name, function.clone());
        }
        function
    }

    fn evaluate_arguments(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        arguments: &[Expr],
    ) -> Result<Result<Vec<Value>, Completion>, RuntimeError> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments.iter() {
            match self.evaluate(environment, context, argument)? {
                Completion::Normal(value) => values.push(value),
                state @ Completion::Return(_) => return Ok(Err(state)),
            }
        }
        Ok(Ok(values))
    }

    fn evaluate_call(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        call: &FunCall,
    ) -> Result<Completion, RuntimeError> {
        let qualifier = normal!(self.evaluate(environment, context, &call.qualifier)?);
        let function = match qualifier {
            Value::Object(ref object) if object.is_function() => object.clone(),
            v => {
                return Err(RuntimeError::new(
                    RuntimeErrorKind::InvalidCallee(v),
                    call.line,
                ));
            }
        };
        let arguments = match self.evaluate_arguments(environment, context, &call.arguments)? {
            Ok(arguments) => arguments,
            Err(state) => return Ok(state),
        };
        let result = function.invoke(Value::Undefined, arguments, call.line, context)?;
        Ok(Completion::Normal(result))
    }

    fn evaluate_return(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        ret: &Return,
    ) -> Result<Completion, RuntimeError> {
        let value = normal!(self.evaluate(environment, context, &ret.expr)?);
        Ok(Completion::Return(value))
    }

    fn evaluate_if(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        branch: &If,
    ) -> Result<Completion, RuntimeError> {
        let condition = normal!(self.evaluate(environment, context, &branch.condition)?);
        if condition.is_truthy() {
            self.evaluate(environment, context, &branch.true_branch)
        } else {
            self.evaluate(environment, context, &branch.false_branch)
        }
    }

    fn evaluate_new(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        new: &New,
    ) -> Result<Completion, RuntimeError> {
        let object = JsObject::new_object(None);
        for (name, initializer) in new.initializers.iter() {
            let value = normal!(self.evaluate(environment, context, initializer)?);
            object.register(name, value);
        }
        Ok(Completion::Normal(Value::Object(object)))
    }

    fn expect_object(value: Value, line: u32) -> Result<JsObject, RuntimeError> {
        match value {
            Value::Object(object) => Ok(object),
            v => Err(RuntimeError::new(RuntimeErrorKind::InvalidReceiver(v), line)),
        }
    }

    fn evaluate_field_access(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        access: &FieldAccess,
    ) -> Result<Completion, RuntimeError> {
        let receiver = normal!(self.evaluate(environment, context, &access.receiver)?);
        let object = Self::expect_object(receiver, access.line)?;
        Ok(Completion::Normal(object.lookup(&access.name)))
    }

    fn evaluate_field_assignment(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        assignment: &FieldAssignment,
    ) -> Result<Completion, RuntimeError> {
        let receiver = normal!(self.evaluate(environment, context, &assignment.receiver)?);
        let object = Self::expect_object(receiver, assignment.line)?;
        let value = normal!(self.evaluate(environment, context, &assignment.expr)?);
        object.register(&assignment.name, value);
        Ok(Completion::Normal(Value::Undefined))
    }

    fn evaluate_method_call(
        &self,
        environment: &JsObject,
        context: &mut dyn SystemContext,
        call: &MethodCall,
    ) -> Result<Completion, RuntimeError> {
        let receiver = normal!(self.evaluate(environment, context, &call.receiver)?);
        let object = Self::expect_object(receiver.clone(), call.line)?;
        let method = match object.lookup(&call.name) {
            Value::Object(method) if method.is_function() => method,
            v => {
                return Err(RuntimeError::new(
                    RuntimeErrorKind::InvalidCallee(v),
                    call.line,
                ));
            }
        };
        let arguments = match self.evaluate_arguments(environment, context, &call.arguments)? {
            Ok(arguments) => arguments,
            Err(state) => return Ok(state),
        };
        let result = method.invoke(receiver, arguments, call.line, context)?;
        Ok(Completion::Normal(result))
    }
}

/// The invocation capability of functions defined in the program.
struct ClosureInvoker {
    declaration: Rc<Fun>,
    /// The environment the function was defined in, not the one it is called from.
    environment: JsObject,
}

impl Invoker for ClosureInvoker {
    fn invoke(
        &self,
        invocation: Invocation<'_>,
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeError> {
        let declaration = &self.declaration;
        let name = invocation.function.name().unwrap_or_default();
        tracing::trace!(function = %name, arguments = invocation.arguments.len(), "invoke");

        if invocation.arguments.len() != declaration.parameters.len() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::ArityMismatch {
                    name,
                    expected: declaration.parameters.len(),
                    actual: invocation.arguments.len(),
                },
                declaration.line,
            ));
        }

        let scope = JsObject::new_environment(Some(&self.environment));
        scope.register("this", invocation.receiver);
        for (parameter, argument) in declaration.parameters.iter().zip(invocation.arguments) {
            scope.register(parameter, argument);
        }

        let completion = TreeWalkEvaluator.evaluate(&scope, context, &declaration.body)?;
        Ok(completion.into_value())
    }
}
