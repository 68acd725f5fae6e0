pub mod context;
mod native;
mod tree;

use crate::value::Value;
pub use native::create_global_environment;
pub use tree::{TreeWalkEvaluator, TreeWalkInterpreter};

/// How evaluating a node finished.
///
/// `Return` unwinds through every enclosing node until the function invocation that started
/// the current call turns it back into a plain value.
#[derive(Debug)]
pub enum Completion {
    Normal(Value),
    Return(Value),
}

impl Completion {
    pub fn into_value(self) -> Value {
        match self {
            Completion::Normal(value) | Completion::Return(value) => value,
        }
    }
}

/// The output sink of the `print` builtin.
pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}
