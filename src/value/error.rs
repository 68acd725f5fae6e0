use super::Value;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("no variable {0} defined")]
    UnboundVariable(CompactString),
    #[error("variable {0} already defined")]
    AlreadyDeclared(CompactString),
    #[error("wrong number of arguments for {name}: expected {expected} but got {actual}")]
    ArityMismatch {
        name: CompactString,
        expected: usize,
        actual: usize,
    },
    #[error("type error {0} is not a function")]
    InvalidCallee(Value),
    #[error("type error {0} is not an object")]
    InvalidReceiver(Value),
    #[error("type error [{0}, {1}] are not both integers")]
    NonNumerics(Value, Value),
    #[error("type error [{0}, {1}] can not be ordered")]
    NonComparable(Value, Value),
    #[error("division by zero")]
    DivisionByZero,
    #[error("return outside of a function")]
    ReturnOutsideFunction,
}

/// The single failure category of evaluation, tagged with the line of the failing node.
///
/// The kind is boxed so every `Result` on the evaluation path stays two words wide.
#[derive(Debug, Error, Clone)]
#[error("[line {line}] {kind}")]
pub struct RuntimeError {
    pub kind: Box<RuntimeErrorKind>,
    pub line: u32,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, line: u32) -> Self {
        Self {
            kind: Box::new(kind),
            line,
        }
    }

    pub fn code(&self) -> &'static str {
        match *self.kind {
            RuntimeErrorKind::UnboundVariable(_) => "RT001",
            RuntimeErrorKind::AlreadyDeclared(_) => "RT002",
            RuntimeErrorKind::ArityMismatch { .. } => "RT003",
            RuntimeErrorKind::InvalidCallee(_) => "RT004",
            RuntimeErrorKind::InvalidReceiver(_) => "RT005",
            RuntimeErrorKind::NonNumerics(_, _) => "RT006",
            RuntimeErrorKind::NonComparable(_, _) => "RT007",
            RuntimeErrorKind::DivisionByZero => "RT008",
            RuntimeErrorKind::ReturnOutsideFunction => "RT009",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_is_two_words() {
        assert_eq!(
            std::mem::size_of::<RuntimeError>(),
            2 * std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn codes_follow_the_kind() {
        let error = RuntimeError::new(RuntimeErrorKind::DivisionByZero, 1);
        assert_eq!(error.code(), "RT008");
        assert_eq!(error.to_string(), "[line 1] division by zero");
    }
}
