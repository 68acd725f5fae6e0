use super::error::{RuntimeError, RuntimeErrorKind};
use super::Value;
use crate::lexer::LineBreaks;
use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    fn format_error(&self, error: &RuntimeError) -> String;
}

/// `(line) message`, the format test expectations are written in.
pub struct BasicFormatter;

impl BasicFormatter {
    fn format_verbose(value: &Value) -> String {
        match value {
            Value::Undefined => "Undefined".into(),
            Value::Integer(v) => format!("Integer({v})"),
            Value::String(v) => format!("String(\"{v}\")"),
            Value::Object(object) => match object.name() {
                Some(name) => format!("Function({name})"),
                None => format!("Object({object})"),
            },
        }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format_error(&self, error: &RuntimeError) -> String {
        let line = error.line;
        format!("({line}) {}", error.kind)
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
    line_breaks: LineBreaks,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self {
            text,
            path,
            line_breaks: LineBreaks::new(text),
        }
    }

    fn describe(kind: &RuntimeErrorKind) -> (&'static str, String) {
        match kind {
            RuntimeErrorKind::UnboundVariable(name) => (
                "Attempted to assign a variable that has not been declared",
                format!("{} has no visible binding.", name.fg(Color::BrightRed)),
            ),
            RuntimeErrorKind::AlreadyDeclared(name) => (
                "Attempted to declare a variable that is already visible",
                format!("{} is already declared.", name.fg(Color::BrightRed)),
            ),
            RuntimeErrorKind::ArityMismatch {
                name,
                expected,
                actual,
            } => (
                "Attempted to call a function with the wrong number of arguments",
                format!(
                    "{} has {} parameters but got {} arguments instead.",
                    name.fg(Color::BrightYellow),
                    expected.fg(Color::BrightCyan),
                    actual.fg(Color::BrightRed),
                ),
            ),
            RuntimeErrorKind::InvalidCallee(callee) => (
                "Attempted to call a value that is not a function",
                format!(
                    "{} is not callable.",
                    BasicFormatter::format_verbose(callee).fg(Color::BrightRed)
                ),
            ),
            RuntimeErrorKind::InvalidReceiver(receiver) => (
                "Attempted to access a field of a value that is not an object",
                format!(
                    "{} has no fields.",
                    BasicFormatter::format_verbose(receiver).fg(Color::BrightRed)
                ),
            ),
            RuntimeErrorKind::NonNumerics(lhs, rhs) => (
                "Expected both operands to be integers",
                format!(
                    "One or both of {} and {} is not an integer",
                    BasicFormatter::format_verbose(lhs).fg(Color::BrightRed),
                    BasicFormatter::format_verbose(rhs).fg(Color::BrightRed),
                ),
            ),
            RuntimeErrorKind::NonComparable(lhs, rhs) => (
                "Expected two integers or two strings",
                format!(
                    "{} and {} can not be ordered",
                    BasicFormatter::format_verbose(lhs).fg(Color::BrightRed),
                    BasicFormatter::format_verbose(rhs).fg(Color::BrightRed),
                ),
            ),
            RuntimeErrorKind::DivisionByZero => (
                "Attempted to divide by zero",
                "The divisor is zero.".into(),
            ),
            RuntimeErrorKind::ReturnOutsideFunction => (
                "Attempted to return outside of a function",
                "There is no function to return from.".into(),
            ),
        }
    }
}

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format_error(&self, error: &RuntimeError) -> String {
        let path = self.path.to_string_lossy();
        let path = path.as_ref();
        let range = self.line_breaks.get_range(error.line);
        let (message, label) = Self::describe(&error.kind);

        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_code(error.code())
            .with_message(message)
            .with_label(
                Label::new((path, range))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_error_is_line_then_message() {
        let error = RuntimeError::new(RuntimeErrorKind::UnboundVariable("x".into()), 3);
        assert_eq!(BasicFormatter.format_error(&error), "(3) no variable x defined");
    }

    #[test]
    fn pretty_error_mentions_code_and_message() {
        let source = "(var x 1)\n(set y 2)\n";
        let path = Path::new("test.pbl");
        let formatter = PrettyFormatter::new(source, path);
        let error = RuntimeError::new(RuntimeErrorKind::UnboundVariable("y".into()), 2);
        let report = formatter.format_error(&error);
        assert!(report.contains("RT001"));
        assert!(report.contains("has not been declared"));
    }

    #[test]
    fn pretty_error_locates_line_after_multibyte_text() {
        let source = "(print \"\u{e9}\u{e9}\u{e9}\u{e9}\u{2026}\")\n(set y 2)\n";
        let path = Path::new("test.pbl");
        let formatter = PrettyFormatter::new(source, path);
        let error = RuntimeError::new(RuntimeErrorKind::UnboundVariable("y".into()), 2);
        let report = formatter.format_error(&error);
        assert!(report.contains("test.pbl:2:1"), "{report}");
        assert!(report.contains("has no visible binding"), "{report}");
    }
}
