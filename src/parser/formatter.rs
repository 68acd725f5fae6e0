use super::{ParserError, ParserErrorKind};
use crate::lexer::LineBreaks;
use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ParserFormatter {
    fn format_error(&self, error: &ParserError) -> String;
}

/// `[line N] Error: message`, one line per error.
pub struct BasicFormatter;

impl ParserFormatter for BasicFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        let line = error.line;
        match error.kind {
            ParserErrorKind::LexicalError(ref e) => format!("[line {line}] Error: {}", e.kind),
            ref kind => format!("[line {line}] Error: {kind}"),
        }
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
}

impl<'src> ParserFormatter for PrettyFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let path = self.path.to_string_lossy();
        let path = path.as_ref();
        let range = self.line_breaks.get_range(error.line);
        let label = match error.kind {
            ParserErrorKind::LexicalError(ref e) => format!("{}", e.kind),
            ref kind => format!("{kind}"),
        };

        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_code(error.code())
            .with_message("Could not read the program")
            .with_label(
                Label::new((path, range))
                    .with_message(label.fg(Color::BrightRed))
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
    use crate::parser::Parser;

    #[test]
    fn basic_error_is_line_then_message() {
        let error = Parser::new("(print 1)\n()").parse().unwrap_err();
        assert_eq!(
            BasicFormatter.format_error(&error),
            "[line 2] Error: Encountered an empty form `()`."
        );
    }

    #[test]
    fn pretty_error_locates_line_after_multibyte_text() {
        let source = "(print \"\u{3bb}\u{3bb}\u{2192}\")\n(print 1\n  ())";
        let path = Path::new("broken.pbl");
        let error = Parser::new(source).parse().unwrap_err();
        let report = PrettyFormatter::new(source, path).format_error(&error);
        assert!(report.contains("PA005"), "{report}");
        assert!(report.contains("broken.pbl:3:1"), "{report}");
    }
}
