use color_eyre::eyre::{Context, Result};
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use pebble::{
    ast::{
        formatter::{SExpressionFormatter, ScriptFormatter},
        Expr, LiteralValue,
    },
    parser::{
        formatter::{BasicFormatter, ParserFormatter},
        Parser, ParserErrorKind,
    },
};

fn check(input: &str, expected: &str, test_name: &str) {
    let mut parser = Parser::new(input);
    let actual = match parser.parse() {
        Ok(ref script) => SExpressionFormatter.format(script),
        Err(ref e) => BasicFormatter.format_error(e),
    };

    assert_eq!(actual, expected, "Failed the test {test_name}");
}

#[test]
fn smoke_test() {
    check("", "", "smoke");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/parser/in");
    let output_dir = Path::new("./test_data/parser/out");

    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "pbl" {
            continue;
        }

        let test_name = AsRef::<Path>::as_ref(
            path.file_name()
                .expect("File name can't be none as the path is to a real file."),
        );

        let input = read_to_string(&path).context("Failed to open input test data file")?;

        let expected = {
            let output_file_name = test_name.with_extension("txt");
            let output_path = output_dir.join(output_file_name);
            read_to_string(&output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            succeeded = false;
        }
    }

    assert!(succeeded, "Some parser test cases failed");
    Ok(())
}

#[test]
fn nodes_carry_their_line() {
    let mut parser = Parser::new("(var x\n  (+ 1\n     2))");
    let Expr::LocalVarAssignment(assignment) = parser.parse_expression().unwrap() else {
        panic!("expected a declaration");
    };
    assert!(assignment.declaration);
    assert_eq!(assignment.line, 1);
    let Expr::FunCall(ref call) = *assignment.expr else {
        panic!("expected a call");
    };
    assert_eq!(call.line, 2);
    assert_eq!(call.arguments[1].line(), 3);
}

#[test]
fn undefined_is_a_literal() {
    let mut parser = Parser::new("undefined");
    assert!(matches!(
        parser.parse_expression().unwrap(),
        Expr::Literal(ref literal) if matches!(literal.value, LiteralValue::Undefined)
    ));
}

#[test]
fn fun_body_is_a_block() {
    let mut parser = Parser::new("(fun f (a) (print a) (return a))");
    let Expr::Fun(fun) = parser.parse_expression().unwrap() else {
        panic!("expected a function");
    };
    assert_eq!(fun.name.as_deref(), Some("f"));
    assert_eq!(fun.parameters.len(), 1);
    let Expr::Block(ref body) = fun.body else {
        panic!("expected a block body");
    };
    assert_eq!(body.instructions.len(), 2);
}

#[test]
fn new_keeps_initializer_order() {
    let mut parser = Parser::new("(new (b 1) (a 2) (c 3))");
    let Expr::New(new) = parser.parse_expression().unwrap() else {
        panic!("expected an object literal");
    };
    let names: Vec<&str> = new
        .initializers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn parse_error_codes() {
    let cases = [
        ("(var 1 2)", "PA002"),
        (")", "PA003"),
        ("(print", "PA004"),
        ("()", "PA005"),
        ("(if 1)", "PA006"),
        ("(new (a 1) (a 2))", "PA007"),
        ("\"open", "LX001"),
        ("(fun f x)", "PA001"),
    ];
    for (source, code) in cases {
        let error = Parser::new(source).parse().unwrap_err();
        assert_eq!(error.code(), code, "wrong code for {source}");
    }
}

#[test]
fn set_requires_a_value() {
    let error = Parser::new("(set x)").parse().unwrap_err();
    assert!(matches!(
        error.kind,
        ParserErrorKind::MalformedForm { form: "set", .. }
    ));
}
