use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PEBBLE_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[clap(name = "pebble", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: PebbleCommand,
}

#[derive(Debug, Subcommand)]
pub enum PebbleCommand {
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ScriptFormat,
    },
    Run {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "pretty")]
        format: ErrorFormat,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ScriptFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ErrorFormat {
    Basic,
    Pretty,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    install_tracing();
    let args = CLArgs::parse();
    match args.routine {
        PebbleCommand::Tokenize { path, format } => {
            tracing::info!(?path, "tokenizing");
            let src = read_to_string(path)?;
            if !tokenize(&src, &format) {
                return Ok(ExitCode::from(65));
            }
        }
        PebbleCommand::Parse { path, format } => {
            tracing::info!(?path, "parsing");
            let src = read_to_string(path)?;
            if !parse(&src, &format) {
                return Ok(ExitCode::from(65));
            }
        }
        PebbleCommand::Run { path, format } => {
            tracing::info!(?path, "running");
            let src = read_to_string(&path)?;
            return Ok(run(&src, &path, &format));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn install_tracing() {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|expr| EnvFilter::try_new(expr).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn tokenize(src: &str, format: &TokenFormat) -> bool {
    use pebble::lexer::formatter::{BasicFormatter, DebugFormatter, TokenFormatter};
    use pebble::lexer::{Lexer, TokenKind};

    let mut scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugFormatter),
        TokenFormat::Basic => Box::new(BasicFormatter),
    };
    let mut succeeded = true;
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    return succeeded;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        }
    }
}

fn parse(src: &str, format: &ScriptFormat) -> bool {
    use pebble::ast::formatter::{DebugFormatter, SExpressionFormatter, ScriptFormatter};
    use pebble::parser::Parser;

    let mut parser = Parser::new(src);
    let formatter: Box<dyn ScriptFormatter> = match format {
        ScriptFormat::Debug => Box::new(DebugFormatter),
        ScriptFormat::SExpr => Box::new(SExpressionFormatter),
    };
    match parser.parse() {
        Ok(script) => {
            println!("{}", formatter.format(&script));
            true
        }
        Err(error) => {
            eprintln!("{}", formatter.format_error(&error));
            false
        }
    }
}

fn run(src: &str, path: &Path, format: &ErrorFormat) -> ExitCode {
    use pebble::interpreter::{context::StdioContext, TreeWalkInterpreter};
    use pebble::parser::{formatter as parser_formatter, formatter::ParserFormatter, Parser};
    use pebble::value::formatter::{self as value_formatter, ValueFormatter};

    let mut parser = Parser::new(src);
    let script = match parser.parse() {
        Ok(script) => script,
        Err(error) => {
            let message = match format {
                ErrorFormat::Basic => parser_formatter::BasicFormatter.format_error(&error),
                ErrorFormat::Pretty => {
                    parser_formatter::PrettyFormatter::new(src, path).format_error(&error)
                }
            };
            eprintln!("{message}");
            return ExitCode::from(65);
        }
    };

    let interpreter = TreeWalkInterpreter::new(StdioContext);
    match interpreter.run(&script) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            let message = match format {
                ErrorFormat::Basic => value_formatter::BasicFormatter.format_error(&error),
                ErrorFormat::Pretty => {
                    value_formatter::PrettyFormatter::new(src, path).format_error(&error)
                }
            };
            eprintln!("{message}");
            ExitCode::from(70)
        }
    }
}
