use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{ArgAction, Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use zympack_lexer::{Lexer, TokenKind};
use zympack_parser::ParseError;

use zympack_driver::{logging, BundleError, BundlerConfig, Compiler, Rewriter};

#[derive(Parser)]
#[command(
    name = "zympack",
    version = "0.1.0",
    about = "A minimal JavaScript module bundler",
    long_about = "Bundles a CommonJS module graph, starting from an entry file,\ninto one self-contained JavaScript file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bundle the project described by the configuration
    Build {
        /// Config file (default: ./zympack.config.json when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Entry module, relative to the project root
        #[arg(short, long)]
        entry: Option<String>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Output file name
        #[arg(short, long)]
        filename: Option<String>,

        /// More log output (-v info, -vv debug, -vvv trace)
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },

    /// Rewrite a single module and show its dependencies (debug)
    Rewrite {
        /// Input JavaScript file
        input: PathBuf,

        /// Canonical directory the module lives in
        #[arg(short, long, default_value = ".")]
        dir: String,
    },

    /// Parse a JavaScript file and show the AST (debug)
    Parse {
        /// Input JavaScript file
        input: PathBuf,
    },

    /// Lex a JavaScript file and show tokens (debug)
    Lex {
        /// Input JavaScript file
        input: PathBuf,

        /// Show token positions
        #[arg(short, long)]
        positions: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            entry,
            out_dir,
            filename,
            verbose,
        } => build_command(config, entry, out_dir, filename, verbose),
        Commands::Rewrite { input, dir } => rewrite_command(input, dir),
        Commands::Parse { input } => parse_command(input),
        Commands::Lex { input, positions } => lex_command(input, positions),
    }
}

fn build_command(
    config: Option<PathBuf>,
    entry: Option<String>,
    out_dir: Option<PathBuf>,
    filename: Option<String>,
    verbose: u8,
) -> ExitCode {
    logging::init(verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error resolving current directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut config = match BundlerConfig::discover(config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            report_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(entry) = entry {
        config.entry = entry;
    }
    if let Some(out_dir) = out_dir {
        // Taken from the working directory, like every other CLI path
        config.output.path = cwd.join(out_dir);
    }
    if let Some(filename) = filename {
        config.output.filename = filename;
    }

    let mut compiler = match Compiler::new(config) {
        Ok(compiler) => compiler,
        Err(e) => {
            report_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    match compiler.run() {
        Ok(compilation) => {
            for path in compilation.assets.keys() {
                println!(
                    "Bundled {} modules into {}",
                    compilation.graph.len(),
                    path.display()
                );
            }
            ExitCode::SUCCESS
        }
        Err(BundleError::Parse {
            module,
            source_text,
            errors,
        }) => {
            report_parse_errors(&errors, &module, &source_text);
            ExitCode::FAILURE
        }
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

fn rewrite_command(input: PathBuf, dir: String) -> ExitCode {
    let source = match read_source_file(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filename = input.to_string_lossy().to_string();

    match Rewriter::new().rewrite(&source, &dir) {
        Ok(rewritten) => {
            println!("{}", rewritten.code.trim_end());
            println!("{}", "=".repeat(80));
            println!("Dependencies ({}):", rewritten.dependencies.len());
            for dependency in &rewritten.dependencies {
                println!("  {}", dependency);
            }
            ExitCode::SUCCESS
        }
        Err(errors) => {
            report_parse_errors(&errors, &filename, &source);
            ExitCode::FAILURE
        }
    }
}

fn parse_command(input: PathBuf) -> ExitCode {
    let source = match read_source_file(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filename = input.to_string_lossy().to_string();

    match zympack_parser::parse(&source) {
        Ok(program) => {
            println!("{:#?}", program);
            ExitCode::SUCCESS
        }
        Err(errors) => {
            report_parse_errors(&errors, &filename, &source);
            ExitCode::FAILURE
        }
    }
}

fn lex_command(input: PathBuf, positions: bool) -> ExitCode {
    let source = match read_source_file(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filename = input.to_string_lossy().to_string();

    let tokens = Lexer::new(&source).tokenize();

    println!("Tokens for {}:\n", filename);
    println!("{}", "=".repeat(80));

    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Eof {
            println!("\n{:4} | {:?}", i, token.kind);
            break;
        }

        if positions {
            println!(
                "{:4} | {:20?} | {:?} | {}..{}",
                i, token.kind, token.value, token.span.start, token.span.end
            );
        } else {
            println!("{:4} | {:20?} | {:?}", i, token.kind, token.value);
        }
    }

    println!("{}", "=".repeat(80));
    println!("\nTotal tokens: {}", tokens.len());

    let errors: Vec<ParseError> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Error)
        .map(|t| ParseError::new(t.value.clone(), t.span))
        .collect();
    if !errors.is_empty() {
        println!("\nLexer errors found: {}", errors.len());
        report_parse_errors(&errors, &filename, &source);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// Helper functions

fn read_source_file(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Print an error and its chain of causes.
fn report_failure(error: &dyn Error) {
    eprintln!("Error: {}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}

fn report_parse_errors(errors: &[ParseError], filename: &str, source: &str) {
    for err in errors {
        report_error(
            "E0001",
            "Syntax error",
            &err.message,
            err.span.start,
            err.span.end,
            filename,
            source,
        );
    }
}

fn report_error(code: &str, title: &str, message: &str, start: usize, end: usize, filename: &str, source: &str) {
    let span = (filename, start..end);
    let printed = Report::build(ReportKind::Error, span.clone())
        .with_code(code)
        .with_message(title)
        .with_label(
            Label::new(span)
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)));

    if printed.is_err() {
        eprintln!("{}: {} at {}..{}", filename, message, start, end);
    }
}
