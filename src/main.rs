//! uilc CLI entry point.
//!
//! Usage:
//!   uilc                 (compile the built-in sample with instrumentation)
//!   uilc lex <file.uil>    (dump tokens)
//!   uilc parse <file.uil>  (dump the syntax tree)
//!   uilc emit <file.uil>   (print the emitted IL)

use std::{env, fs, process};

use uilc::diagnostics::DiagnosticBag;
use uilc::errors::SourceError;
use uilc::instrument::ConsoleInstrumentation;
use uilc::lexer::Lexer;
use uilc::parser::SyntaxTree;

const SAMPLE: &str = "int Add(int a, int b) { return a + b; }";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        run_sample();
        return;
    }

    if args.len() < 3 {
        eprintln!("Usage: uilc [lex|parse|emit] <file.uil>");
        process::exit(64);
    }

    let command = &args[1];
    let filename = &args[2];

    let source = match fs::read_to_string(filename) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {}", filename, e);
            process::exit(74);
        }
    };

    match command.as_str() {
        "lex" => {
            let mut lexer = Lexer::new(&source);
            for token in lexer.scan_tokens() {
                println!("{:?}", token);
            }
            report(lexer.diagnostics(), &source);
        }
        "parse" => {
            let tree = SyntaxTree::parse(&source);
            println!("{:#?}", tree.root);
            report(&tree.diagnostics, &source);
        }
        "emit" => match uilc::compile(&source) {
            Ok(compilation) => {
                report(&compilation.diagnostics, &source);
                print!("{}", compilation.il());
            }
            Err(e) => {
                eprintln!("Compilation error: {}", e);
                process::exit(65);
            }
        },
        _ => {
            eprintln!("Unknown command: {}", command);
            process::exit(64);
        }
    }
}

/// Compile the hardcoded sample under console instrumentation.
fn run_sample() {
    println!("Compiling: {SAMPLE}");
    let instrumentation = ConsoleInstrumentation;
    match uilc::compile_with(SAMPLE, Some(&instrumentation)) {
        Ok(compilation) => {
            report(&compilation.diagnostics, SAMPLE);
            println!("Generated IL:");
            print!("{}", compilation.il());
        }
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            process::exit(65);
        }
    }
}

/// Print diagnostics: fancy miette output for located ones, plain text
/// otherwise. Exits with a failure code if any are present.
fn report(diagnostics: &DiagnosticBag, source: &str) {
    if diagnostics.is_empty() {
        return;
    }
    for diagnostic in diagnostics {
        match SourceError::from_diagnostic(diagnostic, source) {
            Some(error) => eprintln!("{:?}", miette::Report::new(error)),
            None => eprintln!("{}", diagnostic),
        }
    }
    process::exit(65);
}
