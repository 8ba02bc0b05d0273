use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use cfront::pipeline::{analyze, AnalysisOptions};
use clap::Parser;

/// Checks a source file: tokens, syntax, scopes and types.
#[derive(Parser, Debug)]
#[command(name = "cfront")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source file to check
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print the token sequence
    #[arg(long)]
    tokens: bool,

    /// Print the program re-serialized from the AST
    #[arg(long)]
    ast: bool,

    /// Print the AST as an indented outline
    #[arg(long)]
    tree: bool,

    /// Print the symbol table after scope resolution
    #[arg(long)]
    symbols: bool,

    /// Print every scope change made during resolution
    #[arg(long)]
    scope_history: bool,

    /// Log each stage
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let source = match read_to_string(&args.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading '{}': {}", args.input.display(), error);
            return ExitCode::FAILURE;
        }
    };
    let file_name = args.input.display().to_string();

    let start = Instant::now();
    let options = AnalysisOptions {
        record_scope_history: args.scope_history,
    };
    let analysis = analyze(&source, &options);
    log::info!("analyzed {} in {:?}", file_name, start.elapsed());

    if args.tokens {
        for token in &analysis.tokens {
            println!("{}", token.debug());
        }
    }

    if let Some(program) = &analysis.program {
        if args.ast {
            print!("{}", program);
        }
        if args.tree {
            print!("{}", program.tree());
        }
    }

    if let Some(symbols) = &analysis.symbols {
        if args.symbols {
            println!("{}", symbols.report());
        }
        if let Some(history) = symbols.history() {
            println!("{}", history.report());
        }
    }

    for error in analysis.errors() {
        eprintln!("{}", error.render(&source, &file_name));
    }

    if analysis.is_clean() {
        println!("{}: no errors", file_name);
        ExitCode::SUCCESS
    } else {
        println!(
            "{}: {} lexical, {} syntax, {} scope, {} type errors",
            file_name,
            analysis.lexical_errors.len(),
            usize::from(analysis.syntax_error.is_some()),
            analysis.scope_errors.len(),
            analysis.type_errors.len()
        );
        ExitCode::FAILURE
    }
}
