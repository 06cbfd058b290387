use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::process;

use clap::Parser;

use rpal::fmt::format_tree;
use rpal::machine::{flatten, Machine};

/// Interpreter for the RPAL functional language.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// The RPAL program to run
    file: std::path::PathBuf,

    /// Print the abstract syntax tree and exit
    #[arg(long)]
    ast: bool,

    /// Print the standardized tree and exit
    #[arg(long)]
    st: bool,
}

/// Accept the traditional single-dash spellings of the tree flags.
fn normalized_args() -> Vec<OsString> {
    env::args_os()
        .map(|arg| match arg.to_str() {
            Some("-ast") => OsString::from("--ast"),
            Some("-st") => OsString::from("--st"),
            _ => arg,
        })
        .collect()
}

fn main() {
    if let Err(err) = run() {
        // Display, never Debug: a failure is exactly one line on stderr.
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_from(normalized_args());

    let source = fs::read_to_string(&cli.file)
        .map_err(|err| anyhow::anyhow!("cannot read {}: {err}", cli.file.display()))?;

    let tokens = rpal::lexer::lex(&source)?;
    let mut ast = rpal::parser::parse(tokens)?;
    if cli.ast {
        print!("{}", format_tree(&ast));
        return Ok(());
    }

    rpal::standardize::standardize(&mut ast)?;
    if cli.st {
        print!("{}", format_tree(&ast));
        return Ok(());
    }

    let table = flatten(&ast)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // The machine's final value is deliberately not printed; only Print
    // output reaches stdout.
    Machine::new(table, &mut out).run()?;
    Ok(())
}
