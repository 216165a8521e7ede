//! Jack Parser - Main Entry Point
//!
//! Parses one or more `.jack` source files and reports the top-level
//! items found in each. Pretty-printing and code generation are out of
//! scope: this is a syntax checker, not a compiler.
//!
//! # Usage
//! ```bash
//! jackc <file.jack>...
//! ```
//!
//! # Exit codes
//! - `1`: no file arguments given
//! - `2`: an argument does not name a file
//! - `3`: a file failed to parse

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use jack::ast::TopLevel;
use jack::Parser;

fn describe(item: &TopLevel) -> String {
    match item {
        TopLevel::Import(i) => format!(
            "import {}",
            i.path.iter().map(|t| t.lexeme.as_str()).collect::<Vec<_>>().join(".")
        ),
        TopLevel::TypeAlias(t) => format!("type alias {}", t.name.lexeme),
        TopLevel::Class(c) => format!("class {}", c.name.lexeme),
        TopLevel::Generic(g) => format!("generic class {}[{}]", g.class.name.lexeme, g.type_params.len()),
    }
}

fn parse_file(path: &Path) -> Result<()> {
    let src = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    log::info!("parsing {}", path.display());
    let mut parser = Parser::new(&src).with_context(|| format!("lexing {}", path.display()))?;
    let items = parser.parse_program().with_context(|| format!("parsing {}", path.display()))?;
    for item in &items {
        println!("{}: {}", path.display(), describe(item));
    }
    log::info!("parsed {} top-level item(s) in {}", items.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .env()
        .init()
        .expect("logger must initialize exactly once");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.jack>...", args[0]);
        process::exit(1);
    }

    let mut failed = false;
    for arg in &args[1..] {
        let path = Path::new(arg);
        if !path.is_file() {
            eprintln!("Not a file: {}", path.display());
            process::exit(2);
        }
        if let Err(err) = parse_file(path) {
            eprintln!("{err:#}");
            failed = true;
        }
    }

    if failed {
        process::exit(3);
    }
    Ok(())
}
