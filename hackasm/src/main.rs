//! Hack Assembler - Main Entry Point
//!
//! Translates Hack assembly (`Nand2Tetris` Project 6) into 16-bit machine
//! words, via a single forward pass with deferred symbol resolution (see
//! [`hackasm::assembler`]).
//!
//! # Usage
//! ```bash
//! hackasm <input.asm> [output.hack]
//! ```
//!
//! # Exit codes
//! - `1`: wrong number of arguments
//! - `2`: input file does not exist or cannot be opened
//! - `3`: input file does not have a `.asm` suffix
//! - `4`: output path exists and is not a file

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};

/// Reads an assembly file into memory, one source line per entry.
fn read_lines(path: &str) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
    let reader = BufReader::new(file);
    reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("cannot read {path}"))
}

/// Determines the output file path, defaulting to the input's `.asm` to
/// `.hack` suffix swap when no explicit output is given.
fn output_path(input: &str, explicit_output: Option<&str>) -> String {
    explicit_output.map_or_else(
        || input.replace(".asm", ".hack"),
        std::string::ToString::to_string,
    )
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <input.asm> [output.hack]");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {program} Add.asm");
    eprintln!("  {program} Add.asm Add.hack");
    process::exit(1);
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .env()
        .init()
        .expect("logger must initialize exactly once");

    let args: Vec<String> = env::args().collect();
    if !(2..=3).contains(&args.len()) {
        usage(&args[0]);
    }

    let input_path = &args[1];
    if !Path::new(input_path).is_file() {
        eprintln!("No such file: {input_path}");
        process::exit(2);
    }
    if !input_path.ends_with(".asm") {
        eprintln!("Input file must have a .asm suffix: {input_path}");
        process::exit(3);
    }

    let output = output_path(input_path, args.get(2).map(String::as_str));
    if Path::new(&output).exists() && !Path::new(&output).is_file() {
        eprintln!("Output path exists and is not a file: {output}");
        process::exit(4);
    }

    log::info!("assembling {input_path}");
    let lines = read_lines(input_path)?;
    let words = hackasm::assemble(&lines)?;

    let output_file = File::create(&output).with_context(|| format!("cannot create {output}"))?;
    let mut writer = BufWriter::new(output_file);
    for word in &words {
        writeln!(writer, "{word}")?;
    }
    writer.flush()?;

    log::info!("wrote {} instructions to {output}", words.len());
    println!("Assembly completed. Output written to {output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_generation() {
        assert_eq!(output_path("test.asm", None), "test.hack");
        assert_eq!(output_path("test.asm", Some("custom.hack")), "custom.hack");
        assert_eq!(output_path("dir/file.asm", None), "dir/file.hack");
        assert_eq!(output_path("path/to/file.asm", None), "path/to/file.hack");
    }

    #[test]
    fn test_output_path_explicit() {
        assert_eq!(output_path("any.asm", Some("out.hack")), "out.hack");
        assert_eq!(
            output_path("any.asm", Some("path/to/out.hack")),
            "path/to/out.hack"
        );
    }
}
