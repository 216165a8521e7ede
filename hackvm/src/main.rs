//! Hack VM Translator - Main Entry Point
//!
//! Lowers Hack VM intermediate language (`Nand2Tetris` Project 7/8) into
//! Hack assembly. Given a single `.vm` file, translates it (plus whatever
//! `.vm` files on the search path are needed to resolve its calls) into a
//! matching `.asm` file. Given a directory, translates every `.vm` file in
//! it whose name starts with an uppercase letter, each into its own `.asm`
//! file alongside it.
//!
//! # Usage
//! ```bash
//! hackvm <input.vm|input-dir>
//! ```
//!
//! Additional modules to resolve calls against are searched for in the
//! input file's own directory, plus every directory named in the
//! colon-separated `HACK_VM_PATHS` environment variable.
//!
//! # Exit codes
//! - `1`: wrong number of arguments
//! - `2`: input path does not exist
//! - `3`: input file name is not of the form `[A-Z].*\.vm`
//! - `4`: output path exists and is not a file
//! - `5`: a path named in `HACK_VM_PATHS` does not exist

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{anyhow, Context, Result};

const PATH_ENV: &str = "HACK_VM_PATHS";

/// Directories to search for modules that resolve a call but aren't
/// translated outright: the input's own directory, then every directory
/// named in `HACK_VM_PATHS`.
fn search_paths(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = vec![input_dir.to_path_buf()];
    if let Ok(value) = env::var(PATH_ENV) {
        for entry in value.split(':').filter(|s| !s.is_empty()) {
            let path = PathBuf::from(entry);
            if !path.exists() {
                return Err(anyhow!("path not found: {}", path.display()));
            }
            paths.push(path);
        }
    }
    Ok(paths)
}

fn is_valid_module_name(path: &Path) -> bool {
    let Some(stem_first) = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.chars().next())
    else {
        return false;
    };
    path.extension().and_then(|s| s.to_str()) == Some("vm") && stem_first.is_ascii_uppercase()
}

fn compile_file(input: &Path, search_path: &[PathBuf]) -> Result<()> {
    if !is_valid_module_name(input) {
        eprintln!(
            "File name must be of the form '[A-Z].*\\.vm': {}",
            input.display()
        );
        process::exit(3);
    }
    let output = input.with_extension("asm");
    if output.exists() && !output.is_file() {
        eprintln!("Output path exists and is not a file: {}", output.display());
        process::exit(4);
    }

    log::info!("translating {}", input.display());
    let out_file =
        File::create(&output).with_context(|| format!("cannot create {}", output.display()))?;
    hackvm::translate_program(input, search_path, BufWriter::new(out_file))
        .with_context(|| format!("translating {}", input.display()))?;
    log::info!("wrote {}", output.display());
    println!("Translation complete. Output written to {}", output.display());
    Ok(())
}

/// Translates every `[A-Z]*.vm` file in `dir` on its own, each producing a
/// sibling `.asm` file with its own bootstrap and call-resolution pass,
/// mirroring the one-module-at-a-time directory walk of the reference
/// `main(paths_env)` loop (`for file in in_file.glob("[A-Z]*.vm")`) rather
/// than linking them into a single combined program.
fn compile_directory(dir: &Path, search_path: &[PathBuf]) -> Result<()> {
    let mut modules: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read directory {}", dir.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_valid_module_name(path))
        .collect();
    modules.sort();

    if modules.is_empty() {
        return Err(anyhow!("no [A-Z]*.vm files found in {}", dir.display()));
    }

    let mut failures = 0usize;
    for module in &modules {
        if let Err(err) = compile_file(module, search_path) {
            eprintln!("{err:#}");
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(anyhow!("{failures} of {} module(s) failed to translate", modules.len()));
    }
    Ok(())
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <input.vm|input-dir>");
    process::exit(1);
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .env()
        .init()
        .expect("logger must initialize exactly once");

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        usage(&args[0]);
    }

    let input = PathBuf::from(&args[1]);
    if !input.exists() {
        eprintln!("No such file or directory: {}", input.display());
        process::exit(2);
    }

    let parent = if input.is_dir() {
        input.clone()
    } else {
        input
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    };
    let search_path = search_paths(&parent)?;

    if input.is_dir() {
        compile_directory(&input, &search_path)
    } else {
        compile_file(&input, &search_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_lowercase_module_names() {
        assert!(!is_valid_module_name(Path::new("main.vm")));
        assert!(is_valid_module_name(Path::new("Main.vm")));
    }

    #[test]
    fn rejects_non_vm_extension() {
        assert!(!is_valid_module_name(Path::new("Main.asm")));
    }
}
