use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn translate_source(stem: &str, source: &str) -> String {
    let mut out = Vec::new();
    hackvm::translate_program(
        &write_temp_module(stem, source),
        &[],
        &mut out,
    )
    .unwrap_or_else(|e| panic!("translation of {stem} failed: {e}"));
    String::from_utf8(out).unwrap()
}

fn write_temp_module(stem: &str, source: &str) -> std::path::PathBuf {
    let dir = tempdir().unwrap().into_path();
    let path = dir.join(format!("{stem}.vm"));
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn simple_arithmetic_program_translates() {
    let asm = translate_source("Main", "push constant 7\npush constant 8\nadd\n");
    assert!(asm.contains("@7"));
    assert!(asm.contains("@8"));
    assert!(asm.contains("(__CALL)"));
    assert!(asm.contains("(__RETURN)"));
    assert!(asm.contains("(__FUNCTION)"));
}

#[test]
fn function_call_within_one_module_resolves() {
    let asm = translate_source(
        "Main",
        "function Main.double 0\n\
         push argument 0\n\
         push argument 0\n\
         add\n\
         return\n\
         function Sys.init 0\n\
         push constant 3\n\
         call Main.double 1\n\
         return\n",
    );
    assert!(asm.contains("(Main.double)"));
    assert!(asm.contains("(Sys.init)"));
}

#[test]
fn call_across_modules_is_resolved_via_search_path() {
    let dir = tempdir().unwrap();
    let main_path = dir.path().join("Main.vm");
    fs::write(&main_path, "function Sys.init 0\ncall Util.square 1\nreturn\n").unwrap();
    fs::write(
        dir.path().join("Util.vm"),
        "function Util.square 0\npush argument 0\npush argument 0\ncall Math.multiply 2\nreturn\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Math.vm"),
        "function Math.multiply 0\npush argument 0\nreturn\n",
    )
    .unwrap();

    let mut out = Vec::new();
    hackvm::translate_program(&main_path, &[dir.path().to_path_buf()], &mut out)
        .expect("multi-module translation should resolve every call");
    let asm = String::from_utf8(out).unwrap();
    assert!(asm.contains("(Util.square)"));
    assert!(asm.contains("(Math.multiply)"));
}

#[test]
fn cyclic_inter_module_calls_resolve_via_the_global_function_table() {
    // A.vm calls B.foo; B.vm calls A.bar, which A already defined before
    // B was ever translated. Resolving this requires consulting the
    // program-wide `functions` table when clearing `referenced`, not just
    // names newly defined by the module currently being translated.
    let dir = tempdir().unwrap();
    let a_path = dir.path().join("A.vm");
    fs::write(
        &a_path,
        "function A.bar 0\npush constant 1\nreturn\n\
         function Sys.init 0\ncall B.foo 0\nreturn\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("B.vm"),
        "function B.foo 0\ncall A.bar 0\nreturn\n",
    )
    .unwrap();

    let mut out = Vec::new();
    hackvm::translate_program(&a_path, &[dir.path().to_path_buf()], &mut out)
        .expect("cyclic inter-module calls should still resolve");
    let asm = String::from_utf8(out).unwrap();
    assert!(asm.contains("(A.bar)"));
    assert!(asm.contains("(B.foo)"));
}

#[test]
fn unresolved_call_fails_translation() {
    let main = write_temp_module("Main", "call Nowhere.missing 0\n");
    let mut out = Vec::new();
    let err = hackvm::translate_program(&main, &[], &mut out).unwrap_err();
    assert!(matches!(err, hackvm::Error::UnresolvedFunctions(_)));
}

/// End-to-end check through the compiled binary, matching the style used
/// to test the assembler.
#[test]
fn binary_translates_a_file_end_to_end() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Add.vm");
    fs::write(&input, "function Sys.init 0\npush constant 2\npush constant 3\nadd\nreturn\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_hackvm"))
        .arg(&input)
        .status()
        .expect("failed to run hackvm binary");
    assert!(status.success());

    let output = input.with_extension("asm");
    let asm = fs::read_to_string(&output).expect("hackvm should have written an .asm file");
    assert!(asm.contains("(Sys.init)"));
}
