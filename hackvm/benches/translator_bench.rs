//! VM Translator Benchmarks
//!
//! Measures lexer/parser throughput and full single-module translation,
//! mirroring the assembler's benchmark suite.
//!
//! Run with:
//! ```bash
//! cargo bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hackvm::code_writer::CodeWriter;
use hackvm::parser::Parser;

const SMALL_PROGRAM: &str = "push constant 7\npush constant 8\nadd\npop local 0\n";

const FUNCTION_PROGRAM: &str = "\
function Main.fib 0
push argument 0
push constant 2
lt
if-goto BASE_CASE
push argument 0
push constant 1
sub
call Main.fib 1
push argument 0
push constant 2
sub
call Main.fib 1
add
return
label BASE_CASE
push argument 0
return
";

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("vm_parser");
    group.throughput(Throughput::Bytes(SMALL_PROGRAM.len() as u64));
    group.bench_function("parse_small_program", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(SMALL_PROGRAM));
            while let Some(stmt) = parser.next_statement().unwrap() {
                black_box(stmt);
            }
        });
    });

    group.throughput(Throughput::Bytes(FUNCTION_PROGRAM.len() as u64));
    group.bench_function("parse_recursive_function", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(FUNCTION_PROGRAM));
            while let Some(stmt) = parser.next_statement().unwrap() {
                black_box(stmt);
            }
        });
    });

    group.finish();
}

fn bench_code_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("vm_code_generation");

    group.bench_function("translate_small_program", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            let mut writer = CodeWriter::new(&mut out);
            let mut parser = Parser::new(black_box(SMALL_PROGRAM));
            while let Some(located) = parser.next_statement().unwrap() {
                use hackvm::parser::Statement;
                match located.statement {
                    Statement::Arithmetic(op) => writer.write_arithmetic(op).unwrap(),
                    Statement::Push(seg, idx) => writer.write_push(seg, idx).unwrap(),
                    Statement::Pop(seg, idx) => writer.write_pop(seg, idx).unwrap(),
                    _ => {}
                }
            }
            black_box(out);
        });
    });

    group.bench_function("translate_recursive_function", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            let mut writer = CodeWriter::new(&mut out);
            let mut parser = Parser::new(black_box(FUNCTION_PROGRAM));
            use hackvm::parser::Statement;
            while let Some(located) = parser.next_statement().unwrap() {
                match located.statement {
                    Statement::Arithmetic(op) => writer.write_arithmetic(op).unwrap(),
                    Statement::Push(seg, idx) => writer.write_push(seg, idx).unwrap(),
                    Statement::Pop(seg, idx) => writer.write_pop(seg, idx).unwrap(),
                    Statement::Label(name) => writer.write_label(&name).unwrap(),
                    Statement::Goto(name) => writer.write_goto(&name).unwrap(),
                    Statement::IfGoto(name) => writer.write_if_goto(&name).unwrap(),
                    Statement::Function(name, nvars) => writer.write_function(&name, nvars).unwrap(),
                    Statement::Call(name, nargs) => {
                        let name = name.unwrap_or_else(|| writer.current_function().unwrap().to_string());
                        writer.write_call(&name, nargs).unwrap();
                    }
                    Statement::Return => writer.write_return().unwrap(),
                }
            }
            black_box(out);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parser, bench_code_generation);
criterion_main!(benches);
