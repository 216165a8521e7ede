//! Hack VM Translator for the `Nand2Tetris` course
//!
//! This crate lowers a stack-based VM intermediate language into Hack
//! assembly: a lexer/parser pair classifies each command, a code
//! generator emits the inline arithmetic/segment-access instructions and
//! the shared `call`/`return`/`function` trampolines, and a multi-module
//! translator links several `.vm` files together, resolving calls across
//! module boundaries.
//!
//! # Architecture
//!
//! - [`lexer`]: character-at-a-time tokenizer for VM source
//! - [`parser`]: token stream to [`parser::Statement`] conversion
//! - [`code_writer`]: statement-to-assembly code generation
//! - [`translator`]: multi-module driver and link-time symbol resolution
//! - [`error`]: crate error type
//!
//! # Example
//!
//! ```rust
//! use hackvm::code_writer::CodeWriter;
//! use hackvm::parser::{Parser, Statement};
//!
//! let mut parser = Parser::new("push constant 7\n");
//! let located = parser.next_statement().unwrap().unwrap();
//! assert_eq!(located.statement, Statement::Push(hackvm::parser::Segment::Constant, 7));
//!
//! let mut asm = Vec::new();
//! let mut writer = CodeWriter::new(&mut asm);
//! writer.write_push(hackvm::parser::Segment::Constant, 7).unwrap();
//! assert!(String::from_utf8(asm).unwrap().contains("@7"));
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code_writer;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod translator;

pub use code_writer::CodeWriter;
pub use error::Error;
pub use translator::{translate_program, Translator};
