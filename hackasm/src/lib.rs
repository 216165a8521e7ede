//! Hack Assembler for the `Nand2Tetris` course
//!
//! This crate translates Hack assembly mnemonics into 16-bit Hack machine
//! words: a lexer/parser pair classifies each line, and a single forward
//! pass emits instruction words while deferring symbol resolution to a
//! fixup table, so labels may be referenced before they're declared
//! without re-scanning the source.
//!
//! # Architecture
//!
//! - [`parser`]: fast byte-level line classification (A/C/L command,
//!   dest/comp/jump slicing)
//! - [`lexer`]: operand-level tokenization for A-instructions
//! - [`assembler`]: the single-pass resolver tying the above together
//! - [`code`]: binary encoding using perfect hash functions (PHF)
//! - [`symbol_table`]: predefined and user-defined symbol management
//! - [`error`]: crate error type
//!
//! # Example
//!
//! ```rust
//! use hackasm::assemble;
//!
//! let lines = vec!["@2".to_string(), "D=A".to_string()];
//! let words = assemble(&lines).unwrap();
//! assert_eq!(words[0], "0000000000000010");
//! assert_eq!(words[1], "1110110000010000");
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod assembler;
pub mod code;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbol_table;

pub use assembler::assemble;
pub use error::Error;
pub use parser::{CommandType, ParserError, ParserLines};
pub use symbol_table::SymbolTable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_assembly_workflow() {
        let lines = vec![
            "@2".to_string(),
            "D=A".to_string(),
            "@3".to_string(),
            "D=D+A".to_string(),
            "@0".to_string(),
            "M=D".to_string(),
        ];

        let mut parser = ParserLines::from_lines(&lines);
        let mut instructions = Vec::new();

        while parser.advance() {
            match parser.command_type().unwrap() {
                CommandType::ACommand => {
                    let symbol = parser.symbol().unwrap();
                    let addr = symbol.parse::<u16>().unwrap();
                    instructions.push(code::encode_a_instruction(addr));
                }
                CommandType::CCommand => {
                    let instruction = code::encode_c_instruction(
                        parser.dest().unwrap().unwrap_or(""),
                        parser.comp().unwrap().unwrap_or(""),
                        parser.jump().unwrap().unwrap_or(""),
                    );
                    instructions.push(instruction);
                }
                CommandType::LCommand => {}
            }
        }

        assert_eq!(instructions.len(), 6);
        assert_eq!(instructions[0], "0000000000000010"); // @2
        assert_eq!(instructions[1], "1110110000010000"); // D=A
    }

    #[test]
    fn test_symbol_table_integration() {
        let mut st = SymbolTable::new();
        let mut next_addr = 16;

        // Test predefined symbols
        assert_eq!(st.get_address("SP"), 0);
        assert_eq!(st.get_address("R15"), 15);
        assert_eq!(st.get_address("SCREEN"), 16384);

        // Test get_or_insert
        let var1 = st.get_or_insert("i", &mut next_addr);
        assert_eq!(var1, 16);
        assert_eq!(next_addr, 17);

        let var1_again = st.get_or_insert("i", &mut next_addr);
        assert_eq!(var1_again, 16);
        assert_eq!(next_addr, 17); // Should not increment
    }
}
