//! Single-pass assembly with deferred symbol resolution.
//!
//! Replaces the textbook two-pass design (a label-collecting pass followed
//! by a full code-generating re-pass) with one forward pass that emits
//! placeholders for unresolved A-instruction operands and patches them
//! once the whole file's labels are known. Labels never consume a ROM
//! slot; user variables are allocated RAM addresses in first-use order.

use crate::code;
use crate::error::{Error, Result};
use crate::lexer::{tokenize_operand, AOperand};
use crate::parser::{CommandType, ParserLines};
use crate::symbol_table::SymbolTable;
use indexmap::IndexMap;
use std::collections::HashMap;

const USER_SYMBOL_BASE: u16 = 16;

/// Assembles source lines into 16-bit binary instruction words, one per
/// output line.
///
/// # Errors
/// Returns an error on a malformed instruction, a redeclared label, or an
/// address that does not fit Hack's 15-bit address space.
pub fn assemble(lines: &[String]) -> Result<Vec<String>> {
    let mut labels: HashMap<String, u16> = HashMap::new();
    let mut fixups: IndexMap<String, Vec<usize>> = IndexMap::new();
    let mut words: Vec<String> = Vec::with_capacity(lines.len());
    let mut rom_address: u16 = 0;
    let mut parser = ParserLines::from_lines(lines);
    let mut line_no: u32 = 0;

    while parser.advance() {
        line_no += 1;
        match parser.command_type()? {
            CommandType::LCommand => {
                if !parser.raw_line().ends_with(')') {
                    return Err(Error::UnclosedLabel { line: line_no });
                }
                let symbol = parser.symbol()?.to_string();
                if labels.contains_key(&symbol) {
                    return Err(Error::SymbolRedeclared { line: line_no, symbol });
                }
                log::trace!("line {line_no}: label '{symbol}' -> ROM[{rom_address}]");
                labels.insert(symbol, rom_address);
            }
            CommandType::ACommand => {
                let operand = parser.symbol()?;
                match tokenize_operand(operand, line_no)? {
                    AOperand::Address(address) => {
                        words.push(code::encode_a_instruction(address));
                    }
                    AOperand::Symbol(name) => {
                        fixups.entry(name).or_default().push(words.len());
                        words.push(String::new());
                    }
                }
                rom_address += 1;
            }
            CommandType::CCommand => {
                let dest = parser.dest()?.unwrap_or("");
                let comp = parser.comp()?.ok_or(Error::MissingComp { line: line_no })?;
                if comp.is_empty() {
                    return Err(Error::MissingComp { line: line_no });
                }
                let jump = parser.jump()?.unwrap_or("");
                words.push(code::encode_c_instruction(dest, comp, jump));
                rom_address += 1;
            }
        }
    }

    log::debug!(
        "pass complete: {} instructions, {} unresolved symbols",
        words.len(),
        fixups.len()
    );

    let mut symbol_table = SymbolTable::new();
    let mut next_address = USER_SYMBOL_BASE;
    for (name, positions) in fixups {
        let address = labels
            .get(&name)
            .copied()
            .unwrap_or_else(|| symbol_table.get_or_insert(&name, &mut next_address));
        let word = code::encode_a_instruction(address);
        for pos in positions {
            words[pos] = word.clone();
        }
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn assembles_simple_program() {
        let out = assemble(&lines(&["@2", "D=A", "@3", "D=D+A", "@0", "M=D"])).unwrap();
        assert_eq!(out[0], "0000000000000010");
        assert_eq!(out[1], "1110110000010000");
    }

    #[test]
    fn resolves_forward_label_reference() {
        let out = assemble(&lines(&["@LOOP", "0;JMP", "(LOOP)", "@0", "D=M"])).unwrap();
        assert_eq!(out[0], code::encode_a_instruction(2));
    }

    #[test]
    fn allocates_user_symbols_in_first_use_order() {
        let out = assemble(&lines(&["@foo", "@bar", "@foo"])).unwrap();
        assert_eq!(out[0], code::encode_a_instruction(16));
        assert_eq!(out[1], code::encode_a_instruction(17));
        assert_eq!(out[2], code::encode_a_instruction(16));
    }

    #[test]
    fn predefined_symbols_are_not_reallocated() {
        let out = assemble(&lines(&["@SCREEN", "@KBD", "@SP"])).unwrap();
        assert_eq!(out[0], code::encode_a_instruction(16384));
        assert_eq!(out[1], code::encode_a_instruction(24576));
        assert_eq!(out[2], code::encode_a_instruction(0));
    }

    #[test]
    fn rejects_duplicate_label() {
        let err = assemble(&lines(&["(LOOP)", "@0", "(LOOP)"])).unwrap_err();
        assert!(matches!(err, Error::SymbolRedeclared { .. }));
    }

    #[test]
    fn rejects_unclosed_label() {
        let err = assemble(&lines(&["(LOOP", "@0"])).unwrap_err();
        assert!(matches!(err, Error::UnclosedLabel { .. }));
    }

    #[test]
    fn rejects_missing_comp() {
        let err = assemble(&lines(&["D="])).unwrap_err();
        assert!(matches!(err, Error::MissingComp { .. }));
    }

    #[test]
    fn rejects_address_out_of_range() {
        let err = assemble(&lines(&["@32768"])).unwrap_err();
        assert!(matches!(err, Error::AddressOutOfRange { .. }));
    }

    #[test]
    fn labels_do_not_consume_rom_addresses() {
        let out = assemble(&lines(&["(START)", "@START", "0;JMP"])).unwrap();
        assert_eq!(out[0], code::encode_a_instruction(0));
    }
}
