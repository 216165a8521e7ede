//! Lexical helpers for the operand side of an instruction.
//!
//! Line-level classification (A/C/L command, dest/comp/jump slicing) stays
//! in [`crate::parser::ParserLines`], which already does that with fast
//! byte-level scanning. This module only tokenizes the text following `@`
//! (or inside a label's parentheses), so a bare decimal address and a
//! symbol name are told apart by grammar instead of by probing with
//! `str::parse`.

use crate::error::{Error, Result};

/// The operand of an `@...` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AOperand {
    /// A literal decimal address, already range-checked to 15 bits.
    Address(u16),
    /// A symbol to be resolved against labels or user variables.
    Symbol(String),
}

/// Tokenizes the operand text of an A-instruction.
///
/// # Errors
/// Returns [`Error::AddressOutOfRange`] if a numeric operand does not fit
/// in 15 bits, and [`Error::UnexpectedChar`] if the operand is neither a
/// valid decimal number nor a valid identifier.
pub fn tokenize_operand(text: &str, line: u32) -> Result<AOperand> {
    let bytes = text.as_bytes();
    let Some(&first) = bytes.first() else {
        return Err(Error::UnexpectedChar { line, ch: '\0' });
    };

    if first.is_ascii_digit() {
        let value: u32 = text
            .parse()
            .map_err(|_| Error::UnexpectedChar { line, ch: first as char })?;
        if value > 0x7FFF {
            return Err(Error::AddressOutOfRange { line, value });
        }
        return Ok(AOperand::Address(u16::try_from(value).expect("checked above")));
    }

    for &b in bytes {
        if !(b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'$' | b':')) {
            return Err(Error::UnexpectedChar { line, ch: b as char });
        }
    }
    Ok(AOperand::Symbol(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_decimal_address() {
        assert_eq!(tokenize_operand("100", 1).unwrap(), AOperand::Address(100));
    }

    #[test]
    fn tokenizes_symbol() {
        assert_eq!(
            tokenize_operand("foo.bar", 1).unwrap(),
            AOperand::Symbol("foo.bar".to_string())
        );
    }

    #[test]
    fn rejects_address_over_15_bits() {
        assert!(matches!(
            tokenize_operand("32768", 1),
            Err(Error::AddressOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_bad_character() {
        assert!(matches!(
            tokenize_operand("foo!bar", 1),
            Err(Error::UnexpectedChar { .. })
        ));
    }
}
