//! Error types shared by the lexer, parser and assembler passes.

use thiserror::Error;

/// Everything that can go wrong while assembling a Hack program.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: unclosed label, expected ')'")]
    UnclosedLabel { line: u32 },

    #[error("line {line}: label '{symbol}' declared more than once")]
    SymbolRedeclared { line: u32, symbol: String },

    #[error("line {line}: instruction has no computation part")]
    MissingComp { line: u32 },

    #[error("line {line}: address {value} does not fit in 15 bits")]
    AddressOutOfRange { line: u32, value: u32 },

    #[error("line {line}: unexpected character '{ch}'")]
    UnexpectedChar { line: u32, ch: char },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

impl From<crate::parser::ParserError> for Error {
    fn from(err: crate::parser::ParserError) -> Self {
        match err {
            crate::parser::ParserError::IoError(e) => Self::Io(e),
            crate::parser::ParserError::InvalidState(msg) => Self::InvalidState(msg),
        }
    }
}

/// Convenience alias for results produced by this crate's core passes.
pub type Result<T> = std::result::Result<T, Error>;
