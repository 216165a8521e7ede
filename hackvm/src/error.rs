//! Error types shared by the lexer, parser, code generator and translator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: unexpected character '{ch}'")]
    UnexpectedChar { line: u32, ch: char },

    #[error("line {line}: integer {value} does not fit in 15 bits")]
    IntegerOutOfRange { line: u32, value: i64 },

    #[error("line {line}: unknown arithmetic command '{command}'")]
    UnknownArithmetic { line: u32, command: String },

    #[error("line {line}: unknown segment '{segment}'")]
    UnknownSegment { line: u32, segment: String },

    #[error("line {line}: cannot pop into the constant segment")]
    PopIntoConstant { line: u32 },

    #[error("line {line}: malformed statement, expected {expected}")]
    Malformed { line: u32, expected: &'static str },

    #[error("line {line}: label '{label}' declared twice in the same function")]
    DuplicateLabel { line: u32, label: String },

    #[error("line {line}: label '{label}' collides with a function name")]
    LabelFunctionCollision { line: u32, label: String },

    #[error("line {line}: function '{name}' defined twice")]
    DuplicateFunction { line: u32, name: String },

    #[error("line {line}: goto target '{label}' is never defined in module '{function}'")]
    UnresolvedGoto { line: u32, function: String, label: String },

    #[error("unresolved functions: {0:?}")]
    UnresolvedFunctions(Vec<String>),

    #[error("command '{command}' used outside of any function")]
    CommandOutsideFunction { command: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
