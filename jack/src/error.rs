//! Error types shared by the lexer and parser.

use thiserror::Error;

use crate::token::Loc;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0:?}: unexpected character {1:?}")]
    UnexpectedChar(Loc, char),

    #[error("{0:?}: unterminated string literal")]
    UnterminatedString(Loc),

    #[error("{0:?}: unterminated block comment")]
    UnterminatedComment(Loc),

    #[error("{0:?}: expected a digit, got {1:?}")]
    ExpectedDigit(Loc, char),

    #[error("{start:?}-{end:?}: {message}")]
    UnexpectedToken { start: Loc, end: Loc, message: String },

    #[error("{start:?}-{end:?}: expected an expression, got {found}")]
    ExpectedExpr { start: Loc, end: Loc, found: String },

    #[error("{0:?}: 'break' used outside a loop")]
    BreakOutsideLoop(Loc),

    #[error("{0:?}: 'continue' used outside a loop")]
    ContinueOutsideLoop(Loc),

    #[error("{0:?}: 'return' used outside a function or method")]
    ReturnOutsideProc(Loc),

    #[error("{0:?}: 'this' used outside a method")]
    ThisOutsideMethod(Loc),

    #[error("{start:?}-{end:?}: only identifiers can be declared; expected an identifier before ':'")]
    NotDeclarable { start: Loc, end: Loc },

    #[error("{0:?}: variables must be initialized on declaration")]
    UninitializedDecl(Loc),

    #[error("{0:?}: literal {1:?} is not assignable")]
    LiteralNotAssignable(Loc, String),

    #[error("{0:?}: cannot assign to expression of kind {1}")]
    NotAssignable(Loc, &'static str),

    #[error("{0:?}: duplicate parameter {1:?}")]
    DuplicateParameter(Loc, String),

    #[error("{0:?}: symbol {1:?} redeclared in this scope")]
    SymbolRedeclared(Loc, String),

    #[error("{0:?}: missing import target")]
    MissingImportTarget(Loc),
}

pub type Result<T> = std::result::Result<T, Error>;
