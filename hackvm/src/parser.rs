//! Parses a token stream into VM statements.

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Local,
    Argument,
    This,
    That,
    Static,
    Pointer,
    Temp,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Arithmetic(ArithOp),
    Push(Segment, i32),
    Pop(Segment, i32),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    /// `call name nargs`, or the bare `call nargs` shorthand (`None`)
    /// that calls back into the enclosing function.
    Call(Option<String>, u16),
    Return,
}

/// A parsed statement together with its source line, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub statement: Statement,
    pub line: u32,
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    stash: Option<Token>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self { lexer: Lexer::new(src), stash: None }
    }

    fn bump(&mut self) -> Result<Option<Token>> {
        if let Some(tok) = self.stash.take() {
            return Ok(Some(tok));
        }
        self.lexer.next_token()
    }

    fn putback(&mut self, tok: Token) {
        debug_assert!(self.stash.is_none(), "parser lookahead is only ever one token deep");
        self.stash = Some(tok);
    }

    fn expect_eos(&mut self, line: u32) -> Result<()> {
        match self.bump()? {
            Some(Token::Eos) | None => Ok(()),
            Some(_) => Err(Error::Malformed { line, expected: "end of line" }),
        }
    }

    fn expect_ident_or_int(&mut self, line: u32) -> Result<String> {
        match self.bump()? {
            Some(Token::Ident(name)) => Ok(name),
            Some(Token::Int(n)) => Ok(n.to_string()),
            _ => Err(Error::Malformed { line, expected: "identifier" }),
        }
    }

    fn expect_int(&mut self, line: u32) -> Result<i32> {
        match self.bump()? {
            Some(Token::Int(n)) => Ok(n),
            _ => Err(Error::Malformed { line, expected: "integer" }),
        }
    }

    fn segment(&mut self, line: u32) -> Result<Segment> {
        match self.bump()? {
            Some(Token::Local) => Ok(Segment::Local),
            Some(Token::Argument) => Ok(Segment::Argument),
            Some(Token::This) => Ok(Segment::This),
            Some(Token::That) => Ok(Segment::That),
            Some(Token::Static) => Ok(Segment::Static),
            Some(Token::Pointer) => Ok(Segment::Pointer),
            Some(Token::Temp) => Ok(Segment::Temp),
            Some(Token::Constant) => Ok(Segment::Constant),
            Some(Token::Ident(name)) => Err(Error::UnknownSegment { line, segment: name }),
            _ => Err(Error::Malformed { line, expected: "segment name" }),
        }
    }

    /// Parses the next statement, skipping blank lines.
    ///
    /// # Errors
    /// Returns a parse error describing the malformed construct and its
    /// source line.
    pub fn next_statement(&mut self) -> Result<Option<Located>> {
        loop {
            let line = self.lexer.line();
            let Some(tok) = self.bump()? else { return Ok(None) };
            let statement = match tok {
                Token::Eos => continue,
                Token::Add => Statement::Arithmetic(ArithOp::Add),
                Token::Sub => Statement::Arithmetic(ArithOp::Sub),
                Token::Neg => Statement::Arithmetic(ArithOp::Neg),
                Token::Eq => Statement::Arithmetic(ArithOp::Eq),
                Token::Gt => Statement::Arithmetic(ArithOp::Gt),
                Token::Lt => Statement::Arithmetic(ArithOp::Lt),
                Token::And => Statement::Arithmetic(ArithOp::And),
                Token::Or => Statement::Arithmetic(ArithOp::Or),
                Token::Not => Statement::Arithmetic(ArithOp::Not),
                Token::Return => Statement::Return,
                Token::Push => {
                    let segment = self.segment(line)?;
                    let index = self.expect_int(line)?;
                    Statement::Push(segment, index)
                }
                Token::Pop => {
                    let segment = self.segment(line)?;
                    if segment == Segment::Constant {
                        return Err(Error::PopIntoConstant { line });
                    }
                    let index = self.expect_int(line)?;
                    Statement::Pop(segment, index)
                }
                Token::Label => Statement::Label(self.expect_ident_or_int(line)?),
                Token::Goto => Statement::Goto(self.expect_ident_or_int(line)?),
                Token::IfGoto => Statement::IfGoto(self.expect_ident_or_int(line)?),
                Token::Function => {
                    let name = self.expect_ident_or_int(line)?;
                    let nvars = self.expect_int(line)?;
                    Statement::Function(name, u16_from_nonneg(nvars, line)?)
                }
                Token::Call => {
                    let first = self.bump()?.ok_or(Error::Malformed { line, expected: "call target" })?;
                    let second = self.bump()?;
                    let (name, nargs) = match (first, second) {
                        (Token::Ident(name), Some(Token::Int(nargs))) => (Some(name), nargs),
                        (Token::Int(n), Some(Token::Int(nargs))) => (Some(n.to_string()), nargs),
                        (Token::Int(nargs), rest) => {
                            // bare `call <int>` shorthand: no explicit target
                            if let Some(tok) = rest {
                                self.putback(tok);
                            }
                            (None, nargs)
                        }
                        _ => return Err(Error::Malformed { line, expected: "call target" }),
                    };
                    Statement::Call(name, u16_from_nonneg(nargs, line)?)
                }
                _ => return Err(Error::Malformed { line, expected: "statement" }),
            };
            self.expect_eos(line)?;
            return Ok(Some(Located { statement, line }));
        }
    }
}

fn u16_from_nonneg(value: i32, line: u32) -> Result<u16> {
    u16::try_from(value).map_err(|_| Error::Malformed { line, expected: "non-negative count" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(src: &str) -> Vec<Statement> {
        let mut parser = Parser::new(src);
        let mut out = Vec::new();
        while let Some(located) = parser.next_statement().unwrap() {
            out.push(located.statement);
        }
        out
    }

    #[test]
    fn parses_push_pop() {
        assert_eq!(
            all("push constant 7\npop local 0\n"),
            vec![
                Statement::Push(Segment::Constant, 7),
                Statement::Pop(Segment::Local, 0)
            ]
        );
    }

    #[test]
    fn rejects_pop_constant() {
        let mut parser = Parser::new("pop constant 0\n");
        assert!(matches!(parser.next_statement(), Err(Error::PopIntoConstant { .. })));
    }

    #[test]
    fn parses_function_and_call() {
        assert_eq!(
            all("function Main.fib 0\ncall Main.fib 1\nreturn\n"),
            vec![
                Statement::Function("Main.fib".to_string(), 0),
                Statement::Call(Some("Main.fib".to_string()), 1),
                Statement::Return,
            ]
        );
    }

    #[test]
    fn parses_bare_call_shorthand() {
        assert_eq!(
            all("function Main.fib 0\ncall 1\nreturn\n"),
            vec![
                Statement::Function("Main.fib".to_string(), 0),
                Statement::Call(None, 1),
                Statement::Return,
            ]
        );
    }

    #[test]
    fn parses_labels_and_gotos() {
        assert_eq!(
            all("label LOOP\ngoto LOOP\nif-goto LOOP\n"),
            vec![
                Statement::Label("LOOP".to_string()),
                Statement::Goto("LOOP".to_string()),
                Statement::IfGoto("LOOP".to_string()),
            ]
        );
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        assert_eq!(all("// header\n\nadd\n"), vec![Statement::Arithmetic(ArithOp::Add)]);
    }
}
