//! Character-at-a-time lexer for Jack source text.

use crate::error::{Error, Result};
use crate::token::{keyword, Kind, Loc, Token};

/// Scans one byte at a time, tracking a lexeme start (`lex_*`) and a
/// current cursor (`line`/`col`/`offset`) so each emitted [`Token`] can
/// carry both its start and end location.
pub struct Lexer<'a> {
    src: &'a [u8],
    offset: usize,
    line: u32,
    line_start: usize,

    lex_offset: usize,
    lex_line: u32,
    lex_col: u32,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            offset: 0,
            line: 1,
            line_start: 0,
            lex_offset: 0,
            lex_line: 1,
            lex_col: 0,
        }
    }

    fn empty(&self) -> bool {
        self.offset == self.src.len()
    }

    fn peek(&self) -> u8 {
        self.src[self.offset]
    }

    fn peek_at(&self, delta: usize) -> Option<u8> {
        self.src.get(self.offset + delta).copied()
    }

    fn cur_loc(&self) -> Loc {
        Loc {
            line: self.line,
            col: (self.offset - self.line_start) as u32,
            offset: self.offset as u32,
        }
    }

    fn lex_loc(&self) -> Loc {
        Loc { line: self.lex_line, col: self.lex_col, offset: self.lex_offset as u32 }
    }

    fn lexeme(&self) -> String {
        String::from_utf8_lossy(&self.src[self.lex_offset..self.offset]).into_owned()
    }

    fn consume(&mut self) {
        self.lex_offset = self.offset;
        self.lex_col = (self.offset - self.line_start) as u32;
        self.lex_line = self.line;
    }

    fn advance(&mut self) {
        let c = self.peek();
        self.offset += 1;
        if c == b'\n' {
            self.line_start = self.offset;
            self.line += 1;
        }
    }

    fn make_token(&mut self, kind: Kind) -> Token {
        let start = self.lex_loc();
        let end = self.cur_loc();
        let lexeme = self.lexeme();
        self.consume();
        Token::new(kind, start, end, lexeme)
    }

    fn make_ctoken(&mut self, kind: Kind) -> Token {
        self.advance();
        self.make_token(kind)
    }

    /// Advances and returns `true` if the next byte is `b`.
    fn matches(&mut self, b: u8) -> bool {
        if !self.empty() && self.peek() == b {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances past the current byte, then checks the following one.
    fn matches_next(&mut self, b: u8) -> bool {
        self.advance();
        self.matches(b)
    }

    fn is_id_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }

    fn consume_string(&mut self) -> Result<Token> {
        let start = self.lex_loc();
        self.advance();
        loop {
            if self.empty() {
                return Err(Error::UnterminatedString(start));
            }
            if self.peek() == b'"' {
                break;
            }
            self.advance();
        }
        self.advance();
        Ok(self.make_token(Kind::Str))
    }

    fn consume_id(&mut self) -> Token {
        while !self.empty() && Self::is_id_byte(self.peek()) {
            self.advance();
        }
        let lexeme = self.lexeme();
        let kind = keyword(&lexeme).unwrap_or(Kind::Id);
        self.make_token(kind)
    }

    fn consume_int(&mut self) -> Result<Token> {
        loop {
            if self.empty() {
                break;
            }
            let b = self.peek();
            if b.is_ascii_digit() {
                self.advance();
            } else if b.is_ascii_alphabetic() {
                return Err(Error::ExpectedDigit(self.cur_loc(), b as char));
            } else {
                break;
            }
        }
        Ok(self.make_token(Kind::Int))
    }

    fn consume_multi_comment(&mut self) -> Result<()> {
        let start = self.lex_loc();
        loop {
            if self.empty() {
                return Err(Error::UnterminatedComment(start));
            }
            if self.peek() == b'*' && self.matches_next(b'/') {
                break;
            }
            self.advance();
        }
        self.consume();
        Ok(())
    }

    fn consume_single_comment(&mut self) {
        while !self.empty() && self.peek() != b'\n' {
            self.advance();
        }
        self.consume();
    }

    fn consume_spaces(&mut self) {
        while !self.empty() && matches!(self.peek(), b' ' | b'\t' | b'\r' | b'\n') {
            self.advance();
        }
        self.consume();
    }

    /// Scans and returns the next token. Once the input is exhausted this
    /// (repeatedly) returns a zero-width [`Kind::Eot`] token.
    ///
    /// # Errors
    /// Returns a lexical error for an unterminated string/comment, a
    /// non-digit inside an integer literal, or an unrecognized character.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            if self.empty() {
                return Ok(self.make_token(Kind::Eot));
            }
            let c = self.peek();
            return match c {
                b'"' => self.consume_string(),
                b'+' => Ok(self.make_ctoken(Kind::Plus)),
                b'.' => Ok(self.make_ctoken(Kind::Dot)),
                b'/' => {
                    self.advance();
                    if self.matches(b'/') {
                        self.consume_single_comment();
                        continue;
                    } else if self.matches(b'*') {
                        self.consume_multi_comment()?;
                        continue;
                    }
                    Ok(self.make_token(Kind::Slash))
                }
                b'*' => Ok(self.make_ctoken(Kind::Star)),
                b'-' => Ok(self.make_ctoken(Kind::Minus)),
                b'[' => Ok(self.make_ctoken(Kind::LBracket)),
                b']' => Ok(self.make_ctoken(Kind::RBracket)),
                b'(' => Ok(self.make_ctoken(Kind::LParen)),
                b')' => Ok(self.make_ctoken(Kind::RParen)),
                b'{' => Ok(self.make_ctoken(Kind::LBrace)),
                b'}' => Ok(self.make_ctoken(Kind::RBrace)),
                b'~' => Ok(self.make_ctoken(Kind::Tilde)),
                b':' => Ok(self.make_ctoken(Kind::Colon)),
                b';' => Ok(self.make_ctoken(Kind::SColon)),
                b',' => Ok(self.make_ctoken(Kind::Comma)),
                b'|' => {
                    self.advance();
                    Ok(self.make_token(if self.matches(b'|') { Kind::Or } else { Kind::Bar }))
                }
                b'&' => {
                    self.advance();
                    Ok(self.make_token(if self.matches(b'&') { Kind::And } else { Kind::Amp }))
                }
                b'=' => {
                    self.advance();
                    Ok(self.make_token(if self.matches(b'=') { Kind::Equal } else { Kind::Assign }))
                }
                b'<' => {
                    self.advance();
                    Ok(self.make_token(if self.matches(b'=') { Kind::LessEq } else { Kind::Less }))
                }
                b'>' => {
                    self.advance();
                    Ok(self.make_token(if self.matches(b'=') { Kind::GreaterEq } else { Kind::Greater }))
                }
                b'!' => {
                    self.advance();
                    Ok(self.make_token(if self.matches(b'=') { Kind::NEqual } else { Kind::Not }))
                }
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.consume_spaces();
                    continue;
                }
                b if b.is_ascii_digit() => self.consume_int(),
                b if Self::is_id_byte(b) => Ok(self.consume_id()),
                other => Err(Error::UnexpectedChar(self.cur_loc(), other as char)),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(src: &str) -> Vec<Kind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            let done = tok.kind == Kind::Eot;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(lex_all("class Foo"), vec![Kind::Class, Kind::Id, Kind::Eot]);
    }

    #[test]
    fn lexes_two_char_operators() {
        assert_eq!(
            lex_all("== != <= >= && ||"),
            vec![Kind::Equal, Kind::NEqual, Kind::LessEq, Kind::GreaterEq, Kind::And, Kind::Or, Kind::Eot]
        );
    }

    #[test]
    fn lexes_single_char_fallbacks() {
        assert_eq!(lex_all("= < > &|!"), vec![Kind::Assign, Kind::Less, Kind::Greater, Kind::Amp, Kind::Bar, Kind::Not, Kind::Eot]);
    }

    #[test]
    fn skips_comments() {
        assert_eq!(lex_all("// hi\n/* block\ncomment */class"), vec![Kind::Class, Kind::Eot]);
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        let mut lexer = Lexer::new("/* never closed");
        assert!(matches!(lexer.next_token(), Err(Error::UnterminatedComment(_))));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut lexer = Lexer::new("\"oops");
        assert!(matches!(lexer.next_token(), Err(Error::UnterminatedString(_))));
    }

    #[test]
    fn integer_rejects_embedded_letters() {
        let mut lexer = Lexer::new("12a");
        assert!(matches!(lexer.next_token(), Err(Error::ExpectedDigit(_, 'a'))));
    }

    #[test]
    fn string_literal_lexeme_includes_quotes() {
        let mut lexer = Lexer::new("\"hi\"");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, Kind::Str);
        assert_eq!(tok.lexeme, "\"hi\"");
    }

    #[test]
    fn tracks_line_numbers_across_newlines() {
        let mut lexer = Lexer::new("class\nfn");
        let first = lexer.next_token().unwrap();
        assert_eq!(first.start.line, 1);
        let second = lexer.next_token().unwrap();
        assert_eq!(second.start.line, 2);
    }
}
