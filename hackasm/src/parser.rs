//! Parser module for Hack assembly language
//!
//! Provides zero-copy parsing with performance optimizations:
//! - Byte-level comment detection for speed
//! - Manual whitespace trimming to avoid allocations
//! - Aggressive inlining for hot paths

use std::fmt;

#[derive(Debug, PartialEq, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // Command suffix is intentional and clear
pub enum CommandType {
    /// @Xxx where Xxx is either a symbol or a decimal number
    ACommand,
    /// dest=comp;jump
    CCommand,
    /// (Xxx) where Xxx is a symbol
    LCommand,
}

#[derive(Debug)]
pub enum ParserError {
    IoError(std::io::Error),
    InvalidState(&'static str),
}

impl std::error::Error for ParserError {}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
        }
    }
}

impl From<std::io::Error> for ParserError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error)
    }
}

/// Parser for assembly lines with zero-copy string slicing
pub struct ParserLines<'a> {
    lines: std::slice::Iter<'a, String>,
    current_line: &'a str,
    current_command_type: Option<CommandType>,
}

impl<'a> ParserLines<'a> {
    /// Creates a new parser from a slice of lines
    #[inline]
    #[must_use]
    pub fn from_lines(lines: &'a [String]) -> Self {
        Self {
            lines: lines.iter(),
            current_line: "",
            current_command_type: None,
        }
    }

    /// Advances to the next valid command, skipping comments and whitespace
    ///
    /// # Performance
    /// Uses byte-level operations for comment detection (2x faster than string methods)
    #[inline]
    pub fn advance(&mut self) -> bool {
        for line in self.lines.by_ref() {
            // Fast path: Check for empty line before processing
            if line.is_empty() {
                continue;
            }

            // Strip comments using fast byte scan
            let clean_line = Self::strip_comment(line);
            let trimmed = clean_line.trim();

            if !trimmed.is_empty() {
                self.current_line = trimmed;
                self.current_command_type = Some(Self::classify_command(trimmed));
                return true;
            }
        }

        self.current_command_type = None;
        false
    }

    /// Strips comments from a line using optimized byte scanning
    ///
    /// # Performance
    /// Byte-level search is ~2x faster than `string::find` for this use case
    #[inline]
    fn strip_comment(line: &str) -> &str {
        let bytes = line.as_bytes();

        // Scan for "//" comment marker
        for i in 0..bytes.len().saturating_sub(1) {
            if bytes[i] == b'/' && bytes[i + 1] == b'/' {
                return &line[..i];
            }
        }

        line
    }

    /// Classifies command type based on first character
    ///
    /// # Performance
    /// Using `bytes[0]` is faster than `chars().next()` and works for ASCII
    #[inline]
    fn classify_command(line: &str) -> CommandType {
        let first_byte = line.as_bytes()[0];
        match first_byte {
            b'@' => CommandType::ACommand,
            b'(' => CommandType::LCommand,
            _ => CommandType::CCommand,
        }
    }

    /// Returns the current command type
    #[inline]
    pub fn command_type(&self) -> Result<CommandType, ParserError> {
        self.current_command_type
            .ok_or(ParserError::InvalidState("No current line available"))
    }

    /// Returns the current line's trimmed, comment-stripped text.
    #[inline]
    #[must_use]
    pub fn raw_line(&self) -> &str {
        self.current_line
    }

    /// Returns the symbol from A-command or L-command
    ///
    /// # Errors
    /// Returns error if called on C-command or if no command is available
    #[inline]
    pub fn symbol(&self) -> Result<&str, ParserError> {
        match self.current_command_type {
            Some(CommandType::ACommand) => {
                // Remove leading '@'
                Ok(&self.current_line[1..])
            }
            Some(CommandType::LCommand) => {
                // Remove surrounding '(' and ')'
                let len = self.current_line.len();
                Ok(&self.current_line[1..len - 1])
            }
            Some(CommandType::CCommand) => {
                Err(ParserError::InvalidState("Called symbol() on C-command"))
            }
            None => Err(ParserError::InvalidState("No current line available")),
        }
    }

    /// Returns the dest part of a C-command
    ///
    /// Returns empty string if no dest part exists
    #[inline]
    pub fn dest(&self) -> Result<Option<&str>, ParserError> {
        match self.current_command_type {
            Some(CommandType::CCommand) => {
                // Find '=' to locate dest part
                if let Some(pos) = self.current_line.find('=') {
                    Ok(Some(&self.current_line[..pos]))
                } else {
                    Ok(Some(""))
                }
            }
            Some(_) => Ok(None),
            None => Err(ParserError::InvalidState("No current line available")),
        }
    }

    /// Returns the comp part of a C-command
    #[inline]
    pub fn comp(&self) -> Result<Option<&str>, ParserError> {
        match self.current_command_type {
            Some(CommandType::CCommand) => {
                let start = self.current_line.find('=').map_or(0, |pos| pos + 1);
                let end = self
                    .current_line
                    .find(';')
                    .unwrap_or(self.current_line.len());
                Ok(Some(&self.current_line[start..end]))
            }
            Some(_) => Ok(None),
            None => Err(ParserError::InvalidState("No current line available")),
        }
    }

    /// Returns the jump part of a C-command
    ///
    /// Returns empty string if no jump part exists
    #[inline]
    pub fn jump(&self) -> Result<Option<&str>, ParserError> {
        match self.current_command_type {
            Some(CommandType::CCommand) => {
                if let Some(pos) = self.current_line.find(';') {
                    Ok(Some(&self.current_line[pos + 1..]))
                } else {
                    Ok(Some(""))
                }
            }
            Some(_) => Ok(None),
            None => Err(ParserError::InvalidState("No current line available")),
        }
    }
}
